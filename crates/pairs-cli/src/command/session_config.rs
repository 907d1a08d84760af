use std::{path::PathBuf, time::Duration};

use pairs_engine::{DeckSeed, SessionConfig};

use crate::util;

/// Session settings shared by every mode.
///
/// Flags override the values read from `--config`.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SessionConfigArg {
    /// Number of color pairs in a round [default: 10]
    #[clap(long)]
    colors: Option<usize>,
    /// How long a mismatched pair stays face up, in milliseconds [default: 1000]
    #[clap(long)]
    revert_delay_ms: Option<u64>,
    /// Seed for the deck shuffle, as 32 hex digits
    #[clap(long)]
    seed: Option<DeckSeed>,
    /// Path to a session config file (JSON format)
    #[clap(long)]
    config: Option<PathBuf>,
}

impl SessionConfigArg {
    pub(crate) fn load(&self) -> anyhow::Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_session_config_file(path)?,
            None => SessionConfig::default(),
        };
        if let Some(colors) = self.colors {
            config = config.with_colors(colors);
        }
        if let Some(millis) = self.revert_delay_ms {
            config = config.with_revert_delay(Duration::from_millis(millis));
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        log::debug!("session config: {config:?}");
        Ok(config)
    }
}
