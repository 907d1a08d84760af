use std::path::{Path, PathBuf};

use pairs_engine::{BestScoreStore as _, GameSession};

use crate::{
    command::{play::app::PlayApp, session_config::SessionConfigArg},
    store::FileBestScoreStore,
    tui::Tui,
};

mod app;
mod screen;

const DEFAULT_BEST_SCORE_FILE: &str = "./data/best_score.json";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    session: SessionConfigArg,
    /// File that keeps the best score between runs
    #[clap(long, default_value = DEFAULT_BEST_SCORE_FILE)]
    best_score_file: PathBuf,
    /// Write log records to this file
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            session: SessionConfigArg::default(),
            best_score_file: PathBuf::from(DEFAULT_BEST_SCORE_FILE),
            log_file: None,
        }
    }
}

impl PlayArg {
    pub(crate) fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        session,
        best_score_file,
        log_file: _,
    } = arg;

    let config = session.load()?;
    let store = FileBestScoreStore::open(best_score_file);
    let session = GameSession::start_with_store(&config, &store)?;
    log::info!("playing with seed {}", session.seed());

    let mut app = PlayApp::new(session, store);
    Tui::new().run(&mut app)?;

    let (session, store) = app.into_parts();
    log::info!(
        "session ended after round {}, best score {:?}",
        session.generation(),
        store.get()
    );
    Ok(())
}
