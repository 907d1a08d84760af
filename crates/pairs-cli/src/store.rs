use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pairs_engine::BestScoreStore;
use serde::{Deserialize, Serialize};

use crate::util::{self, Output};

/// On-disk form of the best score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScoreRecord {
    pub best_score: usize,
    pub updated_at: DateTime<Utc>,
}

/// Best score kept in a JSON file between runs.
///
/// The file is read again on every access, so a better score saved by
/// another run is never overwritten. A missing or unreadable file counts as
/// no best score yet. Failed writes are logged and keep the new value in
/// memory, so the current run still sees it.
#[derive(Debug, Clone)]
pub struct FileBestScoreStore {
    path: PathBuf,
    best_score: Option<usize>,
}

impl FileBestScoreStore {
    pub fn open<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        let path = path.into();
        let best_score = Self::load(&path).map(|record| record.best_score);
        log::debug!("best score from {}: {best_score:?}", path.display());
        Self { path, best_score }
    }

    fn load(path: &Path) -> Option<BestScoreRecord> {
        if !path.exists() {
            return None;
        }
        util::read_json_file("best score", path)
            .inspect_err(|err| log::warn!("ignoring best score file: {err:#}"))
            .ok()
    }

    fn save(&self, record: &BestScoreRecord) -> anyhow::Result<()> {
        Output::create(self.path.clone())?.write_json(record)
    }
}

impl BestScoreStore for FileBestScoreStore {
    fn get(&self) -> Option<usize> {
        let on_disk = Self::load(&self.path).map(|record| record.best_score);
        match (on_disk, self.best_score) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn set(&mut self, value: usize) {
        let value = self.get().map_or(value, |best| best.min(value));
        self.best_score = Some(value);
        let record = BestScoreRecord {
            best_score: value,
            updated_at: Utc::now(),
        };
        match self.save(&record) {
            Ok(()) => log::info!("best score {value} saved to {}", self.path.display()),
            Err(err) => log::error!("failed to save best score: {err:#}"),
        }
    }
}
