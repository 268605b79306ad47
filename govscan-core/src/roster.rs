//! Delegate roster input. The roster is an externally maintained list of
//! known delegates with their expected power and rank; it is re-read on
//! every snapshot build so an updated file takes effect without a restart.

use std::fs;
use std::path::PathBuf;

use govscan_types::DelegateRosterEntry;

use crate::error::GovScanError;

pub trait RosterProvider: Send + Sync {
    fn load(&self) -> Result<Vec<DelegateRosterEntry>, GovScanError>;
}

/// Roster backed by a JSON file: an array of roster entry objects.
pub struct FileRoster {
    path: PathBuf,
}

impl FileRoster {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileRoster { path: path.into() }
    }
}

impl RosterProvider for FileRoster {
    fn load(&self) -> Result<Vec<DelegateRosterEntry>, GovScanError> {
        let bytes = fs::read(&self.path)
            .map_err(|err| GovScanError::Roster(format!("{}: {err}", self.path.display())))?;
        serde_json::from_slice(&bytes)
            .map_err(|err| GovScanError::Roster(format!("{}: {err}", self.path.display())))
    }
}

/// Fixed in-memory roster, mainly for tests and embedding.
pub struct StaticRoster(pub Vec<DelegateRosterEntry>);

impl RosterProvider for StaticRoster {
    fn load(&self) -> Result<Vec<DelegateRosterEntry>, GovScanError> {
        Ok(self.0.clone())
    }
}
