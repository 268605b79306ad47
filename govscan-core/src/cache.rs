//! Flat-file caching, one JSON record per proposal id.
//!
//! Two repositories with deliberately different staleness contracts share
//! the cache directory. `VoteResultCache` expires by TTL and is wiped on
//! open so a restarted process never serves stale data. The delegate
//! snapshot queries state at a historical block that can never change, so
//! `DelegateSnapshotCache` is write-once-read-many with no timestamp at all.
//!
//! Writes go through a temp file and rename. Concurrent builds of the same
//! uncached proposal may race; both succeed and the last writer wins, which
//! is harmless for the expiring cache and idempotent for the immutable one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use govscan_types::{DelegateSnapshotEntry, ProposalId, ProposalVoteResult};

const VOTES_DIR: &str = "votes";
const DELEGATES_DIR: &str = "delegates";

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    static SEQ: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);
    let seq = SEQ.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let tmp = path.with_extension(format!("tmp.{}.{seq}", std::process::id()));
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

fn read_optional(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

#[derive(Serialize, Deserialize)]
struct StoredVotes {
    stored_at: u64,
    result: ProposalVoteResult,
}

/// Time-expiring cache for full vote results.
pub struct VoteResultCache {
    dir: PathBuf,
    ttl: Duration,
}

impl VoteResultCache {
    /// Opens the cache, unconditionally clearing anything a previous
    /// process left behind.
    pub fn open(root: &Path, ttl: Duration) -> io::Result<Self> {
        let dir = root.join(VOTES_DIR);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)?;
        Ok(VoteResultCache { dir, ttl })
    }

    fn entry_path(&self, id: &ProposalId) -> PathBuf {
        self.dir.join(format!("{}.json", id.canonical()))
    }

    pub fn lookup(&self, id: &ProposalId) -> io::Result<Option<ProposalVoteResult>> {
        self.lookup_at(id, unix_now())
    }

    fn lookup_at(&self, id: &ProposalId, now: u64) -> io::Result<Option<ProposalVoteResult>> {
        let bytes = match read_optional(&self.entry_path(id))? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let entry: StoredVotes = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(err) => {
                warn!("corrupt vote cache entry for {}: {err}", id.canonical());
                return Ok(None);
            }
        };
        if entry.stored_at.saturating_add(self.ttl.as_secs()) > now {
            debug!("vote cache hit for {}", id.canonical());
            Ok(Some(entry.result))
        } else {
            // Expired entries stay on disk until the next build supersedes
            // them.
            debug!("vote cache entry for {} expired", id.canonical());
            Ok(None)
        }
    }

    pub fn store(&self, result: &ProposalVoteResult) -> io::Result<()> {
        self.store_at(result, unix_now())
    }

    fn store_at(&self, result: &ProposalVoteResult, now: u64) -> io::Result<()> {
        let entry = StoredVotes {
            stored_at: now,
            result: result.clone(),
        };
        let bytes = serde_json::to_vec(&entry)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        write_atomic(&self.entry_path(&result.proposal_id), &bytes)
    }
}

/// Write-once-read-many cache for delegate snapshots. A hit is any existing
/// key, regardless of age.
pub struct DelegateSnapshotCache {
    dir: PathBuf,
}

impl DelegateSnapshotCache {
    /// Opens the cache. Existing entries survive restarts: the underlying
    /// on-chain state is historical and immutable.
    pub fn open(root: &Path) -> io::Result<Self> {
        let dir = root.join(DELEGATES_DIR);
        fs::create_dir_all(&dir)?;
        Ok(DelegateSnapshotCache { dir })
    }

    fn entry_path(&self, id: &ProposalId) -> PathBuf {
        self.dir.join(format!("{}.json", id.canonical()))
    }

    pub fn lookup(&self, id: &ProposalId) -> io::Result<Option<Vec<DelegateSnapshotEntry>>> {
        let bytes = match read_optional(&self.entry_path(id))? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        match serde_json::from_slice(&bytes) {
            Ok(entries) => {
                debug!("delegate snapshot cache hit for {}", id.canonical());
                Ok(Some(entries))
            }
            Err(err) => {
                warn!(
                    "corrupt delegate snapshot entry for {}: {err}",
                    id.canonical()
                );
                Ok(None)
            }
        }
    }

    pub fn store(&self, id: &ProposalId, entries: &[DelegateSnapshotEntry]) -> io::Result<()> {
        let bytes = serde_json::to_vec(entries)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        write_atomic(&self.entry_path(id), &bytes)
    }
}
