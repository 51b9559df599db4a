//! # File I/O Module
//!
//! Local persistence for bid session drafts, with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **File locking**: Prevent two estimators editing one draft on a shared drive
//! - **Version validation**: Ensure schema compatibility
//!
//! ## File Format
//!
//! Sessions are saved as `.afb` (fence bid) files containing JSON.
//! Lock files use `.afb.lock` extension with metadata about who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bid_core::file_io::{save_session, load_session, FileLock};
//! use bid_core::session::BidSession;
//! use std::path::Path;
//!
//! let session = BidSession::new();
//! let path = Path::new("rivera_backyard.afb");
//!
//! // Acquire lock before saving
//! let lock = FileLock::acquire(path, "estimator@fenceco.com").unwrap();
//!
//! // Save with atomic write
//! save_session(&session, path).unwrap();
//!
//! // Lock is released when dropped
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{BidError, BidResult};
use crate::session::{BidSession, SCHEMA_VERSION};

/// Lock file metadata stored in .afb.lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where the lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Uses both:
/// 1. OS-level file locking (via fs2) for process safety
/// 2. .lock file with metadata for user visibility
pub struct FileLock {
    session_path: PathBuf,
    lock_path: PathBuf,
    /// The underlying file handle (keeps the OS lock)
    _lock_file: File,
    /// Lock metadata
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a session file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the .afb session file
    /// * `user_id` - Identifier for the user acquiring the lock
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired successfully
    /// * `Err(BidError::FileLocked)` - Another process holds the lock
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> BidResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(BidError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                // Stale lock, take it over
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| {
                BidError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        // Exclusive OS-level lock, non-blocking
        lock_file.try_lock_exclusive().map_err(|_| {
            BidError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(|e| {
            BidError::SerializationError {
                reason: e.to_string(),
            }
        })?;

        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            BidError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;

        lock_file.sync_all().map_err(|e| {
            BidError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        Ok(FileLock {
            session_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a file is locked without acquiring the lock.
    ///
    /// Returns `Some(LockInfo)` if locked, `None` if available.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    /// Get the path to the session file
    pub fn session_path(&self) -> &Path {
        &self.session_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // OS lock is released when _lock_file drops
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(session_path: &Path) -> PathBuf {
    let mut lock_path = session_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> BidResult<LockInfo> {
    let mut file = File::open(lock_path).map_err(|e| {
        BidError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        BidError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| BidError::SerializationError {
        reason: e.to_string(),
    })
}

/// A lock is stale when its owning process is gone (same machine) or it
/// has outlived the 24-hour hand-off window (shared drives, where the
/// owning machine cannot be probed).
fn is_lock_stale(info: &LockInfo) -> bool {
    #[cfg(unix)]
    {
        if let Some(our_machine) = hostname() {
            if info.machine == our_machine
                && fs::metadata(format!("/proc/{}", info.pid)).is_err()
            {
                return true;
            }
        }
    }

    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

/// Save a session to a file with atomic write semantics.
///
/// The save process:
/// 1. Serialize the session to JSON
/// 2. Write to a temporary file (.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename .tmp to .afb (atomic on most filesystems)
///
/// This prevents corruption if the process is interrupted during write.
pub fn save_session(session: &BidSession, path: &Path) -> BidResult<()> {
    let json = serde_json::to_string_pretty(session).map_err(|e| BidError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = path.with_extension("afb.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        BidError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        BidError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        BidError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        BidError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Load a session from a file.
///
/// # Returns
///
/// * `Ok(BidSession)` - Successfully loaded session
/// * `Err(BidError::VersionMismatch)` - File version is incompatible
/// * `Err(BidError::SerializationError)` - Invalid JSON
/// * `Err(BidError::FileError)` - I/O error
pub fn load_session(path: &Path) -> BidResult<BidSession> {
    let mut file = File::open(path)
        .map_err(|e| BidError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| BidError::file_error("read", path.display().to_string(), e.to_string()))?;

    let session: BidSession =
        serde_json::from_str(&contents).map_err(|e| BidError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&session.meta.version)?;

    Ok(session)
}

/// Load a session, returning whether it's read-only due to a lock.
///
/// # Returns
///
/// * `Ok((BidSession, None))` - Loaded successfully, no lock
/// * `Ok((BidSession, Some(LockInfo)))` - Loaded, but another user has the lock
/// * `Err(_)` - Failed to load
pub fn load_session_with_lock_check(path: &Path) -> BidResult<(BidSession, Option<LockInfo>)> {
    let session = load_session(path)?;
    let lock_info = FileLock::check(path);
    Ok((session, lock_info))
}

/// Validate that a file version is compatible with the current schema.
///
/// Major versions must match; for 0.x the minor version of the file must
/// not be newer than ours.
fn validate_version(file_version: &str) -> BidResult<()> {
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(BidError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    if file_parts[0] != current_parts[0] {
        return Err(BidError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(BidError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionEvent;
    use std::env::temp_dir;

    fn temp_session_path(name: &str) -> PathBuf {
        temp_dir().join(format!("fencebid_test_{}.afb", name))
    }

    #[test]
    fn test_lock_path_generation() {
        let session_path = Path::new("/path/to/bid.afb");
        assert_eq!(lock_path_for(session_path), Path::new("/path/to/bid.afb.lock"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("estimator@fenceco.com");
        assert_eq!(info.user_id, "estimator@fenceco.com");
        assert!(info.pid > 0);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_session_path("roundtrip");

        let session = BidSession::new()
            .apply(SessionEvent::CrewOptionToggled(4))
            .apply(SessionEvent::AdditionalDaysChanged(1.5));
        save_session(&session, &path).unwrap();

        let loaded = load_session(&path).unwrap();
        assert_eq!(loaded, session);
        assert!(loaded.crew_selection.is_selected(&4));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = load_session(Path::new("/nonexistent/fencebid.afb"));
        assert!(matches!(result, Err(BidError::FileError { .. })));
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.99.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_future_minor_version_rejected_on_load() {
        let path = temp_session_path("future_version");

        let mut session = BidSession::new();
        session.meta.version = "0.99.0".to_string();
        save_session(&session, &path).unwrap();

        let result = load_session(&path);
        assert!(matches!(result, Err(BidError::VersionMismatch { .. })));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_lock_excludes_second_holder() {
        let path = temp_session_path("lock_exclusion");
        save_session(&BidSession::new(), &path).unwrap();

        let lock = FileLock::acquire(&path, "first@fenceco.com").unwrap();
        assert!(FileLock::check(&path).is_some());

        drop(lock);
        assert!(FileLock::check(&path).is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = temp_session_path("lock_check");
        save_session(&BidSession::new(), &path).unwrap();

        let (_, lock_info) = load_session_with_lock_check(&path).unwrap();
        assert!(lock_info.is_none());

        let _ = fs::remove_file(&path);
    }
}
