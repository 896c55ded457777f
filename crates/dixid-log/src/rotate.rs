use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const DAY_SECS: u64 = 86_400;

/// Rotate once the file would exceed 10 MB.
pub const DEFAULT_SIZE_LIMIT: u64 = 10_000_000;

/// Keep rotated files for 30 days.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(30 * DAY_SECS);

/// A log file writer that rotates on two triggers: when the file would
/// exceed a size limit, and at the first write past UTC midnight.
///
/// On rotation the current file is renamed to `<name>.<unix-secs>` and a
/// fresh file is opened under the original name; rotated files older
/// than the retention window are deleted. Rotation failures degrade to
/// writing into the current file rather than erroring the log call.
///
/// Cloning is cheap and clones share the same underlying file.
#[derive(Clone)]
pub struct RotatingWriter {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    path: PathBuf,
    file: File,
    written: u64,
    size_limit: u64,
    retention: Duration,
    rollover_at: u64,
}

impl RotatingWriter {
    /// Opens (or creates) `path` for appending.
    pub fn new(
        path: impl Into<PathBuf>,
        size_limit: u64,
        retention: Duration,
    ) -> io::Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                path,
                file,
                written,
                size_limit,
                retention,
                rollover_at: next_utc_midnight(unix_secs()),
            })),
        })
    }
}

impl io::Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let now = unix_secs();
        if should_rotate(
            inner.written,
            buf.len() as u64,
            inner.size_limit,
            now,
            inner.rollover_at,
        ) {
            inner.rotate(now);
        }
        let n = inner.file.write(buf)?;
        inner.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.file.flush()
    }
}

impl Inner {
    fn rotate(&mut self, now: u64) {
        if self.file.flush().is_err() {
            return;
        }
        let Some(rotated) = rotated_path(&self.path, now) else {
            return;
        };
        if fs::rename(&self.path, &rotated).is_err() {
            return;
        }
        match OpenOptions::new().create(true).append(true).open(&self.path) {
            Ok(file) => {
                self.file = file;
                self.written = 0;
                self.rollover_at = next_utc_midnight(now);
                prune_rotated(&self.path, now, self.retention);
            }
            Err(_) => {
                // Could not reopen; keep appending to the renamed file.
                let _ = fs::rename(&rotated, &self.path);
            }
        }
    }
}

/// The rotation decision, separated out so it can be tested against
/// injected state.
fn should_rotate(written: u64, incoming: u64, size_limit: u64, now: u64, rollover_at: u64) -> bool {
    written + incoming > size_limit || now >= rollover_at
}

/// First second of the next UTC day.
fn next_utc_midnight(now: u64) -> u64 {
    (now / DAY_SECS + 1) * DAY_SECS
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Picks a free `<name>.<secs>` sibling for the rotated file.
fn rotated_path(path: &Path, now: u64) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    for attempt in 0..10 {
        let candidate = if attempt == 0 {
            path.with_file_name(format!("{name}.{now}"))
        } else {
            path.with_file_name(format!("{name}.{now}-{attempt}"))
        };
        if !candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

/// Deletes rotated siblings whose timestamp suffix has aged out.
fn prune_rotated(path: &Path, now: u64, retention: Duration) {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name().and_then(|n| n.to_str()))
    else {
        return;
    };
    let Ok(entries) = fs::read_dir(parent) else {
        return;
    };
    let prefix = format!("{name}.");
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(suffix) = file_name.to_str().and_then(|n| n.strip_prefix(&prefix)) else {
            continue;
        };
        // Suffix is "<secs>" or "<secs>-<n>".
        let secs = suffix.split('-').next().and_then(|s| s.parse::<u64>().ok());
        if let Some(secs) = secs {
            if now.saturating_sub(secs) > retention.as_secs() {
                let _ = fs::remove_file(entry.path());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dixid-log-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn rotates_on_size_or_deadline() {
        // Size trigger: the write that would cross the limit rotates.
        assert!(!should_rotate(50, 50, 100, 0, u64::MAX));
        assert!(should_rotate(50, 51, 100, 0, u64::MAX));

        // Time trigger: any write at or past the deadline rotates.
        assert!(!should_rotate(0, 1, 100, 99, 100));
        assert!(should_rotate(0, 1, 100, 100, 100));
        assert!(should_rotate(0, 1, 100, 101, 100));
    }

    #[test]
    fn midnight_deadline_is_the_next_day_boundary() {
        assert_eq!(next_utc_midnight(0), DAY_SECS);
        assert_eq!(next_utc_midnight(DAY_SECS - 1), DAY_SECS);
        assert_eq!(next_utc_midnight(DAY_SECS), 2 * DAY_SECS);
    }

    #[test]
    fn size_overflow_moves_the_file_aside() {
        let dir = temp_dir("size");
        let path = dir.join("app.log");
        let mut writer = RotatingWriter::new(&path, 64, DEFAULT_RETENTION).unwrap();

        let line = [b'x'; 40];
        writer.write_all(&line).unwrap();
        writer.write_all(&line).unwrap(); // 40 + 40 > 64: rotates first

        let rotated: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().starts_with("app.log."))
            .collect();
        assert_eq!(rotated.len(), 1);
        assert_eq!(fs::metadata(&path).unwrap().len(), 40);
        assert_eq!(fs::metadata(rotated[0].path()).unwrap().len(), 40);
    }

    #[test]
    fn reopening_resumes_the_existing_file() {
        let dir = temp_dir("resume");
        let path = dir.join("app.log");

        let mut writer = RotatingWriter::new(&path, 1024, DEFAULT_RETENTION).unwrap();
        writer.write_all(b"one\n").unwrap();
        drop(writer);

        let mut writer = RotatingWriter::new(&path, 1024, DEFAULT_RETENTION).unwrap();
        writer.write_all(b"two\n").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "one\ntwo\n");
    }

    #[test]
    fn prune_removes_only_aged_rotations() {
        let dir = temp_dir("prune");
        let path = dir.join("app.log");
        let now = 100 * DAY_SECS;

        let old = dir.join(format!("app.log.{}", now - 31 * DAY_SECS));
        let fresh = dir.join(format!("app.log.{}", now - DAY_SECS));
        let unrelated = dir.join("other.log.0");
        for p in [&old, &fresh, &unrelated] {
            fs::write(p, b"x").unwrap();
        }

        prune_rotated(&path, now, DEFAULT_RETENTION);

        assert!(!old.exists());
        assert!(fresh.exists());
        assert!(unrelated.exists());
    }
}
