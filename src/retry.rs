//! Bounded retry of file reads that fail because another process holds the
//! file open.
//!
//! Reads go through [`FileSource`] and waits through [`Sleeper`], so tests
//! can script lock contention and run on a fake clock.
use std::io;
use std::path::Path;
use std::time::Duration;

use crate::error::IniError;

/// How many times to attempt a read and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total read attempts, including the first. Zero is treated as one.
    pub attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Default number of attempts.
    pub const DEFAULT_ATTEMPTS: u32 = 10;
    /// Default pause between attempts.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(10);

    /// Create a policy.
    #[must_use]
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// A policy that reads once and never waits.
    #[must_use]
    pub const fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

/// Reads whole files.
#[cfg_attr(test, mockall::automock)]
pub trait FileSource {
    /// Read the full contents of `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// [`FileSource`] backed by [`std::fs::read`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSource;

impl FileSource for StdFileSource {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// Blocks the current thread between attempts.
#[cfg_attr(test, mockall::automock)]
pub trait Sleeper {
    /// Wait for `duration`.
    fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Return `true` if `error` means the file is temporarily locked.
///
/// Missing files and permission errors are never transient.
#[must_use]
pub fn is_transient(error: &io::Error) -> bool {
    is_sharing_violation(error)
        || matches!(
            error.kind(),
            io::ErrorKind::WouldBlock
                | io::ErrorKind::Interrupted
                | io::ErrorKind::ResourceBusy
                | io::ErrorKind::TimedOut
        )
}

#[cfg(windows)]
fn is_sharing_violation(error: &io::Error) -> bool {
    const ERROR_SHARING_VIOLATION: i32 = 32;
    const ERROR_LOCK_VIOLATION: i32 = 33;
    matches!(
        error.raw_os_error(),
        Some(ERROR_SHARING_VIOLATION | ERROR_LOCK_VIOLATION)
    )
}

#[cfg(not(windows))]
const fn is_sharing_violation(_error: &io::Error) -> bool {
    false
}

/// Read `path`, retrying transient failures according to `policy`.
///
/// The sleeper is called between attempts only, so a file that stays locked
/// costs `attempts - 1` waits.
///
/// # Errors
///
/// - [`IniError::IoTransient`] if every attempt hit a transient error.
/// - [`IniError::IoFatal`] on the first non-transient error.
pub fn load_with_retry<F, S>(
    source: &F,
    sleeper: &S,
    path: &Path,
    policy: RetryPolicy,
) -> Result<Vec<u8>, IniError>
where
    F: FileSource + ?Sized,
    S: Sleeper + ?Sized,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match source.read(path) {
            Ok(bytes) => {
                if attempt > 1 {
                    tracing::debug!("read {} on attempt {attempt}", path.display());
                }
                return Ok(bytes);
            }
            Err(e) if is_transient(&e) => {
                if attempt >= attempts {
                    return Err(IniError::IoTransient {
                        path: path.to_path_buf(),
                        attempts,
                        source: e,
                    });
                }
                tracing::debug!(
                    "{} is locked (attempt {attempt}/{attempts}): {e}",
                    path.display()
                );
                sleeper.sleep(policy.delay);
                attempt += 1;
            }
            Err(e) => return Err(IniError::io_at(path, e)),
        }
    }
}
