//! Threaded planning and the process-wide FFTW lock.

use crate::error::{Error, Result};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{MutexGuard, Once};

/// Environment variable consulted when no thread count is given.
pub const THREADS_ENV: &str = "OMP_NUM_THREADS";

static INIT: Once = Once::new();
static INIT_OK: AtomicBool = AtomicBool::new(false);

/// Serialize access to FFTW.
///
/// This is the `fftw` crate's own planner mutex, so plans made through that crate elsewhere in
/// the process are serialized with ours.  A panic while holding the lock leaves FFTW itself
/// intact, so poisoning is ignored.
pub(crate) fn planner_lock() -> MutexGuard<'static, ()> {
    fftw::FFTW_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
}

/// Determine how many threads the planner should use.
///
/// An explicit count takes precedence, then the first entry of `OMP_NUM_THREADS`, then the
/// available parallelism of the machine.
pub fn resolve_threads(explicit: Option<usize>) -> Result<usize> {
    resolve_threads_from(explicit, std::env::var(THREADS_ENV).ok().as_deref())
}

fn resolve_threads_from(explicit: Option<usize>, env: Option<&str>) -> Result<usize> {
    if let Some(n) = explicit {
        return if n == 0 {
            Err(Error::InvalidThreads(n.to_string()))
        } else {
            Ok(n)
        };
    }

    if let Some(value) = env.map(str::trim).filter(|v| !v.is_empty()) {
        // OpenMP allows a comma-separated list, one entry per nesting level.
        let first = value.split(',').next().unwrap_or(value).trim();
        return match first.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(Error::InvalidThreads(value.to_string())),
        };
    }

    Ok(std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1))
}

/// Initialise FFTW's threaded planner.  Only the first call does any work.
pub fn init_threads() -> Result<()> {
    let _guard = planner_lock();
    init_threads_locked()
}

pub(crate) fn init_threads_locked() -> Result<()> {
    INIT.call_once(|| {
        let ok = unsafe { fftw_sys::fftw_init_threads() } != 0;
        debug!("fftw_init_threads: {}", if ok { "ok" } else { "failed" });
        INIT_OK.store(ok, Ordering::SeqCst);
    });
    if INIT_OK.load(Ordering::SeqCst) {
        Ok(())
    } else {
        Err(Error::ThreadInit)
    }
}

/// Release FFTW's thread and planner state.
///
/// Call once, at program exit; planning afterwards is not supported.
pub fn cleanup() {
    let _guard = planner_lock();
    if INIT_OK.load(Ordering::SeqCst) {
        unsafe { fftw_sys::fftw_cleanup_threads() };
    } else {
        unsafe { fftw_sys::fftw_cleanup() };
    }
    debug!("FFTW state released");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_wins() {
        assert_eq!(resolve_threads_from(Some(3), Some("8")).unwrap(), 3);
    }

    #[test]
    fn explicit_zero() {
        assert!(matches!(
            resolve_threads_from(Some(0), None),
            Err(Error::InvalidThreads(_))
        ));
    }

    #[test]
    fn environment() {
        assert_eq!(resolve_threads_from(None, Some("6")).unwrap(), 6);
        assert_eq!(resolve_threads_from(None, Some(" 4,2 ")).unwrap(), 4);
        assert!(resolve_threads_from(None, Some("0")).is_err());
        assert!(resolve_threads_from(None, Some("many")).is_err());
    }

    #[test]
    fn fallback() {
        assert!(resolve_threads_from(None, None).unwrap() >= 1);
        assert!(resolve_threads_from(None, Some("  ")).unwrap() >= 1);
    }
}
