//! Exclusive access to the FFTW planner.

use crate::error::{Error, Result};
use crate::threads;
use crate::transform::Transform;
use fftw::types::Flag;
use libc::{c_int, c_uint};
use log::{debug, trace};
use std::ffi::CString;
use std::io;
use std::path::Path;
use std::sync::MutexGuard;

/// Holds the process-wide FFTW lock.  Plans and wisdom are only reachable through it.
pub struct Planner {
    _guard: MutexGuard<'static, ()>,
}

impl Planner {
    /// Block until no other planner is alive, then initialise threading.
    pub fn lock() -> Result<Self> {
        let guard = threads::planner_lock();
        threads::init_threads_locked()?;
        Ok(Self { _guard: guard })
    }

    /// Drop all wisdom accumulated in this process.
    pub fn forget(&mut self) {
        trace!("fftw_forget_wisdom");
        unsafe { fftw_sys::fftw_forget_wisdom() };
    }

    /// Write all accumulated wisdom to `path`.
    pub fn export(&mut self, path: &Path) -> Result<()> {
        let filename = c_path(path)?;
        let ok = unsafe { fftw_sys::fftw_export_wisdom_to_filename(filename.as_ptr()) } != 0;
        if ok {
            debug!("exported wisdom to {}", path.display());
            Ok(())
        } else {
            Err(Error::Export {
                path: path.to_path_buf(),
            })
        }
    }

    /// Merge the wisdom stored at `path` into the accumulated wisdom.
    pub fn import(&mut self, path: &Path) -> Result<()> {
        let filename = c_path(path)?;
        let ok = unsafe { fftw_sys::fftw_import_wisdom_from_filename(filename.as_ptr()) } != 0;
        if ok {
            debug!("imported wisdom from {}", path.display());
            Ok(())
        } else {
            Err(Error::Import {
                path: path.to_path_buf(),
            })
        }
    }

    /// Plan an in-place transform with the transform's rigour, accumulating wisdom.
    pub fn plan(&mut self, transform: &Transform, threads: usize) -> Result<InPlacePlan<'_>> {
        self.create(transform, threads, transform.rigour.flag().bits())
    }

    /// Plan an in-place transform using loaded wisdom only.
    ///
    /// FFTW keys wisdom on the thread count, so `threads` must match the count the wisdom was
    /// generated with.  Returns `Ok(None)` if the wisdom does not cover the transform.
    pub fn probe(
        &mut self,
        transform: &Transform,
        threads: usize,
    ) -> Result<Option<InPlacePlan<'_>>> {
        let flags = (transform.rigour.flag() | Flag::WISDOWMONLY).bits();
        match self.create(transform, threads, flags) {
            Ok(plan) => Ok(Some(plan)),
            Err(Error::Plan { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn create(
        &mut self,
        transform: &Transform,
        threads: usize,
        flags: c_uint,
    ) -> Result<InPlacePlan<'_>> {
        transform.validate()?;
        let [n0, n1, n2] = transform.fftw_dims()?;
        let sign = transform.direction.sign() as c_int;
        let buffer = Buffer::new(transform)?;

        debug!(
            "planning {} with {} thread(s), flags {:#x}",
            transform, threads, flags
        );
        let plan = unsafe {
            fftw_sys::fftw_plan_with_nthreads(threads.min(c_int::MAX as usize) as c_int);
            fftw_sys::fftw_plan_dft_3d(n0, n1, n2, buffer.data, buffer.data, sign, flags)
        };

        if plan.is_null() {
            Err(Error::Plan {
                tag: transform.tag(),
            })
        } else {
            Ok(InPlacePlan {
                plan,
                _buffer: buffer,
                _planner: std::marker::PhantomData,
            })
        }
    }
}

/// SIMD-aligned storage from `fftw_alloc_complex`.
struct Buffer {
    data: *mut fftw_sys::fftw_complex,
}

impl Buffer {
    fn new(transform: &Transform) -> Result<Self> {
        let alloc_error = || Error::Alloc {
            tag: transform.tag(),
            bytes: transform.bytes().unwrap_or(usize::MAX),
        };
        if transform.bytes().is_none() {
            return Err(alloc_error());
        }
        let data = unsafe { fftw_sys::fftw_alloc_complex(transform.len()) };
        if data.is_null() {
            Err(alloc_error())
        } else {
            Ok(Self { data })
        }
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe { fftw_sys::fftw_free(self.data as *mut _) };
    }
}

/// An FFTW plan whose input and output share one aligned buffer.
pub struct InPlacePlan<'a> {
    plan: fftw_sys::fftw_plan,
    _buffer: Buffer,
    _planner: std::marker::PhantomData<&'a mut Planner>,
}

impl Drop for InPlacePlan<'_> {
    fn drop(&mut self) {
        unsafe { fftw_sys::fftw_destroy_plan(self.plan) };
    }
}

fn c_path(path: &Path) -> Result<CString> {
    let invalid = |reason: &str| Error::io(path, io::Error::new(io::ErrorKind::InvalidInput, reason));

    #[cfg(unix)]
    let bytes = {
        use std::os::unix::ffi::OsStrExt;
        path.as_os_str().as_bytes().to_vec()
    };
    #[cfg(not(unix))]
    let bytes = path
        .to_str()
        .ok_or_else(|| invalid("path is not valid UTF-8"))?
        .as_bytes()
        .to_vec();

    CString::new(bytes).map_err(|_| invalid("path contains a NUL byte"))
}
