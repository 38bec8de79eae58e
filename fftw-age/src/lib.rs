//! This crate generates and persists FFTW wisdom, so applications can load a tuned transform
//! plan instantly instead of measuring it at startup.
//!
//! # Supported transforms
//! Only in-place, double precision, complex-to-complex 3D transforms are supported, planned with
//! `FFTW_MEASURE` or `FFTW_PATIENT` rigour.  Other transform types, arrangements and rigours are
//! modelled so they can be named and parsed, but are rejected by [`Transform::validate`].
//!
//! # Example
//! ```no_run
//! use fftw_age::{Direction, Options, Rigour, Transform};
//!
//! let transform = Transform::in_place_c2c(Direction::Forward, Rigour::Measure, [64, 64, 64]);
//! let options = Options {
//!     threads: fftw_age::resolve_threads(None)?,
//!     ..Options::default()
//! };
//! let report = fftw_age::generate(&transform, "wisdom", &options)?;
//! assert!(report.path.ends_with("fftw_omp_cif_64x64x64_m.wisdom"));
//! # Ok::<(), fftw_age::Error>(())
//! ```
//!
//! # Optional features
//! -  **`omp`** - Link FFTW's OpenMP threads library (`fftw3_omp`) instead of the pthreads one
//!    (`fftw3_threads`).

mod error;
pub mod naming;
mod plan;
mod threads;
mod transform;
mod wisdom;

pub use error::*;
pub use naming::{parse_wisdom_file_name, wisdom_file_name, wisdom_path};
pub use plan::{InPlacePlan, Planner};
pub use threads::{cleanup, init_threads, resolve_threads, THREADS_ENV};
pub use transform::*;
pub use wisdom::*;
