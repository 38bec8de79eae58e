//! Links FFTW's threaded planner.
//!
//! `fftw-sys` only links the serial `fftw3` library, while `fftw_init_threads` and friends live
//! in a separate library: `fftw3_threads` (pthreads) by default, or `fftw3_omp` with the `omp`
//! feature.
//!
//! # Environment Variables
//!
//! - `FFTW_LIB_DIR`: extra directory to search for the FFTW libraries (optional)

fn main() {
    println!("cargo:rerun-if-env-changed=FFTW_LIB_DIR");
    if let Ok(dir) = std::env::var("FFTW_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir);
    }

    if std::env::var_os("CARGO_FEATURE_OMP").is_some() {
        println!("cargo:rustc-link-lib=fftw3_omp");
        println!("cargo:rustc-link-lib=gomp");
    } else {
        println!("cargo:rustc-link-lib=fftw3_threads");
        println!("cargo:rustc-link-lib=pthread");
    }
}
