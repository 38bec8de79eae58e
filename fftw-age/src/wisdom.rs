//! Wisdom generation and verification.

use crate::error::{Error, Result};
use crate::naming;
use crate::plan::Planner;
use crate::transform::Transform;
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

/// What to do when the wisdom file already exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IfExists {
    Overwrite,
    Skip,
    Fail,
}

impl Default for IfExists {
    fn default() -> Self {
        IfExists::Overwrite
    }
}

impl FromStr for IfExists {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "overwrite" => Ok(IfExists::Overwrite),
            "skip" => Ok(IfExists::Skip),
            "fail" => Ok(IfExists::Fail),
            _ => Err(Error::InvalidCode {
                what: "if-exists policy",
                code: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for IfExists {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            IfExists::Overwrite => "overwrite",
            IfExists::Skip => "skip",
            IfExists::Fail => "fail",
        })
    }
}

/// Options for [`generate`].
#[derive(Clone, Debug)]
pub struct Options {
    /// Planner threads.
    pub threads: usize,
    pub if_exists: IfExists,
    /// Re-import the written file and check that it covers the transform.
    pub verify: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            threads: 1,
            if_exists: IfExists::default(),
            verify: false,
        }
    }
}

/// The outcome of [`generate`].
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub path: PathBuf,
    pub tag: String,
    pub threads: usize,
    /// The file already existed and was left untouched.
    pub skipped: bool,
    pub verified: bool,
    #[serde(serialize_with = "as_secs")]
    pub planning_time: Duration,
}

fn as_secs<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Plan `transform` and export the resulting wisdom into `dir`.
///
/// The file is named by [`naming::wisdom_file_name`] and contains only the wisdom for this
/// transform.  The wisdom is written to a temporary sibling first and renamed into place, so
/// an existing file is never left truncated.
pub fn generate(transform: &Transform, dir: impl AsRef<Path>, options: &Options) -> Result<Report> {
    transform.validate()?;
    if options.threads == 0 {
        return Err(Error::InvalidThreads(options.threads.to_string()));
    }

    let dir = dir.as_ref();
    let path = naming::wisdom_path(dir, transform);
    let mut report = Report {
        path: path.clone(),
        tag: transform.tag(),
        threads: options.threads,
        skipped: false,
        verified: false,
        planning_time: Duration::default(),
    };

    if path.exists() {
        match options.if_exists {
            IfExists::Overwrite => debug!("overwriting {}", path.display()),
            IfExists::Skip => {
                warn!("FFTW wisdom file exists, skipping: {}", path.display());
                report.skipped = true;
                if options.verify {
                    verify(transform, &path, options.threads)?;
                    report.verified = true;
                }
                return Ok(report);
            }
            IfExists::Fail => return Err(Error::Exists { path }),
        }
    }

    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let staging = staging_path(&path);
    {
        let mut planner = Planner::lock()?;
        planner.forget();

        let start = Instant::now();
        let plan = planner.plan(transform, options.threads)?;
        report.planning_time = start.elapsed();
        drop(plan);
        debug!(
            "planned {} in {:.3}s",
            transform,
            report.planning_time.as_secs_f64()
        );

        // The staging name is shared by every caller in this process; keep the lock until it
        // has been renamed away.
        let staged = planner
            .export(&staging)
            .and_then(|()| fs::rename(&staging, &path).map_err(|e| Error::io(&path, e)));
        if let Err(e) = staged {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }
    }
    info!("FFTW wisdom file has been exported: {}", path.display());

    if options.verify {
        verify(transform, &path, options.threads)?;
        report.verified = true;
    }
    Ok(report)
}

/// Check that the wisdom stored at `path` covers `transform` when planned with `threads`.
///
/// Any wisdom accumulated in the process is discarded first.
pub fn verify(transform: &Transform, path: impl AsRef<Path>, threads: usize) -> Result<()> {
    transform.validate()?;
    if threads == 0 {
        return Err(Error::InvalidThreads(threads.to_string()));
    }
    let path = path.as_ref();

    let mut planner = Planner::lock()?;
    planner.forget();
    planner.import(path)?;
    let covered = planner.probe(transform, threads)?.is_some();
    planner.forget();

    if covered {
        info!("FFTW wisdom file covers {}: {}", transform, path.display());
        Ok(())
    } else {
        Err(Error::NotCovered {
            tag: transform.tag(),
            path: path.to_path_buf(),
        })
    }
}

/// Verify a wisdom file against the transform encoded in its name.
pub fn verify_file(path: impl AsRef<Path>, threads: usize) -> Result<Transform> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::FileName(path.display().to_string()))?;
    let transform = naming::parse_wisdom_file_name(name)?;
    verify(&transform, path, threads)?;
    Ok(transform)
}

/// Load the wisdom stored at `path` into the process, in addition to any already loaded.
pub fn import(path: impl AsRef<Path>) -> Result<()> {
    Planner::lock()?.import(path.as_ref())
}

/// Write all wisdom accumulated in the process to `path`.
pub fn export(path: impl AsRef<Path>) -> Result<()> {
    Planner::lock()?.export(path.as_ref())
}

/// Discard all wisdom accumulated in the process.
pub fn forget() -> Result<()> {
    Planner::lock()?.forget();
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Direction, Rigour};

    #[test]
    fn if_exists_parse() {
        for policy in &[IfExists::Overwrite, IfExists::Skip, IfExists::Fail] {
            assert_eq!(policy.to_string().parse::<IfExists>().unwrap(), *policy);
        }
        assert!("clobber".parse::<IfExists>().is_err());
        assert_eq!(IfExists::default(), IfExists::Overwrite);
    }

    #[test]
    fn staging_is_sibling() {
        let path = Path::new("/tmp/w/fftw_omp_cif_4x4x4_m.wisdom");
        let staging = staging_path(path);
        assert_eq!(staging.parent(), path.parent());
        assert_ne!(staging, path);
    }

    #[test]
    fn invalid_transform_never_plans() {
        let t = Transform::in_place_c2c(Direction::Forward, Rigour::Estimate, [4, 4, 4]);
        let dir = std::env::temp_dir().join("fftw-age-never-created");
        assert!(matches!(
            generate(&t, &dir, &Options::default()),
            Err(Error::Unsupported { .. })
        ));
        assert!(!naming::wisdom_path(&dir, &t).exists());
    }

    #[test]
    fn zero_threads() {
        let t = Transform::in_place_c2c(Direction::Forward, Rigour::Measure, [4, 4, 4]);
        let options = Options {
            threads: 0,
            ..Options::default()
        };
        assert!(matches!(
            generate(&t, std::env::temp_dir(), &options),
            Err(Error::InvalidThreads(_))
        ));
    }
}
