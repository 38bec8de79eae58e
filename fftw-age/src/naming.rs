//! Wisdom file naming.
//!
//! A wisdom file is named `fftw_omp_<tag>.wisdom`, where the tag is
//! `<type><arrangement><direction>_<dimx>x<dimy>x<dimz>_<rigour>`, e.g.
//! `fftw_omp_cif_64x64x64_m.wisdom`.

use crate::error::{Error, Result};
use crate::transform::Transform;
use std::path::{Path, PathBuf};

pub const PREFIX: &str = "fftw_omp_";
pub const SUFFIX: &str = ".wisdom";

pub fn wisdom_file_name(transform: &Transform) -> String {
    format!("{}{}{}", PREFIX, transform.tag(), SUFFIX)
}

pub fn wisdom_path(dir: impl AsRef<Path>, transform: &Transform) -> PathBuf {
    dir.as_ref().join(wisdom_file_name(transform))
}

/// Recover the transform a wisdom file was generated for from its file name.
///
/// The transform is not validated.
pub fn parse_wisdom_file_name(name: &str) -> Result<Transform> {
    let bad = || Error::FileName(name.to_string());

    let tag = name
        .strip_prefix(PREFIX)
        .and_then(|s| s.strip_suffix(SUFFIX))
        .ok_or_else(bad)?;

    let mut parts = tag.split('_');
    let (spec, dims, rigour) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(spec), Some(dims), Some(rigour), None) => (spec, dims, rigour),
        _ => return Err(bad()),
    };

    let codes: Vec<String> = spec.chars().map(String::from).collect();
    let (kind, arrangement, direction) = match codes.as_slice() {
        [k, a, d] => (k, a, d),
        _ => return Err(bad()),
    };

    let mut dims_iter = dims.split('x').map(|n| n.parse::<usize>().map_err(|_| bad()));
    let dims = match (
        dims_iter.next(),
        dims_iter.next(),
        dims_iter.next(),
        dims_iter.next(),
    ) {
        (Some(x), Some(y), Some(z), None) => [x?, y?, z?],
        _ => return Err(bad()),
    };

    let transform = Transform::new(
        kind.parse()?,
        arrangement.parse()?,
        direction.parse()?,
        rigour.parse()?,
        dims,
    );
    // Only the canonical spelling names a transform: no '+' signs or leading zeros.
    if wisdom_file_name(&transform) != name {
        return Err(bad());
    }
    Ok(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Direction, Rigour};

    #[test]
    fn name() {
        let t = Transform::in_place_c2c(Direction::Forward, Rigour::Measure, [64, 64, 64]);
        assert_eq!(wisdom_file_name(&t), "fftw_omp_cif_64x64x64_m.wisdom");
        assert_eq!(
            wisdom_path("/tmp/wisdom", &t),
            Path::new("/tmp/wisdom/fftw_omp_cif_64x64x64_m.wisdom")
        );
    }

    #[test]
    fn parse_inverts_name() {
        let t = Transform::in_place_c2c(Direction::Backward, Rigour::Patient, [128, 3, 1]);
        assert_eq!(parse_wisdom_file_name(&wisdom_file_name(&t)).unwrap(), t);
    }

    #[test]
    fn parse_rejects() {
        for name in &[
            "cif_4x4x4_m.wisdom",
            "fftw_omp_cif_4x4x4_m",
            "fftw_omp_cif_4x4_m.wisdom",
            "fftw_omp_cif_4x4x4x4_m.wisdom",
            "fftw_omp_ci_4x4x4_m.wisdom",
            "fftw_omp_cifx_4x4x4_m.wisdom",
            "fftw_omp_cif_4x4x4_m_extra.wisdom",
            "fftw_omp_cif_4x+4x4_m.wisdom",
            "fftw_omp_cif_4xx4_m.wisdom",
            "fftw_omp_cif_04x4x4_m.wisdom",
            "fftw_omp_cif_4x4x00_m.wisdom",
        ] {
            assert!(
                matches!(parse_wisdom_file_name(name), Err(Error::FileName(_))),
                "{}",
                name
            );
        }
        assert!(matches!(
            parse_wisdom_file_name("fftw_omp_cqf_4x4x4_m.wisdom"),
            Err(Error::InvalidCode { what: "arrangement", .. })
        ));
    }
}
