//! Transform descriptions and validation against the supported subset.

use crate::error::{Error, Result};
use fftw::types::{Flag, Sign};
use libc::c_int;
use std::convert::TryFrom;
use std::fmt;
use std::mem;
use std::str::FromStr;

macro_rules! code_enum {
    {
        $(#[$attr:meta])*
        $name:ident, $what:literal {
            $($(#[$vattr:meta])* $variant:ident => $code:literal,)*
        }
    } => {
        $(#[$attr])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vattr])* $variant,)*
        }

        impl $name {
            /// The one-letter code used on the command line and in wisdom file names.
            pub fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)*
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($code => Ok(Self::$variant),)*
                    _ => Err(Error::InvalidCode {
                        what: $what,
                        code: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    }
}

code_enum! {
    /// Input and output domains of a transform.
    TransformType, "type" {
        /// Complex-to-complex.
        C2C => "c",
        /// Real-to-complex.
        R2C => "f",
        /// Complex-to-real.
        C2R => "b",
        /// Real-to-real.
        R2R => "r",
    }
}

code_enum! {
    /// Whether a transform reads and writes the same buffer.
    Arrangement, "arrangement" {
        InPlace => "i",
        OutOfPlace => "o",
    }
}

code_enum! {
    /// Transform direction.
    Direction, "direction" {
        Forward => "f",
        Backward => "b",
    }
}

code_enum! {
    /// Planner rigour.
    ///
    /// See <https://www.fftw.org/fftw3_doc/Planner-Flags.html>.
    Rigour, "planner" {
        Estimate => "e",
        Measure => "m",
        Patient => "p",
        Exhaustive => "x",
    }
}

impl Direction {
    pub fn sign(self) -> Sign {
        match self {
            Self::Forward => Sign::Forward,
            Self::Backward => Sign::Backward,
        }
    }
}

impl Rigour {
    pub fn flag(self) -> Flag {
        match self {
            Self::Estimate => Flag::ESTIMATE,
            Self::Measure => Flag::MEASURE,
            Self::Patient => Flag::PATIENT,
            Self::Exhaustive => Flag::EXHAUSIVE,
        }
    }
}

/// A 3D transform for which wisdom may be generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Transform {
    pub kind: TransformType,
    pub arrangement: Arrangement,
    pub direction: Direction,
    pub rigour: Rigour,
    pub dims: [usize; 3],
}

impl Transform {
    /// Describe a transform.  The description is not checked until [`validate`](Self::validate).
    pub fn new(
        kind: TransformType,
        arrangement: Arrangement,
        direction: Direction,
        rigour: Rigour,
        dims: [usize; 3],
    ) -> Self {
        Self {
            kind,
            arrangement,
            direction,
            rigour,
            dims,
        }
    }

    /// An in-place complex-to-complex transform, the only kind currently supported.
    pub fn in_place_c2c(direction: Direction, rigour: Rigour, dims: [usize; 3]) -> Self {
        Self::new(
            TransformType::C2C,
            Arrangement::InPlace,
            direction,
            rigour,
            dims,
        )
    }

    /// Number of elements in the transform grid.
    ///
    /// Saturates on overflow; [`validate`](Self::validate) rejects such grids.
    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&n| n == 0)
    }

    fn checked_len(&self) -> Option<usize> {
        self.dims
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
    }

    /// Size in bytes of the double precision complex grid, if it is addressable.
    pub fn bytes(&self) -> Option<usize> {
        self.checked_len()?
            .checked_mul(mem::size_of::<[f64; 2]>())
            .filter(|&n| n <= isize::MAX as usize)
    }

    /// The dimensions as FFTW expects them.
    pub(crate) fn fftw_dims(&self) -> Result<[c_int; 3]> {
        let dim = |n: usize| {
            c_int::try_from(n).map_err(|_| self.invalid_dims("dimension does not fit in a C int"))
        };
        Ok([dim(self.dims[0])?, dim(self.dims[1])?, dim(self.dims[2])?])
    }

    /// Identifying tag, e.g. `cif_64x64x64_m`.
    pub fn tag(&self) -> String {
        format!(
            "{}{}{}_{}x{}x{}_{}",
            self.kind,
            self.arrangement,
            self.direction,
            self.dims[0],
            self.dims[1],
            self.dims[2],
            self.rigour
        )
    }

    /// Check that the transform lies within the supported subset.
    pub fn validate(&self) -> Result<()> {
        if self.kind != TransformType::C2C {
            return Err(self.unsupported(
                "only complex-to-complex transforms are currently supported",
            ));
        }
        if self.arrangement != Arrangement::InPlace {
            return Err(self.unsupported("only in-place transforms are supported"));
        }
        match self.rigour {
            Rigour::Measure | Rigour::Patient => {}
            _ => {
                return Err(self.unsupported(
                    "only FFTW_MEASURE and FFTW_PATIENT planners are currently supported",
                ))
            }
        }

        if self.is_empty() {
            return Err(self.invalid_dims("every dimension must be positive"));
        }
        self.fftw_dims()?;
        if self.bytes().is_none() {
            return Err(self.invalid_dims("grid size overflows"));
        }
        Ok(())
    }

    fn unsupported(&self, reason: &'static str) -> Error {
        Error::Unsupported {
            tag: self.tag(),
            reason,
        }
    }

    fn invalid_dims(&self, reason: &'static str) -> Error {
        Error::InvalidDimensions {
            dims: self.dims,
            reason,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.tag())
    }
}
