//! Elementary transforms produced by an optimized OCIO processor.
//!
//! A color-space conversion decomposes into a flat, ordered list of
//! elementary steps. Only a few of them have a node-graph equivalent:
//! - Matrix transforms (3x3 part of the reported 4x4)
//! - Exponent / gamma
//! - Exponent followed by an additive offset
//!
//! Everything else is carried as [`ElementaryTransform::Unsupported`] with
//! its [`TransformKind`] so the lowering step can report it.

use std::fmt;

/// Type tag of an OCIO transform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// 4x4 matrix + offset.
    Matrix,
    /// Per-channel exponent.
    Exponent,
    /// Exponent with linear segment / offset.
    ExponentWithLinear,
    /// Logarithm.
    Log,
    /// Log with affine parameters.
    LogAffine,
    /// Camera log curve.
    LogCamera,
    /// 1D lookup table.
    Lut1D,
    /// 3D lookup table.
    Lut3D,
    /// Range remapping.
    Range,
    /// ASC CDL.
    Cdl,
    /// Fixed function (ACES specific).
    FixedFunction,
    /// Exposure/contrast.
    ExposureContrast,
    /// Grading primary (lift/gamma/gain).
    GradingPrimary,
    /// Grading RGB curves.
    GradingRgbCurve,
    /// Grading tone.
    GradingTone,
    /// Allocation.
    Allocation,
    /// Builtin transform by name.
    Builtin,
    /// Any kind this crate does not know about.
    Other(String),
}

impl TransformKind {
    /// Maps an OCIO transform type name (e.g. `MatrixTransform`) to a kind.
    ///
    /// The `Transform` suffix is optional.
    pub fn from_name(name: &str) -> Self {
        let short = name.strip_suffix("Transform").unwrap_or(name);
        match short {
            "Matrix" => Self::Matrix,
            "Exponent" => Self::Exponent,
            "ExponentWithLinear" => Self::ExponentWithLinear,
            "Log" => Self::Log,
            "LogAffine" => Self::LogAffine,
            "LogCamera" => Self::LogCamera,
            "Lut1D" => Self::Lut1D,
            "Lut3D" => Self::Lut3D,
            "Range" => Self::Range,
            "CDL" | "Cdl" => Self::Cdl,
            "FixedFunction" => Self::FixedFunction,
            "ExposureContrast" => Self::ExposureContrast,
            "GradingPrimary" => Self::GradingPrimary,
            "GradingRGBCurve" | "GradingRgbCurve" => Self::GradingRgbCurve,
            "GradingTone" => Self::GradingTone,
            "Allocation" => Self::Allocation,
            "Builtin" => Self::Builtin,
            _ => Self::Other(name.to_string()),
        }
    }

    /// Returns the OCIO transform type name.
    pub fn name(&self) -> &str {
        match self {
            Self::Matrix => "MatrixTransform",
            Self::Exponent => "ExponentTransform",
            Self::ExponentWithLinear => "ExponentWithLinearTransform",
            Self::Log => "LogTransform",
            Self::LogAffine => "LogAffineTransform",
            Self::LogCamera => "LogCameraTransform",
            Self::Lut1D => "Lut1DTransform",
            Self::Lut3D => "Lut3DTransform",
            Self::Range => "RangeTransform",
            Self::Cdl => "CDLTransform",
            Self::FixedFunction => "FixedFunctionTransform",
            Self::ExposureContrast => "ExposureContrastTransform",
            Self::GradingPrimary => "GradingPrimaryTransform",
            Self::GradingRgbCurve => "GradingRGBCurveTransform",
            Self::GradingTone => "GradingToneTransform",
            Self::Allocation => "AllocationTransform",
            Self::Builtin => "BuiltinTransform",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One step of a color-space conversion.
///
/// Parameters are stored the way the color engine reports them; the
/// lowering step checks their shape and slices out the RGB part.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementaryTransform {
    /// Linear map plus offset.
    Matrix {
        /// Row-major coefficients: 16 (4x4) or 9 (3x3).
        matrix: Vec<f64>,
        /// RGBA or RGB offset.
        offset: Vec<f64>,
    },

    /// `pow(x, gamma)` per channel.
    Exponent {
        /// Per-channel exponents [R, G, B(, A)].
        gamma: Vec<f64>,
    },

    /// `pow(x, gamma) + offset` per channel.
    ExponentWithLinear {
        /// Per-channel exponents [R, G, B(, A)].
        gamma: Vec<f64>,
        /// Per-channel offsets [R, G, B(, A)].
        offset: Vec<f64>,
    },

    /// A step with no lowering rule.
    Unsupported {
        /// Which kind of transform was dropped.
        kind: TransformKind,
    },
}

impl ElementaryTransform {
    /// 4x4 identity in row-major order.
    pub const IDENTITY_44: [f64; 16] = [
        1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
    ];

    /// Creates a matrix transform from a 4x4 matrix and RGBA offset.
    pub fn matrix(matrix: [f64; 16], offset: [f64; 4]) -> Self {
        Self::Matrix {
            matrix: matrix.to_vec(),
            offset: offset.to_vec(),
        }
    }

    /// Creates an identity matrix transform.
    pub fn identity() -> Self {
        Self::matrix(Self::IDENTITY_44, [0.0; 4])
    }

    /// Creates an exponent transform.
    pub fn exponent(gamma: [f64; 3]) -> Self {
        Self::Exponent {
            gamma: gamma.to_vec(),
        }
    }

    /// Creates an exponent-with-offset transform.
    pub fn exponent_with_linear(gamma: [f64; 3], offset: [f64; 3]) -> Self {
        Self::ExponentWithLinear {
            gamma: gamma.to_vec(),
            offset: offset.to_vec(),
        }
    }

    /// Creates a placeholder for a transform that cannot be lowered.
    pub fn unsupported(kind: TransformKind) -> Self {
        Self::Unsupported { kind }
    }

    /// Returns the kind tag of this transform.
    pub fn kind(&self) -> TransformKind {
        match self {
            Self::Matrix { .. } => TransformKind::Matrix,
            Self::Exponent { .. } => TransformKind::Exponent,
            Self::ExponentWithLinear { .. } => TransformKind::ExponentWithLinear,
            Self::Unsupported { kind } => kind.clone(),
        }
    }

    /// Returns true if the lowering engine has a rule for this transform.
    #[inline]
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported { .. })
    }
}

/// Extracts the row-major 3x3 part of a 4x4 (or passes a 3x3 through).
///
/// Returns `None` for any other coefficient count.
pub fn reduce_to_3x3(matrix: &[f64]) -> Option<[f64; 9]> {
    match matrix.len() {
        16 => Some([
            matrix[0], matrix[1], matrix[2],
            matrix[4], matrix[5], matrix[6],
            matrix[8], matrix[9], matrix[10],
        ]),
        9 => {
            let mut m = [0.0; 9];
            m.copy_from_slice(matrix);
            Some(m)
        }
        _ => None,
    }
}

/// Returns the first three channels, dropping alpha.
pub fn rgb(values: &[f64]) -> Option<[f64; 3]> {
    match values {
        [r, g, b, ..] => Some([*r, *g, *b]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_name() {
        assert_eq!(TransformKind::from_name("MatrixTransform"), TransformKind::Matrix);
        assert_eq!(TransformKind::from_name("Lut3D"), TransformKind::Lut3D);
        assert_eq!(TransformKind::from_name("CDLTransform"), TransformKind::Cdl);
        assert_eq!(
            TransformKind::from_name("SpectralTransform"),
            TransformKind::Other("SpectralTransform".into())
        );
    }

    #[test]
    fn kind_name_roundtrips_known_kinds() {
        for kind in [TransformKind::Range, TransformKind::GradingPrimary, TransformKind::Lut1D] {
            assert_eq!(TransformKind::from_name(kind.name()), kind);
        }
    }

    #[test]
    fn reduce_drops_fourth_row_and_column() {
        let m: Vec<f64> = (1..=16).map(f64::from).collect();
        assert_eq!(
            reduce_to_3x3(&m),
            Some([1.0, 2.0, 3.0, 5.0, 6.0, 7.0, 9.0, 10.0, 11.0])
        );
    }

    #[test]
    fn reduce_rejects_odd_sizes() {
        assert_eq!(reduce_to_3x3(&[1.0; 12]), None);
        assert_eq!(reduce_to_3x3(&[]), None);
    }

    #[test]
    fn rgb_drops_alpha() {
        assert_eq!(rgb(&[2.2, 2.4, 2.6, 1.0]), Some([2.2, 2.4, 2.6]));
        assert_eq!(rgb(&[1.0, 2.0]), None);
    }

    #[test]
    fn unsupported_kind() {
        let t = ElementaryTransform::unsupported(TransformKind::Lut3D);
        assert!(!t.is_supported());
        assert_eq!(t.kind(), TransformKind::Lut3D);
        assert!(ElementaryTransform::identity().is_supported());
    }
}
