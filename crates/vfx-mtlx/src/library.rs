//! Transform lists for color-space pairs, loaded from YAML.
//!
//! A library stores, per (source, target) pair, the optimized list of
//! elementary transforms an OCIO processor reported. Transforms use OCIO's
//! YAML tags:
//!
//! ```yaml
//! name: aces-cg
//! colorspaces:
//!   - name: ACEScg
//!     aliases: [acescg, "ACES - ACEScg"]
//!   - name: Linear Rec.709 (sRGB)
//!     aliases: [lin_rec709]
//! conversions:
//!   - source: ACEScg
//!     target: lin_rec709
//!     transforms:
//!       - !MatrixTransform {matrix: [1.7051, -0.6218, -0.0833, 0, -0.1302, 1.1408, -0.0106, 0, -0.024, -0.129, 1.153, 0, 0, 0, 0, 1]}
//!       - !ExponentTransform {value: [2.2, 2.2, 2.2, 1]}
//!       - !Lut3DTransform {}
//! ```
//!
//! Tags without a lowering rule become [`ElementaryTransform::Unsupported`]
//! carrying the tag's [`TransformKind`].

use crate::error::{MtlxError, MtlxResult};
use crate::transform::{ElementaryTransform, TransformKind};
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;

/// Source of elementary transform lists for color-space pairs.
///
/// Returns [`MtlxError::NoConversion`] when the pair cannot be processed;
/// drivers treat that as "no conversion available".
pub trait TransformProvider {
    /// Ordered transform list converting `source` into `target`.
    fn transforms(&self, source: &str, target: &str) -> MtlxResult<Vec<ElementaryTransform>>;
}

/// Named color space with its aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSpaceEntry {
    /// Canonical name.
    pub name: String,
    /// Alternative names.
    pub aliases: Vec<String>,
}

impl ColorSpaceEntry {
    /// Checks name or alias, ignoring ASCII case.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

/// Transform list for one pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Source color space as written in the library.
    pub source: String,
    /// Target color space as written in the library.
    pub target: String,
    /// Ordered elementary transforms.
    pub transforms: Vec<ElementaryTransform>,
}

/// In-memory transform library.
#[derive(Debug, Clone, Default)]
pub struct TransformLibrary {
    name: String,
    colorspaces: Vec<ColorSpaceEntry>,
    conversions: Vec<Conversion>,
}

impl TransformLibrary {
    /// Creates an empty library.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Loads a library from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> MtlxResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MtlxError::LibraryNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parses a library from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> MtlxResult<Self> {
        let raw: RawLibrary = serde_yaml::from_str(yaml)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawLibrary) -> MtlxResult<Self> {
        let mut library = Self::new(raw.name.unwrap_or_default());

        for cs in raw.colorspaces.unwrap_or_default() {
            library.add_colorspace(ColorSpaceEntry {
                name: cs.name,
                aliases: cs.aliases.unwrap_or_default(),
            });
        }

        for conv in raw.conversions.unwrap_or_default() {
            let transforms = conv
                .transforms
                .unwrap_or_default()
                .into_iter()
                .map(parse_transform)
                .collect::<MtlxResult<Vec<_>>>()?;
            library.add_conversion(Conversion {
                source: conv.source,
                target: conv.target,
                transforms,
            });
        }

        Ok(library)
    }

    /// Adds a color space.
    pub fn add_colorspace(&mut self, cs: ColorSpaceEntry) {
        self.colorspaces.push(cs);
    }

    /// Adds a conversion.
    pub fn add_conversion(&mut self, conversion: Conversion) {
        self.conversions.push(conversion);
    }

    /// Library name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All color spaces.
    #[inline]
    pub fn colorspaces(&self) -> &[ColorSpaceEntry] {
        &self.colorspaces
    }

    /// All conversions in file order.
    #[inline]
    pub fn conversions(&self) -> &[Conversion] {
        &self.conversions
    }

    /// Gets a color space by name or alias.
    pub fn colorspace(&self, name: &str) -> Option<&ColorSpaceEntry> {
        self.colorspaces.iter().find(|cs| cs.matches_name(name))
    }

    /// Finds the conversion for a pair, resolving aliases on both ends.
    pub fn conversion(&self, source: &str, target: &str) -> Option<&Conversion> {
        let src = self.canonical(source);
        let dst = self.canonical(target);
        self.conversions
            .iter()
            .find(|c| self.canonical(&c.source) == src && self.canonical(&c.target) == dst)
    }

    /// Canonical lower-case name, used for comparisons only.
    fn canonical(&self, name: &str) -> String {
        self.colorspace(name)
            .map(|cs| cs.name.as_str())
            .unwrap_or(name)
            .to_ascii_lowercase()
    }
}

impl TransformProvider for TransformLibrary {
    fn transforms(&self, source: &str, target: &str) -> MtlxResult<Vec<ElementaryTransform>> {
        self.conversion(source, target)
            .map(|c| c.transforms.clone())
            .ok_or_else(|| MtlxError::NoConversion {
                source_space: source.to_string(),
                target_space: target.to_string(),
            })
    }
}

/// Converts one tagged YAML entry.
fn parse_transform(value: Value) -> MtlxResult<ElementaryTransform> {
    let tagged = match value {
        Value::Tagged(tagged) => tagged,
        other => {
            return Err(MtlxError::InvalidTransform {
                reason: format!("expected a tagged transform (e.g. !MatrixTransform), got {:?}", other),
            });
        }
    };
    let tag = tagged.tag.to_string();
    let name = tag.trim_start_matches('!').trim_start_matches('<').trim_end_matches('>');
    let body = match tagged.value {
        Value::Null => Value::Mapping(Default::default()),
        other => other,
    };

    let transform = match TransformKind::from_name(name) {
        TransformKind::Matrix => {
            let raw: RawMatrixTransform = serde_yaml::from_value(body)?;
            ElementaryTransform::Matrix {
                matrix: raw
                    .matrix
                    .unwrap_or_else(|| ElementaryTransform::IDENTITY_44.to_vec()),
                offset: raw.offset.unwrap_or_else(|| vec![0.0; 4]),
            }
        }
        TransformKind::Exponent => {
            let raw: RawExponentTransform = serde_yaml::from_value(body)?;
            ElementaryTransform::Exponent { gamma: raw.value }
        }
        TransformKind::ExponentWithLinear => {
            let raw: RawExponentWithLinearTransform = serde_yaml::from_value(body)?;
            ElementaryTransform::ExponentWithLinear {
                gamma: raw.gamma,
                offset: raw.offset,
            }
        }
        kind => ElementaryTransform::Unsupported { kind },
    };
    Ok(transform)
}

// ============================================================================
// Raw YAML structures for serde
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawLibrary {
    name: Option<String>,
    colorspaces: Option<Vec<RawColorSpace>>,
    conversions: Option<Vec<RawConversion>>,
}

#[derive(Debug, Deserialize)]
struct RawColorSpace {
    name: String,
    aliases: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawConversion {
    source: String,
    target: String,
    transforms: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct RawMatrixTransform {
    matrix: Option<Vec<f64>>,
    offset: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct RawExponentTransform {
    value: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawExponentWithLinearTransform {
    gamma: Vec<f64>,
    offset: Vec<f64>,
}
