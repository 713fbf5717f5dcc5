//! MaterialX node graphs from OCIO color-space conversions.
//!
//! An optimized OCIO processor reports a conversion as a flat list of
//! elementary transforms. This crate lowers such a list into a MaterialX
//! `nodedef` + `nodegraph` pair:
//! - Matrix transforms become `transform` nodes (3x3 part only)
//! - Exponents become `power` nodes
//! - Exponent-with-offset becomes `power` followed by `add`
//! - Anything else is skipped and reported as a [`Diagnostic`]
//!
//! # Quick Start
//!
//! ```
//! use vfx_mtlx::{BoundaryType, ElementaryTransform, Lowerer, xml};
//!
//! let transforms = [
//!     ElementaryTransform::identity(),
//!     ElementaryTransform::exponent_with_linear([2.4; 3], [0.055; 3]),
//! ];
//!
//! let lowered = Lowerer::for_conversion("acescg", "lin_rec709", BoundaryType::Color3)
//!     .lower(&transforms)
//!     .unwrap();
//! assert!(lowered.is_complete());
//!
//! let text = xml::to_xml_string(&lowered.document).unwrap();
//! assert!(text.contains("ND_acescg_to_lin_rec709_color3"));
//! ```
//!
//! # Transform Libraries
//!
//! Transform lists can be stored per color-space pair in a YAML
//! [`TransformLibrary`]:
//!
//! ```ignore
//! use vfx_mtlx::{TransformLibrary, TransformProvider, lower, BoundaryType};
//!
//! let library = TransformLibrary::from_file("aces.yaml")?;
//! let transforms = library.transforms("ACEScg", "lin_rec709")?;
//! let lowered = lower(&transforms, BoundaryType::Color4)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod transform;
mod graph;
mod names;
mod lower;
mod library;

pub mod xml;

// Re-exports
pub use error::{MtlxError, MtlxResult};
pub use transform::{reduce_to_3x3, ElementaryTransform, TransformKind};
pub use graph::{
    BoundaryType, Definition, GraphOutput, Input, InputBinding, InterfaceInput, InterfaceOutput,
    Node, NodeGraph, NodeGraphDocument, NodeId, Value, ValueType,
};
pub use names::{create_valid_name, transform_name, GraphNames, NameAllocator};
pub use lower::{
    lower, Diagnostic, Lowered, Lowerer, DEFAULT_INPUT_NAME, INTERNAL_TYPE, NODE_GROUP, OUTPUT_NAME,
};
pub use library::{ColorSpaceEntry, Conversion, TransformLibrary, TransformProvider};
