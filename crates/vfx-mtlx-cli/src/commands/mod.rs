//! CLI command implementations

pub mod list;
pub mod lower;
pub mod batch;

use crate::alias;
use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::warn;
use vfx_mtlx::{BoundaryType, ElementaryTransform, Lowered, Lowerer, TransformLibrary, TransformProvider};

/// Load transform library from path
pub fn load_library(path: &Path) -> Result<TransformLibrary> {
    TransformLibrary::from_file(path)
        .with_context(|| format!("Failed to load library: {}", path.display()))
}

/// Look up and lower one conversion, naming elements after the preferred aliases.
pub fn lower_pair(
    library: &TransformLibrary,
    source: &str,
    target: &str,
    boundary: BoundaryType,
    strict: bool,
) -> Result<Lowered> {
    let transforms = library.transforms(source, target)?;
    lower_transforms(library, source, target, &transforms, boundary, strict)
}

/// Lower a transform list for the `source` to `target` pair.
///
/// Skipped transforms are logged by the lowering engine; with `strict` they
/// fail the pair.
pub fn lower_transforms(
    library: &TransformLibrary,
    source: &str,
    target: &str,
    transforms: &[ElementaryTransform],
    boundary: BoundaryType,
    strict: bool,
) -> Result<Lowered> {
    let lowered = Lowerer::for_conversion(
        alias::resolve(library, source),
        alias::resolve(library, target),
        boundary,
    )
    .lower(transforms)
    .with_context(|| format!("Failed to lower {} -> {}", source, target))?;

    if strict && !lowered.is_complete() {
        bail!(
            "{} -> {}: {} transform(s) have no node graph equivalent",
            source,
            target,
            lowered.diagnostics.len()
        );
    }
    if lowered.is_pass_through() && !transforms.is_empty() {
        warn!(source, target, "nothing lowered, graph is a pass-through");
    }
    Ok(lowered)
}
