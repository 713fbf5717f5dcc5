//! Batch generation command

use crate::{alias, BatchArgs};
use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};
use vfx_mtlx::{xml, BoundaryType, Conversion, TransformLibrary};

pub fn run(args: BatchArgs, verbose: bool) -> Result<()> {
    trace!(library = %args.library.display(), target = ?args.target, "batch::run");

    let library = super::load_library(&args.library)?;
    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create: {}", args.output_dir.display()))?;

    let pairs = select(&library, args.target.as_deref());
    if pairs.is_empty() {
        bail!("No conversions to generate");
    }
    info!(pairs = pairs.len(), "Starting batch generation");

    // Lower pairs in parallel
    let results: Vec<Result<PathBuf>> = pairs
        .par_iter()
        .map(|conv| generate(&library, conv, &args.output_dir, args.boundary, args.strict))
        .collect();

    let mut success = 0;
    let mut failed = 0;
    for r in results {
        match r {
            Ok(path) => {
                success += 1;
                if verbose {
                    println!("Wrote {}", path.display());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("Error: {:#}", e);
            }
        }
    }

    info!(success, failed, "Batch generation complete");
    println!("Generated: {} success, {} failed", success, failed);

    if failed > 0 {
        bail!("{} conversions failed", failed);
    }
    Ok(())
}

/// Conversions to generate: optionally filtered by target, identity pairs
/// skipped, and only the first entry kept when several resolve to one pair.
fn select<'a>(library: &'a TransformLibrary, target: Option<&str>) -> Vec<&'a Conversion> {
    let mut seen = HashSet::new();
    library
        .conversions()
        .iter()
        .filter(|c| target.is_none_or(|t| alias::same_space(library, &c.target, t)))
        .filter(|c| {
            let key = (
                alias::canonical(library, &c.source),
                alias::canonical(library, &c.target),
            );
            if key.0 == key.1 {
                debug!(source = %c.source, "identity pair skipped");
                return false;
            }
            if !seen.insert(key) {
                warn!(source = %c.source, target = %c.target, "duplicate conversion skipped");
                return false;
            }
            true
        })
        .collect()
}

fn generate(
    library: &TransformLibrary,
    conv: &Conversion,
    output_dir: &Path,
    boundary: BoundaryType,
    strict: bool,
) -> Result<PathBuf> {
    let lowered = super::lower_transforms(
        library,
        &conv.source,
        &conv.target,
        &conv.transforms,
        boundary,
        strict,
    )?;
    let path = output_dir.join(format!("{}.mtlx", lowered.document.definition().name));
    let text = xml::to_xml_string(&lowered.document)?;
    std::fs::write(&path, text).with_context(|| format!("Failed to write: {}", path.display()))?;
    Ok(path)
}
