//! Single conversion command

use crate::LowerArgs;
use anyhow::{Context, Result};
use tracing::{info, trace};
use vfx_mtlx::xml;

pub fn run(args: LowerArgs, verbose: bool) -> Result<()> {
    trace!(from = %args.from, to = %args.to, boundary = %args.boundary, "lower::run");

    let library = super::load_library(&args.library)?;
    let lowered = super::lower_pair(&library, &args.from, &args.to, args.boundary, args.strict)?;
    let text = xml::to_xml_string(&lowered.document)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write: {}", path.display()))?;
            info!(path = %path.display(), nodes = lowered.document.graph().len(), "document written");
            if verbose {
                println!(
                    "{} -> {}: {} nodes, {} skipped -> {}",
                    args.from,
                    args.to,
                    lowered.document.graph().len(),
                    lowered.diagnostics.len(),
                    path.display()
                );
            }
        }
        None => print!("{}", text),
    }

    Ok(())
}
