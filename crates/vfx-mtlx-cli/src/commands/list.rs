//! Library listing command

use crate::ListArgs;
use anyhow::Result;
use std::fmt::{self, Write};
use tracing::trace;
use vfx_mtlx::TransformLibrary;

pub fn run(args: ListArgs, verbose: bool) -> Result<()> {
    trace!(library = %args.library.display(), "list::run");

    let library = super::load_library(&args.library)?;
    if verbose {
        println!(
            "Library '{}': {} color spaces, {} conversions\n",
            library.name(),
            library.colorspaces().len(),
            library.conversions().len()
        );
    }
    print!("{}", render(&library)?);
    Ok(())
}

/// Markdown tables of color spaces and conversions.
fn render(library: &TransformLibrary) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "| Color space | Aliases |")?;
    writeln!(out, "|---|---|")?;
    for cs in library.colorspaces() {
        writeln!(out, "| {} | {} |", cs.name, cs.aliases.join(", "))?;
    }

    writeln!(out)?;
    writeln!(out, "| Source | Target | Transforms |")?;
    writeln!(out, "|---|---|---|")?;
    for conv in library.conversions() {
        let kinds: Vec<String> = conv
            .transforms
            .iter()
            .map(|t| {
                if t.is_supported() {
                    t.kind().to_string()
                } else {
                    format!("{} (skipped)", t.kind())
                }
            })
            .collect();
        let kinds = if kinds.is_empty() {
            "-".to_string()
        } else {
            kinds.join(", ")
        };
        writeln!(out, "| {} | {} | {} |", conv.source, conv.target, kinds)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables() {
        let library = TransformLibrary::from_yaml_str(
            r#"
colorspaces:
  - name: ACEScg
    aliases: [acescg]
  - name: Raw
conversions:
  - source: ACEScg
    target: Raw
    transforms:
      - !MatrixTransform {}
      - !Lut3DTransform {}
  - source: Raw
    target: ACEScg
"#,
        )
        .unwrap();

        let text = render(&library).unwrap();
        assert!(text.contains("| ACEScg | acescg |"));
        assert!(text.contains("| Raw |  |"));
        assert!(text.contains("| ACEScg | Raw | MatrixTransform, Lut3DTransform (skipped) |"));
        assert!(text.contains("| Raw | ACEScg | - |"));
    }
}
