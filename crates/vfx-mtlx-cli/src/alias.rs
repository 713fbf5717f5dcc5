//! Color space name resolution for generated element names.

use vfx_mtlx::{ColorSpaceEntry, TransformLibrary};

/// Picks the name used in generated element names.
///
/// The last alias without a space wins; otherwise the color space name.
pub fn preferred_name(cs: &ColorSpaceEntry) -> &str {
    cs.aliases
        .iter()
        .rev()
        .find(|a| !a.contains(' '))
        .map(String::as_str)
        .unwrap_or(&cs.name)
}

/// Resolves `name` through the library, falling back to `name` itself.
pub fn resolve<'a>(library: &'a TransformLibrary, name: &'a str) -> &'a str {
    library.colorspace(name).map(preferred_name).unwrap_or(name)
}

/// Lower-case canonical name, used as a comparison key.
pub fn canonical(library: &TransformLibrary, name: &str) -> String {
    library
        .colorspace(name)
        .map_or(name, |cs| cs.name.as_str())
        .to_ascii_lowercase()
}

/// Returns true if both names refer to the same color space.
pub fn same_space(library: &TransformLibrary, a: &str, b: &str) -> bool {
    canonical(library, a) == canonical(library, b)
}
