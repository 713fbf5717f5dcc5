//! Node and element naming.
//!
//! [`NameAllocator`] hands out node ids that are unique within one graph.
//! The free functions build the `mx_<src>_to_<dst>_<type>` style names used
//! for definitions and graphs.

use crate::graph::{BoundaryType, NodeId};
use std::collections::HashSet;

/// Allocates collision-free node ids for one graph under construction.
///
/// The first request for a base name returns it unchanged; later requests
/// get `_1`, `_2`, ... appended. The result depends only on the sequence of
/// requests, so two runs with the same input produce the same ids.
#[derive(Debug, Clone, Default)]
pub struct NameAllocator {
    used: HashSet<String>,
}

impl NameAllocator {
    /// Creates an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id derived from `base`.
    pub fn allocate(&mut self, base: &str) -> NodeId {
        let name = if self.used.contains(base) {
            // A suffixed candidate may itself have been requested as a base name
            (1usize..)
                .map(|i| format!("{}_{}", base, i))
                .find(|candidate| !self.used.contains(candidate))
                .unwrap_or_else(|| base.to_string())
        } else {
            base.to_string()
        };
        self.used.insert(name.clone());
        NodeId::new(name)
    }

    /// Returns true if `name` has been handed out.
    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Number of ids handed out.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// Returns true if nothing has been allocated yet.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

/// Replaces every character that is not ASCII alphanumeric or `_` with `_`.
pub fn create_valid_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Builds `mx_<src>_to_<dst>_<type>` from color space names.
pub fn transform_name(source: &str, target: &str, type_name: &str) -> String {
    format!(
        "mx_{}_to_{}_{}",
        create_valid_name(source),
        create_valid_name(target),
        type_name
    )
}

/// Element names for one generated definition/graph pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNames {
    /// Definition name (`ND_...`).
    pub nodedef: String,
    /// Graph name (`NG_...`).
    pub nodegraph: String,
    /// Node string of the definition.
    pub node: String,
    /// Documentation string.
    pub doc: String,
}

impl GraphNames {
    /// Names for a `source` to `target` conversion with the given port type.
    pub fn for_conversion(source: &str, target: &str, boundary: BoundaryType) -> Self {
        let base = transform_name(source, target, boundary.as_str());
        let node = base.strip_prefix("mx_").unwrap_or(&base).to_string();
        Self {
            nodedef: format!("ND_{}", node),
            nodegraph: format!("NG_{}", node),
            node,
            doc: format!(" Color space {} to {} transform. Generated via OCIO. ", source, target),
        }
    }

    /// Generic `colortransform_<type>` names for an unnamed conversion.
    pub fn for_boundary(boundary: BoundaryType) -> Self {
        let node = format!("colortransform_{}", boundary);
        Self {
            nodedef: format!("ND_{}", node),
            nodegraph: format!("NG_{}", node),
            node,
            doc: String::new(),
        }
    }
}

/// Names for the default (`color3`) boundary.
impl Default for GraphNames {
    fn default() -> Self {
        Self::for_boundary(BoundaryType::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_use_is_unsuffixed() {
        let mut names = NameAllocator::new();
        assert_eq!(names.allocate("matrixTransform"), "matrixTransform");
        assert_eq!(names.allocate("matrixTransform"), "matrixTransform_1");
        assert_eq!(names.allocate("matrixTransform"), "matrixTransform_2");
        assert_eq!(names.allocate("power"), "power");
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn skips_taken_suffixes() {
        let mut names = NameAllocator::new();
        names.allocate("add_1");
        names.allocate("add");
        assert_eq!(names.allocate("add"), "add_2");
        assert!(names.is_used("add_1"));
    }

    #[test]
    fn deterministic() {
        let bases = ["a", "b", "a", "a_1", "a", "b"];
        let run = || {
            let mut names = NameAllocator::new();
            bases.iter().map(|b| names.allocate(b)).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn valid_names() {
        assert_eq!(create_valid_name("ACES - ACEScg"), "ACES___ACEScg");
        assert_eq!(create_valid_name("lin_rec709"), "lin_rec709");
        assert_eq!(
            transform_name("acescg", "Linear Rec.709 (sRGB)", "color4"),
            "mx_acescg_to_Linear_Rec_709__sRGB__color4"
        );
    }

    #[test]
    fn conversion_names() {
        let names = GraphNames::for_conversion("acescg", "lin_rec709", BoundaryType::Color3);
        assert_eq!(names.nodedef, "ND_acescg_to_lin_rec709_color3");
        assert_eq!(names.nodegraph, "NG_acescg_to_lin_rec709_color3");
        assert_eq!(names.node, "acescg_to_lin_rec709_color3");
        assert!(names.doc.contains("acescg to lin_rec709"));
    }

    #[test]
    fn generic_names_follow_boundary() {
        let names = GraphNames::for_boundary(BoundaryType::Color4);
        assert_eq!(names.nodedef, "ND_colortransform_color4");
        assert_eq!(names.nodegraph, "NG_colortransform_color4");
        assert!(names.doc.is_empty());
        assert_eq!(GraphNames::default(), GraphNames::for_boundary(BoundaryType::Color3));
    }
}
