//! Lowering of an elementary transform list into a node graph.
//!
//! The transform list has an implicit sequential data dependency; lowering
//! makes it explicit. Every supported transform becomes one or two nodes
//! wired to the output of the previous step, framed by two `convert` nodes
//! that adapt the interface type to the internal `vector3` and back:
//!
//! ```text
//! in -> asVec -> [matrixTransform | exponentTransform (-> exponentOffset)]* -> asColor -> out
//! ```
//!
//! Transforms without a node equivalent (LUTs, ranges, grading, ...) are
//! skipped and reported as [`Diagnostic`]s. A result with diagnostics
//! computes something different from the source pipeline; callers that
//! need full fidelity must check [`Lowered::is_complete`].
//!
//! # Example
//!
//! ```
//! use vfx_mtlx::{lower, BoundaryType, ElementaryTransform};
//!
//! let transforms = [
//!     ElementaryTransform::identity(),
//!     ElementaryTransform::exponent([2.2, 2.2, 2.2]),
//! ];
//! let lowered = lower(&transforms, BoundaryType::Color3).unwrap();
//!
//! assert!(lowered.is_complete());
//! assert_eq!(lowered.document.graph().len(), 4);
//! ```

use crate::error::{MtlxError, MtlxResult};
use crate::graph::{
    BoundaryType, Definition, GraphOutput, Input, InputBinding, InterfaceInput, InterfaceOutput,
    Node, NodeGraph, NodeGraphDocument, NodeId, Value, ValueType,
};
use crate::names::{GraphNames, NameAllocator};
use crate::transform::{reduce_to_3x3, rgb, ElementaryTransform, TransformKind};
use std::fmt;
use tracing::{debug, trace, warn};

/// Type all nodes between the boundary converts operate on.
pub const INTERNAL_TYPE: ValueType = ValueType::Vector3;

/// Default name of the interface input.
pub const DEFAULT_INPUT_NAME: &str = "in";

/// Name of the interface output.
pub const OUTPUT_NAME: &str = "out";

/// Node group of generated definitions.
pub const NODE_GROUP: &str = "colortransform";

/// Base names handed to the allocator.
mod base {
    pub const INPUT_BRIDGE: &str = "asVec";
    pub const OUTPUT_BRIDGE: &str = "asColor";
    pub const MATRIX: &str = "matrixTransform";
    pub const EXPONENT: &str = "exponentTransform";
    pub const EXPONENT_OFFSET: &str = "exponentOffset";
}

/// A transform that was dropped during lowering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Kind of the dropped transform.
    pub kind: TransformKind,
    /// Index in the input sequence.
    pub position: usize,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transform[{}]: {} has no node graph equivalent and was skipped",
            self.position, self.kind
        )
    }
}

/// Result of lowering: the document plus every dropped transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Lowered {
    /// The generated document.
    pub document: NodeGraphDocument,
    /// Dropped transforms, in input order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Lowered {
    /// Returns true if no transform was dropped.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns true if the output convert reads the input convert directly.
    pub fn is_pass_through(&self) -> bool {
        let graph = self.document.graph();
        let (Some(first), Some(out)) = (
            graph.nodes().first(),
            self.document.output().node().and_then(|id| graph.node(id)),
        ) else {
            return false;
        };
        out.upstream("in") == Some(&first.id)
    }

    /// Splits into document and diagnostics.
    pub fn into_parts(self) -> (NodeGraphDocument, Vec<Diagnostic>) {
        (self.document, self.diagnostics)
    }
}

/// Configurable lowering entry point.
#[derive(Debug, Clone, Default)]
pub struct Lowerer {
    boundary: BoundaryType,
    names: GraphNames,
    input_name: String,
}

impl Lowerer {
    /// Creates a lowerer for the given interface type with default names.
    pub fn new(boundary: BoundaryType) -> Self {
        Self {
            boundary,
            names: GraphNames::for_boundary(boundary),
            input_name: DEFAULT_INPUT_NAME.to_string(),
        }
    }

    /// Creates a lowerer named after a `source` to `target` conversion.
    pub fn for_conversion(source: &str, target: &str, boundary: BoundaryType) -> Self {
        Self::new(boundary).with_names(GraphNames::for_conversion(source, target, boundary))
    }

    /// Sets definition and graph names.
    pub fn with_names(mut self, names: GraphNames) -> Self {
        self.names = names;
        self
    }

    /// Sets the interface input name.
    pub fn input_name(mut self, name: impl Into<String>) -> Self {
        self.input_name = name.into();
        self
    }

    /// Lowers `transforms` into a fresh document.
    ///
    /// Fails only on malformed parameters; unsupported transforms become
    /// diagnostics.
    pub fn lower(&self, transforms: &[ElementaryTransform]) -> MtlxResult<Lowered> {
        let port_type = self.boundary.value_type();
        let mut builder = GraphBuilder::new(NodeGraph::new(
            &self.names.nodegraph,
            &self.names.nodedef,
            GraphOutput {
                name: OUTPUT_NAME.to_string(),
                value_type: port_type,
                binding: InputBinding::Interface(self.input_name.clone()),
            },
        ));

        let bridge = builder.add(base::INPUT_BRIDGE, "convert", INTERNAL_TYPE, vec![
            Input::interface("in", port_type, &self.input_name),
        ])?;

        let mut previous: Option<NodeId> = None;
        let mut diagnostics = Vec::new();

        for (position, transform) in transforms.iter().enumerate() {
            let upstream = previous.clone().unwrap_or_else(|| bridge.clone());
            match transform {
                ElementaryTransform::Unsupported { kind } => {
                    warn!(position, %kind, "unsupported transform skipped");
                    diagnostics.push(Diagnostic {
                        kind: kind.clone(),
                        position,
                    });
                }
                ElementaryTransform::Matrix { matrix, offset } => {
                    let mat = reduce_to_3x3(matrix).ok_or_else(|| {
                        MtlxError::malformed(
                            position,
                            format!("matrix needs 16 or 9 coefficients, got {}", matrix.len()),
                        )
                    })?;
                    check_finite(position, "matrix", &mat)?;
                    let offset = channels(position, "offset", offset)?;
                    // Offset is not part of the graph yet (no add node is synthesized)
                    trace!(position, ?offset, "matrix offset not wired");

                    previous = Some(builder.matrix(upstream, mat)?);
                }
                ElementaryTransform::Exponent { gamma } => {
                    let gamma = channels(position, "gamma", gamma)?;
                    previous = Some(builder.power(upstream, gamma)?);
                }
                ElementaryTransform::ExponentWithLinear { gamma, offset } => {
                    let gamma = channels(position, "gamma", gamma)?;
                    let offset = channels(position, "offset", offset)?;
                    let power = builder.power(upstream, gamma)?;
                    previous = Some(builder.add_offset(power, offset)?);
                }
            }
        }

        if previous.is_none() {
            debug!(count = transforms.len(), "no transform lowered, emitting pass-through");
        }
        let last = previous.unwrap_or(bridge);
        let out = builder.add(base::OUTPUT_BRIDGE, "convert", port_type, vec![
            Input::node("in", INTERNAL_TYPE, last),
        ])?;

        let mut graph = builder.finish();
        graph.set_output(InputBinding::Node(out));

        let definition = Definition {
            name: self.names.nodedef.clone(),
            node: self.names.node.clone(),
            node_group: NODE_GROUP.to_string(),
            doc: self.names.doc.clone(),
            version: "1.0".to_string(),
            input: InterfaceInput {
                name: self.input_name.clone(),
                value_type: port_type,
                default: self.boundary.default_value(),
            },
            output: InterfaceOutput {
                name: OUTPUT_NAME.to_string(),
                value_type: port_type,
            },
        };

        Ok(Lowered {
            document: NodeGraphDocument::new(definition, graph),
            diagnostics,
        })
    }
}

/// Lowers `transforms` using default graph names.
pub fn lower(transforms: &[ElementaryTransform], boundary: BoundaryType) -> MtlxResult<Lowered> {
    Lowerer::new(boundary).lower(transforms)
}

/// Graph under construction plus its name scope.
struct GraphBuilder {
    graph: NodeGraph,
    names: NameAllocator,
}

impl GraphBuilder {
    fn new(graph: NodeGraph) -> Self {
        Self {
            graph,
            names: NameAllocator::new(),
        }
    }

    fn add(
        &mut self,
        base: &str,
        category: &str,
        output_type: ValueType,
        inputs: Vec<Input>,
    ) -> MtlxResult<NodeId> {
        let mut node = Node::new(self.names.allocate(base), category, output_type);
        node.inputs = inputs;
        debug!(id = %node.id, category, "node added");
        self.graph.push(node)
    }

    fn matrix(&mut self, upstream: NodeId, mat: [f64; 9]) -> MtlxResult<NodeId> {
        self.add(base::MATRIX, "transform", INTERNAL_TYPE, vec![
            Input::node("in", INTERNAL_TYPE, upstream),
            Input::constant("mat", Value::Matrix33(mat)),
        ])
    }

    fn power(&mut self, upstream: NodeId, gamma: [f64; 3]) -> MtlxResult<NodeId> {
        self.add(base::EXPONENT, "power", INTERNAL_TYPE, vec![
            Input::node("in1", INTERNAL_TYPE, upstream),
            Input::constant("in2", Value::Vector3(gamma)),
        ])
    }

    fn add_offset(&mut self, upstream: NodeId, offset: [f64; 3]) -> MtlxResult<NodeId> {
        self.add(base::EXPONENT_OFFSET, "add", INTERNAL_TYPE, vec![
            Input::constant("in1", Value::Vector3(offset)),
            Input::node("in2", INTERNAL_TYPE, upstream),
        ])
    }

    fn finish(self) -> NodeGraph {
        self.graph
    }
}

/// First three channels of a per-channel parameter.
fn channels(position: usize, what: &str, values: &[f64]) -> MtlxResult<[f64; 3]> {
    let rgb = rgb(values).ok_or_else(|| {
        MtlxError::malformed(
            position,
            format!("{} needs at least 3 values, got {}", what, values.len()),
        )
    })?;
    check_finite(position, what, &rgb)?;
    Ok(rgb)
}

fn check_finite(position: usize, what: &str, values: &[f64]) -> MtlxResult<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(v) => Err(MtlxError::malformed(position, format!("{} contains {}", what, v))),
        None => Ok(()),
    }
}
