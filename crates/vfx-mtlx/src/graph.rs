//! MaterialX-style node graph model.
//!
//! A [`NodeGraphDocument`] pairs a [`Definition`] (the `nodedef`: one input,
//! one output) with a [`NodeGraph`] implementing it. Nodes are kept in
//! insertion order and may only reference nodes that precede them, so the
//! graph is a DAG by construction.
//!
//! Documents are built by the lowering engine and only read afterwards;
//! nothing here exposes mutation of a finished document.

use crate::error::{MtlxError, MtlxResult};
use std::collections::HashSet;
use std::fmt;

/// MaterialX data type of a port or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Single float.
    Float,
    /// RGB color.
    Color3,
    /// RGBA color.
    Color4,
    /// 3-component vector.
    Vector3,
    /// 3x3 matrix.
    Matrix33,
}

impl ValueType {
    /// Returns the MaterialX type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Color3 => "color3",
            Self::Color4 => "color4",
            Self::Vector3 => "vector3",
            Self::Matrix33 => "matrix33",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of the graph's interface ports.
///
/// Nodes inside the graph always work on `vector3`; boundary nodes convert
/// from and to this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundaryType {
    /// RGB color (default).
    #[default]
    Color3,
    /// RGBA color.
    Color4,
    /// Plain vector.
    Vector3,
}

impl BoundaryType {
    /// Returns the matching value type.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Color3 => ValueType::Color3,
            Self::Color4 => ValueType::Color4,
            Self::Vector3 => ValueType::Vector3,
        }
    }

    /// Returns the default value for an interface input of this type.
    pub fn default_value(&self) -> Value {
        match self {
            Self::Color3 => Value::Color3([0.0; 3]),
            Self::Color4 => Value::Color4([0.0, 0.0, 0.0, 1.0]),
            Self::Vector3 => Value::Vector3([0.0; 3]),
        }
    }

    /// Parses a MaterialX type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "color3" => Some(Self::Color3),
            "color4" => Some(Self::Color4),
            "vector3" => Some(Self::Vector3),
            _ => None,
        }
    }

    /// Returns the MaterialX type name.
    pub fn as_str(&self) -> &'static str {
        self.value_type().as_str()
    }
}

impl fmt::Display for BoundaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed constant.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Single float.
    Float(f64),
    /// RGB color.
    Color3([f64; 3]),
    /// RGBA color.
    Color4([f64; 4]),
    /// 3-component vector.
    Vector3([f64; 3]),
    /// Row-major 3x3 matrix.
    Matrix33([f64; 9]),
}

impl Value {
    /// Returns the type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Float(_) => ValueType::Float,
            Self::Color3(_) => ValueType::Color3,
            Self::Color4(_) => ValueType::Color4,
            Self::Vector3(_) => ValueType::Vector3,
            Self::Matrix33(_) => ValueType::Matrix33,
        }
    }

    /// Returns the components as a flat slice.
    pub fn components(&self) -> &[f64] {
        match self {
            Self::Float(v) => std::slice::from_ref(v),
            Self::Color3(v) | Self::Vector3(v) => v,
            Self::Color4(v) => v,
            Self::Matrix33(v) => v,
        }
    }
}

/// Formats as a MaterialX value string, e.g. `1, 0, 0`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.components().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Identifier of a node, unique within one graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    /// Wraps an already allocated name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Where a node input (or the graph output) gets its value.
#[derive(Debug, Clone, PartialEq)]
pub enum InputBinding {
    /// Fixed value.
    Constant(Value),
    /// The graph's own interface input of this name.
    Interface(String),
    /// The single output of another node.
    Node(NodeId),
}

impl InputBinding {
    /// Returns the referenced node, if any.
    pub fn node(&self) -> Option<&NodeId> {
        match self {
            Self::Node(id) => Some(id),
            _ => None,
        }
    }

    /// Returns the constant, if any.
    pub fn constant(&self) -> Option<&Value> {
        match self {
            Self::Constant(v) => Some(v),
            _ => None,
        }
    }
}

/// A named, typed node input.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    /// Port name.
    pub name: String,
    /// Port type.
    pub value_type: ValueType,
    /// Source of the value.
    pub binding: InputBinding,
}

impl Input {
    /// Creates an input bound to a constant; the type follows the value.
    pub fn constant(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value_type: value.value_type(),
            binding: InputBinding::Constant(value),
        }
    }

    /// Creates an input connected to another node's output.
    pub fn node(name: impl Into<String>, value_type: ValueType, node: NodeId) -> Self {
        Self {
            name: name.into(),
            value_type,
            binding: InputBinding::Node(node),
        }
    }

    /// Creates an input bound to a graph interface input.
    pub fn interface(
        name: impl Into<String>,
        value_type: ValueType,
        interface: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value_type,
            binding: InputBinding::Interface(interface.into()),
        }
    }
}

/// A node instance in a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique id.
    pub id: NodeId,
    /// Node category (`convert`, `transform`, `power`, `add`, ...).
    pub category: String,
    /// Type of the node's single output.
    pub output_type: ValueType,
    /// Inputs in declaration order.
    pub inputs: Vec<Input>,
}

impl Node {
    /// Creates a node with no inputs.
    pub fn new(id: NodeId, category: impl Into<String>, output_type: ValueType) -> Self {
        Self {
            id,
            category: category.into(),
            output_type,
            inputs: Vec::new(),
        }
    }

    /// Adds an input.
    pub fn with_input(mut self, input: Input) -> Self {
        self.inputs.push(input);
        self
    }

    /// Looks up an input by port name.
    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.iter().find(|i| i.name == name)
    }

    /// Returns the node this port is connected to, if any.
    pub fn upstream(&self, port: &str) -> Option<&NodeId> {
        self.input(port).and_then(|i| i.binding.node())
    }
}

/// Interface input of a definition.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceInput {
    /// Port name.
    pub name: String,
    /// Port type.
    pub value_type: ValueType,
    /// Value used when nothing is connected.
    pub default: Value,
}

/// Interface output of a definition or graph.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceOutput {
    /// Port name.
    pub name: String,
    /// Port type.
    pub value_type: ValueType,
}

/// Node definition (`nodedef`): the externally visible contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    /// Definition name (`ND_...`).
    pub name: String,
    /// Node string the definition is instantiated by.
    pub node: String,
    /// Node group.
    pub node_group: String,
    /// Documentation string.
    pub doc: String,
    /// Version string.
    pub version: String,
    /// The single input.
    pub input: InterfaceInput,
    /// The single output.
    pub output: InterfaceOutput,
}

/// The graph output port and what it reads.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphOutput {
    /// Port name.
    pub name: String,
    /// Port type.
    pub value_type: ValueType,
    /// Source of the output value.
    pub binding: InputBinding,
}

/// Functional node graph implementing a [`Definition`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGraph {
    name: String,
    nodedef: String,
    nodes: Vec<Node>,
    output: GraphOutput,
}

impl NodeGraph {
    pub(crate) fn new(name: impl Into<String>, nodedef: impl Into<String>, output: GraphOutput) -> Self {
        Self {
            name: name.into(),
            nodedef: nodedef.into(),
            nodes: Vec::new(),
            output,
        }
    }

    /// Appends a node, checking that every referenced node already exists.
    pub(crate) fn push(&mut self, node: Node) -> MtlxResult<NodeId> {
        for input in &node.inputs {
            if let InputBinding::Node(target) = &input.binding {
                if self.node(target).is_none() {
                    return Err(MtlxError::DanglingReference {
                        node: node.id.to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }
        let id = node.id.clone();
        self.nodes.push(node);
        Ok(id)
    }

    pub(crate) fn set_output(&mut self, binding: InputBinding) {
        self.output.binding = binding;
    }

    /// Graph name (`NG_...`).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the definition this graph implements.
    #[inline]
    pub fn nodedef(&self) -> &str {
        &self.nodedef
    }

    /// Nodes in insertion (= dependency) order.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Looks up a node by id string.
    pub fn node_named(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    /// Position of a node in the ordered collection.
    pub fn position(&self, id: &NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| &n.id == id)
    }

    /// The graph output.
    #[inline]
    pub fn output(&self) -> &GraphOutput {
        &self.output
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks structural invariants: unique ids and backward-only references.
    pub fn validate(&self) -> MtlxResult<()> {
        let mut seen: HashSet<&NodeId> = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            for input in &node.inputs {
                if let InputBinding::Node(target) = &input.binding {
                    if !seen.contains(target) {
                        return Err(MtlxError::DanglingReference {
                            node: node.id.to_string(),
                            target: target.to_string(),
                        });
                    }
                }
            }
            if !seen.insert(&node.id) {
                return Err(MtlxError::Validation(format!("duplicate node id '{}'", node.id)));
            }
        }
        if let InputBinding::Node(target) = &self.output.binding {
            if !seen.contains(target) {
                return Err(MtlxError::DanglingReference {
                    node: self.output.name.clone(),
                    target: target.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// A definition together with the graph implementing it.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGraphDocument {
    definition: Definition,
    graph: NodeGraph,
}

impl NodeGraphDocument {
    pub(crate) fn new(definition: Definition, graph: NodeGraph) -> Self {
        Self { definition, graph }
    }

    /// The interface contract.
    #[inline]
    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    /// The implementing graph.
    #[inline]
    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    /// The graph output binding.
    #[inline]
    pub fn output(&self) -> &InputBinding {
        &self.graph.output.binding
    }
}
