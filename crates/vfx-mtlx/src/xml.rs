//! MaterialX XML output for node graph documents.
//!
//! # File Structure
//!
//! ```xml
//! <?xml version="1.0"?>
//! <materialx version="1.39">
//!   <nodedef name="ND_acescg_to_lin_rec709_color3" node="acescg_to_lin_rec709_color3" nodegroup="colortransform" version="1.0">
//!     <input name="in" type="color3" value="0, 0, 0"/>
//!     <output name="out" type="color3"/>
//!   </nodedef>
//!   <nodegraph name="NG_acescg_to_lin_rec709_color3" nodedef="ND_acescg_to_lin_rec709_color3">
//!     <convert name="asVec" type="vector3">
//!       <input name="in" type="color3" interfacename="in"/>
//!     </convert>
//!     <transform name="matrixTransform" type="vector3">
//!       <input name="in" type="vector3" nodename="asVec"/>
//!       <input name="mat" type="matrix33" value="..."/>
//!     </transform>
//!     ...
//!     <output name="out" type="color3" nodename="asColor"/>
//!   </nodegraph>
//! </materialx>
//! ```

use crate::error::{MtlxError, MtlxResult};
use crate::graph::{Definition, InputBinding, Node, NodeGraph, NodeGraphDocument, ValueType};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::fmt::Display;
use std::io::Write;

/// MaterialX document version written to the root element.
pub const MATERIALX_VERSION: &str = "1.39";

/// Writes a document as MaterialX XML to any writer.
pub fn write_document<W: Write>(writer: W, doc: &NodeGraphDocument) -> MtlxResult<()> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
        .map_err(write_error)?;

    let mut root = BytesStart::new("materialx");
    root.push_attribute(("version", MATERIALX_VERSION));
    xml.write_event(Event::Start(root)).map_err(write_error)?;

    write_definition(&mut xml, doc.definition())?;
    write_graph(&mut xml, doc.graph())?;

    xml.write_event(Event::End(BytesEnd::new("materialx")))
        .map_err(write_error)?;
    xml.get_mut().write_all(b"\n")?;

    Ok(())
}

/// Serializes a document to a MaterialX XML string.
pub fn to_xml_string(doc: &NodeGraphDocument) -> MtlxResult<String> {
    let mut buf = Vec::new();
    write_document(&mut buf, doc)?;
    String::from_utf8(buf).map_err(write_error)
}

fn write_error(e: impl Display) -> MtlxError {
    MtlxError::Xml(e.to_string())
}

fn write_definition<W: Write>(xml: &mut Writer<W>, def: &Definition) -> MtlxResult<()> {
    let mut start = BytesStart::new("nodedef");
    start.push_attribute(("name", def.name.as_str()));
    start.push_attribute(("node", def.node.as_str()));
    start.push_attribute(("nodegroup", def.node_group.as_str()));
    if !def.doc.is_empty() {
        start.push_attribute(("doc", def.doc.as_str()));
    }
    start.push_attribute(("version", def.version.as_str()));
    xml.write_event(Event::Start(start)).map_err(write_error)?;

    let default = def.input.default.to_string();
    write_port(
        xml,
        "input",
        &def.input.name,
        def.input.value_type,
        Some(("value", default.as_str())),
    )?;
    write_port(xml, "output", &def.output.name, def.output.value_type, None)?;

    xml.write_event(Event::End(BytesEnd::new("nodedef")))
        .map_err(write_error)?;
    Ok(())
}

fn write_graph<W: Write>(xml: &mut Writer<W>, graph: &NodeGraph) -> MtlxResult<()> {
    let mut start = BytesStart::new("nodegraph");
    start.push_attribute(("name", graph.name()));
    start.push_attribute(("nodedef", graph.nodedef()));
    xml.write_event(Event::Start(start)).map_err(write_error)?;

    for node in graph.nodes() {
        write_node(xml, node)?;
    }

    let output = graph.output();
    let binding = binding_attribute(&output.binding);
    write_port(
        xml,
        "output",
        &output.name,
        output.value_type,
        Some((binding.0, binding.1.as_str())),
    )?;

    xml.write_event(Event::End(BytesEnd::new("nodegraph")))
        .map_err(write_error)?;
    Ok(())
}

fn write_node<W: Write>(xml: &mut Writer<W>, node: &Node) -> MtlxResult<()> {
    let mut start = BytesStart::new(node.category.as_str());
    start.push_attribute(("name", node.id.as_str()));
    start.push_attribute(("type", node.output_type.as_str()));

    if node.inputs.is_empty() {
        xml.write_event(Event::Empty(start)).map_err(write_error)?;
        return Ok(());
    }

    xml.write_event(Event::Start(start)).map_err(write_error)?;
    for input in &node.inputs {
        let (key, value) = binding_attribute(&input.binding);
        write_port(xml, "input", &input.name, input.value_type, Some((key, value.as_str())))?;
    }
    xml.write_event(Event::End(BytesEnd::new(node.category.as_str())))
        .map_err(write_error)?;
    Ok(())
}

/// Attribute a binding is written as.
fn binding_attribute(binding: &InputBinding) -> (&'static str, String) {
    match binding {
        InputBinding::Constant(value) => ("value", value.to_string()),
        InputBinding::Interface(name) => ("interfacename", name.clone()),
        InputBinding::Node(id) => ("nodename", id.to_string()),
    }
}

fn write_port<W: Write>(
    xml: &mut Writer<W>,
    element: &str,
    name: &str,
    value_type: ValueType,
    attr: Option<(&str, &str)>,
) -> MtlxResult<()> {
    let mut start = BytesStart::new(element);
    start.push_attribute(("name", name));
    start.push_attribute(("type", value_type.as_str()));
    if let Some(attr) = attr {
        start.push_attribute(attr);
    }
    xml.write_event(Event::Empty(start)).map_err(write_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lower, BoundaryType, ElementaryTransform, Lowerer};

    #[test]
    fn pass_through_document() {
        let lowered = lower(&[], BoundaryType::Color3).unwrap();
        let xml = to_xml_string(&lowered.document).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\"?>"));
        assert!(xml.contains("<materialx version=\"1.39\">"));
        assert!(xml.contains("<input name=\"in\" type=\"color3\" value=\"0, 0, 0\"/>"));
        assert!(xml.contains("<input name=\"in\" type=\"color3\" interfacename=\"in\"/>"));
        assert!(xml.contains("<input name=\"in\" type=\"vector3\" nodename=\"asVec\"/>"));
        assert!(xml.contains("<output name=\"out\" type=\"color3\" nodename=\"asColor\"/>"));
        assert!(xml.trim_end().ends_with("</materialx>"));
    }

    #[test]
    fn named_conversion() {
        let transforms = [
            ElementaryTransform::identity(),
            ElementaryTransform::exponent_with_linear([2.0; 3], [0.1; 3]),
        ];
        let lowered = Lowerer::for_conversion("acescg", "lin_rec709", BoundaryType::Color3)
            .lower(&transforms)
            .unwrap();
        let xml = to_xml_string(&lowered.document).unwrap();

        assert!(xml.contains("<nodedef name=\"ND_acescg_to_lin_rec709_color3\""));
        assert!(xml.contains("nodegroup=\"colortransform\""));
        assert!(xml.contains("<nodegraph name=\"NG_acescg_to_lin_rec709_color3\" nodedef=\"ND_acescg_to_lin_rec709_color3\">"));
        assert!(xml.contains("<input name=\"mat\" type=\"matrix33\" value=\"1, 0, 0, 0, 1, 0, 0, 0, 1\"/>"));
        assert!(xml.contains("<power name=\"exponentTransform\" type=\"vector3\">"));
        assert!(xml.contains("<input name=\"in1\" type=\"vector3\" value=\"0.1, 0.1, 0.1\"/>"));
        assert!(xml.contains("<input name=\"in2\" type=\"vector3\" nodename=\"exponentTransform\"/>"));
    }
}
