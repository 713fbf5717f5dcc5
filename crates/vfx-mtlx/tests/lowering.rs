//! Structural properties of lowered graphs.

use approx::assert_relative_eq;
use vfx_mtlx::{
    lower, xml, BoundaryType, ElementaryTransform, InputBinding, Lowerer, NodeGraphDocument,
    TransformKind, Value, ValueType,
};

fn sample_pipeline() -> Vec<ElementaryTransform> {
    vec![
        ElementaryTransform::matrix(
            [
                0.6131, 0.3395, 0.0474, 0.0, //
                0.0702, 0.9164, 0.0134, 0.0, //
                0.0206, 0.1096, 0.8698, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
            [0.0; 4],
        ),
        ElementaryTransform::unsupported(TransformKind::Lut1D),
        ElementaryTransform::exponent_with_linear([2.4; 3], [0.055; 3]),
        ElementaryTransform::exponent([1.0 / 2.2; 3]),
        ElementaryTransform::identity(),
        ElementaryTransform::exponent_with_linear([2.0; 3], [0.1; 3]),
    ]
}

fn matrix_of(doc: &NodeGraphDocument, id: &str) -> [f64; 9] {
    let node = doc.graph().node_named(id).unwrap();
    match node.input("mat").unwrap().binding.constant() {
        Some(Value::Matrix33(m)) => *m,
        other => panic!("expected matrix33 constant, got {:?}", other),
    }
}

#[test]
fn deterministic() {
    let transforms = sample_pipeline();
    let a = lower(&transforms, BoundaryType::Color4).unwrap();
    let b = lower(&transforms, BoundaryType::Color4).unwrap();

    assert_eq!(a, b);
    assert_eq!(
        xml::to_xml_string(&a.document).unwrap(),
        xml::to_xml_string(&b.document).unwrap()
    );
}

#[test]
fn order_preserved() {
    let lowered = lower(&sample_pipeline(), BoundaryType::Color3).unwrap();
    let graph = lowered.document.graph();
    let ids: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();

    assert_eq!(
        ids,
        [
            "asVec",
            "matrixTransform",
            "exponentTransform",
            "exponentOffset",
            "exponentTransform_1",
            "matrixTransform_1",
            "exponentTransform_2",
            "exponentOffset_1",
            "asColor",
        ]
    );

    // Every node after the input bridge reads its immediate predecessor
    for pair in graph.nodes().windows(2) {
        let upstream: Vec<_> = pair[1]
            .inputs
            .iter()
            .filter_map(|i| i.binding.node())
            .collect();
        assert_eq!(upstream, vec![&pair[0].id], "{} must read {}", pair[1].id, pair[0].id);
    }
    assert_eq!(lowered.document.output(), &InputBinding::Node(graph.nodes()[8].id.clone()));
}

#[test]
fn pass_through() {
    for boundary in [BoundaryType::Color3, BoundaryType::Color4, BoundaryType::Vector3] {
        let lowered = lower(&[], boundary).unwrap();
        let graph = lowered.document.graph();

        assert!(lowered.is_pass_through());
        assert!(lowered.is_complete());
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.nodes()[1].upstream("in").unwrap(), "asVec");
        assert_eq!(graph.output().value_type, boundary.value_type());
    }
}

#[test]
fn all_unsupported_is_pass_through() {
    let kinds = [
        TransformKind::Lut3D,
        TransformKind::Range,
        TransformKind::GradingPrimary,
        TransformKind::Other("AcmeTransform".into()),
    ];
    let transforms: Vec<_> = kinds
        .iter()
        .cloned()
        .map(ElementaryTransform::unsupported)
        .collect();

    let lowered = lower(&transforms, BoundaryType::Color3).unwrap();

    assert!(lowered.is_pass_through());
    assert_eq!(lowered.diagnostics.len(), kinds.len());
    for (i, d) in lowered.diagnostics.iter().enumerate() {
        assert_eq!(d.position, i);
        assert_eq!(d.kind, kinds[i]);
    }
}

#[test]
fn matrix_reduction() {
    let mut m = [0.0; 16];
    for (i, v) in m.iter_mut().enumerate() {
        *v = (i + 1) as f64;
    }
    let lowered = lower(&[ElementaryTransform::matrix(m, [0.0; 4])], BoundaryType::Color3).unwrap();
    let mat = matrix_of(&lowered.document, "matrixTransform");

    assert_eq!(mat, [1.0, 2.0, 3.0, 5.0, 6.0, 7.0, 9.0, 10.0, 11.0]);
}

#[test]
fn reduced_matrix_accepted() {
    let transforms = [ElementaryTransform::Matrix {
        matrix: vec![2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 2.0],
        offset: vec![0.0; 3],
    }];
    let lowered = lower(&transforms, BoundaryType::Color3).unwrap();
    let mat = matrix_of(&lowered.document, "matrixTransform");

    assert_relative_eq!(mat[0], 2.0);
    assert_relative_eq!(mat[4], 2.0);
    assert_relative_eq!(mat[8], 2.0);
}

#[test]
fn composite_exponent() {
    let transforms = [ElementaryTransform::exponent_with_linear([2.0; 3], [0.1; 3])];
    let lowered = lower(&transforms, BoundaryType::Color3).unwrap();
    let graph = lowered.document.graph();
    let nodes = graph.nodes();

    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[1].category, "power");
    assert_eq!(nodes[2].category, "add");

    let add = &nodes[2];
    assert_eq!(add.input("in1").unwrap().binding, InputBinding::Constant(Value::Vector3([0.1; 3])));
    assert_eq!(add.upstream("in2"), Some(&nodes[1].id));
    assert_eq!(nodes[3].upstream("in"), Some(&add.id));
}

#[test]
fn ids_unique() {
    let mut transforms = Vec::new();
    for _ in 0..20 {
        transforms.push(ElementaryTransform::identity());
        transforms.push(ElementaryTransform::exponent_with_linear([2.2; 3], [0.0; 3]));
    }
    let lowered = lower(&transforms, BoundaryType::Color3).unwrap();
    let graph = lowered.document.graph();

    let mut ids: Vec<_> = graph.nodes().iter().map(|n| n.id.clone()).collect();
    let count = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), count);
    graph.validate().unwrap();
}

#[test]
fn end_to_end() {
    let transforms = [ElementaryTransform::identity(), ElementaryTransform::exponent([2.2; 3])];
    let lowered = Lowerer::for_conversion("ACEScg", "lin_rec709", BoundaryType::Color3)
        .lower(&transforms)
        .unwrap();
    let doc = &lowered.document;
    let nodes = doc.graph().nodes();

    let shape: Vec<(&str, &str)> = nodes
        .iter()
        .map(|n| (n.category.as_str(), n.id.as_str()))
        .collect();
    assert_eq!(
        shape,
        [
            ("convert", "asVec"),
            ("transform", "matrixTransform"),
            ("power", "exponentTransform"),
            ("convert", "asColor"),
        ]
    );

    assert_eq!(matrix_of(doc, "matrixTransform"), [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    let gamma = nodes[2].input("in2").unwrap();
    assert_eq!(gamma.value_type, ValueType::Vector3);
    assert_eq!(gamma.binding.constant(), Some(&Value::Vector3([2.2; 3])));

    let def = doc.definition();
    assert_eq!(def.name, "ND_ACEScg_to_lin_rec709_color3");
    assert_eq!(def.input.value_type, ValueType::Color3);
    assert_eq!(def.output.value_type, ValueType::Color3);
    assert_eq!(doc.graph().nodedef(), def.name);
    assert!(nodes[1..3].iter().all(|n| n.output_type == ValueType::Vector3));
}

#[test]
fn write_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.mtlx");
    let lowered = lower(&sample_pipeline(), BoundaryType::Color4).unwrap();

    let file = std::fs::File::create(&path).unwrap();
    xml::write_document(file, &lowered.document).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("<nodedef name=\"ND_colortransform_color4\""));
    assert!(text.contains("value=\"0, 0, 0, 1\""));
    assert_eq!(text.matches("<add ").count(), 2);
}

#[test]
fn model_types_are_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NodeGraphDocument>();
    assert_send_sync::<vfx_mtlx::Lowered>();
    assert_send_sync::<vfx_mtlx::TransformLibrary>();
}
