use arbor_layout::{
    ChartConfig, ChartDocument, ConnectorKind, Error, NodeAlign, NodeId, Orientation, TextValue,
    Tree,
};
use std::time::Duration;

const DOCUMENT: &str = r##"{
  "chart": {
    "rootOrientation": "WEST",
    "nodeAlign": "TOP",
    "levelSeparation": 40,
    "subTeeSeparation": 20,
    "animateOnInitDelay": 250,
    "connectors": { "type": "step", "stackIndent": 10 },
    "node": { "collapsable": true }
  },
  "nodeStructure": {
    "text": { "name": "Ann", "title": { "val": "CEO", "href": "#ann" } },
    "HTMLclass": "ceo",
    "children": [
      { "text": { "name": "Bob" }, "connectors": { "type": "straight" } },
      { "innerHTML": "<b>Eve</b>", "collapsable": false, "width": 80, "height": 30 }
    ]
  }
}"##;

#[test]
fn document_patch_is_merged_over_defaults() {
    let doc = ChartDocument::from_json(DOCUMENT).unwrap();
    let config = ChartConfig::default().merged(&doc.chart);

    assert_eq!(config.root_orientation, Orientation::West);
    assert_eq!(config.node_align, NodeAlign::Top);
    assert_eq!(config.level_separation, 40.0);
    assert_eq!(config.sibling_separation, 30.0);
    assert_eq!(config.subtree_separation, 20.0);
    assert_eq!(config.animate_on_init_delay, Duration::from_millis(250));
    assert_eq!(config.connectors.kind, ConnectorKind::Step);
    assert_eq!(config.connectors.stack_indent, 10.0);
    assert!(config.node.collapsable);
    assert!(!config.node.draw_line_through);
}

#[test]
fn node_settings_override_chart_defaults() {
    let tree = Tree::from_json(DOCUMENT).unwrap();

    let root = tree.node(NodeId::ROOT).unwrap();
    assert!(root.collapsable);
    assert_eq!(root.content.html_class.as_deref(), Some("ceo"));
    assert_eq!(
        root.content.text.get("title"),
        Some(&TextValue::Rich {
            val: "CEO".to_string(),
            href: Some("#ann".to_string()),
            target: None,
        })
    );

    let bob = tree.node(NodeId(1)).unwrap();
    assert_eq!(bob.connectors.kind, ConnectorKind::Straight);
    assert_eq!(bob.connectors.stack_indent, 10.0);
    assert!(!bob.measured);

    let eve = tree.node(NodeId(2)).unwrap();
    assert!(!eve.collapsable);
    assert!(eve.measured);
    assert_eq!(eve.content.inner_html.as_deref(), Some("<b>Eve</b>"));
}

#[test]
fn malformed_json_is_reported() {
    let err = Tree::from_json("{\"nodeStructure\": [").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn negative_viewport_is_rejected() {
    let err = Tree::from_json(r#"{"chart":{"viewport":{"width":-1}},"nodeStructure":{}}"#)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[test]
fn snapshot_serializes_placements_with_a_kind_tag() {
    let mut tree = Tree::from_json(DOCUMENT).unwrap();
    for id in [NodeId::ROOT, NodeId(1)] {
        tree.set_node_size(id, arbor_layout::geom::size(100.0, 40.0)).unwrap();
    }
    tree.position_tree();
    let json = serde_json::to_value(tree.snapshot()).unwrap();
    assert_eq!(json["orientation"], "WEST");
    assert_eq!(json["nodes"][1]["placement"]["kind"], "placed");
}
