use arbor_layout::{ChartConfig, LayoutPoint, NodeId, NodeSpec, Placement, Tree, Viewport};

fn two_leaves() -> NodeSpec {
    NodeSpec::sized(100.0, 40.0)
        .with_children(vec![NodeSpec::sized(100.0, 40.0), NodeSpec::sized(100.0, 40.0)])
}

fn tree_with(viewport: Viewport, root: &NodeSpec) -> Tree {
    let config = ChartConfig {
        viewport,
        ..Default::default()
    };
    let mut tree = Tree::with_config(config, root).unwrap();
    tree.position_tree();
    tree
}

#[test]
fn tree_smaller_than_viewport_is_centered() {
    let tree = tree_with(
        Viewport {
            width: 400.0,
            height: 300.0,
        },
        &two_leaves(),
    );
    let snapshot = tree.snapshot();

    assert_eq!(snapshot.canvas.width, 400.0);
    assert_eq!(snapshot.canvas.height, 300.0);
    assert!(!snapshot.canvas.overflow_x);
    assert!(!snapshot.canvas.overflow_y);

    let center = snapshot.bounds.center();
    assert_eq!((center.x, center.y), (200.0, 150.0));

    let root = snapshot.node(NodeId::ROOT).unwrap();
    assert_eq!((root.x, root.y), (150.0, 95.0));
}

#[test]
fn tree_larger_than_viewport_is_pinned_with_padding() {
    let tree = tree_with(Viewport::default(), &two_leaves());
    let snapshot = tree.snapshot();

    assert!(snapshot.canvas.overflow_x);
    assert!(snapshot.canvas.overflow_y);
    assert_eq!(snapshot.canvas.width, 230.0 + 30.0);
    assert_eq!(snapshot.canvas.height, 110.0 + 30.0);

    let coords: Vec<(f64, f64)> = snapshot.nodes.iter().map(|n| (n.x, n.y)).collect();
    assert_eq!(coords, vec![(80.0, 15.0), (15.0, 85.0), (145.0, 85.0)]);
    assert_eq!(snapshot.bounds.min_x, 15.0);
    assert_eq!(snapshot.bounds.min_y, 15.0);
}

#[test]
fn first_pass_places_and_later_passes_move() {
    let mut tree = tree_with(Viewport::default(), &two_leaves());
    let first = tree.snapshot();
    assert_eq!(
        first.node(NodeId(1)).unwrap().placement,
        Some(Placement::Placed { x: 15.0, y: 85.0 })
    );

    tree.position_tree();
    let second = tree.snapshot();
    assert_eq!(
        second.node(NodeId(1)).unwrap().placement,
        Some(Placement::Moved { x: 15.0, y: 85.0 })
    );
}

#[test]
fn nodes_under_a_collapsed_parent_shrink_into_its_anchor() {
    let root = NodeSpec::sized(100.0, 40.0).with_children(vec![
        NodeSpec::sized(100.0, 40.0)
            .with_children(vec![NodeSpec::sized(100.0, 40.0), NodeSpec::sized(100.0, 40.0)])
            .collapsed(),
        NodeSpec::sized(100.0, 40.0),
    ]);
    let tree = tree_with(Viewport::default(), &root);
    let snapshot = tree.snapshot();

    // The collapsed parent lays out like a leaf.
    let parent = snapshot.node(NodeId(1)).unwrap();
    assert_eq!((parent.x, parent.y), (15.0, 85.0));
    assert!(parent.collapse_switch);

    for id in [2, 3] {
        let hidden = snapshot.node(NodeId(id)).unwrap();
        assert!(hidden.hidden);
        assert_eq!(
            hidden.placement,
            Some(Placement::Collapsed {
                to: LayoutPoint { x: 65.0, y: 125.0 }
            })
        );
        let connector = hidden.connector.as_ref().unwrap();
        assert!(connector.collapsed);
        assert_eq!(connector.d, "M 65,125 L 65,125 65,125");
    }

    let visible = snapshot.node(NodeId(4)).unwrap();
    assert!(!visible.hidden);
    assert_eq!(visible.connector.as_ref().unwrap().d, "M 130,55 C 130,70 195,70 195,85");
}

#[test]
fn connectors_run_from_parent_bottom_to_child_top() {
    let tree = tree_with(Viewport::default(), &two_leaves());
    let snapshot = tree.snapshot();
    assert!(snapshot.node(NodeId::ROOT).unwrap().connector.is_none());
    assert_eq!(
        snapshot.node(NodeId(1)).unwrap().connector.as_ref().unwrap().d,
        "M 130,55 C 130,70 65,70 65,85"
    );
}
