use arbor_layout::{ChartConfig, NodeId, NodeSpec, Orientation, PassOutcome, Tree, Viewport};

fn two_leaves() -> NodeSpec {
    NodeSpec::sized(100.0, 40.0)
        .with_children(vec![NodeSpec::sized(100.0, 40.0), NodeSpec::sized(100.0, 40.0)])
}

fn layout(orientation: Orientation, viewport: Viewport) -> Vec<(f64, f64)> {
    let config = ChartConfig {
        root_orientation: orientation,
        viewport,
        ..Default::default()
    };
    let mut tree = Tree::with_config(config, &two_leaves()).unwrap();
    tree.position_tree();
    tree.nodes().iter().map(|n| (n.x, n.y)).collect()
}

#[test]
fn south_mirrors_north_across_the_horizontal_axis() {
    for viewport in [
        Viewport::default(),
        Viewport {
            width: 400.0,
            height: 300.0,
        },
    ] {
        let north = layout(Orientation::North, viewport);
        let south = layout(Orientation::South, viewport);
        for id in 0..3 {
            assert_eq!(north[id].0, south[id].0);
        }
        // Root and children swap bands.
        assert_eq!(south[0].1, north[1].1);
        assert_eq!(south[1].1, north[0].1);
        assert!(south[0].1 > south[1].1);
    }
}

#[test]
fn east_mirrors_west_across_the_vertical_axis() {
    let west = layout(Orientation::West, Viewport::default());
    let east = layout(Orientation::East, Viewport::default());

    // West grows rightwards: children sit one level (100 wide + 30) to the right.
    assert_eq!(west[1].0 - west[0].0, 130.0);
    assert_eq!(west[2].1 - west[1].1, 70.0);
    assert_eq!(west[0].1 - west[1].1, 35.0);

    assert_eq!(east[0].0 - east[1].0, 130.0);
    for id in 0..3 {
        assert_eq!(east[id].1, west[id].1);
    }
    assert_eq!(east[1].0, west[0].0);
    assert_eq!(east[0].0, west[1].0);
}

#[test]
fn hidden_root_spans_no_level() {
    let config = ChartConfig {
        hide_root_node: true,
        ..Default::default()
    };
    let mut tree = Tree::with_config(config, &two_leaves()).unwrap();
    tree.position_tree();

    let root = tree.node(NodeId::ROOT).unwrap();
    assert_eq!((root.width, root.height), (0.0, 0.0));

    let snapshot = tree.snapshot();
    let a = snapshot.node(NodeId(1)).unwrap();
    let b = snapshot.node(NodeId(2)).unwrap();
    // Children take the first band, pinned by the padding.
    assert_eq!(a.y, 15.0);
    assert_eq!(b.y, 15.0);
    assert_eq!(a.x, 15.0);
    assert!(a.connector.is_none());
    assert!(snapshot.node(NodeId::ROOT).unwrap().placement.is_none());
}

/// root -> [A (drops its child one level), B -> b1 (60 tall)]
fn dropped_next_to_tall_cousin(orientation: Orientation) -> Tree {
    let leaf = || NodeSpec::sized(100.0, 40.0);
    let mut dropped = leaf().with_children(vec![leaf()]);
    dropped.children_drop_level = 1;
    let root = leaf().with_children(vec![
        dropped,
        leaf().with_children(vec![NodeSpec::sized(100.0, 60.0)]),
    ]);
    let config = ChartConfig {
        root_orientation: orientation,
        ..Default::default()
    };
    let mut tree = Tree::with_config(config, &root).unwrap();
    assert_eq!(tree.position_tree(), PassOutcome::Positioned);
    tree
}

#[test]
fn pseudo_nodes_fill_their_band_in_every_orientation() {
    let (pseudo, b1) = (NodeId(2), NodeId(5));
    for orientation in [
        Orientation::North,
        Orientation::South,
        Orientation::West,
        Orientation::East,
    ] {
        let tree = dropped_next_to_tall_cousin(orientation);
        let p = tree.node(pseudo).unwrap();
        let b = tree.node(b1).unwrap();
        assert!(p.pseudo);
        if orientation.is_vertical() {
            assert_eq!(p.height, 60.0, "{orientation:?}");
            assert_eq!(p.y, b.y, "{orientation:?}");
        } else {
            assert_eq!(p.width, 100.0, "{orientation:?}");
            assert_eq!(p.x, b.x, "{orientation:?}");
        }
    }
}

#[test]
fn south_keeps_dropped_children_below_the_pseudo_band() {
    let tree = dropped_next_to_tall_cousin(Orientation::South);
    let a = tree.node(NodeId(1)).unwrap();
    let pseudo = tree.node(NodeId(2)).unwrap();
    let a1 = tree.node(NodeId(3)).unwrap();
    // Bands run upwards: level 1 above the root, the pseudo band above it, a1 on top.
    assert_eq!(a.y - (pseudo.y + pseudo.height), 30.0);
    assert_eq!(pseudo.y - (a1.y + a1.height), 30.0);
    assert_eq!(a1.x, a.x);
}
