//! Fits raw layout coordinates into the drawing surface.

use crate::config::ChartConfig;
use crate::connector::{collapse_point_path, connector_path, connector_point, line_through_path};
use crate::db::NodeDb;
use crate::model::{Bounds, Canvas, ConnectorLayout, Placement};
use crate::node::NodeId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeFit {
    pub placement: Option<Placement>,
    pub connector: Option<ConnectorLayout>,
    pub line_through: Option<ConnectorLayout>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportFit {
    pub canvas: Canvas,
    /// Bounding box of the visible tree after fitting.
    pub bounds: Bounds,
    /// Indexed by node id.
    pub nodes: Vec<NodeFit>,
}

/// Bounding box of every node reachable from the root through expanded parents.
pub fn visible_bounds(db: &NodeDb) -> Bounds {
    let root = db.root();
    let mut b = Bounds {
        min_x: root.x,
        min_y: root.y,
        max_x: root.x + root.width,
        max_y: root.y + root.height,
    };
    let mut stack = vec![NodeId::ROOT];
    while let Some(id) = stack.pop() {
        for i in 0..db.children_count(id) {
            let Some(child) = db.child_at(id, i) else {
                continue;
            };
            let node = &db[child];
            b.min_x = b.min_x.min(node.x);
            b.min_y = b.min_y.min(node.y);
            b.max_x = b.max_x.max(node.x + node.width);
            b.max_y = b.max_y.max(node.y + node.height);
            stack.push(child);
        }
    }
    b
}

/// Shift along one axis: center when the tree fits, otherwise pin with padding. Either way a
/// tree that would start at or before the origin is pushed back by its minimum.
fn axis_shift(min: f64, extent: f64, center: f64, viewport: f64, padding: f64) -> f64 {
    let delta = viewport / 2.0 - center;
    let neg_offset = if min + delta <= 0.0 { min.abs() } else { 0.0 };
    neg_offset + if extent < viewport { delta } else { padding }
}

fn canvas_extent(extent: f64, viewport: f64, padding: f64) -> f64 {
    if extent < viewport {
        viewport
    } else {
        extent + padding * 2.0
    }
}

pub fn fit(db: &mut NodeDb, config: &ChartConfig) -> ViewportFit {
    let raw = visible_bounds(db);
    let (tree_width, tree_height) = (raw.width(), raw.height());
    let center = raw.center();
    let viewport = config.viewport;
    let padding = config.padding;

    let dx = axis_shift(raw.min_x, tree_width, center.x, viewport.width, padding);
    let dy = axis_shift(raw.min_y, tree_height, center.y, viewport.height, padding);
    let canvas = Canvas {
        width: canvas_extent(tree_width, viewport.width, padding),
        height: canvas_extent(tree_height, viewport.height, padding),
        overflow_x: viewport.width < tree_width,
        overflow_y: viewport.height < tree_height,
    };

    let hide_root = config.hide_root_node;
    for node in db.iter_mut() {
        if node.id.is_root() && hide_root {
            continue;
        }
        node.x += dx;
        node.y += dy;
    }

    let mut nodes = vec![NodeFit::default(); db.len()];
    for (idx, fit) in nodes.iter_mut().enumerate() {
        let id = NodeId(idx);
        if id.is_root() && hide_root {
            continue;
        }

        let hide_point = db
            .collapsed_parent(id)
            .map(|cp| connector_point(&db[cp], true, config));

        let node = &db[id];
        fit.placement = Some(match hide_point {
            Some(p) => Placement::Collapsed { to: p.into() },
            None if node.positioned => Placement::Moved {
                x: node.x,
                y: node.y,
            },
            None => Placement::Placed {
                x: node.x,
                y: node.y,
            },
        });

        let parent_is_hidden_root = node.parent.is_some_and(|p| p.is_root()) && hide_root;
        let wants_line_through = node.draw_line_through || node.pseudo;
        if !id.is_root() && !parent_is_hidden_root {
            let path = match hide_point {
                Some(p) => collapse_point_path(p),
                None => {
                    let from = node.stack_parent.or(node.parent).unwrap_or(NodeId::ROOT);
                    connector_path(&db[from], node, config)
                }
            };
            fit.connector = Some(ConnectorLayout {
                d: path.to_string(),
                collapsed: hide_point.is_some(),
            });
            if wants_line_through {
                let path = match hide_point {
                    Some(p) => collapse_point_path(p),
                    None => line_through_path(node, config),
                };
                fit.line_through = Some(ConnectorLayout {
                    d: path.to_string(),
                    collapsed: hide_point.is_some(),
                });
            }
        } else if !hide_root && node.draw_line_through {
            fit.line_through = Some(ConnectorLayout {
                d: line_through_path(node, config).to_string(),
                collapsed: false,
            });
        }

        let node = &mut db[id];
        node.hidden = hide_point.is_some();
        node.positioned = true;
    }

    ViewportFit {
        canvas,
        bounds: raw.translated(dx, dy),
        nodes,
    }
}
