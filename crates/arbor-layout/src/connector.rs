//! Connector anchors and path descriptions.
//!
//! Paths are pure functions of two anchor points, the root orientation and the connector
//! kind; [`ConnectorPath`] renders to SVG path data through `Display`.

use crate::config::{ChartConfig, ConnectorKind, Orientation};
use crate::geom::{Point, fmt_point, point};
use crate::node::TreeNode;
use std::fmt;

/// Anchor on the node boundary where a connector starts (`is_start`, towards children) or
/// ends (towards the parent).
///
/// Stack members are entered from the side, so their orientation is rotated a quarter turn.
pub fn connector_point(node: &TreeNode, is_start: bool, config: &ChartConfig) -> Point {
    let mut orientation = config.root_orientation;
    if node.is_stack_member() {
        orientation = if orientation.is_vertical() {
            Orientation::West
        } else {
            Orientation::North
        };
    }
    let pseudo_offset = config.subtree_separation / 2.0;
    match orientation {
        Orientation::North | Orientation::South => {
            let x = if node.pseudo {
                node.x - pseudo_offset
            } else {
                node.x + node.width / 2.0
            };
            let bottom = (orientation == Orientation::North) == is_start;
            let y = if bottom { node.y + node.height } else { node.y };
            point(x, y)
        }
        Orientation::East | Orientation::West => {
            let right = (orientation == Orientation::West) == is_start;
            let x = if right { node.x + node.width } else { node.x };
            let y = if node.pseudo {
                node.y - pseudo_offset
            } else {
                node.y + node.height / 2.0
            };
            point(x, y)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    /// One `L` command followed by every listed point.
    LineTo(Vec<Point>),
    CubicTo(Point, Point, Point),
    QuadTo(Point, Point),
    SmoothQuadTo(Point),
    SmoothCubicTo(Point, Point),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectorPath {
    pub commands: Vec<PathCommand>,
}

impl ConnectorPath {
    fn new(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    pub fn start(&self) -> Option<Point> {
        match self.commands.first()? {
            PathCommand::MoveTo(p) => Some(*p),
            _ => None,
        }
    }

    pub fn end(&self) -> Option<Point> {
        match self.commands.last()? {
            PathCommand::MoveTo(p)
            | PathCommand::CubicTo(_, _, p)
            | PathCommand::QuadTo(_, p)
            | PathCommand::SmoothQuadTo(p)
            | PathCommand::SmoothCubicTo(_, p) => Some(*p),
            PathCommand::LineTo(points) => points.last().copied(),
        }
    }
}

impl fmt::Display for ConnectorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        for cmd in &self.commands {
            match cmd {
                PathCommand::MoveTo(p) => parts.extend(["M".to_string(), fmt_point(*p)]),
                PathCommand::LineTo(points) => {
                    parts.push("L".to_string());
                    parts.extend(points.iter().map(|p| fmt_point(*p)));
                }
                PathCommand::CubicTo(a, b, c) => parts.extend([
                    "C".to_string(),
                    fmt_point(*a),
                    fmt_point(*b),
                    fmt_point(*c),
                ]),
                PathCommand::QuadTo(a, b) => {
                    parts.extend(["Q".to_string(), fmt_point(*a), fmt_point(*b)]);
                }
                PathCommand::SmoothQuadTo(p) => parts.extend(["T".to_string(), fmt_point(*p)]),
                PathCommand::SmoothCubicTo(a, b) => {
                    parts.extend(["S".to_string(), fmt_point(*a), fmt_point(*b)]);
                }
            }
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// Path from a parent anchor `start` to a child anchor `end`.
///
/// `stack_indent` is `Some` when the child is a stack member; the path then turns through an
/// elbow at the stack lane instead of fanning out at the level midpoint.
pub fn path_between(
    start: Point,
    end: Point,
    orientation: Orientation,
    kind: ConnectorKind,
    stack_indent: Option<f64>,
) -> ConnectorPath {
    use PathCommand::*;

    if let Some(indent) = stack_indent {
        let stack_point = if orientation.is_vertical() {
            point(start.x, end.y)
        } else {
            point(end.x, start.y)
        };
        return match kind {
            ConnectorKind::Step | ConnectorKind::Straight => {
                ConnectorPath::new(vec![
                    MoveTo(start),
                    LineTo(vec![stack_point]),
                    LineTo(vec![end]),
                ])
            }
            ConnectorKind::Curve | ConnectorKind::BCurve => {
                let help_point = match orientation {
                    Orientation::North => point(end.x - indent, end.y - indent),
                    Orientation::South => point(end.x - indent, end.y + indent),
                    Orientation::East => point(end.x + indent, start.y),
                    Orientation::West => point(end.x - indent, start.y),
                };
                ConnectorPath::new(vec![
                    MoveTo(start),
                    LineTo(vec![help_point]),
                    SmoothCubicTo(stack_point, end),
                ])
            }
        };
    }

    let (p1, p2) = if orientation.is_vertical() {
        let mid_y = (start.y + end.y) / 2.0;
        (point(start.x, mid_y), point(end.x, mid_y))
    } else {
        let mid_x = (start.x + end.x) / 2.0;
        (point(mid_x, start.y), point(mid_x, end.y))
    };
    match kind {
        ConnectorKind::Step => ConnectorPath::new(vec![
            MoveTo(start),
            LineTo(vec![p1]),
            LineTo(vec![p2]),
            LineTo(vec![end]),
        ]),
        ConnectorKind::Curve => ConnectorPath::new(vec![MoveTo(start), CubicTo(p1, p2, end)]),
        ConnectorKind::BCurve => {
            let pm = point((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
            ConnectorPath::new(vec![MoveTo(start), QuadTo(p1, pm), SmoothQuadTo(end)])
        }
        ConnectorKind::Straight => {
            ConnectorPath::new(vec![MoveTo(start), LineTo(vec![start, end])])
        }
    }
}

/// Degenerate path a connector shrinks into while its subtree is collapsed.
pub fn collapse_point_path(p: Point) -> ConnectorPath {
    ConnectorPath::new(vec![PathCommand::MoveTo(p), PathCommand::LineTo(vec![p, p])])
}

/// Straight line through a node, from its start anchor to its end anchor.
pub fn line_through_path(node: &TreeNode, config: &ChartConfig) -> ConnectorPath {
    let start = connector_point(node, true, config);
    let end = connector_point(node, false, config);
    ConnectorPath::new(vec![PathCommand::MoveTo(start), PathCommand::LineTo(vec![end])])
}

/// Connector between `from` (the parent, or the stack parent for stack members) and `to`.
pub fn connector_path(from: &TreeNode, to: &TreeNode, config: &ChartConfig) -> ConnectorPath {
    let start = connector_point(from, true, config);
    let end = connector_point(to, false, config);
    let stack_indent = to.is_stack_member().then_some(from.connectors.stack_indent);
    path_between(
        start,
        end,
        config.root_orientation,
        from.connectors.kind,
        stack_indent,
    )
}
