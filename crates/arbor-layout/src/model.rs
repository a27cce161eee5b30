use crate::config::Orientation;
use crate::geom::Point;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> LayoutPoint {
        LayoutPoint {
            x: self.max_x - self.width() / 2.0,
            y: self.max_y - self.height() / 2.0,
        }
    }

    pub(crate) fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            min_x: self.min_x + dx,
            min_y: self.min_y + dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for LayoutPoint {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// Drawing surface the renderer should allocate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    /// The tree is wider than the viewport and the surface must scroll horizontally.
    pub overflow_x: bool,
    pub overflow_y: bool,
}

/// What the renderer should do with a node after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// First placement: set the position directly.
    Placed { x: f64, y: f64 },
    /// Already on screen: move (animate) to the new position.
    Moved { x: f64, y: f64 },
    /// Under a collapsed ancestor: shrink into that ancestor's connector anchor.
    Collapsed { to: LayoutPoint },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorLayout {
    /// SVG path data.
    pub d: String,
    /// The path degenerated to a collapse point and should be hidden once animated.
    pub collapsed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_parent: Option<NodeId>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub pseudo: bool,
    pub collapsed: bool,
    pub hidden: bool,
    pub collapse_switch: bool,
    pub placement: Option<Placement>,
    pub connector: Option<ConnectorLayout>,
    pub line_through: Option<ConnectorLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub orientation: Orientation,
    pub canvas: Canvas,
    pub bounds: Bounds,
    pub nodes: Vec<NodeLayout>,
}

impl LayoutSnapshot {
    pub fn node(&self, id: NodeId) -> Option<&NodeLayout> {
        self.nodes.get(id.index()).filter(|n| n.id == id)
    }
}
