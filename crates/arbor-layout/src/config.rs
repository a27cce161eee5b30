//! Chart configuration.
//!
//! [`ChartConfig`] is the resolved, fully-populated configuration the engine reads. Callers
//! describe overrides with [`ChartConfigPatch`], whose fields are all optional; merging walks
//! the fixed schema field by field, so nested sections (connectors, node defaults, animation,
//! viewport) inherit whatever the patch leaves unset.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Orientation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Orientation {
    /// `true` when the layout axis runs horizontally (levels stack vertically).
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

/// Cross-axis alignment of a node inside its level band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeAlign {
    #[default]
    Center,
    /// Leading edge of the level axis: the node takes the full slack.
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectorKind {
    #[default]
    Curve,
    Step,
    Straight,
    BCurve,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorStyle {
    pub kind: ConnectorKind,
    /// Offset of a stacked lane from its stack parent's anchor.
    pub stack_indent: f64,
}

impl Default for ConnectorStyle {
    fn default() -> Self {
        Self {
            kind: ConnectorKind::Curve,
            stack_indent: 15.0,
        }
    }
}

impl ConnectorStyle {
    pub fn merged(&self, patch: &ConnectorStylePatch) -> Self {
        Self {
            kind: patch.kind.unwrap_or(self.kind),
            stack_indent: patch.stack_indent.unwrap_or(self.stack_indent),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NodeDefaults {
    pub collapsable: bool,
    pub draw_line_through: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationConfig {
    pub node_speed: Duration,
    pub connectors_speed: Duration,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            node_speed: Duration::from_millis(450),
            connectors_speed: Duration::from_millis(450),
        }
    }
}

impl AnimationConfig {
    /// Length of the window in which further collapse toggles are dropped.
    pub fn longest(&self) -> Duration {
        self.node_speed.max(self.connectors_speed)
    }
}

/// Size of the drawing surface the fitted tree is centered in.
///
/// A zero-sized viewport never fits a tree, so the layout is always pinned with padding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub max_depth: usize,
    pub root_orientation: Orientation,
    pub node_align: NodeAlign,
    pub level_separation: f64,
    pub sibling_separation: f64,
    pub subtree_separation: f64,
    pub hide_root_node: bool,
    pub animate_on_init: bool,
    pub animate_on_init_delay: Duration,
    pub padding: f64,
    pub viewport: Viewport,
    pub connectors: ConnectorStyle,
    pub node: NodeDefaults,
    pub animation: AnimationConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            max_depth: 100,
            root_orientation: Orientation::North,
            node_align: NodeAlign::Center,
            level_separation: 30.0,
            sibling_separation: 30.0,
            subtree_separation: 30.0,
            hide_root_node: false,
            animate_on_init: false,
            animate_on_init_delay: Duration::from_millis(500),
            padding: 15.0,
            viewport: Viewport::default(),
            connectors: ConnectorStyle::default(),
            node: NodeDefaults::default(),
            animation: AnimationConfig::default(),
        }
    }
}

impl ChartConfig {
    /// Returns a copy of `self` with every field set in `patch` overridden.
    pub fn merged(&self, patch: &ChartConfigPatch) -> Self {
        let node = patch.node.as_ref();
        let animation = patch.animation.as_ref();
        let viewport = patch.viewport.as_ref();
        Self {
            max_depth: patch.max_depth.unwrap_or(self.max_depth),
            root_orientation: patch.root_orientation.unwrap_or(self.root_orientation),
            node_align: patch.node_align.unwrap_or(self.node_align),
            level_separation: patch.level_separation.unwrap_or(self.level_separation),
            sibling_separation: patch.sibling_separation.unwrap_or(self.sibling_separation),
            subtree_separation: patch.subtree_separation.unwrap_or(self.subtree_separation),
            hide_root_node: patch.hide_root_node.unwrap_or(self.hide_root_node),
            animate_on_init: patch.animate_on_init.unwrap_or(self.animate_on_init),
            animate_on_init_delay: patch
                .animate_on_init_delay
                .map(Duration::from_millis)
                .unwrap_or(self.animate_on_init_delay),
            padding: patch.padding.unwrap_or(self.padding),
            viewport: Viewport {
                width: viewport
                    .and_then(|v| v.width)
                    .unwrap_or(self.viewport.width),
                height: viewport
                    .and_then(|v| v.height)
                    .unwrap_or(self.viewport.height),
            },
            connectors: match patch.connectors.as_ref() {
                Some(c) => self.connectors.merged(c),
                None => self.connectors.clone(),
            },
            node: NodeDefaults {
                collapsable: node
                    .and_then(|n| n.collapsable)
                    .unwrap_or(self.node.collapsable),
                draw_line_through: node
                    .and_then(|n| n.draw_line_through)
                    .unwrap_or(self.node.draw_line_through),
            },
            animation: AnimationConfig {
                node_speed: animation
                    .and_then(|a| a.node_speed)
                    .map(Duration::from_millis)
                    .unwrap_or(self.animation.node_speed),
                connectors_speed: animation
                    .and_then(|a| a.connectors_speed)
                    .map(Duration::from_millis)
                    .unwrap_or(self.animation.connectors_speed),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("levelSeparation", self.level_separation),
            ("siblingSeparation", self.sibling_separation),
            ("subTeeSeparation", self.subtree_separation),
            ("padding", self.padding),
            ("connectors.stackIndent", self.connectors.stack_indent),
            ("viewport.width", self.viewport.width),
            ("viewport.height", self.viewport.height),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be finite, got {value}"),
                });
            }
        }
        if self.viewport.width < 0.0 || self.viewport.height < 0.0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "viewport must not be negative, got {}x{}",
                    self.viewport.width, self.viewport.height
                ),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfigPatch {
    pub max_depth: Option<usize>,
    pub root_orientation: Option<Orientation>,
    pub node_align: Option<NodeAlign>,
    pub level_separation: Option<f64>,
    pub sibling_separation: Option<f64>,
    #[serde(rename = "subTeeSeparation", alias = "subtreeSeparation")]
    pub subtree_separation: Option<f64>,
    pub hide_root_node: Option<bool>,
    pub animate_on_init: Option<bool>,
    /// Milliseconds.
    pub animate_on_init_delay: Option<u64>,
    pub padding: Option<f64>,
    pub viewport: Option<ViewportPatch>,
    pub connectors: Option<ConnectorStylePatch>,
    pub node: Option<NodeDefaultsPatch>,
    pub animation: Option<AnimationPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectorStylePatch {
    #[serde(rename = "type")]
    pub kind: Option<ConnectorKind>,
    pub stack_indent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeDefaultsPatch {
    pub collapsable: Option<bool>,
    pub draw_line_through: Option<bool>,
}

/// Durations in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationPatch {
    pub node_speed: Option<u64>,
    pub connectors_speed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportPatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
}
