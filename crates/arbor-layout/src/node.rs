use crate::config::{ChartConfig, ConnectorStyle};
use crate::structure::{LinkSpec, NodeSpec, TextValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense arena index. Ids follow creation order; the root is always [`NodeId::ROOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: Self = Self(0);

    pub fn index(self) -> usize {
        self.0
    }

    pub fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Renderer-owned node content, carried through untouched except for measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeContent {
    pub text: IndexMap<String, TextValue>,
    pub image: Option<String>,
    pub inner_html: Option<String>,
    pub html_class: Option<String>,
    pub html_id: Option<String>,
    pub link: Option<LinkSpec>,
}

impl NodeContent {
    pub(crate) fn from_spec(spec: &NodeSpec) -> Self {
        Self {
            text: spec.text.clone(),
            image: spec.image.clone(),
            inner_html: spec.inner_html.clone(),
            html_class: spec.html_class.clone(),
            html_id: spec.html_id.clone(),
            link: spec.link.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.image.is_none() && self.inner_html.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub stack_parent: Option<NodeId>,
    pub is_stack_parent: bool,
    pub stack_children: Vec<NodeId>,

    pub width: f64,
    pub height: f64,
    pub measured: bool,
    pub prelim: f64,
    pub modifier: f64,
    pub x: f64,
    pub y: f64,

    pub left_neighbor: Option<NodeId>,
    pub right_neighbor: Option<NodeId>,

    pub collapsed: bool,
    pub collapsable: bool,
    pub pseudo: bool,
    pub hidden: bool,
    pub positioned: bool,
    pub draw_line_through: bool,

    pub connectors: ConnectorStyle,
    pub content: NodeContent,
}

impl TreeNode {
    pub(crate) fn new(
        id: NodeId,
        parent: Option<NodeId>,
        stack_parent: Option<NodeId>,
        connectors: ConnectorStyle,
    ) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            stack_parent,
            is_stack_parent: false,
            stack_children: Vec::new(),
            width: 0.0,
            height: 0.0,
            measured: false,
            prelim: 0.0,
            modifier: 0.0,
            x: 0.0,
            y: 0.0,
            left_neighbor: None,
            right_neighbor: None,
            collapsed: false,
            collapsable: false,
            pseudo: false,
            hidden: false,
            positioned: false,
            draw_line_through: false,
            connectors,
            content: NodeContent::default(),
        }
    }

    /// Extent along the layout axis. Pseudo nodes report a negative subtree separation so a
    /// spacer level swallows the gap it would otherwise open.
    pub fn size(&self, config: &ChartConfig) -> f64 {
        if self.pseudo {
            return -config.subtree_separation;
        }
        if config.root_orientation.is_vertical() {
            self.width
        } else {
            self.height
        }
    }

    pub fn is_stack_member(&self) -> bool {
        self.stack_parent.is_some()
    }
}
