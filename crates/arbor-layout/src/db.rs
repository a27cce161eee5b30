//! Node arena and the structural queries the layout passes run on.
//!
//! Every relation (parent, children, neighbors, stack membership) is a [`NodeId`] into one
//! flat `Vec`, so the arena never holds references into itself.

use crate::config::{ChartConfig, ConnectorStyle};
use crate::error::{Error, Result};
use crate::node::{NodeContent, NodeId, TreeNode};
use crate::structure::NodeSpec;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Default)]
pub struct NodeDb {
    nodes: Vec<TreeNode>,
}

impl NodeDb {
    /// Builds the arena from a nested structure, inserting pseudo nodes for
    /// `childrenDropLevel` and chaining stacked children under their stack parent.
    pub fn build(root: &NodeSpec, config: &ChartConfig) -> Result<Self> {
        let mut db = Self { nodes: Vec::new() };
        db.insert_subtree(root, None, config);

        let root = &mut db.nodes[0];
        if config.animate_on_init {
            root.collapsed = true;
        }
        if config.hide_root_node {
            root.width = 0.0;
            root.height = 0.0;
            root.measured = true;
        }

        db.validate()?;
        Ok(db)
    }

    fn insert_subtree(&mut self, spec: &NodeSpec, parent: Option<NodeId>, config: &ChartConfig) {
        let mut current = self.create_node(spec, parent, None, config);
        let Some(children) = spec.children.as_ref() else {
            return;
        };

        for _ in 0..spec.children_drop_level {
            let connectors = self[current].connectors.clone();
            current = self.create_pseudo(current, connectors, config);
        }

        let stack = (spec.stack_children && !spec.has_grand_children()).then_some(current);
        for child in children {
            match stack {
                // Stack members hang off each other in a chain; the lane is drawn from the
                // stack parent.
                Some(stack_parent) => {
                    current = self.create_node(child, Some(current), Some(stack_parent), config);
                }
                None => self.insert_subtree(child, Some(current), config),
            }
        }
    }

    fn create_node(
        &mut self,
        spec: &NodeSpec,
        parent: Option<NodeId>,
        stack_parent: Option<NodeId>,
        config: &ChartConfig,
    ) -> NodeId {
        let connectors = match spec.connectors.as_ref() {
            Some(patch) => config.connectors.merged(patch),
            None => config.connectors.clone(),
        };
        let id = self.push(parent, stack_parent, connectors);

        let node = &mut self[id];
        node.pseudo = spec.pseudo;
        node.collapsed = spec.collapsed;
        node.collapsable = spec.collapsable.unwrap_or(config.node.collapsable);
        node.draw_line_through = spec
            .draw_line_through
            .unwrap_or(config.node.draw_line_through);
        node.content = NodeContent::from_spec(spec);
        match (spec.width, spec.height) {
            (Some(width), Some(height)) => {
                node.width = width;
                node.height = height;
                node.measured = true;
            }
            _ if node.pseudo => node.measured = true,
            _ => {}
        }
        id
    }

    fn create_pseudo(
        &mut self,
        parent: NodeId,
        connectors: ConnectorStyle,
        config: &ChartConfig,
    ) -> NodeId {
        let id = self.push(Some(parent), None, connectors);
        let node = &mut self[id];
        node.pseudo = true;
        node.measured = true;
        node.collapsable = config.node.collapsable;
        node.draw_line_through = config.node.draw_line_through;
        id
    }

    fn push(
        &mut self,
        parent: Option<NodeId>,
        stack_parent: Option<NodeId>,
        connectors: ConnectorStyle,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(TreeNode::new(id, parent, stack_parent, connectors));
        if let Some(parent) = parent {
            self[parent].children.push(id);
        }
        if let Some(stack_parent) = stack_parent {
            let sp = &mut self[stack_parent];
            sp.is_stack_parent = true;
            sp.stack_children.push(id);
        }
        id
    }

    /// Checks the arena invariants the layout passes rely on for termination.
    pub fn validate(&self) -> Result<()> {
        let malformed = |id: usize, message: String| Error::MalformedTree { id, message };
        if self.nodes.is_empty() {
            return Err(malformed(0, "tree has no root".to_string()));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if node.id.index() != idx {
                return Err(malformed(idx, format!("stored with id {}", node.id)));
            }
            match node.parent {
                None if idx != 0 => {
                    return Err(malformed(idx, "non-root node has no parent".to_string()));
                }
                Some(p) if idx == 0 => {
                    return Err(malformed(idx, format!("root references parent {p}")));
                }
                Some(p) if p.index() >= idx => {
                    return Err(malformed(
                        idx,
                        format!("parent {p} does not precede the node"),
                    ));
                }
                Some(p) if !self.nodes[p.index()].children.contains(&node.id) => {
                    return Err(malformed(idx, format!("parent {p} does not list the node")));
                }
                _ => {}
            }
            for &child in &node.children {
                let consistent = self
                    .nodes
                    .get(child.index())
                    .is_some_and(|c| c.parent == Some(node.id));
                if !consistent {
                    return Err(malformed(
                        idx,
                        format!("child {child} does not point back to the node"),
                    ));
                }
            }
            if let Some(sp) = node.stack_parent {
                if sp.index() >= idx {
                    return Err(malformed(
                        idx,
                        format!("stack parent {sp} does not precede the node"),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(id.index())
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TreeNode> {
        self.nodes.iter_mut()
    }

    /// Number of children visible to layout: collapse is the only gate.
    pub fn children_count(&self, id: NodeId) -> usize {
        match self.get(id) {
            Some(node) if !node.collapsed => node.children.len(),
            _ => 0,
        }
    }

    pub fn child_at(&self, id: NodeId, i: usize) -> Option<NodeId> {
        self.get(id)?.children.get(i).copied()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.child_at(id, 0)
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.children.last().copied()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    pub fn left_neighbor(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.left_neighbor
    }

    pub fn right_neighbor(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.right_neighbor
    }

    pub fn left_sibling(&self, id: NodeId) -> Option<NodeId> {
        let neighbor = self.left_neighbor(id)?;
        (self[neighbor].parent == self[id].parent).then_some(neighbor)
    }

    pub fn right_sibling(&self, id: NodeId) -> Option<NodeId> {
        let neighbor = self.right_neighbor(id)?;
        (self[neighbor].parent == self[id].parent).then_some(neighbor)
    }

    /// Leftmost visible descendant `depth - level` levels below `id`, if the subtree reaches
    /// that deep.
    pub fn left_most(&self, id: NodeId, level: usize, depth: usize) -> Option<NodeId> {
        if level >= depth {
            return Some(id);
        }
        (0..self.children_count(id))
            .filter_map(|i| self.child_at(id, i))
            .find_map(|child| self.left_most(child, level + 1, depth))
    }

    pub fn size(&self, id: NodeId, config: &ChartConfig) -> f64 {
        self.get(id).map_or(0.0, |node| node.size(config))
    }

    /// Center of the span covered by the first and last child, on the layout axis.
    pub fn children_center(&self, id: NodeId, config: &ChartConfig) -> Option<f64> {
        let first = &self[self.first_child(id)?];
        let last = &self[self.last_child(id)?];
        Some(first.prelim + ((last.prelim - first.prelim) + last.size(config)) / 2.0)
    }

    /// Nearest collapsed ancestor.
    pub fn collapsed_parent(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.parent(id)?;
        loop {
            if self[cur].collapsed {
                return Some(cur);
            }
            cur = self.parent(cur)?;
        }
    }

    /// Whether the renderer should draw a collapse switch on the node.
    pub fn has_collapse_switch(&self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        if node.pseudo {
            return false;
        }
        node.collapsed
            || (node.collapsable && !node.children.is_empty() && !node.is_stack_member())
    }
}

impl Index<NodeId> for NodeDb {
    type Output = TreeNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for NodeDb {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id.index()]
    }
}
