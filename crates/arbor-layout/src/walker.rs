//! Walker's positioning algorithm for general trees.
//!
//! The first walk runs post-order and assigns each node a preliminary offset along the layout
//! axis plus a modifier for its subtree; [`Walker::apportion`] pushes a subtree right when its
//! left contour collides with the subtrees already placed. The second walk runs pre-order,
//! accumulates modifiers into absolute coordinates, places nodes inside their level band and
//! applies the orientation transform.

use crate::config::{ChartConfig, NodeAlign, Orientation};
use crate::db::NodeDb;
use crate::level::LevelTracker;
use crate::node::NodeId;

pub(crate) struct Walker<'a> {
    db: &'a mut NodeDb,
    levels: &'a mut LevelTracker,
    config: &'a ChartConfig,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(
        db: &'a mut NodeDb,
        levels: &'a mut LevelTracker,
        config: &'a ChartConfig,
    ) -> Self {
        Self { db, levels, config }
    }

    pub(crate) fn run(&mut self) {
        self.levels.reset();
        self.first_walk(NodeId::ROOT, 0);
        self.second_walk(NodeId::ROOT, 0, 0.0, 0.0);
    }

    fn size(&self, id: NodeId) -> f64 {
        self.db.size(id, self.config)
    }

    fn set_neighbors(&mut self, id: NodeId, level: usize) {
        let left = self.levels.push_node(level, id);
        let node = &mut self.db[id];
        node.left_neighbor = left;
        node.right_neighbor = None;
        if let Some(left) = left {
            self.db[left].right_neighbor = Some(id);
        }
    }

    fn first_walk(&mut self, id: NodeId, level: usize) {
        {
            let node = &mut self.db[id];
            node.prelim = 0.0;
            node.modifier = 0.0;
        }
        self.set_neighbors(id, level);
        let (width, height) = (self.db[id].width, self.db[id].height);
        self.levels.observe_size(level, width, height);

        let left_sibling = self.db.left_sibling(id);
        let after_left_sibling = |walker: &Self, sibling: NodeId| {
            walker.db[sibling].prelim + walker.size(sibling) + walker.config.sibling_separation
        };

        let count = self.db.children_count(id);
        if count == 0 || level == self.config.max_depth {
            self.db[id].prelim = match left_sibling {
                Some(sibling) => after_left_sibling(self, sibling),
                None => 0.0,
            };
            return;
        }

        for i in 0..count {
            let child = self.db[id].children[i];
            self.first_walk(child, level + 1);
        }

        let children_center = self.db.children_center(id, self.config).unwrap_or(0.0);
        let midpoint = children_center - self.size(id) / 2.0;
        match left_sibling {
            Some(sibling) => {
                let prelim = after_left_sibling(self, sibling);
                let node = &mut self.db[id];
                node.prelim = prelim;
                node.modifier = prelim - midpoint;
                self.apportion(id, level);
            }
            None => self.db[id].prelim = midpoint,
        }

        if self.db[id].is_stack_parent {
            let lane = match self.db[id].stack_children.first() {
                Some(&first) => self.size(first) / 2.0,
                None => 0.0,
            };
            let node = &mut self.db[id];
            node.modifier += lane + node.connectors.stack_indent;
        } else if self.db[id].is_stack_member() {
            self.db[id].prelim = 0.0;
        }
    }

    /// Compares the left contour of `id`'s subtree with the right contour of everything
    /// already placed to its left, depth by depth, and shifts `id` (and, progressively less,
    /// the siblings between it and the colliding subtree) to remove any overlap.
    fn apportion(&mut self, id: NodeId, level: usize) {
        let depth_to_stop = self.config.max_depth.saturating_sub(level);
        let mut first_child = self.db.first_child(id);
        let mut left_neighbor = first_child.and_then(|c| self.db.left_neighbor(c));
        let mut compare_depth = 1usize;

        while let (Some(frontier), Some(left_frontier)) = (first_child, left_neighbor) {
            if compare_depth > depth_to_stop {
                break;
            }

            let mut modifier_sum_left = 0.0;
            let mut modifier_sum_right = 0.0;
            let mut left_ancestor = left_frontier;
            let mut right_ancestor = frontier;
            for _ in 0..compare_depth {
                let (Some(l), Some(r)) =
                    (self.db.parent(left_ancestor), self.db.parent(right_ancestor))
                else {
                    return;
                };
                left_ancestor = l;
                right_ancestor = r;
                modifier_sum_left += self.db[l].modifier;
                modifier_sum_right += self.db[r].modifier;
                if self.db[r].is_stack_parent {
                    modifier_sum_right += self.size(r) / 2.0;
                }
            }

            let mut total_gap = (self.db[left_frontier].prelim
                + modifier_sum_left
                + self.size(left_frontier)
                + self.config.subtree_separation)
                - (self.db[frontier].prelim + modifier_sum_right);

            if total_gap > 0.0 {
                let mut subtree_aux = Some(id);
                let mut num_subtrees = 0usize;
                while let Some(aux) = subtree_aux {
                    if aux == left_ancestor {
                        break;
                    }
                    subtree_aux = self.db.left_sibling(aux);
                    num_subtrees += 1;
                }

                if subtree_aux.is_some() && num_subtrees > 0 {
                    tracing::trace!(
                        node = id.index(),
                        compare_depth,
                        total_gap,
                        num_subtrees,
                        "apportion shift"
                    );
                    let single_gap = total_gap / num_subtrees as f64;
                    let mut mover = id;
                    while mover != left_ancestor {
                        let node = &mut self.db[mover];
                        node.prelim += total_gap;
                        node.modifier += total_gap;
                        total_gap -= single_gap;
                        match self.db.left_sibling(mover) {
                            Some(next) => mover = next,
                            None => break,
                        }
                    }
                }
            }

            compare_depth += 1;
            first_child = if self.db.children_count(frontier) == 0 {
                self.db.left_most(id, 0, compare_depth)
            } else {
                self.db.first_child(frontier)
            };
            if let Some(next) = first_child {
                left_neighbor = self.db.left_neighbor(next);
            }
        }
    }

    fn second_walk(&mut self, id: NodeId, level: usize, x: f64, y: f64) {
        if level > self.config.max_depth {
            return;
        }
        let orientation = self.config.root_orientation;
        let vertical = orientation.is_vertical();
        let record = self.levels.get(level).copied().unwrap_or_default();
        let level_extent = if vertical {
            record.max_height
        } else {
            record.max_width
        };

        let node = &mut self.db[id];
        let node_extent = if vertical { node.height } else { node.width };
        if node.pseudo {
            if vertical {
                node.height = level_extent;
            } else {
                node.width = level_extent;
            }
        }

        let slack = level_extent - node_extent;
        let mut nx = node.prelim + x;
        let mut ny = if node.pseudo {
            match orientation {
                Orientation::North | Orientation::West => y,
                Orientation::South | Orientation::East => y + slack,
            }
        } else {
            match self.config.node_align {
                NodeAlign::Center => y + slack / 2.0,
                NodeAlign::Top => y + slack,
                NodeAlign::Bottom => y,
            }
        };

        if !vertical {
            std::mem::swap(&mut nx, &mut ny);
        }
        match orientation {
            Orientation::South => ny = -ny - node_extent,
            Orientation::East => nx = -nx - node_extent,
            Orientation::North | Orientation::West => {}
        }
        node.x = nx;
        node.y = ny;
        let modifier = node.modifier;

        let count = self.db.children_count(id);
        if count == 0 {
            return;
        }
        let child_y = if id.is_root() && self.config.hide_root_node {
            y
        } else {
            y + level_extent + self.config.level_separation
        };
        for i in 0..count {
            let child = self.db[id].children[i];
            self.second_walk(child, level + 1, x + modifier, child_y);
        }
    }
}
