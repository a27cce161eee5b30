//! The tree session: owns the node arena, runs layout passes and tracks collapse state.

use crate::config::ChartConfig;
use crate::db::NodeDb;
use crate::error::{Error, Result};
use crate::geom::Size;
use crate::level::LevelTracker;
use crate::measure::{NodeMeasurer, SizeMap, SizeReport};
use crate::model::{Canvas, LayoutSnapshot, NodeLayout};
use crate::node::{NodeId, TreeNode};
use crate::structure::{ChartDocument, NodeSpec};
use crate::viewport::{self, ViewportFit};
use crate::walker::Walker;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Positioned,
    /// Some real nodes have no size yet; nothing was moved.
    Deferred { unmeasured: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Applied(PassOutcome),
    /// Dropped: an animation window is open or the node does not exist.
    Ignored,
}

#[derive(Debug)]
pub struct Tree {
    config: ChartConfig,
    db: NodeDb,
    levels: LevelTracker,
    fit: Option<ViewportFit>,
    loaded: bool,
    animation_until: Option<Instant>,
    scheduled_toggle: Option<Duration>,
}

impl Tree {
    pub fn new(document: &ChartDocument) -> Result<Self> {
        let config = ChartConfig::default().merged(&document.chart);
        Self::with_config(config, &document.node_structure)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::new(&ChartDocument::from_json(text)?)
    }

    pub fn with_config(config: ChartConfig, root: &NodeSpec) -> Result<Self> {
        config.validate()?;
        let db = NodeDb::build(root, &config)?;
        tracing::debug!(
            nodes = db.len(),
            orientation = ?config.root_orientation,
            "tree built"
        );
        Ok(Self {
            config,
            db,
            levels: LevelTracker::default(),
            fit: None,
            loaded: false,
            animation_until: None,
            scheduled_toggle: None,
        })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn nodes(&self) -> &NodeDb {
        &self.db
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.db.get(id)
    }

    pub fn levels(&self) -> &LevelTracker {
        &self.levels
    }

    /// Viewport result of the last successful pass.
    pub fn fit(&self) -> Option<&ViewportFit> {
        self.fit.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn size_is_fixed(&self, id: NodeId) -> bool {
        id.is_root() && self.config.hide_root_node
    }

    pub fn unmeasured(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.db.iter().filter(|n| !n.measured).map(|n| n.id)
    }

    pub fn is_ready(&self) -> bool {
        self.unmeasured().next().is_none()
    }

    pub fn set_node_size(&mut self, id: NodeId, size: Size) -> Result<()> {
        if self.size_is_fixed(id) {
            return Ok(());
        }
        let node = self
            .db
            .get_mut(id)
            .ok_or(Error::UnknownNode { id: id.index() })?;
        node.width = size.width;
        node.height = size.height;
        node.measured = true;
        Ok(())
    }

    /// Applies a whole report, or nothing if any id is unknown.
    pub fn apply_sizes(&mut self, sizes: &SizeMap) -> Result<()> {
        if let Some(unknown) = sizes.keys().filter(|id| self.db.get(**id).is_none()).min() {
            return Err(Error::UnknownNode {
                id: unknown.index(),
            });
        }
        for (&id, &size) in sizes {
            self.set_node_size(id, size)?;
        }
        Ok(())
    }

    /// Measures every real node that has no size yet; returns how many remain unmeasured.
    pub fn measure_with(&mut self, measurer: &dyn NodeMeasurer) -> usize {
        for idx in 0..self.db.len() {
            let id = NodeId(idx);
            let node = &self.db[id];
            if self.size_is_fixed(id) || node.pseudo || node.measured {
                continue;
            }
            if let Some(size) = measurer.measure(&self.db[id].content) {
                let node = &mut self.db[id];
                node.width = size.width;
                node.height = size.height;
                node.measured = true;
            }
        }
        let pending = self.unmeasured().count();
        tracing::debug!(pending, "nodes measured");
        pending
    }

    /// Runs first walk, second walk and viewport fit. Does nothing while any node is
    /// unmeasured.
    pub fn position_tree(&mut self) -> PassOutcome {
        let unmeasured = self.unmeasured().count();
        if unmeasured > 0 {
            tracing::debug!(unmeasured, "layout deferred until all nodes are measured");
            return PassOutcome::Deferred { unmeasured };
        }

        let _span = tracing::debug_span!(
            "position_tree",
            nodes = self.db.len(),
            orientation = ?self.config.root_orientation
        )
        .entered();

        Walker::new(&mut self.db, &mut self.levels, &self.config).run();
        self.fit = Some(viewport::fit(&mut self.db, &self.config));

        if !self.loaded {
            self.loaded = true;
            if self.config.animate_on_init {
                self.scheduled_toggle = Some(self.config.animate_on_init_delay);
            }
        }
        PassOutcome::Positioned
    }

    /// Awaits the measurement collaborator, applies its sizes, then runs a pass.
    pub async fn position_tree_when_measured(&mut self, report: SizeReport) -> Result<PassOutcome> {
        let sizes = report.wait().await?;
        tracing::debug!(reported = sizes.len(), "size report received");
        self.apply_sizes(&sizes)?;
        Ok(self.position_tree())
    }

    pub fn in_animation(&self, now: Instant) -> bool {
        self.animation_until.is_some_and(|until| now < until)
    }

    /// Flips a node's collapsed state and re-lays the tree out. Toggles arriving while the
    /// previous toggle's animation window is open are dropped, not queued.
    pub fn toggle_collapse(&mut self, id: NodeId, now: Instant) -> ToggleOutcome {
        if self.in_animation(now) {
            tracing::debug!(node = id.index(), "toggle ignored during animation");
            return ToggleOutcome::Ignored;
        }
        let Some(node) = self.db.get_mut(id) else {
            tracing::debug!(node = id.index(), "toggle ignored for unknown node");
            return ToggleOutcome::Ignored;
        };
        node.collapsed = !node.collapsed;
        tracing::debug!(node = id.index(), collapsed = node.collapsed, "toggle collapse");

        self.animation_until = Some(now + self.config.animation.longest());
        ToggleOutcome::Applied(self.position_tree())
    }

    /// Delay after which the host should toggle the root, when `animate_on_init` is set.
    /// Returned once.
    pub fn take_scheduled_toggle(&mut self) -> Option<Duration> {
        self.scheduled_toggle.take()
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        let (canvas, bounds) = match self.fit.as_ref() {
            Some(fit) => (fit.canvas, fit.bounds),
            None => (Canvas::default(), viewport::visible_bounds(&self.db)),
        };
        let nodes = self
            .db
            .iter()
            .map(|node| {
                let fit = self.fit.as_ref().and_then(|f| f.nodes.get(node.id.index()));
                NodeLayout {
                    id: node.id,
                    parent: node.parent,
                    stack_parent: node.stack_parent,
                    x: node.x,
                    y: node.y,
                    width: node.width,
                    height: node.height,
                    pseudo: node.pseudo,
                    collapsed: node.collapsed,
                    hidden: node.hidden,
                    collapse_switch: self.db.has_collapse_switch(node.id),
                    placement: fit.and_then(|f| f.placement),
                    connector: fit.and_then(|f| f.connector.clone()),
                    line_through: fit.and_then(|f| f.line_through.clone()),
                }
            })
            .collect();
        LayoutSnapshot {
            orientation: self.config.root_orientation,
            canvas,
            bounds,
            nodes,
        }
    }

    /// Ends the session. Nodes are never removed individually.
    pub fn destroy(self) {
        tracing::debug!(nodes = self.db.len(), "tree destroyed");
    }
}
