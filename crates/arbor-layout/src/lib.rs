#![forbid(unsafe_code)]

//! Headless tree diagram layout.
//!
//! A chart is a nested [`NodeSpec`] plus a [`ChartConfigPatch`]. [`Tree`] flattens it into a
//! [`NodeDb`] arena (inserting pseudo nodes for dropped levels and chaining stacked children),
//! positions it with Walker's algorithm once every node has a size, fits the result into the
//! viewport and emits connector paths. Rendering is left to the caller: a pass produces a
//! [`LayoutSnapshot`] of coordinates, placements and SVG path data.
//!
//! ```
//! use arbor_layout::{NodeSpec, Tree, ChartConfig, PassOutcome};
//!
//! let root = NodeSpec::sized(100.0, 40.0)
//!     .with_children(vec![NodeSpec::sized(100.0, 40.0), NodeSpec::sized(100.0, 40.0)]);
//! let mut tree = Tree::with_config(ChartConfig::default(), &root).unwrap();
//! assert_eq!(tree.position_tree(), PassOutcome::Positioned);
//! let snapshot = tree.snapshot();
//! assert_eq!(snapshot.nodes.len(), 3);
//! ```

pub mod config;
pub mod connector;
pub mod db;
pub mod error;
pub mod geom;
pub mod level;
pub mod measure;
pub mod model;
pub mod node;
pub mod structure;
pub mod tree;
pub mod viewport;

mod walker;

pub use config::{
    AnimationConfig, AnimationPatch, ChartConfig, ChartConfigPatch, ConnectorKind,
    ConnectorStyle, ConnectorStylePatch, NodeAlign, NodeDefaults, NodeDefaultsPatch, Orientation,
    Viewport, ViewportPatch,
};
pub use db::NodeDb;
pub use error::{Error, Result};
pub use measure::{
    DeterministicNodeMeasurer, NodeMeasurer, SizeMap, SizeReport, SizeReporter, size_channel,
};
pub use model::{
    Bounds, Canvas, ConnectorLayout, LayoutPoint, LayoutSnapshot, NodeLayout, Placement,
};
pub use node::{NodeContent, NodeId, TreeNode};
pub use structure::{ChartDocument, LinkSpec, NodeSpec, TextValue};
pub use tree::{PassOutcome, ToggleOutcome, Tree};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
