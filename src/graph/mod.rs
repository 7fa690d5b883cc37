//! DOM-free graph engine: data model, derived views, layout, interaction and
//! the frame descriptions the canvas components draw.

pub mod config;
pub mod engine;
/// Load and mutation failures.
pub mod error;
pub mod filter;
pub mod interaction;
pub mod layout;
pub mod loader;
pub mod model;
pub mod ranking;
pub mod scene3d;
pub mod style;
pub mod surface;
/// Serialized graph types.
pub mod types;

pub use config::GraphConfig;
pub use engine::GraphEngine;
pub use error::{GraphError, LoadError};
pub use filter::FilterCriteria;
pub use interaction::{ConnectMode, Intent};
pub use layout::LayoutKind;
pub use model::{Graph, NodeDetails, NodeDraft};
pub use ranking::{RankEntry, Ranking, rank};
pub use scene3d::Scene3d;
pub use types::{GraphData, Link, Node, NodeId, Point};
