//! Force-directed node-link graph component.
//!
//! Renders an interactive graph on an HTML canvas with:
//! - A fixed-step physics layout (centering, repulsion, springs, overlap separation)
//! - Pan, zoom, and node dragging interactions
//! - Deterministic per-group coloring
//! - Click-to-select, delegated to a [`Selection`] store
//!
//! The layout engine ([`Simulation`], [`Interaction`], [`GraphState`]) has no
//! browser dependencies and can be stepped synchronously.
//!
//! # Example
//!
//! ```ignore
//! use graph_layout::{GraphCanvas, GraphProps, GraphNode, GraphEdge};
//!
//! let props = GraphProps {
//!     nodes: vec![
//!         GraphNode { id: "a".into(), label: Some("Node A".into()), ..Default::default() },
//!         GraphNode { id: "b".into(), group: Some("teamB".into()), ..Default::default() },
//!     ],
//!     edges: vec![GraphEdge { source: "a".into(), target: "b".into() }],
//!     ..Default::default()
//! };
//!
//! view! { <GraphCanvas data=props.into() element_key="graph-1" /> }
//! ```

mod component;
pub mod forces;
pub mod interaction;
mod render;
pub mod selection;
pub mod simulation;
mod state;
pub mod theme;
mod types;
pub mod vector;

pub use component::GraphCanvas;
pub use forces::ForceConfig;
pub use interaction::{Camera, Gesture, Interaction};
pub use selection::{Selection, SelectionSet};
pub use simulation::{NodeState, Phase, Simulation};
pub use state::{GraphState, NodeSnapshot, Snapshot, node_color};
pub use theme::{Color, Theme, color_for_group};
pub use types::{GraphEdge, GraphNode, GraphProps};
pub use vector::{Vec2, intersection};
