//! Graph data structures for input to the graph component.

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Height used when the props do not declare one.
pub const DEFAULT_HEIGHT: f64 = 400.0;
/// Declared heights below this are raised to it.
pub const MIN_HEIGHT: f64 = 240.0;

/// A node in the graph.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphNode {
	/// Unique identifier. Nodes with an empty id are dropped.
	pub id: String,
	/// Optional display label, also grows the node radius.
	pub label: Option<String>,
	/// Category tag hashed to a palette color.
	pub group: Option<String>,
	/// Numeric weight added to the node radius.
	pub value: Option<f64>,
	/// Optional CSS color override. Takes precedence over `group`.
	pub color: Option<String>,
}

/// A directed edge between two nodes. Parallel edges are allowed.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphEdge {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
}

/// Props accepted by the graph component.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphProps {
	/// Heading drawn in the top-left corner.
	pub title: Option<String>,
	/// Nodes to lay out.
	#[serde(deserialize_with = "lenient_vec")]
	pub nodes: Vec<GraphNode>,
	/// Directed edges between nodes.
	#[serde(deserialize_with = "lenient_vec")]
	pub edges: Vec<GraphEdge>,
	/// Requested viewport height in pixels.
	pub height: Option<f64>,
}

/// Decodes an array, skipping entries that don't decode. Anything that isn't
/// an array (including `null`) decodes as empty.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: DeserializeOwned,
{
	let value = serde_json::Value::deserialize(deserializer)?;
	let serde_json::Value::Array(items) = value else {
		return Ok(Vec::new());
	};
	Ok(items
		.into_iter()
		.filter_map(|item| serde_json::from_value(item).ok())
		.collect())
}

impl GraphProps {
	/// Drawing height: the declared height, or the default, floored at [`MIN_HEIGHT`].
	pub fn viewport_height(&self) -> f64 {
		self.height
			.filter(|h| h.is_finite())
			.unwrap_or(DEFAULT_HEIGHT)
			.max(MIN_HEIGHT)
	}

	/// Drops nodes without an id, then edges that don't connect two retained nodes.
	pub fn sanitized(&self) -> Self {
		let nodes: Vec<GraphNode> = self
			.nodes
			.iter()
			.filter(|n| !n.id.is_empty())
			.cloned()
			.collect();
		let edges: Vec<GraphEdge> = self
			.edges
			.iter()
			.filter(|e| {
				!e.source.is_empty()
					&& !e.target.is_empty()
					&& nodes.iter().any(|n| n.id == e.source)
					&& nodes.iter().any(|n| n.id == e.target)
			})
			.cloned()
			.collect();

		let (dropped_nodes, dropped_edges) =
			(self.nodes.len() - nodes.len(), self.edges.len() - edges.len());
		if dropped_nodes > 0 || dropped_edges > 0 {
			debug!(
				"graph-layout: dropped {} nodes without id, {} dangling edges",
				dropped_nodes, dropped_edges
			);
		}

		Self {
			title: self.title.clone(),
			nodes,
			edges,
			height: self.height,
		}
	}
}
