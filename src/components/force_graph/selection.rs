//! Selection collaborator contract.
//!
//! The graph never owns selection state. It asks the host whether a node is
//! selected when drawing and forwards clicks as toggles, keyed by the graph's
//! element key and the node id.

use std::collections::HashSet;

/// Host-owned selection store.
pub trait Selection {
	/// Whether `item_id` is selected within `element_key`.
	fn is_selected(&self, element_key: &str, item_id: &str) -> bool;
	/// Flips the selection of `item_id` within `element_key`.
	fn toggle_selection(&mut self, element_key: &str, item_id: &str);
}

/// In-memory selection store for hosts without their own.
#[derive(Clone, Debug, Default)]
pub struct SelectionSet {
	items: HashSet<(String, String)>,
}

impl SelectionSet {
	/// Number of selected items across all keys.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether nothing is selected.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

impl Selection for SelectionSet {
	fn is_selected(&self, element_key: &str, item_id: &str) -> bool {
		self.items
			.contains(&(element_key.to_string(), item_id.to_string()))
	}

	fn toggle_selection(&mut self, element_key: &str, item_id: &str) {
		let key = (element_key.to_string(), item_id.to_string());
		if !self.items.remove(&key) {
			self.items.insert(key);
		}
	}
}
