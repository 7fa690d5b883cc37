//! The authoritative node/link collection and its mutations.
//!
//! Links hold weak id references; an id index is kept in step with the node
//! vector on every insert and removal.

use std::collections::HashMap;

use log::{debug, warn};

use super::config::StyleConfig;
use super::error::GraphError;
use super::style;
use super::types::{GraphData, Link, Node, NodeId};

/// User input for a new node, validated by [`Graph::add_node`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeDraft {
	/// Must not be blank after trimming.
	pub label: String,
	/// Blank input becomes `None`.
	pub category: Option<String>,
	/// Blank input becomes `None`.
	pub region: Option<String>,
	/// Clamped to zero or above.
	pub score: f64,
	/// Overrides `score` as the node's magnitude when set.
	pub influence: Option<f64>,
}

/// Read-only record handed to the detail panel.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDetails {
	/// Node id.
	pub id: NodeId,
	/// Full label.
	pub label: String,
	/// Category, if any.
	pub category: Option<String>,
	/// Region, if any.
	pub region: Option<String>,
	/// Raw score.
	pub score: f64,
	/// Explicit influence, if any.
	pub influence: Option<f64>,
	/// Influence when present, otherwise score.
	pub magnitude: f64,
	/// Links touching the node.
	pub connections: usize,
	/// Resolved fill color.
	pub color: String,
	/// Rendered radius in layout units.
	pub radius: f64,
}

/// Nodes and links with unique ids and no dangling links.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	nodes: Vec<Node>,
	links: Vec<Link>,
	index: HashMap<NodeId, usize>,
}

impl Graph {
	/// Builds the model, dropping repeated ids (first occurrence wins).
	pub fn from_data(data: GraphData) -> Self {
		let mut graph = Self {
			links: data.links,
			..Self::default()
		};
		for node in data.nodes {
			if let Err(err) = graph.insert_node(node) {
				warn!("Dropping node while loading: {err}");
			}
		}
		graph
	}

	/// Snapshot for the views.
	pub fn to_data(&self) -> GraphData {
		GraphData {
			nodes: self.nodes.clone(),
			links: self.links.clone(),
		}
	}

	/// Nodes in insertion order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Links in insertion order.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Node by id.
	pub fn node(&self, id: &NodeId) -> Option<&Node> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	/// Whether a node with `id` exists.
	pub fn contains(&self, id: &NodeId) -> bool {
		self.index.contains_key(id)
	}

	/// Adds `node`, rejecting duplicate ids.
	pub fn insert_node(&mut self, node: Node) -> Result<(), GraphError> {
		if self.index.contains_key(&node.id) {
			return Err(GraphError::DuplicateId(node.id));
		}
		self.index.insert(node.id.clone(), self.nodes.len());
		self.nodes.push(node);
		Ok(())
	}

	/// Removes the node and every link touching it.
	pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
		let i = self.index.remove(id)?;
		let node = self.nodes.remove(i);
		for slot in self.index.values_mut() {
			if *slot > i {
				*slot -= 1;
			}
		}
		let before = self.links.len();
		self.links.retain(|link| !link.touches(id));
		debug!(
			"Removed node {id} and {} incident link(s)",
			before - self.links.len()
		);
		Some(node)
	}

	/// Adds a link between two existing, distinct nodes. Parallel links are
	/// allowed.
	pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> Result<(), GraphError> {
		if source == target {
			return Err(GraphError::SelfLink(source.clone()));
		}
		for id in [source, target] {
			if !self.contains(id) {
				return Err(GraphError::UnknownNode(id.clone()));
			}
		}
		self.links
			.push(Link::new(source.clone(), target.clone()).with_strength(0.5));
		Ok(())
	}

	/// Removes the link at `index`.
	pub fn remove_link(&mut self, index: usize) -> Option<Link> {
		(index < self.links.len()).then(|| self.links.remove(index))
	}

	/// Number of links touching `id`.
	pub fn connection_count(&self, id: &NodeId) -> usize {
		self.links.iter().filter(|link| link.touches(id)).count()
	}

	/// First `main` node, otherwise the largest magnitude (ties by id).
	pub fn central_node(&self) -> Option<&Node> {
		central_node(&self.nodes)
	}

	/// Timestamp-derived id, bumped past every integer id already in use.
	pub fn next_id(&self, now_ms: i64) -> NodeId {
		let floor = self
			.nodes
			.iter()
			.filter_map(|node| match node.id {
				NodeId::Int(i) => Some(i.saturating_add(1)),
				NodeId::Text(_) => None,
			})
			.max()
			.unwrap_or(i64::MIN);
		NodeId::Int(now_ms.max(floor))
	}

	/// Validates the draft, inserts the node and links it to the central node
	/// if there is one.
	pub fn add_node(&mut self, draft: NodeDraft, now_ms: i64) -> Result<NodeId, GraphError> {
		let label = draft.label.trim();
		if label.is_empty() {
			return Err(GraphError::EmptyLabel);
		}
		let hub = self.central_node().map(|node| node.id.clone());
		let id = self.next_id(now_ms);
		let mut node = Node::new(id.clone(), label, draft.score.max(0.0));
		node.category = draft.category.filter(|c| !c.is_empty());
		node.region = draft.region.filter(|r| !r.is_empty());
		node.influence = draft.influence.map(|v| v.max(0.0));
		self.insert_node(node)?;
		if let Some(hub) = hub {
			self.connect(&hub, &id)?;
		}
		Ok(id)
	}

	/// Overwrites the editable fields of an existing node. Links and
	/// position are kept.
	pub fn edit_node(&mut self, id: &NodeId, draft: NodeDraft) -> Result<(), GraphError> {
		let label = draft.label.trim();
		if label.is_empty() {
			return Err(GraphError::EmptyLabel);
		}
		let &i = self
			.index
			.get(id)
			.ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
		let node = &mut self.nodes[i];
		node.label = label.to_string();
		node.category = draft.category.filter(|c| !c.is_empty());
		node.region = draft.region.filter(|r| !r.is_empty());
		node.score = draft.score.max(0.0);
		node.influence = draft.influence.map(|v| v.max(0.0));
		Ok(())
	}

	/// Details for the panel, or `None` for unknown ids.
	pub fn details(&self, id: &NodeId, style_config: &StyleConfig) -> Option<NodeDetails> {
		let node = self.node(id)?;
		Some(NodeDetails {
			id: node.id.clone(),
			label: node.label.clone(),
			category: node.category.clone(),
			region: node.region.clone(),
			score: node.score,
			influence: node.influence,
			magnitude: node.magnitude(),
			connections: self.connection_count(id),
			color: style::node_color(node).to_string(),
			radius: style::node_radius(node.magnitude(), style_config),
		})
	}
}

pub(crate) fn central_node(nodes: &[Node]) -> Option<&Node> {
	nodes.iter().find(|node| node.is_central()).or_else(|| {
		nodes.iter().max_by(|a, b| {
			a.magnitude()
				.total_cmp(&b.magnitude())
				.then_with(|| b.id.cmp(&a.id))
		})
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Graph {
		Graph::from_data(GraphData {
			nodes: vec![
				Node::new(1, "One", 100.0),
				Node::new(2, "Two", 80.0),
				Node::new(3, "Three", 10.0),
			],
			links: vec![Link::new(1, 2), Link::new(2, 3), Link::new(3, 1)],
		})
	}

	#[test]
	fn test_duplicate_ids_are_dropped_on_load() {
		let graph = Graph::from_data(GraphData {
			nodes: vec![Node::new("a", "first", 1.0), Node::new("a", "second", 2.0)],
			links: vec![],
		});
		assert_eq!(graph.nodes().len(), 1);
		assert_eq!(graph.node(&"a".into()).unwrap().label, "first");
	}

	#[test]
	fn test_remove_node_cascades_and_reindexes() {
		let mut graph = sample();
		let removed = graph.remove_node(&NodeId::Int(1)).unwrap();
		assert_eq!(removed.label, "One");
		assert_eq!(graph.links(), &[Link::new(2, 3)]);
		assert!(graph.links().iter().all(|l| graph.contains(&l.source) && graph.contains(&l.target)));
		assert_eq!(graph.node(&NodeId::Int(3)).unwrap().label, "Three");
		assert!(graph.remove_node(&NodeId::Int(1)).is_none());
	}

	#[test]
	fn test_connect_rejects_self_and_unknown() {
		let mut graph = sample();
		assert_eq!(
			graph.connect(&NodeId::Int(1), &NodeId::Int(1)),
			Err(GraphError::SelfLink(NodeId::Int(1)))
		);
		assert_eq!(
			graph.connect(&NodeId::Int(1), &NodeId::Int(9)),
			Err(GraphError::UnknownNode(NodeId::Int(9)))
		);
		assert_eq!(graph.links().len(), 3);
	}

	#[test]
	fn test_parallel_links_are_kept() {
		let mut graph = sample();
		graph.connect(&NodeId::Int(1), &NodeId::Int(2)).unwrap();
		assert_eq!(graph.connection_count(&NodeId::Int(1)), 3);
	}

	#[test]
	fn test_add_node_validates_and_links_to_hub() {
		let mut graph = sample();
		let blank = NodeDraft {
			label: "   ".into(),
			..NodeDraft::default()
		};
		assert_eq!(graph.add_node(blank, 5), Err(GraphError::EmptyLabel));
		assert_eq!(graph.nodes().len(), 3);

		let draft = NodeDraft {
			label: " New actor ".into(),
			category: Some("tech".into()),
			region: None,
			score: 20.0,
			influence: None,
		};
		let id = graph.add_node(draft, 2).unwrap();
		// A clock reading of 2 collides with existing ids, so it is bumped.
		assert_eq!(id, NodeId::Int(4));
		assert_eq!(graph.node(&id).unwrap().label, "New actor");
		assert!(graph.links().contains(&Link::new(1, 4).with_strength(0.5)));
	}

	#[test]
	fn test_edit_node_keeps_links() {
		let mut graph = sample();
		let draft = NodeDraft {
			label: "Renamed".into(),
			category: Some(String::new()),
			region: Some("EU".into()),
			score: -4.0,
			influence: None,
		};
		graph.edit_node(&NodeId::Int(3), draft).unwrap();
		let node = graph.node(&NodeId::Int(3)).unwrap();
		assert_eq!(node.label, "Renamed");
		assert_eq!(node.category, None);
		assert_eq!(node.region.as_deref(), Some("EU"));
		assert_eq!(node.score, 0.0);
		assert_eq!(graph.connection_count(&NodeId::Int(3)), 2);
		assert_eq!(
			graph.edit_node(&NodeId::Int(9), NodeDraft { label: "x".into(), ..NodeDraft::default() }),
			Err(GraphError::UnknownNode(NodeId::Int(9)))
		);
	}

	#[test]
	fn test_edit_influence_reorders_ranking() {
		let mut graph = Graph::from_data(GraphData {
			nodes: vec![
				Node::new(1, "One", 10.0).with_influence(100.0),
				Node::new(2, "Two", 10.0).with_influence(80.0),
			],
			links: vec![],
		});
		let mut draft = NodeDraft {
			label: "Two".into(),
			score: 10.0,
			influence: Some(500.0),
			..NodeDraft::default()
		};
		graph.edit_node(&NodeId::Int(2), draft.clone()).unwrap();
		let top = crate::graph::rank(graph.nodes(), 1);
		assert_eq!(top.entries()[0].node.id, NodeId::Int(2));

		let style = StyleConfig::default();
		let before = graph.details(&NodeId::Int(2), &style).unwrap().radius;
		draft.influence = Some(1.0);
		graph.edit_node(&NodeId::Int(2), draft).unwrap();
		let after = graph.details(&NodeId::Int(2), &style).unwrap();
		assert_eq!(after.magnitude, 1.0);
		assert!(after.radius < before);

		// Clearing influence lets the edited score drive the ranking.
		let score_only = NodeDraft {
			label: "Two".into(),
			score: 500.0,
			..NodeDraft::default()
		};
		graph.edit_node(&NodeId::Int(2), score_only).unwrap();
		assert_eq!(crate::graph::rank(graph.nodes(), 1).entries()[0].node.id, NodeId::Int(2));
	}

	#[test]
	fn test_next_id_follows_clock() {
		let graph = sample();
		assert_eq!(graph.next_id(1_700_000_000_000), NodeId::Int(1_700_000_000_000));
	}

	#[test]
	fn test_central_node_prefers_main_category() {
		let mut graph = sample();
		assert_eq!(graph.central_node().unwrap().id, NodeId::Int(1));
		graph
			.insert_node(Node::new("hub", "Hub", 0.0).with_category("main"))
			.unwrap();
		assert_eq!(graph.central_node().unwrap().id, NodeId::from("hub"));
	}

	#[test]
	fn test_details_snapshot() {
		let graph = sample();
		let details = graph.details(&NodeId::Int(2), &StyleConfig::default()).unwrap();
		assert_eq!(details.connections, 2);
		assert_eq!(details.color, style::FALLBACK_COLOR);
		assert!(details.radius >= StyleConfig::default().radius_floor);
	}
}
