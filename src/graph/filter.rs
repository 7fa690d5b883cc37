//! Score/category/region filtering into a self-consistent view.

use std::collections::{BTreeSet, HashSet};

use super::model::Graph;
use super::types::{GraphData, Node, NodeId};

/// What the filter panel selects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterCriteria {
	/// Inclusive lower bound on `Node::score`.
	pub min_score: f64,
	/// `None` means "All".
	pub category: Option<String>,
	/// `None` means "All".
	pub region: Option<String>,
}

impl FilterCriteria {
	/// Whether `node` passes every criterion.
	pub fn matches(&self, node: &Node) -> bool {
		node.score >= self.min_score
			&& self
				.category
				.as_ref()
				.is_none_or(|c| node.category.as_ref() == Some(c))
			&& self
				.region
				.as_ref()
				.is_none_or(|r| node.region.as_ref() == Some(r))
	}

	/// Keeps matching nodes and only the links whose endpoints both survive.
	pub fn apply(&self, graph: &Graph) -> GraphData {
		let nodes: Vec<Node> = graph
			.nodes()
			.iter()
			.filter(|node| self.matches(node))
			.cloned()
			.collect();
		let kept: HashSet<&NodeId> = nodes.iter().map(|node| &node.id).collect();
		let links = graph
			.links()
			.iter()
			.filter(|link| kept.contains(&link.source) && kept.contains(&link.target))
			.cloned()
			.collect();
		GraphData { nodes, links }
	}
}

/// Distinct categories, sorted, for the category selector.
pub fn categories(nodes: &[Node]) -> Vec<String> {
	distinct(nodes.iter().filter_map(|node| node.category.as_deref()))
}

/// Distinct regions, sorted, for the region selector.
pub fn regions(nodes: &[Node]) -> Vec<String> {
	distinct(nodes.iter().filter_map(|node| node.region.as_deref()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
	values
		.collect::<BTreeSet<_>>()
		.into_iter()
		.map(str::to_string)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::Link;

	fn sample() -> Graph {
		Graph::from_data(GraphData {
			nodes: vec![
				Node::new(1, "One", 100.0).with_category("ONG").with_region("EU"),
				Node::new(2, "Two", 80.0).with_category("Influenceur").with_region("EU"),
				Node::new(3, "Three", 10.0).with_category("ONG").with_region("US"),
			],
			links: vec![Link::new(1, 2), Link::new(2, 3), Link::new(1, 3), Link::new(1, 99)],
		})
	}

	fn assert_consistent(view: &GraphData) {
		let ids: HashSet<_> = view.nodes.iter().map(|n| &n.id).collect();
		for link in &view.links {
			assert!(ids.contains(&link.source) && ids.contains(&link.target));
		}
	}

	#[test]
	fn test_min_score_drops_links_to_hidden_nodes() {
		let view = FilterCriteria {
			min_score: 50.0,
			..FilterCriteria::default()
		}
		.apply(&sample());
		let ids: Vec<_> = view.nodes.iter().map(|n| n.id.clone()).collect();
		assert_eq!(ids, vec![NodeId::Int(1), NodeId::Int(2)]);
		assert_eq!(view.links, vec![Link::new(1, 2)]);
	}

	#[test]
	fn test_default_criteria_keep_everything_but_dangling_links() {
		let view = FilterCriteria::default().apply(&sample());
		assert_eq!(view.nodes.len(), 3);
		assert_eq!(view.links.len(), 3);
		assert_consistent(&view);
	}

	#[test]
	fn test_category_and_region_combine() {
		let graph = sample();
		let view = FilterCriteria {
			min_score: 0.0,
			category: Some("ONG".into()),
			region: Some("US".into()),
		}
		.apply(&graph);
		assert_eq!(view.nodes.len(), 1);
		assert!(view.links.is_empty());

		for min_score in [0.0, 20.0, 90.0, 200.0] {
			let view = FilterCriteria {
				min_score,
				category: Some("ONG".into()),
				region: None,
			}
			.apply(&graph);
			assert_consistent(&view);
		}
	}

	#[test]
	fn test_selector_options() {
		let graph = sample();
		assert_eq!(categories(graph.nodes()), vec!["Influenceur", "ONG"]);
		assert_eq!(regions(graph.nodes()), vec!["EU", "US"]);
	}
}
