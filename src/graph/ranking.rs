//! Top-N projection of the node set by magnitude.

use super::types::Node;

/// A ranked node.
#[derive(Clone, Debug, PartialEq)]
pub struct RankEntry {
	/// 1-based.
	pub position: usize,
	/// Ranked node.
	pub node: Node,
}

/// The top of the node set by magnitude.
#[derive(Clone, Debug, PartialEq)]
pub enum Ranking {
	/// No nodes to rank; rendered as an explicit empty state.
	Empty,
	/// Largest magnitude first.
	Ranked(Vec<RankEntry>),
}

impl Ranking {
	/// Ranked rows; empty for `Ranking::Empty`.
	pub fn entries(&self) -> &[RankEntry] {
		match self {
			Ranking::Empty => &[],
			Ranking::Ranked(entries) => entries,
		}
	}

	/// True when there was nothing to rank.
	pub fn is_empty(&self) -> bool {
		matches!(self, Ranking::Empty)
	}
}

/// Sorts by descending magnitude, equal magnitudes by ascending id, and keeps
/// the first `limit`.
pub fn rank(nodes: &[Node], limit: usize) -> Ranking {
	let mut sorted: Vec<&Node> = nodes.iter().collect();
	sorted.sort_by(|a, b| {
		b.magnitude()
			.total_cmp(&a.magnitude())
			.then_with(|| a.id.cmp(&b.id))
	});
	let entries: Vec<RankEntry> = sorted
		.into_iter()
		.take(limit)
		.enumerate()
		.map(|(i, node)| RankEntry {
			position: i + 1,
			node: node.clone(),
		})
		.collect();
	if entries.is_empty() {
		Ranking::Empty
	} else {
		Ranking::Ranked(entries)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::NodeId;

	fn ids(ranking: &Ranking) -> Vec<NodeId> {
		ranking.entries().iter().map(|e| e.node.id.clone()).collect()
	}

	#[test]
	fn test_top_two() {
		let nodes = vec![
			Node::new(1, "a", 100.0),
			Node::new(2, "b", 80.0),
			Node::new(3, "c", 10.0),
		];
		let ranking = rank(&nodes, 2);
		assert_eq!(ids(&ranking), vec![NodeId::Int(1), NodeId::Int(2)]);
		assert_eq!(ranking.entries()[1].position, 2);
	}

	#[test]
	fn test_order_is_descending_and_truncated() {
		let nodes: Vec<Node> = (0..25)
			.map(|i| Node::new(i, format!("n{i}"), ((i * 37) % 11) as f64))
			.collect();
		let ranking = rank(&nodes, 10);
		let entries = ranking.entries();
		assert_eq!(entries.len(), 10);
		for pair in entries.windows(2) {
			assert!(pair[0].node.magnitude() >= pair[1].node.magnitude());
		}
	}

	#[test]
	fn test_ties_break_by_id() {
		let nodes = vec![
			Node::new("zeta", "z", 5.0),
			Node::new("alpha", "a", 5.0),
			Node::new(7, "seven", 5.0),
		];
		assert_eq!(
			ids(&rank(&nodes, 10)),
			vec![NodeId::Int(7), NodeId::from("alpha"), NodeId::from("zeta")]
		);
	}

	#[test]
	fn test_influence_outranks_score() {
		let mut quiet = Node::new(1, "quiet", 90.0);
		quiet.influence = Some(5.0);
		let loud = Node::new(2, "loud", 10.0);
		assert_eq!(ids(&rank(&[quiet, loud], 10)), vec![NodeId::Int(2), NodeId::Int(1)]);
	}

	#[test]
	fn test_empty_input_is_explicit() {
		assert_eq!(rank(&[], 10), Ranking::Empty);
		assert!(rank(&[Node::new(1, "a", 1.0)], 0).is_empty());
	}
}
