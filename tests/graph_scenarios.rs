//! End-to-end behaviour of the graph model, views and interaction through the
//! public API.

use influence_graph::graph::config::StyleConfig;
use influence_graph::graph::interaction::Interaction;
use influence_graph::graph::style::node_radius;
use influence_graph::graph::{
	FilterCriteria, Graph, GraphConfig, GraphData, GraphEngine, Intent, LayoutKind, Link, Node,
	NodeId, Point, Ranking, rank,
};

const ORIGIN: Point = Point::new(0.0, 0.0);

fn three_nodes(links: Vec<Link>) -> Graph {
	Graph::from_data(GraphData {
		nodes: vec![
			Node::new(1, "One", 100.0),
			Node::new(2, "Two", 80.0),
			Node::new(3, "Three", 10.0),
		],
		links,
	})
}

fn ids(nodes: &[Node]) -> Vec<NodeId> {
	nodes.iter().map(|n| n.id.clone()).collect()
}

#[test]
fn test_rank_top_two() {
	let graph = three_nodes(vec![]);
	let ranking = rank(graph.nodes(), 2);
	let ranked: Vec<NodeId> = ranking.entries().iter().map(|e| e.node.id.clone()).collect();
	assert_eq!(ranked, vec![NodeId::Int(1), NodeId::Int(2)]);
	assert_eq!(ranking.entries()[0].position, 1);
}

#[test]
fn test_delete_cascades_links() {
	let mut graph = three_nodes(vec![Link::new(1, 2)]);
	graph.remove_node(&NodeId::Int(1));
	assert!(graph.links().is_empty());
	assert_eq!(ids(graph.nodes()), vec![NodeId::Int(2), NodeId::Int(3)]);
}

#[test]
fn test_min_score_filter_drops_hidden_endpoints() {
	let graph = three_nodes(vec![Link::new(1, 2), Link::new(2, 3), Link::new(3, 1)]);
	let criteria = FilterCriteria {
		min_score: 50.0,
		..FilterCriteria::default()
	};
	let view = criteria.apply(&graph);
	assert_eq!(ids(&view.nodes), vec![NodeId::Int(1), NodeId::Int(2)]);
	assert_eq!(view.links, vec![Link::new(1, 2)]);
	// The unfiltered model still has node 3.
	assert!(graph.contains(&NodeId::Int(3)));
}

#[test]
fn test_radius_is_monotonic_and_floored() {
	let style = StyleConfig::default();
	let scores = [0.0, 0.5, 3.0, 10.0, 42.0, 80.0, 100.0, 250.0, 1000.0, 1e6];
	for pair in scores.windows(2) {
		let (low, high) = (node_radius(pair[0], &style), node_radius(pair[1], &style));
		assert!(high >= low, "radius({}) < radius({})", pair[1], pair[0]);
		assert!(low >= style.radius_floor);
	}
}

#[test]
fn test_filtered_links_reference_visible_nodes() {
	let graph = Graph::from_data(GraphData {
		nodes: vec![
			Node::new(1, "A", 90.0).with_category("tech").with_region("EU"),
			Node::new(2, "B", 70.0).with_category("tech").with_region("US"),
			Node::new(3, "C", 60.0).with_category("finance").with_region("EU"),
			Node::new(4, "D", 5.0).with_category("tech").with_region("EU"),
		],
		links: vec![
			Link::new(1, 2),
			Link::new(1, 3),
			Link::new(1, 4),
			Link::new(2, 3),
			Link::new(3, 4),
			Link::new(4, "missing"),
		],
	});
	let criteria = [
		FilterCriteria::default(),
		FilterCriteria {
			category: Some("tech".into()),
			..FilterCriteria::default()
		},
		FilterCriteria {
			region: Some("EU".into()),
			min_score: 10.0,
			..FilterCriteria::default()
		},
	];
	for c in criteria {
		let view = c.apply(&graph);
		let visible = ids(&view.nodes);
		assert!(
			view.links
				.iter()
				.all(|l| visible.contains(&l.source) && visible.contains(&l.target)),
			"{c:?} kept a dangling link"
		);
	}
}

#[test]
fn test_ranking_is_sorted_and_truncated() {
	let nodes: Vec<Node> = [5.0, 90.0, 40.0, 90.0, 12.0, 61.0]
		.into_iter()
		.enumerate()
		.map(|(i, score)| Node::new(i as i64, format!("n{i}"), score))
		.collect();
	let ranking = rank(&nodes, 4);
	let entries = ranking.entries();
	assert_eq!(entries.len(), 4);
	assert!(
		entries
			.windows(2)
			.all(|w| w[0].node.magnitude() >= w[1].node.magnitude())
	);
	// Equal magnitudes fall back to id order.
	assert_eq!(entries[0].node.id, NodeId::Int(1));
	assert_eq!(entries[1].node.id, NodeId::Int(3));
	assert_eq!(rank(&[], 4), Ranking::Empty);
}

#[test]
fn test_second_drag_releases_first() {
	let mut interaction = Interaction::default();
	interaction.pointer_down(NodeId::Int(1), Point::new(10.0, 10.0), Point::new(12.0, 8.0));
	let intents =
		interaction.pointer_down(NodeId::Int(2), Point::new(50.0, 50.0), Point::new(50.0, 50.0));
	assert_eq!(intents[0], Intent::Release(NodeId::Int(1)));
	assert!(matches!(&intents[1], Intent::Pin { node, .. } if *node == NodeId::Int(2)));
	assert_eq!(interaction.drag().map(|d| &d.node), Some(&NodeId::Int(2)));
}

fn engine_for(graph: &Graph) -> GraphEngine {
	GraphEngine::create(
		graph.to_data(),
		LayoutKind::Orbital,
		GraphConfig::default(),
		800.0,
		600.0,
	)
}

fn screen_of(engine: &GraphEngine, id: i64) -> Point {
	let p = engine.position(&NodeId::Int(id)).unwrap();
	engine.transform().graph_to_screen(p)
}

/// Applies the data intents an owner would, returning how many links were
/// created.
fn apply(graph: &mut Graph, intents: Vec<Intent>) -> usize {
	let mut created = 0;
	for intent in intents {
		if let Intent::Connect { source, target } = intent {
			graph.connect(&source, &target).unwrap();
			created += 1;
		}
	}
	created
}

#[test]
fn test_connect_mode_creates_one_link_and_exits() {
	let mut graph = three_nodes(vec![]);
	let mut engine = engine_for(&graph);

	assert_eq!(engine.set_connect_mode(true), vec![Intent::ConnectModeChanged(true)]);
	let (a, b) = (screen_of(&engine, 2), screen_of(&engine, 3));
	let mut intents = engine.click(a, ORIGIN);
	intents.extend(engine.click(b, ORIGIN));

	assert!(intents.contains(&Intent::ConnectModeChanged(false)));
	assert_eq!(apply(&mut graph, intents), 1);
	assert_eq!(graph.links(), &[Link::new(2, 3).with_strength(0.5)]);
	assert!(!engine.interaction().connect_mode().is_active());
}

#[test]
fn test_connect_mode_same_node_twice_creates_nothing() {
	let mut graph = three_nodes(vec![]);
	let mut engine = engine_for(&graph);

	engine.set_connect_mode(true);
	let a = screen_of(&engine, 2);
	let mut intents = engine.click(a, ORIGIN);
	intents.extend(engine.click(a, ORIGIN));

	assert_eq!(apply(&mut graph, intents), 0);
	assert!(graph.links().is_empty());
	assert!(engine.interaction().connect_mode().is_active());
	assert_eq!(engine.escape(), vec![Intent::ConnectModeChanged(false)]);
}

#[test]
fn test_delete_key_flow_removes_selected_node() {
	let mut graph = three_nodes(vec![Link::new(1, 2), Link::new(2, 3)]);
	let mut engine = engine_for(&graph);

	engine.click(screen_of(&engine, 2), ORIGIN);
	let intents = engine.delete_selected();
	assert_eq!(
		intents,
		vec![Intent::Remove(NodeId::Int(2)), Intent::Selected(None)]
	);
	for intent in intents {
		if let Intent::Remove(id) = intent {
			graph.remove_node(&id);
		}
	}
	assert!(graph.links().is_empty());
	engine.update(graph.to_data());
	assert!(engine.position(&NodeId::Int(2)).is_none());
	assert_eq!(engine.frame().nodes.len(), 2);
}
