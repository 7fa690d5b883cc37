//! Fetching and parsing the `{ nodes, links }` document.

use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::error::LoadError;
use super::types::{GraphData, Link, Node};

/// Parses a graph document and clamps invalid magnitudes.
pub fn parse(json: &str) -> Result<GraphData, LoadError> {
	let data: GraphData = serde_json::from_str(json)?;
	Ok(sanitize(data))
}

/// Negative or non-finite scores and influences become 0.
pub fn sanitize(mut data: GraphData) -> GraphData {
	for node in &mut data.nodes {
		if !(node.score.is_finite() && node.score >= 0.0) {
			warn!("Node {} has invalid score {}, using 0", node.id, node.score);
			node.score = 0.0;
		}
		if let Some(influence) = node.influence.filter(|v| !(v.is_finite() && *v >= 0.0)) {
			warn!("Node {} has invalid influence {influence}, using 0", node.id);
			node.influence = Some(0.0);
		}
	}
	data
}

/// Two nodes and one link, shown when the real document cannot be loaded.
pub fn placeholder() -> GraphData {
	GraphData {
		nodes: vec![
			Node::new("Test1", "Nœud Test 1", 100.0).with_category("ONG"),
			Node::new("Test2", "Nœud Test 2", 80.0).with_category("Influenceur"),
		],
		links: vec![Link::new("Test1", "Test2").with_value(1.0).with_strength(0.5)],
	}
}

pub async fn fetch_graph(url: &str) -> Result<GraphData, LoadError> {
	let fetch_err = |e: wasm_bindgen::JsValue| LoadError::Fetch(format!("{e:?}"));

	let opts = RequestInit::new();
	opts.set_method("GET");
	opts.set_mode(RequestMode::SameOrigin);
	let request = Request::new_with_str_and_init(url, &opts).map_err(fetch_err)?;

	let window = web_sys::window().ok_or_else(|| LoadError::Fetch("no window".into()))?;
	let resp: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(fetch_err)?
		.dyn_into()
		.map_err(|_| LoadError::Fetch("not a Response".into()))?;
	if !resp.ok() {
		return Err(LoadError::Status(resp.status()));
	}

	let text = JsFuture::from(resp.text().map_err(fetch_err)?)
		.await
		.map_err(fetch_err)?
		.as_string()
		.ok_or_else(|| LoadError::Fetch("body is not text".into()))?;
	parse(&text)
}

/// Never fails: any load error is logged and the placeholder used instead.
pub async fn load_or_placeholder(url: &str) -> GraphData {
	match fetch_graph(url).await {
		Ok(data) => {
			info!(
				"Loaded {} nodes and {} links from {url}",
				data.nodes.len(),
				data.links.len()
			);
			data
		}
		Err(err) => {
			warn!("Could not load {url} ({err}), using placeholder data");
			placeholder()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::NodeId;

	#[test]
	fn test_parse_accepts_aliases() {
		let data = parse(
			r#"{
				"nodes": [
					{ "id": 1, "name": "Alpha", "group": "tech", "score": 12 },
					{ "id": "b", "label": "Beta", "type": "finance", "influence": 40, "region": "EU" }
				],
				"edges": [ { "from": 1, "to": "b", "weight": 3 } ]
			}"#,
		)
		.unwrap();
		assert_eq!(data.nodes[0].label, "Alpha");
		assert_eq!(data.nodes[0].category.as_deref(), Some("tech"));
		assert_eq!(data.nodes[1].id, NodeId::from("b"));
		assert_eq!(data.nodes[1].magnitude(), 40.0);
		assert_eq!(data.links[0], Link::new(1, "b").with_value(3.0));
	}

	#[test]
	fn test_missing_value_defaults_to_one() {
		let data = parse(r#"{ "nodes": [], "links": [ { "source": 1, "target": 2 } ] }"#).unwrap();
		assert_eq!(data.links[0].value, 1.0);
		assert_eq!(data.links[0].strength, None);
	}

	#[test]
	fn test_negative_magnitudes_are_clamped() {
		let data = parse(r#"{ "nodes": [ { "id": 1, "score": -5, "influence": -1 } ] }"#).unwrap();
		assert_eq!(data.nodes[0].score, 0.0);
		assert_eq!(data.nodes[0].influence, Some(0.0));
	}

	#[test]
	fn test_malformed_json_is_a_parse_error() {
		assert!(matches!(parse("{ nodes: "), Err(LoadError::Parse(_))));
		assert!(matches!(parse(r#"{ "nodes": [ { "label": "no id" } ] }"#), Err(LoadError::Parse(_))));
	}

	#[test]
	fn test_placeholder_is_renderable() {
		let data = placeholder();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.links.len(), 1);
		assert_eq!(data.nodes[0].label, "Nœud Test 1");
		assert!(data.links.iter().all(|l| data.nodes.iter().any(|n| n.id == l.source)));
	}
}
