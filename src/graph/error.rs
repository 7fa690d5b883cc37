use thiserror::Error;

use super::types::NodeId;

/// Failure to obtain the initial graph document.
#[derive(Debug, Error)]
pub enum LoadError {
	/// The request itself failed.
	#[error("fetch failed: {0}")]
	Fetch(String),
	/// Non-success status.
	#[error("server answered HTTP {0}")]
	Status(u16),
	/// Body is not a graph document.
	#[error("malformed graph document: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Rejected mutation of the graph model.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
	/// Label was blank.
	#[error("node label must not be empty")]
	EmptyLabel,
	/// Id already taken.
	#[error("node id {0} already exists")]
	DuplicateId(NodeId),
	/// No such node.
	#[error("no node with id {0}")]
	UnknownNode(NodeId),
	#[error("node {0} cannot link to itself")]
	SelfLink(NodeId),
}
