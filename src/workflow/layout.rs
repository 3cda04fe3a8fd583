//! Node placement.
//!
//! [`LayeredLayout`] ranks nodes by their longest path from a source and
//! lays ranks out on a grid. Placement is a pure function of the input, so
//! the same graph always lands in the same place.

use std::collections::HashMap;

use log::warn;
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Deserialize;

use super::types::{GraphElements, Position};

/// Anything that can assign positions to graph elements. Edges pass through
/// untouched.
pub trait LayoutEngine {
	fn layout(&self, elements: GraphElements) -> GraphElements;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
	#[default]
	LeftToRight,
	TopToBottom,
}

/// Grid geometry, in graph units.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	pub direction: LayoutDirection,
	pub node_width: f64,
	pub node_height: f64,
	/// Space between consecutive ranks.
	pub rank_gap: f64,
	/// Space between nodes sharing a rank.
	pub node_gap: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			direction: LayoutDirection::LeftToRight,
			node_width: 172.0,
			node_height: 36.0,
			rank_gap: 80.0,
			node_gap: 24.0,
		}
	}
}

/// Longest-path layering on a grid.
#[derive(Clone, Debug, Default)]
pub struct LayeredLayout {
	config: LayoutConfig,
}

impl LayeredLayout {
	pub fn new(config: LayoutConfig) -> Self {
		Self { config }
	}

	/// Rank of every node, indexed like `elements.nodes`.
	fn ranks(elements: &GraphElements) -> Vec<usize> {
		let mut graph = DiGraph::<usize, ()>::with_capacity(elements.nodes.len(), elements.edges.len());
		let index: HashMap<&str, NodeIndex> = elements
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.as_str(), graph.add_node(i)))
			.collect();

		// edges touching an undrawn container take no part in placement
		for edge in &elements.edges {
			if let (Some(&src), Some(&tgt)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
				graph.add_edge(src, tgt, ());
			}
		}

		let mut ranks = vec![0; elements.nodes.len()];
		match toposort(&graph, None) {
			Ok(order) => {
				for idx in order {
					let rank = graph
						.neighbors_directed(idx, Direction::Incoming)
						.map(|parent| ranks[graph[parent]] + 1)
						.max()
						.unwrap_or(0);
					ranks[graph[idx]] = rank;
				}
			}
			Err(cycle) => {
				warn!(
					"workflow graph has a cycle through `{}`, placing all nodes on one rank",
					elements.nodes[graph[cycle.node_id()]].id
				);
			}
		}
		ranks
	}
}

impl LayoutEngine for LayeredLayout {
	fn layout(&self, mut elements: GraphElements) -> GraphElements {
		let ranks = Self::ranks(&elements);
		let mut filled: HashMap<usize, usize> = HashMap::new();
		let cfg = &self.config;

		for (node, rank) in elements.nodes.iter_mut().zip(ranks) {
			let slot = filled.entry(rank).or_insert(0);
			let (rank, slot_idx) = (rank as f64, *slot as f64);
			*slot += 1;

			node.position = match cfg.direction {
				LayoutDirection::LeftToRight => Position {
					x: rank * (cfg.node_width + cfg.rank_gap.max(0.0)),
					y: slot_idx * (cfg.node_height + cfg.node_gap.max(0.0)),
				},
				LayoutDirection::TopToBottom => Position {
					x: slot_idx * (cfg.node_width + cfg.node_gap.max(0.0)),
					y: rank * (cfg.node_height + cfg.rank_gap.max(0.0)),
				},
			};
		}
		elements
	}
}
