//! Workflow graph view logic.
//!
//! - [`model`] is the workflow as the server sends it.
//! - [`graph_builder`] turns it into drawable nodes and edges.
//! - [`layout`] places them.
//! - [`selection`] and [`navigation`] handle highlighting and clicks.
//! - [`controller`] owns fetch state, view mode and the YAML toggle.

pub mod controller;
pub mod graph_builder;
pub mod jobs;
pub mod layout;
pub mod model;
pub mod navigation;
pub mod selection;
pub mod types;

pub use controller::{FetchTicket, LoadState, ViewMode, WorkflowController};
pub use layout::{LayeredLayout, LayoutConfig, LayoutEngine};
pub use model::{JobNode, JobSummary, RunType, Workflow, WorkflowGraph};
pub use navigation::{FunctionRef, Navigator};
pub use selection::{DetailTarget, Selection};
pub use types::{GraphElements, Position, RenderEdge, RenderNode};
