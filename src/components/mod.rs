pub mod register_model;
pub mod workflow_graph;
pub mod workflow_view;
