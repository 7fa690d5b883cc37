pub mod add_node;
mod canvas;
pub mod detail_panel;
pub mod filters;
pub mod force_graph;
pub mod graph3d;
pub mod ranking;
pub mod toolbar;
