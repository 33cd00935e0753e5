pub mod force_graph;
pub mod year_select;
