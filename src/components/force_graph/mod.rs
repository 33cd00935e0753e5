mod component;
mod error;
mod fetch;
mod forces;
mod graph;
mod interaction;
mod quadtree;
mod render;
pub mod scale;
mod session;
mod simulation;
mod types;
mod viewport;

pub use component::{ForceGraphCanvas, LoadStatus};
pub use simulation::SimulationConfig;
