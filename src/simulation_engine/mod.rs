pub mod engine;
pub mod path;

pub use engine::SimulationEngine;
pub use path::Path;
