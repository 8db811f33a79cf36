pub mod concurrency;
pub mod graph;
pub mod instance;
pub mod raw;
pub mod reachability;
pub mod render;
pub mod report;
pub mod rework;

pub use concurrency::*;
pub use graph::*;
pub use instance::*;
pub use raw::*;
pub use reachability::*;
pub use render::*;
pub use report::*;
pub use rework::*;
