pub mod export;
pub mod plan;

pub use export::{to_toon, write_toon};
pub use plan::{BinaryPanel, ClusterPlot, UnaryPanel, plan_cluster, plan_clusters};
