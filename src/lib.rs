//! Reads the files around a hierarchical relational clustering run
//! (observations, relation schema, cluster assignment) and lays each cluster
//! out as entity-ordered matrices with two tiers of divider lines.

pub mod config;
pub mod core;
pub mod dataset;
pub mod format;
pub mod plot;

pub use crate::config::IngestConfig;
pub use crate::core::error::{IngestError, IngestResult};
pub use crate::core::matrix::{Collated, Matrix, NumericMatrix, build_binary, build_unary, collate};
pub use crate::core::ordering::{order_all, order_for_domain};
pub use crate::core::types::{Cluster, DomainCluster, DomainOrdering, Observation, Ordering, Relation, Schema};
pub use crate::dataset::{Dataset, load_dataset};
