//! Readers and writers for the three line-oriented file formats.
//!
//! - `.obs`: `value,relation,item_1,...,item_k`
//! - `.schema`: `name ~ distribution[key=value,...](domain,...)`
//! - cluster result: relation-cluster lines, a blank line, then
//!   `key=cluster_id` headed blocks of `domain sub_id entity...` lines
//!
//! Every `parse_*` consumes the whole text and returns either a complete
//! result or the first error. The `load_*` variants read a file first and
//! attach its path to any error.

pub mod clusters;
pub mod observations;
pub mod schema;

use std::fs;
use std::path::Path;

use crate::core::error::{IngestError, IngestResult};

pub use clusters::{load_clusters, parse_clusters, write_clusters};
pub use observations::{load_observations, parse_observations, validate_observations, write_observations};
pub use schema::{load_schema, parse_schema};

pub(crate) fn read_file(path: &Path) -> IngestResult<String> {
    fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}
