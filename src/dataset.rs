// schema + observations + clusters loaded together
use std::path::Path;

use tracing::debug;

use crate::config::IngestConfig;
use crate::core::error::IngestResult;
use crate::core::types::{Cluster, Observation, Schema};
use crate::format::{load_clusters, load_observations, load_schema, validate_observations};
use crate::plot::plan::{ClusterPlot, plan_clusters};

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub schema: Schema,
    pub observations: Vec<Observation>,
    pub clusters: Vec<Cluster>,
}

impl Dataset {
    pub fn plan(&self) -> Vec<ClusterPlot> {
        plan_clusters(&self.clusters, &self.schema, &self.observations)
    }
}

/// Load all three files. Each file is parsed completely before the next one
/// is read; the first error aborts the load.
pub fn load_dataset(
    schema_path: impl AsRef<Path>,
    observations_path: impl AsRef<Path>,
    clusters_path: impl AsRef<Path>,
    config: &IngestConfig,
) -> IngestResult<Dataset> {
    config.validate()?;

    let schema = load_schema(schema_path)?;
    let observations_path = observations_path.as_ref();
    let observations = load_observations(observations_path)?;
    if config.validate_observations {
        validate_observations(&observations, &schema).map_err(|e| e.in_file(observations_path))?;
    }
    let clusters = load_clusters(clusters_path, config)?;

    debug!(
        relations = schema.len(),
        observations = observations.len(),
        clusters = clusters.len(),
        "loaded dataset"
    );
    Ok(Dataset {
        schema,
        observations,
        clusters,
    })
}
