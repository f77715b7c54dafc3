// hand-off to the renderer: the planned panels serialized as TOON
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::core::error::{IngestError, IngestResult};
use crate::plot::plan::ClusterPlot;

#[derive(Serialize)]
struct PlotDocument<'a> {
    clusters: &'a [ClusterPlot],
}

pub fn to_toon(plots: &[ClusterPlot]) -> IngestResult<String> {
    toon_format::encode_default(&PlotDocument { clusters: plots }).map_err(|e| IngestError::Export(e.to_string()))
}

pub fn write_toon(path: impl AsRef<Path>, plots: &[ClusterPlot]) -> IngestResult<()> {
    let path = path.as_ref();
    let text = to_toon(plots)?;
    fs::write(path, text).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), clusters = plots.len(), "wrote plot plan");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Cluster, DomainCluster, Observation, Schema};
    use crate::plot::plan::plan_clusters;

    fn plots() -> Vec<ClusterPlot> {
        let clusters = vec![Cluster {
            cluster_id: "7".to_string(),
            relations: vec!["black".to_string()],
            domain_clusters: vec![
                DomainCluster::new("animal", "0", &["otter", "beaver"]),
                DomainCluster::new("animal", "1", &["seal"]),
            ],
        }];
        let obs = vec![
            Observation::new("black", "1", &["otter"]),
            Observation::new("black", "0", &["seal"]),
        ];
        plan_clusters(&clusters, &Schema::new(), &obs)
    }

    #[test]
    fn toon_carries_ids_labels_and_dividers() {
        let text = to_toon(&plots()).unwrap();
        assert!(text.contains("cluster_id"));
        assert!(text.contains("beaver"));
        assert!(text.contains("minor_dividers"));
        assert!(text.contains("black"));
    }

    #[test]
    fn write_toon_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.toon");
        write_toon(&path, &plots()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_toon(&plots()).unwrap());

        let err = write_toon(dir.path().join("missing").join("plan.toon"), &plots()).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
