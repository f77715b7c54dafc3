// per-cluster matrix panels, ready for a renderer
use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::matrix::{Matrix, build_binary, build_unary, collate};
use crate::core::ordering::{order_all, order_for_domain};
use crate::core::types::{Cluster, DomainOrdering, Observation, Ordering, Schema};

/// All unary relations of a cluster against every entity of the cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryPanel {
    /// column labels: the cluster's relations that have unary observations, sorted
    pub relations: Vec<String>,
    /// row labels and row dividers
    pub ordering: Ordering,
    pub matrix: Matrix,
    pub observations: usize,
}

/// One binary relation, item 0 on the rows and item 1 on the columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryPanel {
    pub relation: String,
    pub row_domain: String,
    pub col_domain: String,
    pub rows: DomainOrdering,
    pub cols: DomainOrdering,
    pub matrix: Matrix,
    pub observations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterPlot {
    pub cluster_id: String,
    pub unary: Option<UnaryPanel>,
    pub binary: Vec<BinaryPanel>,
}

//row and column domains of a binary relation; without a schema entry both
//axes fall back to the cluster's first domain
fn binary_domains(relation: &str, cluster: &Cluster, schema: &Schema) -> Option<(String, String)> {
    if let Some(rel) = schema.get(relation) {
        if let [d1, d2, ..] = rel.domains.as_slice() {
            return Some((d1.clone(), d2.clone()));
        }
    }
    let first = cluster.domain_clusters.first()?;
    Some((first.domain.clone(), first.domain.clone()))
}

/// Build every panel for one cluster from the observations of its relations.
pub fn plan_cluster(cluster: &Cluster, schema: &Schema, observations: &[Observation]) -> ClusterPlot {
    let own: HashSet<&str> = cluster.relations.iter().map(String::as_str).collect();
    let collated = collate(observations.iter().filter(|ob| own.contains(ob.relation.as_str())));

    let unary = if collated.unary.is_empty() {
        None
    } else {
        let mut relations: Vec<String> = collated.unary.iter().map(|ob| ob.relation.clone()).collect();
        relations.sort();
        relations.dedup();

        let ordering = order_all(cluster);
        let matrix = build_unary(&collated.unary, &ordering.entities, &relations);
        debug!(
            cluster = %cluster.cluster_id,
            observations = collated.unary.len(),
            "planned unary panel"
        );
        Some(UnaryPanel {
            relations,
            ordering,
            matrix,
            observations: collated.unary.len(),
        })
    };

    let mut binary = Vec::with_capacity(collated.binary_relation_count());
    for (relation, obs) in collated.binary() {
        let Some((row_domain, col_domain)) = binary_domains(relation, cluster, schema) else {
            warn!(cluster = %cluster.cluster_id, relation, "no domain to lay out binary relation on, skipping");
            continue;
        };
        let rows = order_for_domain(cluster, &row_domain);
        let cols = order_for_domain(cluster, &col_domain);
        let matrix = build_binary(obs, &rows.entities, &cols.entities);
        debug!(
            cluster = %cluster.cluster_id,
            relation,
            observations = obs.len(),
            "planned binary panel"
        );
        binary.push(BinaryPanel {
            relation: relation.to_string(),
            row_domain,
            col_domain,
            rows,
            cols,
            matrix,
            observations: obs.len(),
        });
    }

    ClusterPlot {
        cluster_id: cluster.cluster_id.clone(),
        unary,
        binary,
    }
}

pub fn plan_clusters(clusters: &[Cluster], schema: &Schema, observations: &[Observation]) -> Vec<ClusterPlot> {
    clusters
        .iter()
        .map(|c| plan_cluster(c, schema, observations))
        .collect()
}
