// cluster result file
/*
Layout:

    <cluster_id> <relation> <relation> ...      one line per cluster
    ...
                                                blank line
    irm=<cluster_id>                            block header (any key=value)
    <domain> <sub_cluster_id> <entity> ...      zero or more block lines
                                                blank line or EOF closes the block
    irm=<cluster_id>
    ...

The clusters come out in section-1 order, each joined with its block.
A cluster with no block gets no domain clusters; a block for a cluster that
section 1 never declared is an error.
*/
use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::debug;

use crate::config::IngestConfig;
use crate::core::error::{IngestError, IngestResult};
use crate::core::types::{Cluster, DomainCluster};
use crate::format::read_file;

fn syntax(line_number: usize, line: &str, reason: impl Into<String>) -> IngestError {
    IngestError::ClusterSyntaxError {
        line_number,
        line: line.to_string(),
        reason: reason.into(),
    }
}

//section 1, in first-encountered order
#[derive(Default)]
struct RelationClusters {
    order: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
    owner: HashMap<String, String>,
}

impl RelationClusters {
    fn declare(&mut self, line_number: usize, line: &str, fields: &[&str]) -> IngestResult<()> {
        let id = fields[0];
        if self.index.contains_key(id) {
            return Err(syntax(line_number, line, format!("cluster {} declared twice", id)));
        }

        let mut relations = Vec::with_capacity(fields.len() - 1);
        for &rel in &fields[1..] {
            if let Some(first) = self.owner.get(rel) {
                return Err(IngestError::DuplicateRelationAssignment {
                    relation: rel.to_string(),
                    first: first.clone(),
                    second: id.to_string(),
                });
            }
            self.owner.insert(rel.to_string(), id.to_string());
            relations.push(rel.to_string());
        }

        self.index.insert(id.to_string(), self.order.len());
        self.order.push((id.to_string(), relations));
        Ok(())
    }
}

//an open section-2 block
struct Block {
    cluster_id: String,
    header_line: usize,
    header: String,
    domain_clusters: Vec<DomainCluster>,
}

impl Block {
    fn check_partition(&self) -> IngestResult<()> {
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        for dc in &self.domain_clusters {
            for e in &dc.entities {
                if !seen.insert((dc.domain.as_str(), e.as_str())) {
                    return Err(IngestError::PartitionOverlap {
                        cluster_id: self.cluster_id.clone(),
                        domain: dc.domain.clone(),
                        entity: e.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn commit(
    block: Block,
    declared: &RelationClusters,
    committed: &mut HashMap<String, Vec<DomainCluster>>,
) -> IngestResult<()> {
    if !declared.index.contains_key(&block.cluster_id) {
        return Err(IngestError::DanglingClusterReference {
            cluster_id: block.cluster_id,
        });
    }
    if committed.contains_key(&block.cluster_id) {
        return Err(syntax(
            block.header_line,
            &block.header,
            format!("second block for cluster {}", block.cluster_id),
        ));
    }
    block.check_partition()?;
    committed.insert(block.cluster_id, block.domain_clusters);
    Ok(())
}

fn parse_header(
    line_number: usize,
    line: &str,
    token: &str,
    config: &IngestConfig,
) -> IngestResult<String> {
    let parts: Vec<&str> = token.split('=').collect();
    let [key, value] = parts.as_slice() else {
        return Err(syntax(line_number, line, "expected a key=value block header"));
    };
    if key.is_empty() || value.is_empty() {
        return Err(syntax(line_number, line, "empty key or value in block header"));
    }
    if config.strict_header_key && *key != config.header_key {
        return Err(syntax(
            line_number,
            line,
            format!("expected header key {:?}", config.header_key),
        ));
    }
    Ok(value.to_string())
}

/// Parse a whole cluster result file.
pub fn parse_clusters(text: &str, config: &IngestConfig) -> IngestResult<Vec<Cluster>> {
    let mut lines = text.lines().enumerate().map(|(n, l)| (n + 1, l));

    //1. relation clusters, up to the first blank line
    let mut declared = RelationClusters::default();
    for (n, line) in lines.by_ref() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            break;
        }
        declared.declare(n, line, &fields)?;
    }

    //2. domain-cluster blocks
    let mut committed: HashMap<String, Vec<DomainCluster>> = HashMap::new();
    let mut open: Option<Block> = None;
    for (n, line) in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => {
                if let Some(block) = open.take() {
                    commit(block, &declared, &mut committed)?;
                }
            }
            [token] => {
                let cluster_id = parse_header(n, line, token, config)?;
                if let Some(block) = open.take() {
                    commit(block, &declared, &mut committed)?;
                }
                open = Some(Block {
                    cluster_id,
                    header_line: n,
                    header: line.to_string(),
                    domain_clusters: Vec::new(),
                });
            }
            [domain, sub_cluster_id, entities @ ..] => {
                let Some(block) = open.as_mut() else {
                    return Err(syntax(n, line, "domain-cluster line before any block header"));
                };
                block.domain_clusters.push(DomainCluster {
                    sub_cluster_id: sub_cluster_id.to_string(),
                    domain: domain.to_string(),
                    entities: entities.iter().map(|e| e.to_string()).collect(),
                });
            }
        }
    }
    if let Some(block) = open.take() {
        commit(block, &declared, &mut committed)?;
    }

    let clusters: Vec<Cluster> = declared
        .order
        .into_iter()
        .map(|(cluster_id, relations)| {
            let domain_clusters = committed.remove(&cluster_id).unwrap_or_default();
            Cluster {
                cluster_id,
                relations,
                domain_clusters,
            }
        })
        .collect();
    debug!(clusters = clusters.len(), "parsed cluster file");
    Ok(clusters)
}

pub fn load_clusters(path: impl AsRef<Path>, config: &IngestConfig) -> IngestResult<Vec<Cluster>> {
    let path = path.as_ref();
    let text = read_file(path)?;
    parse_clusters(&text, config).map_err(|e| e.in_file(path))
}

/// Write clusters in the layout `parse_clusters` reads, headers keyed by
/// `header_key`.
pub fn write_clusters(clusters: &[Cluster], header_key: &str) -> String {
    let mut out = String::new();
    for c in clusters {
        out.push_str(&c.cluster_id);
        for r in &c.relations {
            out.push(' ');
            out.push_str(r);
        }
        out.push('\n');
    }
    out.push('\n');

    for (i, c) in clusters.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{}={}\n", header_key, c.cluster_id));
        for dc in &c.domain_clusters {
            out.push_str(&dc.domain);
            out.push(' ');
            out.push_str(&dc.sub_cluster_id);
            for e in &dc.entities {
                out.push(' ');
                out.push_str(e);
            }
            out.push('\n');
        }
    }
    out
}
