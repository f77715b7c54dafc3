// entity ordering + divider placement
//Turns the nested domain-cluster structure of one cluster into a flat axis.
// - blocks keep their file order, entities inside a block are sorted
// - minor dividers sit between blocks of the same domain
// - major dividers sit between domains (multi-domain axis only)
// Empty blocks contribute neither entities nor boundaries.
use std::collections::BTreeMap;

use crate::core::types::{Cluster, DomainCluster, DomainOrdering, Ordering};

fn sorted_entities(block: &DomainCluster) -> Vec<String> {
    let mut entities = block.entities.clone();
    entities.sort();
    entities
}

/// Entities of `domain` in the order the cluster prefers, plus a divider at
/// every internal boundary between two of its blocks.
pub fn order_for_domain(cluster: &Cluster, domain: &str) -> DomainOrdering {
    let mut out = DomainOrdering::default();

    let blocks = cluster
        .domain_clusters
        .iter()
        .filter(|dc| dc.domain == domain && !dc.is_empty());

    for (i, block) in blocks.enumerate() {
        if i > 0 {
            out.dividers.push(out.entities.len());
        }
        out.entities.extend(sorted_entities(block));
    }
    out
}

/// Entities of every domain of the cluster, domains in lexicographic order.
pub fn order_all(cluster: &Cluster) -> Ordering {
    //group by domain, keeping relative block order inside each group
    let mut groups: BTreeMap<&str, Vec<&DomainCluster>> = BTreeMap::new();
    for dc in cluster.domain_clusters.iter().filter(|dc| !dc.is_empty()) {
        groups.entry(dc.domain.as_str()).or_default().push(dc);
    }

    let mut out = Ordering::default();
    for (g, blocks) in groups.values().enumerate() {
        let offset = out.entities.len();
        if g > 0 {
            out.major_dividers.push(offset);
        }

        //all N cumulative boundaries of the group, the N-th one is the group's end
        let mut boundaries: Vec<usize> = blocks
            .iter()
            .scan(offset, |end, b| {
                *end += b.len();
                Some(*end)
            })
            .collect();
        boundaries.pop();
        out.minor_dividers.extend(boundaries);

        for block in blocks {
            out.entities.extend(sorted_entities(block));
        }
    }
    out
}
