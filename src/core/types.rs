// record types shared by the readers, the ordering engine and the matrix builder
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// One recorded data point: `value` for `relation` applied to `items`.
///
/// `items.len()` is the arity of the relation (1 = unary, 2 = binary, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub relation: String,
    pub value: String,
    pub items: Vec<String>,
}

impl Observation {
    pub fn new(relation: impl Into<String>, value: impl Into<String>, items: &[&str]) -> Self {
        Self {
            relation: relation.into(),
            value: value.into(),
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn arity(&self) -> usize {
        self.items.len()
    }
}

/// A schema entry: `name ~ distribution[params](domains)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub name: String,
    pub distribution: String,
    /// raw parameter text, quotes kept verbatim
    pub parameters: BTreeMap<String, String>,
    /// domain of each positional slot of an observation's items
    pub domains: Vec<String>,
    /// set for noisy relations declared as `(base; d1, d2, ...)`
    pub base_relation: Option<String>,
}

impl Relation {
    pub fn arity(&self) -> usize {
        self.domains.len()
    }

    pub fn is_noisy(&self) -> bool {
        self.base_relation.is_some()
    }
}

/// Relations keyed by name, iterated in first-declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    relations: Vec<Relation>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a relation. A redeclared name replaces the earlier entry in place
    /// and the earlier entry is returned.
    pub fn insert(&mut self, relation: Relation) -> Option<Relation> {
        match self.index.get(&relation.name).copied() {
            Some(pos) => Some(std::mem::replace(&mut self.relations[pos], relation)),
            None => {
                self.index.insert(relation.name.clone(), self.relations.len());
                self.relations.push(relation);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Relation> {
        self.index.get(name).map(|&pos| &self.relations[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relation> + '_ {
        self.relations.iter()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

/// One partition block of a domain's entities inside a top-level cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCluster {
    pub sub_cluster_id: String,
    pub domain: String,
    pub entities: Vec<String>,
}

impl DomainCluster {
    pub fn new(domain: impl Into<String>, sub_cluster_id: impl Into<String>, entities: &[&str]) -> Self {
        Self {
            sub_cluster_id: sub_cluster_id.into(),
            domain: domain.into(),
            entities: entities.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// A top-level cluster: a set of relations plus the per-domain partition of
/// the entities those relations range over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub cluster_id: String,
    pub relations: Vec<String>,
    pub domain_clusters: Vec<DomainCluster>,
}

impl Cluster {
    pub fn has_relation(&self, relation: &str) -> bool {
        self.relations.iter().any(|r| r == relation)
    }

    /// Distinct domains in order of first appearance.
    pub fn domains(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for dc in &self.domain_clusters {
            if !out.contains(&dc.domain.as_str()) {
                out.push(dc.domain.as_str());
            }
        }
        out
    }
}

/// Flattened entity axis for one domain, with sub-cluster boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainOrdering {
    pub entities: Vec<String>,
    pub dividers: Vec<usize>,
}

/// Flattened entity axis across every domain of a cluster.
///
/// `major_dividers` mark domain transitions, `minor_dividers` mark block
/// transitions inside one domain. Both are indices into `entities`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordering {
    pub entities: Vec<String>,
    pub major_dividers: Vec<usize>,
    pub minor_dividers: Vec<usize>,
}
