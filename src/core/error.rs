use std::path::PathBuf;

use thiserror::Error;

pub type IngestResult<T> = Result<T, IngestError>;

/// Every failure is fatal to the parse or load call that raised it.
#[derive(Error, Debug)]
pub enum IngestError {
    //observation file
    #[error("malformed observation at line {line_number}: expected value,relation,item[,item...] but got {line:?}")]
    MalformedRecord { line_number: usize, line: String },

    //schema file
    #[error("schema syntax error at line {line_number} ({reason}): {line:?}")]
    SchemaSyntaxError {
        line_number: usize,
        line: String,
        reason: String,
    },

    #[error("noisy relation {relation} refers to undeclared base relation {base}")]
    UnknownBaseRelation { relation: String, base: String },

    #[error("noisy relation {relation} does not start with the domains of its base relation {base}")]
    NoisyDomainMismatch { relation: String, base: String },

    //cluster file
    #[error("cluster file syntax error at line {line_number} ({reason}): {line:?}")]
    ClusterSyntaxError {
        line_number: usize,
        line: String,
        reason: String,
    },

    #[error("domain-cluster block refers to cluster {cluster_id} which is not declared in the relation-cluster section")]
    DanglingClusterReference { cluster_id: String },

    #[error("relation {relation} is assigned to both cluster {first} and cluster {second}")]
    DuplicateRelationAssignment {
        relation: String,
        first: String,
        second: String,
    },

    #[error("entity {entity} of domain {domain} appears in more than one block of cluster {cluster_id}")]
    PartitionOverlap {
        cluster_id: String,
        domain: String,
        entity: String,
    },

    //observations vs schema
    #[error("observation at line {line_number} uses relation {relation} which is not in the schema")]
    UnknownRelation { relation: String, line_number: usize },

    #[error("observation at line {line_number} of relation {relation} has {found} items, schema declares {expected}")]
    ArityMismatch {
        relation: String,
        expected: usize,
        found: usize,
        line_number: usize,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<IngestError>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("export failed: {0}")]
    Export(String),
}

impl IngestError {
    /// Attach the file path a parse error came from. Errors that already
    /// carry a path are returned unchanged.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            e @ (IngestError::Io { .. } | IngestError::InFile { .. }) => e,
            other => IngestError::InFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error with any file context removed.
    pub fn root(&self) -> &IngestError {
        match self {
            IngestError::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}
