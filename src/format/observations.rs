// observation file: value,relation,item_1,...,item_k
use std::path::Path;

use tracing::debug;

use crate::core::error::{IngestError, IngestResult};
use crate::core::types::{Observation, Schema};
use crate::format::read_file;

const DELIMITER: char = ',';

/// Parse a whole observation file. Every line is a record and needs at least
/// three fields, so a blank line is malformed too.
pub fn parse_observations(text: &str) -> IngestResult<Vec<Observation>> {
    let mut out = Vec::new();
    for (n, raw) in text.lines().enumerate() {
        let line = raw.trim_end();
        let mut fields = line.split(DELIMITER);
        //field order on the line is value first, relation second
        let (Some(value), Some(relation)) = (fields.next(), fields.next()) else {
            return Err(malformed(n, raw));
        };
        let items: Vec<String> = fields.map(str::to_string).collect();
        if items.is_empty() {
            return Err(malformed(n, raw));
        }

        out.push(Observation {
            relation: relation.to_string(),
            value: value.to_string(),
            items,
        });
    }
    debug!(count = out.len(), "parsed observations");
    Ok(out)
}

fn malformed(n: usize, raw: &str) -> IngestError {
    IngestError::MalformedRecord {
        line_number: n + 1,
        line: raw.to_string(),
    }
}

pub fn load_observations(path: impl AsRef<Path>) -> IngestResult<Vec<Observation>> {
    let path = path.as_ref();
    let text = read_file(path)?;
    parse_observations(&text).map_err(|e| e.in_file(path))
}

/// Check each observation against the schema: the relation must be declared
/// and the item count must match its domains. Line numbers in errors are
/// 1-based positions in `observations`, which for a parsed file are its
/// line numbers.
pub fn validate_observations(observations: &[Observation], schema: &Schema) -> IngestResult<()> {
    for (n, ob) in observations.iter().enumerate() {
        let Some(rel) = schema.get(&ob.relation) else {
            return Err(IngestError::UnknownRelation {
                relation: ob.relation.clone(),
                line_number: n + 1,
            });
        };
        if rel.arity() != ob.arity() {
            return Err(IngestError::ArityMismatch {
                relation: ob.relation.clone(),
                expected: rel.arity(),
                found: ob.arity(),
                line_number: n + 1,
            });
        }
    }
    Ok(())
}

pub fn write_observations(observations: &[Observation]) -> String {
    let mut out = String::new();
    for ob in observations {
        out.push_str(&ob.value);
        out.push(DELIMITER);
        out.push_str(&ob.relation);
        for item in &ob.items {
            out.push(DELIMITER);
            out.push_str(item);
        }
        out.push('\n');
    }
    out
}
