// schema file: name ~ distribution[key=value,...](domain,...)  # comment
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::core::error::{IngestError, IngestResult};
use crate::core::types::{Relation, Schema};
use crate::format::read_file;

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\w+)\s*~\s*(\w+)\s*(?:\[([^\]]*)\]\s*)?\(([^)]*)\)\s*(?:#.*)?$")
        .expect("declaration pattern is valid")
});

static PARAMETER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\w+)\s*=\s*(\S(?:.*\S)?)\s*$").expect("parameter pattern is valid"));

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+$").expect("identifier pattern is valid"));

struct LineCtx<'a> {
    line_number: usize,
    line: &'a str,
}

impl LineCtx<'_> {
    fn error(&self, reason: impl Into<String>) -> IngestError {
        IngestError::SchemaSyntaxError {
            line_number: self.line_number,
            line: self.line.to_string(),
            reason: reason.into(),
        }
    }

    fn identifier<'t>(&self, token: &'t str, what: &str) -> IngestResult<&'t str> {
        let token = token.trim();
        if IDENTIFIER.is_match(token) {
            Ok(token)
        } else {
            Err(self.error(format!("expected {} identifier, got {:?}", what, token)))
        }
    }
}

fn parse_parameters(ctx: &LineCtx<'_>, clause: &str) -> IngestResult<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    for part in clause.split(',') {
        let caps = PARAMETER
            .captures(part)
            .ok_or_else(|| ctx.error(format!("expected key=value parameter, got {:?}", part.trim())))?;
        //value stays raw, quotes included
        params.insert(caps[1].to_string(), caps[2].to_string());
    }
    Ok(params)
}

fn parse_domains(ctx: &LineCtx<'_>, clause: &str) -> IngestResult<(Option<String>, Vec<String>)> {
    let (base, list) = match clause.split_once(';') {
        Some((base, rest)) => (Some(ctx.identifier(base, "base relation")?.to_string()), rest),
        None => (None, clause),
    };

    let domains = list
        .split(',')
        .map(|d| ctx.identifier(d, "domain").map(str::to_string))
        .collect::<IngestResult<Vec<_>>>()?;
    Ok((base, domains))
}

fn parse_declaration(ctx: &LineCtx<'_>) -> IngestResult<Relation> {
    let caps = DECLARATION
        .captures(ctx.line)
        .ok_or_else(|| ctx.error("expected `name ~ distribution[params](domains)`"))?;

    let parameters = match caps.get(3) {
        Some(clause) => parse_parameters(ctx, clause.as_str())?,
        None => BTreeMap::new(),
    };
    let (base_relation, domains) = parse_domains(ctx, &caps[4])?;

    Ok(Relation {
        name: caps[1].to_string(),
        distribution: caps[2].to_string(),
        parameters,
        domains,
        base_relation,
    })
}

//every noisy relation needs a declared base whose domains prefix its own
fn verify_noisy_relations(schema: &Schema) -> IngestResult<()> {
    for rel in schema.iter() {
        let Some(base_name) = rel.base_relation.as_deref() else {
            continue;
        };
        let base = schema.get(base_name).ok_or_else(|| IngestError::UnknownBaseRelation {
            relation: rel.name.clone(),
            base: base_name.to_string(),
        })?;
        if !rel.domains.starts_with(&base.domains) {
            return Err(IngestError::NoisyDomainMismatch {
                relation: rel.name.clone(),
                base: base_name.to_string(),
            });
        }
    }
    Ok(())
}

/// Parse a whole schema file. Blank lines and `#` comment lines are skipped;
/// the first line that does not match the grammar aborts the parse.
pub fn parse_schema(text: &str) -> IngestResult<Schema> {
    let mut schema = Schema::new();
    for (n, line) in text.lines().enumerate() {
        let head = line.trim_start();
        if head.is_empty() || head.starts_with('#') {
            continue;
        }

        let ctx = LineCtx {
            line_number: n + 1,
            line,
        };
        let relation = parse_declaration(&ctx)?;
        if let Some(old) = schema.insert(relation) {
            warn!(relation = %old.name, line = n + 1, "relation redeclared, keeping the later declaration");
        }
    }
    verify_noisy_relations(&schema)?;
    debug!(relations = schema.len(), "parsed schema");
    Ok(schema)
}

pub fn load_schema(path: impl AsRef<Path>) -> IngestResult<Schema> {
    let path = path.as_ref();
    let text = read_file(path)?;
    parse_schema(&text).map_err(|e| e.in_file(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(text: &str) -> Relation {
        let schema = parse_schema(text).unwrap();
        assert_eq!(schema.len(), 1);
        schema.iter().next().unwrap().clone()
    }

    #[test]
    fn quoted_parameter_value_is_kept_verbatim() {
        let r = single(r#"has_type ~ stringcat[strings="1br 2br 3br 4br studio"](record,County,State)"#);
        assert_eq!(r.name, "has_type");
        assert_eq!(r.distribution, "stringcat");
        assert_eq!(r.parameters.len(), 1);
        assert_eq!(r.parameters["strings"], "\"1br 2br 3br 4br studio\"");
        assert_eq!(r.domains, vec!["record", "County", "State"]);
        assert!(r.base_relation.is_none());
    }

    #[test]
    fn no_parameter_clause_means_no_parameters() {
        let r = single("black ~ bernoulli(animal)");
        assert!(r.parameters.is_empty());
        assert_eq!(r.domains, vec!["animal"]);
        assert_eq!(r.arity(), 1);
    }

    #[test]
    fn several_parameters_whitespace_and_trailing_comment() {
        let r = single("  height ~ normal [ mean = 1.5 , std=0.25 ] ( person , city )  # in metres");
        assert_eq!(r.parameters["mean"], "1.5");
        assert_eq!(r.parameters["std"], "0.25");
        assert_eq!(r.domains, vec!["person", "city"]);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let schema = parse_schema("# animals\n\n   # indented comment\nblack ~ bernoulli(animal)\n\n").unwrap();
        assert_eq!(schema.len(), 1);
        assert!(schema.contains("black"));
    }

    #[test]
    fn noisy_relation_records_its_base() {
        let schema = parse_schema(
            "name ~ stringcat[strings=\"a b\"](person)\n\
             noisy_name ~ simple_string(name; person, record)\n",
        )
        .unwrap();
        let noisy = schema.get("noisy_name").unwrap();
        assert_eq!(noisy.base_relation.as_deref(), Some("name"));
        assert_eq!(noisy.domains, vec!["person", "record"]);
        assert!(noisy.is_noisy());
    }

    #[test]
    fn noisy_relation_checks() {
        let err = parse_schema("n ~ bitflip(missing; a)\n").unwrap_err();
        assert!(matches!(err, IngestError::UnknownBaseRelation { .. }));

        let err = parse_schema("b ~ bernoulli(a, c)\nn ~ bitflip(b; a, d)\n").unwrap_err();
        assert!(matches!(err, IngestError::NoisyDomainMismatch { .. }));
    }

    #[test]
    fn bad_lines_report_line_number_and_text() {
        let cases = [
            "black bernoulli(animal)",
            "black ~ bernoulli",
            "black ~ bernoulli()",
            "black ~ bernoulli(animal,)",
            "black ~ bernoulli[p](animal)",
            "black ~ bernoulli[](animal)",
            "black ~ bernoulli(animal) trailing",
        ];
        for case in cases {
            let text = format!("ok ~ bernoulli(animal)\n{}\n", case);
            match parse_schema(&text) {
                Err(IngestError::SchemaSyntaxError { line_number, line, .. }) => {
                    assert_eq!(line_number, 2, "case {:?}", case);
                    assert_eq!(line, case);
                }
                other => panic!("case {:?}: unexpected result {:?}", case, other),
            }
        }
    }

    #[test]
    fn redeclared_relation_keeps_the_later_one() {
        let schema = parse_schema("r ~ bernoulli(a)\ns ~ normal(a)\nr ~ normal(a, a)\n").unwrap();
        let names: Vec<&str> = schema.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["r", "s"]);
        assert_eq!(schema.get("r").unwrap().distribution, "normal");
    }
}
