//! Response grammar for enrichment replies
//!
//! ```text
//! RELATIONSHIP: <id1> -> <id2> | <type> | <weight> | THEME: <text>
//! ```
//!
//! The theme segment is optional. Lines that do not start with
//! `RELATIONSHIP:` are ignored; lines that do but break the grammar are
//! rejected one at a time without affecting their neighbours.

use crate::graph::{EdgeType, NodeId};
use thiserror::Error;

const LINE_PREFIX: &str = "RELATIONSHIP:";
const THEME_PREFIX: &str = "THEME:";

/// One relationship line that satisfied the grammar
#[derive(Debug, Clone, PartialEq)]
pub struct ProposedRelationship {
    pub source: NodeId,
    pub target: NodeId,
    pub edge_type: EdgeType,
    pub weight: f64,
    pub theme: Option<String>,
}

/// Why a line was not turned into a relationship
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineRejection {
    #[error("not a relationship line")]
    NotARelationship,
    #[error("expected at least ids, type and weight separated by '|'")]
    MissingFields,
    #[error("expected '<id1> -> <id2>', got {0:?}")]
    MalformedIds(String),
    #[error("empty relationship type")]
    EmptyType,
    #[error("weight {0:?} is not a number")]
    InvalidWeight(String),
    #[error("weight {0} is outside 0.0..=1.0")]
    WeightOutOfRange(f64),
}

/// Parse a single line of a reply.
///
/// Weights must be finite and within `[0, 1]`; anything else is rejected
/// rather than clamped. The type is mapped onto [`EdgeType`] without
/// restricting it to `semantic`/`contrasts`.
pub fn parse_line(line: &str) -> Result<ProposedRelationship, LineRejection> {
    let content = line
        .trim()
        .strip_prefix(LINE_PREFIX)
        .ok_or(LineRejection::NotARelationship)?;

    let parts: Vec<&str> = content.split('|').map(str::trim).collect();
    if parts.len() < 3 {
        return Err(LineRejection::MissingFields);
    }

    let (source, target) = parts[0]
        .split_once("->")
        .map(|(s, t)| (s.trim(), t.trim()))
        .filter(|(s, t)| !s.is_empty() && !t.is_empty())
        .ok_or_else(|| LineRejection::MalformedIds(parts[0].to_string()))?;

    if parts[1].is_empty() {
        return Err(LineRejection::EmptyType);
    }

    let weight: f64 = parts[2]
        .parse()
        .map_err(|_| LineRejection::InvalidWeight(parts[2].to_string()))?;
    if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
        return Err(LineRejection::WeightOutOfRange(weight));
    }

    let theme = parts
        .get(3)
        .and_then(|p| p.strip_prefix(THEME_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    Ok(ProposedRelationship {
        source: NodeId::from(source),
        target: NodeId::from(target),
        edge_type: EdgeType::from(parts[1]),
        weight,
        theme,
    })
}

/// Every relationship line of a reply paired with its parse result, in order
pub fn parse_response(text: &str) -> Vec<(usize, Result<ProposedRelationship, LineRejection>)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, parse_line(line)))
        .filter(|(_, parsed)| !matches!(parsed, Err(LineRejection::NotARelationship)))
        .collect()
}
