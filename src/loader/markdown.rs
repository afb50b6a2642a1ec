//! Markdown sources with YAML frontmatter

use super::values::{field_list, field_string};
use super::{LoadError, LoadResult};
use crate::graph::{ContentRecord, Node, NodeType, RawBody};
use regex::Regex;
use serde_yaml::Value;
use std::path::{Component, Path};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Leading `---` fenced block of a markdown file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frontmatter<'a> {
    Absent,
    Unterminated,
    Present { yaml: &'a str, body: &'a str },
}

/// Split a file into its frontmatter and body.
pub fn split_frontmatter(text: &str) -> Frontmatter<'_> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(rest) = text.strip_prefix("---") else {
        return Frontmatter::Absent;
    };
    let rest = match rest.find('\n') {
        Some(end) if rest[..end].trim().is_empty() => &rest[end + 1..],
        _ => return Frontmatter::Absent,
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Frontmatter::Present {
                yaml: &rest[..offset],
                body: &rest[offset + line.len()..],
            };
        }
        offset += line.len();
    }
    Frontmatter::Unterminated
}

fn date_prefix() -> Option<&'static Regex> {
    static DATE_PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    DATE_PREFIX
        .get_or_init(|| Regex::new(r"^\d+-\d+-\d+-").ok())
        .as_ref()
}

/// File stem with a leading `NNNN-NN-NN-` date removed.
pub fn derive_id(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    match date_prefix() {
        Some(re) => re.replace(&stem, "").to_string(),
        None => stem,
    }
}

/// Path relative to the content root, `/`-separated, `.md` published as `.html`.
pub fn derive_url(relative: &Path) -> String {
    let joined = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    match joined.strip_suffix(".md") {
        Some(base) => format!("{}.html", base),
        None => joined,
    }
}

/// Integer `series_order`, or `None` with a warning for anything else.
fn series_order(frontmatter: &Value, path: &Path) -> Option<i64> {
    let value = frontmatter.get("series_order")?;
    let order = match value {
        Value::Null => return None,
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if order.is_none() {
        warn!(
            "Ignoring non-integer series_order {:?} in {}; node left out of series",
            value,
            path.display()
        );
    }
    order
}

/// Parse one markdown file.
///
/// `path` names the file in errors and logs; `relative` (to the content
/// root) drives id and url derivation. Files without a title yield `None`.
pub fn parse_markdown(path: &Path, relative: &Path, text: &str) -> LoadResult<Option<ContentRecord>> {
    let (yaml, body) = match split_frontmatter(text) {
        Frontmatter::Present { yaml, body } => (yaml, body),
        Frontmatter::Absent => ("", text),
        Frontmatter::Unterminated => {
            return Err(LoadError::UnterminatedFrontmatter(path.to_path_buf()))
        }
    };

    let frontmatter: Value = if yaml.trim().is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str(yaml).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };

    let Some(title) = field_string(&frontmatter, "title") else {
        info!("Skipping {} (no title in frontmatter)", path.display());
        return Ok(None);
    };

    let id = field_string(&frontmatter, "api-id").unwrap_or_else(|| derive_id(path));
    let node_type = field_string(&frontmatter, "api-type")
        .map(NodeType::from)
        .unwrap_or_default();

    let mut node = Node::new(id, title, node_type)
        .with_summary(field_string(&frontmatter, "summary").unwrap_or_default())
        .with_tags(field_list(&frontmatter, "tags").unwrap_or_default())
        .with_url(field_string(&frontmatter, "permalink").unwrap_or_else(|| derive_url(relative)));
    node.published = field_string(&frontmatter, "published");
    node.updated = field_string(&frontmatter, "updated");
    node.series = field_string(&frontmatter, "series");
    node.series_order = series_order(&frontmatter, path);

    Ok(Some(ContentRecord::new(node, RawBody::new(body))))
}
