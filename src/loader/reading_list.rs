//! Reading-list YAML: one book node per `reading_list` entry

use super::values::{field_list, field_string};
use super::{LoadError, LoadResult};
use crate::graph::{BookDetails, ContentRecord, Node, NodeType};
use regex::Regex;
use serde_yaml::Value;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Where books without their own url point
pub const DEFAULT_BOOK_URL: &str = "books.html";

fn non_alphanumeric_run() -> Option<&'static Regex> {
    static RUN: OnceLock<Option<Regex>> = OnceLock::new();
    RUN.get_or_init(|| Regex::new(r"[^a-z0-9]+").ok()).as_ref()
}

/// `book-` plus the lowercased title with each non-alphanumeric run as `-`
pub fn book_slug(title: &str) -> String {
    let lower = title.to_lowercase();
    let slug = match non_alphanumeric_run() {
        Some(re) => re.replace_all(&lower, "-").to_string(),
        None => lower,
    };
    format!("book-{}", slug)
}

fn book_node(entry: &Value, title: String) -> Node {
    let status = field_string(entry, "status");
    let genre = field_string(entry, "genre");

    let id = field_string(entry, "id").unwrap_or_else(|| book_slug(&title));
    let summary = field_string(entry, "notes").unwrap_or_else(|| {
        let kind = genre.as_deref().unwrap_or("book");
        match &status {
            Some(status) => format!("{} - {}", status, kind),
            None => kind.to_string(),
        }
    });
    let tags = field_list(entry, "tags")
        .unwrap_or_else(|| genre.iter().chain(status.iter()).cloned().collect());

    let mut node = Node::new(id, title, NodeType::Book)
        .with_summary(summary)
        .with_tags(tags)
        .with_url(field_string(entry, "url").unwrap_or_else(|| DEFAULT_BOOK_URL.to_string()));
    node.published = field_string(entry, "date_added");
    node.updated = field_string(entry, "date_finished");
    node.book = BookDetails {
        author: field_string(entry, "author"),
        rating: entry.get("rating").and_then(Value::as_f64),
        status,
        genre,
    };
    node
}

/// Parse a YAML file; files without a `reading_list` sequence yield nothing.
pub fn parse_reading_list(path: &Path, text: &str) -> LoadResult<Vec<ContentRecord>> {
    let data: Value = serde_yaml::from_str(text).map_err(|source| LoadError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    let Some(entries) = data.get("reading_list").and_then(Value::as_sequence) else {
        debug!("No reading_list in {}", path.display());
        return Ok(Vec::new());
    };

    Ok(entries
        .iter()
        .filter_map(|entry| {
            let title = field_string(entry, "title")?;
            Some(ContentRecord::without_body(book_node(entry, title)))
        })
        .collect())
}
