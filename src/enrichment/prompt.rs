//! Request text for one enrichment batch

use crate::graph::Node;

/// Describe each node (id, title, summary, tags) and ask for relationship
/// lines in the grammar `response::parse_line` accepts.
pub fn build_prompt(nodes: &[&Node]) -> String {
    let documents = nodes
        .iter()
        .map(|n| {
            format!(
                "ID: {}\nTitle: {}\nSummary: {}\nTags: {}",
                n.id,
                n.title,
                n.summary,
                n.tags.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are reviewing a collection of articles, pages and books to find meaningful \
semantic relationships between them.

DOCUMENTS:
{documents}

TASK: Identify real thematic or conceptual connections between these documents.

RELATIONSHIP TYPES:
- semantic: the documents share a theme, concept or subject that their tags and titles do not already make obvious
- contrasts: the documents take opposing positions, approaches or solutions to a similar problem

RULES:
1. Only propose relationships that add insight beyond the tags and titles.
2. Every relationship needs a connecting theme of 2-5 words.
3. Weight expresses strength between 0.0 and 1.0: 0.9-1.0 very strong, 0.4-0.6 moderate, 0.1-0.3 weak.
4. Skip connections that shared tags already explain.
5. Prefer a few strong relationships over many weak ones.
6. Use the IDs exactly as given.

OUTPUT FORMAT (one per line):
RELATIONSHIP: <id1> -> <id2> | <type> | <weight> | THEME: <theme>

EXAMPLES:
RELATIONSHIP: functional-programming -> oop-patterns | contrasts | 0.7 | THEME: managing mutable state
RELATIONSHIP: career-advice -> imposter-syndrome | semantic | 0.6 | THEME: growing as a professional

Output RELATIONSHIP lines only."
    )
}
