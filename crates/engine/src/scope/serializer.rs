//! Fixed-field rendering of knowledge rows.
//!
//! Every row renders the same twelve labeled lines in the same order, with
//! absent facets spelled out as placeholders, so the generation step always
//! sees a uniform shape. Output is a pure function of the input rows and
//! their order.

use kbscope_core::knowledge::KnowledgeRow;
use std::borrow::Borrow;

/// Rendered when there are no rows at all.
pub const NO_MATCHES: &str = "No matching knowledge entries were found.";

/// Line placed between two rendered rows.
pub const SEPARATOR: &str = "---";

const NO_TITLE: &str = "(no title)";
const UNSPECIFIED: &str = "(unspecified)";
const NONE: &str = "(none)";

/// Render rows into a single text block.
pub fn serialize<R: Borrow<KnowledgeRow>>(rows: &[R]) -> String {
    if rows.is_empty() {
        return NO_MATCHES.to_string();
    }

    rows.iter()
        .map(|row| render_row(row.borrow()))
        .collect::<Vec<_>>()
        .join(&format!("\n\n{SEPARATOR}\n\n"))
}

/// Render a single row as labeled lines.
pub fn render_row(row: &KnowledgeRow) -> String {
    let or = |value: &Option<String>, placeholder: &'static str| -> String {
        value.clone().unwrap_or_else(|| placeholder.to_string())
    };

    let lines = [
        format!("PROJECT: {}", row.project),
        format!("TYPE: {}", row.content_type),
        format!("TITLE: {}", or(&row.title, NO_TITLE)),
        format!("PILLAR: {}", or(&row.pillar, UNSPECIFIED)),
        format!("MEDIUM: {}", or(&row.medium, UNSPECIFIED)),
        format!("AUDIENCE: {}", or(&row.audience, UNSPECIFIED)),
        format!("TAGS: {}", or(&row.tags, NONE)),
        format!("ROLE: {}", or(&row.role, UNSPECIFIED)),
        format!("ONE_LINER: {}", or(&row.one_liner, NONE)),
        format!("TOOLS_METHODS: {}", or(&row.tools_or_methods, NONE)),
        format!("DEPTH: {}", or(&row.depth, UNSPECIFIED)),
        format!("CONTENT: {}", row.content),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_renders_sentinel() {
        let rows: [KnowledgeRow; 0] = [];
        assert_eq!(serialize(&rows), NO_MATCHES);
    }

    #[test]
    fn bare_row_uses_placeholders() {
        let row = KnowledgeRow::new("loom", "method", "Weaving pipeline");
        let expected = "\
PROJECT: loom
TYPE: method
TITLE: (no title)
PILLAR: (unspecified)
MEDIUM: (unspecified)
AUDIENCE: (unspecified)
TAGS: (none)
ROLE: (unspecified)
ONE_LINER: (none)
TOOLS_METHODS: (none)
DEPTH: (unspecified)
CONTENT: Weaving pipeline";
        assert_eq!(serialize(&[row]), expected);
    }

    #[test]
    fn full_row_renders_every_facet() {
        let row = KnowledgeRow::new("jascore_1_0", "summary", "A scoring engine.")
            .with_title("JasCore")
            .with_pillar("engineering")
            .with_medium("software")
            .with_audience("developers")
            .with_tags("rust, scoring")
            .with_role("lead")
            .with_one_liner("Scores things fast")
            .with_tools_or_methods("Rust, SQLite")
            .with_depth("overview");

        let text = render_row(&row);
        assert!(text.contains("TITLE: JasCore\n"));
        assert!(text.contains("TAGS: rust, scoring\n"));
        assert!(text.contains("TOOLS_METHODS: Rust, SQLite\n"));
        assert!(text.ends_with("CONTENT: A scoring engine."));
        assert!(!text.contains("(none)"));
        assert!(!text.contains("(unspecified)"));
    }

    #[test]
    fn every_row_has_the_same_shape() {
        let rows = [
            KnowledgeRow::new("a", "summary", "one").with_title("A"),
            KnowledgeRow::new("b", "method", "two"),
        ];
        let text = serialize(&rows);
        let blocks: Vec<&str> = text.split("\n\n---\n\n").collect();
        assert_eq!(blocks.len(), 2);
        for block in blocks {
            assert_eq!(block.lines().count(), 12);
        }
    }

    #[test]
    fn rows_are_joined_in_order() {
        let rows = [
            KnowledgeRow::new("first", "summary", "1"),
            KnowledgeRow::new("second", "summary", "2"),
        ];
        let text = serialize(&rows);
        let first = text.find("PROJECT: first").unwrap();
        let sep = text.find("\n---\n").unwrap();
        let second = text.find("PROJECT: second").unwrap();
        assert!(first < sep && sep < second);
    }

    #[test]
    fn accepts_borrowed_rows_and_is_deterministic() {
        let owned = vec![
            KnowledgeRow::new("a", "summary", "one"),
            KnowledgeRow::new("b", "outcome", "two"),
        ];
        let borrowed: Vec<&KnowledgeRow> = owned.iter().collect();
        assert_eq!(serialize(&owned), serialize(&borrowed));
        assert_eq!(serialize(&borrowed), serialize(&borrowed));
    }
}
