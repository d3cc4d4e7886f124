//! Lexical relevance filter.
//!
//! A row is relevant when the query literally contains one of its facet
//! values (project, title, tags, pillar, medium, audience), compared
//! lowercase. Tags also match the other way round: any whitespace-separated
//! query token found inside the tags string counts. The body text is never
//! searched.
//!
//! The facet-in-query direction only narrows the corpus when the user types
//! a facet verbatim ("tell me about JasCore"). Paraphrased questions usually
//! match nothing, in which case the full corpus is returned and the ranker
//! plus the row budget keep the output bounded.

use kbscope_core::knowledge::KnowledgeRow;

/// Result of filtering a corpus against a query.
#[derive(Debug, Clone)]
pub struct FilterOutcome<'a> {
    /// Selected rows in corpus order.
    pub rows: Vec<&'a KnowledgeRow>,
    /// True when nothing matched and `rows` is the whole corpus.
    pub fallback: bool,
}

/// Select the rows relevant to `query`, or every row if none are.
pub fn filter<'a>(query: &str, rows: &'a [KnowledgeRow]) -> FilterOutcome<'a> {
    let query = query.to_lowercase();
    let tokens: Vec<&str> = query.split_whitespace().collect();

    let matched: Vec<&KnowledgeRow> = rows
        .iter()
        .filter(|row| is_match(&query, &tokens, row))
        .collect();

    if matched.is_empty() {
        FilterOutcome {
            rows: rows.iter().collect(),
            fallback: true,
        }
    } else {
        FilterOutcome {
            rows: matched,
            fallback: false,
        }
    }
}

/// `query` must already be lowercase and `tokens` its whitespace split.
fn is_match(query: &str, tokens: &[&str], row: &KnowledgeRow) -> bool {
    let facets = [
        Some(row.project.as_str()),
        row.title.as_deref(),
        row.tags.as_deref(),
        row.pillar.as_deref(),
        row.medium.as_deref(),
        row.audience.as_deref(),
    ];

    let facet_in_query = facets
        .into_iter()
        .flatten()
        .map(str::to_lowercase)
        .any(|value| !value.is_empty() && query.contains(&value));
    if facet_in_query {
        return true;
    }

    match row.tags.as_deref() {
        Some(tags) => {
            let tags = tags.to_lowercase();
            tokens.iter().any(|token| tags.contains(token))
        }
        None => false,
    }
}
