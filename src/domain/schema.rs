// Schema normalization - fuzzy column matching against the canonical vocabulary
use crate::domain::errors::IngestError;
use crate::domain::table::RawTable;

/// Canonical field names paired with the lowercase keyword that identifies
/// them in arbitrary input headers. Matching walks this list in order.
pub const CANONICAL_FIELDS: [(&str, &str); 7] = [
    ("date", "dt"),
    ("title", "title"),
    ("card_exposure", "exposure"),
    ("page_visits", "visit"),
    ("article_click_rate", "article"),
    ("action_clicks", "click"),
    ("feature_conversion_rate", "conversion"),
];

/// Renames input columns to the canonical schema by case-insensitive substring
/// matching. The first unclaimed match in column order wins; a column claimed
/// by an earlier field is not considered again (so "click" cannot re-claim the
/// column already resolved as `article_click_rate`). Any field with no match
/// aborts with the full list of missing fields and detected columns.
pub fn normalize_columns(table: &mut RawTable) -> Result<(), IngestError> {
    let detected = table.columns.clone();
    let mut claimed = vec![false; table.columns.len()];
    let mut missing = Vec::new();

    for (canonical, keyword) in CANONICAL_FIELDS {
        let matches: Vec<usize> = table
            .columns
            .iter()
            .enumerate()
            .filter(|(i, col)| !claimed[*i] && col.to_lowercase().contains(keyword))
            .map(|(i, _)| i)
            .collect();

        if matches.len() > 1 {
            // Intentionally first-match; flagged because it is fragile input.
            tracing::warn!(
                keyword,
                candidates = ?matches.iter().map(|&i| &table.columns[i]).collect::<Vec<_>>(),
                "keyword matches multiple columns; taking the first in column order"
            );
        }

        match matches.first() {
            Some(&idx) => {
                table.columns[idx] = canonical.to_string();
                claimed[idx] = true;
            }
            None => missing.push(format!("{canonical} (keyword: {keyword})")),
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(IngestError::SchemaIncomplete { missing, detected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(columns: &[&str]) -> RawTable {
        RawTable::new(columns.iter().map(|c| c.to_string()).collect(), vec![])
    }

    #[test]
    fn test_resolves_any_case_and_surrounding_text() {
        let mut table = table_with(&[
            "DT",
            "Content Title",
            "  Card EXPOSURE uv ",
            "Page Visits",
            "Article Click Rate",
            "Action Clicks (entry+detail)",
            "Feature Conversion Rate %",
        ]);

        normalize_columns(&mut table).unwrap();

        assert_eq!(
            table.columns,
            vec![
                "date",
                "title",
                "card_exposure",
                "page_visits",
                "article_click_rate",
                "action_clicks",
                "feature_conversion_rate",
            ]
        );
    }

    #[test]
    fn test_claimed_column_not_matched_twice() {
        // "click" appears in the article column too; it must stay claimed by
        // the article field and leave "click" to resolve the action column.
        let mut table = table_with(&[
            "dt",
            "title",
            "exposure uv",
            "visit uv",
            "article click rate",
            "clicks",
            "conversion rate",
        ]);

        normalize_columns(&mut table).unwrap();

        assert_eq!(table.columns[4], "article_click_rate");
        assert_eq!(table.columns[5], "action_clicks");
    }

    #[test]
    fn test_first_match_in_column_order_wins() {
        let mut table = table_with(&[
            "dt",
            "title",
            "exposure A",
            "exposure B",
            "visit",
            "article",
            "click",
            "conversion",
        ]);

        normalize_columns(&mut table).unwrap();

        assert_eq!(table.columns[2], "card_exposure");
        assert_eq!(table.columns[3], "exposure B");
    }

    #[test]
    fn test_missing_keywords_reported_together() {
        let mut table = table_with(&["dt", "title", "views"]);

        let err = normalize_columns(&mut table).unwrap_err();
        match err {
            IngestError::SchemaIncomplete { missing, detected } => {
                assert_eq!(missing.len(), 5);
                assert!(missing[0].starts_with("card_exposure"));
                assert!(missing.iter().any(|m| m.contains("keyword: conversion")));
                assert_eq!(detected, vec!["dt", "title", "views"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extra_columns_pass_through() {
        let mut table = table_with(&[
            "dt", "title", "exposure", "visit", "article", "click", "conversion", "shares",
        ]);

        normalize_columns(&mut table).unwrap();

        assert_eq!(table.columns[7], "shares");
    }
}
