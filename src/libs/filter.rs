//! Search criteria and their translation into parameterized SQL.
//!
//! [`PieceFilter`] holds the optional criteria a user can type in the search
//! panel. [`PieceFilter::predicate`] turns them into a `WHERE` clause with
//! positional `?` placeholders and the matching parameter list; user input
//! is never interpolated into the SQL text. Search, count and export all
//! build their statements from the same [`Predicate`], so they always agree
//! on which rows match.
//!
//! Matching rules:
//! - text criteria are case-insensitive substring matches (`LIKE` with
//!   `%`, `_` and `\` in the input escaped);
//! - `code_sap` is either a substring match that never matches sentinel
//!   codes, or the "empty code" criterion matching `NULL`, `''` and `nan`;
//! - `statut` and `unite` are skipped when blank or equal to [`ALL_SENTINEL`];
//! - every other blank criterion is omitted, all present ones are ANDed.

use crate::libs::piece::{Piece, PieceField};
use serde::{Deserialize, Serialize};

/// Value of the status/unit pickers meaning "no restriction".
pub const ALL_SENTINEL: &str = "Tous";

/// Word typed into the code SAP search box to look for pieces without a code.
pub const EMPTY_CODE_KEYWORD: &str = "vide";

/// Criterion on the `code_sap` column. The two forms are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeSapCriterion {
    /// Rows with no code: `NULL`, empty or the `nan` sentinel.
    Empty,
    /// Rows whose (non-sentinel) code contains the text.
    Contains(String),
}

impl CodeSapCriterion {
    /// Interprets raw search box input: blank means no criterion, the
    /// keyword `vide` means [`CodeSapCriterion::Empty`].
    pub fn from_input(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            None
        } else if input.eq_ignore_ascii_case(EMPTY_CODE_KEYWORD) {
            Some(CodeSapCriterion::Empty)
        } else {
            Some(CodeSapCriterion::Contains(input.to_string()))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceFilter {
    pub article: Option<String>,
    pub code_sap: Option<CodeSapCriterion>,
    pub description: Option<String>,
    pub description_longue: Option<String>,
    pub statut: Option<String>,
    pub unite: Option<String>,
    pub quantite_installee: Option<String>,
    pub situation: Option<String>,
}

/// A `WHERE` clause and its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<String>,
    params: Vec<String>,
}

impl Predicate {
    /// The clause including the `WHERE` keyword, or an empty string when
    /// nothing restricts the query.
    pub fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    fn push_contains(&mut self, column: &str, value: &str) {
        self.clauses.push(format!("{} LIKE ? ESCAPE '\\'", column));
        self.params.push(like_pattern(value));
    }
}

impl PieceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn article(mut self, value: &str) -> Self {
        self.article = Some(value.to_string());
        self
    }

    pub fn code_sap(mut self, value: &str) -> Self {
        self.code_sap = Some(CodeSapCriterion::Contains(value.to_string()));
        self
    }

    pub fn code_sap_empty(mut self) -> Self {
        self.code_sap = Some(CodeSapCriterion::Empty);
        self
    }

    pub fn description(mut self, value: &str) -> Self {
        self.description = Some(value.to_string());
        self
    }

    pub fn description_longue(mut self, value: &str) -> Self {
        self.description_longue = Some(value.to_string());
        self
    }

    pub fn statut(mut self, value: &str) -> Self {
        self.statut = Some(value.to_string());
        self
    }

    pub fn unite(mut self, value: &str) -> Self {
        self.unite = Some(value.to_string());
        self
    }

    pub fn quantite_installee(mut self, value: &str) -> Self {
        self.quantite_installee = Some(value.to_string());
        self
    }

    pub fn situation(mut self, value: &str) -> Self {
        self.situation = Some(value.to_string());
        self
    }

    /// Builds the predicate. Criteria are emitted in a fixed order so the
    /// same filter always yields the same SQL.
    pub fn predicate(&self) -> Predicate {
        let mut predicate = Predicate {
            clauses: Vec::new(),
            params: Vec::new(),
        };

        if let Some(article) = present(&self.article) {
            predicate.push_contains(PieceField::Article.column(), article);
        }

        match &self.code_sap {
            Some(CodeSapCriterion::Empty) => {
                predicate
                    .clauses
                    .push("(code_sap IS NULL OR TRIM(code_sap) = '' OR LOWER(TRIM(code_sap)) = 'nan')".to_string());
            }
            Some(CodeSapCriterion::Contains(code)) if !code.trim().is_empty() => {
                predicate.push_contains(PieceField::CodeSap.column(), code.trim());
                predicate.clauses.push("LOWER(TRIM(code_sap)) <> 'nan'".to_string());
            }
            _ => {}
        }

        if let Some(description) = present(&self.description) {
            predicate.push_contains(PieceField::Description.column(), description);
        }
        if let Some(description_longue) = present(&self.description_longue) {
            predicate.push_contains(PieceField::DescriptionLongue.column(), description_longue);
        }
        if let Some(statut) = selected(&self.statut) {
            predicate.push_contains(PieceField::StatutArticle.column(), statut);
        }
        if let Some(unite) = selected(&self.unite) {
            predicate.push_contains(PieceField::UniteMesure.column(), unite);
        }
        if let Some(quantite) = present(&self.quantite_installee) {
            predicate.push_contains(PieceField::QuantiteInstallee.column(), quantite);
        }
        if let Some(situation) = present(&self.situation) {
            predicate.push_contains(PieceField::Situation.column(), situation);
        }

        predicate
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn selected(value: &Option<String>) -> Option<&str> {
    present(value).filter(|v| *v != ALL_SENTINEL)
}

/// Wraps the input in `%` after escaping the LIKE metacharacters.
fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// A page request: at most `limit` rows starting after `offset` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub limit: u32,
    pub offset: u32,
}

impl PageWindow {
    pub const DEFAULT_PAGE_SIZE: u32 = 100;

    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Window for the zero-based page `index` of `size` rows.
    pub fn page(index: u32, size: u32) -> Self {
        Self {
            limit: size,
            offset: index.saturating_mul(size),
        }
    }

    /// Number of pages needed to show `total` rows; never less than one.
    pub fn total_pages(total: u64, size: u32) -> u32 {
        if size == 0 || total == 0 {
            return 1;
        }
        let pages = total.div_ceil(size as u64);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn last_page(total: u64, size: u32) -> u32 {
        Self::total_pages(total, size) - 1
    }

    /// Page after `current`, clamped to the last page.
    pub fn next_page(current: u32, total: u64, size: u32) -> u32 {
        current.saturating_add(1).min(Self::last_page(total, size))
    }

    pub fn prev_page(current: u32) -> u32 {
        current.saturating_sub(1)
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::page(0, Self::DEFAULT_PAGE_SIZE)
    }
}

/// One page of search results plus the unpaginated match count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub rows: Vec<Piece>,
    pub total_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_clause() {
        let predicate = PieceFilter::new().predicate();
        assert!(predicate.is_empty());
        assert_eq!(predicate.where_clause(), "");
        assert!(predicate.params().is_empty());
    }

    #[test]
    fn test_blank_criteria_are_omitted() {
        let filter = PieceFilter::new().article("   ").situation("").statut(ALL_SENTINEL).unite(ALL_SENTINEL);
        assert!(filter.predicate().is_empty());
    }

    #[test]
    fn test_values_are_parameterized() {
        let predicate = PieceFilter::new().article("x' OR 1=1 --").predicate();
        assert_eq!(predicate.where_clause(), " WHERE article LIKE ? ESCAPE '\\'");
        assert_eq!(predicate.params(), &["%x' OR 1=1 --%".to_string()]);
    }

    #[test]
    fn test_like_metacharacters_are_escaped() {
        assert_eq!(like_pattern("50%_a\\b"), "%50\\%\\_a\\\\b%");
    }

    #[test]
    fn test_code_sap_empty_takes_no_parameter() {
        let predicate = PieceFilter::new().code_sap_empty().article("valve").predicate();
        assert_eq!(predicate.params().len(), 1);
        assert!(predicate.where_clause().contains("code_sap IS NULL"));
    }

    #[test]
    fn test_code_sap_input_keyword() {
        assert_eq!(CodeSapCriterion::from_input(" VIDE "), Some(CodeSapCriterion::Empty));
        assert_eq!(CodeSapCriterion::from_input("123"), Some(CodeSapCriterion::Contains("123".to_string())));
        assert_eq!(CodeSapCriterion::from_input("  "), None);
    }

    #[test]
    fn test_all_criteria_are_anded_in_order() {
        let filter = PieceFilter::new()
            .article("a")
            .code_sap("b")
            .description("c")
            .description_longue("d")
            .statut("Actif")
            .unite("PC")
            .quantite_installee("2")
            .situation("Stock");
        let predicate = filter.predicate();
        assert_eq!(predicate.params().len(), 8);
        assert_eq!(predicate.where_clause().matches(" AND ").count(), 8);
        assert_eq!(predicate.params()[4], "%Actif%");
    }

    #[test]
    fn test_page_arithmetic() {
        assert_eq!(PageWindow::page(2, 50), PageWindow::new(50, 100));
        assert_eq!(PageWindow::total_pages(0, 100), 1);
        assert_eq!(PageWindow::total_pages(100, 100), 1);
        assert_eq!(PageWindow::total_pages(101, 100), 2);
        assert_eq!(PageWindow::next_page(1, 101, 100), 1);
        assert_eq!(PageWindow::next_page(0, 101, 100), 1);
        assert_eq!(PageWindow::prev_page(0), 0);
    }
}
