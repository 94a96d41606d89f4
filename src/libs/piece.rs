//! Piece records and their field metadata.
//!
//! A piece is one physical inventory item. Its editable content lives in
//! [`PieceData`]; a persisted [`Piece`] adds the store-assigned identity and
//! the creation/modification timestamps.
//!
//! [`PieceField`] is the single source of truth for how a field is named in
//! the database, in exports and in the audit log, so column lists, display
//! labels and diffs cannot drift apart.
//!
//! ## Sentinels
//!
//! Spreadsheet imports left `nan` strings in the `code_sap` column where the
//! cell was empty. [`normalize_code_sap`] folds those (and surrounding
//! whitespace) into the empty string, and [`PieceData::normalized`] applies it
//! at the store boundary so callers never compare against `"nan"` themselves.

use crate::libs::error::PieceError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Status offered by the edit form for a brand new piece.
pub const DEFAULT_STATUT: &str = "Actif";

/// Statuses the front end offers. The store does not enforce them.
pub const KNOWN_STATUTS: &[&str] = &["Actif", "Inactif", "Obsolète"];

/// Text value standing for "no code" in legacy data.
pub const NAN_SENTINEL: &str = "nan";

/// Editable fields of a piece, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceField {
    Article,
    CodeSap,
    Description,
    DescriptionLongue,
    UniteMesure,
    StatutArticle,
    QuantiteInstallee,
    Situation,
    ImagePath,
}

impl PieceField {
    pub const ALL: [PieceField; 9] = [
        PieceField::Article,
        PieceField::CodeSap,
        PieceField::Description,
        PieceField::DescriptionLongue,
        PieceField::UniteMesure,
        PieceField::StatutArticle,
        PieceField::QuantiteInstallee,
        PieceField::Situation,
        PieceField::ImagePath,
    ];

    /// Column name in the `pieces` table.
    pub fn column(self) -> &'static str {
        match self {
            PieceField::Article => "article",
            PieceField::CodeSap => "code_sap",
            PieceField::Description => "description",
            PieceField::DescriptionLongue => "description_longue",
            PieceField::UniteMesure => "unite_mesure",
            PieceField::StatutArticle => "statut_article",
            PieceField::QuantiteInstallee => "quantite_installee",
            PieceField::Situation => "situation",
            PieceField::ImagePath => "image_path",
        }
    }

    /// Header used in spreadsheet exports and legacy imports.
    pub fn export_label(self) -> &'static str {
        match self {
            PieceField::Article => "Article",
            PieceField::CodeSap => "code SAP",
            PieceField::Description => "Description",
            PieceField::DescriptionLongue => "Description longue",
            PieceField::UniteMesure => "Unité de mesure principale",
            PieceField::StatutArticle => "Statut de l'article",
            PieceField::QuantiteInstallee => "Quantité installée",
            PieceField::Situation => "Situation",
            PieceField::ImagePath => "Image",
        }
    }

    /// Label written in audit log diff lines.
    pub fn audit_label(self) -> &'static str {
        match self {
            PieceField::Article => "Article",
            PieceField::CodeSap => "Code SAP",
            PieceField::Description => "Description",
            PieceField::DescriptionLongue => "Description longue",
            PieceField::UniteMesure => "Unité de mesure",
            PieceField::StatutArticle => "Statut",
            PieceField::QuantiteInstallee => "Quantité installée",
            PieceField::Situation => "Situation",
            PieceField::ImagePath => "Image",
        }
    }

    pub fn value(self, data: &PieceData) -> &str {
        match self {
            PieceField::Article => &data.article,
            PieceField::CodeSap => &data.code_sap,
            PieceField::Description => &data.description,
            PieceField::DescriptionLongue => &data.description_longue,
            PieceField::UniteMesure => &data.unite_mesure,
            PieceField::StatutArticle => &data.statut_article,
            PieceField::QuantiteInstallee => &data.quantite_installee,
            PieceField::Situation => &data.situation,
            PieceField::ImagePath => &data.image_path,
        }
    }

    pub fn value_mut(self, data: &mut PieceData) -> &mut String {
        match self {
            PieceField::Article => &mut data.article,
            PieceField::CodeSap => &mut data.code_sap,
            PieceField::Description => &mut data.description,
            PieceField::DescriptionLongue => &mut data.description_longue,
            PieceField::UniteMesure => &mut data.unite_mesure,
            PieceField::StatutArticle => &mut data.statut_article,
            PieceField::QuantiteInstallee => &mut data.quantite_installee,
            PieceField::Situation => &mut data.situation,
            PieceField::ImagePath => &mut data.image_path,
        }
    }

    /// Looks a field up by its export header, ignoring case and surrounding spaces.
    pub fn from_export_label(label: &str) -> Option<PieceField> {
        let label = label.trim();
        PieceField::ALL.into_iter().find(|f| f.export_label().eq_ignore_ascii_case(label))
    }
}

/// Editable content of a piece. Empty strings mean "no value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceData {
    pub article: String,
    pub code_sap: String,
    pub description: String,
    pub description_longue: String,
    pub unite_mesure: String,
    pub statut_article: String,
    pub quantite_installee: String,
    pub situation: String,
    /// Managed image path once saved; a user-picked file on input.
    pub image_path: String,
}

impl PieceData {
    pub fn new(article: &str) -> Self {
        Self {
            article: article.to_string(),
            ..Default::default()
        }
    }

    /// Returns a copy with the store-boundary normalization applied:
    /// trimmed article and a sentinel-free `code_sap`.
    pub fn normalized(&self) -> Self {
        Self {
            article: self.article.trim().to_string(),
            code_sap: normalize_code_sap(&self.code_sap),
            ..self.clone()
        }
    }

    pub fn has_article(&self) -> bool {
        !self.article.trim().is_empty()
    }

    /// Checks the fields a persisted piece must have.
    pub fn validate(&self) -> Result<(), PieceError> {
        if !self.has_article() {
            return Err(PieceError::Validation("the Article field is required".to_string()));
        }
        Ok(())
    }

    /// Iterates over `(field, value)` pairs in display order.
    pub fn fields(&self) -> impl Iterator<Item = (PieceField, &str)> {
        PieceField::ALL.into_iter().map(move |f| (f, f.value(self)))
    }
}

/// A persisted piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Piece {
    pub id: i64,
    #[serde(flatten)]
    pub data: PieceData,
    pub date_creation: Option<NaiveDateTime>,
    pub date_modification: Option<NaiveDateTime>,
}

impl Piece {
    /// `code_sap` as it should be shown, with legacy sentinels blanked.
    pub fn display_code_sap(&self) -> String {
        normalize_code_sap(&self.data.code_sap)
    }

    /// Whether the referenced image is actually on disk. A dangling path reads as "no image".
    pub fn has_image(&self) -> bool {
        !self.data.image_path.is_empty() && Path::new(&self.data.image_path).is_file()
    }
}

/// Folds the empty-code sentinels (`nan` in any case, blank) into `""`.
pub fn normalize_code_sap(value: &str) -> String {
    let trimmed = value.trim();
    if is_empty_code_sap(trimmed) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

pub fn is_empty_code_sap(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NAN_SENTINEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code_sap_sentinels() {
        assert_eq!(normalize_code_sap("nan"), "");
        assert_eq!(normalize_code_sap("NaN"), "");
        assert_eq!(normalize_code_sap("  NAN "), "");
        assert_eq!(normalize_code_sap(""), "");
        assert_eq!(normalize_code_sap(" 10042 "), "10042");
        assert_eq!(normalize_code_sap("banana"), "banana");
    }

    #[test]
    fn test_normalized_trims_article_only() {
        let data = PieceData {
            article: "  VALVE-100 ".to_string(),
            code_sap: "nan".to_string(),
            situation: " Stock ".to_string(),
            ..Default::default()
        };
        let normalized = data.normalized();
        assert_eq!(normalized.article, "VALVE-100");
        assert_eq!(normalized.code_sap, "");
        assert_eq!(normalized.situation, " Stock ");
    }

    #[test]
    fn test_export_label_lookup() {
        assert_eq!(PieceField::from_export_label("code sap"), Some(PieceField::CodeSap));
        assert_eq!(PieceField::from_export_label(" Statut de l'article"), Some(PieceField::StatutArticle));
        assert_eq!(PieceField::from_export_label("Unknown"), None);
    }

    #[test]
    fn test_fields_follow_display_order() {
        let data = PieceData::new("A");
        let columns: Vec<&str> = data.fields().map(|(f, _)| f.column()).collect();
        assert_eq!(columns.first(), Some(&"article"));
        assert_eq!(columns.last(), Some(&"image_path"));
        assert_eq!(columns.len(), 9);
    }
}
