use super::piece::{Piece, PieceField};
use anyhow::Result;
use prettytable::{row, Table};

const SHORT_TEXT_WIDTH: usize = 40;

pub struct View {}

impl View {
    /// One line per piece, as in the search results list.
    pub fn pieces(pieces: &[Piece]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "ARTICLE", "CODE SAP", "DESCRIPTION", "STATUT", "UNITE", "QTE", "SITUATION", "IMG"]);
        for piece in pieces {
            table.add_row(row![
                piece.id,
                piece.data.article,
                piece.display_code_sap(),
                shorten(&piece.data.description, SHORT_TEXT_WIDTH),
                piece.data.statut_article,
                piece.data.unite_mesure,
                piece.data.quantite_installee,
                piece.data.situation,
                if piece.has_image() { "yes" } else { "" }
            ]);
        }
        table.printstd();

        Ok(())
    }

    /// Every field of one piece, one per line.
    pub fn piece(piece: &Piece) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", piece.id]);
        for (field, value) in piece.data.fields() {
            let value = match field {
                PieceField::CodeSap => piece.display_code_sap(),
                PieceField::ImagePath if !value.is_empty() && !piece.has_image() => format!("{} (missing)", value),
                _ => value.to_string(),
            };
            table.add_row(row![field.audit_label(), value]);
        }
        table.add_row(row!["Créé le", format_timestamp(piece.date_creation)]);
        table.add_row(row!["Modifié le", format_timestamp(piece.date_modification)]);
        table.printstd();

        Ok(())
    }
}

fn format_timestamp(value: Option<chrono::NaiveDateTime>) -> String {
    value.map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string()).unwrap_or_default()
}

fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_counts_characters() {
        assert_eq!(shorten("Vanne à boisseau", 40), "Vanne à boisseau");
        assert_eq!(shorten("Électrovanne", 5), "Élec…");
    }
}
