#[cfg(test)]
mod tests {
    use piecekeeper::db::pieces::Pieces;
    use piecekeeper::libs::error::PieceError;
    use piecekeeper::libs::piece::PieceData;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct PiecesTestContext {
        _temp_dir: TempDir,
        pieces: Pieces,
    }

    impl TestContext for PiecesTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let pieces = Pieces::open(&temp_dir.path().join("ocp_pieces.db")).unwrap();
            PiecesTestContext {
                _temp_dir: temp_dir,
                pieces,
            }
        }
    }

    fn valve() -> PieceData {
        PieceData {
            article: "VALVE-100".to_string(),
            code_sap: "10042".to_string(),
            description: "Vanne papillon DN100".to_string(),
            description_longue: "Vanne papillon à commande manuelle".to_string(),
            unite_mesure: "PC".to_string(),
            statut_article: "Actif".to_string(),
            quantite_installee: "4".to_string(),
            situation: "Magasin A".to_string(),
            image_path: String::new(),
        }
    }

    #[test_context(PiecesTestContext)]
    #[test]
    fn test_insert_then_get_round_trip(ctx: &mut PiecesTestContext) {
        let data = valve();
        let id = ctx.pieces.insert(&data).unwrap();
        assert!(id > 0);

        let piece = ctx.pieces.get_by_id(id).unwrap().unwrap();
        assert_eq!(piece.id, id);
        assert_eq!(piece.data, data);
        assert!(piece.date_creation.is_some());
        assert_eq!(piece.date_creation, piece.date_modification);
    }

    #[test_context(PiecesTestContext)]
    #[test]
    fn test_insert_requires_article(ctx: &mut PiecesTestContext) {
        let result = ctx.pieces.insert(&PieceData::new("   "));
        assert!(matches!(result, Err(PieceError::Validation(_))));
        assert_eq!(ctx.pieces.count().unwrap(), 0);
    }

    #[test_context(PiecesTestContext)]
    #[test]
    fn test_insert_normalizes_article_and_code(ctx: &mut PiecesTestContext) {
        let data = PieceData {
            article: "  PUMP-7 ".to_string(),
            code_sap: "NaN".to_string(),
            ..Default::default()
        };
        let id = ctx.pieces.insert(&data).unwrap();

        let piece = ctx.pieces.get_by_id(id).unwrap().unwrap();
        assert_eq!(piece.data.article, "PUMP-7");
        assert_eq!(piece.data.code_sap, "");
    }

    #[test_context(PiecesTestContext)]
    #[test]
    fn test_piece_serializes_with_timestamps(ctx: &mut PiecesTestContext) {
        let id = ctx.pieces.insert(&valve()).unwrap();
        let piece = ctx.pieces.get_by_id(id).unwrap().unwrap();

        let json = serde_json::to_value(&piece).unwrap();

        assert_eq!(json["id"], id);
        assert_eq!(json["article"], "VALVE-100");
        assert!(json["date_creation"].is_string());
        assert_eq!(json["date_creation"], json["date_modification"]);
    }

    #[test_context(PiecesTestContext)]
    #[test]
    fn test_ids_are_never_reused(ctx: &mut PiecesTestContext) {
        let first = ctx.pieces.insert(&PieceData::new("A")).unwrap();
        let second = ctx.pieces.insert(&PieceData::new("B")).unwrap();
        assert!(second > first);

        ctx.pieces.delete(second).unwrap();
        let third = ctx.pieces.insert(&PieceData::new("C")).unwrap();
        assert!(third > second);
    }

    #[test_context(PiecesTestContext)]
    #[test]
    fn test_update_replaces_fields(ctx: &mut PiecesTestContext) {
        let id = ctx.pieces.insert(&valve()).unwrap();
        let before = ctx.pieces.get_by_id(id).unwrap().unwrap();

        let mut data = valve();
        data.situation = "Stock".to_string();
        data.description_longue = String::new();
        ctx.pieces.update(id, &data).unwrap();

        let after = ctx.pieces.get_by_id(id).unwrap().unwrap();
        assert_eq!(after.data, data);
        assert_eq!(after.date_creation, before.date_creation);
        assert!(after.date_modification >= after.date_creation);
    }

    #[test_context(PiecesTestContext)]
    #[test]
    fn test_update_twice_with_same_data(ctx: &mut PiecesTestContext) {
        let id = ctx.pieces.insert(&valve()).unwrap();
        let mut data = valve();
        data.quantite_installee = "6".to_string();

        ctx.pieces.update(id, &data).unwrap();
        let first = ctx.pieces.get_by_id(id).unwrap().unwrap();
        ctx.pieces.update(id, &data).unwrap();
        let second = ctx.pieces.get_by_id(id).unwrap().unwrap();

        assert_eq!(first.data, second.data);
        assert!(second.date_modification >= first.date_modification);
    }

    #[test_context(PiecesTestContext)]
    #[test]
    fn test_update_missing_piece(ctx: &mut PiecesTestContext) {
        let result = ctx.pieces.update(99, &valve());
        assert!(matches!(result, Err(PieceError::NotFound(99))));
    }

    #[test_context(PiecesTestContext)]
    #[test]
    fn test_update_rejects_empty_article(ctx: &mut PiecesTestContext) {
        let id = ctx.pieces.insert(&valve()).unwrap();
        let result = ctx.pieces.update(id, &PieceData::new(""));
        assert!(matches!(result, Err(PieceError::Validation(_))));

        let piece = ctx.pieces.get_by_id(id).unwrap().unwrap();
        assert_eq!(piece.data.article, "VALVE-100");
    }

    #[test_context(PiecesTestContext)]
    #[test]
    fn test_delete_then_delete_again(ctx: &mut PiecesTestContext) {
        let id = ctx.pieces.insert(&valve()).unwrap();

        ctx.pieces.delete(id).unwrap();
        assert!(ctx.pieces.get_by_id(id).unwrap().is_none());

        let second = ctx.pieces.delete(id);
        assert!(matches!(second, Err(PieceError::NotFound(found)) if found == id));
    }

    #[test_context(PiecesTestContext)]
    #[test]
    fn test_set_image_path_keeps_modification_date(ctx: &mut PiecesTestContext) {
        let id = ctx.pieces.insert(&valve()).unwrap();
        let before = ctx.pieces.get_by_id(id).unwrap().unwrap();

        ctx.pieces.set_image_path(id, "images_pieces/piece_1_x.png").unwrap();
        let after = ctx.pieces.get_by_id(id).unwrap().unwrap();

        assert_eq!(after.data.image_path, "images_pieces/piece_1_x.png");
        assert_eq!(after.date_modification, before.date_modification);
        assert!(matches!(ctx.pieces.set_image_path(42, ""), Err(PieceError::NotFound(42))));
    }

    #[test_context(PiecesTestContext)]
    #[test]
    fn test_get_missing_is_none(ctx: &mut PiecesTestContext) {
        assert!(ctx.pieces.get_by_id(12345).unwrap().is_none());
        assert!(ctx.pieces.is_empty().unwrap());
    }

    #[test_context(PiecesTestContext)]
    #[test]
    fn test_legacy_values_read_as_text(ctx: &mut PiecesTestContext) {
        ctx.pieces
            .conn
            .execute(
                "INSERT INTO pieces (article, code_sap, quantite_installee, date_creation, date_modification) \
                 VALUES ('OLD-1', 10042, 3, '2023-05-01 08:00:00', 'garbage')",
                [],
            )
            .unwrap();

        let piece = ctx.pieces.get_by_id(1).unwrap().unwrap();
        assert_eq!(piece.data.code_sap, "10042");
        assert_eq!(piece.data.quantite_installee, "3");
        assert_eq!(piece.data.description, "");
        assert!(piece.date_creation.is_some());
        assert!(piece.date_modification.is_none());
    }
}
