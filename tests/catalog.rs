#[cfg(test)]
mod tests {
    use piecekeeper::libs::catalog::Catalog;
    use piecekeeper::libs::config::Config;
    use piecekeeper::libs::error::PieceError;
    use piecekeeper::libs::filter::{PageWindow, PieceFilter};
    use piecekeeper::libs::piece::PieceData;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct CatalogTestContext {
        temp_dir: TempDir,
        catalog: Catalog,
    }

    impl TestContext for CatalogTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let config = Config::with_base_dir(temp_dir.path());
            let catalog = Catalog::open(&config).unwrap();
            CatalogTestContext { temp_dir, catalog }
        }
    }

    impl CatalogTestContext {
        fn photo(&self, name: &str) -> PathBuf {
            let path = self.temp_dir.path().join(name);
            image::RgbImage::from_pixel(16, 12, image::Rgb([10, 120, 200])).save(&path).unwrap();
            path
        }

        fn history(&self) -> String {
            self.catalog.audit().read_all().unwrap()
        }
    }

    fn valve() -> PieceData {
        PieceData {
            article: "VALVE-100".to_string(),
            statut_article: "Actif".to_string(),
            ..Default::default()
        }
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_create_without_image(ctx: &mut CatalogTestContext) {
        let outcome = ctx.catalog.create(&valve()).unwrap();

        assert_eq!(outcome.id, 1);
        assert_eq!(outcome.piece.data, valve());
        assert!(outcome.warnings.is_empty());
        assert!(ctx.history().contains("Action: create | ID: 1 | Article: VALVE-100"));
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_create_with_image_adopts_real_id(ctx: &mut CatalogTestContext) {
        let photo = ctx.photo("valve.png");
        let mut data = valve();
        data.image_path = photo.to_string_lossy().into_owned();

        let outcome = ctx.catalog.create(&data).unwrap();

        let stored = &outcome.piece.data.image_path;
        let name = Path::new(stored).file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(&format!("piece_{}_", outcome.id)), "{}", name);
        assert!(ctx.catalog.assets().is_managed(stored));
        assert!(Path::new(stored).is_file());
        assert!(photo.is_file());
        assert!(outcome.piece.has_image());
        assert_eq!(fs::read_dir(ctx.catalog.assets().root()).unwrap().count(), 1);
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_create_with_vanished_image_saves_without_it(ctx: &mut CatalogTestContext) {
        let mut data = valve();
        data.image_path = ctx.temp_dir.path().join("gone.png").to_string_lossy().into_owned();

        let outcome = ctx.catalog.create(&data).unwrap();

        assert_eq!(outcome.piece.data.image_path, "");
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_create_invalid_touches_nothing(ctx: &mut CatalogTestContext) {
        let photo = ctx.photo("valve.png");
        let data = PieceData {
            article: " ".to_string(),
            image_path: photo.to_string_lossy().into_owned(),
            ..Default::default()
        };

        assert!(matches!(ctx.catalog.create(&data), Err(PieceError::Validation(_))));
        assert_eq!(fs::read_dir(ctx.catalog.assets().root()).unwrap().count(), 0);
        assert!(!ctx.history().contains("Action:"));
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_update_audits_changed_fields(ctx: &mut CatalogTestContext) {
        let mut data = valve();
        data.situation = "A".to_string();
        let id = ctx.catalog.create(&data).unwrap().id;

        data.situation = "B".to_string();
        let outcome = ctx.catalog.update(id, &data).unwrap();

        assert_eq!(outcome.piece.data.situation, "B");
        let history = ctx.history();
        let update = &history[history.find("Action: update").unwrap()..];
        assert!(update.contains("    Situation : 'A' -> 'B'"));
        assert!(!update.contains("    Article :"));
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_update_missing_piece(ctx: &mut CatalogTestContext) {
        assert!(matches!(ctx.catalog.update(5, &valve()), Err(PieceError::NotFound(5))));
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_replacing_image_deletes_previous_file(ctx: &mut CatalogTestContext) {
        let first = ctx.photo("first.png");
        let second = ctx.photo("second.png");
        let id = ctx.catalog.create(&valve()).unwrap().id;

        let attached = ctx.catalog.attach_image(id, &first).unwrap();
        let first_managed = attached.piece.data.image_path.clone();
        assert!(Path::new(&first_managed).is_file());

        let replaced = ctx.catalog.attach_image(id, &second).unwrap();
        assert_ne!(replaced.piece.data.image_path, first_managed);
        assert!(!Path::new(&first_managed).exists());
        assert!(first.is_file());

        let history = ctx.history();
        assert_eq!(history.matches("Action: image-add").count(), 2);
        assert!(history.contains("Fichier: second.png"));
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_detach_image(ctx: &mut CatalogTestContext) {
        let mut data = valve();
        data.image_path = ctx.photo("valve.png").to_string_lossy().into_owned();
        let created = ctx.catalog.create(&data).unwrap();
        let managed = created.piece.data.image_path.clone();

        let outcome = ctx.catalog.detach_image(created.id).unwrap();

        assert_eq!(outcome.piece.data.image_path, "");
        assert!(!Path::new(&managed).exists());
        assert!(ctx.history().contains("Action: image-remove"));
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_delete_removes_row_image_and_audits(ctx: &mut CatalogTestContext) {
        let mut data = valve();
        data.image_path = ctx.photo("valve.png").to_string_lossy().into_owned();
        let created = ctx.catalog.create(&data).unwrap();
        let managed = created.piece.data.image_path.clone();

        let removed = ctx.catalog.delete(created.id).unwrap();

        assert_eq!(removed.id, created.id);
        assert!(ctx.catalog.get(created.id).is_none());
        assert!(!Path::new(&managed).exists());
        assert!(ctx.history().contains(&format!("Action: delete | ID: {}", created.id)));
        assert!(matches!(ctx.catalog.delete(created.id), Err(PieceError::NotFound(_))));
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_delete_keeps_external_image(ctx: &mut CatalogTestContext) {
        let external = ctx.photo("legacy.png");
        let id = ctx.catalog.create(&valve()).unwrap().id;
        ctx.catalog
            .pieces_mut()
            .set_image_path(id, &external.to_string_lossy())
            .unwrap();

        ctx.catalog.delete(id).unwrap();

        assert!(external.is_file());
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_image_path_escaping_managed_dir_is_copied_not_owned(ctx: &mut CatalogTestContext) {
        let user_photo = ctx.photo("user_photo.png");
        let sneaky = ctx.catalog.assets().root().join("..").join("user_photo.png");
        let mut data = valve();
        data.image_path = sneaky.to_string_lossy().into_owned();

        let created = ctx.catalog.create(&data).unwrap();
        assert_ne!(created.piece.data.image_path, data.image_path);
        assert!(ctx.catalog.assets().is_managed(&created.piece.data.image_path));

        ctx.catalog.detach_image(created.id).unwrap();
        assert!(user_photo.is_file());
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_browse_pages(ctx: &mut CatalogTestContext) {
        for i in 0..5 {
            ctx.catalog.create(&PieceData::new(&format!("P-{}", i))).unwrap();
        }

        let page = ctx.catalog.browse(&PieceFilter::new().article("p-"), PageWindow::page(1, 2));
        assert_eq!(page.total_count, 5);
        let articles: Vec<&str> = page.rows.iter().map(|p| p.data.article.as_str()).collect();
        assert_eq!(articles, vec!["P-2", "P-3"]);
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_catalog_opens_when_history_cannot_be_created(ctx: &mut CatalogTestContext) {
        let base = ctx.temp_dir.path().join("blocked_history");
        fs::create_dir_all(&base).unwrap();
        fs::write(base.join("not_a_dir"), "").unwrap();
        let mut config = Config::with_base_dir(&base);
        config.history_file = "not_a_dir/historique.txt".to_string();

        let mut catalog = Catalog::open(&config).unwrap();
        let outcome = catalog.create(&valve()).unwrap();

        assert!(catalog.get(outcome.id).is_some());
        assert!(outcome.warnings.iter().any(|w| w.contains("History")));
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_find_reports_storage_errors_that_get_hides(ctx: &mut CatalogTestContext) {
        let id = ctx.catalog.create(&valve()).unwrap().id;
        assert_eq!(ctx.catalog.find(id).unwrap().id, id);
        assert!(matches!(ctx.catalog.find(id + 1), Err(PieceError::NotFound(_))));

        ctx.catalog.pieces_mut().conn.execute_batch("DROP TABLE pieces;").unwrap();

        assert!(ctx.catalog.get(id).is_none());
        assert!(matches!(ctx.catalog.find(id), Err(PieceError::Storage(_))));
    }

    #[test_context(CatalogTestContext)]
    #[test]
    fn test_history_failure_does_not_fail_save(ctx: &mut CatalogTestContext) {
        let history_path = ctx.catalog.audit().path().to_path_buf();
        fs::remove_file(&history_path).unwrap();
        fs::create_dir(&history_path).unwrap();

        let outcome = ctx.catalog.create(&valve()).unwrap();

        assert!(ctx.catalog.get(outcome.id).is_some());
        assert!(outcome.warnings.iter().any(|w| w.contains("History")));
    }
}
