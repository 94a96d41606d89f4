#[cfg(test)]
mod tests {
    use piecekeeper::libs::config::{Config, CONFIG_FILE_NAME};
    use piecekeeper::libs::data_storage::DataStorage;
    use piecekeeper::libs::filter::PageWindow;
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConfigTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            ConfigTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl ConfigTestContext {
        fn storage(&self) -> DataStorage {
            DataStorage::at(self.temp_dir.path())
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_missing_file_gives_defaults(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(ctx.storage()).unwrap();

        assert_eq!(config.page_size, PageWindow::DEFAULT_PAGE_SIZE);
        assert_eq!(config.base_dir(), ctx.temp_dir.path());
        assert_eq!(config.database_path(), ctx.temp_dir.path().join("ocp_pieces.db"));
        assert!(!ctx.temp_dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_then_read(ctx: &mut ConfigTestContext) {
        let mut config = Config::read_from(ctx.storage()).unwrap();
        config.page_size = 20;
        config.max_image_width = 1024;
        config.images_dir = "photos".to_string();
        config.save().unwrap();

        let reread = Config::read_from(ctx.storage()).unwrap();

        assert_eq!(reread, config);
        assert_eq!(reread.images_path(), ctx.temp_dir.path().join("photos"));
        assert_eq!(reread.image_bounds().width, 1024);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_absolute_paths_are_kept(ctx: &mut ConfigTestContext) {
        let elsewhere = tempfile::tempdir().unwrap();
        let history = elsewhere.path().join("history.txt");
        fs::write(
            ctx.temp_dir.path().join(CONFIG_FILE_NAME),
            serde_json::json!({ "history_file": history.to_string_lossy() }).to_string(),
        )
        .unwrap();

        let config = Config::read_from(ctx.storage()).unwrap();

        assert_eq!(config.history_path(), history);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_invalid_file_is_an_error(ctx: &mut ConfigTestContext) {
        fs::write(ctx.temp_dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();

        assert!(Config::read_from(ctx.storage()).is_err());
    }

    #[test]
    fn test_page_window_uses_page_size() {
        let mut config = Config::with_base_dir("/tmp/pieces");
        config.page_size = 25;
        assert_eq!(config.page_window(2), PageWindow::new(25, 50));

        config.page_size = 0;
        assert_eq!(config.page_window(3).limit, 1);
    }
}
