#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use piecekeeper::libs::assets::ImageBounds;
    use piecekeeper::libs::preview::{load, Preview, PreviewPool};
    use std::fs;
    use std::path::PathBuf;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    const WAIT: Duration = Duration::from_secs(10);

    struct PreviewTestContext {
        temp_dir: TempDir,
        pool: PreviewPool,
    }

    impl TestContext for PreviewTestContext {
        fn setup() -> Self {
            PreviewTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
                pool: PreviewPool::new().unwrap(),
            }
        }
    }

    impl PreviewTestContext {
        fn photo(&self, name: &str, width: u32, height: u32) -> PathBuf {
            let path = self.temp_dir.path().join(name);
            RgbImage::from_pixel(width, height, Rgb([30, 120, 200])).save(&path).unwrap();
            path
        }

        fn request(&self, path: PathBuf) -> Preview {
            let (tx, rx) = mpsc::channel();
            self.pool.request(path, ImageBounds::PREVIEW, move |preview| {
                let _ = tx.send(preview);
            });
            rx.recv_timeout(WAIT).unwrap()
        }
    }

    #[test_context(PreviewTestContext)]
    #[test]
    fn test_large_image_is_scaled_to_bounds(ctx: &mut PreviewTestContext) {
        let path = ctx.photo("large.png", 1100, 450);

        let preview = ctx.request(path);

        assert!(preview.is_ready());
        assert_eq!(preview.dimensions(), Some((550, 225)));
    }

    #[test_context(PreviewTestContext)]
    #[test]
    fn test_small_image_keeps_its_size(ctx: &mut PreviewTestContext) {
        let path = ctx.photo("small.png", 120, 80);

        assert_eq!(ctx.request(path).dimensions(), Some((120, 80)));
    }

    #[test_context(PreviewTestContext)]
    #[test]
    fn test_missing_file_is_unavailable(ctx: &mut PreviewTestContext) {
        let preview = ctx.request(ctx.temp_dir.path().join("gone.png"));

        assert!(matches!(preview, Preview::Unavailable(_)));
    }

    #[test_context(PreviewTestContext)]
    #[test]
    fn test_garbage_file_is_unavailable(ctx: &mut PreviewTestContext) {
        let path = ctx.temp_dir.path().join("broken.png");
        fs::write(&path, b"not an image").unwrap();

        assert!(!ctx.request(path).is_ready());
    }

    #[test_context(PreviewTestContext)]
    #[test]
    fn test_many_requests_all_complete(ctx: &mut PreviewTestContext) {
        let path = ctx.photo("batch.png", 900, 900);
        let (tx, rx) = mpsc::channel();

        for _ in 0..6 {
            let tx = tx.clone();
            ctx.pool.request(path.clone(), ImageBounds::PREVIEW, move |preview| {
                let _ = tx.send(preview.dimensions());
            });
        }

        for _ in 0..6 {
            assert_eq!(rx.recv_timeout(WAIT).unwrap(), Some((450, 450)));
        }
    }

    #[test_context(PreviewTestContext)]
    #[test]
    fn test_panicking_callback_does_not_poison_pool(ctx: &mut PreviewTestContext) {
        let path = ctx.photo("ok.png", 10, 10);
        ctx.pool.request(path.clone(), ImageBounds::PREVIEW, |_| panic!("callback failure"));

        assert!(ctx.request(path).is_ready());
    }

    #[test]
    fn test_load_directly() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("direct.png");
        RgbImage::new(1600, 1200).save(&path).unwrap();

        assert_eq!(load(&path, ImageBounds::STORAGE).dimensions(), Some((800, 600)));
    }
}
