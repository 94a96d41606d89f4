use crate::{
    libs::{
        assets::ImageBounds,
        catalog::Catalog,
        config::Config,
        messages::Message,
        preview::{Preview, PreviewPool},
    },
    msg_debug, msg_error, msg_error_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::time::Duration;
use tokio::sync::oneshot;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    id: i64,

    #[arg(long, default_value_t = ImageBounds::PREVIEW.width)]
    width: u32,

    #[arg(long, default_value_t = ImageBounds::PREVIEW.height)]
    height: u32,

    /// Seconds to wait for the decoder.
    #[arg(long, default_value_t = 10)]
    timeout: u64,
}

pub async fn cmd(args: PreviewArgs, config: &Config) -> Result<()> {
    let catalog = Catalog::open(config)?;

    let Some(piece) = catalog.get(args.id) else {
        msg_error!(Message::PieceNotFound(args.id));
        return Ok(());
    };
    if piece.data.image_path.is_empty() {
        msg_info!(Message::PieceHasNoImage(piece.id));
        return Ok(());
    }

    let bounds = ImageBounds::new(args.width, args.height);
    msg_debug!(format!("Preview of {} within {}x{}", piece.data.image_path, bounds.width, bounds.height));

    let pool = PreviewPool::new().map_err(|e| msg_error_anyhow!(Message::PreviewUnavailable(e.to_string())))?;
    let (tx, rx) = oneshot::channel();
    pool.request(piece.data.image_path.clone(), bounds, move |preview| {
        let _ = tx.send(preview);
    });

    match tokio::time::timeout(Duration::from_secs(args.timeout), rx).await {
        Ok(Ok(Preview::Ready(img))) => msg_success!(Message::PreviewReady(img.width(), img.height())),
        Ok(Ok(Preview::Unavailable(reason))) => msg_info!(Message::PreviewUnavailable(reason)),
        _ => msg_error!(Message::PreviewTimedOut),
    }
    Ok(())
}
