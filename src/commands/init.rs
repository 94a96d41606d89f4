//! Writes `config.json` into the data directory.
//!
//! Values given on the command line replace the current ones; everything
//! else keeps its loaded value (or default), so the file always lists every
//! setting. `--delete` removes the file and returns to defaults.

use crate::{
    libs::{
        config::{Config, CONFIG_FILE_NAME},
        messages::Message,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::fs;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Rows per search page.
    #[arg(long)]
    page_size: Option<u32>,

    /// Largest stored image width in pixels.
    #[arg(long)]
    max_image_width: Option<u32>,

    /// Largest stored image height in pixels.
    #[arg(long)]
    max_image_height: Option<u32>,

    /// Remove the configuration file instead of writing it.
    #[arg(short, long)]
    delete: bool,
}

pub fn cmd(args: InitArgs, config: &Config) -> Result<()> {
    let path = config.storage().get_path(CONFIG_FILE_NAME)?;
    msg_print!(Message::DataDirectory(config.base_dir().display().to_string()));

    if args.delete {
        if path.exists() {
            fs::remove_file(&path)?;
        }
        msg_info!(Message::ConfigRemoved(path.display().to_string()));
        return Ok(());
    }

    let mut config = config.clone();
    if let Some(size) = args.page_size {
        config.page_size = size.max(1);
    }
    if let Some(width) = args.max_image_width {
        config.max_image_width = width;
    }
    if let Some(height) = args.max_image_height {
        config.max_image_height = height;
    }
    config.save()?;

    msg_success!(Message::ConfigSaved(path.display().to_string()));
    Ok(())
}
