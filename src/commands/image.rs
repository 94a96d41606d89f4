use crate::{
    libs::{catalog::Catalog, config::Config, messages::Message},
    msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ImageArgs {
    #[command(subcommand)]
    command: ImageCommand,
}

#[derive(Debug, Subcommand)]
enum ImageCommand {
    /// Copy a file into the catalog as the piece image.
    Attach { id: i64, file: PathBuf },
    /// Remove the piece image.
    Detach { id: i64 },
}

pub fn cmd(args: ImageArgs, config: &Config) -> Result<()> {
    let mut catalog = Catalog::open(config)?;

    let (outcome, message) = match args.command {
        ImageCommand::Attach { id, file } => (catalog.attach_image(id, &file)?, Message::ImageAttached(id)),
        ImageCommand::Detach { id } => (catalog.detach_image(id)?, Message::ImageRemoved(id)),
    };

    for warning in &outcome.warnings {
        msg_warning!(Message::ImageWarning(warning.clone()));
    }
    msg_success!(message);
    Ok(())
}
