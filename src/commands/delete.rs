use crate::{
    libs::{catalog::Catalog, config::Config, error::PieceError, messages::Message},
    msg_bail_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    id: i64,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,
}

pub fn cmd(args: DeleteArgs, config: &Config) -> Result<()> {
    let mut catalog = Catalog::open(config)?;

    let piece = match catalog.find(args.id) {
        Ok(piece) => piece,
        Err(PieceError::NotFound(id)) => msg_bail_anyhow!(Message::PieceNotFound(id)),
        Err(e) => return Err(e.into()),
    };

    let confirmed = args.yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeletePiece(piece.id, piece.data.article.clone()).to_string())
            .default(false)
            .interact()?;

    if confirmed {
        catalog.delete(piece.id)?;
        msg_success!(Message::PieceDeleted(piece.id));
    } else {
        msg_info!(Message::OperationCancelled);
    }
    Ok(())
}
