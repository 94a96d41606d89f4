use crate::{
    libs::{catalog::Catalog, config::Config, messages::Message, view::View},
    msg_error, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ShowArgs {
    id: i64,
}

pub fn cmd(args: ShowArgs, config: &Config) -> Result<()> {
    let catalog = Catalog::open(config)?;

    match catalog.get(args.id) {
        Some(piece) => {
            msg_print!(Message::PieceDetailsHeader(piece.id), true);
            View::piece(&piece)?;
        }
        None => msg_error!(Message::PieceNotFound(args.id)),
    }
    Ok(())
}
