use super::FieldArgs;
use crate::{
    libs::{
        catalog::Catalog,
        config::Config,
        messages::Message,
        piece::{PieceData, DEFAULT_STATUT},
    },
    msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input};

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Article reference; asked for when omitted.
    article: Option<String>,

    #[command(flatten)]
    fields: FieldArgs,
}

pub fn cmd(args: AddArgs, config: &Config) -> Result<()> {
    let article = match args.article {
        Some(article) => article,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptArticle.to_string())
            .interact_text()?,
    };

    let mut data = PieceData::new(&article);
    data.statut_article = DEFAULT_STATUT.to_string();
    args.fields.apply(&mut data);

    let mut catalog = Catalog::open(config)?;
    let outcome = catalog.create(&data)?;

    for warning in &outcome.warnings {
        msg_warning!(Message::ImageWarning(warning.clone()));
    }
    msg_success!(Message::PieceCreated(outcome.id, outcome.piece.data.article));
    Ok(())
}
