use super::FieldArgs;
use crate::{
    libs::{
        catalog::Catalog,
        config::Config,
        error::PieceError,
        messages::Message,
        piece::{PieceData, PieceField},
    },
    msg_bail_anyhow, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input};

#[derive(Debug, Args)]
pub struct EditArgs {
    id: i64,

    #[arg(long)]
    article: Option<String>,

    #[command(flatten)]
    fields: FieldArgs,

    /// Drop the current image.
    #[arg(long, conflicts_with = "image")]
    no_image: bool,

    /// Prompt for every field, current values as defaults.
    #[arg(short, long)]
    interactive: bool,
}

pub fn cmd(args: EditArgs, config: &Config) -> Result<()> {
    let mut catalog = Catalog::open(config)?;

    let current = match catalog.find(args.id) {
        Ok(current) => current,
        Err(PieceError::NotFound(id)) => msg_bail_anyhow!(Message::PieceNotFound(id)),
        Err(e) => return Err(e.into()),
    };

    let mut data = current.data.clone();
    let mut changed = args.fields.apply(&mut data);
    if let Some(article) = &args.article {
        data.article = article.clone();
        changed = true;
    }
    if args.no_image {
        data.image_path.clear();
        changed = true;
    }
    if args.interactive {
        prompt_fields(&mut data)?;
        changed = true;
    }

    if !changed {
        msg_print!(Message::NoFieldsToUpdate);
        return Ok(());
    }

    let outcome = catalog.update(args.id, &data)?;
    for warning in &outcome.warnings {
        msg_warning!(Message::ImageWarning(warning.clone()));
    }
    msg_success!(Message::PieceUpdated(outcome.id));
    Ok(())
}

fn prompt_fields(data: &mut PieceData) -> Result<()> {
    for field in PieceField::ALL.into_iter().filter(|f| *f != PieceField::ImagePath) {
        let value: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptField(field.audit_label().to_string()).to_string())
            .default(field.value(data).to_string())
            .allow_empty(field != PieceField::Article)
            .interact_text()?;
        *field.value_mut(data) = value;
    }
    Ok(())
}
