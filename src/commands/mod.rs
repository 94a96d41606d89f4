//! Command-line front end.
//!
//! Each subcommand is a thin wrapper that parses its arguments, calls into
//! the catalog core and prints the outcome through the message macros.

pub mod add;
pub mod delete;
pub mod edit;
pub mod export;
pub mod history;
pub mod image;
pub mod import;
pub mod init;
pub mod migrations;
pub mod preview;
pub mod search;
pub mod show;

use crate::libs::{
    config::Config,
    data_storage::DataStorage,
    filter::{CodeSapCriterion, PieceFilter},
    piece::PieceData,
};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Search pieces")]
    Search(search::SearchArgs),
    #[command(about = "Show every field of a piece")]
    Show(show::ShowArgs),
    #[command(about = "Create a piece")]
    Add(add::AddArgs),
    #[command(about = "Modify a piece")]
    Edit(edit::EditArgs),
    #[command(about = "Delete a piece and its image")]
    Delete(delete::DeleteArgs),
    #[command(about = "Attach or remove a piece image")]
    Image(image::ImageArgs),
    #[command(about = "Export the filtered catalog")]
    Export(export::ExportArgs),
    #[command(about = "Import the legacy spreadsheet (CSV) once")]
    Import(import::ImportArgs),
    #[command(about = "Print the modification history")]
    History(history::HistoryArgs),
    #[command(about = "Decode a piece image in the background preview pool")]
    Preview(preview::PreviewArgs),
    #[command(about = "Write the configuration file")]
    Init(init::InitArgs),
    #[command(about = "Database schema status")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// Directory holding the store, images, history and config.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        let config = load_config(cli.data_dir)?;

        match cli.command {
            Commands::Search(args) => search::cmd(args, &config),
            Commands::Show(args) => show::cmd(args, &config),
            Commands::Add(args) => add::cmd(args, &config),
            Commands::Edit(args) => edit::cmd(args, &config),
            Commands::Delete(args) => delete::cmd(args, &config),
            Commands::Image(args) => image::cmd(args, &config),
            Commands::Export(args) => export::cmd(args, &config),
            Commands::Import(args) => import::cmd(args, &config),
            Commands::History(args) => history::cmd(args, &config),
            Commands::Preview(args) => preview::cmd(args, &config).await,
            Commands::Init(args) => init::cmd(args, &config),
            Commands::Migrations(args) => migrations::cmd(args, &config),
        }
    }
}

pub fn load_config(data_dir: Option<PathBuf>) -> Result<Config> {
    match data_dir {
        Some(dir) => Config::read_from(DataStorage::at(dir)),
        None => Config::read(),
    }
}

/// Search criteria shared by `search` and `export`.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    #[arg(long)]
    article: Option<String>,

    /// Substring of the code, or `vide` for pieces without a code.
    #[arg(long)]
    code_sap: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    description_longue: Option<String>,

    /// Status; `Tous` means any.
    #[arg(long)]
    statut: Option<String>,

    /// Unit of measure; `Tous` means any.
    #[arg(long)]
    unite: Option<String>,

    #[arg(long)]
    quantite: Option<String>,

    #[arg(long)]
    situation: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> PieceFilter {
        PieceFilter {
            article: self.article.clone(),
            code_sap: self.code_sap.as_deref().and_then(CodeSapCriterion::from_input),
            description: self.description.clone(),
            description_longue: self.description_longue.clone(),
            statut: self.statut.clone(),
            unite: self.unite.clone(),
            quantite_installee: self.quantite.clone(),
            situation: self.situation.clone(),
        }
    }
}

/// Optional piece fields shared by `add` and `edit`.
#[derive(Debug, Clone, Default, Args)]
pub struct FieldArgs {
    #[arg(long)]
    code_sap: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    description_longue: Option<String>,

    #[arg(long)]
    unite: Option<String>,

    #[arg(long)]
    statut: Option<String>,

    #[arg(long)]
    quantite: Option<String>,

    #[arg(long)]
    situation: Option<String>,

    /// Image file to copy into the catalog.
    #[arg(long)]
    image: Option<PathBuf>,
}

impl FieldArgs {
    /// Copies the given values into `data`. Returns whether any was given.
    pub fn apply(&self, data: &mut PieceData) -> bool {
        let mut changed = false;
        let mut set = |target: &mut String, value: &Option<String>| {
            if let Some(value) = value {
                *target = value.clone();
                changed = true;
            }
        };

        set(&mut data.code_sap, &self.code_sap);
        set(&mut data.description, &self.description);
        set(&mut data.description_longue, &self.description_longue);
        set(&mut data.unite_mesure, &self.unite);
        set(&mut data.statut_article, &self.statut);
        set(&mut data.quantite_installee, &self.quantite);
        set(&mut data.situation, &self.situation);
        set(
            &mut data.image_path,
            &self.image.as_ref().map(|p| p.to_string_lossy().into_owned()),
        );

        changed
    }
}
