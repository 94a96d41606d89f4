use super::FilterArgs;
use crate::{
    libs::{
        catalog::Catalog,
        config::Config,
        export::{ExportFormat, Exporter},
        messages::Message,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    filter: FilterArgs,

    #[arg(short, long, value_enum, default_value = "excel")]
    format: ExportFormat,

    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn cmd(args: ExportArgs, config: &Config) -> Result<()> {
    let catalog = Catalog::open(config)?;
    let projection = catalog.pieces().export_projection(&args.filter.to_filter())?;

    let exporter = Exporter::new(args.format, args.output);
    let written = exporter.export(&projection)?;

    if written == 0 {
        msg_info!(Message::ExportEmpty);
    }
    msg_success!(Message::ExportCompleted(written, exporter.output_path().display().to_string()));
    Ok(())
}
