use crate::{
    db::pieces::Pieces,
    libs::{
        config::Config,
        import::{ImportStatus, LegacyImporter},
        messages::Message,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Legacy spreadsheet saved as CSV.
    source: PathBuf,
}

pub fn cmd(args: ImportArgs, config: &Config) -> Result<()> {
    let mut pieces = Pieces::open(&config.database_path())?;
    let report = LegacyImporter::new(config.import_marker_path()).run(&mut pieces, &args.source)?;

    match report.status {
        ImportStatus::Imported => msg_success!(Message::ImportCompleted(report.imported, report.skipped)),
        ImportStatus::StoreNotEmpty => msg_info!(Message::ImportStoreNotEmpty),
        ImportStatus::AlreadyDone => msg_info!(Message::ImportAlreadyDone),
    }
    Ok(())
}
