use crate::{
    db::{
        db::Db,
        migrations::{get_db_version, needs_migration, MigrationManager},
    },
    libs::{config::Config, messages::Message},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Show the schema version of the store file.
    Status,
    /// List the applied migrations.
    History,
}

pub fn cmd(args: MigrationsArgs, config: &Config) -> Result<()> {
    let conn = Db::open_without_migrations(&config.database_path())?;

    match args.command {
        MigrationsCommand::Status => {
            msg_print!(Message::DataDirectory(config.base_dir().display().to_string()));
            msg_print!(Message::DatabaseVersion(get_db_version(&conn)?));
            if needs_migration(&conn)? {
                msg_info!(Message::DatabaseNeedsUpdate);
            } else {
                msg_info!(Message::DatabaseUpToDate);
            }
        }
        MigrationsCommand::History => {
            let history = MigrationManager::new().get_migration_history(&conn)?;

            msg_print!(Message::MigrationHistory, true);
            for (version, name, applied_at) in history {
                msg_print!(Message::MigrationHistoryEntry(version, name, applied_at));
            }
        }
    }

    Ok(())
}
