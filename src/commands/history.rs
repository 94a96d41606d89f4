use crate::{
    libs::{audit::AuditLog, config::Config, messages::Message},
    msg_error, msg_info,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Only print the last N lines.
    #[arg(short, long)]
    tail: Option<usize>,
}

pub fn cmd(args: HistoryArgs, config: &Config) -> Result<()> {
    let log = AuditLog::open(config.history_path())?;
    let text = match log.read_all() {
        Ok(text) => text,
        Err(e) => {
            msg_error!(Message::HistoryUnavailable(e.to_string()));
            return Ok(());
        }
    };

    if !text.contains("Action:") {
        msg_info!(Message::HistoryEmpty);
        return Ok(());
    }

    let lines: Vec<&str> = text.lines().collect();
    let start = args.tail.map(|n| lines.len().saturating_sub(n)).unwrap_or(0);
    for line in &lines[start..] {
        println!("{}", line);
    }
    Ok(())
}
