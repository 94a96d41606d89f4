use super::FilterArgs;
use crate::{
    libs::{catalog::Catalog, config::Config, filter::PageWindow, messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Page number, starting at 1.
    #[arg(short, long, default_value_t = 1)]
    page: u32,

    /// Rows per page (defaults to the configured page size).
    #[arg(long)]
    page_size: Option<u32>,
}

pub fn cmd(args: SearchArgs, config: &Config) -> Result<()> {
    let catalog = Catalog::open(config)?;
    let size = args.page_size.unwrap_or(config.page_size).max(1);
    let index = args.page.max(1) - 1;

    let result = catalog.browse(&args.filter.to_filter(), PageWindow::page(index, size));
    if result.total_count == 0 {
        msg_info!(Message::NoPiecesFound);
        return Ok(());
    }

    View::pieces(&result.rows)?;
    msg_print!(Message::SearchPage {
        page: index + 1,
        pages: PageWindow::total_pages(result.total_count, size),
        shown: result.rows.len(),
        total: result.total_count,
    });
    Ok(())
}
