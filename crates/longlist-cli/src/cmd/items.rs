//! `longlist items`: fetch one page of the projected list.

use std::io::{self, Write};

use crate::cmd::{ServerArgs, request};
use crate::output::{OutputMode, pretty_rule, pretty_section, render_mode};
use clap::Args;
use longlist_client::ListApi;
use longlist_client::rows::EMPTY_MARKER;
use longlist_core::config::ClientConfig;
use longlist_core::{ItemView, Page};

#[derive(Args, Debug)]
pub struct ItemsArgs {
    /// Case-insensitive substring matched against item values.
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Position in the filtered, ordered list to start from.
    #[arg(long, default_value_t = 0)]
    pub offset: u64,

    /// Page size. Defaults to `client.page_size`.
    #[arg(short = 'n', long)]
    pub limit: Option<u64>,

    #[command(flatten)]
    pub server: ServerArgs,
}

pub fn run_items(args: &ItemsArgs, config: &ClientConfig, output: OutputMode) -> anyhow::Result<()> {
    let client = args.server.client(config);
    let limit = args.limit.unwrap_or(config.page_size);
    let page = request(output, client.fetch_items(&args.search, args.offset, limit))?;
    render_mode(output, &page, write_text, |page, w| {
        write_pretty(page, args.offset, w)
    })
}

fn write_text(page: &Page, w: &mut dyn Write) -> io::Result<()> {
    for item in &page.items {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            item.id,
            item.value,
            item.selected,
            item.note.as_deref().unwrap_or_default()
        )?;
    }
    Ok(())
}

fn write_pretty(page: &Page, offset: u64, w: &mut dyn Write) -> io::Result<()> {
    if page.items.is_empty() {
        return writeln!(w, "{EMPTY_MARKER} ({} total)", page.total);
    }
    let last = offset + page.items.len() as u64;
    pretty_section(w, &format!("Items {}-{last} of {}", offset + 1, page.total))?;
    for item in &page.items {
        writeln!(w, "{}", pretty_line(item))?;
    }
    pretty_rule(w)
}

fn pretty_line(item: &ItemView) -> String {
    let mark = if item.selected { "[x]" } else { "[ ]" };
    match item.note.as_deref() {
        Some(note) => format!("{mark} {:>8}  {:<14} {note}", item.id.get(), item.value),
        None => format!("{mark} {:>8}  {}", item.id.get(), item.value),
    }
}
