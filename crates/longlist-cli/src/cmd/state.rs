//! `longlist state`: read the shared state, or merge a partial update.

use std::io::{self, Write};

use crate::cmd::{ServerArgs, request};
use crate::output::{OutputMode, pretty_kv, pretty_section, render, render_mode};
use clap::Args;
use longlist_client::ListApi;
use longlist_core::config::ClientConfig;
use longlist_core::{ItemId, StateDocument, StatePatch};

#[derive(Args, Debug)]
pub struct StateArgs {
    /// Replace the selection with these ids (comma-separated).
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub select: Option<Vec<ItemId>>,

    /// Empty the selection.
    #[arg(long, conflicts_with = "select")]
    pub clear_selection: bool,

    /// Replace the custom order (comma-separated ids, first shown first).
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub order: Option<Vec<ItemId>>,

    /// Drop the custom order and go back to ascending ids.
    #[arg(long, conflicts_with = "order")]
    pub clear_order: bool,

    /// Only apply the update if the server is still at this version.
    #[arg(long, value_name = "VERSION")]
    pub expect_version: Option<u64>,

    #[command(flatten)]
    pub server: ServerArgs,
}

impl StateArgs {
    /// The patch these flags describe, or `None` for a plain read.
    fn patch(&self) -> Option<StatePatch> {
        let selected_items = if self.clear_selection {
            Some(Vec::new())
        } else {
            self.select.clone()
        };
        let custom_order = if self.clear_order {
            Some(None)
        } else {
            self.order.clone().map(Some)
        };
        let patch = StatePatch {
            selected_items,
            custom_order,
            item_edits: None,
            expected_version: self.expect_version,
        };
        (!patch.is_empty()).then_some(patch)
    }
}

pub fn run_state(args: &StateArgs, config: &ClientConfig, output: OutputMode) -> anyhow::Result<()> {
    let client = args.server.client(config);
    if let Some(patch) = args.patch() {
        let ack = request(output, client.merge_state(&patch))?;
        return render(output, &ack, |ack, w| {
            writeln!(w, "state updated (version {})", ack.version)
        });
    }

    let doc = request(output, client.read_state())?;
    render_mode(output, &doc, write_text, write_pretty)
}

fn join_ids(ids: &[ItemId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn write_text(doc: &StateDocument, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "version\t{}", doc.version)?;
    writeln!(w, "selected\t{}", join_ids(&doc.selected_items))?;
    match &doc.custom_order {
        Some(order) => writeln!(w, "order\t{}", join_ids(order))?,
        None => writeln!(w, "order\t-")?,
    }
    for (id, edit) in &doc.item_edits {
        writeln!(w, "note\t{id}\t{}", edit.note)?;
    }
    Ok(())
}

fn write_pretty(doc: &StateDocument, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "State")?;
    pretty_kv(w, "version", doc.version.to_string())?;
    pretty_kv(
        w,
        "selected",
        format!("{} item(s) {}", doc.selected_items.len(), join_ids(&doc.selected_items)),
    )?;
    let order = doc.custom_order.as_ref().map_or_else(
        || "ascending ids".to_owned(),
        |order| format!("custom, {} id(s)", order.len()),
    );
    pretty_kv(w, "order", order)?;
    if !doc.item_edits.is_empty() {
        pretty_kv(w, "notes", doc.item_edits.len().to_string())?;
    }
    Ok(())
}
