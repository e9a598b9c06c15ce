use clap::{Parser, Subcommand};

use crate::domain::{cell_value::CellValue, sheets::sheet_payload::SheetPayload};

pub const DEFAULT_PREVIEW_LIMIT: usize = 20;

/// Replaces a Google Sheets tab with the current promotional pricing records.
#[derive(Parser, Debug)]
#[command(name = "promo-sheet-sync", version)]
pub struct Cli {
    /// Configuration file, extension optional.
    #[arg(long, env = "CONFIG_PATH", default_value = "Config")]
    pub config: String,

    /// Log at DEBUG regardless of `logging.level`.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Clear the sheet and write the extracted rows (default).
    Run,
    /// Verify spreadsheet access, the target tab and the database connection. Writes nothing.
    Check,
    /// Print the rows that would be written as tab-separated text.
    Preview {
        #[arg(long, default_value_t = DEFAULT_PREVIEW_LIMIT)]
        limit: usize,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}

fn render_row(row: &[CellValue]) -> String {
    row.iter()
        .map(|cell| cell.to_string().replace(['\t', '\n', '\r'], " "))
        .collect::<Vec<_>>()
        .join("\t")
}

/// Header plus at most `limit` data rows, one line each. A trailing line notes how many rows
/// were left out.
pub fn render_preview(payload: &SheetPayload, limit: usize) -> String {
    let mut lines = vec![render_row(payload.header())];
    lines.extend(payload.data_rows().iter().take(limit).map(|row| render_row(row)));

    let hidden = payload.data_row_count().saturating_sub(limit);
    if hidden > 0 {
        lines.push(format!("... {} more row(s)", hidden));
    }

    lines.join("\n")
}
