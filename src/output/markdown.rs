use std::path::Path;

use comfy_table::{Table, presets::ASCII_MARKDOWN};

use crate::consts::EMPTY_PLACEHOLDER;

/// Values for the `## Session` table
#[derive(Debug, Clone)]
pub(crate) struct ReportMeta<'a> {
    pub(crate) version: &'a str,
    pub(crate) output_dir: &'a Path,
    pub(crate) history_file: &'a Path,
    pub(crate) description: &'a str,
    pub(crate) date: String,
    pub(crate) user: &'a str,
}

/// `|` would end a Markdown table cell early
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

fn session_table(meta: &ReportMeta<'_>) -> Table {
    let output_dir = meta.output_dir.display().to_string();
    let history_file = meta.history_file.display().to_string();
    let rows = [
        ("Version", meta.version),
        ("Output_Dir", output_dir.as_str()),
        ("Bash_Hist", history_file.as_str()),
        ("Script_Desc", meta.description),
        ("Date", meta.date.as_str()),
        ("User", meta.user),
    ];

    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN).set_header(vec!["Key", "Value"]);
    for (key, value) in rows {
        table.add_row(vec![key.to_string(), escape_cell(value)]);
    }
    table
}

/// A fence longer than any backtick run inside the block
fn fence_for(commands: &[String]) -> String {
    let longest = commands
        .iter()
        .map(|c| {
            c.split(|ch: char| ch != '`')
                .map(str::len)
                .max()
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0);
    "`".repeat((longest + 1).max(3))
}

/// Render the full report. `commands` must already be free of ordinals.
pub(crate) fn render_report(meta: &ReportMeta<'_>, commands: &[String]) -> String {
    let fence = fence_for(commands);
    let mut out = String::new();

    out.push_str("# Bash History Dump\n\n");
    out.push_str("## Session\n\n");
    out.push_str(&session_table(meta).to_string());
    out.push_str("\n\n");
    out.push_str("## History\n\n");
    out.push_str(&fence);
    out.push('\n');
    if commands.is_empty() {
        out.push_str(EMPTY_PLACEHOLDER);
        out.push('\n');
    } else {
        for command in commands {
            out.push_str(" - ");
            out.push_str(command);
            out.push('\n');
        }
    }
    out.push_str(&fence);
    out.push('\n');
    out
}
