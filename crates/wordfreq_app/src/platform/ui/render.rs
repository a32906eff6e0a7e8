use tabled::{Table, Tabled};
use wordfreq_core::{AppViewModel, ExportNotice, Screen};

use super::chart::{render_bar_chart, word_label, ChartRegistry};

pub fn render(registry: &ChartRegistry, view: &AppViewModel) -> String {
    match view.screen {
        Screen::Idle => render_idle(view),
        Screen::Displaying => render_displaying(registry, view),
    }
}

fn render_idle(view: &AppViewModel) -> String {
    let mut out = format!("Source: {}\n", view.source_url);
    if view.fetch_in_flight {
        out.push_str("Fetching…\n");
    } else {
        out.push_str("Type `fetch` to analyze the document.\n");
    }
    if let Some(err) = &view.last_error {
        out.push_str(&format!("Fetch failed: {err}\n"));
    }
    out
}

fn render_displaying(registry: &ChartRegistry, view: &AppViewModel) -> String {
    let mut out = render_bar_chart(registry, &view.rows);
    out.push('\n');
    out.push_str(&render_table(view));
    out.push_str(&format!(
        "\n{} words, {} distinct, top {} shown\n",
        view.total_tokens,
        view.distinct_tokens,
        view.rows.len()
    ));
    match &view.export_notice {
        Some(ExportNotice::Saved { path }) => out.push_str(&format!("Exported to {path}\n")),
        Some(ExportNotice::Failed { message }) => {
            out.push_str(&format!("Export failed: {message}\n"))
        }
        None => {}
    }
    out.push_str("Actions: export | back\n");
    out
}

#[derive(Tabled)]
struct WordRow {
    #[tabled(rename = "Word")]
    word: String,
    #[tabled(rename = "Frequency")]
    frequency: u64,
}

fn render_table(view: &AppViewModel) -> String {
    let rows = view.rows.iter().map(|row| WordRow {
        word: word_label(&row.word),
        frequency: row.frequency,
    });
    let mut out = Table::new(rows).to_string();
    out.push('\n');
    out
}
