//! Horizontal bar chart drawn with ratatui's `BarChart` into an off-screen buffer.
//!
//! The chart draws only with primitives registered in the process-wide
//! registry; [`ensure_chart_registered`] installs them once.

use std::sync::OnceLock;

use engine_logging::engine_debug;
use ratatui::{
    buffer::Buffer,
    layout::{Direction, Rect},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Widget},
};
use wordfreq_core::HistogramRow;

use super::constants::{BAR_WIDTH, CHART_TITLE, EMPTY_WORD_LABEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartPrimitive {
    CategoryScale,
    LinearScale,
    BarElement,
    Title,
}

#[derive(Debug)]
pub struct ChartRegistry {
    primitives: Vec<ChartPrimitive>,
}

impl ChartRegistry {
    pub fn has(&self, primitive: ChartPrimitive) -> bool {
        self.primitives.contains(&primitive)
    }
}

static REGISTRY: OnceLock<ChartRegistry> = OnceLock::new();

/// Registers the chart primitives on first call; later calls return the same registry.
pub fn ensure_chart_registered() -> &'static ChartRegistry {
    REGISTRY.get_or_init(|| {
        engine_debug!("Registering chart primitives");
        ChartRegistry {
            primitives: vec![
                ChartPrimitive::CategoryScale,
                ChartPrimitive::LinearScale,
                ChartPrimitive::BarElement,
                ChartPrimitive::Title,
            ],
        }
    })
}

pub fn word_label(word: &str) -> String {
    if word.is_empty() {
        EMPTY_WORD_LABEL.to_string()
    } else {
        word.escape_debug().to_string()
    }
}

/// One bar per row: category labels on the left, counts scaled against the largest one.
pub fn render_bar_chart(registry: &ChartRegistry, rows: &[HistogramRow]) -> String {
    let with_title = registry.has(ChartPrimitive::Title);
    if rows.is_empty() || !registry.has(ChartPrimitive::BarElement) {
        return if with_title {
            format!("{CHART_TITLE}\n")
        } else {
            String::new()
        };
    }

    let with_labels = registry.has(ChartPrimitive::CategoryScale);
    let with_values = registry.has(ChartPrimitive::LinearScale);
    let bars: Vec<Bar> = rows
        .iter()
        .map(|row| {
            let mut bar = Bar::default().value(row.frequency);
            if with_labels {
                bar = bar.label(Line::from(word_label(&row.word)));
            }
            if !with_values {
                bar = bar.text_value(String::new());
            }
            bar
        })
        .collect();

    let label_width = if with_labels {
        rows.iter()
            .map(|row| word_label(&row.word).chars().count())
            .max()
            .unwrap_or(0)
    } else {
        0
    };
    let max = rows.iter().map(|row| row.frequency).max().unwrap_or(0);

    let mut chart = BarChart::default()
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(max.max(1))
        .data(BarGroup::default().bars(&bars));
    if with_title {
        chart = chart.block(Block::new().borders(Borders::TOP).title(CHART_TITLE));
    }

    let width = to_u16(label_width + 1 + BAR_WIDTH);
    let height = to_u16(rows.len() + usize::from(with_title));
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    chart.render(area, &mut buffer);
    buffer_text(&buffer, area)
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn buffer_text(buffer: &Buffer, area: Rect) -> String {
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        let line: String = (area.left()..area.right())
            .map(|x| buffer[(x, y)].symbol())
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
