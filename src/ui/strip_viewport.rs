use crate::calc::{ScrollContainer, StripGeometry, StripItem};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// The visible window onto the strip, measured in terminal cells.
#[derive(Debug, Clone)]
pub struct StripViewport {
    geometry: StripGeometry,
    width: u16,
    content_width: f64,
    offset: f64,
    target: f64,
}

impl StripViewport {
    pub fn new(geometry: StripGeometry) -> Self {
        StripViewport {
            geometry,
            width: 0,
            content_width: 0.0,
            offset: 0.0,
            target: 0.0,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_settled(&self) -> bool {
        self.offset == self.target
    }

    /// Records the measured width and the strip's total width.
    pub fn resize(&mut self, width: u16, content_width: f64) {
        self.width = width;
        self.content_width = content_width;
        self.offset = self.clamp(self.offset);
        self.target = self.clamp(self.target);
    }

    fn clamp(&self, offset: f64) -> f64 {
        let max = (self.content_width - self.width as f64).max(0.0);
        offset.clamp(0.0, max)
    }

    /// Advances a smooth scroll by half the remaining distance.
    pub fn tick(&mut self) {
        let remaining = self.target - self.offset;
        if remaining.abs() < 0.5 {
            self.offset = self.target;
        } else {
            self.offset += remaining / 2.0;
        }
    }

    /// Renders the visible slice of the strip.
    pub fn line(&self, items: &[StripItem]) -> Line<'static> {
        let g = self.geometry;
        let width = self.width as usize;
        let content = g.item_left_edge(items.len()).ceil() as usize;
        let total = content + width;
        let mut cells: Vec<(char, Option<bool>)> = vec![(' ', None); total];

        let item_cells = g.item_width.round().max(1.0) as usize;
        for (i, item) in items.iter().enumerate() {
            let left = g.item_left_edge(i).round() as usize;
            let label: Vec<char> = item.label.chars().take(item_cells).collect();
            let pad = (item_cells - label.len()) / 2;
            for c in 0..item_cells {
                if let Some(cell) = cells.get_mut(left + c) {
                    *cell = (' ', Some(item.active));
                }
            }
            for (k, ch) in label.into_iter().enumerate() {
                if let Some(cell) = cells.get_mut(left + pad + k) {
                    cell.0 = ch;
                }
            }
        }

        let start = (self.offset().max(0.0).round() as usize).min(total);
        let end = (start + width).min(total);

        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut run = String::new();
        let mut run_kind: Option<bool> = None;
        for &(ch, kind) in &cells[start..end] {
            if kind != run_kind && !run.is_empty() {
                let text = std::mem::take(&mut run);
                spans.push(Span::styled(text, cell_style(run_kind)));
            }
            run_kind = kind;
            run.push(ch);
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, cell_style(run_kind)));
        }
        Line::from(spans)
    }
}

fn cell_style(kind: Option<bool>) -> Style {
    match kind {
        Some(true) => Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        Some(false) => Style::default().fg(Color::Cyan),
        None => Style::default(),
    }
}

impl ScrollContainer for StripViewport {
    fn visible_width(&self) -> f64 {
        self.width as f64
    }

    fn set_scroll_offset(&mut self, offset: f64, smooth: bool) {
        self.target = self.clamp(offset);
        if !smooth {
            self.offset = self.target;
        }
    }

    fn scroll_item_into_view(&mut self, item_index: usize) {
        let left = self.geometry.item_left_edge(item_index);
        let right = left + self.geometry.item_width;
        let mut next = self.offset;
        if left < next {
            next = left;
        } else if right > next + self.width as f64 {
            next = right - self.width as f64;
        }
        self.offset = self.clamp(next);
        self.target = self.offset;
    }
}
