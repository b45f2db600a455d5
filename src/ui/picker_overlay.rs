use crate::calc::{ColumnName, PickerColumn, PickerOption, PickerOverlay, PickerValues};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

const POPUP_WIDTH: u16 = 36;
const POPUP_HEIGHT: u16 = 14;

/// Terminal rendition of the year/month picker. Columns are drawn side by
/// side; the focused column takes Up/Down.
///
/// `prev_selected` remembers where each column's cursor was before the last
/// move and is drawn as a dim marker. It is only valid for the option list it
/// was recorded against.
#[derive(Debug, Default)]
pub struct TerminalPicker {
    columns: Vec<PickerColumn>,
    selected: Vec<usize>,
    prev_selected: Vec<Option<usize>>,
    focus: usize,
    visible: bool,
}

impl TerminalPicker {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.columns.clear();
        self.selected.clear();
        self.prev_selected.clear();
        self.focus = 0;
    }

    pub fn columns(&self) -> &[PickerColumn] {
        &self.columns
    }

    pub fn selected(&self, column: usize) -> Option<usize> {
        self.selected.get(column).copied()
    }

    pub fn prev_selected(&self, column: usize) -> Option<usize> {
        self.prev_selected.get(column).copied().flatten()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focus_next(&mut self) {
        if !self.columns.is_empty() {
            self.focus = (self.focus + 1) % self.columns.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.columns.is_empty() {
            let n = self.columns.len();
            self.focus = (self.focus + n - 1) % n;
        }
    }

    /// Moves the focused column's cursor. Returns whether it moved.
    pub fn move_selection(&mut self, delta: isize) -> bool {
        let Some(column) = self.columns.get(self.focus) else {
            return false;
        };
        let last = column.options.len().saturating_sub(1);
        let current = self.selected[self.focus];
        let next = current.saturating_add_signed(delta).min(last);
        if next == current {
            return false;
        }
        self.prev_selected[self.focus] = Some(current);
        self.selected[self.focus] = next;
        true
    }

    fn column_index(&self, name: ColumnName) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    fn value_of(&self, name: ColumnName) -> Option<i32> {
        let i = self.column_index(name)?;
        let column = &self.columns[i];
        column.options.get(self.selected[i]).map(|o| o.value)
    }

    /// Current value of each shown column.
    pub fn values(&self) -> PickerValues {
        PickerValues {
            year: self.value_of(ColumnName::Year),
            month: self
                .value_of(ColumnName::Month)
                .and_then(|m| u32::try_from(m).ok()),
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let columns = self.columns();
        if !self.visible || columns.is_empty() {
            return;
        }
        let popup = centered_rect(POPUP_WIDTH, POPUP_HEIGHT, area);
        f.render_widget(Clear, popup);
        let block = Block::default().borders(Borders::ALL).title(" Jump to ");
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(inner);

        let count = columns.len() as u32;
        let constraints: Vec<Constraint> = columns
            .iter()
            .map(|_| Constraint::Ratio(1, count))
            .collect();
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(rows[0]);

        for (i, column) in columns.iter().enumerate() {
            let prev = self.prev_selected(i);
            let items: Vec<ListItem> = column
                .options
                .iter()
                .enumerate()
                .map(|(j, option)| {
                    let marker = if prev == Some(j) { "· " } else { "  " };
                    let dim = Style::default().add_modifier(Modifier::DIM);
                    let spans = vec![Span::styled(marker, dim), Span::raw(option.text.clone())];
                    ListItem::new(Line::from(spans))
                })
                .collect();
            let title_style = if i == self.focus() {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let title = Span::styled(column.name.as_str(), title_style);
            let block = Block::default().borders(Borders::NONE).title(title);
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            let mut state = ListState::default();
            state.select(self.selected(i));
            f.render_stateful_widget(list, cols[i], &mut state);
        }

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("=Done  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("=Cancel  "),
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("=Column"),
        ]));
        f.render_widget(footer, rows[1]);
    }
}

impl PickerOverlay for TerminalPicker {
    fn present(&mut self, columns: Vec<PickerColumn>) {
        self.selected = vec![0; columns.len()];
        self.prev_selected = vec![None; columns.len()];
        self.columns = columns;
        self.focus = 0;
        self.visible = true;
    }

    fn replace_options(&mut self, column: ColumnName, options: Vec<PickerOption>) {
        if let Some(i) = self.column_index(column) {
            self.columns[i].options = options;
        }
    }

    fn reset_column_selection_cache(&mut self, column: ColumnName) {
        if let Some(i) = self.column_index(column) {
            self.prev_selected[i] = None;
        }
    }

    fn select_option(&mut self, column: ColumnName, index: usize) {
        if let Some(i) = self.column_index(column) {
            let last = self.columns[i].options.len().saturating_sub(1);
            self.selected[i] = index.min(last);
        }
    }

    fn refresh(&mut self) {
        for (i, column) in self.columns.iter().enumerate() {
            let last = column.options.len().saturating_sub(1);
            self.selected[i] = self.selected[i].min(last);
        }
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(value: i32, text: &str) -> PickerOption {
        PickerOption {
            value,
            text: text.to_string(),
        }
    }

    fn year_month_picker() -> TerminalPicker {
        let mut p = TerminalPicker::default();
        p.present(vec![
            PickerColumn {
                name: ColumnName::Year,
                options: vec![option(2024, "2024"), option(2025, "2025")],
            },
            PickerColumn {
                name: ColumnName::Month,
                options: vec![option(2, "March"), option(6, "July")],
            },
        ]);
        p
    }

    #[test]
    fn test_present_starts_on_first_options() {
        let p = year_month_picker();
        assert!(p.is_visible());
        let expected = PickerValues {
            year: Some(2024),
            month: Some(2),
        };
        assert_eq!(p.values(), expected);
    }

    #[test]
    fn test_move_selection_records_previous() {
        let mut p = year_month_picker();
        p.focus_next();
        assert!(p.move_selection(1));
        assert_eq!(p.selected(1), Some(1));
        assert_eq!(p.prev_selected(1), Some(0));
        assert!(!p.move_selection(1));
        assert_eq!(p.values().month, Some(6));
    }

    #[test]
    fn test_focus_wraps() {
        let mut p = year_month_picker();
        p.focus_prev();
        assert_eq!(p.focus(), 1);
        p.focus_next();
        assert_eq!(p.focus(), 0);
    }

    #[test]
    fn test_replace_keeps_stale_pointer_until_reset() {
        let mut p = year_month_picker();
        p.focus_next();
        p.move_selection(1);
        p.replace_options(ColumnName::Month, vec![option(0, "January")]);
        // cursor still points past the new list
        assert_eq!(p.values().month, None);
        assert_eq!(p.prev_selected(1), Some(0));

        p.reset_column_selection_cache(ColumnName::Month);
        p.select_option(ColumnName::Month, 0);
        p.refresh();
        assert_eq!(p.prev_selected(1), None);
        assert_eq!(p.selected(1), Some(0));
        assert_eq!(p.values().month, Some(0));
    }

    #[test]
    fn test_refresh_clamps_selection() {
        let mut p = year_month_picker();
        p.focus_next();
        p.move_selection(1);
        p.replace_options(ColumnName::Month, vec![option(0, "January")]);
        p.refresh();
        assert_eq!(p.selected(1), Some(0));
    }

    #[test]
    fn test_close_hides_and_clears() {
        let mut p = year_month_picker();
        p.close();
        assert!(!p.is_visible());
        assert!(p.columns().is_empty());
        assert_eq!(p.values(), PickerValues::default());
    }

    #[test]
    fn test_centered_rect_fits_small_area() {
        let r = centered_rect(36, 14, Rect::new(0, 0, 20, 10));
        assert_eq!(r, Rect::new(0, 0, 20, 10));
        let r = centered_rect(10, 4, Rect::new(0, 0, 20, 10));
        assert_eq!(r, Rect::new(5, 3, 10, 4));
    }
}
