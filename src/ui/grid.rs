//! Card grid geometry, shared by rendering and mouse hit-testing.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const CARD_WIDTH: u16 = 32;
pub const CARD_HEIGHT: u16 = 8;

/// Split the whole screen into header, status line, grid and footer
pub fn screen_chunks(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title + subtitle
            Constraint::Length(1), // Status line
            Constraint::Min(3),    // Cards
            Constraint::Length(1), // Footer
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub area: Rect,
    pub columns: usize,
    pub visible_rows: usize,
    /// First card row on screen (scrolls so the selection stays visible)
    pub first_row: usize,
}

impl Grid {
    pub fn new(area: Rect, selected: usize) -> Self {
        let columns = (area.width / CARD_WIDTH).max(1) as usize;
        let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
        let selected_row = selected / columns;
        let first_row = (selected_row + 1).saturating_sub(visible_rows);
        Self {
            area,
            columns,
            visible_rows,
            first_row,
        }
    }

    /// Screen rect of every visible card, in collection order
    pub fn slots(&self, count: usize) -> Vec<(usize, Rect)> {
        let width = (self.area.width / self.columns as u16).max(1);
        let start = self.first_row * self.columns;
        let end = count.min(start + self.visible_rows * self.columns);

        (start..end)
            .map(|index| {
                let col = (index % self.columns) as u16;
                let row = (index / self.columns - self.first_row) as u16;
                let rect = Rect {
                    x: self.area.x + col * width,
                    y: self.area.y + row * CARD_HEIGHT,
                    width,
                    height: CARD_HEIGHT.min(self.area.height),
                };
                (index, rect.intersection(self.area))
            })
            .collect()
    }

    /// Index of the card under the terminal cell (`column`, `row`)
    pub fn card_at(&self, count: usize, column: u16, row: u16) -> Option<usize> {
        self.slots(count)
            .into_iter()
            .find(|(_, r)| column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height)
            .map(|(index, _)| index)
    }
}
