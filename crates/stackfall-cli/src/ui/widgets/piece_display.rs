use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use stackfall_engine::{BlockKind, Cell};

use super::BlockDisplay;

/// Rows reserved for a piece preview; every spawn shape fits in two.
const PREVIEW_ROWS: u16 = 2;
const PREVIEW_COLS: u16 = 4;

/// A single block kind in its spawn orientation, with empty rows trimmed.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    kind: Option<BlockKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            kind: None,
            block: None,
        }
    }

    pub fn kind(self, kind: BlockKind) -> Self {
        Self {
            kind: Some(kind),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        PREVIEW_COLS * BlockDisplay::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        PREVIEW_ROWS * BlockDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Occupancy of the non-empty rows of `kind`'s spawn shape.
fn preview_rows(kind: BlockKind) -> Vec<Vec<bool>> {
    kind.spawn_shape()
        .rows()
        .filter(|row| row.iter().any(|occupied| *occupied))
        .map(<[bool]>::to_vec)
        .collect()
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let empty = BlockDisplay::from_cell(Cell::Empty, false);
        let Some(kind) = self.kind else {
            Widget::render(&empty, area, buf);
            return;
        };

        let rows = preview_rows(kind);
        let width = rows.first().map_or(0, Vec::len);
        let piece_area = area.centered(
            Constraint::Length(super::cells(width) * BlockDisplay::WIDTH),
            Constraint::Length(super::cells(rows.len()) * BlockDisplay::HEIGHT),
        );

        let horizontal =
            Layout::horizontal((0..width).map(|_| Constraint::Length(BlockDisplay::WIDTH)))
                .flex(Flex::Center);
        let vertical =
            Layout::vertical((0..rows.len()).map(|_| Constraint::Length(BlockDisplay::HEIGHT)));

        let occupied = BlockDisplay::from_cell(Cell::solid(kind), false);
        for (grid_row, row) in piece_area.layout_vec(&vertical).into_iter().zip(&rows) {
            for (grid_cell, is_occupied) in grid_row.layout_vec(&horizontal).into_iter().zip(row) {
                let block = if *is_occupied { &occupied } else { &empty };
                Widget::render(block, grid_cell, buf);
            }
        }
    }
}
