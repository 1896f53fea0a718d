use std::iter;

use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use stackfall_engine::BlockKind;

use super::PieceDisplay;

/// The upcoming queue, next piece on top.
#[derive(Debug)]
pub struct UpcomingDisplay<'a> {
    kinds: Vec<BlockKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> UpcomingDisplay<'a> {
    /// `upcoming` is in queue order: newest first, next to spawn last.
    pub fn new<I>(upcoming: I) -> Self
    where
        I: IntoIterator<Item = BlockKind>,
        I::IntoIter: DoubleEndedIterator,
    {
        Self {
            kinds: upcoming.into_iter().rev().collect(),
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        PieceDisplay::new().width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        let count = super::cells(self.kinds.len());
        let spacing = count.saturating_sub(1);
        PieceDisplay::new().height() * count
            + spacing
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for UpcomingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &UpcomingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        let piece_height = PieceDisplay::new().height();
        let layout = Layout::vertical(self.kinds.iter().map(|_| Constraint::Length(piece_height)))
            .flex(Flex::SpaceBetween);

        for (cell, kind) in iter::zip(area.layout_vec(&layout), &self.kinds) {
            PieceDisplay::new().kind(*kind).render(cell, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use BlockKind::*;

    use super::*;

    #[test]
    fn test_next_piece_first() {
        let display = UpcomingDisplay::new([I, J, L]);
        assert_eq!(display.kinds, vec![L, J, I]);
        assert_eq!(display.height(), 8);
    }
}
