use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use stackfall_engine::RenderFrame;

use super::style;

pub struct StatsDisplay<'a> {
    frame: &'a RenderFrame,
    block: Option<BlockWidget<'a>>,
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(fn(&RenderFrame) -> usize),
    LabelValue(&'static str, fn(&RenderFrame) -> usize),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(|frame| frame.score),
    Row::Empty,
    Row::LabelValue("LEVEL:", |frame| frame.level),
    Row::LabelValue("LINES:", |frame| frame.lines_cleared),
];

impl<'a> StatsDisplay<'a> {
    pub fn new(frame: &'a RenderFrame) -> Self {
        Self { frame, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        16 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::cells(ROWS.len()) + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        let style = style::DEFAULT;

        let row_areas = Layout::vertical(ROWS.iter().map(|_| Constraint::Length(1))).split(area);
        for (row, area) in ROWS.iter().zip(row_areas.iter()) {
            match *row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(*area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.frame).to_string(), style)
                        .right_aligned()
                        .render(*area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.frame).to_string(), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
