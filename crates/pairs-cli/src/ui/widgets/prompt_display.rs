use ratatui::{
    layout::Constraint,
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Paragraph, Widget, Wrap},
};

/// A popup drawn over the deck: the replay question, the size input or the
/// final result.
#[derive(Debug)]
pub struct PromptDisplay<'a> {
    title: &'a str,
    lines: Vec<Line<'a>>,
    style: Style,
}

impl<'a> PromptDisplay<'a> {
    const WIDTH: u16 = 44;

    pub fn new(title: &'a str, style: Style) -> Self {
        Self {
            title,
            lines: vec![],
            style,
        }
    }

    pub fn line<L>(mut self, line: L) -> Self
    where
        L: Into<Line<'a>>,
    {
        self.lines.push(line.into());
        self
    }

    fn height(&self, width: u16) -> u16 {
        let inner_width = usize::from(width.saturating_sub(4).max(1));
        let text_height = self
            .lines
            .iter()
            .map(|line| line.width().max(1).div_ceil(inner_width))
            .sum::<usize>();
        u16::try_from(text_height).unwrap_or(u16::MAX).saturating_add(4)
    }
}

impl Widget for PromptDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let width = Self::WIDTH.min(area.width);
        let height = self.height(width).min(area.height);
        let area = area.centered(Constraint::Length(width), Constraint::Length(height));

        let block = Block::bordered()
            .title(Line::from(self.title).centered())
            .padding(Padding::uniform(1))
            .style(self.style);
        Clear.render(area, buf);
        Paragraph::new(Text::from(self.lines))
            .centered()
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}
