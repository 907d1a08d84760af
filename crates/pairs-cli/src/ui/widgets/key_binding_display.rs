use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt, Paragraph, Widget, Wrap},
};

/// Keys that trigger an action, and a short description of the action.
pub type KeyBinding<'a> = (&'a [&'a str], &'a str);

/// One-line help listing the keys available in the current phase.
///
/// Wraps onto more lines when the terminal is too narrow.
#[derive(Debug)]
pub struct KeyBindingDisplay<'a> {
    bindings: &'a [KeyBinding<'a>],
    block: Option<BlockWidget<'a>>,
}

impl<'a> KeyBindingDisplay<'a> {
    pub fn new(bindings: &'a [KeyBinding<'a>]) -> Self {
        Self {
            bindings,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn spans(&self) -> Vec<Span<'a>> {
        self.bindings
            .iter()
            .copied()
            .enumerate()
            .flat_map(|(i, (keys, desc))| {
                let separator = (i > 0).then(|| Span::styled(" | ", ITEM_SEPARATOR_STYLE));
                let keys = keys.iter().copied().enumerate().flat_map(|(i, key)| {
                    [
                        (i > 0).then(|| Span::styled("/", KEY_SEPARATOR_STYLE)),
                        Some(Span::styled(key, KEY_STYLE)),
                    ]
                });
                separator
                    .into_iter()
                    .chain(keys.flatten())
                    .chain([Span::from(" "), Span::styled(desc, DESCRIPTION_STYLE)])
            })
            .collect()
    }
}

const KEY_STYLE: Style = Style::new().fg(Color::Cyan);
const KEY_SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);
const DESCRIPTION_STYLE: Style = Style::new().fg(Color::White);
const ITEM_SEPARATOR_STYLE: Style = Style::new().fg(Color::DarkGray);

impl Widget for KeyBindingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        Paragraph::new(Line::from(self.spans()))
            .centered()
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
