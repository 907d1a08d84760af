use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    card_display::*, deck_display::*, game_display::*, key_binding_display::*,
    prompt_display::*, score_display::*,
};

mod card_display;
mod deck_display;
mod game_display;
mod key_binding_display;
mod prompt_display;
mod score_display;

mod color {
    use ratatui::style::Color;

    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(63, 63, 63);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Modifier, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const HIDDEN_CARD: Style = fg_bg(color::GRAY, color::DARK_GRAY);
    pub const CURSOR: Style = Style::new().fg(color::YELLOW);
    pub const CHANGED: Style = Style::new().add_modifier(Modifier::BOLD);
    pub const PROMPT: Style = fg_bg(color::BLACK, color::YELLOW);
    pub const WON: Style = fg_bg(color::BLACK, color::GREEN);
    pub const FINISHED: Style = fg_bg(color::WHITE, color::RED);

    /// Black or white, whichever is readable on `bg`.
    pub fn text_on(bg: (u8, u8, u8)) -> Color {
        let (r, g, b) = bg;
        let luma = u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114;
        if luma >= 128_000 {
            color::BLACK
        } else {
            color::WHITE
        }
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
