use super::Outputter;
use anstyle::{AnsiColor, Style};
use highlight_core::{Token, TokenType};
use std::collections::HashMap;
use std::io::{self, Write};

fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(color.into()))
}

/// Colours tokens by type for an ANSI terminal
///
/// Types without a style are drawn in the error style. With colour turned
/// off only the token values are written.
pub struct TermOutput<'w> {
    writer: &'w mut dyn Write,
    styles: HashMap<TokenType, Style>,
    fallback: Style,
    color: bool,
}

impl<'w> TermOutput<'w> {
    pub fn new(writer: &'w mut dyn Write, color: bool) -> Self {
        let styles = HashMap::from([
            (TokenType::ERROR, fg(AnsiColor::Red).bold()),
            (TokenType::COMMENT, fg(AnsiColor::White).dimmed()),
            (TokenType::TEXT, fg(AnsiColor::BrightWhite)),
            (TokenType::NUMBER, fg(AnsiColor::BrightMagenta)),
            (TokenType::STRING, fg(AnsiColor::BrightGreen)),
            (TokenType::ATTRIBUTE, fg(AnsiColor::Green).bold()),
            (TokenType::ASSIGNMENT, fg(AnsiColor::Yellow).dimmed()),
            (TokenType::OPERATOR, fg(AnsiColor::Green)),
            (TokenType::PUNCTUATION, fg(AnsiColor::Yellow)),
            (TokenType::LITERAL, fg(AnsiColor::Blue).bold()),
            (TokenType::TAG, fg(AnsiColor::BrightYellow)),
            (TokenType::WHITESPACE, fg(AnsiColor::White)),
        ]);
        Self {
            writer,
            styles,
            fallback: fg(AnsiColor::Red).bold(),
            color,
        }
    }

    pub fn with_style(mut self, token_type: TokenType, style: Style) -> Self {
        self.styles.insert(token_type, style);
        self
    }

    pub fn style_for(&self, token_type: &TokenType) -> Style {
        self.styles.get(token_type).copied().unwrap_or(self.fallback)
    }
}

impl Outputter for TermOutput<'_> {
    fn emit(&mut self, token: &Token) -> io::Result<()> {
        if token.value.is_empty() {
            return Ok(());
        }
        if !self.color {
            return self.writer.write_all(token.value.as_bytes());
        }
        let style = self.style_for(&token.token_type);
        write!(
            self.writer,
            "{}{}{}",
            style.render(),
            token.value,
            style.render_reset()
        )
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
