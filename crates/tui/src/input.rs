//! Single-line text input backed by [`tui_textarea`].

use ratatui::Frame;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};
use tui_textarea::TextArea;

/// Single-line editable field with a titled border.
pub struct QueryInput<'a> {
	textarea: TextArea<'a>,
	title: &'a str,
}

impl<'a> QueryInput<'a> {
	/// Create an input primed with initial text.
	#[must_use]
	pub fn new(title: &'a str, initial: String, placeholder: &'a str) -> Self {
		let mut textarea = TextArea::new(vec![initial]);
		textarea.set_cursor_line_style(Style::default());
		textarea.set_placeholder_text(placeholder);
		textarea.move_cursor(tui_textarea::CursorMove::End);
		Self { textarea, title }
	}

	/// Current text, exactly as typed.
	#[must_use]
	pub fn text(&self) -> &str {
		self.textarea.lines().first().map_or("", String::as_str)
	}

	/// Feed a key event into the field. Returns `true` when the text
	/// changed. Enter is ignored to keep the field single-line; callers
	/// handle submission themselves.
	pub fn input(&mut self, key: KeyEvent) -> bool {
		if key.code == KeyCode::Enter {
			return false;
		}
		self.textarea.input(key)
	}

	/// Render the field, highlighting the border when focused.
	pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect, focused: bool) {
		let border_style = if focused {
			Style::default().fg(Color::Cyan)
		} else {
			Style::default().fg(Color::DarkGray)
		};
		self.textarea.set_block(
			Block::default()
				.borders(Borders::ALL)
				.border_style(border_style)
				.title(self.title),
		);
		self.textarea.set_cursor_style(if focused {
			Style::default().add_modifier(ratatui::style::Modifier::REVERSED)
		} else {
			Style::default()
		});
		frame.render_widget(&self.textarea, area);
	}
}
