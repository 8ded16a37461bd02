use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use slidescope_core::search::SearchPhase;
use throbber_widgets_tui::Throbber;

use super::{App, Focus};

impl App<'_> {
	pub(crate) fn draw(&mut self, frame: &mut Frame<'_>) {
		let area = frame.area().inner(Margin {
			vertical: 0,
			horizontal: 1,
		});

		let layout = Layout::default()
			.direction(Direction::Vertical)
			.constraints([
				Constraint::Length(3),
				Constraint::Length(3),
				Constraint::Length(1),
				Constraint::Min(3),
			])
			.split(area);

		self.query_input
			.render(frame, layout[0], self.focus == Focus::Query);
		self.boundary_input
			.render(frame, layout[1], self.focus == Focus::Boundary);
		self.render_status(frame, layout[2]);
		self.render_overlay(frame, layout[3]);
	}

	fn render_status(&mut self, frame: &mut Frame<'_>, area: ratatui::layout::Rect) {
		match self.search.phase() {
			SearchPhase::Idle => {
				let hint = Paragraph::new("Enter searches · Tab switches fields · Esc quits")
					.style(Style::default().fg(Color::DarkGray));
				frame.render_widget(hint, area);
			}
			SearchPhase::Loading => {
				let throbber = Throbber::default().label("searching…");
				frame.render_stateful_widget(throbber, area, &mut self.throbber_state);
			}
			SearchPhase::Success => {
				let line = match self.search.record() {
					Some(record) => {
						let mut spans = vec![Span::raw(record.path.clone())];
						if let (Some(w), Some(h)) = (record.width, record.height) {
							spans.push(Span::styled(
								format!("  {w}×{h}"),
								Style::default().fg(Color::DarkGray),
							));
						}
						if let Some(description) = &record.description {
							spans.push(Span::styled(
								format!("  {description}"),
								Style::default().fg(Color::DarkGray),
							));
						}
						Line::from(spans)
					}
					None => Line::from("search finished"),
				};
				frame.render_widget(Paragraph::new(line), area);
			}
			SearchPhase::Failed(reason) => {
				let line = Paragraph::new(format!("search failed: {reason}"))
					.style(Style::default().fg(Color::Red));
				frame.render_widget(line, area);
			}
		}
	}

	fn render_overlay(&self, frame: &mut Frame<'_>, area: ratatui::layout::Rect) {
		let block = Block::default().borders(Borders::ALL).title("Overlay");

		let Some(overlay) = self.session.overlay() else {
			let placeholder = Paragraph::new("No image to display yet…")
				.alignment(Alignment::Center)
				.style(Style::default().fg(Color::DarkGray))
				.block(block);
			frame.render_widget(placeholder, area);
			return;
		};

		let (path, center) = &overlay.points;
		let vector = serde_json::to_string(&overlay.vector).unwrap_or_else(|_| "null".into());
		let lines = vec![
			Line::from(vec![
				Span::styled("image  ", Style::default().fg(Color::DarkGray)),
				Span::raw(overlay.image_url.clone()),
			]),
			Line::from(vec![
				Span::styled("point  ", Style::default().fg(Color::DarkGray)),
				Span::raw(format!("{path} @ ({}, {})", center.x, center.y)),
			]),
			Line::from(vec![
				Span::styled("vector ", Style::default().fg(Color::DarkGray)),
				Span::raw(vector),
			]),
		];

		frame.render_widget(Paragraph::new(lines).block(block), area);
	}
}
