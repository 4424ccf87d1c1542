use clap::crate_version;
use ratatui::{
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Style},
  widgets::Paragraph,
};

use crate::{action::Action, components::Component, tui::Frame};

#[derive(Default)]
pub struct InfoBar {
  status: Option<String>,
  failed: bool,
}

impl InfoBar {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn status(&self) -> Option<&str> {
    self.status.as_deref()
  }
}

impl Component for InfoBar {
  fn update(&mut self, action: Action) -> color_eyre::Result<Option<Action>> {
    match action {
      Action::LoadFeed(index) => {
        self.status = Some(format!("Loading feed {}…", index + 1));
        self.failed = false;
      },
      Action::FeedLoaded(loaded) => {
        self.status = Some(format!("{} entries from {}", loaded.entries.len(), loaded.channel_title));
        self.failed = false;
      },
      Action::LoadFailed(_, message) | Action::Error(message) => {
        self.status = Some(message);
        self.failed = true;
      },
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> color_eyre::Result<()> {
    let chunks = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Fill(1), Constraint::Length(24)])
      .split(area);

    if let Some(status) = &self.status {
      let style = if self.failed { Style::default().fg(Color::Red) } else { Style::default().fg(Color::Gray) };
      f.render_widget(Paragraph::new(status.as_str()).style(style), chunks[0]);
    }

    let paragraph = Paragraph::new("Feedreader ".to_string() + crate_version!()).right_aligned();
    f.render_widget(paragraph, chunks[1]);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_failure_replaces_loading_status() {
    let mut bar = InfoBar::new();
    bar.update(Action::LoadFeed(0)).unwrap();
    assert_eq!(bar.status(), Some("Loading feed 1…"));

    bar.update(Action::LoadFailed(0, "Timed out loading http://a".to_string())).unwrap();
    assert_eq!(bar.status(), Some("Timed out loading http://a"));
  }
}
