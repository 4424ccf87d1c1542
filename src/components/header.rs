use color_eyre::eyre::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
  Frame,
};

use super::{hit, Component};
use crate::{action::Action, menu::MenuState};

const MENU_ICON: &str = " ≡ ";

/// Top line: the menu icon and the name of the feed on screen.
#[derive(Default)]
pub struct Header {
  title: Option<String>,
  loading: bool,
  menu: MenuState,
  icon_area: Rect,
}

impl Header {
  pub fn new() -> Self {
    Self::default()
  }
}

impl Component for Header {
  fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
    match mouse.kind {
      MouseEventKind::Down(MouseButton::Left) if hit(self.icon_area, mouse.column, mouse.row) => {
        Ok(Some(Action::ToggleMenu))
      },
      _ => Ok(None),
    }
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::LoadFeed(_) => self.loading = true,
      Action::FeedLoaded(loaded) => {
        self.title = Some(loaded.feed.name);
        self.loading = false;
      },
      Action::LoadFailed(..) => self.loading = false,
      Action::MenuChanged(menu) => self.menu = menu,
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let chunks = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Length(MENU_ICON.chars().count() as u16), Constraint::Fill(1)])
      .split(area);
    self.icon_area = chunks[0];

    let icon_style = if self.menu.is_hidden() {
      Style::default().fg(Color::Gray)
    } else {
      Style::default().fg(Color::Black).bg(Color::Cyan)
    };
    f.render_widget(Paragraph::new(MENU_ICON).style(icon_style), chunks[0]);

    let title_style = Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD);
    let mut spans = vec![Span::styled(self.title.clone().unwrap_or_else(|| "Feeds".to_string()), title_style)];
    if self.loading {
      spans.push(Span::styled("  loading…", Style::default().fg(Color::Gray)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), chunks[1]);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use crossterm::event::KeyModifiers;
  use ratatui::{backend::TestBackend, Terminal};

  use super::*;

  fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, modifiers: KeyModifiers::empty() }
  }

  #[test]
  fn test_clicking_the_icon_toggles_the_menu() {
    let mut header = Header::new();
    let mut terminal = Terminal::new(TestBackend::new(40, 1)).unwrap();
    terminal.draw(|f| header.draw(f, f.size()).unwrap()).unwrap();

    assert_eq!(header.handle_mouse_events(click(1, 0)).unwrap(), Some(Action::ToggleMenu));
    assert_eq!(header.handle_mouse_events(click(20, 0)).unwrap(), None);
  }
}
