use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Text},
  widgets::{Block, BorderType, List, ListItem, ListState},
};
use tokio::sync::mpsc::UnboundedSender;

use super::hit;
use crate::{action::Action, components::Component, feeds::FeedRegistry, menu::MenuState, tui::Frame};

/// The slide-in list of every configured feed.
pub struct FeedMenu {
  command_tx: Option<UnboundedSender<Action>>,
  registry: FeedRegistry,
  menu: MenuState,
  current: Option<usize>,
  state: ListState,
  area: Rect,
}

impl FeedMenu {
  pub fn new(registry: FeedRegistry) -> Self {
    Self {
      command_tx: None,
      registry,
      menu: MenuState::default(),
      current: None,
      state: ListState::default().with_selected(Some(0)),
      area: Rect::default(),
    }
  }

  fn choose(&mut self, index: usize) -> color_eyre::Result<()> {
    if let Some(tx) = &self.command_tx {
      tx.send(Action::SelectFeed(index))?;
    }
    Ok(())
  }
}

impl Component for FeedMenu {
  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> color_eyre::Result<()> {
    self.command_tx = Some(tx);
    Ok(())
  }

  fn handle_key_events(&mut self, key: KeyEvent) -> color_eyre::Result<Option<Action>> {
    if self.menu.is_hidden() {
      return Ok(None);
    }
    let count = self.registry.count();
    let selected_idx = self.state.selected().unwrap_or(0);
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.state.select(Some((selected_idx + 1) % count));
      },
      KeyCode::Char('k') | KeyCode::Up => {
        if selected_idx == 0 {
          self.state.select(Some(count - 1));
        } else {
          self.state.select(Some(selected_idx - 1));
        }
      },
      KeyCode::Char('l') | KeyCode::Enter => self.choose(selected_idx)?,
      _ => {},
    }
    Ok(None)
  }

  fn handle_mouse_events(&mut self, mouse: MouseEvent) -> color_eyre::Result<Option<Action>> {
    if self.menu.is_hidden() {
      return Ok(None);
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
      let inner = self.area.inner(&ratatui::layout::Margin { vertical: 1, horizontal: 1 });
      if hit(inner, mouse.column, mouse.row) {
        let index = (mouse.row - inner.y) as usize + self.state.offset();
        if index < self.registry.count() {
          self.state.select(Some(index));
          self.choose(index)?;
        }
      }
    }
    Ok(None)
  }

  fn update(&mut self, action: Action) -> color_eyre::Result<Option<Action>> {
    match action {
      Action::MenuChanged(menu) => {
        self.menu = menu;
        if !menu.is_hidden() {
          self.state.select(Some(self.current.unwrap_or(0)));
        }
      },
      Action::FeedLoaded(loaded) => {
        self.current = Some(loaded.index);
      },
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> color_eyre::Result<()> {
    self.area = area;
    if self.menu.is_hidden() {
      return Ok(());
    }

    let name_style = Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD);
    let current_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let items: Vec<ListItem> = self
      .registry
      .iter()
      .enumerate()
      .map(|(i, feed)| {
        let style = if self.current == Some(i) { current_style } else { name_style };
        ListItem::new(Text::from(Line::styled(feed.name.as_str(), style)))
      })
      .collect();

    let list = List::new(items)
      .block(Block::bordered().border_type(BorderType::Rounded).title("Feeds"))
      .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
      .highlight_symbol("┃");

    f.render_stateful_widget(list, area, &mut self.state);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use crossterm::event::KeyModifiers;
  use tokio::sync::mpsc;

  use super::*;
  use crate::feeds::FeedDescriptor;

  fn menu() -> FeedMenu {
    let registry = FeedRegistry::new(vec![
      FeedDescriptor::new("A", "http://a"),
      FeedDescriptor::new("B", "http://b"),
      FeedDescriptor::new("C", "http://c"),
    ])
    .unwrap();
    FeedMenu::new(registry)
  }

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
  }

  #[test]
  fn test_hidden_menu_ignores_keys() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut menu = menu();
    menu.register_action_handler(tx).unwrap();

    menu.handle_key_events(key(KeyCode::Enter)).unwrap();
    assert!(rx.try_recv().is_err());
  }

  #[test]
  fn test_enter_selects_highlighted_feed() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut menu = menu();
    menu.register_action_handler(tx).unwrap();
    menu.update(Action::MenuChanged(MenuState::Visible)).unwrap();

    menu.handle_key_events(key(KeyCode::Char('k'))).unwrap();
    menu.handle_key_events(key(KeyCode::Enter)).unwrap();
    assert_eq!(rx.try_recv().unwrap(), Action::SelectFeed(2));
  }
}
