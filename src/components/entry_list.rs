use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
  layout::{Margin, Rect},
  prelude::{Color, Line, Modifier, Style, Text},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
};

use super::Component;
use crate::{action::Action, entry::EntryCollection, mode::Mode};

/// The `.feed` container: entries of the feed on screen.
#[derive(Default)]
pub struct EntryList {
  mode: Mode,
  entries: Option<EntryCollection>,
  error: Option<String>,
  state: ListState,
  scrollbar_state: ScrollbarState,
}

impl EntryList {
  pub fn new() -> Self {
    Self {
      mode: Mode::default(),
      entries: None,
      error: None,
      state: ListState::default().with_selected(Some(0)),
      scrollbar_state: ScrollbarState::default(),
    }
  }

  pub fn selected(&self) -> Option<usize> {
    self.state.selected()
  }

  fn next(&mut self, len: usize) {
    let selected_idx = self.state.selected().unwrap_or(0);
    self.state.select(Some((selected_idx + 1) % len));
  }

  fn previous(&mut self, len: usize) {
    let selected_idx = self.state.selected().unwrap_or(0);
    if selected_idx == 0 {
      self.state.select(Some(len - 1));
    } else {
      self.state.select(Some(selected_idx - 1));
    }
  }

  fn len(&self) -> usize {
    self.entries.as_ref().map_or(0, |entries| entries.len())
  }
}

impl Component for EntryList {
  fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    let len = self.len();
    if self.mode != Mode::Entries || len == 0 {
      return Ok(None);
    }
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.next(len),
      KeyCode::Char('k') | KeyCode::Up => self.previous(len),
      KeyCode::Char('g') | KeyCode::Home => self.state.select(Some(0)),
      KeyCode::Char('G') | KeyCode::End => self.state.select(Some(len - 1)),
      _ => {},
    }
    Ok(None)
  }

  fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
    let len = self.len();
    if self.mode != Mode::Entries || len == 0 {
      return Ok(None);
    }
    match mouse.kind {
      MouseEventKind::ScrollDown => self.next(len),
      MouseEventKind::ScrollUp => self.previous(len),
      _ => {},
    }
    Ok(None)
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::ModeChange(mode) => {
        self.mode = mode;
      },
      Action::FeedLoaded(loaded) => {
        self.entries = Some(loaded.entries);
        self.error = None;
        self.state.select(Some(0));
      },
      Action::LoadFailed(_, message) => {
        self.error = Some(message);
      },
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut crate::tui::Frame<'_>, area: Rect) -> Result<()> {
    if let Some(message) = &self.error {
      if self.entries.is_none() {
        let paragraph = Paragraph::new(Line::styled(message.as_str(), Style::default().fg(Color::Red)))
          .block(Block::default().borders(Borders::ALL))
          .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return Ok(());
      }
    }

    let Some(entries) = &self.entries else {
      let block = Block::new().borders(Borders::ALL).title("Loading…");
      f.render_widget(block, area);
      return Ok(());
    };

    let title_style = Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD);
    let snippet_style = Style::default().fg(Color::Gray);
    let selected_title_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let items: Vec<ListItem> = entries
      .iter()
      .enumerate()
      .map(|(i, entry)| {
        let style = if self.state.selected() == Some(i) { selected_title_style } else { title_style };
        let mut lines = vec![Line::styled(entry.title.as_str(), style)];
        if let Some(date) = entry.pub_date {
          lines.push(Line::styled(date.format("%e %b %Y").to_string(), snippet_style));
        }
        lines.push(Line::styled(entry.snippet.as_str(), snippet_style));
        ListItem::new(Text::from(lines))
      })
      .collect();

    let list = List::new(items)
      .block(Block::default().borders(Borders::ALL))
      .highlight_symbol("┃")
      .repeat_highlight_symbol(true)
      .scroll_padding(1);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
      .begin_symbol(None)
      .end_symbol(None)
      .track_symbol(None)
      .thumb_symbol("▌");

    self.scrollbar_state = ScrollbarState::new(list.len()).position(self.state.selected().unwrap_or(0));

    f.render_stateful_widget(list, area, &mut self.state);
    f.render_stateful_widget(scrollbar, area.inner(&Margin { vertical: 1, horizontal: 0 }), &mut self.scrollbar_state);

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use crossterm::event::KeyModifiers;

  use super::*;
  use crate::{entry::Entry, feeds::FeedDescriptor, loader::LoadedFeed};

  fn loaded(titles: &[&str]) -> LoadedFeed {
    LoadedFeed {
      index: 0,
      feed: FeedDescriptor::new("A", "http://a"),
      channel_title: "A".to_string(),
      entries: EntryCollection::new(
        titles.iter().map(|title| Entry { title: title.to_string(), ..Entry::default() }).collect(),
      ),
    }
  }

  fn press(list: &mut EntryList, code: KeyCode) {
    list.handle_key_events(KeyEvent::new(code, KeyModifiers::empty())).unwrap();
  }

  #[test]
  fn test_navigation_wraps() {
    let mut list = EntryList::new();
    list.update(Action::FeedLoaded(loaded(&["one", "two", "three"]))).unwrap();

    press(&mut list, KeyCode::Char('k'));
    assert_eq!(list.selected(), Some(2));
    press(&mut list, KeyCode::Char('j'));
    assert_eq!(list.selected(), Some(0));
  }

  #[test]
  fn test_keys_ignored_while_menu_open() {
    let mut list = EntryList::new();
    list.update(Action::FeedLoaded(loaded(&["one", "two"]))).unwrap();
    list.update(Action::ModeChange(Mode::Menu)).unwrap();

    press(&mut list, KeyCode::Char('j'));
    assert_eq!(list.selected(), Some(0));
  }

  #[test]
  fn test_new_feed_resets_selection() {
    let mut list = EntryList::new();
    list.update(Action::FeedLoaded(loaded(&["one", "two"]))).unwrap();
    press(&mut list, KeyCode::Char('j'));
    list.update(Action::FeedLoaded(loaded(&["three", "four"]))).unwrap();
    assert_eq!(list.selected(), Some(0));
  }
}
