use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
  layout::{Constraint, Layout},
  prelude::Rect,
};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
  action::Action,
  components::{
    entry_list::EntryList, feed_menu::FeedMenu, header::Header, info_bar::InfoBar, popup_quit::QuitPopup, Component,
  },
  config::Config,
  feeds::FeedRegistry,
  loader::FeedLoader,
  mode::Mode,
  page::FeedPage,
  tui::{self, Frame},
};

const MENU_WIDTH: u16 = 28;

pub struct App {
  pub config: Config,
  pub loader: FeedLoader,
  pub page: FeedPage,
  pub tick_rate: f64,
  pub frame_rate: f64,
  pub should_quit: bool,
  pub should_suspend: bool,
  pub mode: Mode,
  pub last_tick_key_events: Vec<KeyEvent>,
  header: Header,
  feed_menu: FeedMenu,
  entry_list: EntryList,
  info_bar: InfoBar,
  quit_popup: QuitPopup,
}

impl App {
  pub fn new(tick_rate: f64, frame_rate: f64) -> Result<Self> {
    let config = Config::new()?;
    Self::with_config(config, tick_rate, frame_rate)
  }

  pub fn with_config(config: Config, tick_rate: f64, frame_rate: f64) -> Result<Self> {
    let registry = FeedRegistry::from_config(&config)?;
    log::info!("{} feeds configured", registry.count());
    let loader = FeedLoader::new(registry.clone(), config.load_timeout())?;
    Ok(Self {
      tick_rate,
      frame_rate,
      should_quit: false,
      should_suspend: false,
      mode: Mode::default(),
      last_tick_key_events: Vec::new(),
      page: FeedPage::new(),
      header: Header::new(),
      feed_menu: FeedMenu::new(registry),
      entry_list: EntryList::new(),
      info_bar: InfoBar::new(),
      quit_popup: QuitPopup::new(),
      loader,
      config,
    })
  }

  fn components(&mut self) -> [&mut dyn Component; 5] {
    [&mut self.header, &mut self.feed_menu, &mut self.entry_list, &mut self.info_bar, &mut self.quit_popup]
  }

  pub fn register(&mut self, tx: &UnboundedSender<Action>) -> Result<()> {
    let config = self.config.clone();
    for component in self.components() {
      component.register_action_handler(tx.clone())?;
      component.register_config_handler(config.clone())?;
    }
    Ok(())
  }

  pub async fn run(&mut self) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();

    let mut tui = tui::Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate).mouse(true);
    tui.enter()?;

    self.register(&action_tx)?;
    let size = tui.size()?;
    for component in self.components() {
      component.init(size)?;
    }

    action_tx.send(Action::LoadFeed(0))?;

    loop {
      if let Some(e) = tui.next().await {
        match e {
          tui::Event::Quit => action_tx.send(Action::Quit)?,
          tui::Event::Tick => action_tx.send(Action::Tick)?,
          tui::Event::Render => action_tx.send(Action::Render)?,
          tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
          tui::Event::Key(key) => self.handle_key(key, &action_tx)?,
          _ => {},
        }
        for component in self.components() {
          if let Some(action) = component.handle_events(Some(e.clone()))? {
            action_tx.send(action)?;
          }
        }
      }

      while let Ok(action) = action_rx.try_recv() {
        match action {
          Action::Resize(w, h) => {
            tui.resize(Rect::new(0, 0, w, h))?;
            self.draw(&mut tui, &action_tx)?;
          },
          Action::Render => self.draw(&mut tui, &action_tx)?,
          _ => {},
        }
        self.dispatch(action, &action_tx)?;
      }

      if self.should_suspend {
        tui.suspend()?;
        action_tx.send(Action::Resume)?;
        tui = tui::Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate).mouse(true);
        tui.enter()?;
      } else if self.should_quit {
        tui.stop()?;
        break;
      }
    }
    tui.exit()?;
    Ok(())
  }

  /// Applies `action` to the page and passes it on to every component.
  pub fn dispatch(&mut self, action: Action, tx: &UnboundedSender<Action>) -> Result<()> {
    if action != Action::Tick && action != Action::Render {
      log::debug!("{action:?}");
    }
    match action {
      Action::Tick => {
        self.last_tick_key_events.drain(..);
      },
      Action::Quit => self.should_quit = true,
      Action::Suspend => self.should_suspend = true,
      Action::Resume => self.should_suspend = false,
      Action::ToggleMenu => {
        self.page.toggle_menu();
        self.announce_menu(tx)?;
      },
      Action::SelectFeed(index) => {
        let was_hidden = self.page.is_menu_hidden();
        self.page.select_feed(index);
        if !was_hidden {
          self.announce_menu(tx)?;
        }
        tx.send(Action::LoadFeed(index))?;
      },
      Action::LoadFeed(index) => {
        self.page.request(index);
        self.loader.spawn(index, tx.clone());
      },
      Action::Reload => {
        let index = self.page.pending_index().or(self.page.current_index()).unwrap_or(0);
        tx.send(Action::LoadFeed(index))?;
      },
      Action::FeedLoaded(ref loaded) => {
        if !self.page.commit(loaded.clone()) {
          log::info!("Dropping stale result for feed {}", loaded.index);
          return Ok(());
        }
      },
      Action::LoadFailed(index, ref message) => {
        if !self.page.fail(index) {
          log::info!("Dropping stale failure for feed {index}: {message}");
          return Ok(());
        }
      },
      Action::Error(ref message) => log::error!("{message}"),
      _ => {},
    }
    for component in self.components() {
      if let Some(action) = component.update(action.clone())? {
        tx.send(action)?
      };
    }
    Ok(())
  }

  fn announce_menu(&mut self, tx: &UnboundedSender<Action>) -> Result<()> {
    let menu = self.page.menu();
    self.mode = menu.into();
    tx.send(Action::MenuChanged(menu))?;
    tx.send(Action::ModeChange(self.mode))?;
    Ok(())
  }

  fn handle_key(&mut self, key: KeyEvent, tx: &UnboundedSender<Action>) -> Result<()> {
    if self.quit_popup.is_shown() {
      return Ok(());
    }
    if let Some(keymap) = self.config.keybindings.get(&self.mode) {
      if let Some(action) = keymap.get(&vec![key]) {
        log::info!("Got action: {action:?}");
        tx.send(action.clone())?;
      } else {
        // If the key was not handled as a single key action,
        // then consider it for multi-key combinations.
        self.last_tick_key_events.push(key);

        if let Some(action) = keymap.get(&self.last_tick_key_events) {
          log::info!("Got action: {action:?}");
          tx.send(action.clone())?;
        }
      }
    }
    Ok(())
  }

  fn draw(&mut self, tui: &mut tui::Tui, tx: &UnboundedSender<Action>) -> Result<()> {
    let mut result = Ok(());
    tui.draw(|f| result = self.render(f))?;
    if let Err(e) = result {
      tx.send(Action::Error(format!("Failed to draw: {:?}", e)))?;
    }
    Ok(())
  }

  fn render(&mut self, f: &mut Frame<'_>) -> Result<()> {
    let layout = Layout::vertical([Constraint::Length(1), Constraint::Fill(1), Constraint::Length(1)]).split(f.size());

    self.header.draw(f, layout[0])?;
    if self.page.is_menu_hidden() {
      self.feed_menu.draw(f, Rect::default())?;
      self.entry_list.draw(f, layout[1])?;
    } else {
      let body = Layout::horizontal([Constraint::Length(MENU_WIDTH), Constraint::Fill(1)]).split(layout[1]);
      self.feed_menu.draw(f, body[0])?;
      self.entry_list.draw(f, body[1])?;
    }
    self.info_bar.draw(f, layout[2])?;
    self.quit_popup.draw(f, f.size())?;
    Ok(())
  }
}
