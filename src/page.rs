use crate::{
  entry::{Entry, EntryCollection},
  loader::{FeedLoader, LoadError, LoadedFeed},
  menu::MenuState,
};

/// What the reader is showing: the menu state, the feed on screen and the
/// most recent load request.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct FeedPage {
  menu: MenuState,
  requested: Option<usize>,
  loading: bool,
  current: Option<LoadedFeed>,
}

impl FeedPage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn menu(&self) -> MenuState {
    self.menu
  }

  pub fn is_menu_hidden(&self) -> bool {
    self.menu.is_hidden()
  }

  pub fn toggle_menu(&mut self) -> MenuState {
    self.menu = self.menu.toggle();
    self.menu
  }

  /// Picking a feed from the menu closes it and starts a load.
  pub fn select_feed(&mut self, index: usize) {
    self.request(index);
    if !self.menu.is_hidden() {
      self.toggle_menu();
    }
  }

  pub fn request(&mut self, index: usize) {
    self.requested = Some(index);
    self.loading = true;
  }

  /// Stores `loaded` only if it answers the latest request. Results for
  /// anything requested earlier are dropped, whichever order they arrive in.
  pub fn commit(&mut self, loaded: LoadedFeed) -> bool {
    if self.requested.is_some_and(|index| index != loaded.index) {
      return false;
    }
    self.loading = false;
    self.current = Some(loaded);
    true
  }

  /// Returns whether `index` was the load still awaited.
  pub fn fail(&mut self, index: usize) -> bool {
    if self.loading && self.requested == Some(index) {
      self.loading = false;
      return true;
    }
    false
  }

  /// The feed being loaded, if a load is in flight.
  pub fn pending_index(&self) -> Option<usize> {
    self.requested.filter(|_| self.loading)
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn current(&self) -> Option<&LoadedFeed> {
    self.current.as_ref()
  }

  pub fn current_index(&self) -> Option<usize> {
    self.current.as_ref().map(|loaded| loaded.index)
  }

  pub fn title(&self) -> Option<&str> {
    self.current.as_ref().map(|loaded| loaded.feed.name.as_str())
  }

  pub fn entries(&self) -> &[Entry] {
    self.current.as_ref().map(|loaded| &loaded.entries[..]).unwrap_or_default()
  }

  pub async fn load(&mut self, loader: &FeedLoader, index: usize) -> Result<&EntryCollection, LoadError> {
    self.request(index);
    match loader.load(index).await {
      Ok(loaded) => {
        self.loading = false;
        Ok(&self.current.insert(loaded).entries)
      },
      Err(error) => {
        self.fail(index);
        Err(error)
      },
    }
  }
}
