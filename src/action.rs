use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{loader::LoadedFeed, menu::MenuState, mode::Mode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum Action {
  Tick,
  Render,
  Resize(u16, u16),
  Suspend,
  Resume,
  ConfirmQuit,
  Quit,
  ToggleMenu,
  MenuChanged(MenuState),
  ModeChange(Mode),
  SelectFeed(usize),
  LoadFeed(usize),
  Reload,
  FeedLoaded(LoadedFeed),
  LoadFailed(usize, String),
  Error(String),
}
