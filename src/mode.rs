use serde::{Deserialize, Serialize};

use crate::menu::MenuState;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  #[default]
  Entries,
  Menu,
}

impl From<MenuState> for Mode {
  fn from(menu: MenuState) -> Self {
    match menu {
      MenuState::Hidden => Mode::Entries,
      MenuState::Visible => Mode::Menu,
    }
  }
}
