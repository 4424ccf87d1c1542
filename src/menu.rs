use serde::{Deserialize, Serialize};

/// Visibility of the feed menu.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuState {
  #[default]
  Hidden,
  Visible,
}

impl MenuState {
  #[must_use]
  pub fn toggle(self) -> Self {
    match self {
      MenuState::Hidden => MenuState::Visible,
      MenuState::Visible => MenuState::Hidden,
    }
  }

  pub fn is_hidden(self) -> bool {
    self == MenuState::Hidden
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_menu_starts_hidden() {
    assert!(MenuState::default().is_hidden());
  }

  #[test]
  fn test_toggle_round_trip() {
    let shown = MenuState::default().toggle();
    assert_eq!(shown, MenuState::Visible);
    assert_eq!(shown.toggle(), MenuState::Hidden);
  }
}
