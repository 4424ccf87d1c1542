use std::{collections::HashMap, path::PathBuf, time::Duration};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use serde::{
  de::{self, Deserializer},
  Deserialize,
};

use crate::{action::Action, loader::DEFAULT_TIMEOUT, mode::Mode};

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub _data_dir: PathBuf,
  #[serde(default)]
  pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
  #[serde(default, flatten)]
  pub config: AppConfig,
  #[serde(default = "default_as_true")]
  pub confirm_quit: bool,
  #[serde(default = "default_load_timeout")]
  pub load_timeout_secs: u64,
  #[serde(default = "default_feeds")]
  pub feeds: Vec<FeedConfig>,
  #[serde(default)]
  pub keybindings: KeyBindings,
}

impl Config {
  pub fn new() -> Result<Self, config::ConfigError> {
    Self::load(crate::utils::get_config_dir(), crate::utils::get_data_dir())
  }

  pub fn load(config_dir: PathBuf, data_dir: PathBuf) -> Result<Self, config::ConfigError> {
    let default_config: Config = json5::from_str(CONFIG).map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let mut builder = config::Config::builder()
      .set_default("_data_dir", data_dir.to_string_lossy().as_ref())?
      .set_default("_config_dir", config_dir.to_string_lossy().as_ref())?;

    let config_files = [("config.toml", config::FileFormat::Toml), ("config.json5", config::FileFormat::Json5)];
    let mut found_config = false;
    for (file, format) in &config_files {
      builder = builder.add_source(config::File::from(config_dir.join(file)).format(*format).required(false));
      if config_dir.join(file).exists() {
        found_config = true
      }
    }
    if !found_config {
      log::warn!("No configuration file found in {}, using defaults", config_dir.display());
    }

    let mut cfg: Self = builder.build()?.try_deserialize()?;

    for (mode, default_bindings) in default_config.keybindings.iter() {
      let user_bindings = cfg.keybindings.entry(*mode).or_default();
      for (key, action) in default_bindings.iter() {
        user_bindings.entry(key.clone()).or_insert_with(|| action.clone());
      }
    }

    Ok(cfg)
  }

  pub fn load_timeout(&self) -> Duration {
    if self.load_timeout_secs == 0 {
      DEFAULT_TIMEOUT
    } else {
      Duration::from_secs(self.load_timeout_secs)
    }
  }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FeedConfig {
  pub name: String,
  #[serde(alias = "link")]
  pub url: String,
}

impl FeedConfig {
  fn new(name: &str, url: &str) -> Self {
    Self { name: name.to_string(), url: url.to_string() }
  }
}

pub fn default_feeds() -> Vec<FeedConfig> {
  vec![
    FeedConfig::new("Udacity Blog", "http://blog.udacity.com/feed"),
    FeedConfig::new("CSS Tricks", "http://feeds.feedburner.com/CssTricks"),
    FeedConfig::new("HTML5 Rocks", "http://feeds.feedburner.com/html5rocks"),
    FeedConfig::new("Linear Digressions", "http://feeds.feedburner.com/udacity-linear-digressions"),
  ]
}

const fn default_as_true() -> bool {
  true
}

const fn default_load_timeout() -> u64 {
  DEFAULT_TIMEOUT.as_secs()
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct KeyBindings(pub HashMap<Mode, HashMap<Vec<KeyEvent>, Action>>);

impl<'de> Deserialize<'de> for KeyBindings {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let parsed_map = HashMap::<Mode, HashMap<String, Action>>::deserialize(deserializer)?;

    let mut keybindings = HashMap::new();
    for (mode, inner_map) in parsed_map {
      let mut converted = HashMap::new();
      for (key_str, action) in inner_map {
        let keys = parse_key_sequence(&key_str).map_err(de::Error::custom)?;
        converted.insert(keys, action);
      }
      keybindings.insert(mode, converted);
    }

    Ok(KeyBindings(keybindings))
  }
}

fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
  let raw_lower = raw.to_ascii_lowercase();
  let (remaining, modifiers) = extract_modifiers(&raw_lower);
  parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
  let mut modifiers = KeyModifiers::empty();
  let mut current = raw;

  loop {
    match current {
      rest if rest.starts_with("ctrl-") => {
        modifiers.insert(KeyModifiers::CONTROL);
        current = &rest[5..];
      },
      rest if rest.starts_with("alt-") => {
        modifiers.insert(KeyModifiers::ALT);
        current = &rest[4..];
      },
      rest if rest.starts_with("shift-") => {
        modifiers.insert(KeyModifiers::SHIFT);
        current = &rest[6..];
      },
      _ => break,
    };
  }

  (current, modifiers)
}

fn parse_key_code_with_modifiers(raw: &str, mut modifiers: KeyModifiers) -> Result<KeyEvent, String> {
  let c = match raw {
    "esc" => KeyCode::Esc,
    "enter" => KeyCode::Enter,
    "left" => KeyCode::Left,
    "right" => KeyCode::Right,
    "up" => KeyCode::Up,
    "down" => KeyCode::Down,
    "home" => KeyCode::Home,
    "end" => KeyCode::End,
    "pageup" => KeyCode::PageUp,
    "pagedown" => KeyCode::PageDown,
    "backtab" => {
      modifiers.insert(KeyModifiers::SHIFT);
      KeyCode::BackTab
    },
    "backspace" => KeyCode::Backspace,
    "delete" => KeyCode::Delete,
    "insert" => KeyCode::Insert,
    "tab" => KeyCode::Tab,
    "space" => KeyCode::Char(' '),
    "hyphen" | "minus" => KeyCode::Char('-'),
    f if f.len() > 1 && f.starts_with('f') => match f[1..].parse::<u8>() {
      Ok(n @ 1..=12) => KeyCode::F(n),
      _ => return Err(format!("Unable to parse {raw}")),
    },
    c if c.chars().count() == 1 => {
      let mut c = c.chars().next().unwrap_or_default();
      if modifiers.contains(KeyModifiers::SHIFT) {
        c = c.to_ascii_uppercase();
      }
      KeyCode::Char(c)
    },
    _ => return Err(format!("Unable to parse {raw}")),
  };
  Ok(KeyEvent::new(c, modifiers))
}

pub fn parse_key_sequence(raw: &str) -> Result<Vec<KeyEvent>, String> {
  if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count() {
    return Err(format!("Unable to parse `{}`", raw));
  }
  let raw = if !raw.contains("><") {
    let raw = raw.strip_prefix('<').unwrap_or(raw);
    raw.strip_suffix('>').unwrap_or(raw)
  } else {
    raw
  };
  raw
    .split("><")
    .map(|seq| {
      if let Some(s) = seq.strip_prefix('<') {
        s
      } else if let Some(s) = seq.strip_suffix('>') {
        s
      } else {
        seq
      }
    })
    .map(parse_key_event)
    .collect()
}

#[cfg(test)]
mod tests {
  use std::fs;

  use pretty_assertions::assert_eq;

  use super::*;

  fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("feedreader-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
  }

  #[test]
  fn test_defaults_without_config_file() {
    let dir = scratch_dir("defaults");
    let c = Config::load(dir.clone(), dir.clone()).unwrap();

    assert!(c.confirm_quit);
    assert_eq!(c.load_timeout(), Duration::from_secs(10));
    assert_eq!(c.feeds.len(), 4);
    assert_eq!(c.feeds[0].name, "Udacity Blog");
    assert_eq!(c.config._config_dir, dir);
    assert_eq!(
      c.keybindings.get(&Mode::Entries).unwrap().get(&parse_key_sequence("<m>").unwrap()).unwrap(),
      &Action::ToggleMenu
    );
    assert_eq!(
      c.keybindings.get(&Mode::Menu).unwrap().get(&parse_key_sequence("<esc>").unwrap()).unwrap(),
      &Action::ToggleMenu
    );
  }

  #[test]
  fn test_user_config_overrides() {
    let dir = scratch_dir("user");
    fs::write(
      dir.join("config.toml"),
      r#"
confirm_quit = false
load_timeout_secs = 3

[[feeds]]
name = "Only"
link = "https://example.com/rss"

[keybindings.entries]
"<x>" = "Reload"
"<q>" = "Quit"
"#,
    )
    .unwrap();

    let c = Config::load(dir.clone(), dir).unwrap();
    assert!(!c.confirm_quit);
    assert_eq!(c.load_timeout(), Duration::from_secs(3));
    assert_eq!(c.feeds.len(), 1);
    assert_eq!(c.feeds[0].url, "https://example.com/rss");

    let entries = c.keybindings.get(&Mode::Entries).unwrap();
    assert_eq!(entries.get(&parse_key_sequence("<x>").unwrap()), Some(&Action::Reload));
    assert_eq!(entries.get(&parse_key_sequence("<q>").unwrap()), Some(&Action::Quit));
    assert_eq!(entries.get(&parse_key_sequence("<m>").unwrap()), Some(&Action::ToggleMenu));
  }

  #[test]
  fn test_simple_keys() {
    assert_eq!(parse_key_event("a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty()));
    assert_eq!(parse_key_event("enter").unwrap(), KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()));
    assert_eq!(parse_key_event("esc").unwrap(), KeyEvent::new(KeyCode::Esc, KeyModifiers::empty()));
    assert_eq!(parse_key_event("f5").unwrap(), KeyEvent::new(KeyCode::F(5), KeyModifiers::empty()));
  }

  #[test]
  fn test_with_modifiers() {
    assert_eq!(parse_key_event("ctrl-a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
    assert_eq!(parse_key_event("shift-m").unwrap(), KeyEvent::new(KeyCode::Char('M'), KeyModifiers::SHIFT));
    assert_eq!(
      parse_key_event("ctrl-alt-x").unwrap(),
      KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL | KeyModifiers::ALT)
    );
  }

  #[test]
  fn test_key_sequences() {
    assert_eq!(
      parse_key_sequence("<g><g>").unwrap(),
      vec![KeyEvent::new(KeyCode::Char('g'), KeyModifiers::empty()); 2]
    );
    assert!(parse_key_sequence("<g").is_err());
    assert!(parse_key_event("nope").is_err());
    assert!(parse_key_event("f13").is_err());
  }
}
