use std::sync::Arc;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
  #[error("No feeds configured")]
  Empty,

  #[error("Feed {0} has no name")]
  MissingName(usize),

  #[error("Feed {index} ({name}) has no url")]
  MissingUrl { index: usize, name: String },

  #[error("Feed {index} has an invalid url `{url}`")]
  InvalidUrl { index: usize, url: String },
}

/// A named source of entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedDescriptor {
  pub name: String,
  pub url: String,
}

impl FeedDescriptor {
  pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
    Self { name: name.into(), url: url.into() }
  }
}

/// The ordered, read-only list of feeds the reader knows about.
///
/// A registry is validated when it is built: it is never empty and every
/// descriptor has a name and a parseable url. Clones share the same storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRegistry {
  feeds: Arc<[FeedDescriptor]>,
}

impl FeedRegistry {
  pub fn new(feeds: Vec<FeedDescriptor>) -> Result<Self, RegistryError> {
    if feeds.is_empty() {
      return Err(RegistryError::Empty);
    }

    for (index, feed) in feeds.iter().enumerate() {
      if feed.name.trim().is_empty() {
        return Err(RegistryError::MissingName(index));
      }
      if feed.url.trim().is_empty() {
        return Err(RegistryError::MissingUrl { index, name: feed.name.clone() });
      }
      if Url::parse(feed.url.trim()).is_err() {
        return Err(RegistryError::InvalidUrl { index, url: feed.url.clone() });
      }
    }

    Ok(Self { feeds: feeds.into() })
  }

  pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
    let feeds = config.feeds.iter().map(|feed| FeedDescriptor::new(feed.name.trim(), feed.url.trim())).collect();
    Self::new(feeds)
  }

  pub fn count(&self) -> usize {
    self.feeds.len()
  }

  pub fn get(&self, index: usize) -> Option<&FeedDescriptor> {
    self.feeds.get(index)
  }

  pub fn iter(&self) -> impl Iterator<Item = &FeedDescriptor> {
    self.feeds.iter()
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::config::FeedConfig;

  #[test]
  fn test_single_feed_registry() {
    let registry = FeedRegistry::new(vec![FeedDescriptor::new("A", "http://a")]).unwrap();
    assert_eq!(registry.count(), 1);
    assert_eq!(registry.get(0), Some(&FeedDescriptor::new("A", "http://a")));
    assert_eq!(registry.get(1), None);
  }

  #[test]
  fn test_empty_registry_is_rejected() {
    assert_eq!(FeedRegistry::new(Vec::new()), Err(RegistryError::Empty));
  }

  #[test]
  fn test_blank_fields_are_rejected() {
    let feeds = vec![FeedDescriptor::new("A", "http://a"), FeedDescriptor::new("  ", "http://b")];
    assert_eq!(FeedRegistry::new(feeds), Err(RegistryError::MissingName(1)));

    let feeds = vec![FeedDescriptor::new("A", "")];
    assert_eq!(FeedRegistry::new(feeds), Err(RegistryError::MissingUrl { index: 0, name: "A".to_string() }));
  }

  #[test]
  fn test_malformed_url_is_rejected() {
    let feeds = vec![FeedDescriptor::new("A", "not a url")];
    assert_eq!(FeedRegistry::new(feeds), Err(RegistryError::InvalidUrl { index: 0, url: "not a url".to_string() }));
  }

  #[test]
  fn test_default_feeds_are_well_formed() {
    let config = Config { feeds: crate::config::default_feeds(), ..Config::default() };
    let registry = FeedRegistry::from_config(&config).unwrap();
    assert!(registry.count() > 0);
    for feed in registry.iter() {
      assert!(!feed.url.is_empty());
      assert!(!feed.name.is_empty());
    }
  }

  #[test]
  fn test_from_config_trims_and_keeps_order() {
    let config = Config {
      feeds: vec![
        FeedConfig { name: " First ".to_string(), url: "https://example.com/one.xml".to_string() },
        FeedConfig { name: "Second".to_string(), url: " https://example.com/two.xml ".to_string() },
      ],
      ..Config::default()
    };
    let registry = FeedRegistry::from_config(&config).unwrap();
    let names: Vec<&str> = registry.iter().map(|feed| feed.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second"]);
    assert_eq!(registry.get(1).map(|feed| feed.url.as_str()), Some("https://example.com/two.xml"));
  }
}
