use std::time::Duration;

use reqwest::{Client, StatusCode};
use rss::Channel;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};

use crate::{
  action::Action,
  entry::EntryCollection,
  feeds::{FeedDescriptor, FeedRegistry},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum LoadError {
  #[error("No feed at index {index}, {count} feeds configured")]
  UnknownFeed { index: usize, count: usize },

  #[error("Timed out loading {0}")]
  Timeout(String),

  #[error("{url} responded with {status}")]
  Status { url: String, status: StatusCode },

  #[error("Network error: {0}")]
  Network(#[from] reqwest::Error),

  #[error("RSS error: {0}")]
  Rss(#[from] rss::Error),

  #[error("{0} has no entries")]
  NoEntries(String),
}

/// A feed whose entries are ready to display. `entries` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedFeed {
  pub index: usize,
  pub feed: FeedDescriptor,
  pub channel_title: String,
  pub entries: EntryCollection,
}

#[derive(Debug, Clone)]
pub struct FeedLoader {
  client: Client,
  registry: FeedRegistry,
  timeout: Duration,
}

impl FeedLoader {
  pub fn new(registry: FeedRegistry, timeout: Duration) -> Result<Self, LoadError> {
    let client = Client::builder().user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))).build()?;
    Ok(Self { client, registry, timeout })
  }

  pub fn registry(&self) -> &FeedRegistry {
    &self.registry
  }

  pub async fn load(&self, index: usize) -> Result<LoadedFeed, LoadError> {
    let feed = self
      .registry
      .get(index)
      .ok_or(LoadError::UnknownFeed { index, count: self.registry.count() })?
      .clone();
    log::info!("Loading feed {index}: {}", feed.url);

    let body = tokio::time::timeout(self.timeout, self.fetch(&feed.url))
      .await
      .map_err(|_| LoadError::Timeout(feed.url.clone()))??;

    let channel = Channel::read_from(&body[..])?;
    let entries = EntryCollection::from_channel(&channel);
    if entries.is_empty() {
      return Err(LoadError::NoEntries(feed.url));
    }
    log::info!("Loaded {} entries from {}", entries.len(), feed.name);

    Ok(LoadedFeed { index, feed, channel_title: channel.title().to_string(), entries })
  }

  /// Loads in the background and reports back with exactly one
  /// `FeedLoaded` or `LoadFailed` action.
  pub fn spawn(&self, index: usize, tx: UnboundedSender<Action>) -> JoinHandle<()> {
    let loader = self.clone();
    tokio::spawn(async move {
      let action = match loader.load(index).await {
        Ok(feed) => Action::FeedLoaded(feed),
        Err(error) => {
          log::error!("Failed to load feed {index}: {error:?}");
          Action::LoadFailed(index, error.to_string())
        },
      };
      if tx.send(action).is_err() {
        log::debug!("Dropped result for feed {index}, receiver closed");
      }
    })
  }

  async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
    let response = self.client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(LoadError::Status { url: url.to_string(), status });
    }
    Ok(response.bytes().await?.to_vec())
  }
}
