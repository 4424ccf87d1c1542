use std::ops::Deref;

use chrono::{DateTime, Utc};
use rss::{Channel, Item};
use scraper::Html;
use serde::{Deserialize, Serialize};

pub const SNIPPET_LEN: usize = 120;

#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
  pub title: String,
  pub link: String,
  pub snippet: String,
  pub pub_date: Option<DateTime<Utc>>,
}

impl Entry {
  /// Returns `None` for items that carry neither a title nor a link.
  pub fn from_item(item: &Item) -> Option<Self> {
    let title = item.title().unwrap_or_default().trim().to_string();
    let link = item.link().unwrap_or_default().trim().to_string();
    if title.is_empty() && link.is_empty() {
      return None;
    }

    let body = item.description().or(item.content()).unwrap_or_default();
    let pub_date = item
      .pub_date()
      .and_then(|date| DateTime::parse_from_rfc2822(date.trim()).ok())
      .map(|date| date.with_timezone(&Utc));

    Some(Self { title, link, snippet: snippet(body), pub_date })
  }
}

/// The entries of one loaded feed, in channel order.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryCollection {
  entries: Vec<Entry>,
}

impl EntryCollection {
  pub fn new(entries: Vec<Entry>) -> Self {
    Self { entries }
  }

  pub fn from_channel(channel: &Channel) -> Self {
    Self { entries: channel.items().iter().filter_map(Entry::from_item).collect() }
  }

  pub fn titles(&self) -> Vec<&str> {
    self.entries.iter().map(|entry| entry.title.as_str()).collect()
  }
}

impl Deref for EntryCollection {
  type Target = [Entry];

  fn deref(&self) -> &Self::Target {
    &self.entries
  }
}

/// Plain text preview of an HTML fragment.
pub fn snippet(html: &str) -> String {
  let fragment = Html::parse_fragment(html);
  let text = fragment.root_element().text().collect::<String>();
  let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

  if text.chars().count() <= SNIPPET_LEN {
    return text;
  }
  let cut: String = text.chars().take(SNIPPET_LEN).collect();
  format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use rss::ItemBuilder;

  use super::*;

  #[test]
  fn test_snippet_strips_markup() {
    assert_eq!(snippet("<p>Hello <b>there</b>,\n  <a href=\"x\">reader</a></p>"), "Hello there, reader");
  }

  #[test]
  fn test_snippet_truncates_long_text() {
    let long = "word ".repeat(60);
    let short = snippet(&long);
    assert!(short.ends_with('…'));
    assert!(short.chars().count() <= SNIPPET_LEN + 1);
  }

  #[test]
  fn test_entry_from_item() {
    let item = ItemBuilder::default()
      .title(Some(" Release notes ".to_string()))
      .link(Some("https://example.com/release".to_string()))
      .description(Some("<p>All the <em>new</em> things</p>".to_string()))
      .pub_date(Some("Tue, 10 Jun 2003 04:00:00 GMT".to_string()))
      .build();

    let entry = Entry::from_item(&item).unwrap();
    assert_eq!(entry.title, "Release notes");
    assert_eq!(entry.link, "https://example.com/release");
    assert_eq!(entry.snippet, "All the new things");
    assert_eq!(entry.pub_date.map(|date| date.to_rfc3339()), Some("2003-06-10T04:00:00+00:00".to_string()));
  }

  #[test]
  fn test_entry_with_bad_date_keeps_the_rest() {
    let item = ItemBuilder::default().title(Some("Post".to_string())).pub_date(Some("yesterday".to_string())).build();
    let entry = Entry::from_item(&item).unwrap();
    assert_eq!(entry.title, "Post");
    assert_eq!(entry.pub_date, None);
  }

  #[test]
  fn test_items_without_title_or_link_are_dropped() {
    let item = ItemBuilder::default().description(Some("orphan".to_string())).build();
    assert_eq!(Entry::from_item(&item), None);
  }

  #[test]
  fn test_collection_from_channel_keeps_order() {
    let xml = r#"<?xml version="1.0"?>
      <rss version="2.0"><channel><title>T</title><link>http://t</link><description>d</description>
        <item><title>one</title></item>
        <item><description>skipped</description></item>
        <item><title>two</title></item>
      </channel></rss>"#;
    let channel = Channel::read_from(xml.as_bytes()).unwrap();
    let entries = EntryCollection::from_channel(&channel);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries.titles(), vec!["one", "two"]);
  }
}
