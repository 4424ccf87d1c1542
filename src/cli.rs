use clap::Parser;

use crate::utils::version;

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
  #[arg(short, long, value_name = "FLOAT", help = "Tick rate, i.e. number of ticks per second", default_value_t = 1.0)]
  pub tick_rate: f64,

  #[arg(short, long, value_name = "FLOAT", help = "Frame rate, i.e. number of frames per second", default_value_t = 4.0)]
  pub frame_rate: f64,

  #[arg(short, long, help = "Print the configured feeds and exit")]
  pub list: bool,

  #[arg(short, long, value_name = "INDEX", help = "Load one feed and print its entries as JSON")]
  pub dump: Option<usize>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let cli = Cli::try_parse_from(["feedreader"]).unwrap();
    assert_eq!(cli.tick_rate, 1.0);
    assert_eq!(cli.frame_rate, 4.0);
    assert!(!cli.list);
    assert_eq!(cli.dump, None);
  }

  #[test]
  fn test_dump_takes_an_index() {
    let cli = Cli::try_parse_from(["feedreader", "--dump", "3"]).unwrap();
    assert_eq!(cli.dump, Some(3));
    assert!(Cli::try_parse_from(["feedreader", "--dump", "three"]).is_err());
  }
}
