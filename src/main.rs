use clap::Parser;
use color_eyre::eyre::Result;
use feedreader::{
  app::App,
  cli::Cli,
  config::Config,
  feeds::FeedRegistry,
  loader::FeedLoader,
  utils::{initialize_logging, initialize_panic_handler},
};

async fn dump(index: usize) -> Result<()> {
  let config = Config::new()?;
  let loader = FeedLoader::new(FeedRegistry::from_config(&config)?, config.load_timeout())?;
  let loaded = loader.load(index).await?;
  println!("{}", serde_json::to_string_pretty(&loaded)?);
  Ok(())
}

fn list() -> Result<()> {
  let config = Config::new()?;
  let registry = FeedRegistry::from_config(&config)?;
  for (index, feed) in registry.iter().enumerate() {
    println!("{index}\t{}\t{}", feed.name, feed.url);
  }
  Ok(())
}

async fn tokio_main() -> Result<()> {
  initialize_logging()?;

  initialize_panic_handler()?;

  let args = Cli::parse();
  if args.list {
    return list();
  }
  if let Some(index) = args.dump {
    return dump(index).await;
  }

  let mut app = App::new(args.tick_rate, args.frame_rate)?;
  app.run().await?;

  Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
  if let Err(e) = tokio_main().await {
    eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
    Err(e)
  } else {
    Ok(())
  }
}
