use anyhow::Result;
use bible_lookup::{DataLoader, Locale, Message, Navigator, Shape};
use clap::Parser;
use log::{info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

mod app;
mod config;
mod handler;
mod tui;
mod ui;

use app::App;
use config::Config;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "bible")]
#[command(about = "Look up a Bible verse and step through the text")]
struct Cli {
    /// Data directory, JSON file or HTTP base URL
    #[arg(short, long)]
    source: Option<String>,
    /// Layout of the data set (detected when omitted)
    #[arg(long, value_enum)]
    shape: Option<Shape>,
    /// Language for messages and labels
    #[arg(short, long, value_enum)]
    locale: Option<Locale>,
    /// Verses of context shown on each side of the current verse
    #[arg(short, long)]
    radius: Option<usize>,
    /// Where to write the debug log
    #[arg(long, default_value = "bible-lookup.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // File logger, the terminal belongs to the UI
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    if let Ok(log_file) = File::create(&cli.log_file) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring unreadable config: {}", e);
        Config::default()
    });

    let source = cli.source.unwrap_or_else(|| config.source().to_string());
    let locale = cli.locale.unwrap_or(config.locale());
    let radius = cli.radius.unwrap_or(config.context_radius());
    info!("Starting with source {} (locale {:?}, radius {})", source, locale, radius);

    let mut loader = DataLoader::new(&source, cli.shape.or(config.shape))?;
    info!("Reading book list from {}", loader.entry());
    let bible = match loader.load().await {
        Ok(bible) => bible,
        Err(e) => {
            warn!("{}", e);
            eprintln!("{}", Message::for_error(&e).text(locale));
            return Err(e.into());
        }
    };

    let mut app = App::new(Navigator::new(bible), locale, radius);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let result = run(&mut terminal, &mut app, &mut events, &loader).await;

    tui::restore()?;
    result
}

async fn run(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
    loader: &DataLoader,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        // Deferred loads run after the loading message is on screen; input
        // that arrives meanwhile is dropped.
        if app.is_loading() {
            app.run_pending(loader).await;
            let dropped = events.discard_pending();
            if dropped > 0 {
                info!("Dropped {} events received while loading", dropped);
            }
            continue;
        }

        if app.should_quit {
            break;
        }

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }

    Ok(())
}
