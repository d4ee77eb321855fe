mod app;
mod config;
mod store;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::AppConfig;
use store::{CardDraft, CollectionStore, FileSlot, SavePolicy};

#[derive(Parser, Debug)]
#[command(name = "webcards")]
#[command(version = "0.1.0")]
#[command(about = "A terminal gallery of your favorite websites")]
struct Args {
    /// Print the collection as JSON
    #[arg(short, long)]
    list: bool,

    /// Add a website with this name (needs --url)
    #[arg(short, long, value_name = "NAME", requires = "url")]
    add: Option<String>,

    /// URL of the website to add
    #[arg(long, requires = "add")]
    url: Option<String>,

    /// Image URL of the website to add
    #[arg(long, requires = "add")]
    image: Option<String>,

    /// Description of the website to add
    #[arg(long, requires = "add")]
    description: Option<String>,

    /// Remove the website with this id
    #[arg(short, long, value_name = "ID")]
    remove: Option<u64>,

    /// Move the card at position FROM to position TO (0-based, as listed)
    #[arg(short, long = "move", num_args = 2, value_names = ["FROM", "TO"])]
    move_card: Option<Vec<usize>>,

    /// Remove every website (needs --yes)
    #[arg(long)]
    clear: bool,

    /// Confirm --clear
    #[arg(short, long)]
    yes: bool,

    /// Directory holding the collection file
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Alternate config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Args {
    fn is_command(&self) -> bool {
        self.list || self.add.is_some() || self.remove.is_some() || self.move_card.is_some() || self.clear
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The log file location depends on the config, so config loading reports to stderr
    let config = load_config(&args, io::stderr)?;

    // The TUI owns the terminal, so it logs to a file instead of stderr
    if args.is_command() {
        init_logging(None);
    } else {
        init_logging(Some(config.resolve_data_dir()?.join("webcards.log")));
    }

    // Handle CLI-only commands
    if args.is_command() {
        return run_command(&args, &config);
    }

    // Run TUI
    run_tui(&config)
}

/// `RUST_LOG` when set, otherwise `default`
fn env_filter(default: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
}

/// Load the config with its warnings going to `writer`
fn load_config<W>(args: &Args, writer: W) -> Result<AppConfig>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
        .with(env_filter("warn"));
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }
    Ok(config)
}

fn init_logging(log_file: Option<PathBuf>) {
    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .with(env_filter("warn"))
            .init();
        return;
    };

    match open_log(&path) {
        Ok(file) => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .with(env_filter("info"))
            .init(),
        // No log file: stay silent rather than draw over the UI
        Err(_) => tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::from_default_env())
            .init(),
    }
}

fn open_log(path: &Path) -> io::Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn open_store(config: &AppConfig) -> Result<CollectionStore> {
    let slot = FileSlot::new(config.resolve_data_dir()?);
    // One-shot commands write straight through
    Ok(CollectionStore::open(Box::new(slot), config.slot_key(), SavePolicy::Immediate))
}

fn run_command(args: &Args, config: &AppConfig) -> Result<()> {
    let mut store = open_store(config)?;

    if let store::LoadOrigin::Recovered { reason, backup } = store.origin() {
        eprintln!("warning: saved websites were unreadable ({}); using defaults", reason);
        if let Some(backup) = backup {
            eprintln!("warning: the unreadable file was kept at {}", backup);
        }
    }

    if args.list {
        println!("{}", serde_json::to_string_pretty(store.cards())?);
        return Ok(());
    }

    if let Some(name) = &args.add {
        let mut draft = CardDraft::new(name.as_str(), args.url.clone().unwrap_or_default());
        if let Some(image) = &args.image {
            draft = draft.with_image(image.as_str());
        }
        if let Some(description) = &args.description {
            draft = draft.with_description(description.as_str());
        }

        let card = store.insert(draft).context("Could not add website")?;
        println!("{}", serde_json::to_string_pretty(&card)?);
        maybe_notify(config, &format!("Added {}", card.name));
        return Ok(());
    }

    if let Some(id) = args.remove {
        let name = store.position(id).and_then(|i| store.get(i)).map(|c| c.name.clone());
        if store.delete(id).context("Could not remove website")? {
            let name = name.unwrap_or_default();
            println!("Removed '{}'", name);
            maybe_notify(config, &format!("Removed {}", name));
        } else {
            println!("No website with id {}", id);
        }
        return Ok(());
    }

    if let Some(positions) = &args.move_card {
        let (from, to) = match positions.as_slice() {
            [from, to] => (*from, *to),
            _ => anyhow::bail!("--move takes FROM and TO"),
        };
        if store.reorder(from, to).context("Could not move website")? {
            println!("Moved position {} to {}", from, to);
        } else {
            println!("Nothing to move (collection has {} websites)", store.len());
        }
        return Ok(());
    }

    if args.clear {
        if !args.yes {
            anyhow::bail!("Refusing to clear without --yes");
        }
        store.clear().context("Could not clear websites")?;
        println!("Cleared all websites");
        maybe_notify(config, "Cleared all websites");
    }

    Ok(())
}

fn run_tui(config: &AppConfig) -> Result<()> {
    // Create app state before touching the terminal
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Write anything still pending from a deferred save
    let flushed = app.shutdown().context("Could not save websites on exit");
    result.and(flushed)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| {
            app.set_viewport(f.area());
            ui::draw(f, app)
        })?;

        if event::poll(std::time::Duration::from_millis(100))? {
            let handled = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') if app.can_quit() => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    _ => app.handle_key(key),
                },
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => Ok(()),
            };

            // Report errors instead of tearing down the UI
            if let Err(e) = handled {
                app.status_message = Some(format!("Error: {}", e));
            }
        }

        app.tick();
    }
}

fn maybe_notify(config: &AppConfig, body: &str) {
    if !config.notifications {
        return;
    }
    if let Err(e) = notify("webcards", body) {
        tracing::warn!("Notification failed: {}", e);
    }
}

fn notify(summary: &str, body: &str) -> Result<()> {
    notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .icon("web-browser")
        .show()?;
    Ok(())
}
