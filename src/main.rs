use std::{error::Error, io, path::PathBuf, sync::Arc};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use retype::{
    acquire::{Acquired, Acquirer, HttpSource, Source},
    config::{Config, ConfigStore, FileConfigStore, Overrides, StrategyKind},
    extract::normalize_whitespace,
    logging, run_app,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    samples, App,
};

/// typing practice on text pulled from web pages, files or built-in passages
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Practice typing against real prose: fetch a web page and type its main text, load a .txt file, or start with a bundled passage. Live error rate, speed and per-character counts update as you type."
)]
pub struct Cli {
    /// web page to fetch and practice on
    #[clap(short = 'u', long, conflicts_with_all = ["file", "text"])]
    url: Option<String>,

    /// .txt file to practice on
    #[clap(short = 'f', long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// practice on this text directly
    #[clap(short = 't', long)]
    text: Option<String>,

    /// relay to route page fetches through (the page address is passed as `?url=`)
    #[clap(long)]
    relay: Option<String>,

    /// characters shown on each side of the cursor
    #[clap(short = 'w', long)]
    window: Option<usize>,

    /// node depth searched for the main content of a page
    #[clap(long)]
    depth: Option<usize>,

    /// how the main content of a page is found
    #[clap(long, value_enum)]
    strategy: Option<StrategyKind>,

    /// element used by the container strategy
    #[clap(long)]
    container_tag: Option<String>,

    /// tracing filter directive for the log file, e.g. `debug` or `retype=trace`
    #[clap(long)]
    log_level: Option<String>,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            window_size: self.window,
            search_depth: self.depth,
            strategy: self.strategy,
            container_tag: self.container_tag.clone(),
            relay_url: self.relay.clone(),
        }
    }

    /// The text shown before any fetch or file load finishes.
    fn initial_text(&self) -> Option<Acquired> {
        match &self.text {
            Some(text) => {
                let text = normalize_whitespace(text);
                (!text.is_empty()).then_some(Acquired {
                    source: Source::Inline,
                    text,
                })
            }
            None => samples::random_passage().map(Acquired::from),
        }
    }
}

/// Stored config with the command line applied on top, saved back on request.
fn settings(cli: &Cli, store: &FileConfigStore) -> io::Result<Config> {
    let mut config = store.load();
    config.apply(cli.overrides());
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "settings saved");
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !io::stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // before the config is read, so its load is traced too
    if let Err(err) = logging::init(cli.log_level.as_deref()) {
        eprintln!("logging disabled: {err}");
    }
    let config = settings(&cli, &FileConfigStore::new())?;
    info!(?config, "starting");

    let Some(initial) = cli.initial_text() else {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, "no text to practice on")
            .exit();
    };

    let source = HttpSource::new(config.relay_url.clone())?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let acquirer = Acquirer::new(
        Arc::new(source),
        config.extraction_strategy(),
        runner.sender(),
    );
    let mut app = App::new(initial, acquirer, config.display_window());
    if let Some(url) = &cli.url {
        app.request_address(url);
    }
    if let Some(path) = &cli.file {
        app.request_file(path);
    }

    let result = run_app(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["retype"]);
        assert_eq!(cli.url, None);
        assert_eq!(cli.file, None);
        assert_eq!(cli.text, None);
        assert!(!cli.save_config);

        let overrides = cli.overrides();
        assert_eq!(overrides.window_size, None);
        assert_eq!(overrides.strategy, None);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "retype",
            "-w",
            "20",
            "--depth",
            "4",
            "--strategy",
            "container",
            "--container-tag",
            "main",
            "--relay",
            "http://localhost:8080/fetch",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.window_size, Some(20));
        assert_eq!(overrides.search_depth, Some(4));
        assert_eq!(overrides.strategy, Some(StrategyKind::Container));
        assert_eq!(overrides.container_tag.as_deref(), Some("main"));
        assert_eq!(
            overrides.relay_url.as_deref(),
            Some("http://localhost:8080/fetch")
        );
    }

    #[test]
    fn test_cli_sources_conflict() {
        assert!(Cli::try_parse_from(["retype", "-u", "a.org", "-f", "b.txt"]).is_err());
        assert!(Cli::try_parse_from(["retype", "-f", "b.txt", "-t", "hi"]).is_err());
        assert!(Cli::try_parse_from(["retype", "-u", "a.org"]).is_ok());
    }

    #[test]
    fn test_initial_text_from_flag_is_normalized() {
        let cli = Cli::parse_from(["retype", "--text", "  two\n words "]);
        let initial = cli.initial_text().unwrap();
        assert_eq!(initial.text, "two words");
        assert_eq!(initial.source, Source::Inline);

        let blank = Cli::parse_from(["retype", "--text", "   "]);
        assert_eq!(blank.initial_text(), None);
    }

    #[test]
    fn test_initial_text_defaults_to_sample() {
        let cli = Cli::parse_from(["retype"]);
        let initial = cli.initial_text().unwrap();
        assert!(matches!(initial.source, Source::Sample(_)));
        assert!(!initial.text.is_empty());
    }

    #[test]
    fn test_settings_are_logged_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("retype.log");
        logging::init_at(&log, Some("debug")).unwrap();

        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();
        let store = FileConfigStore::with_path(&path);
        let cli = Cli::parse_from(["retype", "-w", "12", "--save-config"]);

        let config = settings(&cli, &store).unwrap();
        assert_eq!(config.window_size, 12);
        assert_eq!(store.load(), config);

        let logged = std::fs::read_to_string(&log).unwrap();
        assert!(logged.contains("ignoring unreadable config"));
        assert!(logged.contains("settings saved"));
    }
}
