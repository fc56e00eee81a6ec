use std::io;
use std::path::Path;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use tracing::{info, warn};

use crate::acquire::{Acquired, Acquirer, Source};
use crate::error::AcquireError;
use crate::runtime::{AppEvent, AppEventSource, Runner, Ticker};
use crate::samples;
use crate::session::TypingSession;
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Typing,
    /// Editing a web address to fetch
    Address,
    /// Editing a path to a .txt file
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyOrder {
    FirstSeen,
    Count,
}

impl FrequencyOrder {
    pub fn toggled(self) -> Self {
        match self {
            FrequencyOrder::FirstSeen => FrequencyOrder::Count,
            FrequencyOrder::Count => FrequencyOrder::FirstSeen,
        }
    }
}

/// What the status line reports about the current text
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Ready {
        source: Source,
        at: DateTime<Local>,
    },
    Loading {
        what: String,
        since: DateTime<Local>,
    },
    Failed {
        message: String,
        at: DateTime<Local>,
    },
}

pub struct App {
    pub session: TypingSession,
    pub mode: Mode,
    pub prompt: String,
    pub status: Status,
    pub frequency_order: FrequencyOrder,
    pub window: usize,
    pub should_quit: bool,
    acquirer: Acquirer,
}

impl App {
    pub fn new(initial: Acquired, acquirer: Acquirer, window: usize) -> Self {
        Self {
            session: TypingSession::new(&initial.text),
            mode: Mode::Typing,
            prompt: String::new(),
            status: Status::Ready {
                source: initial.source,
                at: Local::now(),
            },
            frequency_order: FrequencyOrder::FirstSeen,
            window,
            should_quit: false,
            acquirer,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.acquirer.is_pending()
    }

    /// Frequency table rows in the selected order
    pub fn frequency_rows(&self) -> Vec<(char, usize)> {
        let frequency = self.session.frequency();
        match self.frequency_order {
            FrequencyOrder::FirstSeen => frequency.entries().to_vec(),
            FrequencyOrder::Count => frequency.by_count(),
        }
    }

    /// Handle one event; returns whether the screen needs a redraw.
    pub fn on_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Key(key) => {
                self.on_key(key);
                true
            }
            AppEvent::Resize => true,
            AppEvent::Tick => self.is_loading(),
            AppEvent::Acquired { seq, result } => self.on_acquired(seq, result),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.mode {
            Mode::Typing => self.on_typing_key(key, ctrl),
            Mode::Address | Mode::File => self.on_prompt_key(key),
        }
    }

    fn on_typing_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') if ctrl => self.session.reset(),
            KeyCode::Char('n') if ctrl => self.load_sample(),
            KeyCode::Char('u') if ctrl => self.open_prompt(Mode::Address),
            KeyCode::Char('o') if ctrl => self.open_prompt(Mode::File),
            KeyCode::Char('s') if ctrl => self.frequency_order = self.frequency_order.toggled(),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => {
                self.session.push_char(c);
            }
            KeyCode::Enter => {
                self.session.push_char('\n');
            }
            KeyCode::Backspace => {
                self.session.backspace();
            }
            KeyCode::Tab => {
                self.session.skip(self.window);
            }
            _ => {}
        }
    }

    fn on_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Typing,
            KeyCode::Enter => {
                let entered = std::mem::take(&mut self.prompt);
                let mode = std::mem::replace(&mut self.mode, Mode::Typing);
                match mode {
                    Mode::Address => self.request_address(&entered),
                    Mode::File => self.request_file(Path::new(entered.trim())),
                    Mode::Typing => {}
                }
            }
            KeyCode::Backspace => {
                self.prompt.pop();
            }
            KeyCode::Char(c) => self.prompt.push(c),
            _ => {}
        }
    }

    fn open_prompt(&mut self, mode: Mode) {
        self.prompt.clear();
        self.mode = mode;
    }

    pub fn request_address(&mut self, address: &str) {
        let address = address.trim();
        if address.is_empty() {
            self.fail(AcquireError::fetch("no address given"));
            return;
        }
        self.acquirer.fetch(address);
        self.status = Status::Loading {
            what: address.to_string(),
            since: Local::now(),
        };
    }

    pub fn request_file(&mut self, path: &Path) {
        if path.as_os_str().is_empty() {
            self.fail(AcquireError::read("no file given"));
            return;
        }
        self.acquirer.load_file(path);
        self.status = Status::Loading {
            what: path.display().to_string(),
            since: Local::now(),
        };
    }

    /// Swap to a random bundled passage right away.
    pub fn load_sample(&mut self) {
        let Some(passage) = samples::random_passage_except(&self.session.target()) else {
            return;
        };
        self.acquirer.supersede();
        self.apply(passage.into());
    }

    fn on_acquired(&mut self, seq: u64, result: Result<Acquired, AcquireError>) -> bool {
        if !self.acquirer.accept(seq) {
            return false;
        }
        match result {
            Ok(acquired) => self.apply(acquired),
            Err(err) => self.fail(err),
        }
        true
    }

    fn apply(&mut self, acquired: Acquired) {
        info!(
            source = %acquired.source,
            chars = acquired.text.chars().count(),
            "new practice text"
        );
        self.session.replace_target(&acquired.text);
        self.status = Status::Ready {
            source: acquired.source,
            at: Local::now(),
        };
    }

    // The current text stays; only the stats display is cleared.
    fn fail(&mut self, err: AcquireError) {
        warn!(%err, "acquisition failed");
        self.session.reset();
        self.status = Status::Failed {
            message: err.to_string(),
            at: Local::now(),
        };
    }
}

/// Draw, then keep handling events until the user quits.
pub fn run_app<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> io::Result<()> {
    terminal.draw(|f| ui::draw(app, f))?;
    while !app.should_quit {
        let event = runner.step();
        if app.on_event(event) {
            terminal.draw(|f| ui::draw(app, f))?;
        }
    }
    Ok(())
}
