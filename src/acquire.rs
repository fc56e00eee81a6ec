//! Getting new practice text from the web or from disk without blocking the
//! typing loop.
//!
//! Each request gets a sequence number from an [`AcquisitionGate`]. Workers
//! run on their own threads and post [`AppEvent::Acquired`] back into the
//! event channel; only the result of the most recently issued request is
//! applied, so a slow earlier fetch can never overwrite a newer text.

use std::fmt;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use tracing::{debug, error, info, warn};

use crate::error::{AcquireError, Result};
use crate::extract::{extract_html, normalize_file_text, ExtractionStrategy};
use crate::runtime::AppEvent;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Where a practice text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Web(String),
    File(PathBuf),
    Sample(String),
    Inline,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Web(address) => write!(f, "{address}"),
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Sample(name) => write!(f, "sample: {name}"),
            Source::Inline => write!(f, "command line text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquired {
    pub source: Source,
    pub text: String,
}

/// Hands out request sequence numbers and decides which results still count.
#[derive(Debug, Default)]
pub struct AcquisitionGate {
    latest: u64,
    in_flight: Option<u64>,
}

impl AcquisitionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request; every earlier one becomes stale.
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.in_flight = Some(self.latest);
        self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True when `seq` is the latest request. Accepting it settles the
    /// in-flight state.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq != self.latest {
            return false;
        }
        self.in_flight = None;
        true
    }
}

/// Returns raw page markup for an address.
pub trait DocumentSource: Send + Sync + 'static {
    fn fetch(&self, address: &str) -> Result<String>;
}

/// Fetches pages over HTTP, either directly or through a relay that takes the
/// target address as its `url` query parameter.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    relay: Option<String>,
}

impl HttpSource {
    pub fn new(relay: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, relay })
    }

    pub fn request_url(&self, address: &str) -> Result<Url> {
        match &self.relay {
            Some(relay) => {
                let mut url = Url::parse(relay)
                    .map_err(|e| AcquireError::fetch(format!("invalid relay {relay}: {e}")))?;
                url.query_pairs_mut().append_pair("url", address);
                Ok(url)
            }
            None => Url::parse(address)
                .map_err(|e| AcquireError::fetch(format!("invalid address {address}: {e}"))),
        }
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self, address: &str) -> Result<String> {
        let url = self.request_url(address)?;
        debug!(%url, "fetching");
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(AcquireError::fetch(format!("HTTP {status}")));
        }
        Ok(response.text()?)
    }
}

/// Fetch `address` and pull its practice text.
pub fn fetch_document(
    source: &dyn DocumentSource,
    address: &str,
    strategy: &ExtractionStrategy,
) -> Result<Acquired> {
    let address = address.trim();
    if address.is_empty() {
        return Err(AcquireError::fetch("no address given"));
    }
    let markup = source.fetch(address)?;
    let text = extract_html(&markup, strategy)?;
    Ok(Acquired {
        source: Source::Web(address.to_string()),
        text,
    })
}

pub fn is_text_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(".txt"))
        .unwrap_or(false)
}

/// Read a `.txt` file and normalize it into practice text.
pub fn load_text_file(path: &Path) -> Result<Acquired> {
    if !is_text_file(path) {
        return Err(AcquireError::UnsupportedFile {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path)?;
    let raw = String::from_utf8(bytes).map_err(|_| AcquireError::read("file is not valid UTF-8"))?;
    let text = normalize_file_text(&raw)?;
    Ok(Acquired {
        source: Source::File(path.to_path_buf()),
        text,
    })
}

/// Runs acquisitions in the background and gates their results.
pub struct Acquirer {
    gate: AcquisitionGate,
    source: Arc<dyn DocumentSource>,
    strategy: ExtractionStrategy,
    events: Sender<AppEvent>,
}

impl Acquirer {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        strategy: ExtractionStrategy,
        events: Sender<AppEvent>,
    ) -> Self {
        Self {
            gate: AcquisitionGate::new(),
            source,
            strategy,
            events,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.gate.is_pending()
    }

    pub fn fetch(&mut self, address: &str) -> u64 {
        let seq = self.gate.issue();
        info!(seq, address, "fetch issued");
        let source = Arc::clone(&self.source);
        let strategy = self.strategy.clone();
        let address = address.to_string();
        self.spawn(seq, move || fetch_document(source.as_ref(), &address, &strategy));
        seq
    }

    pub fn load_file(&mut self, path: &Path) -> u64 {
        let seq = self.gate.issue();
        info!(seq, path = %path.display(), "file load issued");
        let path = path.to_path_buf();
        self.spawn(seq, move || load_text_file(&path));
        seq
    }

    /// A text chosen synchronously (e.g. a bundled sample) wins over
    /// anything still in flight.
    pub fn supersede(&mut self) -> u64 {
        let seq = self.gate.issue();
        self.gate.accept(seq);
        debug!(seq, "in-flight requests superseded");
        seq
    }

    /// Whether the result tagged `seq` should be applied.
    pub fn accept(&mut self, seq: u64) -> bool {
        let current = self.gate.accept(seq);
        if !current {
            warn!(seq, latest = self.gate.latest(), "discarding stale acquisition");
        }
        current
    }

    fn spawn<F>(&self, seq: u64, job: F)
    where
        F: FnOnce() -> Result<Acquired> + Send + 'static,
    {
        let events = self.events.clone();
        thread::spawn(move || {
            // a panicking job still has to clear the pending request
            let result = panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|_| {
                error!(seq, "acquisition worker panicked");
                Err(AcquireError::fetch("acquisition worker panicked"))
            });
            // the receiver is gone only when the app is shutting down
            let _ = events.send(AppEvent::Acquired { seq, result });
        });
    }
}
