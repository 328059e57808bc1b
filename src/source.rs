//! Source acquisition.
//!
//! [`SourceHandle`] turns a user-supplied identifier into a readable byte
//! stream. Identifiers beginning with `http` are fetched over the network
//! with a bounded timeout; everything else is opened from the local
//! filesystem.
//!
//! # Example
//!
//! ```no_run
//! use std::io::Read;
//!
//! use gifbundle::{Origin, SourceHandle};
//!
//! let mut handle = SourceHandle::open("animation.gif")?;
//! assert_eq!(handle.origin(), Origin::LocalFile);
//!
//! let mut bytes = Vec::new();
//! handle.read_to_end(&mut bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{
    error::Error as StdError,
    fmt::{Debug, Formatter, Result as FmtResult},
    fs::File,
    io::{BufReader, Error as IoError, ErrorKind as IoErrorKind, Read, Result as IoResult},
    time::{Duration, Instant},
};

use crate::error::{GifBundleError, OpenErrorKind};

/// Timeout applied to remote retrievals unless configured otherwise.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

const REMOTE_PREFIX: &str = "http";

/// Where a source identifier points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A path on the local filesystem.
    LocalFile,
    /// A URL retrieved over the network.
    RemoteUrl,
}

impl Origin {
    /// Classify an identifier by its textual prefix.
    ///
    /// Anything starting with `http` is remote. No further URL validation is
    /// done here; malformed URLs fail later, when they are opened.
    pub fn classify(identifier: &str) -> Self {
        if identifier.starts_with(REMOTE_PREFIX) {
            Origin::RemoteUrl
        } else {
            Origin::LocalFile
        }
    }
}

enum SourceStream {
    Local(BufReader<File>),
    Remote(BufReader<Box<dyn Read + Send + Sync + 'static>>),
}

/// A scoped, readable byte stream bound to exactly one [`Origin`].
///
/// The underlying file handle or network connection is released when the
/// handle is dropped.
pub struct SourceHandle {
    identifier: String,
    origin: Origin,
    stream: SourceStream,
    timed_out: bool,
}

impl Debug for SourceHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SourceHandle")
            .field("identifier", &self.identifier)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl SourceHandle {
    /// Open an identifier using the default remote timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GifBundleError::SourceOpen`] with the classified
    /// [`OpenErrorKind`] when the file or URL cannot be opened.
    pub fn open(identifier: &str) -> Result<Self, GifBundleError> {
        Self::open_with_timeout(identifier, DEFAULT_REMOTE_TIMEOUT)
    }

    /// Open an identifier, bounding a remote retrieval by `timeout`.
    ///
    /// The timeout has no effect on local files.
    pub fn open_with_timeout(identifier: &str, timeout: Duration) -> Result<Self, GifBundleError> {
        let origin = Origin::classify(identifier);
        let start = Instant::now();

        let stream = match origin {
            Origin::LocalFile => {
                log::debug!("Using local file reader for '{identifier}'");
                open_local(identifier)?
            }
            Origin::RemoteUrl => {
                log::debug!("Using url reader for '{identifier}' (timeout {timeout:?})");
                open_remote(identifier, timeout)?
            }
        };

        log::info!(
            "Opened '{identifier}' in {}ms",
            start.elapsed().as_millis()
        );

        Ok(Self {
            identifier: identifier.to_string(),
            origin,
            stream,
            timed_out: false,
        })
    }

    /// The origin this handle was opened from.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The identifier this handle was opened with.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Whether a remote read ran past the timeout.
    ///
    /// The timeout also bounds reading the response body, so a stalled
    /// transfer surfaces from [`Read::read`] rather than from opening.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }
}

impl Read for SourceHandle {
    fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        let reader = match &mut self.stream {
            SourceStream::Local(reader) => return reader.read(buf),
            SourceStream::Remote(reader) => reader,
        };

        let result = reader.read(buf);
        if let Err(error) = &result {
            if is_timeout_kind(error.kind()) {
                log::warn!("Timed out reading '{}'", self.identifier);
                self.timed_out = true;
            }
        }
        result
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        log::debug!("Released source '{}'", self.identifier);
    }
}

fn open_local(path: &str) -> Result<SourceStream, GifBundleError> {
    let file = File::open(path).map_err(|error| GifBundleError::SourceOpen {
        identifier: path.to_string(),
        kind: OpenErrorKind::from_io(&error),
        reason: error.to_string(),
    })?;
    Ok(SourceStream::Local(BufReader::new(file)))
}

fn open_remote(url: &str, timeout: Duration) -> Result<SourceStream, GifBundleError> {
    let agent = ureq::AgentBuilder::new().timeout(timeout).build();
    let response = agent.get(url).call().map_err(|error| {
        let (kind, reason) = classify_remote_error(&error);
        GifBundleError::SourceOpen {
            identifier: url.to_string(),
            kind,
            reason,
        }
    })?;

    log::debug!(
        "Remote responded {} ({})",
        response.status(),
        response.content_type()
    );

    Ok(SourceStream::Remote(BufReader::new(response.into_reader())))
}

fn classify_remote_error(error: &ureq::Error) -> (OpenErrorKind, String) {
    match error {
        ureq::Error::Status(code, _) => (OpenErrorKind::Network, format!("HTTP status {code}")),
        ureq::Error::Transport(transport) => {
            let kind = if is_timeout(transport) {
                OpenErrorKind::Timeout
            } else {
                OpenErrorKind::Network
            };
            (kind, transport.to_string())
        }
    }
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = transport.source();
    while let Some(error) = source {
        if let Some(io_error) = error.downcast_ref::<IoError>() {
            if is_timeout_kind(io_error.kind()) {
                return true;
            }
        }
        source = error.source();
    }
    transport.to_string().contains("timed out")
}

fn is_timeout_kind(kind: IoErrorKind) -> bool {
    matches!(kind, IoErrorKind::TimedOut | IoErrorKind::WouldBlock)
}
