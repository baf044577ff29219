//! Session resources
//!
//! A resource is the state kept alive for a session while views come and
//! go: for a terminal, the received output and the grid size.

use std::collections::VecDeque;

use crate::split::SessionId;

/// Default number of scrollback lines kept per session.
pub const DEFAULT_SCROLLBACK_LIMIT: usize = 10_000;

/// Default terminal width in columns.
pub const DEFAULT_COLS: u16 = 80;

/// Default terminal height in rows.
pub const DEFAULT_ROWS: u16 = 24;

/// State held by the registry for one session.
pub trait SessionResource {
    /// Allocates the resource for a newly registered session.
    fn create(session_id: SessionId) -> Self
    where
        Self: Sized;

    /// Consumes output received from the session.
    fn feed(&mut self, bytes: &[u8]);

    /// Applies a new grid size.
    fn resize(&mut self, _cols: u16, _rows: u16) {}

    /// Releases the resource. Called once, on explicit close.
    fn dispose(&mut self) {}
}

/// A bounded scrollback buffer with a grid size.
///
/// Output is split into lines on `\n`; the trailing partial line is kept
/// separately until it is terminated. Lines are stored as raw bytes so a
/// UTF-8 sequence split across two chunks decodes correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalBuffer {
    session_id: SessionId,
    lines: VecDeque<Vec<u8>>,
    current: Vec<u8>,
    scrollback_limit: usize,
    cols: u16,
    rows: u16,
    bytes_received: u64,
    disposed: bool,
}

impl TerminalBuffer {
    /// Creates an empty buffer with default limits.
    #[must_use]
    pub fn new(session_id: SessionId) -> Self {
        Self::with_limits(session_id, DEFAULT_SCROLLBACK_LIMIT, DEFAULT_COLS, DEFAULT_ROWS)
    }

    /// Creates an empty buffer with explicit limits.
    ///
    /// A scrollback limit of zero keeps one line.
    #[must_use]
    pub fn with_limits(session_id: SessionId, scrollback_limit: usize, cols: u16, rows: u16) -> Self {
        Self {
            session_id,
            lines: VecDeque::new(),
            current: Vec::new(),
            scrollback_limit: scrollback_limit.max(1),
            cols,
            rows,
            bytes_received: 0,
            disposed: false,
        }
    }

    /// Session this buffer belongs to.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Current grid size as `(cols, rows)`.
    #[must_use]
    pub const fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Total bytes fed so far, including lines dropped from scrollback.
    #[must_use]
    pub const fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    /// Whether [`SessionResource::dispose`] has run.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Number of completed lines held.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// All held lines, including the unterminated one, decoded lossily.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .lines
            .iter()
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect();
        if !self.current.is_empty() {
            out.push(String::from_utf8_lossy(&self.current).into_owned());
        }
        out
    }

    /// The held output joined with newlines.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines().join("\n")
    }

    /// Drops all held output.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.current.clear();
    }

    fn push_line(&mut self, line: Vec<u8>) {
        if self.lines.len() == self.scrollback_limit {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }
}

impl SessionResource for TerminalBuffer {
    fn create(session_id: SessionId) -> Self {
        Self::new(session_id)
    }

    fn feed(&mut self, bytes: &[u8]) {
        if self.disposed {
            return;
        }
        self.bytes_received += bytes.len() as u64;
        let mut rest = bytes;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let mut line = std::mem::take(&mut self.current);
            line.extend_from_slice(&rest[..pos]);
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            self.push_line(line);
            rest = &rest[pos + 1..];
        }
        self.current.extend_from_slice(rest);
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    fn dispose(&mut self) {
        self.clear();
        self.disposed = true;
    }
}
