//! Shell Module
//!
//! Line-oriented command driver around a `Store`.
//!
//! ## Commands
//! ```text
//! SET key value [ttl]    insert/overwrite (ttl 0 or omitted = forever)
//! GET key                live value or (nil)
//! DEL key                1 if the key was held, else 0
//! SCAN from count        up to count live entries with key > from
//! REAP                   reclaim one expired entry
//! PURGE [limit]          reclaim expired entries, returns the count
//! LEN                    entries physically held
//! NOW                    current clock reading
//! ADVANCE secs           move a manual clock forward
//! PING / QUIT
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

mod command;
mod reply;

pub use command::{Command, CommandType};
pub use reply::Reply;

use std::io::{BufRead, Write};

use crate::clock::{Clock, ManualClock, SystemClock};
use crate::config::{ClockSource, Config};
use crate::error::{KvError, Result};
use crate::store::Store;

/// Default limit for PURGE without an argument
pub const DEFAULT_PURGE_LIMIT: usize = usize::MAX;

/// Executes commands against a store
pub struct Shell<C: Clock> {
    /// The table being driven
    store: Store<C>,

    /// Handle onto the store's clock when it is a manual one
    manual_clock: Option<ManualClock>,

    /// Automatic purge cadence in commands (0 = off)
    reap_every: u64,

    /// Max entries per automatic purge
    reap_batch: usize,

    /// Commands executed so far
    executed: u64,

    /// Set once QUIT has been executed
    quit_requested: bool,
}

impl<C: Clock> Shell<C> {
    /// Create a shell over `store` with automatic reclamation disabled
    pub fn new(store: Store<C>) -> Self {
        Self {
            store,
            manual_clock: None,
            reap_every: 0,
            reap_batch: 0,
            executed: 0,
            quit_requested: false,
        }
    }

    /// Allow ADVANCE by handing over a handle to the store's manual clock
    pub fn with_manual_clock(mut self, clock: ManualClock) -> Self {
        self.manual_clock = Some(clock);
        self
    }

    /// Purge up to `batch` expired entries after every `every` commands
    pub fn with_reaping(mut self, every: u64, batch: usize) -> Self {
        self.reap_every = every;
        self.reap_batch = batch;
        self
    }

    /// Execute a command
    ///
    /// Routes commands to the matching store operation.
    pub fn execute(&mut self, command: Command) -> Reply {
        tracing::trace!(command = ?command.command_type(), "execute");

        let reply = match command {
            Command::Set { key, value, ttl } => {
                self.store.set(key, value, ttl);
                Reply::Ok
            }
            Command::Get { key } => match self.store.get(&key) {
                Some(value) => Reply::Value(value),
                None => Reply::Nil,
            },
            Command::Delete { key } => Reply::Bool(self.store.remove(&key)),
            Command::Scan { from, count } => Reply::Entries(self.store.get_many_sorted(&from, count)),
            Command::Reap => match self.store.remove_one_expired_entry() {
                Some(entry) => Reply::Entries(vec![entry]),
                None => Reply::Nil,
            },
            Command::Purge { limit } => {
                let reclaimed = self.store.purge_expired(limit.unwrap_or(DEFAULT_PURGE_LIMIT));
                Reply::Integer(i64::try_from(reclaimed).unwrap_or(i64::MAX))
            }
            Command::Len => Reply::Integer(i64::try_from(self.store.len()).unwrap_or(i64::MAX)),
            Command::Now => Reply::Integer(self.store.clock().now().as_secs()),
            Command::Advance { secs } => match &self.manual_clock {
                Some(clock) => Reply::Integer(clock.advance(secs).as_secs()),
                None => Reply::error(KvError::Clock(
                    "ADVANCE requires a manual clock".to_string(),
                )),
            },
            Command::Ping => Reply::Pong,
            Command::Quit => {
                self.quit_requested = true;
                Reply::Ok
            }
        };

        self.executed += 1;
        if self.reap_every > 0 && self.executed % self.reap_every == 0 {
            self.store.purge_expired(self.reap_batch);
        }

        reply
    }

    /// Parse and execute one input line
    ///
    /// Returns `None` for blank and comment lines. Parse failures come
    /// back as `Reply::Error` rather than ending the session.
    pub fn execute_line(&mut self, line: &str) -> Option<Reply> {
        self.execute_line_bytes(line.as_bytes())
    }

    /// Byte-level `execute_line`; keys and values need not be UTF-8
    pub fn execute_line_bytes(&mut self, line: &[u8]) -> Option<Reply> {
        let line = trim_ascii_whitespace(line);
        if line.is_empty() || line.starts_with(b"#") {
            return None;
        }

        match Command::parse_bytes(line) {
            Ok(command) => Some(self.execute(command)),
            Err(e) => {
                tracing::debug!("Rejected input line: {}", e);
                Some(Reply::error(e))
            }
        }
    }

    /// Run the read-execute-print loop until QUIT or end of input
    ///
    /// Lines are read as raw bytes; only I/O failures end the session.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W, prompt: bool) -> Result<()> {
        let mut line = Vec::new();

        loop {
            if prompt {
                write!(output, "ttlkv> ")?;
            }
            output.flush()?;

            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                break;
            }

            if let Some(reply) = self.execute_line_bytes(&line) {
                writeln!(output, "{}", reply)?;
            }
            if self.quit_requested {
                break;
            }
        }

        output.flush()?;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The underlying store
    pub fn store(&self) -> &Store<C> {
        &self.store
    }

    /// Mutable access to the underlying store
    pub fn store_mut(&mut self) -> &mut Store<C> {
        &mut self.store
    }

    /// Number of commands executed
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Whether QUIT has been executed
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

/// Strip leading and trailing ASCII whitespace (including `\r\n`)
fn trim_ascii_whitespace(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &line[start..end]
}

impl Shell<Box<dyn Clock>> {
    /// Build an empty store and shell from a config
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let shell = match config.clock {
            ClockSource::System => {
                let clock: Box<dyn Clock> = Box::new(SystemClock);
                Shell::new(Store::empty(clock))
            }
            ClockSource::Manual { start } => {
                let manual = ManualClock::new(start);
                let clock: Box<dyn Clock> = Box::new(manual.clone());
                Shell::new(Store::empty(clock)).with_manual_clock(manual)
            }
        };

        Ok(shell.with_reaping(config.reap_every, config.reap_batch))
    }
}
