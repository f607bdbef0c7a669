//! Reply definitions
//!
//! Results of shell commands and their text rendering.

use std::fmt;

/// A reply to print for one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Command applied
    Ok,

    /// A stored value
    Value(Vec<u8>),

    /// Key absent or expired
    Nil,

    /// Outcome of a delete
    Bool(bool),

    /// A count or a clock reading
    Integer(i64),

    /// Ordered key/value pairs from a scan or reclamation
    Entries(Vec<(Vec<u8>, Vec<u8>)>),

    /// Answer to PING
    Pong,

    /// Command could not be parsed or run
    Error(String),
}

impl Reply {
    /// Create an ERROR reply
    pub fn error(message: impl fmt::Display) -> Self {
        Reply::Error(message.to_string())
    }

    /// Whether this reply reports a failure
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => write!(f, "OK"),
            Reply::Value(value) => write!(f, "\"{}\"", String::from_utf8_lossy(value)),
            Reply::Nil => write!(f, "(nil)"),
            Reply::Bool(flag) => write!(f, "(integer) {}", u8::from(*flag)),
            Reply::Integer(n) => write!(f, "(integer) {}", n),
            Reply::Entries(entries) if entries.is_empty() => write!(f, "(empty)"),
            Reply::Entries(entries) => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(
                        f,
                        "{}) \"{}\" => \"{}\"",
                        i + 1,
                        String::from_utf8_lossy(key),
                        String::from_utf8_lossy(value)
                    )?;
                }
                Ok(())
            }
            Reply::Pong => write!(f, "PONG"),
            Reply::Error(message) => write!(f, "ERR {}", message),
        }
    }
}
