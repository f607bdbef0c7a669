//! Command definitions
//!
//! Parses one line of shell input into a command.

use crate::error::{KvError, Result};

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Set,
    Get,
    Delete,
    Scan,
    Reap,
    Purge,
    Len,
    Now,
    Advance,
    Ping,
    Quit,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert or overwrite a key (`ttl` 0 = forever)
    Set { key: Vec<u8>, value: Vec<u8>, ttl: u32 },

    /// Get a value by key
    Get { key: Vec<u8> },

    /// Delete a key
    Delete { key: Vec<u8> },

    /// Ordered scan of keys strictly after `from`
    Scan { from: Vec<u8>, count: u32 },

    /// Reclaim a single expired entry
    Reap,

    /// Reclaim up to `limit` expired entries
    Purge { limit: Option<usize> },

    /// Physical entry count
    Len,

    /// Current clock reading
    Now,

    /// Move a manual clock forward
    Advance { secs: u32 },

    /// Ping (health check)
    Ping,

    /// End the session
    Quit,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Set { .. } => CommandType::Set,
            Command::Get { .. } => CommandType::Get,
            Command::Delete { .. } => CommandType::Delete,
            Command::Scan { .. } => CommandType::Scan,
            Command::Reap => CommandType::Reap,
            Command::Purge { .. } => CommandType::Purge,
            Command::Len => CommandType::Len,
            Command::Now => CommandType::Now,
            Command::Advance { .. } => CommandType::Advance,
            Command::Ping => CommandType::Ping,
            Command::Quit => CommandType::Quit,
        }
    }

    /// Parse a whitespace-separated command line
    ///
    /// See `parse_bytes`.
    pub fn parse(line: &str) -> Result<Command> {
        Self::parse_bytes(line.as_bytes())
    }

    /// Parse a command line given as raw bytes
    ///
    /// Verbs are case-insensitive ASCII. Keys and values are taken verbatim
    /// as bytes (any value except ASCII whitespace) and need not be UTF-8.
    pub fn parse_bytes(line: &[u8]) -> Result<Command> {
        let mut tokens = line
            .split(|b| b.is_ascii_whitespace())
            .filter(|token| !token.is_empty());
        let verb = tokens
            .next()
            .ok_or_else(|| KvError::Parse("empty command".to_string()))?;
        let args: Vec<&[u8]> = tokens.collect();

        let command = match verb.to_ascii_uppercase().as_slice() {
            b"SET" => {
                expect_args("SET", &args, 2, 3)?;
                let ttl = match args.get(2) {
                    Some(raw) => parse_number("SET", "ttl", raw)?,
                    None => 0,
                };
                Command::Set {
                    key: args[0].to_vec(),
                    value: args[1].to_vec(),
                    ttl,
                }
            }
            b"GET" => {
                expect_args("GET", &args, 1, 1)?;
                Command::Get { key: args[0].to_vec() }
            }
            b"DEL" | b"DELETE" => {
                expect_args("DEL", &args, 1, 1)?;
                Command::Delete { key: args[0].to_vec() }
            }
            b"SCAN" => {
                expect_args("SCAN", &args, 2, 2)?;
                Command::Scan {
                    from: args[0].to_vec(),
                    count: parse_number("SCAN", "count", args[1])?,
                }
            }
            b"REAP" => {
                expect_args("REAP", &args, 0, 0)?;
                Command::Reap
            }
            b"PURGE" => {
                expect_args("PURGE", &args, 0, 1)?;
                let limit = args
                    .first()
                    .map(|raw| parse_number("PURGE", "limit", raw))
                    .transpose()?;
                Command::Purge { limit }
            }
            b"LEN" => {
                expect_args("LEN", &args, 0, 0)?;
                Command::Len
            }
            b"NOW" => {
                expect_args("NOW", &args, 0, 0)?;
                Command::Now
            }
            b"ADVANCE" => {
                expect_args("ADVANCE", &args, 1, 1)?;
                Command::Advance {
                    secs: parse_number("ADVANCE", "secs", args[0])?,
                }
            }
            b"PING" => {
                expect_args("PING", &args, 0, 0)?;
                Command::Ping
            }
            b"QUIT" | b"EXIT" => Command::Quit,
            _ => {
                return Err(KvError::UnknownCommand(
                    String::from_utf8_lossy(verb).into_owned(),
                ))
            }
        };

        Ok(command)
    }
}

/// Check the argument count falls within `min..=max`
fn expect_args(verb: &str, args: &[&[u8]], min: usize, max: usize) -> Result<()> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{}..{}", min, max)
        };
        return Err(KvError::Parse(format!(
            "{} command: expected {} arguments, got {}",
            verb,
            expected,
            args.len()
        )));
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(verb: &str, name: &str, raw: &[u8]) -> Result<T> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|text| text.parse::<T>().ok())
        .ok_or_else(|| {
            KvError::Parse(format!(
                "{} command: invalid {} '{}'",
                verb,
                name,
                String::from_utf8_lossy(raw)
            ))
        })
}
