//! # Wire Protocol
//!
//! Commands and replies are newline-terminated ASCII text over UDP.
//! Outbound commands are built by [`Command::encode`]; inbound replies
//! are decoded by small explicit parsers returning typed results.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use thiserror::Error;

/// Acknowledgement a server sends back for `PING`.
const DISCOVERY_ACK: &str = "PONG";

/// Timestamp layout of the `STATUS` reply, microsecond precision.
const STATUS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One client-to-server command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Discovery probe; answered with `PONG`.
    Ping,
    /// Query capture settings and server clock.
    Status,
    /// Set the capture resolution.
    Resolution { width: u32, height: u32 },
    /// Set the capture framerate.
    Framerate(Framerate),
    /// Capture an image. The transfer itself is handled out of band.
    Shoot,
}

impl Command {
    /// Encodes to the newline-terminated wire form.
    pub fn encode(&self) -> Vec<u8> {
        let line = match self {
            Command::Ping => "PING".to_string(),
            Command::Status => "STATUS".to_string(),
            Command::Resolution { width, height } => format!("RESOLUTION {width} {height}"),
            Command::Framerate(rate) => format!("FRAMERATE {rate}"),
            Command::Shoot => "SHOOT".to_string(),
        };
        format!("{line}\n").into_bytes()
    }
}

/// A positive capture rate, accepted as decimal (`30`, `7.5`) or
/// fractional (`15/2`) text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framerate(f64);

impl Framerate {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid framerate \"{0}\"")]
pub struct FramerateError(String);

impl FromStr for Framerate {
    type Err = FramerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let value = match text.split_once('/') {
            Some((numer, denom)) => {
                let numer: f64 = numer
                    .parse()
                    .map_err(|_| FramerateError(text.to_string()))?;
                let denom: f64 = denom
                    .parse()
                    .map_err(|_| FramerateError(text.to_string()))?;
                numer / denom
            }
            None => text.parse().map_err(|_| FramerateError(text.to_string()))?,
        };
        if value.is_finite() && value > 0.0 {
            Ok(Framerate(value))
        } else {
            Err(FramerateError(text.to_string()))
        }
    }
}

impl fmt::Display for Framerate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reply payload that does not decode as the expected reply type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplyError {
    /// The server answered, but with a failure message instead of `OK`.
    #[error("server reported failure: {0}")]
    Failure(String),
    #[error("malformed reply: {0}")]
    Malformed(String),
    #[error("reply is not valid text")]
    NotText,
}

/// Decoded `STATUS` reply.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub width: u32,
    pub height: u32,
    pub rate: Framerate,
    pub timestamp: NaiveDateTime,
}

/// Whether `payload` is exactly the discovery acknowledgement, modulo
/// surrounding whitespace. Anything else during discovery is bogus.
pub fn is_discovery_ack(payload: &[u8]) -> bool {
    std::str::from_utf8(payload).is_ok_and(|text| text.trim() == DISCOVERY_ACK)
}

/// Decodes an `OK`-or-failure reply.
pub fn parse_ack(payload: &[u8]) -> Result<(), ReplyError> {
    let text = std::str::from_utf8(payload).map_err(|_| ReplyError::NotText)?;
    match text.trim() {
        "OK" => Ok(()),
        other => Err(ReplyError::Failure(other.to_string())),
    }
}

/// Decodes a `STATUS` reply into a [`StatusReport`].
pub fn parse_status(payload: &[u8]) -> Result<StatusReport, ReplyError> {
    let text = std::str::from_utf8(payload).map_err(|_| ReplyError::NotText)?;
    let mut lines = text.lines();

    let dimensions = expect_field(lines.next(), "RESOLUTION")?;
    let (width, height) = dimensions
        .split_once(' ')
        .ok_or_else(|| ReplyError::Malformed(format!("bad resolution \"{dimensions}\"")))?;
    let width = width
        .parse()
        .map_err(|_| ReplyError::Malformed(format!("bad width \"{width}\"")))?;
    let height = height
        .parse()
        .map_err(|_| ReplyError::Malformed(format!("bad height \"{height}\"")))?;

    let rate = expect_field(lines.next(), "FRAMERATE")?
        .parse()
        .map_err(|e: FramerateError| ReplyError::Malformed(e.to_string()))?;

    let time_text = expect_field(lines.next(), "TIMESTAMP")?;
    let timestamp = NaiveDateTime::parse_from_str(time_text, STATUS_TIME_FORMAT)
        .map_err(|_| ReplyError::Malformed(format!("bad timestamp \"{time_text}\"")))?;

    Ok(StatusReport {
        width,
        height,
        rate,
        timestamp,
    })
}

fn expect_field<'a>(line: Option<&'a str>, tag: &str) -> Result<&'a str, ReplyError> {
    let line = line.ok_or_else(|| ReplyError::Malformed(format!("missing {tag} line")))?;
    line.strip_prefix(tag)
        .and_then(|rest| rest.strip_prefix(' '))
        .map(str::trim)
        .ok_or_else(|| ReplyError::Malformed(format!("expected {tag} line, got \"{line}\"")))
}
