//! # Line protocol
//!
//! One request per connection:
//!
//! ```text
//! AwaitingLine ─▶ Decoding ─▶ Dispatching ─▶ Formatting ─▶ Writing ─▶ Closed
//!      │              │             │
//!      │ EOF, no data │ not UTF-8   │ unknown keyword ─▶ UnknownCommand
//!      ▼              ▼             │ value error     ─▶ BadValue
//!   Closed       BadCommand         └ other failure   ─▶ Closed, no reply
//! ```
//!
//! Every reply is ASCII text followed by [`REPLY_TERMINATOR`]: the body's own line end
//! and a line holding a single `.`.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use itertools::Itertools;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::artemis_errors::ArtemisError;
use crate::clock::TimeDomain;
use crate::constants::REPLY_TERMINATOR;
use crate::ephemeris::Ephemeris;
use crate::query::QueryResolver;
use crate::time::rounded_unix_seconds;

/// Every request the server understands.
///
/// Each family comes in a `…Real` flavour evaluated now, and a `…MOO` flavour evaluated at
/// the current world time with its instants converted back to real time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoonPhase(TimeDomain),
    NearestLunarEclipse(TimeDomain),
    LunarEclipses(TimeDomain),
    SunRiseSet(TimeDomain),
    MoonRiseSet(TimeDomain),
}

impl Command {
    pub const ALL: [Command; 10] = [
        Command::MoonPhase(TimeDomain::Real),
        Command::MoonPhase(TimeDomain::World),
        Command::NearestLunarEclipse(TimeDomain::Real),
        Command::NearestLunarEclipse(TimeDomain::World),
        Command::LunarEclipses(TimeDomain::Real),
        Command::LunarEclipses(TimeDomain::World),
        Command::SunRiseSet(TimeDomain::Real),
        Command::SunRiseSet(TimeDomain::World),
        Command::MoonRiseSet(TimeDomain::Real),
        Command::MoonRiseSet(TimeDomain::World),
    ];

    /// The exact wire keyword of this command.
    pub fn keyword(&self) -> &'static str {
        use TimeDomain::{Real, World};
        match self {
            Command::MoonPhase(Real) => "MoonPhaseReal",
            Command::MoonPhase(World) => "MoonPhaseMOO",
            Command::NearestLunarEclipse(Real) => "NearestLunarEclipseReal",
            Command::NearestLunarEclipse(World) => "NearestLunarEclipseMOO",
            Command::LunarEclipses(Real) => "LunarEclipsesReal",
            Command::LunarEclipses(World) => "LunarEclipsesMOO",
            Command::SunRiseSet(Real) => "SunRiseSetReal",
            Command::SunRiseSet(World) => "SunRiseSetMOO",
            Command::MoonRiseSet(Real) => "MoonRiseSetReal",
            Command::MoonRiseSet(World) => "MoonRiseSetMOO",
        }
    }

    /// Evaluate the command now and format its reply body.
    pub fn execute<E: Ephemeris>(&self, resolver: &QueryResolver<E>) -> Result<String, ArtemisError> {
        let body = match *self {
            Command::MoonPhase(domain) => {
                format!("{:.10}", resolver.moon_phase(domain, None)?)
            }
            Command::NearestLunarEclipse(domain) => {
                let eclipse = resolver.nearest_lunar_eclipse(domain, None)?;
                format!("{}\n{}", rounded_unix_seconds(&eclipse.instant.instant()), eclipse.kind)
            }
            Command::LunarEclipses(domain) => {
                let pair = resolver.lunar_eclipses(domain, None)?;
                [pair.past, pair.future]
                    .iter()
                    .map(|e| format!("{}\n{}", rounded_unix_seconds(&e.instant.instant()), e.kind))
                    .join("\n")
            }
            Command::SunRiseSet(domain) => {
                let times = resolver.sun_rise_set(domain, None)?;
                times
                    .in_reply_order()
                    .iter()
                    .map(|t| rounded_unix_seconds(&t.instant()))
                    .join("\n")
            }
            Command::MoonRiseSet(domain) => {
                let times = resolver.moon_rise_set(domain, None)?;
                times
                    .in_reply_order()
                    .iter()
                    .map(|t| rounded_unix_seconds(&t.instant()))
                    .join("\n")
            }
        };
        Ok(body)
    }
}

impl FromStr for Command {
    type Err = ();

    /// Exact, case-sensitive keyword match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|command| command.keyword() == s)
            .ok_or(())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// What is written back before the connection closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Body(String),
    UnknownCommand,
    BadCommand,
    BadValue,
}

impl Reply {
    /// Wire form of the reply, terminator included.
    pub fn render(&self) -> String {
        let body = match self {
            Reply::Body(text) => text.as_str(),
            Reply::UnknownCommand => "UnknownCommand",
            Reply::BadCommand => "BadCommand",
            Reply::BadValue => "BadValue",
        };
        format!("{body}{REPLY_TERMINATOR}")
    }
}

/// Per-connection limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionLimits {
    /// Deadline applied to the read and, separately, to the write. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Longest request line accepted, newline included; longer input is cut.
    pub max_request_bytes: u64,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        ConnectionLimits {
            timeout: Some(Duration::from_secs(30)),
            max_request_bytes: 4096,
        }
    }
}

/// Decode a raw request line: UTF-8, trailing whitespace removed.
pub fn decode_request(raw: &[u8]) -> Result<&str, ArtemisError> {
    std::str::from_utf8(raw)
        .map(str::trim_end)
        .map_err(|_| ArtemisError::InvalidRequest)
}

/// Drop a multi-byte character left incomplete at the end of `raw`.
fn drop_cut_character(raw: &mut Vec<u8>) {
    if let Err(err) = std::str::from_utf8(raw) {
        if err.error_len().is_none() {
            raw.truncate(err.valid_up_to());
        }
    }
}

/// Serve one request on `stream`, then shut it down.
///
/// Arguments
/// -----------------
/// * `stream`: the accepted connection.
/// * `resolver`: shared query resolver; queries run on tokio's blocking pool.
/// * `limits`: deadlines and request size bound.
///
/// Return
/// ----------
/// * `Ok(Some(reply))` once a reply has been written.
/// * `Ok(None)` when the peer closed the connection without sending anything.
/// * `Err(_)` on transport errors, deadlines, or a query failure that is not a value
///   error. Nothing is written back in those cases.
pub async fn handle_connection<S, E>(
    stream: S,
    resolver: Arc<QueryResolver<E>>,
    limits: ConnectionLimits,
) -> Result<Option<Reply>, ArtemisError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    E: Ephemeris + 'static,
{
    let (read_half, mut write_half) = tokio::io::split(stream);

    let mut raw = Vec::new();
    let mut reader = BufReader::new(read_half).take(limits.max_request_bytes);
    let n_read = with_deadline(limits.timeout, "reading the request", reader.read_until(b'\n', &mut raw)).await?;
    if n_read == 0 {
        debug!("peer closed before sending a request");
        return Ok(None);
    }
    if n_read as u64 == limits.max_request_bytes && raw.last() != Some(&b'\n') {
        debug!(bytes = n_read, "request cut at the size limit");
        drop_cut_character(&mut raw);
    }

    let reply = match decode_request(&raw) {
        Err(_) => {
            info!(bytes = raw.len(), "request is not valid UTF-8");
            Reply::BadCommand
        }
        Ok(text) => {
            info!(request = text, "request received");
            match text.parse::<Command>() {
                Err(()) => Reply::UnknownCommand,
                Ok(command) => dispatch(command, resolver).await?,
            }
        }
    };

    let rendered = reply.render();
    with_deadline(limits.timeout, "writing the reply", async {
        write_half.write_all(rendered.as_bytes()).await?;
        write_half.shutdown().await
    })
    .await?;
    info!(reply = ?rendered, "reply sent");

    Ok(Some(reply))
}

/// Run `command` off the async workers and turn its outcome into a reply.
async fn dispatch<E>(command: Command, resolver: Arc<QueryResolver<E>>) -> Result<Reply, ArtemisError>
where
    E: Ephemeris + 'static,
{
    let outcome = tokio::task::spawn_blocking(move || command.execute(&resolver))
        .await
        .map_err(|err| ArtemisError::TaskFailed(err.to_string()))?;

    match outcome {
        Ok(body) => Ok(Reply::Body(body)),
        Err(err) if err.is_value_error() => {
            info!(%command, error = %err, "query has no answer");
            Ok(Reply::BadValue)
        }
        Err(err) => Err(err),
    }
}

async fn with_deadline<T>(
    deadline: Option<Duration>,
    what: &'static str,
    operation: impl Future<Output = std::io::Result<T>>,
) -> Result<T, ArtemisError> {
    let result = match deadline {
        Some(limit) => tokio::time::timeout(limit, operation)
            .await
            .map_err(|_| ArtemisError::Timeout(what))?,
        None => operation.await,
    };
    Ok(result?)
}
