//! Socket transport helpers for `poseidonos-cli`.
//!
//! A [`Connection`] carries exactly one request and one reply. The request is
//! written as a single JSON document terminated by a newline; the reply is
//! considered complete once the bytes received so far close the JSON object
//! they opened. A daemon that closes the stream in the middle of a reply is a
//! connection failure, not a malformed reply. The connection is shut down
//! exactly once on every path, including failures and timeouts.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use pos_config::{Config, SocketEndpoint};
use serde::de::IgnoredAny;
use tracing::debug;

#[cfg(unix)]
use std::os::fd::OwnedFd;
#[cfg(unix)]
use std::os::unix::net::UnixStream;

#[cfg(unix)]
use socket2::{Domain, SockAddr, Socket, Type};

use crate::AppError;
use crate::errors::is_timeout;

pub(crate) const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on the size of a single daemon reply.
pub(crate) const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

const READ_CHUNK: usize = 8 * 1024;
const MIN_IO_TIMEOUT: Duration = Duration::from_millis(1);

/// Deadlines applied to a single exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Timeouts {
    pub(crate) connect: Duration,
    pub(crate) io: Duration,
}

impl Timeouts {
    pub(crate) fn from_config(config: &Config) -> Self {
        Self {
            connect: CONNECTION_TIMEOUT,
            // A zero duration would disable socket deadlines altogether.
            io: config.request_timeout().max(MIN_IO_TIMEOUT),
        }
    }
}

/// A byte stream that can be shut down in both directions.
pub(crate) trait Channel: Read + Write {
    fn shutdown(&mut self) -> io::Result<()>;
}

pub(crate) enum Stream {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            Self::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            Self::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            Self::Unix(stream) => stream.flush(),
        }
    }
}

impl Channel for Stream {
    fn shutdown(&mut self) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.shutdown(Shutdown::Both),
            #[cfg(unix)]
            Self::Unix(stream) => stream.shutdown(Shutdown::Both),
        }
    }
}

impl Stream {
    fn set_io_timeout(&self, timeout: Duration) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => {
                stream.set_read_timeout(Some(timeout))?;
                stream.set_write_timeout(Some(timeout))
            }
            #[cfg(unix)]
            Self::Unix(stream) => {
                stream.set_read_timeout(Some(timeout))?;
                stream.set_write_timeout(Some(timeout))
            }
        }
    }
}

/// An open connection to the daemon, good for one request.
pub(crate) struct Connection<C: Channel = Stream> {
    channel: Option<C>,
    endpoint: String,
    io_timeout: Duration,
}

impl<C: Channel> Connection<C> {
    pub(crate) fn new(channel: C, endpoint: impl Into<String>, io_timeout: Duration) -> Self {
        Self {
            channel: Some(channel),
            endpoint: endpoint.into(),
            io_timeout,
        }
    }

    /// Writes `request` and reads the daemon's reply.
    pub(crate) fn send_and_receive(&mut self, request: &str) -> Result<String, AppError> {
        let channel = self.channel.as_mut().ok_or(AppError::ConnectionClosed)?;
        let timeout_ms = self.io_timeout.as_millis();

        write_request(channel, request).map_err(|error| {
            AppError::from_exchange_io(
                error,
                &self.endpoint,
                "writing to",
                timeout_ms,
                AppError::SendRequest,
            )
        })?;
        debug!(endpoint = %self.endpoint, bytes = request.len() + 1, "sent request");

        let reply = read_reply(channel).map_err(|error| match error {
            ReplyError::Io(error) => AppError::from_exchange_io(
                error,
                &self.endpoint,
                "reading from",
                timeout_ms,
                AppError::ReadResponse,
            ),
            ReplyError::Empty => AppError::EmptyResponse,
            ReplyError::TooLarge => AppError::ResponseTooLarge {
                limit: MAX_FRAME_SIZE,
            },
            ReplyError::ClosedEarly { received } => AppError::ClosedMidReply {
                endpoint: self.endpoint.clone(),
                received,
            },
        })?;
        debug!(endpoint = %self.endpoint, bytes = reply.len(), "received reply");
        Ok(reply)
    }

    /// Shuts the connection down. Later calls do nothing.
    pub(crate) fn close(&mut self) {
        let Some(mut channel) = self.channel.take() else {
            return;
        };
        if let Err(error) = channel.shutdown() {
            // The peer may already have gone away; nothing is left to release.
            debug!(endpoint = %self.endpoint, %error, "shutdown after exchange failed");
        }
        debug!(endpoint = %self.endpoint, "closed connection");
    }

    pub(crate) const fn is_closed(&self) -> bool {
        self.channel.is_none()
    }
}

impl<C: Channel> Drop for Connection<C> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Connects to `endpoint`, performs one exchange, and closes the connection.
pub(crate) fn exchange(
    endpoint: &SocketEndpoint,
    timeouts: Timeouts,
    request: &str,
) -> Result<String, AppError> {
    let connection = connect(endpoint, timeouts)?;
    round_trip(connection, request)
}

/// Runs one exchange over `connection` and closes it before returning.
pub(crate) fn round_trip<C: Channel>(
    mut connection: Connection<C>,
    request: &str,
) -> Result<String, AppError> {
    let reply = connection.send_and_receive(request);
    connection.close();
    reply
}

pub(crate) fn connect(
    endpoint: &SocketEndpoint,
    timeouts: Timeouts,
) -> Result<Connection, AppError> {
    let endpoint_display = endpoint.to_string();
    let connect_error = |source: io::Error| {
        if is_timeout(&source) {
            AppError::Timeout {
                endpoint: endpoint_display.clone(),
                operation: "connecting to",
                timeout_ms: timeouts.connect.as_millis(),
            }
        } else {
            AppError::Connect {
                endpoint: endpoint_display.clone(),
                source,
            }
        }
    };

    let stream = match endpoint {
        SocketEndpoint::Tcp { host, port } => {
            let address = resolve_tcp_address(host, *port).map_err(|source| AppError::Resolve {
                endpoint: endpoint_display.clone(),
                source,
            })?;
            TcpStream::connect_timeout(&address, timeouts.connect)
                .map(Stream::Tcp)
                .map_err(connect_error)?
        }
        SocketEndpoint::Unix { path } => {
            #[cfg(unix)]
            {
                connect_unix(path.as_str(), timeouts.connect).map_err(connect_error)?
            }

            #[cfg(not(unix))]
            {
                let _ = path;
                return Err(AppError::UnsupportedUnixTransport(endpoint_display));
            }
        }
    };

    stream
        .set_io_timeout(timeouts.io)
        .map_err(|source| AppError::Connect {
            endpoint: endpoint_display.clone(),
            source,
        })?;
    debug!(endpoint = %endpoint_display, "connected to daemon");
    Ok(Connection::new(stream, endpoint_display, timeouts.io))
}

fn resolve_tcp_address(host: &str, port: u16) -> io::Result<SocketAddr> {
    let mut addrs = (host, port).to_socket_addrs()?;
    addrs
        .find(|addr| matches!(addr, SocketAddr::V4(_) | SocketAddr::V6(_)))
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
}

#[cfg(unix)]
fn connect_unix(path: &str, timeout: Duration) -> io::Result<Stream> {
    let socket = Socket::new(Domain::UNIX, Type::STREAM, None)?;
    let address = SockAddr::unix(path)?;
    socket.connect_timeout(&address, timeout)?;
    let stream = UnixStream::from(OwnedFd::from(socket));
    Ok(Stream::Unix(stream))
}

fn write_request<W: Write>(writer: &mut W, request: &str) -> io::Result<()> {
    writer.write_all(request.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()
}

#[derive(Debug)]
enum ReplyError {
    Io(io::Error),
    Empty,
    TooLarge,
    ClosedEarly { received: usize },
}

fn read_reply<R: Read>(reader: &mut R) -> Result<String, ReplyError> {
    let mut buffer: Vec<u8> = Vec::new();
    let mut chunk = [0_u8; READ_CHUNK];
    let mut scanner = FrameScanner::default();
    loop {
        let read = match reader.read(&mut chunk) {
            Ok(read) => read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(ReplyError::Io(error)),
        };
        let received = chunk.get(..read).unwrap_or_default();
        if received.is_empty() {
            return finish_at_end_of_stream(buffer);
        }
        buffer.extend_from_slice(received);
        if buffer.len() > MAX_FRAME_SIZE {
            return Err(ReplyError::TooLarge);
        }
        if scanner.feed(received) {
            return into_text(buffer);
        }
    }
}

/// Classifies whatever arrived before the daemon closed the stream.
///
/// Input that stops inside a JSON value means the reply was cut short. Bytes
/// that could never parse are handed on and surface as a malformed reply.
fn finish_at_end_of_stream(buffer: Vec<u8>) -> Result<String, ReplyError> {
    if buffer.iter().all(u8::is_ascii_whitespace) {
        return Err(ReplyError::Empty);
    }
    match serde_json::from_slice::<IgnoredAny>(&buffer) {
        Err(error) if error.is_eof() => Err(ReplyError::ClosedEarly {
            received: buffer.len(),
        }),
        _ => into_text(buffer),
    }
}

fn into_text(buffer: Vec<u8>) -> Result<String, ReplyError> {
    String::from_utf8(buffer)
        .map_err(|error| ReplyError::Io(io::Error::new(io::ErrorKind::InvalidData, error)))
}

/// Tracks bracket depth across chunks so every received byte is inspected
/// once, however the reply is split.
///
/// A reply that does not open with `{` or `[` can never become a valid
/// envelope, so it is complete as soon as its first byte arrives.
#[derive(Debug, Default)]
struct FrameScanner {
    started: bool,
    depth: usize,
    in_string: bool,
    escaped: bool,
    complete: bool,
}

impl FrameScanner {
    /// Feeds newly received bytes; returns true once the reply is complete.
    fn feed(&mut self, bytes: &[u8]) -> bool {
        for &byte in bytes {
            if self.complete {
                break;
            }
            if !self.started {
                self.open(byte);
            } else if self.in_string {
                self.advance_string(byte);
            } else {
                self.advance_structure(byte);
            }
        }
        self.complete
    }

    fn open(&mut self, byte: u8) {
        match byte {
            b'{' | b'[' => {
                self.started = true;
                self.depth = 1;
            }
            byte if byte.is_ascii_whitespace() => {}
            _ => self.complete = true,
        }
    }

    fn advance_string(&mut self, byte: u8) {
        if self.escaped {
            self.escaped = false;
        } else if byte == b'\\' {
            self.escaped = true;
        } else if byte == b'"' {
            self.in_string = false;
        }
    }

    fn advance_structure(&mut self, byte: u8) {
        match byte {
            b'"' => self.in_string = true,
            b'{' | b'[' => self.depth = self.depth.saturating_add(1),
            b'}' | b']' => {
                self.depth = self.depth.saturating_sub(1);
                self.complete = self.depth == 0;
            }
            _ => {}
        }
    }
}
