//! Fake daemon for behavioural tests.
//!
//! Listens on an ephemeral TCP port, records the request of the first client,
//! answers with a canned reply, and by default keeps the socket open until the
//! client hangs up. Keeping it open proves the CLI recognises a complete reply
//! without waiting for the daemon to close the stream.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};

const ACCEPT_DEADLINE: Duration = Duration::from_secs(2);
const HANG_UP_DEADLINE: Duration = Duration::from_secs(2);

/// What the daemon does with the connection once the reply is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(in crate::tests) enum AfterReply {
    HoldOpen,
    HangUp,
}

pub(in crate::tests) struct FakeDaemon {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    result: Arc<Mutex<Option<Result<()>>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeDaemon {
    /// Spawns a daemon that answers a single connection with `reply`.
    pub fn spawn(reply: String) -> Result<Self> {
        Self::spawn_with(reply, AfterReply::HoldOpen)
    }

    /// Spawns a daemon that answers with `reply`, then holds or drops the
    /// connection as `after_reply` says.
    pub fn spawn_with(reply: String, after_reply: AfterReply) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake daemon")?;
        listener
            .set_nonblocking(true)
            .context("fake daemon nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let result: Arc<Mutex<Option<Result<()>>>> = Arc::new(Mutex::new(None));
        let requests_clone = Arc::clone(&requests);
        let result_clone = Arc::clone(&result);
        let handle = thread::spawn(move || {
            let outcome = Self::serve_client(&listener, &reply, after_reply, &requests_clone);
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(outcome);
            }
        });
        Ok(Self {
            port,
            requests,
            result,
            handle: Some(handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the daemon thread to finish and returns the recorded requests.
    pub fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake daemon thread panicked"))?;
        }
        if let Some(outcome) = self
            .result
            .lock()
            .map_err(|error| anyhow!("lock fake daemon result: {error}"))?
            .take()
        {
            outcome.context("fake daemon failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve_client(
        listener: &TcpListener,
        reply: &str,
        after_reply: AfterReply,
        requests: &Arc<Mutex<Vec<String>>>,
    ) -> Result<()> {
        let deadline = Instant::now() + ACCEPT_DEADLINE;
        loop {
            match listener.accept() {
                Ok((stream, _)) => return Self::answer(stream, reply, after_reply, requests),
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
                {
                    thread::sleep(Duration::from_millis(10));
                }
                // Nobody connected, which is what bootstrap scenarios expect.
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }

    fn answer(
        stream: TcpStream,
        reply: &str,
        after_reply: AfterReply,
        requests: &Arc<Mutex<Vec<String>>>,
    ) -> Result<()> {
        stream
            .set_nonblocking(false)
            .context("fake daemon blocking stream")?;
        stream
            .set_read_timeout(Some(HANG_UP_DEADLINE))
            .context("fake daemon read timeout")?;
        let mut reader = BufReader::new(stream.try_clone().context("clone stream")?);
        let mut line = String::new();
        if reader
            .read_line(&mut line)
            .context("read command request")?
            == 0
        {
            return Ok(());
        }
        requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?
            .push(line);

        let mut writer = stream;
        writer.write_all(reply.as_bytes()).context("write reply")?;
        writer.write_all(b"\n").context("write reply terminator")?;
        writer.flush().context("flush reply")?;
        if after_reply == AfterReply::HangUp {
            return Ok(());
        }

        // Hold the connection until the client shuts it down.
        let mut rest = Vec::new();
        let _ = reader.read_to_end(&mut rest);
        Ok(())
    }
}

impl Drop for FakeDaemon {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
