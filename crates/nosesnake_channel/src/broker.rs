//! # Command Broker
//!
//! A small local broker owning named FIFO queues. Each client connection
//! gets its own thread; queue operations take one short lock on the shared
//! [`QueueTable`], which makes every publish/poll/delete atomic.
//!
//! ```text
//! nose_tracker ──TCP──┐
//!                     ├──> Broker ──> QueueTable { "snake_game": [UP, LEFT] }
//! snake_game  ──TCP──┘
//! ```
//!
//! Durability, routing and clustering are deliberately absent: a broker
//! restart loses every pending token.

use std::collections::{HashMap, VecDeque};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use nosesnake_shared::QuitSignal;
use parking_lot::Mutex;

use crate::error::{ChannelError, ChannelResult};
use crate::protocol::{Request, Response, UNKNOWN_QUEUE};
use crate::validate_token;

/// Sleep between two accept attempts when nobody is connecting.
const ACCEPT_IDLE: Duration = Duration::from_millis(20);

/// Named queues, shared by all connections.
#[derive(Clone, Debug, Default)]
pub struct QueueTable {
    queues: Arc<Mutex<HashMap<String, VecDeque<String>>>>,
}

impl QueueTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one request and returns the response line to send back.
    pub fn handle(&self, request: Request) -> Response {
        let mut queues = self.queues.lock();
        match request {
            Request::Declare(queue) => {
                queues.entry(queue).or_default();
                Response::Ok
            }
            Request::Publish { queue, token } => {
                if let Err(e) = validate_token(&token) {
                    return Response::Err(e.to_string());
                }
                match queues.get_mut(&queue) {
                    Some(pending) => {
                        pending.push_back(token);
                        Response::Ok
                    }
                    None => unknown_queue(&queue),
                }
            }
            Request::Poll(queue) => match queues.get_mut(&queue) {
                Some(pending) => pending.pop_front().map_or(Response::Empty, Response::Token),
                None => unknown_queue(&queue),
            },
            Request::Delete(queue) => {
                if let Some(pending) = queues.remove(&queue) {
                    tracing::info!("queue {} deleted with {} pending token(s)", queue, pending.len());
                }
                Response::Ok
            }
        }
    }

    /// Pending token count, or `None` if the queue does not exist.
    #[must_use]
    pub fn pending(&self, queue: &str) -> Option<usize> {
        self.queues.lock().get(queue).map(VecDeque::len)
    }
}

fn unknown_queue(queue: &str) -> Response {
    Response::Err(format!("{UNKNOWN_QUEUE} {queue}"))
}

/// Listening broker.
pub struct Broker {
    listener: TcpListener,
    local_addr: SocketAddr,
    table: QueueTable,
}

impl Broker {
    /// Binds the broker. Use port `0` to let the OS pick one.
    ///
    /// # Errors
    ///
    /// [`ChannelError::ConnectionFailed`] if the address cannot be bound.
    pub fn bind(addr: &str) -> ChannelResult<Self> {
        let failed = |e: std::io::Error| ChannelError::ConnectionFailed {
            addr: addr.to_string(),
            reason: e.to_string(),
        };
        let listener = TcpListener::bind(addr).map_err(failed)?;
        listener.set_nonblocking(true).map_err(failed)?;
        let local_addr = listener.local_addr().map_err(failed)?;

        Ok(Self {
            listener,
            local_addr,
            table: QueueTable::new(),
        })
    }

    /// Address actually bound.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle on the queue table (for inspection).
    #[must_use]
    pub fn table(&self) -> QueueTable {
        self.table.clone()
    }

    /// Accepts clients until `quit` is triggered.
    ///
    /// # Errors
    ///
    /// Currently never fails; accept errors are logged and skipped.
    pub fn serve(&self, quit: &QuitSignal) -> ChannelResult<()> {
        tracing::info!("command broker listening on {}", self.local_addr);
        while !quit.is_triggered() {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    tracing::info!("client connected: {}", peer);
                    let table = self.table.clone();
                    thread::spawn(move || {
                        if let Err(e) = serve_client(stream, &table) {
                            tracing::warn!("client {} dropped: {}", peer, e);
                        }
                        tracing::info!("client disconnected: {}", peer);
                    });
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(ACCEPT_IDLE),
                Err(e) => tracing::warn!("accept error: {}", e),
            }
        }
        tracing::info!("command broker stopped");
        Ok(())
    }

    /// Serves until the process is terminated (Ctrl-C or SIGTERM). The
    /// terminal is never read, so the broker can run as a background job.
    ///
    /// # Errors
    ///
    /// Same as [`Broker::serve`].
    pub fn serve_forever(&self) -> ChannelResult<()> {
        self.serve(&QuitSignal::new())
    }

    /// Runs [`Broker::serve`] on its own thread.
    #[must_use]
    pub fn spawn(self, quit: QuitSignal) -> thread::JoinHandle<ChannelResult<()>> {
        thread::spawn(move || self.serve(&quit))
    }
}

/// Request/response loop for one connection.
fn serve_client(stream: TcpStream, table: &QueueTable) -> std::io::Result<()> {
    stream.set_nonblocking(false)?;
    let mut writer = stream.try_clone()?;
    let reader = BufReader::new(stream);

    for line in reader.lines() {
        let line = line?;
        let response = match Request::parse(&line) {
            Ok(request) => {
                tracing::trace!("request: {}", request);
                table.handle(request)
            }
            Err(e) => Response::Err(e.to_string()),
        };
        writeln!(writer, "{response}")?;
        writer.flush()?;
    }
    Ok(())
}
