//! TCP client end of the command channel.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use nosesnake_shared::ChannelConfig;

use crate::error::{ChannelError, ChannelResult};
use crate::protocol::{Request, Response, UNKNOWN_QUEUE};
use crate::{validate_token, CommandChannel};

/// Connection to a [`crate::Broker`], bound to one queue.
#[derive(Debug)]
pub struct BrokerChannel {
    queue: String,
    writer: TcpStream,
    reader: BufReader<TcpStream>,
    line: String,
}

impl BrokerChannel {
    /// Connects to the broker and declares the configured queue.
    ///
    /// # Errors
    ///
    /// [`ChannelError::ConnectionFailed`] if the broker is unreachable, or
    /// any error the broker returns for the declaration.
    pub fn create(config: &ChannelConfig) -> ChannelResult<Self> {
        let failed = |e: std::io::Error| ChannelError::ConnectionFailed {
            addr: config.broker_addr.clone(),
            reason: e.to_string(),
        };
        let stream = TcpStream::connect(&config.broker_addr).map_err(failed)?;
        stream.set_read_timeout(Some(config.io_timeout())).map_err(failed)?;
        stream.set_write_timeout(Some(config.io_timeout())).map_err(failed)?;
        stream.set_nodelay(true).map_err(failed)?;
        let reader = BufReader::new(stream.try_clone().map_err(failed)?);

        let mut channel = Self {
            queue: config.queue.clone(),
            writer: stream,
            reader,
            line: String::new(),
        };
        channel.expect_ok(&Request::Declare(channel.queue.clone()))?;
        tracing::info!("declared queue {} on {}", channel.queue, config.broker_addr);
        Ok(channel)
    }

    fn request(&mut self, request: &Request) -> ChannelResult<Response> {
        writeln!(self.writer, "{request}")?;
        self.writer.flush()?;

        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Err(ChannelError::ConnectionLost("broker closed the connection".to_string()));
        }
        match Response::parse(&self.line)? {
            Response::Err(reason) => Err(self.refusal(reason)),
            response => Ok(response),
        }
    }

    fn expect_ok(&mut self, request: &Request) -> ChannelResult<()> {
        match self.request(request)? {
            Response::Ok => Ok(()),
            other => Err(ChannelError::Protocol(format!("expected OK to {request}, got {other}"))),
        }
    }

    fn refusal(&self, reason: String) -> ChannelError {
        if reason.starts_with(UNKNOWN_QUEUE) {
            ChannelError::UnknownQueue(self.queue.clone())
        } else {
            ChannelError::Rejected(reason)
        }
    }
}

impl CommandChannel for BrokerChannel {
    fn name(&self) -> &str {
        &self.queue
    }

    fn publish(&mut self, token: &str) -> ChannelResult<()> {
        validate_token(token)?;
        self.expect_ok(&Request::Publish {
            queue: self.queue.clone(),
            token: token.to_string(),
        })
    }

    fn poll(&mut self) -> ChannelResult<Option<String>> {
        match self.request(&Request::Poll(self.queue.clone()))? {
            Response::Token(token) => Ok(Some(token)),
            Response::Empty => Ok(None),
            other => Err(ChannelError::Protocol(format!("unexpected reply to POLL: {other}"))),
        }
    }

    fn release(&mut self) -> ChannelResult<()> {
        self.expect_ok(&Request::Delete(self.queue.clone()))?;
        tracing::info!("released queue {}", self.queue);
        Ok(())
    }
}
