// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::net::SocketAddr;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::buffer::EventBuffer;
use crate::errors::CollectorError;
use crate::event::sanitize;
use crate::sink::AppendLog;
use crate::table;

/// Receive buffer for a single datagram. CSM events are small JSON
/// documents; anything past this limit is truncated by the socket read.
const RECV_BUFFER_SIZE: usize = 2048;

/// Where the collector listens for event datagrams.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub host: String,
    pub port: u16,
}

// PayloadReader abstracts the datagram source so tests can replay fixed payloads.
enum PayloadReader {
    /// UDP socket reader (the production transport)
    UdpSocket(tokio::net::UdpSocket),
    /// Replay reader for testing - yields the same buffer on every read
    #[allow(dead_code)]
    Replay(Vec<u8>, SocketAddr),
}

impl PayloadReader {
    async fn read(&self) -> io::Result<(Vec<u8>, SocketAddr)> {
        match self {
            PayloadReader::UdpSocket(socket) => {
                let mut buf = [0; RECV_BUFFER_SIZE];
                let (amt, src) = socket.recv_from(&mut buf).await?;
                Ok((buf[..amt].to_vec(), src))
            }
            PayloadReader::Replay(payload, src) => Ok((payload.clone(), *src)),
        }
    }
}

/// UDP event collector. Receives one JSON payload per datagram, sanitizes
/// it, appends it to the log, and keeps the session buffer (and live
/// table, when enabled) up to date.
pub struct Collector {
    cancel_token: CancellationToken,
    reader: PayloadReader,
    sink: AppendLog,
    buffer: EventBuffer,
    verbose: bool,
    live_table: bool,
}

impl Collector {
    /// Binds the UDP listener and assembles the pipeline around it.
    ///
    /// The sink is injected so the caller picks (and can report) the
    /// destination. `verbose` echoes every raw payload through the log;
    /// `live_table` repaints the event table instead of echoing.
    pub async fn bind(
        config: &CollectorConfig,
        sink: AppendLog,
        cancel_token: CancellationToken,
        verbose: bool,
        live_table: bool,
    ) -> Result<Self, CollectorError> {
        let addr = format!("{}:{}", config.host, config.port);
        let socket = tokio::net::UdpSocket::bind(&addr)
            .await
            .map_err(|source| CollectorError::Bind { addr, source })?;
        debug!("Bound UDP listener on {}:{}", config.host, config.port);
        Ok(Collector {
            cancel_token,
            reader: PayloadReader::UdpSocket(socket),
            sink,
            buffer: EventBuffer::new(),
            verbose,
            live_table,
        })
    }

    /// Address the listener actually bound, useful when the configured
    /// port was 0. `None` for the replay reader.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match &self.reader {
            PayloadReader::UdpSocket(socket) => socket.local_addr().ok(),
            PayloadReader::Replay(..) => None,
        }
    }

    /// Receive loop. Consumes datagrams until the cancel token fires or a
    /// fatal error occurs. Cancellation is observed between datagrams.
    pub async fn spin(mut self) -> Result<(), CollectorError> {
        while !self.cancel_token.is_cancelled() {
            self.consume_datagram().await?;
        }
        Ok(())
    }

    async fn consume_datagram(&mut self) -> Result<(), CollectorError> {
        let (payload, src) = self
            .reader
            .read()
            .await
            .map_err(CollectorError::Receive)?;
        trace!("Received {} bytes from {}", payload.len(), src);
        self.ingest(&payload)
    }

    /// Runs one payload through the pipeline: echo, sanitize, append,
    /// record, repaint. Parse failures are reported and absorbed; only
    /// append failures propagate.
    fn ingest(&mut self, payload: &[u8]) -> Result<(), CollectorError> {
        if self.verbose {
            info!("{}", String::from_utf8_lossy(payload));
        } else if !self.live_table {
            println!("{}", String::from_utf8_lossy(payload));
        }
        match sanitize(payload) {
            Ok(Some(event)) => {
                self.sink.append(&event).map_err(|source| CollectorError::Write {
                    path: self.sink.path().to_path_buf(),
                    source,
                })?;
                self.buffer.record(event);
                if self.live_table {
                    table::refresh(self.buffer.snapshot());
                }
            }
            Ok(None) => debug!("Skipping empty datagram"),
            Err(err) => error!("Dropping malformed datagram: {err}"),
        }
        Ok(())
    }

    /// Read-only view of the events retained this session.
    pub fn buffer(&self) -> &EventBuffer {
        &self.buffer
    }
}
