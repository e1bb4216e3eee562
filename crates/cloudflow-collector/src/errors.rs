// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a single datagram payload could not be turned into an event.
///
/// These are recoverable: the payload is reported and dropped, and the
/// receive loop moves on to the next datagram.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("payload is a JSON {0}, expected an object")]
    NotAnObject(&'static str),
}

/// Fatal collector failures. Any of these tears the receive loop down.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("failed to bind UDP listener on {addr}")]
    Bind { addr: String, source: io::Error },
    #[error("failed to receive datagram")]
    Receive(#[source] io::Error),
    #[error("failed to append event to {}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Environment problems surfaced by doctor mode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),
}
