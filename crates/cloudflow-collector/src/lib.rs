// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Local collector for AWS client-side monitoring (CSM) events.
//!
//! SDKs configured with `AWS_CSM_ENABLED` emit one JSON document per API
//! call as a UDP datagram on localhost. This crate receives those
//! datagrams, strips the `SessionToken` credential field from each event,
//! appends the sanitized events to a JSONL file, and optionally renders
//! them as a live table.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod buffer;
pub mod doctor;
pub mod errors;
pub mod event;
pub mod server;
pub mod sink;
pub mod table;
