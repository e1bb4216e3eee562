// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::event::Event;

/// Session-scoped, append-only store of every sanitized event received so
/// far, in arrival order. Backs the live table view; discarded on exit.
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: Vec<Event>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event. Events are never removed or reordered.
    pub fn record(&mut self, event: Event) {
        self.events.push(event);
    }

    /// All retained events, oldest first.
    pub fn snapshot(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
