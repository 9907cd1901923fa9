// Copyright 2026 the Tracewise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A capability for clearing the drawing from outside the session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Requests that the owning session erase its ink.
///
/// Handles are cheap to clone and may be moved to other threads. A request is
/// applied by the session at the start of its next pointer event or
/// [`poll`](crate::TracingSession::poll); several requests before that collapse
/// into one clear.
#[derive(Clone, Debug, Default)]
pub struct ClearHandle {
    requested: Arc<AtomicBool>,
}

impl ClearHandle {
    /// Asks for the drawing to be cleared.
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// Returns `true` if a request has not been applied yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Consumes the pending request, if any.
    pub(crate) fn take(&self) -> bool {
        self.requested.swap(false, Ordering::AcqRel)
    }
}
