// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * session/guard.rs - Scoped session release.
 */

use log::warn;

use super::{DtlsSession, SessionHandle};

/// Releases the guarded session on every exit path of a scope unless [`disarm`](Self::disarm)ed.
///
/// Created using [`SessionHandle::release_guard`].
#[derive(Debug)]
pub struct ReleaseGuard<'a, S: DtlsSession> {
    handle: &'a mut SessionHandle<S>,
    armed: bool,
}

impl<'a, S: DtlsSession> ReleaseGuard<'a, S> {
    pub(super) fn new(handle: &'a mut SessionHandle<S>) -> ReleaseGuard<'a, S> {
        ReleaseGuard { handle, armed: true }
    }

    /// Returns the guarded session, or `None` if it was already released.
    pub fn session(&self) -> Option<&S> {
        self.handle.session()
    }

    /// Keeps the session alive when this guard goes out of scope.
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl<S: DtlsSession> Drop for ReleaseGuard<'_, S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = self.handle.release_on_failure() {
            warn!("{}", e);
        }
    }
}
