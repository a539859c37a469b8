// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * session/mod.rs - Types relating to (D)TLS protected CoAP sessions.
 */

//! Session abstractions and the session teardown performed after failed peer validation.
//!
//! Sessions, their (D)TLS connection objects and their owning contexts are provided by the CoAP
//! and TLS libraries in use. This module only describes the narrow capabilities the validation
//! and retrieval code needs from them:
//! - [`DtlsSession`]: access to the connection and the owning context, and releasing the session.
//! - [`TlsConnection`]: the chain verification result and the peer certificate.
//! - [`EventHandlerSlot`]: the event handler registration slot of a context.
//!
//! [`SessionHandle`] wraps a session and guarantees that it is released at most once, always
//! deregistering the context's event handler first.

use std::{cell::RefCell, rc::Rc};

use log::debug;

pub use self::guard::ReleaseGuard;
use crate::{
    crypto::pki::{PeerCertificate, VerificationOutcome},
    error::SessionReleaseError,
    event::CoapEventHandler,
};

mod guard;

/// An established (D)TLS connection object of a session.
pub trait TlsConnection {
    /// Certificate type presented by the peer.
    type Certificate: PeerCertificate;

    /// Returns the outcome of the TLS library's chain verification for this connection.
    fn verify_result(&self) -> VerificationOutcome;

    /// Returns the certificate presented by the peer, if any.
    fn peer_certificate(&self) -> Option<&Self::Certificate>;
}

/// Event handler registration slot of a CoAP context.
pub trait EventHandlerSlot {
    /// Registers `handler` as the event handler, or deregisters the current one if `None`.
    fn set_event_handler(&mut self, handler: Option<Box<dyn CoapEventHandler>>);
}

impl<T: EventHandlerSlot + ?Sized> EventHandlerSlot for Rc<RefCell<T>> {
    fn set_event_handler(&mut self, handler: Option<Box<dyn CoapEventHandler>>) {
        self.borrow_mut().set_event_handler(handler)
    }
}

/// A CoAP session that may be protected by (D)TLS.
pub trait DtlsSession {
    /// Type of the session's (D)TLS connection object.
    type Connection: TlsConnection;
    /// Handle to the context owning this session.
    type Context: EventHandlerSlot;

    /// Returns the (D)TLS connection object, or `None` if no (D)TLS connection is established.
    fn tls_connection(&self) -> Option<&Self::Connection>;

    /// Returns a handle to the context that owns this session.
    fn context(&self) -> Self::Context;

    /// Releases the session.
    fn release(self);
}

/// Deregisters the event handler of the session's owning context, then releases the session.
///
/// Deregistering first ensures that no pending event callback can refer to the released session.
/// Consuming `session` makes a second release through the same value impossible, use
/// [`SessionHandle`] if the session has to stay accessible until it is released.
pub fn release_on_failure<S: DtlsSession>(session: S) {
    let mut context = session.context();
    context.set_event_handler(None);
    debug!("deregistered context event handler, releasing session");
    session.release();
}

/// Owner of a session that may be released exactly once.
#[derive(Debug)]
pub struct SessionHandle<S: DtlsSession> {
    session: Option<S>,
}

impl<S: DtlsSession> SessionHandle<S> {
    pub fn new(session: S) -> SessionHandle<S> {
        SessionHandle { session: Some(session) }
    }

    /// Returns the session, or `None` if it has already been released.
    pub fn session(&self) -> Option<&S> {
        self.session.as_ref()
    }

    /// Returns the session mutably, or `None` if it has already been released.
    pub fn session_mut(&mut self) -> Option<&mut S> {
        self.session.as_mut()
    }

    pub fn is_released(&self) -> bool {
        self.session.is_none()
    }

    /// Deregisters the context's event handler and releases the session.
    ///
    /// # Errors
    ///
    /// Will return [`SessionReleaseError::AlreadyReleased`] if the session has already been
    /// released through this handle.
    pub fn release_on_failure(&mut self) -> Result<(), SessionReleaseError> {
        let session = self.session.take().ok_or(SessionReleaseError::AlreadyReleased)?;
        release_on_failure(session);
        Ok(())
    }

    /// Creates a guard that releases the session when dropped, unless it is disarmed first.
    pub fn release_guard(&mut self) -> ReleaseGuard<'_, S> {
        ReleaseGuard::new(self)
    }
}

impl<S: DtlsSession> From<S> for SessionHandle<S> {
    fn from(session: S) -> Self {
        SessionHandle::new(session)
    }
}
