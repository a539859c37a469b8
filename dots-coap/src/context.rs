// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * context.rs - CoAP context owning the event handler registration.
 */

use std::net::SocketAddr;

use log::{debug, warn};

use crate::{
    event::{dispatch_event, CoapEvent, CoapEventHandler},
    session::EventHandlerSlot,
};

/// A CoAP context, i.e., the owner of a set of sessions.
///
/// The context holds the event handler that is called for events on any of its sessions. Event
/// handlers are deregistered when one of the context's sessions is torn down after a failed peer
/// validation, see [`release_on_failure`](crate::session::release_on_failure).
#[derive(Debug, Default)]
pub struct CoapContext {
    event_handler: Option<Box<dyn CoapEventHandler>>,
}

impl CoapContext {
    pub fn new() -> CoapContext {
        CoapContext::default()
    }

    /// Registers `handler` as the event handler, replacing any previously registered one.
    pub fn set_event_handler(&mut self, handler: impl CoapEventHandler + 'static) {
        self.event_handler = Some(Box::new(handler));
    }

    /// Removes the registered event handler, returning it (if any).
    pub fn clear_event_handler(&mut self) -> Option<Box<dyn CoapEventHandler>> {
        self.event_handler.take()
    }

    pub fn has_event_handler(&self) -> bool {
        self.event_handler.is_some()
    }

    /// Passes `event` for the session with the remote address `peer` to the event handler.
    ///
    /// Events are dropped if no event handler is registered.
    pub fn handle_event(&mut self, peer: SocketAddr, event: CoapEvent) {
        match self.event_handler.as_mut() {
            Some(handler) => dispatch_event(handler.as_mut(), peer, event),
            None => debug!("dropping {:?} event for {}: no event handler registered", event, peer),
        }
    }

    /// Like [`handle_event`](Self::handle_event), but for a raw libcoap event code.
    pub fn handle_raw_event(&mut self, peer: SocketAddr, code: u32) {
        match CoapEvent::from_raw(code) {
            Some(event) => self.handle_event(peer, event),
            None => warn!("unsupported CoAP event code {:#06x} for {}", code, peer),
        }
    }
}

impl EventHandlerSlot for CoapContext {
    fn set_event_handler(&mut self, handler: Option<Box<dyn CoapEventHandler>>) {
        self.event_handler = handler;
    }
}
