// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * event.rs - Session event types and handler traits.
 */

//! Event handling-related code

use std::{fmt::Debug, net::SocketAddr};

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// Session events reported by the CoAP library.
///
/// The enum value corresponds to libcoap's `coap_event_t` code and can be retrieved using
/// `[value] as u32`.
#[repr(u32)]
#[non_exhaustive]
#[derive(FromPrimitive, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CoapEvent {
    DtlsClosed = 0x0000,
    DtlsConnected = 0x01DE,
    DtlsRenegotiate = 0x01DF,
    DtlsError = 0x0200,
    TcpConnected = 0x1001,
    TcpClosed = 0x1002,
    TcpFailed = 0x1003,
    SessionConnected = 0x2001,
    SessionClosed = 0x2002,
    SessionFailed = 0x2003,
    PartialBlock = 0x3001,
    XmitBlockFail = 0x3002,
    ServerSessionNew = 0x4001,
    ServerSessionDel = 0x4002,
}

impl CoapEvent {
    /// Decodes a raw libcoap event code, returning `None` for unknown codes.
    pub fn from_raw(code: u32) -> Option<CoapEvent> {
        <CoapEvent as FromPrimitive>::from_u32(code)
    }

    pub fn to_raw(self) -> u32 {
        self as u32
    }
}

/// Trait for CoAP event handlers.
///
/// Implementations of this trait can be registered with a [`CoapContext`](crate::CoapContext)
/// to handle events relating to the context's sessions, which are identified by their remote
/// address.
pub trait CoapEventHandler: Debug {
    /// Handle a DTLS connected event.
    ///
    /// This event is triggered when a DTLS session switches to the connected state.
    #[allow(unused_variables)]
    fn handle_dtls_connected(&mut self, peer: SocketAddr) {}

    /// Handle a DTLS closed event.
    #[allow(unused_variables)]
    fn handle_dtls_closed(&mut self, peer: SocketAddr) {}

    /// Handle a DTLS renegotiation event.
    #[allow(unused_variables)]
    fn handle_dtls_renegotiate(&mut self, peer: SocketAddr) {}

    /// Handle a DTLS error event.
    ///
    /// This event is also triggered if the peer's certificate was rejected during the handshake.
    #[allow(unused_variables)]
    fn handle_dtls_error(&mut self, peer: SocketAddr) {}

    /// Handle a TCP connected event.
    #[allow(unused_variables)]
    fn handle_tcp_connected(&mut self, peer: SocketAddr) {}

    /// Handle a TCP closed event.
    #[allow(unused_variables)]
    fn handle_tcp_closed(&mut self, peer: SocketAddr) {}

    /// Handle a TCP failed event.
    #[allow(unused_variables)]
    fn handle_tcp_failed(&mut self, peer: SocketAddr) {}

    /// Handle a session connected event.
    #[allow(unused_variables)]
    fn handle_session_connected(&mut self, peer: SocketAddr) {}

    /// Handle a session closed event.
    #[allow(unused_variables)]
    fn handle_session_closed(&mut self, peer: SocketAddr) {}

    /// Handle a session failed event.
    #[allow(unused_variables)]
    fn handle_session_failed(&mut self, peer: SocketAddr) {}

    /// Handle a (Q-)Block receive error.
    #[allow(unused_variables)]
    fn handle_partial_block(&mut self, peer: SocketAddr) {}

    /// Handle a failure to transmit a block of a blockwise transfer.
    #[allow(unused_variables)]
    fn handle_xmit_block_fail(&mut self, peer: SocketAddr) {}

    /// Handle the creation of a new server-side session.
    #[allow(unused_variables)]
    fn handle_server_session_new(&mut self, peer: SocketAddr) {}

    /// Handle the deletion of a server-side session.
    #[allow(unused_variables)]
    fn handle_server_session_del(&mut self, peer: SocketAddr) {}
}

/// Calls the method of `handler` that corresponds to `event`.
pub(crate) fn dispatch_event(handler: &mut dyn CoapEventHandler, peer: SocketAddr, event: CoapEvent) {
    match event {
        CoapEvent::DtlsClosed => handler.handle_dtls_closed(peer),
        CoapEvent::DtlsConnected => handler.handle_dtls_connected(peer),
        CoapEvent::DtlsRenegotiate => handler.handle_dtls_renegotiate(peer),
        CoapEvent::DtlsError => handler.handle_dtls_error(peer),
        CoapEvent::TcpConnected => handler.handle_tcp_connected(peer),
        CoapEvent::TcpClosed => handler.handle_tcp_closed(peer),
        CoapEvent::TcpFailed => handler.handle_tcp_failed(peer),
        CoapEvent::SessionConnected => handler.handle_session_connected(peer),
        CoapEvent::SessionClosed => handler.handle_session_closed(peer),
        CoapEvent::SessionFailed => handler.handle_session_failed(peer),
        CoapEvent::PartialBlock => handler.handle_partial_block(peer),
        CoapEvent::XmitBlockFail => handler.handle_xmit_block_fail(peer),
        CoapEvent::ServerSessionNew => handler.handle_server_session_new(peer),
        CoapEvent::ServerSessionDel => handler.handle_server_session_del(peer),
    }
}
