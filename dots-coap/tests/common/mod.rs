// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * tests/common/mod.rs - Common code for integration tests.
 */

#![allow(dead_code)]

use std::{cell::RefCell, net::SocketAddr, rc::Rc};

use dots_coap::{
    crypto::pki::{AllowancePolicy, HasAllowancePolicy, PeerCertificate, SanEntry, VerificationOutcome},
    session::{DtlsSession, EventHandlerSlot, TlsConnection},
    CoapEventHandler, CoapResource, NotificationDispatcher,
};

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Side effects observed on the collaborators of a session, in the order they happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    SetEventHandler { registered: bool },
    Release,
}

pub(crate) type CallLog = Rc<RefCell<Vec<Call>>>;

/// Context handle that records changes to its event handler slot.
#[derive(Clone, Debug, Default)]
pub(crate) struct RecordingContext {
    pub log: CallLog,
}

impl EventHandlerSlot for RecordingContext {
    fn set_event_handler(&mut self, handler: Option<Box<dyn CoapEventHandler>>) {
        self.log.borrow_mut().push(Call::SetEventHandler {
            registered: handler.is_some(),
        });
    }
}

/// Certificate with scripted contents.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakeCertificate {
    pub sans: Option<Vec<SanEntry>>,
    pub cn: Option<String>,
}

impl FakeCertificate {
    pub fn with_dns_names(names: &[&str]) -> FakeCertificate {
        FakeCertificate {
            sans: Some(names.iter().map(|n| SanEntry::dns(n.as_bytes())).collect()),
            cn: None,
        }
    }

    pub fn with_common_name(cn: &str) -> FakeCertificate {
        FakeCertificate {
            sans: None,
            cn: Some(cn.to_string()),
        }
    }
}

impl PeerCertificate for FakeCertificate {
    fn subject_alt_names(&self) -> Option<Vec<SanEntry>> {
        self.sans.clone()
    }

    fn common_name(&self) -> Option<String> {
        self.cn.clone()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct FakeConnection {
    pub outcome: VerificationOutcome,
    pub certificate: Option<FakeCertificate>,
}

impl TlsConnection for FakeConnection {
    type Certificate = FakeCertificate;

    fn verify_result(&self) -> VerificationOutcome {
        self.outcome
    }

    fn peer_certificate(&self) -> Option<&FakeCertificate> {
        self.certificate.as_ref()
    }
}

/// Session with a scripted TLS connection that records its release in the context's call log.
#[derive(Debug)]
pub(crate) struct FakeSession {
    pub connection: Option<FakeConnection>,
    pub context: RecordingContext,
    pub policy: AllowancePolicy,
}

impl FakeSession {
    pub fn new() -> FakeSession {
        FakeSession {
            connection: None,
            context: RecordingContext::default(),
            policy: AllowancePolicy::default(),
        }
    }

    pub fn with_connection(outcome: VerificationOutcome, certificate: Option<FakeCertificate>) -> FakeSession {
        FakeSession {
            connection: Some(FakeConnection { outcome, certificate }),
            ..FakeSession::new()
        }
    }

    pub fn log(&self) -> CallLog {
        Rc::clone(&self.context.log)
    }
}

impl DtlsSession for FakeSession {
    type Connection = FakeConnection;
    type Context = RecordingContext;

    fn tls_connection(&self) -> Option<&FakeConnection> {
        self.connection.as_ref()
    }

    fn context(&self) -> RecordingContext {
        self.context.clone()
    }

    fn release(self) {
        self.context.log.borrow_mut().push(Call::Release);
    }
}

impl HasAllowancePolicy for FakeSession {
    fn allowance_policy(&self) -> AllowancePolicy {
        self.policy
    }
}

/// Event handler that records the peers of the events it received.
#[derive(Debug, Default)]
pub(crate) struct RecordingEventHandler {
    pub connected: Rc<RefCell<Vec<SocketAddr>>>,
    pub errors: Rc<RefCell<Vec<SocketAddr>>>,
}

impl CoapEventHandler for RecordingEventHandler {
    fn handle_dtls_connected(&mut self, peer: SocketAddr) {
        self.connected.borrow_mut().push(peer);
    }

    fn handle_dtls_error(&mut self, peer: SocketAddr) {
        self.errors.borrow_mut().push(peer);
    }
}

/// Dispatcher that records the resources and queries it was asked to notify.
#[derive(Debug, Default)]
pub(crate) struct RecordingDispatcher {
    pub calls: Vec<(String, Option<Vec<u8>>)>,
}

impl<D> NotificationDispatcher<D> for RecordingDispatcher {
    type Status = bool;

    fn notify(&mut self, resource: &mut CoapResource<D>, query: Option<&[u8]>) -> bool {
        self.calls
            .push((resource.uri_path().to_string(), query.map(|q| q.to_vec())));
        true
    }
}
