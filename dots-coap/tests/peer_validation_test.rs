// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * peer_validation_test.rs - Tests for peer identity validation during the handshake.
 */

use std::cell::{Cell, RefCell};

use dots_coap::{
    crypto::pki::{
        AllowedIdentities, IdentityCandidate, IdentityMatcher, IdentitySource, PeerIdentityValidator, SanEntry,
        ValidationVerdict, CA_DEPTH,
    },
    error::{IdentityValidationError, SessionReleaseError},
    session::SessionHandle,
};

use crate::common::{Call, FakeCertificate, FakeSession};

mod common;

const TEARDOWN: [Call; 2] = [Call::SetEventHandler { registered: false }, Call::Release];

#[test]
pub fn stops_at_first_matching_identity() {
    common::init_logging();
    let calls = Cell::new(0);
    let validator = PeerIdentityValidator::new(|candidate: &IdentityCandidate, _depth: u32| {
        calls.set(calls.get() + 1);
        candidate.name() == "b.example.com"
    });
    let cert = FakeCertificate::with_dns_names(&["a.example.com", "b.example.com", "c.example.com"]);
    let session = FakeSession::new();
    let log = session.log();
    let mut handle = SessionHandle::new(session);

    assert!(validator.validate_certificate(Some(&cert), "", 0, &mut handle));
    assert_eq!(calls.get(), 2);
    assert!(!handle.is_released());
    assert!(log.borrow().is_empty());
}

#[test]
pub fn falls_back_to_common_name() {
    let validator = PeerIdentityValidator::new(|candidate: &IdentityCandidate, _depth: u32| {
        candidate.source() == IdentitySource::CommonName && candidate.name() == "client1"
    });
    let cert = FakeCertificate::with_common_name("client1");
    let mut handle = SessionHandle::new(FakeSession::new());

    assert!(validator.validate_certificate(Some(&cert), "client1", 0, &mut handle));
    assert!(!handle.is_released());
    assert_eq!(
        validator.check_certificate(Some(&cert), "client1", 0),
        Ok(ValidationVerdict::Matched(IdentityCandidate::new(
            "client1",
            IdentitySource::CommonName
        )))
    );
}

#[test]
pub fn certificate_authority_depth_is_skipped() {
    let calls = Cell::new(0);
    let validator = PeerIdentityValidator::new(|_: &IdentityCandidate, _: u32| {
        calls.set(calls.get() + 1);
        false
    });
    let session = FakeSession::new();
    let log = session.log();
    let mut handle = SessionHandle::new(session);

    // Neither an empty SAN extension nor a missing certificate matter at this depth.
    let cert = FakeCertificate {
        sans: Some(Vec::new()),
        cn: None,
    };
    assert!(validator.validate_certificate(Some(&cert), "", CA_DEPTH, &mut handle));
    assert!(validator.validate_certificate(None::<&FakeCertificate>, "", CA_DEPTH, &mut handle));
    assert_eq!(
        validator.check_certificate(None::<&FakeCertificate>, "", CA_DEPTH),
        Ok(ValidationVerdict::Skipped)
    );
    assert_eq!(calls.get(), 0);
    assert!(log.borrow().is_empty());
}

#[test]
pub fn rejection_tears_down_session_once() {
    common::init_logging();
    let validator = PeerIdentityValidator::new(|_: &IdentityCandidate, _: u32| true);
    let cert = FakeCertificate {
        sans: Some(vec![SanEntry::Other, SanEntry::dns(&b"a.example.com\0"[..])]),
        cn: Some("client1".to_string()),
    };
    let session = FakeSession::new();
    let log = session.log();
    let mut handle = SessionHandle::new(session);

    assert!(!validator.validate_certificate(Some(&cert), "client1", 0, &mut handle));
    assert!(handle.is_released());
    assert_eq!(*log.borrow(), TEARDOWN);

    // A later rejection on the same handle must not release again.
    assert!(!validator.validate_certificate(Some(&cert), "client1", 0, &mut handle));
    assert_eq!(handle.release_on_failure(), Err(SessionReleaseError::AlreadyReleased));
    assert_eq!(*log.borrow(), TEARDOWN);
}

#[test]
pub fn released_session_rejects_every_later_certificate() {
    common::init_logging();
    let validator = PeerIdentityValidator::new(|_: &IdentityCandidate, _: u32| true);
    let session = FakeSession::new();
    let log = session.log();
    let mut handle = SessionHandle::new(session);

    assert!(!validator.validate_certificate(None::<&FakeCertificate>, "client1", 0, &mut handle));
    assert!(handle.is_released());

    // Neither the CA depth skip nor a matching leaf may revive the session.
    let cert = FakeCertificate::with_dns_names(&["a.example.com"]);
    assert!(!validator.validate_certificate(None::<&FakeCertificate>, "", CA_DEPTH, &mut handle));
    assert!(!validator.validate_certificate(Some(&cert), "", 0, &mut handle));
    assert_eq!(*log.borrow(), TEARDOWN);
}

#[test]
pub fn missing_certificate_is_rejected() {
    let validator = PeerIdentityValidator::new(|_: &IdentityCandidate, _: u32| true);
    assert_eq!(
        validator.check_certificate(None::<&FakeCertificate>, "client1", 0),
        Err(IdentityValidationError::InvalidCertificate)
    );

    let session = FakeSession::new();
    let log = session.log();
    let mut handle = SessionHandle::new(session);
    assert!(!validator.validate_certificate(None::<&FakeCertificate>, "client1", 2, &mut handle));
    assert_eq!(*log.borrow(), TEARDOWN);
}

#[test]
pub fn matcher_receives_chain_depth() {
    let depths = RefCell::new(Vec::new());
    let validator = PeerIdentityValidator::new(|_: &IdentityCandidate, depth: u32| {
        depths.borrow_mut().push(depth);
        false
    });
    let cert = FakeCertificate::with_dns_names(&["a.example.com"]);
    for depth in [0, 2, 3] {
        assert_eq!(
            validator.check_certificate(Some(&cert), "", depth),
            Err(IdentityValidationError::NoMatchingIdentity)
        );
    }
    assert_eq!(*depths.borrow(), vec![0, 2, 3]);
}

#[test]
pub fn allow_list_matches_exact_names() {
    let mut allowed: AllowedIdentities = ["client1", "b.example.com"].into_iter().collect();
    allowed.push("client2");
    assert_eq!(allowed.len(), 3);
    assert_eq!(allowed.iter().collect::<Vec<_>>(), vec!["client1", "b.example.com", "client2"]);

    let exact = IdentityCandidate::new("b.example.com", IdentitySource::SubjectAltName);
    let suffix = IdentityCandidate::new("x.b.example.com", IdentitySource::SubjectAltName);
    assert!(allowed.matches(&exact, 0));
    assert!(!allowed.matches(&suffix, 0));

    let validator = PeerIdentityValidator::new(allowed);
    let mut handle = SessionHandle::new(FakeSession::new());
    let cert = FakeCertificate::with_dns_names(&["a.example.com", "b.example.com"]);
    assert!(validator.validate_certificate(Some(&cert), "", 0, &mut handle));
    assert!(validator.matcher().contains("client2"));
}

#[cfg(feature = "dtls-pki")]
mod x509 {
    use dots_coap::{
        crypto::pki::{AllowedIdentities, PeerIdentityValidator, CA_DEPTH},
        session::SessionHandle,
    };
    use rcgen::{Certificate, CertificateParams};

    use crate::{common::FakeSession, TEARDOWN};

    fn leaf_der(dns_names: &[&str]) -> Vec<u8> {
        let params = CertificateParams::new(dns_names.iter().map(|n| n.to_string()).collect::<Vec<_>>());
        Certificate::from_params(params).unwrap().serialize_der().unwrap()
    }

    #[test]
    pub fn validates_der_certificates() {
        let validator = PeerIdentityValidator::new(["peer.example.com"].into_iter().collect::<AllowedIdentities>());
        let mut handle = SessionHandle::new(FakeSession::new());
        assert!(validator.validate("", &leaf_der(&["peer.example.com"]), &mut handle, 0));
        assert!(!handle.is_released());

        let session = FakeSession::new();
        let log = session.log();
        let mut handle = SessionHandle::new(session);
        assert!(!validator.validate("peer.example.com", &leaf_der(&["other.example.com"]), &mut handle, 0));
        assert_eq!(*log.borrow(), TEARDOWN);
    }

    #[test]
    pub fn malformed_der_is_only_accepted_at_certificate_authority_depth() {
        let validator = PeerIdentityValidator::new(["client1"].into_iter().collect::<AllowedIdentities>());

        let session = FakeSession::new();
        let log = session.log();
        let mut handle = SessionHandle::new(session);
        assert!(validator.validate("client1", &[0xde, 0xad, 0xbe, 0xef], &mut handle, CA_DEPTH));
        assert!(validator.validate("client1", &[], &mut handle, CA_DEPTH));
        assert!(log.borrow().is_empty());

        assert!(!validator.validate("client1", &[0xde, 0xad, 0xbe, 0xef], &mut handle, 0));
        assert_eq!(*log.borrow(), TEARDOWN);
    }
}
