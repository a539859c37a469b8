// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * crypto/pki/validator.rs - Peer identity validation during the DTLS handshake.
 */

use log::{debug, error};

#[cfg(feature = "dtls-pki")]
use crate::crypto::pki::DerCertificate;
use crate::{
    crypto::pki::{extract, IdentityCandidate, PeerCertificate},
    error::IdentityValidationError,
    session::{DtlsSession, SessionHandle},
};

/// Chain depth of the certificate authority that issued the peer's certificate.
///
/// Validation callbacks for this depth are accepted without looking at the certificate.
pub const CA_DEPTH: u32 = 1;

/// Policy that decides whether an identity presented by a peer certificate is acceptable.
///
/// Implemented for all closures taking a candidate and the chain depth.
pub trait IdentityMatcher {
    /// Returns whether `candidate`, presented by the certificate at chain depth `depth`, is
    /// acceptable.
    fn matches(&self, candidate: &IdentityCandidate, depth: u32) -> bool;
}

impl<F: Fn(&IdentityCandidate, u32) -> bool> IdentityMatcher for F {
    fn matches(&self, candidate: &IdentityCandidate, depth: u32) -> bool {
        self(candidate, depth)
    }
}

/// Ordered allow-list of peer identities (DNS names or Common Names).
///
/// A candidate matches if its text is equal to one of the entries, regardless of chain depth.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllowedIdentities {
    identities: Vec<String>,
}

impl AllowedIdentities {
    pub fn new() -> AllowedIdentities {
        AllowedIdentities::default()
    }

    /// Appends `identity` to the end of the list.
    pub fn push(&mut self, identity: impl Into<String>) {
        self.identities.push(identity.into());
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.identities.iter().any(|allowed| allowed == identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.identities.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowedIdentities {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        AllowedIdentities {
            identities: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for AllowedIdentities {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        self.identities.extend(iter.into_iter().map(Into::into))
    }
}

impl IdentityMatcher for AllowedIdentities {
    fn matches(&self, candidate: &IdentityCandidate, _depth: u32) -> bool {
        self.contains(candidate.name())
    }
}

/// Successful outcome of a peer identity check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationVerdict {
    /// The certificate belongs to the issuing certificate authority and was not inspected.
    Skipped,
    /// The given identity was accepted by the matcher.
    Matched(IdentityCandidate),
}

/// Validates the identities of DTLS peers using an [`IdentityMatcher`].
///
/// Intended to be called from the TLS library's certificate validation callback, once for each
/// certificate in the peer's chain.
#[derive(Clone, Debug)]
pub struct PeerIdentityValidator<M: IdentityMatcher> {
    matcher: M,
}

impl<M: IdentityMatcher> PeerIdentityValidator<M> {
    pub fn new(matcher: M) -> PeerIdentityValidator<M> {
        PeerIdentityValidator { matcher }
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Checks the identities presented by `cert` at chain depth `depth`.
    ///
    /// For [`CA_DEPTH`], the check is skipped. Otherwise, the candidates produced by
    /// [`extract`] are offered to the matcher in order, stopping at the first match.
    ///
    /// # Errors
    ///
    /// Will return [`IdentityValidationError::InvalidCertificate`] if no certificate is given
    /// (outside of [`CA_DEPTH`]) and [`IdentityValidationError::NoMatchingIdentity`] if no
    /// candidate was accepted, including the case where the certificate presents none.
    pub fn check_certificate<C: PeerCertificate + ?Sized>(
        &self,
        cert: Option<&C>,
        cn: &str,
        depth: u32,
    ) -> Result<ValidationVerdict, IdentityValidationError> {
        if depth == CA_DEPTH {
            return Ok(ValidationVerdict::Skipped);
        }
        let cert = cert.ok_or(IdentityValidationError::InvalidCertificate)?;
        extract(cert, cn)
            .find(|candidate| self.matcher.matches(candidate, depth))
            .map(ValidationVerdict::Matched)
            .ok_or(IdentityValidationError::NoMatchingIdentity)
    }

    /// Validates `cert` and tears down the session if it is rejected.
    ///
    /// Returns `true` if the certificate is accepted. Otherwise, the session's context event
    /// handler is deregistered, the session is released and `false` is returned.
    ///
    /// Sessions that were already released through `session` are always rejected.
    pub fn validate_certificate<C, S>(
        &self,
        cert: Option<&C>,
        cn: &str,
        depth: u32,
        session: &mut SessionHandle<S>,
    ) -> bool
    where
        C: PeerCertificate + ?Sized,
        S: DtlsSession,
    {
        if session.is_released() {
            debug!("rejecting peer certificate at depth {}: session was already released", depth);
            return false;
        }
        let guard = session.release_guard();
        match self.check_certificate(cert, cn, depth) {
            Ok(verdict) => {
                debug!("accepted peer certificate at depth {}: {:?}", depth, verdict);
                guard.disarm();
                true
            },
            Err(e) => {
                debug!("{}", e);
                error!("Terminate the communication attempt with a bad certificate error");
                drop(guard);
                false
            },
        }
    }

    /// Validates a DER encoded peer certificate, as provided to the TLS library's validation
    /// callback.
    ///
    /// Certificates that cannot be parsed are rejected, except at [`CA_DEPTH`] where the
    /// certificate is never looked at.
    #[cfg(feature = "dtls-pki")]
    pub fn validate<S: DtlsSession>(
        &self,
        cn: &str,
        asn1_public_cert: &[u8],
        session: &mut SessionHandle<S>,
        depth: u32,
    ) -> bool {
        let cert = if depth == CA_DEPTH {
            None
        } else {
            DerCertificate::from_der(asn1_public_cert)
                .map_err(|e| debug!("unable to parse peer certificate: {}", e))
                .ok()
        };
        self.validate_certificate(cert.as_ref(), cn, depth, session)
    }
}
