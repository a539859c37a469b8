// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * crypto/pki/verify.rs - Chain verification outcomes and the allowance policy applied to them.
 */

use std::fmt::{Display, Formatter};

use serde::Deserialize;

/// Raw verification result codes as reported by OpenSSL-compatible TLS libraries
/// (`X509_V_OK`, `X509_V_ERR_*`).
pub mod raw {
    pub const X509_V_OK: i64 = 0;
    pub const X509_V_ERR_UNABLE_TO_GET_ISSUER_CERT: i64 = 2;
    pub const X509_V_ERR_UNABLE_TO_GET_CRL: i64 = 3;
    pub const X509_V_ERR_CERT_SIGNATURE_FAILURE: i64 = 7;
    pub const X509_V_ERR_CERT_NOT_YET_VALID: i64 = 9;
    pub const X509_V_ERR_CERT_HAS_EXPIRED: i64 = 10;
    pub const X509_V_ERR_CRL_NOT_YET_VALID: i64 = 11;
    pub const X509_V_ERR_CRL_HAS_EXPIRED: i64 = 12;
    pub const X509_V_ERR_DEPTH_ZERO_SELF_SIGNED_CERT: i64 = 18;
    pub const X509_V_ERR_SELF_SIGNED_CERT_IN_CHAIN: i64 = 19;
    pub const X509_V_ERR_UNABLE_TO_GET_ISSUER_CERT_LOCALLY: i64 = 20;
    pub const X509_V_ERR_UNABLE_TO_VERIFY_LEAF_SIGNATURE: i64 = 21;
    pub const X509_V_ERR_CERT_REVOKED: i64 = 23;
}

/// Outcome of the TLS library's certificate chain verification.
///
/// The variants that can be overridden by an [`AllowancePolicy`] are modelled explicitly, every
/// other result code is carried as [`VerificationOutcome::Other`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VerificationOutcome {
    Ok,
    CertNotYetValid,
    CertExpired,
    SelfSignedInChain,
    UnableToGetCrl,
    CrlNotYetValid,
    CrlExpired,
    Other(i64),
}

impl VerificationOutcome {
    /// Converts a raw `X509_V_*` result code into a verification outcome.
    pub fn from_raw(code: i64) -> VerificationOutcome {
        match code {
            raw::X509_V_OK => VerificationOutcome::Ok,
            raw::X509_V_ERR_CERT_NOT_YET_VALID => VerificationOutcome::CertNotYetValid,
            raw::X509_V_ERR_CERT_HAS_EXPIRED => VerificationOutcome::CertExpired,
            raw::X509_V_ERR_SELF_SIGNED_CERT_IN_CHAIN => VerificationOutcome::SelfSignedInChain,
            raw::X509_V_ERR_UNABLE_TO_GET_CRL => VerificationOutcome::UnableToGetCrl,
            raw::X509_V_ERR_CRL_NOT_YET_VALID => VerificationOutcome::CrlNotYetValid,
            raw::X509_V_ERR_CRL_HAS_EXPIRED => VerificationOutcome::CrlExpired,
            v => VerificationOutcome::Other(v),
        }
    }

    /// Returns the raw `X509_V_*` result code for this outcome.
    pub fn to_raw(self) -> i64 {
        match self {
            VerificationOutcome::Ok => raw::X509_V_OK,
            VerificationOutcome::CertNotYetValid => raw::X509_V_ERR_CERT_NOT_YET_VALID,
            VerificationOutcome::CertExpired => raw::X509_V_ERR_CERT_HAS_EXPIRED,
            VerificationOutcome::SelfSignedInChain => raw::X509_V_ERR_SELF_SIGNED_CERT_IN_CHAIN,
            VerificationOutcome::UnableToGetCrl => raw::X509_V_ERR_UNABLE_TO_GET_CRL,
            VerificationOutcome::CrlNotYetValid => raw::X509_V_ERR_CRL_NOT_YET_VALID,
            VerificationOutcome::CrlExpired => raw::X509_V_ERR_CRL_HAS_EXPIRED,
            VerificationOutcome::Other(v) => v,
        }
    }

    /// Returns the human-readable reason for this outcome, worded like the TLS library does.
    pub fn reason(&self) -> &'static str {
        match self {
            VerificationOutcome::Ok => "ok",
            VerificationOutcome::CertNotYetValid => "certificate is not yet valid",
            VerificationOutcome::CertExpired => "certificate has expired",
            VerificationOutcome::SelfSignedInChain => "self-signed certificate in certificate chain",
            VerificationOutcome::UnableToGetCrl => "unable to get certificate CRL",
            VerificationOutcome::CrlNotYetValid => "CRL is not yet valid",
            VerificationOutcome::CrlExpired => "CRL has expired",
            VerificationOutcome::Other(raw::X509_V_ERR_UNABLE_TO_GET_ISSUER_CERT) => {
                "unable to get issuer certificate"
            },
            VerificationOutcome::Other(raw::X509_V_ERR_CERT_SIGNATURE_FAILURE) => "certificate signature failure",
            VerificationOutcome::Other(raw::X509_V_ERR_DEPTH_ZERO_SELF_SIGNED_CERT) => "self-signed certificate",
            VerificationOutcome::Other(raw::X509_V_ERR_UNABLE_TO_GET_ISSUER_CERT_LOCALLY) => {
                "unable to get local issuer certificate"
            },
            VerificationOutcome::Other(raw::X509_V_ERR_UNABLE_TO_VERIFY_LEAF_SIGNATURE) => {
                "unable to verify the first certificate"
            },
            VerificationOutcome::Other(raw::X509_V_ERR_CERT_REVOKED) => "certificate revoked",
            VerificationOutcome::Other(_) => "unknown certificate verification error",
        }
    }
}

impl From<i64> for VerificationOutcome {
    fn from(code: i64) -> Self {
        VerificationOutcome::from_raw(code)
    }
}

impl Display for VerificationOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.reason(), self.to_raw())
    }
}

/// Result of applying an [`AllowancePolicy`] to a [`VerificationOutcome`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VerificationResolution {
    Accepted,
    /// Rejected, carrying the unchanged outcome that caused the rejection.
    Rejected(VerificationOutcome),
}

impl VerificationResolution {
    pub fn is_accepted(&self) -> bool {
        matches!(self, VerificationResolution::Accepted)
    }
}

/// Set of verification failures a session is configured to tolerate.
///
/// An `AllowancePolicy` is immutable once it is attached to a session's TLS configuration.
/// It is created using its consuming builder methods or deserialized from a configuration file,
/// in which case every allowance not mentioned defaults to `false`.
///
/// ```
/// use dots_coap::crypto::pki::{AllowancePolicy, VerificationOutcome, VerificationResolution};
///
/// let policy = AllowancePolicy::new().allow_expired_certs(true);
/// assert_eq!(policy.resolve(VerificationOutcome::CertExpired), VerificationResolution::Accepted);
/// assert!(!policy.resolve(VerificationOutcome::CrlExpired).is_accepted());
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct AllowancePolicy {
    allow_expired_certs: bool,
    allow_self_signed: bool,
    allow_no_crl: bool,
    allow_expired_crl: bool,
}

impl AllowancePolicy {
    /// Creates a policy that tolerates no verification failures.
    pub fn new() -> AllowancePolicy {
        AllowancePolicy::default()
    }

    /// Allows or disallows certificates that are expired or not yet valid.
    pub fn allow_expired_certs(mut self, allow_expired_certs: bool) -> Self {
        self.allow_expired_certs = allow_expired_certs;
        self
    }

    /// Allows or disallows self-signed certificates in the peer's chain.
    pub fn allow_self_signed(mut self, allow_self_signed: bool) -> Self {
        self.allow_self_signed = allow_self_signed;
        self
    }

    /// Allows or disallows certificates for which no CRL could be obtained.
    pub fn allow_no_crl(mut self, allow_no_crl: bool) -> Self {
        self.allow_no_crl = allow_no_crl;
        self
    }

    /// Allows or disallows CRLs that are expired or not yet valid.
    pub fn allow_expired_crl(mut self, allow_expired_crl: bool) -> Self {
        self.allow_expired_crl = allow_expired_crl;
        self
    }

    pub fn allows_expired_certs(&self) -> bool {
        self.allow_expired_certs
    }

    pub fn allows_self_signed(&self) -> bool {
        self.allow_self_signed
    }

    pub fn allows_no_crl(&self) -> bool {
        self.allow_no_crl
    }

    pub fn allows_expired_crl(&self) -> bool {
        self.allow_expired_crl
    }

    /// Maps a chain verification outcome to an accept/reject decision.
    ///
    /// Expired/not yet valid certificates, self-signed certificates in the chain, missing CRLs and
    /// expired/not yet valid CRLs are accepted if the respective allowance is set. [`Ok`] is always
    /// accepted, every other outcome is always rejected.
    ///
    /// [`Ok`]: VerificationOutcome::Ok
    pub fn resolve(&self, outcome: VerificationOutcome) -> VerificationResolution {
        let accepted = match outcome {
            VerificationOutcome::Ok => true,
            VerificationOutcome::CertNotYetValid | VerificationOutcome::CertExpired => self.allow_expired_certs,
            VerificationOutcome::SelfSignedInChain => self.allow_self_signed,
            VerificationOutcome::UnableToGetCrl => self.allow_no_crl,
            VerificationOutcome::CrlNotYetValid | VerificationOutcome::CrlExpired => self.allow_expired_crl,
            VerificationOutcome::Other(_) => false,
        };
        if accepted {
            VerificationResolution::Accepted
        } else {
            VerificationResolution::Rejected(outcome)
        }
    }
}

/// Applies `policy` to `outcome`, see [`AllowancePolicy::resolve`].
pub fn resolve(outcome: VerificationOutcome, policy: &AllowancePolicy) -> VerificationResolution {
    policy.resolve(outcome)
}

/// Capability of sessions (or their TLS configuration) that carry an [`AllowancePolicy`].
pub trait HasAllowancePolicy {
    /// Returns the allowance policy configured for this session.
    fn allowance_policy(&self) -> AllowancePolicy;
}

impl HasAllowancePolicy for AllowancePolicy {
    fn allowance_policy(&self) -> AllowancePolicy {
        *self
    }
}
