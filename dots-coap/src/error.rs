// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * error.rs - Error types for peer validation, session handling and observer bookkeeping.
 */

//! Error types

use thiserror::Error;

use crate::crypto::pki::VerificationOutcome;

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum CommonNameError {
    /// The session has no established (D)TLS connection object.
    #[error("CoAP common name retrieval error: session has no TLS state")]
    NoTlsState,
    /// The chain verification outcome was not accepted by the session's allowance policy.
    #[error("CoAP common name retrieval error: peer certificate rejected: {}", .0.reason())]
    CertificateRejected(VerificationOutcome),
    /// The peer did not present a certificate.
    #[error("CoAP common name retrieval error: peer presented no certificate")]
    NoPeerCertificate,
    /// The peer certificate's subject has no common name.
    #[error("CoAP common name retrieval error: common name field not found")]
    FieldNotFound,
    /// The provided buffer cannot hold the common name and its terminator.
    #[error(
        "CoAP common name retrieval error: buffer too small (need {} bytes, got {})",
        .required,
        .capacity
    )]
    BufferTooSmall { required: usize, capacity: usize },
}

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum IdentityValidationError {
    /// None of the identities presented by the peer certificate were accepted.
    #[error("CoAP peer identity validation error: no matching identity")]
    NoMatchingIdentity,
    /// The peer certificate could not be parsed.
    #[error("CoAP peer identity validation error: invalid peer certificate")]
    InvalidCertificate,
}

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionReleaseError {
    /// The session has already been released through this handle.
    #[error("CoAP session release error: session was already released")]
    AlreadyReleased,
}

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum CertificateParseError {
    /// Provided bytes are not a DER encoded X.509 certificate.
    #[error("certificate parse error: invalid DER encoded X.509 certificate")]
    InvalidDer,
    /// Provided bytes are not a PEM encoded X.509 certificate.
    #[error("certificate parse error: invalid PEM encoded X.509 certificate")]
    InvalidPem,
}

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum OptionValueError {
    /// Provided value for option is too long.
    #[error("CoAP option has invalid value: too long")]
    TooLong,
    /// Block size exponent outside of the range defined for CoAP over UDP (0..=6).
    #[error("CoAP option has invalid value: block size exponent {} out of range", .0)]
    InvalidBlockSizeExponent(u8),
}

#[derive(Error, Debug)]
pub enum NotificationError {
    /// Error on the underlying TCP stream.
    #[error("row change notification error: I/O error")]
    Io(#[from] std::io::Error),
    /// A notification could not be encoded or decoded.
    #[error("row change notification error: malformed JSON")]
    Json(#[from] serde_json::Error),
    /// A notification field did not contain the expected value type.
    #[error("row change notification error: field {} has an invalid value", .0)]
    InvalidField(&'static str),
}
