// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * crypto/pki/common_name.rs - Retrieval of the peer's Common Name after the handshake.
 */

use log::warn;

use crate::{
    crypto::pki::{HasAllowancePolicy, PeerCertificate, VerificationResolution},
    error::CommonNameError,
    session::{DtlsSession, TlsConnection},
};

/// Copies the Common Name of the session peer's certificate into `buffer`, followed by a NUL
/// terminator, and returns its length (excluding the terminator).
///
/// The TLS library's chain verification result is re-checked against the session's
/// [`AllowancePolicy`](crate::crypto::pki::AllowancePolicy) first.
///
/// # Errors
///
/// - [`CommonNameError::NoTlsState`] if the session has no (D)TLS connection.
/// - [`CommonNameError::CertificateRejected`] if the verification result is not acceptable.
/// - [`CommonNameError::NoPeerCertificate`] if the peer did not present a certificate.
/// - [`CommonNameError::FieldNotFound`] if the certificate subject has no Common Name.
/// - [`CommonNameError::BufferTooSmall`] if `buffer` cannot hold the Common Name and the
///   terminator. `buffer` is left untouched in this case.
pub fn get_common_name<S>(session: &S, buffer: &mut [u8]) -> Result<usize, CommonNameError>
where
    S: DtlsSession + HasAllowancePolicy,
{
    let cn = peer_common_name(session)?;
    let required = cn.len() + 1;
    if buffer.len() < required {
        return Err(CommonNameError::BufferTooSmall {
            required,
            capacity: buffer.len(),
        });
    }
    buffer[..cn.len()].copy_from_slice(cn.as_bytes());
    buffer[cn.len()] = 0;
    Ok(cn.len())
}

/// Returns the Common Name of the session peer's certificate.
///
/// Performs the same checks as [`get_common_name`], apart from the buffer size check.
pub fn peer_common_name<S>(session: &S) -> Result<String, CommonNameError>
where
    S: DtlsSession + HasAllowancePolicy,
{
    let connection = session.tls_connection().ok_or(CommonNameError::NoTlsState)?;
    if let VerificationResolution::Rejected(outcome) = session.allowance_policy().resolve(connection.verify_result()) {
        warn!("peer certificate verification failed: {}", outcome.reason());
        return Err(CommonNameError::CertificateRejected(outcome));
    }
    let cert = connection.peer_certificate().ok_or(CommonNameError::NoPeerCertificate)?;
    cert.common_name().ok_or(CommonNameError::FieldNotFound)
}
