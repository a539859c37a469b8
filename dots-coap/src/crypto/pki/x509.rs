// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * crypto/pki/x509.rs - X.509 backend for peer certificate access.
 */

use log::warn;
use x509_parser::{certificate::X509Certificate, extensions::GeneralName, pem::parse_x509_pem};

use crate::crypto::pki::{PeerCertificate, SanEntry};
use crate::error::CertificateParseError;

const UNIVERSAL_STRING_TAG: u32 = 28;
const BMP_STRING_TAG: u32 = 30;

/// A DER encoded X.509 certificate, e.g. the `asn1_public_cert` a TLS library provides to its
/// certificate validation callback.
///
/// The encoding is checked on construction, accessors parse the stored bytes on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerCertificate {
    der: Box<[u8]>,
}

impl DerCertificate {
    /// Creates a certificate from its DER encoding.
    ///
    /// # Errors
    ///
    /// Will return [`CertificateParseError::InvalidDer`] if the bytes are not a valid X.509
    /// certificate.
    pub fn from_der(der: impl Into<Vec<u8>>) -> Result<DerCertificate, CertificateParseError> {
        let der = der.into().into_boxed_slice();
        x509_parser::parse_x509_certificate(&der).map_err(|_| CertificateParseError::InvalidDer)?;
        Ok(DerCertificate { der })
    }

    /// Creates a certificate from the first PEM block in `pem`.
    ///
    /// # Errors
    ///
    /// Will return [`CertificateParseError::InvalidPem`] if no PEM block could be read and
    /// [`CertificateParseError::InvalidDer`] if the block does not contain a valid certificate.
    pub fn from_pem(pem: impl AsRef<[u8]>) -> Result<DerCertificate, CertificateParseError> {
        let (_, pem) = parse_x509_pem(pem.as_ref()).map_err(|_| CertificateParseError::InvalidPem)?;
        DerCertificate::from_der(pem.contents)
    }

    /// Returns the DER encoding of this certificate.
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    fn parsed(&self) -> Option<X509Certificate<'_>> {
        x509_parser::parse_x509_certificate(&self.der)
            .ok()
            .map(|(_, cert)| cert)
    }
}

impl PeerCertificate for DerCertificate {
    fn subject_alt_names(&self) -> Option<Vec<SanEntry>> {
        let Some(cert) = self.parsed() else {
            return Some(Vec::new());
        };
        match cert.subject_alternative_name() {
            Ok(Some(san)) => Some(
                san.value
                    .general_names
                    .iter()
                    .map(|name| match name {
                        GeneralName::DNSName(dns) => SanEntry::dns(dns.as_bytes()),
                        _ => SanEntry::Other,
                    })
                    .collect(),
            ),
            Ok(None) => None,
            // A broken or duplicated extension must not make us fall back to the common name.
            Err(e) => {
                warn!("unable to read subject alternative names of peer certificate: {}", e);
                Some(Vec::new())
            },
        }
    }

    fn common_name(&self) -> Option<String> {
        let cert = self.parsed()?;
        let cn = cert.subject().iter_common_name().next()?;
        if let Ok(text) = cn.as_str() {
            return Some(text.to_owned());
        }
        // Wide string types are not covered by `as_str`.
        let value = cn.attr_value();
        let text: String = match value.header.tag().0 {
            BMP_STRING_TAG => char::decode_utf16(
                value
                    .data
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]])),
            )
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect(),
            UNIVERSAL_STRING_TAG => value
                .data
                .chunks_exact(4)
                .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .map(|c| char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect(),
            _ => String::from_utf8_lossy(value.data).into_owned(),
        };
        Some(text)
    }
}

impl TryFrom<&[u8]> for DerCertificate {
    type Error = CertificateParseError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        DerCertificate::from_der(value)
    }
}
