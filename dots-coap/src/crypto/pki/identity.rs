// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * crypto/pki/identity.rs - Extraction of candidate peer identities from certificates.
 */

use std::fmt::{Display, Formatter};

use log::debug;

use crate::crypto::pki::{PeerCertificate, SanEntry};

/// Certificate field an [`IdentityCandidate`] was taken from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IdentitySource {
    /// A `dNSName` entry of the Subject Alternative Name extension.
    SubjectAltName,
    /// The subject's Common Name (only used if the certificate has no SAN extension).
    CommonName,
}

/// An identity presented by a peer certificate, offered to an identity matcher.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdentityCandidate {
    name: String,
    source: IdentitySource,
}

impl IdentityCandidate {
    pub fn new(name: impl Into<String>, source: IdentitySource) -> IdentityCandidate {
        IdentityCandidate {
            name: name.into(),
            source,
        }
    }

    /// Returns the identity text (DNS name or Common Name).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> IdentitySource {
        self.source
    }
}

impl Display for IdentityCandidate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Single-pass sequence of identity candidates produced by [`extract`].
#[derive(Debug)]
pub struct IdentityCandidates {
    state: CandidateState,
}

#[derive(Debug)]
enum CandidateState {
    SubjectAltNames(std::vec::IntoIter<SanEntry>),
    Fallback(Option<String>),
}

impl Iterator for IdentityCandidates {
    type Item = IdentityCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            CandidateState::SubjectAltNames(entries) => entries.find_map(dns_candidate),
            CandidateState::Fallback(cn) => cn
                .take()
                .map(|cn| IdentityCandidate::new(cn, IdentitySource::CommonName)),
        }
    }
}

/// Converts a SAN entry into a candidate, skipping non-DNS entries and entries whose declared
/// length does not match their text length.
fn dns_candidate(entry: SanEntry) -> Option<IdentityCandidate> {
    let SanEntry::Dns(raw) = entry else {
        return None;
    };
    let natural_len = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
    if natural_len != raw.len() {
        debug!(
            "skipping SAN dNSName with embedded NUL (declared length {}, actual length {})",
            raw.len(),
            natural_len
        );
        return None;
    }
    match String::from_utf8(raw.into_vec()) {
        Ok(name) => Some(IdentityCandidate::new(name, IdentitySource::SubjectAltName)),
        Err(_) => {
            debug!("skipping SAN dNSName that is not valid text");
            None
        },
    }
}

/// Extracts the identities a peer certificate presents.
///
/// If the certificate has a Subject Alternative Name extension, its `dNSName` entries are
/// returned in certificate order, skipping entries with embedded NUL bytes. Otherwise,
/// `cn_fallback` (the Common Name provided by the TLS library) is the only candidate.
///
/// A SAN extension without usable `dNSName` entries yields no candidates at all, there is no
/// fallback to the Common Name in that case.
pub fn extract<C: PeerCertificate + ?Sized>(cert: &C, cn_fallback: &str) -> IdentityCandidates {
    let state = match cert.subject_alt_names() {
        Some(entries) => CandidateState::SubjectAltNames(entries.into_iter()),
        None => CandidateState::Fallback(Some(cn_fallback.to_owned())),
    };
    IdentityCandidates { state }
}
