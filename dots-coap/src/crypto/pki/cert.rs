// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * crypto/pki/cert.rs - Read-only access to peer certificates.
 */

use std::fmt::Debug;

/// A single entry of a certificate's Subject Alternative Name extension.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SanEntry {
    /// A `dNSName` entry.
    ///
    /// Contains the raw bytes of the entry as stored in the certificate, i.e., the length of this
    /// value is the *declared* length of the entry, which may include embedded NUL bytes.
    Dns(Box<[u8]>),
    /// Any other kind of general name (IP address, URI, e-mail, ...).
    Other,
}

impl SanEntry {
    /// Creates a DNS entry from the given bytes.
    pub fn dns(name: impl Into<Vec<u8>>) -> SanEntry {
        SanEntry::Dns(name.into().into_boxed_slice())
    }
}

/// Read-only view on a parsed peer certificate.
///
/// Peer certificates are owned by the TLS library for the duration of a handshake callback; the
/// validation code only ever reads from them.
pub trait PeerCertificate: Debug {
    /// Returns the entries of the Subject Alternative Name extension in the order they are stored
    /// in the certificate, or `None` if the certificate has no such extension.
    ///
    /// An extension that is present but contains no (usable) entries must be reported as
    /// `Some(vec![])`, not as `None`.
    fn subject_alt_names(&self) -> Option<Vec<SanEntry>>;

    /// Returns the text of the subject's Common Name field, if present.
    fn common_name(&self) -> Option<String>;
}

impl<T: PeerCertificate + ?Sized> PeerCertificate for &T {
    fn subject_alt_names(&self) -> Option<Vec<SanEntry>> {
        (**self).subject_alt_names()
    }

    fn common_name(&self) -> Option<String> {
        (**self).common_name()
    }
}

impl<T: PeerCertificate + ?Sized> PeerCertificate for Box<T> {
    fn subject_alt_names(&self) -> Option<Vec<SanEntry>> {
        (**self).subject_alt_names()
    }

    fn common_name(&self) -> Option<String> {
        (**self).common_name()
    }
}
