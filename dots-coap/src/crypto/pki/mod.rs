// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * crypto/pki/mod.rs - Peer certificate validation for DTLS (PKI) sessions.
 */

//! Types and functions for validating peers of DTLS sessions using a public key infrastructure.
//!
//! # Example
//!
//! ```
//! use dots_coap::crypto::pki::{
//!     extract, AllowedIdentities, IdentityMatcher, PeerCertificate, SanEntry,
//! };
//!
//! #[derive(Debug)]
//! struct Cert;
//!
//! impl PeerCertificate for Cert {
//!     fn subject_alt_names(&self) -> Option<Vec<SanEntry>> {
//!         Some(vec![SanEntry::dns("a.example.com"), SanEntry::dns("b.example.com")])
//!     }
//!
//!     fn common_name(&self) -> Option<String> {
//!         None
//!     }
//! }
//!
//! let allowed: AllowedIdentities = ["b.example.com"].into_iter().collect();
//! let matched = extract(&Cert, "").find(|candidate| allowed.matches(candidate, 0));
//! assert_eq!(matched.map(|c| c.name().to_string()), Some("b.example.com".to_string()));
//! ```

mod cert;
mod common_name;
mod identity;
mod validator;
mod verify;
#[cfg(feature = "dtls-pki")]
mod x509;

pub use cert::{PeerCertificate, SanEntry};
pub use common_name::{get_common_name, peer_common_name};
pub use identity::{extract, IdentityCandidate, IdentityCandidates, IdentitySource};
pub use validator::{AllowedIdentities, IdentityMatcher, PeerIdentityValidator, ValidationVerdict, CA_DEPTH};
pub use verify::{raw, resolve, AllowancePolicy, HasAllowancePolicy, VerificationOutcome, VerificationResolution};
#[cfg(feature = "dtls-pki")]
pub use x509::DerCertificate;
