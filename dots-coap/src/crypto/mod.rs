// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * crypto/mod.rs - Peer authentication for DTLS protected CoAP sessions.
 */

//! Cryptography-related interfaces and types.
//!
//! DOTS agents authenticate each other using (D)TLS with a public key infrastructure (PKI): each
//! peer presents an X.509 certificate signed by a certificate authority, which is verified by the
//! TLS library against a set of configured root certificate authorities.
//!
//! The TLS library performs the chain verification itself. This crate covers what happens around
//! it:
//! - deciding whether a verification outcome is acceptable under a configured
//!   [`AllowancePolicy`](pki::AllowancePolicy) (e.g., tolerating expired CRLs),
//! - extracting the identities a peer certificate presents and matching them against an
//!   application-defined [`IdentityMatcher`](pki::IdentityMatcher) during the handshake,
//! - retrieving the peer's Common Name after the handshake, see
//!   [`get_common_name`](pki::get_common_name).
//!
//! Support for parsing DER and PEM encoded certificates requires the `dtls-pki` feature (enabled
//! by default). Without it, certificates must be provided through the
//! [`PeerCertificate`](pki::PeerCertificate) trait.

pub mod pki;
