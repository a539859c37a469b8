// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * lib.rs - Main library entry point for the dots-coap crate.
 */

//! Peer validation, session teardown and observer bookkeeping for DOTS servers speaking CoAP over
//! DTLS.
//!
//! This crate does not implement CoAP or DTLS itself. Message encoding, the DTLS record layer and
//! the handshake are provided by the CoAP and TLS libraries in use, which this crate accesses
//! through a small set of traits (see the [session] module). On top of those, it provides:
//!
//! - [x] Verification result policy: accepting certain chain verification failures (expired
//!   certificates, self-signed certificates, missing or expired CRLs) if configured to
//! - [x] Peer identity validation during the handshake, using the DNS names from the Subject
//!   Alternative Name extension (or the Common Name as a fallback)
//! - [x] Common Name retrieval after the handshake
//! - [x] Session teardown on failed validation, deregistering event handlers before the session
//!   is released
//! - [x] Observer bookkeeping for observable resources and dispatching of notifications
//! - [x] Receiving row change notifications from the database
//!
//! # Features
//!
//! - `dtls-pki` (default): Enables [`DerCertificate`](crypto::pki::DerCertificate), i.e., parsing
//!   of DER and PEM encoded X.509 peer certificates.
//!
//! # Logging
//!
//! Log messages are emitted using the [log] facade. Rejected certificates are logged with level
//! `warn` or `error`, details on validation and session handling with level `debug`.
//!
//! # Example
//!
//! ```
//! use dots_coap::{protocol::BlockParams, CoapResource, CoapSubscriber, ObserverNotifier};
//!
//! let mut resource = CoapResource::new("mitigate", Some("mitigation data"));
//! resource.add_subscriber(CoapSubscriber::new(vec![0x01], BlockParams::new(0, false, 6)?).with_query(b"cuid=abc".to_vec()));
//! resource.add_subscriber(CoapSubscriber::new(vec![0x02], BlockParams::new(0, false, 4)?));
//! assert!(resource.has_subscribers());
//! assert_eq!(resource.token_of_first_subscriber().as_deref(), Some(&[0x02][..]));
//! assert_eq!(resource.block_size_of_first_subscriber(), Some(4));
//!
//! // Notify only the observers registered with the given query.
//! let mut notifier = ObserverNotifier::new();
//! assert_eq!(resource.mark_dirty(b"cuid=abc", &mut notifier), 1);
//! assert!(!resource.is_dirty());
//! # Ok::<(), dots_coap::error::OptionValueError>(())
//! ```

pub use context::CoapContext;
pub use event::{CoapEvent, CoapEventHandler};
pub use resource::{CoapResource, CoapSubscriber, NotificationDispatcher, ObserveNotification, ObserverNotifier};

mod context;
pub mod crypto;
pub mod error;
mod event;
pub mod notification;
pub mod protocol;
mod resource;
pub mod session;
