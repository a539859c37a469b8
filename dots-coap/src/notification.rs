// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * notification.rs - Row change notifications sent by the database to the server.
 */

//! Channel for database row change notifications.
//!
//! The database informs the DOTS server about changed mitigation rows by writing one JSON object
//! per change to a TCP connection, e.g.:
//!
//! ```text
//! {"id":"12","cid":"1","cuid":"dz6pHjaADkaFTbjr0JGBpw","mid":"123","status":"2"}
//! ```
//!
//! All values are encoded as JSON strings, and consecutive objects are not separated. The server
//! typically reacts to a change by calling [`CoapResource::mark_dirty`](crate::CoapResource::mark_dirty)
//! on the affected resource.

use std::{
    io::Write,
    net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs},
};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{de::IoRead, StreamDeserializer};

use crate::error::NotificationError;

fn default_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9999))
}

/// Configuration of the notification channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NotifierConfig {
    /// Address of the server accepting notifications.
    #[serde(default = "default_address")]
    pub address: SocketAddr,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        NotifierConfig {
            address: default_address(),
        }
    }
}

/// A change of a mitigation row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowChange {
    /// Row id.
    pub id: i64,
    /// Customer id.
    pub cid: i64,
    /// Client uid.
    pub cuid: String,
    /// Mitigation id.
    pub mid: i64,
    /// Mitigation status.
    pub status: i64,
}

#[derive(Serialize, Deserialize)]
struct RowChangeRecord {
    id: String,
    cid: String,
    cuid: String,
    mid: String,
    status: String,
}

impl From<&RowChange> for RowChangeRecord {
    fn from(change: &RowChange) -> Self {
        RowChangeRecord {
            id: change.id.to_string(),
            cid: change.cid.to_string(),
            cuid: change.cuid.clone(),
            mid: change.mid.to_string(),
            status: change.status.to_string(),
        }
    }
}

impl TryFrom<RowChangeRecord> for RowChange {
    type Error = NotificationError;

    fn try_from(record: RowChangeRecord) -> Result<Self, Self::Error> {
        let number = |value: &str, field: &'static str| {
            value
                .parse::<i64>()
                .map_err(|_| NotificationError::InvalidField(field))
        };
        Ok(RowChange {
            id: number(&record.id, "id")?,
            cid: number(&record.cid, "cid")?,
            cuid: record.cuid,
            mid: number(&record.mid, "mid")?,
            status: number(&record.status, "status")?,
        })
    }
}

/// Sending side of the notification channel.
#[derive(Debug)]
pub struct NotificationChannel {
    stream: TcpStream,
}

impl NotificationChannel {
    /// Connects to the notification server configured in `config`.
    pub fn connect(config: &NotifierConfig) -> Result<NotificationChannel, NotificationError> {
        let stream = TcpStream::connect(config.address)?;
        debug!("connected to notification server at {}", config.address);
        Ok(NotificationChannel { stream })
    }

    pub fn peer_addr(&self) -> Result<SocketAddr, NotificationError> {
        Ok(self.stream.peer_addr()?)
    }

    /// Sends a single row change.
    pub fn send(&mut self, change: &RowChange) -> Result<(), NotificationError> {
        serde_json::to_writer(&mut self.stream, &RowChangeRecord::from(change))?;
        self.stream.flush()?;
        Ok(())
    }
}

/// Receiving side of the notification channel.
#[derive(Debug)]
pub struct NotificationListener {
    listener: TcpListener,
}

impl NotificationListener {
    pub fn bind(addr: impl ToSocketAddrs) -> Result<NotificationListener, NotificationError> {
        Ok(NotificationListener {
            listener: TcpListener::bind(addr)?,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, NotificationError> {
        Ok(self.listener.local_addr()?)
    }

    /// Waits for the next connection and returns the row changes it delivers.
    pub fn accept(&self) -> Result<RowChangeStream, NotificationError> {
        let (stream, peer) = self.listener.accept()?;
        debug!("accepted notification connection from {}", peer);
        Ok(RowChangeStream::new(stream))
    }
}

/// Decoder for the row changes received on a single connection.
///
/// Ends when the peer closes the connection. An object with a non-numeric `id`, `cid`, `mid` or
/// `status` yields [`NotificationError::InvalidField`] and decoding continues with the next
/// object. Malformed JSON or a missing field yields [`NotificationError::Json`] and ends the
/// stream, as object boundaries can no longer be found.
pub struct RowChangeStream {
    inner: StreamDeserializer<'static, IoRead<TcpStream>, RowChangeRecord>,
}

impl RowChangeStream {
    pub fn new(stream: TcpStream) -> RowChangeStream {
        RowChangeStream {
            inner: serde_json::Deserializer::from_reader(stream).into_iter(),
        }
    }
}

impl Iterator for RowChangeStream {
    type Item = Result<RowChange, NotificationError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.inner.next()?;
        Some(record.map_err(NotificationError::from).and_then(RowChange::try_from))
    }
}
