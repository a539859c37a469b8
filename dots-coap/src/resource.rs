// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * resource.rs - Observable resources and their subscribers.
 */

//! Observable resources and the bookkeeping of their subscribers (observers).
//!
//! Subscribers are kept in registration order, newest first. Lookups of the "first subscriber"
//! only ever look at the most recently registered one.

use std::collections::{vec_deque, VecDeque};

use log::debug;

use crate::protocol::{BlockParams, CoapToken, ObserveAction};

/// A client observing a resource, see [RFC 7641](https://datatracker.ietf.org/doc/html/rfc7641).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CoapSubscriber {
    token: CoapToken,
    block: BlockParams,
    query: Option<Box<[u8]>>,
}

impl CoapSubscriber {
    /// Creates a subscriber identified by `token` that receives notifications using the block
    /// parameters `block`.
    pub fn new(token: impl Into<CoapToken>, block: BlockParams) -> CoapSubscriber {
        CoapSubscriber {
            token: token.into(),
            block,
            query: None,
        }
    }

    /// Sets the query the subscriber registered with.
    pub fn with_query(mut self, query: impl Into<Box<[u8]>>) -> CoapSubscriber {
        self.query = Some(query.into());
        self
    }

    pub fn token(&self) -> &[u8] {
        &self.token
    }

    pub fn block(&self) -> BlockParams {
        self.block
    }

    pub fn query(&self) -> Option<&[u8]> {
        self.query.as_deref()
    }

    /// Returns whether this subscriber is addressed by a notification scoped to `query`.
    ///
    /// Unscoped notifications (`None`) address every subscriber.
    pub fn matches_query(&self, query: Option<&[u8]>) -> bool {
        match query {
            None => true,
            Some(query) => self.query.as_deref() == Some(query),
        }
    }
}

/// Dispatches notifications to the subscribers of a resource.
///
/// Called by [`CoapResource::mark_dirty`] after the resource was marked as dirty. Dispatchers are
/// responsible for clearing the dirty flag once all notifications have been sent.
pub trait NotificationDispatcher<D> {
    /// Status reported back to the caller of [`CoapResource::mark_dirty`].
    type Status;

    /// Notifies the subscribers of `resource`, restricted to those registered with `query` if it
    /// is not `None`.
    fn notify(&mut self, resource: &mut CoapResource<D>, query: Option<&[u8]>) -> Self::Status;
}

/// Representation of an observable resource.
///
/// `D` is the type of the application data attached to the resource.
#[derive(Clone, Debug)]
pub struct CoapResource<D> {
    uri_path: String,
    subscribers: VecDeque<CoapSubscriber>,
    dirty: bool,
    user_data: Option<D>,
}

impl<D> CoapResource<D> {
    /// Creates a new resource for the given `uri_path` with application data `user_data`.
    pub fn new(uri_path: impl Into<String>, user_data: Option<D>) -> CoapResource<D> {
        CoapResource {
            uri_path: uri_path.into(),
            subscribers: VecDeque::new(),
            dirty: false,
            user_data,
        }
    }

    /// Returns the uri_path this resource responds to.
    pub fn uri_path(&self) -> &str {
        &self.uri_path
    }

    pub fn user_data(&self) -> Option<&D> {
        self.user_data.as_ref()
    }

    pub fn user_data_mut(&mut self) -> Option<&mut D> {
        self.user_data.as_mut()
    }

    /// Replaces the application data of this resource, returning the previous one.
    pub fn set_user_data(&mut self, user_data: Option<D>) -> Option<D> {
        std::mem::replace(&mut self.user_data, user_data)
    }

    /// Adds a subscriber in front of all existing ones.
    ///
    /// A subscriber with the same token is replaced, as a repeated registration refreshes the
    /// existing one.
    pub fn add_subscriber(&mut self, subscriber: CoapSubscriber) {
        if self.remove_subscriber(subscriber.token()).is_some() {
            debug!("refreshing observe registration on {}", self.uri_path);
        }
        self.subscribers.push_front(subscriber);
    }

    /// Removes the subscriber identified by `token`, returning it if it existed.
    pub fn remove_subscriber(&mut self, token: &[u8]) -> Option<CoapSubscriber> {
        let index = self.subscribers.iter().position(|s| s.token() == token)?;
        self.subscribers.remove(index)
    }

    /// Applies an Observe registration or deregistration request.
    ///
    /// Returns `true` if the set of subscribers changed.
    pub fn handle_observe(&mut self, action: ObserveAction, subscriber: CoapSubscriber) -> bool {
        match action {
            ObserveAction::Register => {
                self.add_subscriber(subscriber);
                true
            },
            ObserveAction::Deregister => self.remove_subscriber(subscriber.token()).is_some(),
        }
    }

    /// Returns an iterator over all subscribers, most recently registered first.
    pub fn subscribers(&self) -> vec_deque::Iter<'_, CoapSubscriber> {
        self.subscribers.iter()
    }

    /// Returns an iterator over the subscribers addressed by a notification scoped to `query`.
    pub fn subscribers_matching<'a>(
        &'a self,
        query: Option<&'a [u8]>,
    ) -> impl Iterator<Item = &'a CoapSubscriber> + 'a {
        self.subscribers.iter().filter(move |s| s.matches_query(query))
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Marks the resource as dirty and asks `dispatcher` to notify its observers.
    ///
    /// An empty `scope_key` notifies all observers, otherwise only observers registered with a
    /// query equal to `scope_key` are notified. Returns the status reported by the dispatcher.
    pub fn mark_dirty<N: NotificationDispatcher<D>>(&mut self, scope_key: &[u8], dispatcher: &mut N) -> N::Status {
        self.dirty = true;
        let query = (!scope_key.is_empty()).then_some(scope_key);
        dispatcher.notify(self, query)
    }

    /// Returns whether this resource is actively observed.
    ///
    /// A resource counts as observed only if it has at least one subscriber *and* application
    /// data attached to it.
    pub fn has_subscribers(&self) -> bool {
        !self.subscribers.is_empty() && self.user_data.is_some()
    }

    /// Returns the token of the most recently registered subscriber.
    pub fn token_of_first_subscriber(&self) -> Option<CoapToken> {
        self.subscribers.front().map(|s| s.token.clone())
    }

    /// Returns the block size exponent of the most recently registered subscriber.
    pub fn block_size_of_first_subscriber(&self) -> Option<u8> {
        self.subscribers.front().map(|s| s.block.size_exponent())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag, usually after all notifications were sent.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

/// A notification to be sent to a single subscriber.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObserveNotification {
    pub uri_path: String,
    pub token: CoapToken,
    pub block: BlockParams,
}

/// [`NotificationDispatcher`] that queues one [`ObserveNotification`] per addressed subscriber.
///
/// The queued notifications can be taken out using [`drain`](ObserverNotifier::drain) and sent
/// by the server's I/O loop. The reported status is the number of queued notifications.
#[derive(Clone, Debug, Default)]
pub struct ObserverNotifier {
    pending: VecDeque<ObserveNotification>,
}

impl ObserverNotifier {
    pub fn new() -> ObserverNotifier {
        ObserverNotifier::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Removes and returns all queued notifications in the order they were queued.
    pub fn drain(&mut self) -> vec_deque::Drain<'_, ObserveNotification> {
        self.pending.drain(..)
    }
}

impl<D> NotificationDispatcher<D> for ObserverNotifier {
    type Status = usize;

    fn notify(&mut self, resource: &mut CoapResource<D>, query: Option<&[u8]>) -> usize {
        let before = self.pending.len();
        let uri_path = resource.uri_path().to_owned();
        self.pending
            .extend(resource.subscribers_matching(query).map(|s| ObserveNotification {
                uri_path: uri_path.clone(),
                token: s.token.clone(),
                block: s.block,
            }));
        resource.clear_dirty();
        let queued = self.pending.len() - before;
        debug!("queued {} notification(s) for {}", queued, uri_path);
        queued
    }
}
