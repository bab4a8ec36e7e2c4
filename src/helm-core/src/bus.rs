// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Typed publish/subscribe distribution between sensor producers and
//! control/display consumers.
//!
//! Producers hand a [`Message`] to [`MessageBus::publish`]; every current
//! subscriber is notified synchronously, in registration order, before
//! `publish` returns. There is no queueing and no deferred delivery, so
//! subscribers observe messages exactly in publish order.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::pilot::message::{
    AutopilotControlMessage, AutopilotStatusMessage, ImuMessage, Message, RudderMessage,
    VoltageMeasurement,
};

/// Unique identifier for a registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Bus misuse errors. In the single-flow model every variant is a
/// programming error, not a runtime condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    /// The same listener instance is already registered on this bus.
    #[error("listener is already subscribed to this bus")]
    AlreadySubscribed,
    /// `publish`, `subscribe` or `unsubscribe` was called from inside a
    /// running dispatch.
    #[error("bus re-entered while a publish was in flight")]
    PublishInProgress,
}

/// Trait for components that consume bus messages.
///
/// All methods default to no-ops, so subscribers override only the kinds
/// they care about. The kind set is closed: a new message kind means a new
/// method here and a new arm in the dispatch match.
pub trait MessageListener: Send + Sync {
    fn on_voltage(&self, _message: &VoltageMeasurement) {}
    fn on_rudder(&self, _message: &RudderMessage) {}
    fn on_imu(&self, _message: &ImuMessage) {}
    fn on_autopilot_status(&self, _message: &AutopilotStatusMessage) {}
    fn on_autopilot_control(&self, _message: &AutopilotControlMessage) {}
}

/// Route one message to the matching handler of one listener.
fn deliver(listener: &dyn MessageListener, message: &Message) {
    match message {
        Message::Voltage(m) => listener.on_voltage(m),
        Message::Rudder(m) => listener.on_rudder(m),
        Message::Imu(m) => listener.on_imu(m),
        Message::AutopilotStatus(m) => listener.on_autopilot_status(m),
        Message::AutopilotControl(m) => listener.on_autopilot_control(m),
    }
}

/// Synchronous message bus decoupling producers from consumers.
///
/// The subscriber list is expected to be mutated only during setup and
/// teardown, never concurrently with dispatch; violations are rejected
/// with [`BusError::PublishInProgress`] rather than tolerated.
pub struct MessageBus {
    subscribers: RwLock<Vec<(SubscriberId, Arc<dyn MessageListener>)>>,
    dispatching: AtomicBool,
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            dispatching: AtomicBool::new(false),
        }
    }

    /// Register a subscriber. Returns an id usable with [`unsubscribe`].
    ///
    /// Subscribing the same instance twice is rejected, as is subscribing
    /// from inside a message handler.
    ///
    /// [`unsubscribe`]: MessageBus::unsubscribe
    pub fn subscribe(&self, listener: Arc<dyn MessageListener>) -> Result<SubscriberId, BusError> {
        if self.dispatching.load(Ordering::Acquire) {
            return Err(BusError::PublishInProgress);
        }
        let mut subscribers = self.subscribers.write().expect("subscriber list poisoned");
        if subscribers.iter().any(|(_, l)| Arc::ptr_eq(l, &listener)) {
            return Err(BusError::AlreadySubscribed);
        }
        let id = SubscriberId::new();
        subscribers.push((id, listener));
        Ok(id)
    }

    /// Remove a subscriber by id. Unknown ids are a no-op.
    pub fn unsubscribe(&self, id: SubscriberId) -> Result<(), BusError> {
        if self.dispatching.load(Ordering::Acquire) {
            return Err(BusError::PublishInProgress);
        }
        self.subscribers
            .write()
            .expect("subscriber list poisoned")
            .retain(|(sid, _)| *sid != id);
        Ok(())
    }

    /// Get the number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().expect("subscriber list poisoned").len()
    }

    /// Deliver a message to every current subscriber, in registration
    /// order, and return once all have been notified.
    ///
    /// Publishing with no subscribers succeeds silently. Publishing from
    /// inside a handler is rejected.
    pub fn publish(&self, message: impl Into<Message>) -> Result<(), BusError> {
        if self.dispatching.swap(true, Ordering::AcqRel) {
            return Err(BusError::PublishInProgress);
        }
        let message = message.into();
        let subscribers = self.subscribers.read().expect("subscriber list poisoned");
        for (_, listener) in subscribers.iter() {
            deliver(listener.as_ref(), &message);
        }
        drop(subscribers);
        self.dispatching.store(false, Ordering::Release);
        Ok(())
    }
}
