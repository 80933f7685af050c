//! Controller → authority intent transport.

use crossbeam_channel::{Receiver, Sender};

use crate::intent::IntentMessage;

/// Outbound intent path on a non-authoritative process.
///
/// Fire-and-forget: implementations must not block or wait for the authority to apply
/// the message.
pub trait IntentSink {
    fn send(&mut self, message: IntentMessage);
}

/// Drops every message. Used by relays that never forward (e.g. a dedicated authority).
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl IntentSink for NullSink {
    fn send(&mut self, message: IntentMessage) {
        log::debug!("intent for actor {} dropped: no route", message.actor_id);
    }
}

/// Sending half of an in-process intent channel.
#[derive(Clone, Debug)]
pub struct IntentSender {
    tx: Sender<IntentMessage>,
}

impl IntentSink for IntentSender {
    fn send(&mut self, message: IntentMessage) {
        if self.tx.send(message).is_err() {
            log::warn!(
                "authority endpoint closed; intent {} for actor {} discarded",
                message.seq,
                message.actor_id
            );
        }
    }
}

/// Unbounded intent channel between a controller and the authority.
pub fn intent_channel() -> (IntentSender, Receiver<IntentMessage>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (IntentSender { tx }, rx)
}
