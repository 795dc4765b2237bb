//! Event channel over crossbeam-channel.

use super::Event;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Sending half handed to the pipeline.
///
/// Clones feed the same queue, so every volume task of a parallel scan can
/// emit through its own copy. Events sent after the receiver hung up are
/// dropped.
#[derive(Clone)]
pub struct EventSender(Sender<Event>);

impl EventSender {
    pub fn send(&self, event: Event) {
        self.0.send(event).ok();
    }
}

/// Receiving half, drained by the front end until every sender is gone
pub struct EventReceiver(Receiver<Event>);

impl EventReceiver {
    /// Blocking iterator that ends once all senders are dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.0.iter()
    }
}

pub struct EventChannel;

impl EventChannel {
    /// Unbounded pair, so a slow listener never stalls a scan
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (EventSender(sender), EventReceiver(receiver))
    }
}

/// Sender with no listener, for runs without a UI
pub fn null_sender() -> EventSender {
    EventChannel::new().0
}
