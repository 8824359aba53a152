use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use log::warn;

use super::controller::SubmittedRecord;

/// Receives each record the controller accepts. Delivery is synchronous and
/// the controller never waits on what the sink does with the record.
pub trait SubmissionSink {
    fn deliver(&self, record: SubmittedRecord);
}

impl<F> SubmissionSink for F
where
    F: Fn(SubmittedRecord),
{
    fn deliver(&self, record: SubmittedRecord) {
        (self)(record)
    }
}

/// Shared list of delivered records. Clones observe the same list.
#[derive(Clone, Debug, Default)]
pub struct RecordCollector {
    records: Rc<RefCell<Vec<SubmittedRecord>>>,
}

impl RecordCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SubmittedRecord> {
        self.records.borrow().clone()
    }

    pub fn last(&self) -> Option<SubmittedRecord> {
        self.records.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn take(&self) -> Vec<SubmittedRecord> {
        std::mem::take(&mut *self.records.borrow_mut())
    }
}

impl SubmissionSink for RecordCollector {
    fn deliver(&self, record: SubmittedRecord) {
        self.records.borrow_mut().push(record);
    }
}

/// Hands records to an async consumer through an unbounded channel.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    sender: UnboundedSender<SubmittedRecord>,
}

impl ChannelSink {
    pub fn new(sender: UnboundedSender<SubmittedRecord>) -> Self {
        Self { sender }
    }

    pub fn channel() -> (Self, UnboundedReceiver<SubmittedRecord>) {
        let (sender, receiver) = unbounded();
        (Self::new(sender), receiver)
    }
}

impl SubmissionSink for ChannelSink {
    fn deliver(&self, record: SubmittedRecord) {
        if let Err(error) = self.sender.unbounded_send(record) {
            warn!("dropping submitted record, receiver is gone: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormState;
    use futures::StreamExt;
    use futures::executor::block_on;

    fn record(name: &'static str) -> SubmittedRecord {
        SubmittedRecord::new([("name", name)].into_iter().collect::<FormState>())
    }

    #[test]
    fn collector_clones_share_records() {
        let collector = RecordCollector::new();
        let handle = collector.clone();
        collector.deliver(record("Ada"));
        collector.deliver(record("Grace"));

        assert_eq!(handle.len(), 2);
        assert_eq!(handle.last().expect("last record").value("name"), "Grace");
        assert_eq!(handle.take().len(), 2);
        assert!(collector.is_empty());
    }

    #[test]
    fn channel_sink_forwards_to_receiver() {
        let (sink, mut receiver) = ChannelSink::channel();
        sink.deliver(record("Ada"));
        drop(sink);

        let received = block_on(receiver.next()).expect("record arrives");
        assert_eq!(received.value("name"), "Ada");
        assert!(block_on(receiver.next()).is_none());
    }

    #[test]
    fn channel_sink_ignores_closed_receiver() {
        let (sink, receiver) = ChannelSink::channel();
        drop(receiver);
        sink.deliver(record("Ada"));
    }
}
