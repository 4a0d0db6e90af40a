//! The append-only invocation log.

use std::collections::HashMap;
use std::time::Duration;

use crate::signature::{CallSignature, ReceiverId};

/// A single recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRecord {
    /// The call that was made.
    pub signature: CallSignature,
    /// Position of the call in the log. Never reused, even after
    /// [`InvocationRecorder::clear`].
    pub seq: u64,
    /// Clock reading when the call was made.
    pub timestamp: Duration,
}

/// A position in the invocation log.
///
/// Records made after the checkpoint have `seq >= checkpoint.seq` and a
/// timestamp no earlier than `checkpoint.at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// Sequence number the next record will receive.
    pub seq: u64,
    /// Clock reading when the checkpoint was taken.
    pub at: Duration,
}

/// Records every call made to tracked methods.
///
/// Records are appended in call order and are never changed or removed,
/// except by [`clear`](Self::clear) between test cases. The number of
/// records matching a signature can therefore only grow during a test.
///
/// # Example
///
/// ```rust
/// use stubkit::record::InvocationRecorder;
/// use stubkit::{args, MockSession};
/// use std::time::Duration;
///
/// let session = MockSession::new();
/// let calc = session.mock("calcService");
/// let add = calc.call("add", args![20.0, 10.0]);
///
/// let mut recorder = InvocationRecorder::new();
/// recorder.record(add.clone(), Duration::ZERO);
/// recorder.record(add.clone(), Duration::from_millis(5));
///
/// assert_eq!(recorder.count_matching(&add), 2);
/// assert_eq!(recorder.last_match(&add).map(|r| r.seq), Some(1));
/// ```
#[derive(Debug, Default)]
pub struct InvocationRecorder {
    records: Vec<InvocationRecord>,
    counts: HashMap<CallSignature, usize>,
    /// Sequence number of `records[0]`.
    base_seq: u64,
}

impl InvocationRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record for `signature` stamped with `timestamp`.
    ///
    /// Returns the sequence number given to the record.
    pub fn record(&mut self, signature: CallSignature, timestamp: Duration) -> u64 {
        let seq = self.next_seq();
        tracing::trace!(call = %signature, seq, ?timestamp, "recording invocation");
        *self.counts.entry(signature.clone()).or_insert(0) += 1;
        self.records.push(InvocationRecord {
            signature,
            seq,
            timestamp,
        });
        seq
    }

    /// Number of records whose signature equals `signature`.
    #[must_use]
    pub fn count_matching(&self, signature: &CallSignature) -> usize {
        self.counts.get(signature).copied().unwrap_or(0)
    }

    /// Number of matching records at or after sequence number `since_seq`.
    #[must_use]
    pub fn count_matching_since(&self, signature: &CallSignature, since_seq: u64) -> usize {
        self.since(since_seq)
            .iter()
            .filter(|r| &r.signature == signature)
            .count()
    }

    /// The first matching record at or after sequence number `since_seq`.
    #[must_use]
    pub fn first_match_after(
        &self,
        signature: &CallSignature,
        since_seq: u64,
    ) -> Option<&InvocationRecord> {
        self.since(since_seq)
            .iter()
            .find(|r| &r.signature == signature)
    }

    /// The most recent matching record.
    #[must_use]
    pub fn last_match(&self, signature: &CallSignature) -> Option<&InvocationRecord> {
        self.records.iter().rev().find(|r| &r.signature == signature)
    }

    /// All records in call order.
    #[must_use]
    pub fn records(&self) -> &[InvocationRecord] {
        &self.records
    }

    /// Records of calls made on one mock, in call order.
    pub fn records_for<'a>(
        &'a self,
        receiver: &'a ReceiverId,
    ) -> impl Iterator<Item = &'a InvocationRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.signature.receiver() == receiver)
    }

    /// Take a checkpoint at the current end of the log.
    #[must_use]
    pub fn checkpoint(&self, now: Duration) -> Checkpoint {
        Checkpoint {
            seq: self.next_seq(),
            at: now,
        }
    }

    /// Total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Discard every record.
    ///
    /// Sequence numbers carry on from where they were, so a checkpoint
    /// taken before the clear still sees every call made after it.
    pub fn clear(&mut self) {
        self.base_seq = self.next_seq();
        self.records.clear();
        self.counts.clear();
    }

    fn next_seq(&self) -> u64 {
        self.base_seq + self.records.len() as u64
    }

    fn since(&self, since_seq: u64) -> &[InvocationRecord] {
        let offset = since_seq.saturating_sub(self.base_seq);
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        self.records.get(start..).unwrap_or(&[])
    }
}
