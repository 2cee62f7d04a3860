//! Starting sequence numbers for upload sessions.

use std::ops::Range;

use rand::Rng;

/// Range of the random starting sequence (nine decimal digits).
const RANDOM_SEQUENCE_RANGE: Range<u32> = 100_000_009..999_999_991;

/// Supplies the first sequence number of each session.
pub trait SequenceSource: Send + Sync {
    fn next_start(&self) -> u32;
}

/// Draws every starting sequence from the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSequence;

impl SequenceSource for RandomSequence {
    fn next_start(&self) -> u32 {
        rand::thread_rng().gen_range(RANDOM_SEQUENCE_RANGE)
    }
}

/// Always starts at the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSequence(pub u32);

impl SequenceSource for FixedSequence {
    fn next_start(&self) -> u32 {
        self.0
    }
}
