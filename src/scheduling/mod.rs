// Poll scheduling: backoff math and retry bookkeeping

pub mod backoff;

pub use backoff::{next_delay, PollOutcome, PollerState};
