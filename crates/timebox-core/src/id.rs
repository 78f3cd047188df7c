//! Identifier generation.
//!
//! Plan-block ids come from an injected provider so tests can run with
//! deterministic ids; production uses random UUIDs. The random base-36
//! suffix used by both ICS UID schemes also lives here so the encoders
//! share one random source.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use uuid::Uuid;

/// Source of plan-block identifiers.
pub trait IdProvider {
    /// Mint a new id, unique for the session/storage scope.
    fn plan_block_id(&self) -> String;
}

/// Production provider: random v4 UUIDs.
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdProvider for RandomIds {
    fn plan_block_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic provider for tests: `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdProvider for SequentialIds {
    fn plan_block_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

/// A random lowercase base-36 string of the given length.
pub(crate) fn random_base36(len: usize) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(DIGITS[rng.gen_range(0..DIGITS.len())]))
        .collect()
}
