use std::ops::Range;

use rand::Rng;

/// Ten-digit keyspace shared by directory ids and pantry serials.
pub const ID_RANGE: Range<i64> = 1_000_000_000..10_000_000_000;

/// Source of candidate ids. Uniqueness is enforced by the store; callers
/// draw again when an insert reports a collision.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&self) -> i64 {
        rand::thread_rng().gen_range(ID_RANGE)
    }
}

#[cfg(test)]
pub use scripted::ScriptedIds;
