//! Client-side note identifier generation.
//!
//! The remote store does not assign identifiers, so the client picks one
//! before `create`. The default scheme is the short numeric form existing
//! stores already hold: a fair coin picks a 3-digit value in `[100, 999]`
//! or a 4-digit value in `[1000, 9999]`. It is not collision-free.
//! `TimeOrdered` swaps in a UUID v7 string behind the same generator.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which identifier scheme new notes use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// 3-or-4 digit random number, compatible with existing stores
    #[default]
    ShortNumeric,
    /// UUID v7 (time-sortable, collision resistant)
    TimeOrdered,
}

impl IdStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShortNumeric => "short_numeric",
            Self::TimeOrdered => "time_ordered",
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Draw a short numeric identifier.
pub fn short_numeric_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let value: u16 = if rng.gen_bool(0.5) {
        rng.gen_range(100..=999)
    } else {
        rng.gen_range(1000..=9999)
    };
    value.to_string()
}

/// Create a time-ordered identifier using UUID v7.
#[must_use]
pub fn time_ordered_id() -> String {
    Uuid::now_v7().to_string()
}

/// Stateful identifier source owned by a composer.
pub struct NoteIdGenerator {
    strategy: IdStrategy,
    rng: StdRng,
}

impl NoteIdGenerator {
    #[must_use]
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator, for reproducible runs.
    #[must_use]
    pub fn seeded(strategy: IdStrategy, seed: u64) -> Self {
        Self {
            strategy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn generate(&mut self) -> String {
        match self.strategy {
            IdStrategy::ShortNumeric => short_numeric_id(&mut self.rng),
            IdStrategy::TimeOrdered => time_ordered_id(),
        }
    }
}

impl Default for NoteIdGenerator {
    fn default() -> Self {
        Self::new(IdStrategy::default())
    }
}

impl fmt::Debug for NoteIdGenerator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NoteIdGenerator")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}
