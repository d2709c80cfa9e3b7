//! Power-up kinds and the per-board availability flags.

use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

/// A single-use modifier applied while a question is open.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum PowerUpKind {
    /// Removes two wrong options.
    #[strum(to_string = "50/50")]
    FiftyFifty,
    /// Adds fifteen seconds to the countdown.
    #[strum(to_string = "extra time")]
    ExtraTime,
    /// Reveals a textual clue about the answer.
    #[strum(to_string = "hint")]
    Hint,
    /// Forfeits the question and moves on.
    #[strum(to_string = "skip")]
    Skip,
}

impl PowerUpKind {
    /// Draws a kind uniformly among all four.
    #[instrument(skip(rng))]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::iter()
            .choose(rng)
            .unwrap_or(PowerUpKind::FiftyFifty)
    }
}

/// Availability flags, one per [`PowerUpKind`].
///
/// Flags only ever go from available to consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUps {
    fifty_fifty: bool,
    extra_time: bool,
    hint: bool,
    skip: bool,
}

impl PowerUps {
    /// Every power-up available.
    pub fn all() -> Self {
        Self {
            fifty_fifty: true,
            extra_time: true,
            hint: true,
            skip: true,
        }
    }

    /// Nothing available.
    pub fn none() -> Self {
        Self {
            fifty_fifty: false,
            extra_time: false,
            hint: false,
            skip: false,
        }
    }

    /// Only the listed kinds available.
    pub fn from_kinds(kinds: impl IntoIterator<Item = PowerUpKind>) -> Self {
        let mut power_ups = Self::none();
        for kind in kinds {
            *power_ups.flag_mut(kind) = true;
        }
        power_ups
    }

    /// Whether `kind` can still be used.
    pub fn is_available(&self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::FiftyFifty => self.fifty_fifty,
            PowerUpKind::ExtraTime => self.extra_time,
            PowerUpKind::Hint => self.hint,
            PowerUpKind::Skip => self.skip,
        }
    }

    /// Consumes `kind`. Returns `false` when it was already used.
    #[instrument(skip(self))]
    pub fn consume(&mut self, kind: PowerUpKind) -> bool {
        let flag = self.flag_mut(kind);
        let was_available = *flag;
        *flag = false;
        was_available
    }

    /// Kinds still available, in declaration order.
    pub fn available(&self) -> Vec<PowerUpKind> {
        PowerUpKind::iter()
            .filter(|kind| self.is_available(*kind))
            .collect()
    }

    fn flag_mut(&mut self, kind: PowerUpKind) -> &mut bool {
        match kind {
            PowerUpKind::FiftyFifty => &mut self.fifty_fifty,
            PowerUpKind::ExtraTime => &mut self.extra_time,
            PowerUpKind::Hint => &mut self.hint,
            PowerUpKind::Skip => &mut self.skip,
        }
    }
}

impl Default for PowerUps {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_consume_is_single_use() {
        let mut power_ups = PowerUps::all();
        assert!(power_ups.consume(PowerUpKind::Hint));
        assert!(!power_ups.consume(PowerUpKind::Hint));
        assert!(!power_ups.is_available(PowerUpKind::Hint));
        assert!(power_ups.is_available(PowerUpKind::Skip));
    }

    #[test]
    fn test_from_kinds() {
        let power_ups = PowerUps::from_kinds([PowerUpKind::Skip, PowerUpKind::ExtraTime]);
        assert_eq!(
            power_ups.available(),
            vec![PowerUpKind::ExtraTime, PowerUpKind::Skip]
        );
    }

    #[test]
    fn test_random_covers_every_kind() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            seen.insert(PowerUpKind::random(&mut rng));
        }
        assert_eq!(seen.len(), 4);
    }
}
