use std::{collections::VecDeque, fmt, str::FromStr};

use arrayvec::ArrayVec;
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{BlockKind, SeedParseError};

use super::config::RandomizerKind;

/// Number of pieces shown in the upcoming preview.
pub const UPCOMING_LEN: usize = 3;

/// Source of block kinds for a [`PieceSpawner`].
pub trait Randomizer: fmt::Debug {
    fn next_block(&mut self) -> BlockKind;
}

/// Draws every kind independently with probability 1/7.
#[derive(Debug, Clone)]
pub struct UniformRandomizer {
    rng: Pcg32,
}

impl UniformRandomizer {
    #[must_use]
    pub fn new(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }
}

impl Randomizer for UniformRandomizer {
    fn next_block(&mut self) -> BlockKind {
        self.rng.random()
    }
}

/// 7-bag randomizer: deals a shuffled set of all seven kinds before
/// starting the next set, so no kind is missing for more than 12 draws.
#[derive(Debug, Clone)]
pub struct BagRandomizer {
    rng: Pcg32,
    bag: ArrayVec<BlockKind, { BlockKind::LEN }>,
}

impl BagRandomizer {
    #[must_use]
    pub fn new(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            bag: ArrayVec::new(),
        }
    }
}

impl Randomizer for BagRandomizer {
    fn next_block(&mut self) -> BlockKind {
        loop {
            if let Some(kind) = self.bag.pop() {
                return kind;
            }
            let mut new_bag = BlockKind::ALL;
            new_bag.shuffle(&mut self.rng);
            self.bag.extend(new_bag);
        }
    }
}

/// Replays a fixed list of kinds, starting over after the last one.
///
/// ```
/// use stackfall_engine::{BlockKind, Randomizer as _, SequenceRandomizer};
///
/// let mut sequence = SequenceRandomizer::new(vec![BlockKind::S, BlockKind::Z]);
/// assert_eq!(sequence.next_block(), BlockKind::S);
/// assert_eq!(sequence.next_block(), BlockKind::Z);
/// assert_eq!(sequence.next_block(), BlockKind::S);
/// ```
#[derive(Debug, Clone)]
pub struct SequenceRandomizer {
    sequence: Vec<BlockKind>,
    position: usize,
}

impl SequenceRandomizer {
    /// # Panics
    ///
    /// Panics if `sequence` is empty.
    #[must_use]
    pub fn new(sequence: Vec<BlockKind>) -> Self {
        assert!(!sequence.is_empty(), "block sequence must not be empty");
        Self {
            sequence,
            position: 0,
        }
    }
}

impl Randomizer for SequenceRandomizer {
    fn next_block(&mut self) -> BlockKind {
        let kind = self.sequence[self.position];
        self.position = (self.position + 1) % self.sequence.len();
        kind
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the randomizer's PRNG, written as 32 hex digits both
/// in JSON and on the command line. The same seed and randomizer always
/// produce the same piece sequence.
///
/// ```
/// use stackfall_engine::PieceSeed;
///
/// let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// assert_eq!(seed.to_string(), "0123456789abcdef0123456789abcdef");
/// assert!("xyz".parse::<PieceSeed>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl From<u128> for PieceSeed {
    fn from(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(SeedParseError::InvalidLength(s.len()));
        }
        let num = u128::from_str_radix(s, 16).map_err(SeedParseError::InvalidDigit)?;
        Ok(Self::from(num))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// The upcoming queue and the randomizer behind it.
///
/// The queue holds [`UPCOMING_LEN`] kinds. [`Self::advance`] takes the
/// *last* entry as the next active piece and pushes a fresh draw at the
/// front, so the preview reads newest-first.
#[derive(Debug)]
pub struct PieceSpawner {
    randomizer: Box<dyn Randomizer>,
    upcoming: VecDeque<BlockKind>,
}

impl PieceSpawner {
    /// Creates a spawner with an empty queue; call [`Self::refill`] before use.
    #[must_use]
    pub fn new(randomizer: Box<dyn Randomizer>) -> Self {
        Self {
            randomizer,
            upcoming: VecDeque::with_capacity(UPCOMING_LEN),
        }
    }

    #[must_use]
    pub fn from_kind(kind: RandomizerKind, seed: PieceSeed) -> Self {
        let randomizer: Box<dyn Randomizer> = match kind {
            RandomizerKind::Uniform => Box::new(UniformRandomizer::new(seed)),
            RandomizerKind::Bag => Box::new(BagRandomizer::new(seed)),
        };
        Self::new(randomizer)
    }

    /// Draws a kind without touching the queue.
    pub fn draw(&mut self) -> BlockKind {
        self.randomizer.next_block()
    }

    /// Replaces the queue with [`UPCOMING_LEN`] fresh draws.
    pub fn refill(&mut self) {
        self.upcoming.clear();
        for _ in 0..UPCOMING_LEN {
            let kind = self.draw();
            self.upcoming.push_back(kind);
        }
    }

    /// Pops the next active kind and replenishes the queue.
    pub fn advance(&mut self) -> BlockKind {
        let next = match self.upcoming.pop_back() {
            Some(kind) => kind,
            None => self.draw(),
        };
        let kind = self.draw();
        self.upcoming.push_front(kind);
        next
    }

    pub fn upcoming(&self) -> impl Iterator<Item = BlockKind> + '_ {
        self.upcoming.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use BlockKind::*;

    use super::*;

    fn sequence_spawner(kinds: &[BlockKind]) -> PieceSpawner {
        PieceSpawner::new(Box::new(SequenceRandomizer::new(kinds.to_vec())))
    }

    mod queue {
        use super::*;

        #[test]
        fn test_refill_draws_three_in_order() {
            let mut spawner = sequence_spawner(&[I, J, L, O, S, T, Z]);
            assert_eq!(spawner.upcoming().count(), 0);
            spawner.refill();
            assert_eq!(spawner.upcoming().collect::<Vec<_>>(), vec![I, J, L]);
        }

        #[test]
        fn test_advance_pops_last_and_pushes_front() {
            let mut spawner = sequence_spawner(&[I, J, L, O, S, T, Z]);
            spawner.refill();
            assert_eq!(spawner.draw(), O);
            assert_eq!(spawner.advance(), L);
            assert_eq!(spawner.upcoming().collect::<Vec<_>>(), vec![S, I, J]);
            assert_eq!(spawner.advance(), J);
            assert_eq!(spawner.upcoming().collect::<Vec<_>>(), vec![T, S, I]);
            assert_eq!(spawner.advance(), I);
            assert_eq!(spawner.advance(), S);
            assert_eq!(spawner.upcoming().count(), UPCOMING_LEN);
        }

        #[test]
        fn test_refill_discards_previous_queue() {
            let mut spawner = sequence_spawner(&[I, J, L, O]);
            spawner.refill();
            spawner.refill();
            assert_eq!(spawner.upcoming().collect::<Vec<_>>(), vec![O, I, J]);
        }

        #[test]
        fn test_advance_on_empty_queue_still_yields() {
            let mut spawner = sequence_spawner(&[T, Z]);
            assert_eq!(spawner.advance(), T);
            assert_eq!(spawner.upcoming().collect::<Vec<_>>(), vec![Z]);
        }
    }

    mod randomizers {
        use super::*;

        #[test]
        fn test_uniform_is_deterministic_per_seed() {
            let seed = PieceSeed::from(0x1234_5678_9abc_def0_1122_3344_5566_7788);
            let mut a = UniformRandomizer::new(seed);
            let mut b = UniformRandomizer::new(seed);
            for _ in 0..50 {
                assert_eq!(a.next_block(), b.next_block());
            }
        }

        #[test]
        fn test_bag_deals_each_kind_once_per_seven() {
            let mut bag = BagRandomizer::new(rand::rng().random());
            for _ in 0..10 {
                let mut dealt: Vec<_> = (0..BlockKind::LEN).map(|_| bag.next_block()).collect();
                dealt.sort_by_key(|kind| *kind as u8);
                assert_eq!(dealt, BlockKind::ALL.to_vec());
            }
        }

        #[test]
        fn test_sequence_cycles() {
            let mut sequence = SequenceRandomizer::new(vec![O, I]);
            let drawn: Vec<_> = (0..5).map(|_| sequence.next_block()).collect();
            assert_eq!(drawn, vec![O, I, O, I, O]);
        }

        #[test]
        #[should_panic(expected = "must not be empty")]
        fn test_sequence_rejects_empty() {
            let _ = SequenceRandomizer::new(vec![]);
        }

        #[test]
        fn test_from_kind_with_same_seed_matches() {
            let seed: PieceSeed = rand::rng().random();
            for kind in [RandomizerKind::Uniform, RandomizerKind::Bag] {
                let mut a = PieceSpawner::from_kind(kind, seed);
                let mut b = PieceSpawner::from_kind(kind, seed);
                a.refill();
                b.refill();
                for _ in 0..20 {
                    assert_eq!(a.advance(), b.advance());
                }
            }
        }
    }

    mod piece_seed {
        use super::*;

        #[test]
        fn test_roundtrip_random_seed() {
            let seed: PieceSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(seed, deserialized);
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = PieceSeed([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
        }

        #[test]
        fn test_zero_is_padded() {
            assert_eq!(
                PieceSeed::from(0).to_string(),
                "00000000000000000000000000000000"
            );
        }

        #[test]
        fn test_accepts_uppercase_hex() {
            let seed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed, PieceSeed::from(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210));
        }

        #[test]
        fn test_error_wrong_length() {
            assert_eq!(
                "0123456789abcdef0123456789abcde".parse::<PieceSeed>(),
                Err(SeedParseError::InvalidLength(31))
            );
            assert_eq!(
                "".parse::<PieceSeed>(),
                Err(SeedParseError::InvalidLength(0))
            );
        }

        #[test]
        fn test_error_invalid_hex_characters() {
            let json = "\"ghijklmnopqrstuvwxyzghijklmnopqr\"";
            let err = serde_json::from_str::<PieceSeed>(json).unwrap_err();
            assert!(err.to_string().contains("invalid hex"));
        }
    }
}
