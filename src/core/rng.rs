//! Seeded shuffling.
//!
//! A deal is replayed from its seed alone, so the RNG carries no state
//! worth saving: `GameState::seed` is the whole record.
//!
//! ```
//! use klondike_engine::core::{Card, GameRng};
//!
//! let mut a = Card::full_deck();
//! let mut b = Card::full_deck();
//! GameRng::new(42).shuffle(&mut a);
//! GameRng::new(42).shuffle(&mut b);
//! assert_eq!(a, b);
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// ChaCha8 stream bound to the seed of one deal.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// A seed for an unseeded new game.
    #[must_use]
    pub fn random_seed() -> u64 {
        rand::thread_rng().gen()
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fisher-Yates shuffle driven by this stream.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}
