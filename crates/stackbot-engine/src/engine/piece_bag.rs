use std::collections::VecDeque;

use rand::{Rng, SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;

use crate::PieceKind;

/// Supplies pieces using the 7-bag system.
///
/// Every bag holds each of the seven kinds exactly once in shuffled order, so any run
/// of seven consecutive draws starting at a bag boundary is a permutation of all kinds.
/// The generator never reads global randomness: the RNG is injected, and
/// [`PieceBag::with_seed`] gives reproducible sequences.
///
/// # Example
///
/// ```
/// use stackbot_engine::PieceBag;
///
/// let mut bag = PieceBag::with_seed(42);
/// let first = bag.pop_next();
/// let upcoming: Vec<_> = bag.next_pieces().take(3).collect();
///
/// let mut replay = PieceBag::with_seed(42);
/// assert_eq!(replay.pop_next(), first);
/// assert_eq!(replay.next_pieces().take(3).collect::<Vec<_>>(), upcoming);
/// ```
#[derive(Debug, Clone)]
pub struct PieceBag<R = Pcg32> {
    rng: R,
    bag: VecDeque<PieceKind>,
}

impl PieceBag<Pcg32> {
    /// Creates a reproducible generator seeded with `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(Pcg32::seed_from_u64(seed))
    }
}

impl<R> PieceBag<R>
where
    R: Rng,
{
    /// Creates a generator drawing its shuffles from `rng`.
    pub fn from_rng(rng: R) -> Self {
        let mut this = Self {
            rng,
            bag: VecDeque::with_capacity(PieceKind::LEN * 2),
        };
        this.fill_bag();
        this
    }

    /// Tops the queue up so that at least one full preview remains after a pop.
    fn fill_bag(&mut self) {
        while self.bag.len() <= PieceKind::LEN {
            let mut new_bag = PieceKind::ALL;
            new_bag.shuffle(&mut self.rng);
            self.bag.extend(new_bag);
        }
    }

    /// Removes and returns the next piece kind.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty, which `fill_bag` rules out.
    pub fn pop_next(&mut self) -> PieceKind {
        let next = self.bag.pop_front().expect("piece bag should never be empty");
        self.fill_bag();
        next
    }

    /// Upcoming kinds in draw order. Always yields more than [`PieceKind::LEN`] items.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.iter().copied()
    }

    /// The kind that the next [`PieceBag::pop_next`] returns.
    #[must_use]
    pub fn peek_next(&self) -> PieceKind {
        self.bag[0]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_each_bag_is_a_permutation() {
        let mut bag = PieceBag::with_seed(3);
        for _ in 0..10 {
            let drawn: HashSet<_> = (0..PieceKind::LEN).map(|_| bag.pop_next()).collect();
            assert_eq!(drawn.len(), PieceKind::LEN);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceBag::with_seed(11);
        let mut b = PieceBag::with_seed(11);
        let seq_a: Vec<_> = (0..50).map(|_| a.pop_next()).collect();
        let seq_b: Vec<_> = (0..50).map(|_| b.pop_next()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_preview_matches_draws() {
        let mut bag = PieceBag::with_seed(5);
        for _ in 0..20 {
            let preview: Vec<_> = bag.next_pieces().collect();
            assert!(preview.len() > PieceKind::LEN);
            assert_eq!(bag.peek_next(), preview[0]);
            assert_eq!(bag.pop_next(), preview[0]);
        }
    }
}
