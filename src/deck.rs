use rand::Rng;

/// Stable handle for a card: its position in the dealt deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub usize);

impl CardId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A dealt card. Exactly two cards in a deck share each rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub rank: u8,
}

/// Build a shuffled deck holding ranks `1..=pair_count`, each twice.
///
/// Positions are assigned after shuffling, so `deck[i].id == CardId(i)`.
pub fn build_deck<R: Rng + ?Sized>(pair_count: u8, rng: &mut R) -> Vec<Card> {
    let mut ranks: Vec<u8> = (1..=pair_count).chain(1..=pair_count).collect();
    shuffle(&mut ranks, rng);

    ranks
        .into_iter()
        .enumerate()
        .map(|(idx, rank)| Card {
            id: CardId(idx),
            rank,
        })
        .collect()
}

/// Fisher-Yates: walk from the last slot down to the second, swapping each
/// with a uniformly chosen slot at or before it.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
