use rand::Rng;

/// Returns a uniformly random permutation of `items`, leaving the input untouched.
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with(items, &mut rand::rng())
}

/// Fisher–Yates from the last index down to 1, each element swapped with a
/// uniformly chosen index at or below it.
pub fn shuffle_with<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    for i in (1..copy.len()).rev() {
        let j = rng.random_range(0..=i);
        copy.swap(i, j);
    }
    copy
}
