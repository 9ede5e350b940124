use getrandom::getrandom;
use oorandom::Rand64;

pub fn rng64(seed: u128) -> Rand64 {
    Rand64::new(seed)
}

pub fn os_random_seed() -> u128 {
    let mut buf = [0; 16];
    let _res = getrandom(&mut buf);
    u128::from_le_bytes(buf)
}

/// Draws a new seed from an existing generator, so every particle gets its own stream.
pub fn split_seed(rng: &mut Rand64) -> u128 {
    rng.rand_u64() as u128 + ((rng.rand_u64() as u128) << 64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_stream() {
        let mut a = rng64(42);
        let mut b = rng64(42);

        for _ in 0..10 {
            assert_eq!(a.rand_u64(), b.rand_u64(), "Streams diverged.");
        }
    }

    #[test]
    fn split_seeds_differ() {
        let mut rng = rng64(7);
        let first = split_seed(&mut rng);
        let second = split_seed(&mut rng);

        assert_ne!(first, second, "Consecutive split seeds should differ.");
    }

    #[test]
    fn split_seed_is_reproducible() {
        let first = split_seed(&mut rng64(99));
        let second = split_seed(&mut rng64(99));

        assert_eq!(first, second, "Splitting the same seed twice should match.");
    }
}
