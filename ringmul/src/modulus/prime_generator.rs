use crate::modulus::MAX_PRIME_BITS;
use primality_test::is_prime;

/// Walks the arithmetic progression `1 + k * nth_root` away from `2^bit_size`
/// and yields the primes it meets.
pub struct NTTFriendlyPrimesGenerator {
    bit_size: u32,
    nth_root: u64,
    next_prime: Option<u64>,
    prev_prime: Option<u64>,
}

impl NTTFriendlyPrimesGenerator {
    pub fn new(bit_size: u32, nth_root: u64) -> Self {
        assert!(
            (2..=MAX_PRIME_BITS).contains(&bit_size),
            "invalid bit_size={}",
            bit_size
        );
        assert!(nth_root > 1, "invalid nth_root={}", nth_root);
        let base: u64 = 1 << bit_size;
        let k: u64 = base / nth_root;
        let prev: u64 = k * nth_root + 1;
        let next: u64 = if prev > base { prev } else { prev + nth_root };
        Self {
            bit_size,
            nth_root,
            next_prime: Some(next),
            prev_prime: if prev < base && k > 0 {
                Some(prev)
            } else {
                prev.checked_sub(nth_root).filter(|p| *p > 1)
            },
        }
    }

    pub fn nth_root(&self) -> u64 {
        self.nth_root
    }

    /// Next prime above 2^bit_size, or None once candidates reach 2^(bit_size+1)
    /// or leave the supported range.
    pub fn next_upstream_prime(&mut self) -> Option<u64> {
        let limit: u64 = 1 << (self.bit_size + 1).min(MAX_PRIME_BITS);
        while let Some(candidate) = self.next_prime {
            if candidate >= limit {
                self.next_prime = None;
                break;
            }
            self.next_prime = candidate.checked_add(self.nth_root);
            if is_prime(candidate) {
                return Some(candidate);
            }
        }
        None
    }

    /// Next prime below 2^bit_size, or None once candidates reach 2^(bit_size-1).
    pub fn next_downstream_prime(&mut self) -> Option<u64> {
        let limit: u64 = 1 << (self.bit_size - 1);
        while let Some(candidate) = self.prev_prime {
            if candidate < limit {
                self.prev_prime = None;
                break;
            }
            self.prev_prime = candidate.checked_sub(self.nth_root).filter(|p| *p > 1);
            if is_prime(candidate) {
                return Some(candidate);
            }
        }
        None
    }

    /// Alternates between downstream and upstream primes, staying close to 2^bit_size.
    pub fn next_alternating_prime(&mut self, upstream: &mut bool) -> Option<u64> {
        let prime: Option<u64> = if *upstream {
            self.next_upstream_prime()
                .or_else(|| self.next_downstream_prime())
        } else {
            self.next_downstream_prime()
                .or_else(|| self.next_upstream_prime())
        };
        *upstream = !*upstream;
        prime
    }

    /// Returns `k` primes, or None if the progression is exhausted first.
    pub fn next_downstream_primes(&mut self, k: usize) -> Option<Vec<u64>> {
        (0..k).map(|_| self.next_downstream_prime()).collect()
    }

    pub fn next_upstream_primes(&mut self, k: usize) -> Option<Vec<u64>> {
        (0..k).map(|_| self.next_upstream_prime()).collect()
    }

    pub fn next_alternating_primes(&mut self, k: usize) -> Option<Vec<u64>> {
        let mut upstream: bool = false;
        (0..k)
            .map(|_| self.next_alternating_prime(&mut upstream))
            .collect()
    }
}
