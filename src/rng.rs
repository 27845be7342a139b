#[derive(Clone, Debug)]
pub struct Rng {
    seed: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn next_f64(&mut self) -> f64 {
        self.seed = self.seed.wrapping_add(0x6d2b79f5);
        let mut t = self.seed;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        let out = t ^ (t >> 14);
        out as f64 / 4_294_967_296.0
    }

    pub fn below(&mut self, max: f64) -> f64 {
        if max <= 0.0 {
            return 0.0;
        }
        self.next_f64() * max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_yields_same_sequence() {
        let mut a = Rng::new(7);
        let mut b = Rng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn below_stays_in_half_open_range() {
        let mut rng = Rng::new(12_345);
        for _ in 0..10_000 {
            let value = rng.below(800.0);
            assert!((0.0..800.0).contains(&value), "out of range: {value}");
        }
    }

    #[test]
    fn below_non_positive_bound_is_zero() {
        let mut rng = Rng::new(1);
        assert_eq!(rng.below(0.0), 0.0);
        assert_eq!(rng.below(-5.0), 0.0);
    }
}
