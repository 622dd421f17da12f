use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use voc_verifier_application::RandomSource;

pub struct SeededRandomSource {
    rng: StdRng,
}

impl SeededRandomSource {
    /// A fixed seed makes the sampling order reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl RandomSource for SeededRandomSource {
    fn chance(&mut self, probability: f64) -> bool {
        self.rng.random::<f64>() < probability
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut first = SeededRandomSource::new(Some(7));
        let mut second = SeededRandomSource::new(Some(7));
        let a: Vec<usize> = (0..16).map(|_| first.pick_index(10)).collect();
        let b: Vec<usize> = (0..16).map(|_| second.pick_index(10)).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|index| *index < 10));
    }

    #[test]
    fn chance_respects_bounds() {
        let mut random = SeededRandomSource::new(Some(1));
        assert!((0..32).all(|_| random.chance(1.0)));
        assert!((0..32).all(|_| !random.chance(0.0)));
    }
}
