use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchTier {
    Quick,
    Full,
}

impl BenchTier {
    /// Rulings per orientation for the synthetic lattices.
    pub fn lattice_sides(self) -> &'static [usize] {
        match self {
            BenchTier::Quick => &[8, 32],
            BenchTier::Full => &[8, 32, 96, 192],
        }
    }

    /// Pages per batch for the page fan-out benches.
    pub fn page_batch(self) -> usize {
        match self {
            BenchTier::Quick => 16,
            BenchTier::Full => 128,
        }
    }
}

pub fn bench_tier() -> BenchTier {
    match env::var("TABGRID_BENCH_TIER").as_deref() {
        Ok("full") => BenchTier::Full,
        _ => BenchTier::Quick,
    }
}
