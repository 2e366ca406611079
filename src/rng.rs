//! Seeded uniform source and Gaussian sampling for the path simulator.
//!
//! The simulator takes any [`RngCore`]; uniforms are read as
//! `next_u32() / u32::MAX`, so feeding it the [`Lcg`] below reproduces the
//! demo's trajectories bit for bit.

use rand::{RngCore, SeedableRng};

const LCG_MUL: u32 = 1_664_525;
const LCG_INC: u32 = 1_013_904_223;

/// 32-bit linear congruential generator (`s <- s * 1664525 + 1013904223 mod 2^32`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current internal state; the next output is derived from it.
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RngCore for Lcg {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
        self.state
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// Uniform draw in `[0, 1]`, both ends included.
#[inline]
pub fn unit<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.next_u32()) / f64::from(u32::MAX)
}

/// Standard normal draw via the Box-Muller transform.
///
/// Each of the two uniforms is redrawn while it is exactly zero, so the
/// logarithm stays finite.
pub fn standard_normal<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    let mut u = 0.0;
    while u == 0.0 {
        u = unit(rng);
    }
    let mut v = 0.0;
    while v == 0.0 {
        v = unit(rng);
    }
    (-2.0 * u.ln()).sqrt() * (2.0 * std::f64::consts::PI * v).cos()
}
