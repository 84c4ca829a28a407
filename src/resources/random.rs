//! Random number generator resource.
//!
//! Wraps a seedable [`fastrand::Rng`] so scenes are reproducible in tests.
//! Also produces the UUID-v4 formatted ids assigned to nodes on their first
//! attachment to a state.

use bevy_ecs::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct RandomGenerator {
    rng: fastrand::Rng,
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }
}

impl RandomGenerator {
    /// Seeded generator; a seed of 0 uses entropy instead.
    pub fn with_seed(seed: u64) -> Self {
        if seed == 0 {
            Self::default()
        } else {
            Self {
                rng: fastrand::Rng::with_seed(seed),
            }
        }
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.usize(0..len)
    }

    /// Uniform float in `[0, 1)`.
    pub fn frac(&mut self) -> f32 {
        self.rng.f32()
    }

    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.rng.f32()
    }

    /// Random id in the `xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx` layout.
    pub fn uuid(&mut self) -> String {
        let mut bytes = [0u8; 16];
        for b in bytes.iter_mut() {
            *b = self.rng.u8(..);
        }
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    }
}
