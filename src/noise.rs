//! Uniform noise injection for the renderer's signal and floor disturbances,
//! built on the same `funutd::Rnd` generator the rest of this codebase's
//! lineage uses for its noise components.

use funutd::Rnd;

/// A seeded uniform noise source producing values in `(-0.5, 0.5)`, matching
/// the reference renderer's `randf() - 0.5` hot-loop disturbance.
pub struct UniformNoise {
    rnd: Rnd,
}

impl UniformNoise {
    pub fn new(seed: u64) -> Self {
        UniformNoise { rnd: Rnd::from_u64(seed) }
    }

    #[inline]
    pub fn next(&mut self) -> f64 {
        self.rnd.f64() - 0.5
    }
}

impl Default for UniformNoise {
    fn default() -> Self {
        UniformNoise::new(0)
    }
}

/// Converts a noise-level spec value into a peak-to-peak linear multiplier.
/// Values `< 0` are dBFS (`10^(db/20)`); `>= 0` are already linear
/// multipliers. The result is additionally scaled by `2*sqrt(3/4)` so that
/// the RMS of the resulting uniform noise equals the RMS of a sine at the
/// same nominal level.
pub fn noise_pp_level(level: f64) -> f64 {
    let linear = if level < 0.0 { 10f64.powf(level / 20.0) } else { level };
    linear * 2.0 * (0.75f64).sqrt()
}

/// Converts a gain-level spec value (sine-peak level) into a linear
/// multiplier: `< 0` is dBFS, `>= 0` is already a multiplier.
pub fn sine_pk_level(level: f64) -> f64 {
    if level < 0.0 {
        10f64.powf(level / 20.0)
    } else {
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_samples_stay_in_bounds() {
        let mut noise = UniformNoise::new(42);
        for _ in 0..1000 {
            let sample = noise.next();
            assert!((-0.5..0.5).contains(&sample));
        }
    }

    #[test]
    fn noise_pp_level_treats_negative_as_db() {
        let linear = noise_pp_level(0.0);
        assert!((linear - 2.0 * (0.75f64).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn sine_pk_level_zero_is_passthrough_multiplier_not_unity_db() {
        // Per spec, >= 0 is a literal multiplier, not dBFS: 0.0 means silence.
        assert!(sine_pk_level(0.0).abs() < 1e-9);
    }

    #[test]
    fn sine_pk_level_negative_is_dbfs() {
        assert!((sine_pk_level(-20.0) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn sine_pk_level_positive_is_passthrough_multiplier() {
        assert!((sine_pk_level(2.0) - 2.0).abs() < 1e-9);
    }
}
