//! Operating current waveforms.

use std::f64::consts::PI;

/// Total operating current imposed at the cable inlet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurrentWaveform {
    /// Constant current [A]
    Constant(f64),
    /// `amplitude * cos(2 pi f t)`
    Cosine {
        /// Peak current [A]
        amplitude: f64,
        /// Frequency [Hz]
        frequency: f64,
    },
}

impl Default for CurrentWaveform {
    fn default() -> Self {
        Self::Cosine {
            amplitude: 1.0,
            frequency: 50.0,
        }
    }
}

impl CurrentWaveform {
    /// Current at `time` [s].
    pub fn current_at(&self, time: f64) -> f64 {
        match *self {
            Self::Constant(value) => value,
            Self::Cosine {
                amplitude,
                frequency,
            } => amplitude * (2.0 * PI * frequency * time).cos(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_is_one_amp_at_50_hz() {
        let w = CurrentWaveform::default();
        assert_abs_diff_eq!(w.current_at(0.0), 1.0);
        assert_abs_diff_eq!(w.current_at(0.01), -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w.current_at(0.005), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant() {
        let w = CurrentWaveform::Constant(-3.0);
        assert_eq!(w.current_at(123.0), -3.0);
    }
}
