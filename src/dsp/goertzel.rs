//! Goertzel tone detectors
//!
//! Single-bin DFT evaluated sample by sample. Power is normalized by
//! `(N/2)^2` so a full-scale sine at the detector frequency reads 1.0 and a
//! sine of amplitude `A` reads `A^2`.

use core::f32::consts::PI;
#[cfg(feature = "embedded")]
use micromath::F32Ext;

use crate::config::{DTMF_COL_HZ, DTMF_ROW_HZ, NUM_DETECTORS};
use crate::error::{Error, Result};

/// Streaming Goertzel filter for one frequency
#[derive(Clone, Copy, Debug)]
pub struct Goertzel {
    coeff: f32,
    cos: f32,
    sin: f32,
    q1: f32,
    q2: f32,
}

impl Goertzel {
    /// Create a detector for `frequency` at `sample_rate`
    #[must_use]
    pub fn new(frequency: f32, sample_rate: f32) -> Self {
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos = omega.cos();
        Self {
            coeff: 2.0 * cos,
            cos,
            sin: omega.sin(),
            q1: 0.0,
            q2: 0.0,
        }
    }

    /// Feed one sample
    pub fn push(&mut self, sample: f32) {
        let q0 = self.coeff * self.q1 - self.q2 + sample;
        self.q2 = self.q1;
        self.q1 = q0;
    }

    /// Magnitude squared over the samples fed since the last reset
    #[must_use]
    pub fn power(&self) -> f32 {
        let real = self.q1 - self.q2 * self.cos;
        let imag = self.q2 * self.sin;
        real * real + imag * imag
    }

    /// Clear the filter state
    pub fn reset(&mut self) {
        self.q1 = 0.0;
        self.q2 = 0.0;
    }
}

/// Normalized power of `frequency` over a whole block
#[must_use]
pub fn block_power(samples: &[f32], frequency: f32, sample_rate: f32) -> f32 {
    let mut filter = Goertzel::new(frequency, sample_rate);
    samples.iter().for_each(|&s| filter.push(s));
    normalize(filter.power(), samples.len())
}

fn normalize(power: f32, block_size: usize) -> f32 {
    let half = block_size as f32 / 2.0;
    if half > 0.0 {
        power / (half * half)
    } else {
        0.0
    }
}

/// Seven detectors on the DTMF row and column frequencies
///
/// Channels 0-3 are the rows, 4-6 the columns. Energies are latched at the
/// end of each block and hold until the next block completes.
#[derive(Clone, Copy, Debug)]
pub struct DetectorBank {
    detectors: [Goertzel; NUM_DETECTORS],
    energies: [f32; NUM_DETECTORS],
    block_size: usize,
    count: usize,
}

impl DetectorBank {
    /// Create the DTMF bank
    #[must_use]
    pub fn new(sample_rate: f32, block_size: usize) -> Self {
        let detectors = core::array::from_fn(|channel| {
            let frequency = DTMF_ROW_HZ
                .get(channel)
                .copied()
                .unwrap_or_else(|| DTMF_COL_HZ[channel - DTMF_ROW_HZ.len()]);
            Goertzel::new(frequency, sample_rate)
        });
        Self {
            detectors,
            energies: [0.0; NUM_DETECTORS],
            block_size: block_size.max(1),
            count: 0,
        }
    }

    /// Feed one input sample; returns `true` when a block completed
    pub fn push(&mut self, sample: f32) -> bool {
        self.detectors.iter_mut().for_each(|d| d.push(sample));
        self.count += 1;
        if self.count < self.block_size {
            return false;
        }

        for (energy, detector) in self.energies.iter_mut().zip(self.detectors.iter_mut()) {
            *energy = normalize(detector.power(), self.block_size);
            detector.reset();
        }
        self.count = 0;
        true
    }

    /// Energy at one channel from the last complete block
    ///
    /// # Errors
    ///
    /// Returns [`Error::DetectorOutOfRange`] for a channel past the bank.
    pub fn energy(&self, channel: usize) -> Result<f32> {
        self.energies
            .get(channel)
            .copied()
            .ok_or(Error::DetectorOutOfRange(channel))
    }

    /// All channel energies from the last complete block
    #[must_use]
    pub const fn energies(&self) -> &[f32; NUM_DETECTORS] {
        &self.energies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(frequency: f32, amplitude: f32, n: usize) -> std::vec::Vec<f32> {
        (0..n)
            .map(|i| amplitude * (2.0 * PI * frequency * i as f32 / 8000.0).sin())
            .collect()
    }

    #[test]
    fn full_scale_reads_about_one() {
        let block = sine(1000.0, 1.0, 80);
        let power = block_power(&block, 1000.0, 8000.0);
        assert!((power - 1.0).abs() < 0.05, "power {power}");
    }

    #[test]
    fn off_frequency_is_small() {
        let block = sine(697.0, 1.0, 80);
        assert!(block_power(&block, 1477.0, 8000.0) < 0.01);
    }

    #[test]
    fn bank_latches_per_block() {
        let mut bank = DetectorBank::new(8000.0, 80);
        let block = sine(770.0, 0.5, 80);
        let completed = block.iter().filter(|&&s| bank.push(s)).count();
        assert_eq!(completed, 1);
        let row = bank.energy(1).unwrap();
        assert!(row > 0.2, "row energy {row}");
        assert!(bank.energy(0).unwrap() * 4.0 < row);
        assert_eq!(bank.energy(7), Err(Error::DetectorOutOfRange(7)));
    }
}
