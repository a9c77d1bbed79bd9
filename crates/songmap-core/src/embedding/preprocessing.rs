//! Mel spectrogram preprocessing for the embedding model
//!
//! Produces the 96-band log-mel input the Discogs-EffNet model was trained on:
//! 16 kHz mono, 512-sample Hann frames, hop 256, `log10(1 + 10000·x)`.

use realfft::RealFftPlanner;

use super::error::{EmbedError, Result};

pub const TARGET_SAMPLE_RATE: u32 = 16_000;
pub const N_BANDS: usize = 96;
pub const FRAME_SIZE: usize = 512;
pub const HOP_SIZE: usize = 256;

/// Log-mel frames, one `N_BANDS` vector per hop
#[derive(Debug, Clone)]
pub struct MelSpectrogram {
    pub frames: Vec<Vec<f32>>,
    pub n_bands: usize,
    pub sample_rate: u32,
}

impl MelSpectrogram {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Compute the model input spectrogram from mono samples
pub fn compute_mel_spectrogram(samples: &[f32], sample_rate: u32) -> Result<MelSpectrogram> {
    if samples.is_empty() || sample_rate == 0 {
        return Err(EmbedError::AudioTooShort {
            samples: 0,
            needed: FRAME_SIZE,
        });
    }

    let resampled = if sample_rate == TARGET_SAMPLE_RATE {
        samples.to_vec()
    } else {
        resample_linear(samples, sample_rate as f32, TARGET_SAMPLE_RATE as f32)
    };

    if resampled.len() < FRAME_SIZE {
        return Err(EmbedError::AudioTooShort {
            samples: resampled.len(),
            needed: FRAME_SIZE,
        });
    }

    let filterbank = mel_filterbank(N_BANDS, FRAME_SIZE, TARGET_SAMPLE_RATE as f32);
    let window = hann_window(FRAME_SIZE);

    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(FRAME_SIZE);
    let mut scratch = fft.make_scratch_vec();
    let mut frame_buf = fft.make_input_vec();
    let mut spectrum = fft.make_output_vec();
    let mut power = vec![0.0f32; spectrum.len()];

    let n_frames = (resampled.len() - FRAME_SIZE) / HOP_SIZE + 1;
    let mut frames = Vec::with_capacity(n_frames);

    for frame_idx in 0..n_frames {
        let start = frame_idx * HOP_SIZE;
        for (i, slot) in frame_buf.iter_mut().enumerate() {
            *slot = resampled[start + i] * window[i];
        }

        fft.process_with_scratch(&mut frame_buf, &mut spectrum, &mut scratch)
            .map_err(|e| EmbedError::InferenceFailed(format!("FFT failed: {:?}", e)))?;

        for (p, c) in power.iter_mut().zip(spectrum.iter()) {
            *p = c.norm_sqr() / FRAME_SIZE as f32;
        }

        let bands: Vec<f32> = filterbank
            .iter()
            .map(|filter| {
                let energy: f32 = filter.iter().zip(power.iter()).map(|(w, p)| w * p).sum();
                (1.0 + 10_000.0 * energy.max(0.0)).log10()
            })
            .collect();
        frames.push(bands);
    }

    log::debug!(
        "compute_mel_spectrogram: {} samples @ {} Hz -> {} frames",
        samples.len(),
        sample_rate,
        frames.len()
    );

    Ok(MelSpectrogram {
        frames,
        n_bands: N_BANDS,
        sample_rate: TARGET_SAMPLE_RATE,
    })
}

/// Linear-interpolation resampler
fn resample_linear(samples: &[f32], from_sr: f32, to_sr: f32) -> Vec<f32> {
    let ratio = from_sr / to_sr;
    let output_len = (samples.len() as f64 * to_sr as f64 / from_sr as f64) as usize;
    let last = samples.len() - 1;

    (0..output_len)
        .map(|i| {
            let pos = i as f32 * ratio;
            let idx = (pos as usize).min(last);
            let frac = pos - idx as f32;
            if idx < last {
                samples[idx] * (1.0 - frac) + samples[idx + 1] * frac
            } else {
                samples[idx]
            }
        })
        .collect()
}

fn hann_window(size: usize) -> Vec<f32> {
    let denom = (size.max(2) - 1) as f32;
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos()))
        .collect()
}

/// Triangular filters evenly spaced on the mel scale from 0 Hz to Nyquist
fn mel_filterbank(n_bands: usize, frame_size: usize, sample_rate: f32) -> Vec<Vec<f32>> {
    let n_bins = frame_size / 2 + 1;
    let mel_max = hz_to_mel(sample_rate / 2.0);

    let edges: Vec<f32> = (0..n_bands + 2)
        .map(|i| mel_max * i as f32 / (n_bands + 1) as f32)
        .map(mel_to_hz)
        .map(|hz| hz * frame_size as f32 / sample_rate)
        .collect();

    edges
        .windows(3)
        .map(|w| {
            let (left, center, right) = (w[0], w[1], w[2]);
            (0..n_bins)
                .map(|bin| {
                    let b = bin as f32;
                    if b >= left && b <= center && center > left {
                        (b - left) / (center - left)
                    } else if b > center && b <= right && right > center {
                        (right - b) / (right - center)
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sr: u32, secs: f32) -> Vec<f32> {
        (0..(sr as f32 * secs) as usize)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sr as f32).sin() * 0.5)
            .collect()
    }

    #[test]
    fn test_mel_hz_roundtrip() {
        let back = mel_to_hz(hz_to_mel(1000.0));
        assert!((back - 1000.0).abs() < 0.1, "1000 Hz came back as {}", back);
    }

    #[test]
    fn test_frame_count_at_native_rate() {
        let samples = vec![0.1f32; 16_000];
        let mel = compute_mel_spectrogram(&samples, 16_000).unwrap();
        assert_eq!(mel.len(), (16_000 - FRAME_SIZE) / HOP_SIZE + 1);
        assert_eq!(mel.frames[0].len(), N_BANDS);
        assert_eq!(mel.sample_rate, 16_000);
    }

    #[test]
    fn test_resampled_input_frame_count() {
        let mel = compute_mel_spectrogram(&sine(440.0, 44_100, 2.0), 44_100).unwrap();
        // 2 s at 16 kHz = 32000 samples
        assert_eq!(mel.len(), (32_000 - FRAME_SIZE) / HOP_SIZE + 1);
    }

    #[test]
    fn test_sine_energy_lands_in_low_bands() {
        let mel = compute_mel_spectrogram(&sine(440.0, 16_000, 1.0), 16_000).unwrap();
        let frame = &mel.frames[mel.len() / 2];
        let peak = frame
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!(peak < N_BANDS / 2, "440 Hz peaked in band {}", peak);
        assert!(frame.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_silence_is_zero() {
        let mel = compute_mel_spectrogram(&vec![0.0; 4096], 16_000).unwrap();
        assert!(mel.frames.iter().flatten().all(|v| *v == 0.0));
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(compute_mel_spectrogram(&[], 44_100).is_err());
    }

    #[test]
    fn test_too_short_input_fails() {
        let err = compute_mel_spectrogram(&vec![0.0; 100], 16_000).unwrap_err();
        assert!(matches!(err, EmbedError::AudioTooShort { samples: 100, .. }));
    }

    #[test]
    fn test_filterbank_shape() {
        let bank = mel_filterbank(N_BANDS, FRAME_SIZE, 16_000.0);
        assert_eq!(bank.len(), N_BANDS);
        assert!(bank.iter().all(|f| f.len() == FRAME_SIZE / 2 + 1));
        assert!(bank.iter().all(|f| f.iter().all(|w| (0.0..=1.0).contains(w))));
    }
}
