//! WAV fixtures shared by the decode and embedding tests

use std::path::Path;

/// 16-bit PCM WAV with the given interleaved samples
pub fn write_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

/// Mono 16 kHz sine of `samples` length
pub fn write_tone_wav(path: &Path, samples: usize) {
    let tone: Vec<i16> = (0..samples)
        .map(|i| ((i as f32 * 0.05).sin() * 8000.0) as i16)
        .collect();
    write_wav(path, 16_000, 1, &tone);
}
