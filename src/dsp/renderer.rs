//! Offline renderer — turns a tone timeline into samples and WAV bytes.

use super::oscillator::Oscillator;
use crate::host::offline::RecordedTone;

/// Mix recorded tones into a mono buffer that ends when the last tone does.
pub fn render_tones(tones: &[RecordedTone], sample_rate: u32) -> Vec<f64> {
    let sr = sample_rate as f64;
    let end = tones.iter().map(RecordedTone::end).fold(0.0, f64::max);
    let mut buffer = vec![0.0; (end * sr).ceil() as usize];

    for tone in tones {
        let request = &tone.request;
        let first = (request.start * sr).ceil() as usize;
        let last = ((tone.end() * sr).ceil() as usize).min(buffer.len());
        let mut osc = Oscillator::new(request.waveform, request.frequency, sr);
        for (index, slot) in buffer.iter_mut().enumerate().take(last).skip(first) {
            let t = index as f64 / sr;
            *slot += osc.next_sample() * request.envelope.value_at(t);
        }
    }

    buffer
}

/// Highest sample rate accepted for offline rendering.
pub const MAX_SAMPLE_RATE: u32 = 192_000;

/// Whether `sample_rate` can be rendered: non-zero and at most [`MAX_SAMPLE_RATE`].
pub fn supports_sample_rate(sample_rate: u32) -> bool {
    (1..=MAX_SAMPLE_RATE).contains(&sample_rate)
}

/// Write mono samples as a 16-bit PCM WAV file. Samples are clipped to [-1, 1].
pub fn encode_wav(samples: &[f64], sample_rate: u32) -> Vec<u8> {
    const HEADER_LEN: u32 = 44;
    let data_len = samples.len() as u32 * 2;

    let mut wav = Vec::with_capacity((HEADER_LEN + data_len) as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(HEADER_LEN - 8 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    // fmt chunk: PCM, one channel, 16 bits
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&sample_rate.saturating_mul(2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend(samples.iter().flat_map(|&s| {
        let pcm = (s.clamp(-1.0, 1.0) * i16::MAX as f64) as i16;
        pcm.to_le_bytes()
    }));
    wav
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvelopeConfig;
    use crate::dsp::envelope::GainEnvelope;
    use crate::dsp::oscillator::Waveform;
    use crate::host::ToneRequest;

    const SR: u32 = 8000;

    fn tone(start: f64, cut: Option<f64>) -> RecordedTone {
        RecordedTone {
            request: ToneRequest {
                frequency: 440.0,
                waveform: Waveform::Sine,
                envelope: GainEnvelope::piano(start, &EnvelopeConfig::default()),
                start,
                stop: start + 0.7,
            },
            cut,
        }
    }

    fn peak(samples: &[f64]) -> f64 {
        samples.iter().fold(0.0, |m, s| m.max(s.abs()))
    }

    #[test]
    fn buffer_ends_with_last_tone() {
        let out = render_tones(&[tone(0.5, None)], SR);
        assert_eq!(out.len(), ((0.5 + 0.7) * SR as f64).ceil() as usize);
    }

    #[test]
    fn silent_before_start_and_loud_in_sustain() {
        let out = render_tones(&[tone(0.5, None)], SR);
        let start = (0.5 * SR as f64) as usize;
        assert!(out[..start].iter().all(|&s| s == 0.0));

        let sustain = &out[(0.65 * SR as f64) as usize..(0.95 * SR as f64) as usize];
        let p = peak(sustain);
        assert!((p - 1.0).abs() < 0.01, "sustain peak should be ~1, got {p}");
    }

    #[test]
    fn release_fades_out() {
        let out = render_tones(&[tone(0.0, None)], SR);
        let tail = &out[(0.69 * SR as f64) as usize..];
        assert!(peak(tail) < 0.06, "tail should be near silence, got {}", peak(tail));
    }

    #[test]
    fn cut_tone_is_silent_after_cut() {
        let out = render_tones(&[tone(0.0, Some(0.3)), tone(0.3, None)], SR);
        // The second tone starts from silence, so right after the cut the mix is quiet.
        let just_after = &out[(0.3 * SR as f64) as usize + 1..(0.31 * SR as f64) as usize];
        assert!(peak(just_after) < 0.15, "got {}", peak(just_after));
    }

    #[test]
    fn wav_header_valid() {
        let wav = encode_wav(&render_tones(&[tone(0.0, None)], 22050), 22050);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(&wav[36..40], b"data");

        let sr = u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]);
        assert_eq!(sr, 22050);
        let channels = u16::from_le_bytes([wav[22], wav[23]]);
        assert_eq!(channels, 1);

        let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
        assert_eq!(wav.len(), 44 + data_size as usize);
        let riff_size = u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]);
        assert_eq!(riff_size as usize, wav.len() - 8);
        let byte_rate = u32::from_le_bytes([wav[28], wav[29], wav[30], wav[31]]);
        assert_eq!(byte_rate, 22050 * 2);
    }

    #[test]
    fn samples_are_clipped_to_full_scale() {
        let wav = encode_wav(&[2.0, -2.0, 0.0], SR);
        let pcm: Vec<i16> = wav[44..]
            .chunks(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(pcm, vec![i16::MAX, -i16::MAX, 0]);
    }

    #[test]
    fn sample_rate_bounds() {
        assert!(supports_sample_rate(44100));
        assert!(supports_sample_rate(MAX_SAMPLE_RATE));
        assert!(!supports_sample_rate(0));
        assert!(!supports_sample_rate(MAX_SAMPLE_RATE + 1));
        assert!(!supports_sample_rate(u32::MAX));
    }

    #[test]
    fn empty_timeline_renders_nothing() {
        assert!(render_tones(&[], SR).is_empty());
        assert_eq!(encode_wav(&[], SR).len(), 44);
    }
}
