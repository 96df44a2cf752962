use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hound::{SampleFormat, WavSpec, WavWriter};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("sample rate must be positive")]
    InvalidSampleRate,
    #[error("failed to write WAV container: {0}")]
    Wav(#[from] hound::Error),
}

/// Encodes mono float samples as a 16-bit PCM WAV file held in memory.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, AudioError> {
    if sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate);
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    {
        let mut writer = WavWriter::new(&mut buffer, spec)?;
        for &sample in samples {
            let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(sample_i16)?;
        }
        writer.finalize()?;
    }

    Ok(buffer.into_inner())
}

/// WAV-encodes the samples and wraps the file in standard base64 for JSON transport.
pub fn encode_wav_base64(samples: &[f32], sample_rate: u32) -> Result<String, AudioError> {
    let wav = encode_wav(samples, sample_rate)?;
    Ok(STANDARD.encode(wav))
}
