//! WAV file reading and writing.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};
use rackgraph_core::AudioBuffer;
use thiserror::Error;

/// WAV I/O failure.
#[derive(Debug, Error)]
pub enum WavError {
    /// Error from the WAV codec
    #[error("WAV error: {0}")]
    Hound(#[from] hound::Error),

    /// Requested output bit depth is not 16, 24 or 32
    #[error("unsupported bit depth {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),
}

/// WAV stream format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32).
    pub bits_per_sample: u16,
}

impl WavSpec {
    fn to_hound(self) -> Result<hound::WavSpec, WavError> {
        let sample_format = match self.bits_per_sample {
            32 => SampleFormat::Float,
            16 | 24 => SampleFormat::Int,
            other => return Err(WavError::UnsupportedBitDepth(other)),
        };
        Ok(hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format,
        })
    }
}

/// Read a WAV file into a planar buffer, one channel per file channel.
///
/// Integer samples are scaled to `[-1, 1)`.
pub fn read_wav(path: impl AsRef<Path>) -> Result<(AudioBuffer, WavSpec), WavError> {
    let reader = WavReader::open(path)?;
    let hound_spec = reader.spec();
    let spec = WavSpec {
        channels: hound_spec.channels,
        sample_rate: hound_spec.sample_rate,
        bits_per_sample: hound_spec.bits_per_sample,
    };

    let samples: Vec<f32> = match hound_spec.sample_format {
        SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (hound_spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok((
        AudioBuffer::from_interleaved(&samples, usize::from(spec.channels)),
        spec,
    ))
}

/// Write the active region of `buffer` to a WAV file.
///
/// 32-bit output is IEEE float; 16 and 24-bit output is clamped PCM.
pub fn write_wav(
    path: impl AsRef<Path>,
    buffer: &AudioBuffer,
    spec: WavSpec,
) -> Result<(), WavError> {
    let mut writer = WavWriter::create(path, spec.to_hound()?)?;
    let mut interleaved = Vec::new();
    buffer.copy_to_interleaved(&mut interleaved);

    if spec.bits_per_sample == 32 {
        for &sample in &interleaved {
            writer.write_sample(sample)?;
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        for &sample in &interleaved {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
    }

    writer.finalize()?;
    Ok(())
}
