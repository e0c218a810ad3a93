//! Planar multi-channel audio buffer.
//!
//! [`AudioBuffer`] owns one `Vec<f32>` per channel, all allocated to the same
//! *capacity*. The *length* (samples per channel currently in use) can shrink
//! and grow within that capacity without touching the allocator, which is what
//! lets group nodes reuse their scratch buffers on every block.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Planar buffer of `f32` samples with a fixed per-channel capacity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    len: usize,
}

impl AudioBuffer {
    /// Allocate a zeroed buffer. The length starts at `capacity`.
    pub fn new(num_channels: usize, capacity: usize) -> Self {
        Self {
            channels: vec![vec![0.0; capacity]; num_channels],
            len: capacity,
        }
    }

    /// Wrap existing channel data.
    ///
    /// Channels shorter than the longest one are zero-padded so every channel
    /// shares the same capacity.
    pub fn from_channels(mut channels: Vec<Vec<f32>>) -> Self {
        let len = channels.iter().map(Vec::len).max().unwrap_or(0);
        for ch in &mut channels {
            ch.resize(len, 0.0);
        }
        Self { channels, len }
    }

    /// De-interleave `frames * num_channels` samples. A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[f32], num_channels: usize) -> Self {
        if num_channels == 0 {
            return Self::default();
        }
        let frames = samples.len() / num_channels;
        let mut buffer = Self::new(num_channels, frames);
        for (frame, chunk) in samples.chunks_exact(num_channels).enumerate() {
            for (ch, &sample) in chunk.iter().enumerate() {
                buffer.channels[ch][frame] = sample;
            }
        }
        buffer
    }

    /// Write the active region back out interleaved.
    pub fn copy_to_interleaved(&self, out: &mut Vec<f32>) {
        out.clear();
        out.reserve(self.len * self.channels.len());
        for frame in 0..self.len {
            for ch in &self.channels {
                out.push(ch[frame]);
            }
        }
    }

    /// Number of channels.
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel currently in use.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no samples are in use.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated samples per channel.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Change the active length. Values above the capacity are clamped.
    #[inline]
    pub fn set_len(&mut self, len: usize) {
        self.len = len.min(self.capacity());
    }

    /// Active samples of one channel.
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index][..self.len]
    }

    /// Mutable active samples of one channel.
    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        let len = self.len;
        &mut self.channels[index][..len]
    }

    /// Iterate the active region of every channel mutably.
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        let len = self.len;
        self.channels.iter_mut().map(move |ch| &mut ch[..len])
    }

    /// Zero the active region of every channel.
    pub fn clear(&mut self) {
        for ch in self.channels_mut() {
            ch.fill(0.0);
        }
    }

    /// Make `self` a copy of `other`'s active region.
    ///
    /// The length follows `other` (clamped to capacity). Channels `other` does
    /// not have are zeroed.
    pub fn copy_from(&mut self, other: &AudioBuffer) {
        self.set_len(other.len);
        let len = self.len;
        for (ch, dst) in self.channels.iter_mut().enumerate() {
            let dst = &mut dst[..len];
            match other.channels.get(ch) {
                Some(src) => dst.copy_from_slice(&src[..len]),
                None => dst.fill(0.0),
            }
        }
    }

    /// Add `other` into `self` over the overlapping channels and samples.
    pub fn accumulate_from(&mut self, other: &AudioBuffer) {
        let len = self.len.min(other.len);
        for (dst, src) in self.channels.iter_mut().zip(&other.channels) {
            for (d, s) in dst[..len].iter_mut().zip(&src[..len]) {
                *d += *s;
            }
        }
    }

    /// Overwrite the overlapping channels and samples with `other`.
    ///
    /// Unlike [`copy_from`](Self::copy_from) the length is left alone, so
    /// samples and channels outside the overlap keep their contents.
    pub fn fill_from(&mut self, other: &AudioBuffer) {
        let len = self.len.min(other.len);
        for (dst, src) in self.channels.iter_mut().zip(&other.channels) {
            dst[..len].copy_from_slice(&src[..len]);
        }
    }

    /// Multiply the active region by a constant.
    pub fn apply_gain(&mut self, gain: f32) {
        for ch in self.channels_mut() {
            for s in ch {
                *s *= gain;
            }
        }
    }
}
