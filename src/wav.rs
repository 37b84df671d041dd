//! Canonical WAV (RIFF/WAVE) packaging for raw linear PCM.
//!
//! Hosted speech models hand back headerless little-endian PCM. Browsers and
//! most players need a self-describing container, so the buffer is prefixed
//! with the classic 44-byte header:
//!
//! ```text
//! offset  size  field
//!  0       4    "RIFF"
//!  4       4    36 + data length
//!  8       4    "WAVE"
//! 12       4    "fmt "
//! 16       4    16
//! 20       2    1 (PCM)
//! 22       2    channels
//! 24       4    sample rate
//! 28       4    byte rate
//! 32       2    block align
//! 34       2    bits per sample
//! 36       4    "data"
//! 40       4    data length
//! 44       ..   PCM payload, untouched
//! ```

use std::io::{Cursor, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{Error, Result};

/// Size of the canonical header written in front of every payload.
pub const HEADER_LEN: usize = 44;

/// Sample rate of the hosted TTS output.
pub const DEFAULT_SAMPLE_RATE: u32 = 24000;

/// MIME type advertised for encoded assets.
pub const WAV_MIME: &str = "audio/wav";

const PCM_FORMAT_TAG: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;

/// Layout of an interleaved PCM buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    /// Interleaved channel count (>= 1).
    pub channels: u16,
    /// Frames per second.
    pub sample_rate: u32,
    /// Bytes per sample, 1 to 4.
    pub sample_width: u16,
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: DEFAULT_SAMPLE_RATE,
            sample_width: 2,
        }
    }
}

impl PcmFormat {
    pub fn bits_per_sample(&self) -> u16 {
        self.sample_width.saturating_mul(8)
    }

    /// Bytes per frame across all channels. Saturates for formats that fail
    /// validation.
    pub fn block_align(&self) -> u16 {
        self.channels.saturating_mul(self.sample_width)
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.saturating_mul(u32::from(self.block_align()))
    }

    /// Duration in seconds of `len` payload bytes in this format.
    pub fn duration_secs(&self, len: usize) -> f64 {
        let frames = len / usize::from(self.block_align().max(1));
        frames as f64 / f64::from(self.sample_rate.max(1))
    }

    fn validate(&self, data_len: usize) -> Result<()> {
        if self.channels == 0 {
            return Err(Error::InvalidPcm("channel count must be at least 1".into()));
        }
        if !(1..=4).contains(&self.sample_width) {
            return Err(Error::InvalidPcm(format!(
                "unsupported sample width of {} bytes (expected 1-4)",
                self.sample_width
            )));
        }
        if self.channels.checked_mul(self.sample_width).is_none() {
            return Err(Error::InvalidPcm(format!(
                "{} channels of {} bytes overflow the block align field",
                self.channels, self.sample_width
            )));
        }
        if self.sample_rate == 0 {
            return Err(Error::InvalidPcm("sample rate must be non-zero".into()));
        }
        if u64::from(self.sample_rate) * u64::from(self.block_align()) > u64::from(u32::MAX) {
            return Err(Error::InvalidPcm("byte rate overflows 32 bits".into()));
        }
        let block = usize::from(self.block_align());
        if data_len % block != 0 {
            return Err(Error::InvalidPcm(format!(
                "{data_len} bytes is not a whole number of {block}-byte frames"
            )));
        }
        if data_len as u64 + 36 > u64::from(u32::MAX) {
            return Err(Error::InvalidPcm(format!(
                "{data_len} bytes does not fit in a RIFF container"
            )));
        }
        Ok(())
    }
}

/// Wrap `pcm` in a WAV container.
///
/// The whole asset is assembled in an owned buffer, so the caller gets either
/// the complete file or an error.
pub fn encode_wav(pcm: &[u8], format: PcmFormat) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(HEADER_LEN + pcm.len());
    write_wav(&mut out, pcm, format)?;
    log::debug!(
        "Encoded {} PCM bytes ({} ch, {} Hz, {}-bit) into {} byte WAV",
        pcm.len(),
        format.channels,
        format.sample_rate,
        format.bits_per_sample(),
        out.len()
    );
    Ok(out)
}

/// Stream the header and payload into `writer`.
///
/// Validation happens before the first byte is written. A failing writer may
/// have received a prefix of the asset; use [`encode_wav`] when that matters.
pub fn write_wav<W: Write>(writer: &mut W, pcm: &[u8], format: PcmFormat) -> Result<()> {
    format.validate(pcm.len())?;
    let data_len = pcm.len() as u32;

    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&(36 + data_len).to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    header[20..22].copy_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
    header[22..24].copy_from_slice(&format.channels.to_le_bytes());
    header[24..28].copy_from_slice(&format.sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&format.byte_rate().to_le_bytes());
    header[32..34].copy_from_slice(&format.block_align().to_le_bytes());
    header[34..36].copy_from_slice(&format.bits_per_sample().to_le_bytes());
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_len.to_le_bytes());

    writer.write_all(&header)?;
    writer.write_all(pcm)?;
    writer.flush()?;
    Ok(())
}

/// Base64 data URI for an encoded WAV asset, playable in an `<audio>` tag.
pub fn wav_data_uri(wav: &[u8]) -> String {
    format!("data:{WAV_MIME};base64,{}", STANDARD.encode(wav))
}

/// Fields of a canonical 44-byte WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub chunk_size: u32,
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_len: u32,
}

impl WavHeader {
    /// Parse a header laid out exactly as [`encode_wav`] writes it.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::InvalidMedia(format!(
                "WAV header truncated ({} bytes)",
                bytes.len()
            )));
        }
        if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(Error::InvalidMedia("missing RIFF/WAVE magic".into()));
        }
        if &bytes[12..16] != b"fmt " || &bytes[36..40] != b"data" {
            return Err(Error::InvalidMedia("not a canonical fmt/data layout".into()));
        }

        let u16_at = |i: usize| u16::from_le_bytes([bytes[i], bytes[i + 1]]);
        let u32_at =
            |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);

        Ok(Self {
            chunk_size: u32_at(4),
            audio_format: u16_at(20),
            channels: u16_at(22),
            sample_rate: u32_at(24),
            byte_rate: u32_at(28),
            block_align: u16_at(32),
            bits_per_sample: u16_at(34),
            data_len: u32_at(40),
        })
    }

    /// The PCM layout this header describes.
    pub fn format(&self) -> PcmFormat {
        PcmFormat {
            channels: self.channels,
            sample_rate: self.sample_rate,
            sample_width: self.bits_per_sample / 8,
        }
    }
}

/// Summary of an audio track uploaded for karaoke playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub duration_secs: f64,
}

/// Inspect an arbitrary WAV file (any header variant `hound` understands).
pub fn probe_track(bytes: &[u8]) -> Result<TrackInfo> {
    let reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    let frames = reader.duration();
    let info = TrackInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        duration_secs: f64::from(frames) / f64::from(spec.sample_rate.max(1)),
    };
    log::info!(
        "Probed track: {} ch, {} Hz, {}-bit, {:.2}s",
        info.channels,
        info.sample_rate,
        info.bits_per_sample,
        info.duration_secs
    );
    Ok(info)
}
