//! WAVE and AIFF/AIFC parsing, and WAVE header writing.
//!
//! Parsing only reads the chunks needed to describe the PCM data: `fmt `,
//! `bext` and `data` for WAVE, `COMM` and `SSND` for AIFF/AIFC. Descriptor
//! summaries are file headers without sample data, so [`ParseMode::Summary`]
//! accepts a missing or truncated data chunk.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::{debug, warn};

use super::reader::ByteRangeReader;
use crate::util::{be_u16, be_u32, le_u16, le_u32, le_u64, slice_at, Error, Result};

/// Size of a version 1 `bext` chunk body without coding history.
pub const BEXT_SIZE: u32 = 602;

const WAVE_FORMAT_PCM: u16 = 0x0001;
const WAVE_FORMAT_IEEE_FLOAT: u16 = 0x0003;
const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Container of a parsed audio file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AudioFormat {
    #[default]
    Wave,
    Aiff,
    Aifc,
}

/// How much of the file must be present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseMode {
    /// Complete file: the data chunk must be there.
    Full,
    /// Descriptor summary: header chunks only.
    Summary,
}

/// Audio properties found in a file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RiffAudioFile {
    pub format: AudioFormat,
    pub channels: u16,
    pub sample_rate: u32,
    /// Bits per sample.
    pub sample_size: u16,
    /// Sample frames.
    pub sample_count: u64,
    /// Offset of the first sample byte.
    pub pcm_audio_start_offset: u64,
    /// AIFC samples are little-endian (`sowt`).
    pub little_endian: bool,
    pub bext: Option<WavBext>,
}

impl RiffAudioFile {
    /// True when every numeric field was found.
    pub fn is_complete(&self) -> bool {
        self.channels > 0 && self.sample_rate > 0 && self.sample_size > 0 && self.sample_count > 0
    }
}

/// Parse a WAVE or AIFF/AIFC file from `reader`.
pub fn parse_audio_file(reader: &dyn ByteRangeReader, mode: ParseMode) -> Result<RiffAudioFile> {
    let mut head = [0u8; 12];
    reader
        .read_exact_at(0, &mut head)
        .map_err(|_| parse_error("file is shorter than a RIFF header"))?;

    match (&head[0..4], &head[8..12]) {
        (b"RIFF", b"WAVE") => parse_wave(reader, mode),
        (b"FORM", b"AIFF") => parse_aiff(reader, mode, AudioFormat::Aiff),
        (b"FORM", b"AIFC") => parse_aiff(reader, mode, AudioFormat::Aifc),
        _ => Err(parse_error(format!(
            "unknown container '{}'/'{}'",
            String::from_utf8_lossy(&head[0..4]),
            String::from_utf8_lossy(&head[8..12])
        ))),
    }
}

/// Walk the chunks following the 12-byte header, calling `f(id, body_offset, size)`
/// until it returns false or the source ends.
fn for_each_chunk(
    reader: &dyn ByteRangeReader,
    big_endian: bool,
    mut f: impl FnMut([u8; 4], u64, u32) -> Result<bool>,
) -> Result<()> {
    let len = reader.len();
    let mut pos = 12u64;
    let mut header = [0u8; 8];

    while pos + 8 <= len {
        reader.read_exact_at(pos, &mut header)?;
        let id = [header[0], header[1], header[2], header[3]];
        let size = if big_endian { be_u32(&header, 4)? } else { le_u32(&header, 4)? };
        if !f(id, pos + 8, size)? {
            break;
        }
        pos += 8 + size as u64 + (size & 1) as u64;
    }
    Ok(())
}

fn parse_wave(reader: &dyn ByteRangeReader, mode: ParseMode) -> Result<RiffAudioFile> {
    let mut out = RiffAudioFile { format: AudioFormat::Wave, ..Default::default() };
    let mut has_fmt = false;
    let mut data: Option<(u64, u32)> = None;

    for_each_chunk(reader, false, |id, offset, size| {
        match &id {
            b"fmt " => {
                let body = reader.read_vec(offset, (size as usize).min(40))?;
                let tag = le_u16(&body, 0)?;
                out.channels = le_u16(&body, 2)?;
                out.sample_rate = le_u32(&body, 4)?;
                out.sample_size = le_u16(&body, 14)?;
                if !matches!(tag, WAVE_FORMAT_PCM | WAVE_FORMAT_IEEE_FLOAT | WAVE_FORMAT_EXTENSIBLE) {
                    warn!("WAVE format tag 0x{:04x} is not PCM", tag);
                }
                has_fmt = true;
            }
            b"bext" => match reader.read_vec(offset, (size as usize).min(BEXT_SIZE as usize)) {
                Ok(body) => out.bext = WavBext::parse(&body).ok(),
                Err(e) => debug!("unreadable bext chunk: {}", e),
            },
            b"data" => {
                data = Some((offset, size));
                // sample data follows, nothing else is needed
                return Ok(false);
            }
            _ => debug!("skipping chunk '{}'", String::from_utf8_lossy(&id)),
        }
        Ok(true)
    })?;

    if !has_fmt {
        return Err(parse_error("WAVE file has no fmt chunk"));
    }
    match data {
        Some((offset, size)) => {
            let frame = out.channels as u64 * (out.sample_size as u64 / 8);
            if frame == 0 {
                return Err(parse_error("WAVE fmt chunk has no channels or sample size"));
            }
            out.pcm_audio_start_offset = offset;
            out.sample_count = size as u64 / frame;
        }
        None if mode == ParseMode::Summary => debug!("summary has no data chunk"),
        None => return Err(parse_error("WAVE file has no data chunk")),
    }
    Ok(out)
}

fn parse_aiff(reader: &dyn ByteRangeReader, mode: ParseMode, format: AudioFormat) -> Result<RiffAudioFile> {
    let mut out = RiffAudioFile { format, ..Default::default() };
    let mut has_comm = false;
    let mut has_ssnd = false;

    for_each_chunk(reader, true, |id, offset, size| {
        match &id {
            b"COMM" => {
                let body = reader.read_vec(offset, (size as usize).min(22))?;
                out.channels = be_u16(&body, 0)?;
                out.sample_count = be_u32(&body, 2)? as u64;
                out.sample_size = be_u16(&body, 6)?;
                out.sample_rate = extended_to_u32(slice_at(&body, 8, 10)?)?;
                if format == AudioFormat::Aifc {
                    let compression = slice_at(&body, 18, 4)?;
                    match compression {
                        b"NONE" | b"twos" => {}
                        b"sowt" => out.little_endian = true,
                        other => warn!("AIFC compression '{}' is not PCM", String::from_utf8_lossy(other)),
                    }
                }
                has_comm = true;
            }
            b"SSND" => {
                let mut head = [0u8; 4];
                match reader.read_exact_at(offset, &mut head) {
                    Ok(()) => {
                        out.pcm_audio_start_offset = offset + 8 + be_u32(&head, 0)? as u64;
                        has_ssnd = true;
                    }
                    Err(_) if mode == ParseMode::Summary => {}
                    Err(e) => return Err(e),
                }
                return Ok(false);
            }
            _ => debug!("skipping chunk '{}'", String::from_utf8_lossy(&id)),
        }
        Ok(true)
    })?;

    if !has_comm {
        return Err(parse_error("AIFF file has no COMM chunk"));
    }
    if !has_ssnd && mode == ParseMode::Full {
        return Err(parse_error("AIFF file has no SSND chunk"));
    }
    Ok(out)
}

/// 80-bit IEEE 754 extended float, as used by AIFF sample rates.
fn extended_to_u32(b: &[u8]) -> Result<u32> {
    let exponent = (((b[0] & 0x7F) as i32) << 8) | b[1] as i32;
    let mantissa = u64::from_be_bytes([b[2], b[3], b[4], b[5], b[6], b[7], b[8], b[9]]);
    if exponent == 0 && mantissa == 0 {
        return Ok(0);
    }
    let shift = 16383 + 63 - exponent;
    if shift < 0 {
        return Err(parse_error("AIFF sample rate overflows"));
    }
    let value = if shift >= 64 { 0 } else { mantissa >> shift };
    u32::try_from(value).map_err(|_| parse_error("AIFF sample rate overflows"))
}

fn u32_to_extended(v: u32) -> [u8; 10] {
    let mut out = [0u8; 10];
    if v == 0 {
        return out;
    }
    let lz = v.leading_zeros();
    let exponent = (16383 + 31 - lz) as u16;
    let mantissa = (v as u64) << (32 + lz);
    out[0..2].copy_from_slice(&exponent.to_be_bytes());
    out[2..10].copy_from_slice(&mantissa.to_be_bytes());
    out
}

fn parse_error(msg: impl Into<String>) -> Error {
    Error::ExternalFileParseFailed(msg.into())
}

// ============================================================================
// Writing
// ============================================================================

/// PCM format of a WAVE file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WavFmt {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl WavFmt {
    /// Bytes per sample frame, `None` when it does not fit a `fmt ` chunk.
    pub fn block_align(&self) -> Option<u16> {
        self.channels.checked_mul(self.bits_per_sample / 8)
    }

    pub fn byte_rate(&self) -> Option<u32> {
        self.sample_rate.checked_mul(self.block_align()? as u32)
    }

    /// Block align and byte rate, or an error for formats no WAVE header can carry.
    pub fn layout(&self) -> Result<(u16, u32)> {
        match (self.block_align(), self.byte_rate()) {
            (Some(align), Some(rate)) => Ok((align, rate)),
            _ => Err(Error::invalid(format!(
                "{} channels of {} bit at {} Hz do not fit a WAVE header",
                self.channels, self.bits_per_sample, self.sample_rate
            ))),
        }
    }
}

/// Broadcast Wave extension fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WavBext {
    pub description: String,
    pub originator: String,
    pub originator_reference: String,
    /// `YYYY:MM:DD`
    pub origination_date: String,
    /// `HH:MM:SS`
    pub origination_time: String,
    /// First sample position since midnight, in samples.
    pub time_reference: u64,
    pub umid: [u8; 64],
}

impl Default for WavBext {
    fn default() -> Self {
        Self {
            description: String::new(),
            originator: String::new(),
            originator_reference: String::new(),
            origination_date: String::new(),
            origination_time: String::new(),
            time_reference: 0,
            umid: [0; 64],
        }
    }
}

impl WavBext {
    fn write(&self, w: &mut impl Write) -> Result<()> {
        write_fixed(w, &self.description, 256)?;
        write_fixed(w, &self.originator, 32)?;
        write_fixed(w, &self.originator_reference, 32)?;
        write_fixed(w, &self.origination_date, 10)?;
        write_fixed(w, &self.origination_time, 8)?;
        w.write_u64::<LittleEndian>(self.time_reference)?;
        w.write_u16::<LittleEndian>(1)?;
        w.write_all(&self.umid)?;
        // loudness values and reserved bytes
        w.write_all(&[0u8; 10 + 180])?;
        Ok(())
    }

    fn parse(body: &[u8]) -> Result<Self> {
        let text = |pos, len| -> Result<String> {
            let raw = slice_at(body, pos, len)?;
            let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
            Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
        };
        let mut umid = [0u8; 64];
        umid.copy_from_slice(slice_at(body, 348, 64)?);
        Ok(Self {
            description: text(0, 256)?,
            originator: text(256, 32)?,
            originator_reference: text(288, 32)?,
            origination_date: text(320, 10)?,
            origination_time: text(330, 8)?,
            time_reference: le_u64(body, 338)?,
            umid,
        })
    }
}

/// Write `s` into a zero-padded field of `len` bytes, truncating if needed.
fn write_fixed(w: &mut impl Write, s: &str, len: usize) -> Result<()> {
    let bytes = s.as_bytes();
    let n = bytes.len().min(len);
    w.write_all(&bytes[..n])?;
    w.write_all(&vec![0u8; len - n])?;
    Ok(())
}

/// Write the RIFF/WAVE header for `data_size` bytes of PCM: `fmt `, optional
/// `bext` and the `data` chunk header. A pad byte is expected after odd-sized
/// data.
pub fn write_wav_header(w: &mut impl Write, fmt: &WavFmt, bext: Option<&WavBext>, data_size: u32) -> Result<()> {
    let riff_size = wav_riff_size(data_size as u64, bext.is_some())?;
    let (block_align, byte_rate) = fmt.layout()?;

    w.write_all(b"RIFF")?;
    w.write_u32::<LittleEndian>(riff_size)?;
    w.write_all(b"WAVE")?;

    w.write_all(b"fmt ")?;
    w.write_u32::<LittleEndian>(16)?;
    w.write_u16::<LittleEndian>(WAVE_FORMAT_PCM)?;
    w.write_u16::<LittleEndian>(fmt.channels)?;
    w.write_u32::<LittleEndian>(fmt.sample_rate)?;
    w.write_u32::<LittleEndian>(byte_rate)?;
    w.write_u16::<LittleEndian>(block_align)?;
    w.write_u16::<LittleEndian>(fmt.bits_per_sample)?;

    if let Some(bext) = bext {
        w.write_all(b"bext")?;
        w.write_u32::<LittleEndian>(BEXT_SIZE)?;
        bext.write(w)?;
    }

    w.write_all(b"data")?;
    w.write_u32::<LittleEndian>(data_size)?;
    Ok(())
}

/// Value of the RIFF size field for a WAVE file carrying `data_size` bytes.
pub fn wav_riff_size(data_size: u64, with_bext: bool) -> Result<u32> {
    let bext_chunk = if with_bext { 8 + BEXT_SIZE as u64 } else { 0 };
    let riff_size = 4 + (8 + 16) + bext_chunk + 8 + data_size + (data_size & 1);
    u32::try_from(riff_size).map_err(|_| Error::EssenceFileTooLarge(data_size))
}

/// Build a minimal AIFF/AIFC header, for summaries and tests.
pub fn aiff_header(format: AudioFormat, channels: u16, frames: u32, bits: u16, rate: u32, data_size: u32) -> Vec<u8> {
    let aifc = format == AudioFormat::Aifc;
    let comm_size: u32 = if aifc { 24 } else { 18 };
    let mut out = Vec::new();
    out.extend_from_slice(b"FORM");
    out.extend_from_slice(&(4 + 8 + comm_size + 8 + 8 + data_size).to_be_bytes());
    out.extend_from_slice(if aifc { b"AIFC" } else { b"AIFF" });
    out.extend_from_slice(b"COMM");
    out.extend_from_slice(&comm_size.to_be_bytes());
    out.extend_from_slice(&channels.to_be_bytes());
    out.extend_from_slice(&frames.to_be_bytes());
    out.extend_from_slice(&bits.to_be_bytes());
    out.extend_from_slice(&u32_to_extended(rate));
    if aifc {
        out.extend_from_slice(b"NONE");
        // empty pascal string, padded
        out.extend_from_slice(&[0, 0]);
    }
    out.extend_from_slice(b"SSND");
    out.extend_from_slice(&(8 + data_size).to_be_bytes());
    out.extend_from_slice(&[0u8; 8]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::essence::reader::MemReader;

    fn wav(channels: u16, rate: u32, bits: u16, data: &[u8], bext: Option<&WavBext>) -> Vec<u8> {
        let mut out = Vec::new();
        let fmt = WavFmt { channels, sample_rate: rate, bits_per_sample: bits };
        write_wav_header(&mut out, &fmt, bext, data.len() as u32).unwrap();
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn test_wave_header_layout() {
        let bytes = wav(2, 48000, 24, &[0u8; 12], None);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(le_u32(&bytes, 4).unwrap() as usize, bytes.len() - 8);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(bytes.len(), 44 + 12);
        // byte rate, block align
        assert_eq!(le_u32(&bytes, 28).unwrap(), 48000 * 6);
        assert_eq!(le_u16(&bytes, 32).unwrap(), 6);
    }

    #[test]
    fn test_oversized_format_rejected() {
        let wide = WavFmt { channels: u16::MAX, sample_rate: 48000, bits_per_sample: 32 };
        assert_eq!(wide.block_align(), None);
        assert!(write_wav_header(&mut Vec::<u8>::new(), &wide, None, 0).is_err());

        let fast = WavFmt { channels: 64, sample_rate: u32::MAX / 2, bits_per_sample: 32 };
        assert_eq!(fast.block_align(), Some(256));
        assert_eq!(fast.byte_rate(), None);
        assert!(fast.layout().is_err());
    }

    #[test]
    fn test_riff_size_counts_header_and_bext() {
        assert_eq!(wav_riff_size(12, false).unwrap(), 36 + 12);
        assert_eq!(wav_riff_size(11, true).unwrap(), 36 + 8 + BEXT_SIZE + 12);
        let near = u32::MAX as u64 - 10;
        assert!(matches!(wav_riff_size(near, false), Err(Error::EssenceFileTooLarge(n)) if n == near));
    }

    #[test]
    fn test_parse_written_wave() {
        let bext = WavBext {
            description: "take 1".into(),
            originator: "Pro Tools".into(),
            origination_date: "2024:01:02".into(),
            origination_time: "03:04:05".into(),
            time_reference: 172_800_000,
            umid: [7; 64],
            ..Default::default()
        };
        let bytes = wav(2, 48000, 24, &[0u8; 600], Some(&bext));
        assert_eq!(bytes.len(), 44 + 8 + BEXT_SIZE as usize + 600);

        let parsed = parse_audio_file(&MemReader(&bytes), ParseMode::Full).unwrap();
        assert_eq!(parsed.format, AudioFormat::Wave);
        assert_eq!(parsed.channels, 2);
        assert_eq!(parsed.sample_rate, 48000);
        assert_eq!(parsed.sample_size, 24);
        assert_eq!(parsed.sample_count, 100);
        assert_eq!(parsed.pcm_audio_start_offset, 44 + 8 + BEXT_SIZE as u64);
        assert_eq!(parsed.bext, Some(bext));
    }

    #[test]
    fn test_summary_without_data() {
        let mut bytes = wav(1, 44100, 16, &[], None);
        // header only: drop the data chunk header
        bytes.truncate(36);
        assert!(parse_audio_file(&MemReader(&bytes), ParseMode::Full).is_err());
        let parsed = parse_audio_file(&MemReader(&bytes), ParseMode::Summary).unwrap();
        assert_eq!(parsed.sample_rate, 44100);
        assert_eq!(parsed.sample_count, 0);
        assert!(!parsed.is_complete());
    }

    #[test]
    fn test_summary_with_data_size_only() {
        // data chunk header present, body absent: sample count comes from its size
        let mut bytes = wav(1, 48000, 16, &[], None);
        let len = bytes.len();
        bytes[len - 4..].copy_from_slice(&2000u32.to_le_bytes());
        let parsed = parse_audio_file(&MemReader(&bytes), ParseMode::Summary).unwrap();
        assert_eq!(parsed.sample_count, 1000);
        assert!(parsed.is_complete());
    }

    #[test]
    fn test_parse_aifc() {
        let mut bytes = aiff_header(AudioFormat::Aifc, 2, 10, 16, 44100, 40);
        bytes.extend_from_slice(&[0u8; 40]);
        let parsed = parse_audio_file(&MemReader(&bytes), ParseMode::Full).unwrap();
        assert_eq!(parsed.format, AudioFormat::Aifc);
        assert_eq!(parsed.channels, 2);
        assert_eq!(parsed.sample_rate, 44100);
        assert_eq!(parsed.sample_size, 16);
        assert_eq!(parsed.sample_count, 10);
        assert_eq!(parsed.pcm_audio_start_offset, bytes.len() as u64 - 40);
        assert!(!parsed.little_endian);
    }

    #[test]
    fn test_extended_rates() {
        for rate in [8000, 22050, 44100, 48000, 96000, 192000] {
            assert_eq!(extended_to_u32(&u32_to_extended(rate)).unwrap(), rate);
        }
        // 44100 as written by most tools
        let raw = [0x40, 0x0E, 0xAC, 0x44, 0, 0, 0, 0, 0, 0];
        assert_eq!(extended_to_u32(&raw).unwrap(), 44100);
    }

    #[test]
    fn test_unknown_container() {
        let err = parse_audio_file(&MemReader(b"OggS\0\0\0\0\0\0\0\0"), ParseMode::Full).unwrap_err();
        assert!(matches!(err, Error::ExternalFileParseFailed(_)));
    }
}
