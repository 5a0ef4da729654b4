//! Writing embedded audio essence to WAVE files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::reader::ByteRangeReader;
use super::riff::{wav_riff_size, write_wav_header, WavBext, WavFmt};
use crate::aaf::AafFile;
use crate::core::convert_unit_u64;
use crate::iface::{Composition, EssenceFile, EssenceType};
use crate::util::{clean_filename, has_extension, Error, Result};
use crate::vendor;

/// Copy size used when streaming sample data.
const COPY_CHUNK: usize = 1 << 16;

/// Output flavour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtractFormat {
    /// PCM gets a Broadcast Wave header; embedded WAVE/AIFC files are copied.
    #[default]
    Default,
    /// Always rewrite as WAVE, without `bext`.
    Wav,
    /// Always rewrite as Broadcast Wave.
    Bwav,
}

/// Sample range and naming of one extraction.
#[derive(Clone, Debug, Default)]
pub struct ExtractRequest<'a> {
    pub format: ExtractFormat,
    /// First sample frame.
    pub sample_offset: u64,
    /// Sample frames, 0 for everything after `sample_offset`.
    pub sample_length: u64,
    /// Output name instead of the essence unique name.
    pub file_name: Option<&'a str>,
}

/// Fail when `size` bytes of sample data cannot be addressed by a RIFF header.
pub fn check_wav_payload_size(size: u64) -> Result<u32> {
    if size >= u32::MAX as u64 {
        return Err(Error::EssenceFileTooLarge(size));
    }
    Ok(size as u32)
}

/// Extract a whole embedded essence into `out_dir` and remember where it went.
pub fn extract_audio_essence(
    file: &AafFile,
    comp: &mut Composition,
    index: usize,
    format: ExtractFormat,
    out_dir: &Path,
) -> Result<PathBuf> {
    let essence = comp
        .audio
        .essence_files
        .get(index)
        .ok_or_else(|| Error::ObjectNotFound(format!("audio essence {}", index)))?;
    let source = embedded_stream(file, essence)?;
    let request = ExtractRequest { format, ..Default::default() };
    let path = extract_from_reader(&source, comp, essence, &request, out_dir)?;

    info!("extracted '{}' to {}", essence.unique_name, path.display());
    comp.audio.essence_files[index].usable_file_path = Some(path.clone());
    Ok(path)
}

/// Extract the essence range used by an audio clip, one file per referenced
/// essence, named `<track>_<clip index>_<unique name>`.
pub fn extract_audio_clip(
    file: &AafFile,
    comp: &Composition,
    track: usize,
    item: usize,
    format: ExtractFormat,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let t = comp
        .audio
        .tracks
        .get(track)
        .ok_or_else(|| Error::ObjectNotFound(format!("audio track {}", track)))?;
    let clip = t
        .items
        .get(item)
        .and_then(|i| i.as_audio())
        .ok_or_else(|| Error::ObjectNotFound(format!("clip {} of track {}", item, t.number)))?;

    let mut done: Vec<usize> = Vec::new();
    let mut out = Vec::new();
    for ptr in &clip.pointers {
        if done.contains(&ptr.essence) {
            continue;
        }
        done.push(ptr.essence);

        let essence = comp
            .audio
            .essence_files
            .get(ptr.essence)
            .ok_or_else(|| Error::ObjectNotFound(format!("audio essence {}", ptr.essence)))?;
        let rate = essence.samplerate_rational;
        let name = format!("{}_{}_{}", t.number, t.clip_index(item), essence.unique_name);
        let request = ExtractRequest {
            format,
            sample_offset: convert_unit_u64(clip.essence_offset.max(0) as u64, t.edit_rate, rate),
            sample_length: convert_unit_u64(clip.len.max(0) as u64, t.edit_rate, rate),
            file_name: Some(name.as_str()),
        };
        let source = embedded_stream(file, essence)?;
        let path = extract_from_reader(&source, comp, essence, &request, out_dir)?;
        info!("extracted clip {} of track {} to {}", t.clip_index(item), t.number, path.display());
        out.push(path);
    }
    Ok(out)
}

fn embedded_stream<'f>(file: &'f AafFile, essence: &EssenceFile) -> Result<crate::cfb::StreamReader<'f>> {
    if !essence.is_embedded {
        return Err(Error::EssenceNotLocatable(format!("'{}' is not embedded", essence.name)));
    }
    let node = essence
        .node
        .ok_or_else(|| Error::EssenceNotLocatable(format!("'{}' has no data stream", essence.name)))?;
    file.cfb().stream_reader(node)
}

/// Write `essence` read from `source` into `out_dir`.
///
/// Size checks happen before the output file is created.
pub fn extract_from_reader(
    source: &dyn ByteRangeReader,
    comp: &Composition,
    essence: &EssenceFile,
    request: &ExtractRequest<'_>,
    out_dir: &Path,
) -> Result<PathBuf> {
    let frame = essence.block_align();
    let too_large = || Error::EssenceFileTooLarge(u64::MAX);
    let byte_offset = request.sample_offset.checked_mul(frame).ok_or_else(too_large)?;
    let byte_length = request.sample_length.checked_mul(frame).ok_or_else(too_large)?;

    let write_header = byte_offset > 0 || byte_length > 0 || request.format != ExtractFormat::Default;
    let mut source_offset = byte_offset;
    if write_header && essence.essence_type != EssenceType::Pcm {
        source_offset = source_offset
            .checked_add(essence.pcm_audio_start_offset)
            .ok_or_else(too_large)?;
    }

    let available = source.len().saturating_sub(source_offset);
    if byte_length > available {
        return Err(Error::EssenceNotLocatable(format!(
            "requested {} bytes at {} but '{}' only has {}",
            byte_length, source_offset, essence.name, available
        )));
    }
    let payload = if byte_length > 0 { byte_length } else { available };
    let data_size = check_wav_payload_size(payload)?;

    let wave = write_header || essence.essence_type == EssenceType::Pcm;
    let header = if wave {
        let fmt = WavFmt {
            channels: essence.channels,
            sample_rate: essence.samplerate,
            bits_per_sample: essence.samplesize,
        };
        fmt.layout()?;
        let bext = (request.format != ExtractFormat::Wav).then(|| bext_for(comp, essence));
        wav_riff_size(payload, bext.is_some())?;
        Some((fmt, bext))
    } else {
        None
    };

    debug!(
        "extracting '{}': offset {} length {} header {}",
        essence.name, source_offset, payload, write_header
    );

    let path = out_dir.join(clean_filename(&output_name(essence, request, write_header)));
    let mut w = BufWriter::new(File::create(&path)?);

    if let Some((fmt, bext)) = &header {
        write_wav_header(&mut w, fmt, bext.as_ref(), data_size)?;
    }

    let swap = write_header && essence.essence_type == EssenceType::Aifc && essence.samplesize > 8;
    copy_range(source, &mut w, source_offset, payload, swap.then_some((essence.samplesize / 8) as usize))?;

    if wave && payload % 2 == 1 {
        w.write_all(&[0])?;
    }
    w.flush()?;
    Ok(path)
}

fn output_name(essence: &EssenceFile, request: &ExtractRequest<'_>, write_header: bool) -> String {
    let name = request.file_name.unwrap_or(&essence.unique_name);
    let ext = if write_header || matches!(essence.essence_type, EssenceType::Pcm | EssenceType::Wave | EssenceType::Bwav) {
        (!has_extension(name, "wav") && !has_extension(name, "wave")).then_some("wav")
    } else if essence.essence_type == EssenceType::Aifc {
        (!["aif", "aiff", "aifc"].iter().any(|e| has_extension(name, e))).then_some("aif")
    } else {
        None
    };
    match ext {
        Some(ext) => format!("{}.{}", name, ext),
        None => name.to_string(),
    }
}

fn bext_for(comp: &Composition, essence: &EssenceFile) -> WavBext {
    let ident = &comp.identification;
    let version = if vendor::is_media_composer(ident) { "" } else { ident.product_version_string.as_str() };

    let mut umid = [0u8; 64];
    umid[..32].copy_from_slice(&essence.source_mob_id.0);

    WavBext {
        description: format!("{}\n{}.aaf", essence.name, comp.name),
        originator: format!("{} {}", ident.product_name, version),
        originator_reference: concat!("aaf ", env!("CARGO_PKG_VERSION")).to_string(),
        origination_date: essence.origination_date.clone(),
        origination_time: essence.origination_time.clone(),
        time_reference: convert_unit_u64(
            essence.source_mob_slot_origin.max(0) as u64,
            essence.mob_slot_edit_rate,
            essence.samplerate_rational,
        ),
        umid,
    }
}

/// Copy `len` bytes at `offset`, reversing each `swap`-byte sample.
fn copy_range(
    source: &dyn ByteRangeReader,
    w: &mut impl Write,
    offset: u64,
    len: u64,
    swap: Option<usize>,
) -> Result<()> {
    let chunk = match swap {
        Some(size) if size > 0 => COPY_CHUNK - COPY_CHUNK % size,
        _ => COPY_CHUNK,
    };
    let mut buf = Vec::new();
    buf.try_reserve_exact(chunk)?;
    buf.resize(chunk, 0);

    let mut done = 0u64;
    while done < len {
        let n = (len - done).min(chunk as u64) as usize;
        source.read_exact_at(offset + done, &mut buf[..n])?;
        if let Some(size) = swap.filter(|&s| s > 1) {
            for sample in buf[..n].chunks_exact_mut(size) {
                sample.reverse();
            }
        }
        w.write_all(&buf[..n])?;
        done += n as u64;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MobId, Rational};
    use crate::essence::reader::MemReader;
    use crate::essence::riff::{parse_audio_file, ParseMode};

    /// Reports a huge length without holding any data.
    struct HugeReader(u64);

    impl ByteRangeReader for HugeReader {
        fn len(&self) -> u64 {
            self.0
        }

        fn read_at(&self, _offset: u64, _buf: &mut [u8]) -> Result<usize> {
            panic!("nothing should be read")
        }
    }

    fn pcm(name: &str) -> EssenceFile {
        EssenceFile {
            name: name.into(),
            unique_name: name.into(),
            is_embedded: true,
            essence_type: EssenceType::Pcm,
            samplerate: 48000,
            samplerate_rational: Rational::new(48000, 1),
            samplesize: 16,
            channels: 2,
            source_mob_id: MobId([3; 32]),
            origination_date: "2024:05:06".into(),
            origination_time: "07:08:09".into(),
            source_mob_slot_origin: 90_000,
            mob_slot_edit_rate: Rational::new(25, 1),
            ..Default::default()
        }
    }

    #[test]
    fn test_payload_limit() {
        assert!(check_wav_payload_size(u32::MAX as u64 - 1).is_ok());
        assert!(matches!(check_wav_payload_size(u32::MAX as u64), Err(Error::EssenceFileTooLarge(_))));
        assert!(matches!(check_wav_payload_size(1 << 32), Err(Error::EssenceFileTooLarge(_))));
    }

    #[test]
    fn test_too_large_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let comp = Composition::default();
        let essence = pcm("huge");
        let err = extract_from_reader(&HugeReader(1 << 32), &comp, &essence, &ExtractRequest::default(), dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::EssenceFileTooLarge(4_294_967_296)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_riff_overflow_near_limit_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let near = u32::MAX as u64 - 10;
        let err = extract_from_reader(&HugeReader(near), &Composition::default(), &pcm("near"), &ExtractRequest::default(), dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::EssenceFileTooLarge(n) if n == near));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_sample_range_overflow_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let request = ExtractRequest { sample_offset: u64::MAX / 2, sample_length: 4, ..Default::default() };
        let err = extract_from_reader(&MemReader(&[0u8; 40]), &Composition::default(), &pcm("x"), &request, dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::EssenceFileTooLarge(_)));

        let request = ExtractRequest { sample_length: u64::MAX / 3, ..Default::default() };
        assert!(extract_from_reader(&MemReader(&[0u8; 40]), &Composition::default(), &pcm("x"), &request, dir.path()).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unrepresentable_format_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut essence = pcm("wide");
        essence.channels = u16::MAX;
        essence.samplesize = 32;
        let err = extract_from_reader(&MemReader(&[0u8; 8]), &Composition::default(), &essence, &ExtractRequest::default(), dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidStructure(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_pcm_gets_bwav_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut comp = Composition::default();
        comp.name = "Mix".into();
        comp.identification.product_name = "ProTools".into();
        comp.identification.product_version_string = "23.6".into();

        let data: Vec<u8> = (0..40u8).collect();
        let path = extract_from_reader(&MemReader(&data), &comp, &pcm("Kick"), &ExtractRequest::default(), dir.path())
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "Kick.wav");

        let bytes = std::fs::read(&path).unwrap();
        let parsed = parse_audio_file(&MemReader(&bytes), ParseMode::Full).unwrap();
        assert_eq!(parsed.channels, 2);
        assert_eq!(parsed.sample_count, 10);
        let bext = parsed.bext.unwrap();
        assert_eq!(bext.description, "Kick\nMix.aaf");
        assert_eq!(bext.originator, "ProTools 23.6");
        // 90000 frames at 25 fps
        assert_eq!(bext.time_reference, 172_800_000);
        assert_eq!(&bext.umid[..32], &[3u8; 32]);
        assert_eq!(&bytes[bytes.len() - 40..], &data[..]);
    }

    #[test]
    fn test_range_and_plain_wav() {
        let dir = tempfile::tempdir().unwrap();
        let data: Vec<u8> = (0..40u8).collect();
        let request = ExtractRequest {
            format: ExtractFormat::Wav,
            sample_offset: 2,
            sample_length: 3,
            file_name: Some("1_1_Kick:take"),
        };
        let path = extract_from_reader(&MemReader(&data), &Composition::default(), &pcm("Kick"), &request, dir.path())
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "1_1_Kick_take.wav");

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 44 + 12);
        assert_eq!(&bytes[44..], &data[8..20]);
    }

    #[test]
    fn test_range_beyond_data() {
        let dir = tempfile::tempdir().unwrap();
        let request = ExtractRequest { sample_length: 100, ..Default::default() };
        let err = extract_from_reader(&MemReader(&[0u8; 40]), &Composition::default(), &pcm("x"), &request, dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::EssenceNotLocatable(_)));
    }

    #[test]
    fn test_aifc_samples_swapped() {
        let dir = tempfile::tempdir().unwrap();
        let mut essence = pcm("Loop");
        essence.essence_type = EssenceType::Aifc;
        essence.pcm_audio_start_offset = 4;
        let data = [0xEE, 0xEE, 0xEE, 0xEE, 0x01, 0x02, 0x03, 0x04];
        let request = ExtractRequest { format: ExtractFormat::Wav, ..Default::default() };
        let path = extract_from_reader(&MemReader(&data), &Composition::default(), &essence, &request, dir.path())
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "Loop.wav");
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[44..], &[0x02, 0x01, 0x04, 0x03]);
    }

    #[test]
    fn test_embedded_aifc_copied_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let mut essence = pcm("Loop");
        essence.essence_type = EssenceType::Aifc;
        let data = b"FORM....AIFC";
        let path = extract_from_reader(&MemReader(data), &Composition::default(), &essence, &ExtractRequest::default(), dir.path())
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "Loop.aif");
        assert_eq!(std::fs::read(&path).unwrap(), data);
    }
}
