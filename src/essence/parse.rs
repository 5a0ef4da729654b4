//! Filling audio essence properties from summaries, streams and files.

use tracing::{debug, warn};

use super::reader::{FileReader, MemReader};
use super::riff::{parse_audio_file, AudioFormat, ParseMode, RiffAudioFile};
use crate::aaf::AafFile;
use crate::core::Rational;
use crate::iface::{EssenceFile, EssenceType};
use crate::util::{has_extension, Error, Result};

/// Extensions of external files parsed for audio properties.
const AUDIO_EXTENSIONS: [&str; 5] = ["wav", "wave", "aif", "aiff", "aifc"];

/// Read channels, rate, sample size and length of a WAVE/AIFC essence.
///
/// The descriptor summary is tried first. When it is unusable, embedded
/// essence falls back to its data stream and external essence to the located
/// file.
pub fn parse_audio_essence(file: &AafFile, essence: &mut EssenceFile) -> Result<()> {
    let external = essence.usable_file_path.is_some();
    let summary = essence
        .summary
        .as_deref()
        .map(|s| parse_audio_file(&MemReader(s), ParseMode::Summary));

    match summary {
        Some(Ok(riff)) => {
            apply_riff(essence, &riff, "summary", false)?;
            if riff.is_complete() {
                return Ok(());
            }
            if !essence.is_embedded && !external {
                return Err(Error::SummaryParseFailed(format!("summary of '{}' is missing data", essence.name)));
            }
            warn!("summary of '{}' is missing data, trying {}", essence.name, fallback(essence));
        }
        Some(Err(e)) => {
            if !essence.is_embedded && !external {
                return Err(Error::SummaryParseFailed(format!("'{}': {}", essence.name, e)));
            }
            warn!("could not parse summary of '{}' ({}), trying {}", essence.name, e, fallback(essence));
        }
        None if essence.is_embedded || external => {
            debug!("'{}' has no summary, trying {}", essence.name, fallback(essence));
        }
        None => {}
    }

    if essence.is_embedded {
        let node = essence
            .node
            .ok_or_else(|| Error::EssenceNotLocatable(format!("'{}' has no data stream", essence.name)))?;
        let stream = file.cfb().stream_reader(node)?;
        let riff = parse_audio_file(&stream, ParseMode::Summary)
            .map_err(|e| Error::ExternalFileParseFailed(format!("embedded stream of '{}': {}", essence.name, e)))?;
        return apply_riff(essence, &riff, "embedded stream", false);
    }

    let Some(path) = essence.usable_file_path.clone() else {
        essence.essence_type = EssenceType::Unknown;
        return Err(Error::EssenceNotLocatable(format!("'{}' was not found", essence.name)));
    };

    if !AUDIO_EXTENSIONS.iter().any(|ext| has_extension(&path, ext)) {
        debug!("{} is not a WAVE/AIFF file", path.display());
        essence.essence_type = EssenceType::Unknown;
        return Ok(());
    }

    let reader = FileReader::open(&path)?;
    let riff = parse_audio_file(&reader, ParseMode::Full)
        .map_err(|e| Error::ExternalFileParseFailed(format!("{}: {}", path.display(), e)))?;
    apply_riff(essence, &riff, &path.display().to_string(), true)
}

fn fallback(essence: &EssenceFile) -> &'static str {
    if essence.is_embedded {
        "the essence data stream"
    } else {
        "the external file"
    }
}

/// Copy parsed properties into `essence`, warning about disagreements.
fn apply_riff(essence: &mut EssenceFile, riff: &RiffAudioFile, source: &str, external: bool) -> Result<()> {
    if riff.sample_count >= i64::MAX as u64 {
        return Err(Error::ExternalFileParseFailed(format!("{}: sample count {} is too large", source, riff.sample_count)));
    }
    if riff.sample_rate >= i32::MAX as u32 {
        return Err(Error::ExternalFileParseFailed(format!("{}: sample rate {} is too large", source, riff.sample_rate)));
    }

    let against = if external { "located file" } else { "previous data" };
    let mismatch = |what: &str, old: u64, new: u64| {
        if old > 0 && old != new {
            warn!("{}: {} {} differs from {} ({})", source, what, new, against, old);
        }
    };
    mismatch("channel count", essence.channels as u64, riff.channels as u64);
    mismatch("sample rate", essence.samplerate as u64, riff.sample_rate as u64);
    mismatch("sample size", essence.samplesize as u64, riff.sample_size as u64);
    mismatch("sample count", essence.length, riff.sample_count);

    essence.channels = riff.channels;
    essence.samplerate = riff.sample_rate;
    essence.samplesize = riff.sample_size;
    essence.length = riff.sample_count;
    essence.pcm_audio_start_offset = riff.pcm_audio_start_offset;
    essence.samplerate_rational = Rational::new(riff.sample_rate as i32, 1);

    if riff.format == AudioFormat::Wave && riff.bext.is_some() {
        essence.essence_type = EssenceType::Bwav;
    }
    Ok(())
}
