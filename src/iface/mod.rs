//! Composition interface.
//!
//! - [`TimelineParser`] - walks the mobs of an [`AafFile`]
//! - [`Composition`] - tracks, clips, transitions, essence files, markers
//! - [`Options`] - interpretation and essence lookup options
//!
//! [`parse_composition`] runs the parser and the post-pass that locates
//! external media, fills audio essence properties, computes lengths and
//! applies vendor fixes.

mod gain;
mod model;
mod options;
mod parser;
mod state;

pub use gain::apply_gain_offset;
pub use model::*;
pub use options::Options;
pub use parser::{material_name, unique_name, TimelineParser};

use std::path::Path;

use tracing::{debug, info, warn};

use crate::aaf::AafFile;
use crate::core::{convert_unit, Rational};
use crate::essence::{locate_external_essence_file, parse_audio_essence};
use crate::util::Result;
use crate::vendor::{protools, Vendor};

/// Open `path` and interpret its composition.
pub fn load(path: impl AsRef<Path>, options: &Options) -> Result<(AafFile, Composition)> {
    let file = AafFile::open_opts(path, options.use_mmap)?;
    let comp = parse_composition(&file, options)?;
    Ok((file, comp))
}

/// Interpret the composition of an opened file.
#[tracing::instrument(skip_all)]
pub fn parse_composition(file: &AafFile, options: &Options) -> Result<Composition> {
    let mut comp = TimelineParser::new(file, options).run();
    comp.identification = file.identification().clone();

    finish_timecode(&mut comp);
    resolve_essences(file, &mut comp, options);
    compute_format(&mut comp);
    compute_lengths(&mut comp);

    if Vendor::detect(&comp.identification) == Vendor::ProTools {
        info!("Pro Tools file, applying post-processing");
        protools::post_process(&mut comp, options);
    }
    Ok(comp)
}

fn finish_timecode(comp: &mut Composition) {
    let tc = comp.timecode.get_or_insert_with(|| {
        warn!("no timecode found, using 00:00:00:00 @ 25 fps");
        Timecode::default()
    });
    if tc.end != 0 {
        tc.end += tc.start;
    }
}

/// Locate external media and read audio properties that descriptors left out.
fn resolve_essences(file: &AafFile, comp: &mut Composition, options: &Options) {
    let search = options.media_location.as_deref();

    for essence in &mut comp.audio.essence_files {
        if !essence.is_embedded {
            if let Some(uri) = essence.original_file_path.as_deref() {
                match locate_external_essence_file(uri, search, file.path()) {
                    Ok(Some(path)) => {
                        debug!("'{}' found at {}", essence.unique_name, path.display());
                        essence.usable_file_path = Some(path);
                    }
                    Ok(None) => warn!("could not locate '{}' ({})", essence.unique_name, uri),
                    Err(e) => warn!("bad locator for '{}': {}", essence.unique_name, e),
                }
            }
        }

        if essence.essence_type == EssenceType::Pcm {
            continue;
        }
        if let Err(e) = parse_audio_essence(file, essence) {
            warn!("could not read audio properties of '{}': {}", essence.unique_name, e);
        }
    }

    for essence in &mut comp.video.essence_files {
        if essence.is_embedded {
            continue;
        }
        if let Some(uri) = essence.original_file_path.as_deref() {
            if let Ok(Some(path)) = locate_external_essence_file(uri, search, file.path()) {
                essence.usable_file_path = Some(path);
            }
        }
    }
}

/// Composition sample rate and size: shared by every essence, else the first.
fn compute_format(comp: &mut Composition) {
    let audio = &mut comp.audio;
    let Some(first) = audio.essence_files.first() else {
        return;
    };
    let (rate, rational, size) = (first.samplerate, first.samplerate_rational, first.samplesize);

    if audio.essence_files.iter().any(|e| e.samplerate != rate) {
        warn!("essence files use different sample rates, using {} Hz", rate);
    }
    if audio.essence_files.iter().any(|e| e.samplesize != size) {
        warn!("essence files use different sample sizes, using {} bit", size);
    }
    audio.samplerate = rate;
    audio.samplerate_rational = rational;
    audio.samplesize = size;
}

fn compute_lengths(comp: &mut Composition) {
    for track in &comp.audio.tracks {
        if track.current_pos > comp.audio.length {
            comp.audio.length = track.current_pos;
            comp.audio.length_edit_rate = track.edit_rate;
        }
    }
    for track in &comp.video.tracks {
        if track.current_pos > comp.video.length {
            comp.video.length = track.current_pos;
            comp.video.length_edit_rate = track.edit_rate;
        }
    }

    let audio = (comp.audio.length, comp.audio.length_edit_rate);
    let video = (comp.video.length, comp.video.length_edit_rate);
    let (length, rate) = match (audio.1.is_zero(), video.1.is_zero()) {
        (false, false) => {
            if convert_unit(video.0, video.1, audio.1) > audio.0 {
                video
            } else {
                audio
            }
        }
        (false, true) => audio,
        (true, false) => video,
        (true, true) => (0, Rational::ZERO),
    };
    comp.length = length;
    comp.length_edit_rate = rate;

    let tc = comp.timecode();
    comp.start = tc.start;
    comp.start_edit_rate = tc.edit_rate;
}
