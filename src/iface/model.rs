//! Vendor-neutral composition model.
//!
//! Everything the timeline interpreter produces lives here: tracks with
//! their ordered items, essence files addressed by index, markers and the
//! composition-wide timing.

use std::path::PathBuf;

use serde::Serialize;

use crate::aaf::Identification;
use crate::cfb::NodeId;
use crate::core::{convert_unit, MetaData, MobId, Rational};

// ============================================================================
// Gain
// ============================================================================

/// Constant or automated gain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GainKind {
    Constant,
    Variable,
}

/// Interpolation between control points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Interpolation {
    None,
    #[default]
    Linear,
    Log,
    Constant,
    Power,
    BSpline,
}

/// One (time, value) pair of a curve. Time runs from 0 to 1 over the owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ControlPoint {
    pub time: Rational,
    pub value: Rational,
}

impl ControlPoint {
    pub const fn new(time: Rational, value: Rational) -> Self {
        Self { time, value }
    }
}

/// Gain or pan value.
///
/// Times and values are kept as pairs so both always have the same count.
/// A constant gain has exactly one point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Gain {
    pub kind: GainKind,
    pub interpolation: Interpolation,
    pub points: Vec<ControlPoint>,
}

impl Gain {
    pub fn constant(value: Rational) -> Self {
        Self {
            kind: GainKind::Constant,
            interpolation: Interpolation::None,
            points: vec![ControlPoint::new(Rational::ZERO, value)],
        }
    }

    pub fn variable(interpolation: Interpolation, points: Vec<ControlPoint>) -> Self {
        Self { kind: GainKind::Variable, interpolation, points }
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.kind == GainKind::Constant
    }

    /// Value of a constant gain.
    pub fn value(&self) -> Option<Rational> {
        match self.kind {
            GainKind::Constant => self.points.first().map(|p| p.value),
            GainKind::Variable => None,
        }
    }
}

// ============================================================================
// Transitions
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FadeKind {
    FadeIn,
    FadeOut,
    XFade,
}

/// Whether a transition carries one shared curve or separate in/out curves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum CurveMode {
    #[default]
    Single,
    Two,
}

/// Fade or cross-fade between neighbouring clips.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub kind: FadeKind,
    pub curve_mode: CurveMode,
    pub interpolation: Interpolation,
    pub pos: i64,
    pub len: i64,
    pub cut_pt: i64,
    /// Fade-in curve, or the only curve in single-curve mode.
    pub curve_in: Vec<ControlPoint>,
    /// Fade-out curve in two-curve mode.
    pub curve_out: Vec<ControlPoint>,
}

impl Transition {
    /// Transition with the default two-point linear curve.
    pub fn linear(kind: FadeKind, pos: i64, len: i64) -> Self {
        let (from, to) = match kind {
            FadeKind::FadeOut => (Rational::ONE, Rational::ZERO),
            FadeKind::FadeIn | FadeKind::XFade => (Rational::ZERO, Rational::ONE),
        };
        Self {
            kind,
            curve_mode: CurveMode::Single,
            interpolation: Interpolation::Linear,
            pos,
            len,
            cut_pt: len / 2,
            curve_in: vec![
                ControlPoint::new(Rational::ZERO, from),
                ControlPoint::new(Rational::ONE, to),
            ],
            curve_out: Vec::new(),
        }
    }
}

// ============================================================================
// Essence
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum EssenceType {
    #[default]
    Unknown,
    Pcm,
    Wave,
    Aifc,
    Bwav,
}

/// Audio media referenced by one (SourceMob, slot) pair.
#[derive(Clone, Debug, Default, Serialize)]
pub struct EssenceFile {
    /// MasterMob name.
    pub name: String,
    /// Name made unique among the audio essence files.
    pub unique_name: String,
    /// Locator URI as stored in the file.
    pub original_file_path: Option<String>,
    /// Where the media was found or extracted to.
    pub usable_file_path: Option<PathBuf>,
    /// Length in samples.
    pub length: u64,
    pub is_embedded: bool,
    /// Data stream of the EssenceData object.
    #[serde(skip)]
    pub node: Option<NodeId>,
    pub essence_type: EssenceType,
    /// WAVE/AIFC descriptor summary.
    #[serde(skip)]
    pub summary: Option<Vec<u8>>,
    pub samplerate: u32,
    pub samplerate_rational: Rational,
    /// Bits per sample.
    pub samplesize: u16,
    pub channels: u16,
    /// Offset of the first sample in the embedded stream or file.
    pub pcm_audio_start_offset: u64,

    pub source_mob_id: MobId,
    pub source_mob_slot_id: u32,
    pub master_mob_id: MobId,
    pub master_mob_slot_id: u32,

    /// SourceMob creation date, `YYYY:MM:DD`.
    pub origination_date: String,
    /// SourceMob creation time, `HH:MM:SS`.
    pub origination_time: String,
    /// Source slot origin, in `mob_slot_edit_rate` units.
    pub source_mob_slot_origin: i64,
    pub mob_slot_edit_rate: Rational,

    pub metadata: MetaData,
}

impl EssenceFile {
    /// Essence length expressed in `edit_rate` units.
    pub fn length_in(&self, edit_rate: Rational) -> i64 {
        convert_unit(self.length as i64, self.samplerate_rational, edit_rate)
    }

    /// Bytes per sample frame of interleaved PCM.
    pub fn block_align(&self) -> u64 {
        self.channels as u64 * (self.samplesize as u64 / 8)
    }
}

/// Video media referenced by a SourceMob.
#[derive(Clone, Debug, Default, Serialize)]
pub struct VideoEssence {
    pub name: String,
    pub unique_name: String,
    pub original_file_path: Option<String>,
    pub usable_file_path: Option<PathBuf>,
    /// Length in edit units of the descriptor.
    pub length: i64,
    pub framerate: Rational,
    pub is_embedded: bool,
    #[serde(skip)]
    pub node: Option<NodeId>,
    pub source_mob_id: MobId,
    pub source_mob_slot_id: u32,
    pub master_mob_id: MobId,
    pub master_mob_slot_id: u32,
    pub metadata: MetaData,
}

/// Reference from a clip to an essence file channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EssencePointer {
    /// Index into [`Audio::essence_files`].
    pub essence: usize,
    /// 0 for the whole file, N for channel N.
    pub channel: u32,
}

// ============================================================================
// Clips and items
// ============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct AudioClip {
    /// Index of the owning track.
    pub track: usize,
    pub pointers: Vec<EssencePointer>,
    pub pos: i64,
    pub len: i64,
    /// Offset into the essence, in the track's edit units.
    pub essence_offset: i64,
    pub gain: Option<Gain>,
    pub automation: Option<Gain>,
    pub mute: bool,
    pub master_mob_id: MobId,
    pub metadata: MetaData,
}

impl AudioClip {
    pub fn new(track: usize, pos: i64, len: i64, essence_offset: i64) -> Self {
        Self {
            track,
            pointers: Vec::new(),
            pos,
            len,
            essence_offset,
            gain: None,
            automation: None,
            mute: false,
            master_mob_id: MobId::default(),
            metadata: MetaData::new(),
        }
    }

    /// Channel count of the clip.
    ///
    /// Several pointers give one channel each; a single pointer selecting a
    /// channel is mono; otherwise the whole essence file is used.
    pub fn channels(&self, essences: &[EssenceFile]) -> u32 {
        match self.pointers.as_slice() {
            [] => 0,
            [p] if p.channel > 0 => 1,
            [p] => essences.get(p.essence).map_or(0, |e| e.channels as u32),
            many => many.len() as u32,
        }
    }

    /// Essence file of the first pointer.
    pub fn essence<'a>(&self, essences: &'a [EssenceFile]) -> Option<&'a EssenceFile> {
        self.pointers.first().and_then(|p| essences.get(p.essence))
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct VideoClip {
    pub track: usize,
    pub pos: i64,
    pub len: i64,
    pub essence_offset: i64,
    /// Index into [`Video::essence_files`].
    pub essence: Option<usize>,
    pub master_mob_id: MobId,
}

/// Element of a track.
#[derive(Clone, Debug, Serialize)]
pub enum TimelineItem {
    Audio(AudioClip),
    Video(VideoClip),
    Transition(Transition),
}

impl TimelineItem {
    pub fn pos(&self) -> i64 {
        match self {
            TimelineItem::Audio(c) => c.pos,
            TimelineItem::Video(c) => c.pos,
            TimelineItem::Transition(t) => t.pos,
        }
    }

    pub fn len(&self) -> i64 {
        match self {
            TimelineItem::Audio(c) => c.len,
            TimelineItem::Video(c) => c.len,
            TimelineItem::Transition(t) => t.len,
        }
    }

    pub fn end(&self) -> i64 {
        self.pos() + self.len()
    }

    pub fn as_audio(&self) -> Option<&AudioClip> {
        match self {
            TimelineItem::Audio(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_audio_mut(&mut self) -> Option<&mut AudioClip> {
        match self {
            TimelineItem::Audio(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_video_mut(&mut self) -> Option<&mut VideoClip> {
        match self {
            TimelineItem::Video(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_transition(&self) -> Option<&Transition> {
        match self {
            TimelineItem::Transition(t) => Some(t),
            _ => None,
        }
    }
}

// ============================================================================
// Tracks
// ============================================================================

/// Channel layout of an audio track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum TrackFormat {
    #[default]
    Unknown,
    Mono,
    Stereo,
    Surround5_1,
    Surround7_1,
}

impl TrackFormat {
    /// Layout of an AudioChannelCombiner with `inputs` segments.
    pub fn from_channels(inputs: usize) -> Option<Self> {
        match inputs {
            1 => Some(TrackFormat::Mono),
            2 => Some(TrackFormat::Stereo),
            6 => Some(TrackFormat::Surround5_1),
            8 => Some(TrackFormat::Surround7_1),
            _ => None,
        }
    }

    pub fn channels(self) -> u32 {
        match self {
            TrackFormat::Unknown => 0,
            TrackFormat::Mono => 1,
            TrackFormat::Stereo => 2,
            TrackFormat::Surround5_1 => 6,
            TrackFormat::Surround7_1 => 8,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct AudioTrack {
    pub number: u32,
    pub name: String,
    pub format: TrackFormat,
    pub gain: Option<Gain>,
    pub pan: Option<Gain>,
    pub edit_rate: Rational,
    pub items: Vec<TimelineItem>,
    /// Cursor used while building the track.
    #[serde(skip)]
    pub current_pos: i64,
    pub clip_count: u32,
}

impl AudioTrack {
    pub fn new(number: u32) -> Self {
        Self { number, ..Default::default() }
    }

    /// 1-based rank of the audio clip at `item` among the track's audio clips.
    pub fn clip_index(&self, item: usize) -> usize {
        self.items
            .iter()
            .take(item.saturating_add(1))
            .filter(|i| matches!(i, TimelineItem::Audio(_)))
            .count()
    }

    pub fn clips(&self) -> impl Iterator<Item = &AudioClip> {
        self.items.iter().filter_map(TimelineItem::as_audio)
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.items.iter().filter_map(TimelineItem::as_transition)
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct VideoTrack {
    pub number: u32,
    pub name: String,
    pub edit_rate: Rational,
    pub items: Vec<TimelineItem>,
    #[serde(skip)]
    pub current_pos: i64,
}

// ============================================================================
// Markers, timecode, composition
// ============================================================================

#[derive(Clone, Debug, Default, Serialize)]
pub struct Marker {
    pub start: i64,
    pub length: i64,
    pub edit_rate: Rational,
    pub name: String,
    pub comment: String,
    pub color: Option<[u16; 3]>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Timecode {
    pub start: i64,
    pub end: i64,
    pub fps: u16,
    pub drop: bool,
    pub edit_rate: Rational,
}

impl Default for Timecode {
    /// 00:00:00:00 at 25 fps.
    fn default() -> Self {
        Self { start: 0, end: 0, fps: 25, drop: false, edit_rate: Rational::new(25, 1) }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Audio {
    pub tracks: Vec<AudioTrack>,
    pub essence_files: Vec<EssenceFile>,
    /// Composition sample rate, when every essence agrees.
    pub samplerate: u32,
    pub samplerate_rational: Rational,
    pub samplesize: u16,
    pub length: i64,
    pub length_edit_rate: Rational,
}

impl Audio {
    /// Every essence pointer, track by track.
    pub fn pointers(&self) -> impl Iterator<Item = &EssencePointer> {
        self.tracks
            .iter()
            .flat_map(|t| t.clips())
            .flat_map(|c| c.pointers.iter())
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Video {
    pub tracks: Vec<VideoTrack>,
    pub essence_files: Vec<VideoEssence>,
    pub length: i64,
    pub length_edit_rate: Rational,
}

/// Interpreted content of an AAF file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Composition {
    pub name: String,
    pub start: i64,
    pub start_edit_rate: Rational,
    pub length: i64,
    pub length_edit_rate: Rational,
    pub timecode: Option<Timecode>,
    pub audio: Audio,
    pub video: Video,
    pub markers: Vec<Marker>,
    pub comments: MetaData,
    pub metadata: MetaData,
    pub identification: Identification,
}

impl Composition {
    pub fn timecode(&self) -> Timecode {
        self.timecode.unwrap_or_default()
    }
}
