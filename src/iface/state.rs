//! Transient context of a timeline pass.

use super::model::Gain;

/// Clip being extended by the inputs of an AudioChannelCombiner.
#[derive(Clone, Copy, Debug)]
pub struct Combiner {
    /// Number of input segments.
    pub channels: usize,
    /// Clip created by the first input, as (track, item).
    pub clip: Option<(usize, usize)>,
}

/// Cursors and pending values carried down the object tree.
#[derive(Clone, Debug, Default)]
pub struct ParserState {
    pub current_track: Option<usize>,
    /// Audio clip under construction, as (track, item).
    pub current_clip: Option<(usize, usize)>,
    pub current_video_track: Option<usize>,
    pub current_video_clip: Option<usize>,
    pub current_essence: Option<usize>,
    pub current_video_essence: Option<usize>,
    /// Transition whose OperationGroup is being read, as (track, item).
    pub current_transition: Option<(usize, usize)>,

    /// Gain and automation waiting for the clips of an OperationGroup.
    pub clip_gain: Option<Gain>,
    pub clip_automation: Option<Gain>,
    pub clip_mute: bool,

    pub combiner: Option<Combiner>,
    /// Inside a SourceClip that references another CompositionMob.
    pub inside_derivation_chain: bool,
    /// Number of derivation chain levels entered; 0 on the top composition.
    pub chain_depth: u32,
    /// The CompositionMob being walked is a TopLevel one.
    pub top_level: bool,
    pub edit_protocol: bool,
}

impl ParserState {
    pub fn new(edit_protocol: bool) -> Self {
        Self { edit_protocol, ..Default::default() }
    }

    /// Forget everything but the file-wide flags.
    pub fn reset(&mut self) {
        *self = Self::new(self.edit_protocol);
    }

    pub fn reset_clip_context(&mut self) {
        self.clip_gain = None;
        self.clip_automation = None;
        self.clip_mute = false;
    }
}
