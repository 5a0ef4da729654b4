//! Timeline interpreter.
//!
//! Walks every CompositionMob down to the essence it references and fills a
//! [`Composition`]. Structural problems are logged and only drop the clip or
//! slot they affect.
//!
//! ```text
//! CompositionMob
//!   TimelineMobSlot ─ Sequence ─ SourceClip ─> MasterMob
//!                              │                 TimelineMobSlot ─ SourceClip ─> SourceMob
//!                              ├ Transition                                       EssenceDescriptor
//!                              ├ OperationGroup (gain, pan, combiner)             EssenceData
//!                              └ Filler
//!   EventMobSlot ─ DescriptiveMarker
//! ```

use tracing::{debug, error, warn};

use super::gain::apply_gain_offset;
use super::model::*;
use super::options::Options;
use super::state::{Combiner, ParserState};
use crate::aaf::{AafFile, ObjectId, WeakRef};
use crate::core::defs::{
    class_id, data_def, interpolation_def, operation_def, op_def, parameter_def, pid, usage,
};
use crate::core::{Auid, MetaData, MobId, Rational, TimeStamp};
use crate::util::le_u16;

/// Kind of media a component carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Media {
    Sound,
    Picture,
    Timecode,
    Other,
}

impl Media {
    fn of(data_def: &Auid) -> Self {
        if data_def::is_sound(data_def) {
            Media::Sound
        } else if data_def::is_picture(data_def) {
            Media::Picture
        } else if data_def::is_timecode(data_def) {
            Media::Timecode
        } else {
            Media::Other
        }
    }
}

/// Builds a [`Composition`] from the mobs of a file.
pub struct TimelineParser<'a> {
    file: &'a AafFile,
    options: &'a Options,
    state: ParserState,
    comp: Composition,
}

impl<'a> TimelineParser<'a> {
    pub fn new(file: &'a AafFile, options: &'a Options) -> Self {
        let edit_protocol = file.operational_pattern() == Some(op_def::EDIT_PROTOCOL);
        Self {
            file,
            options,
            state: ParserState::new(edit_protocol),
            comp: Composition::default(),
        }
    }

    /// Walk every CompositionMob. With the Edit Protocol only TopLevel ones
    /// are compositions of their own.
    #[tracing::instrument(skip_all)]
    pub fn run(mut self) -> Composition {
        let file = self.file;
        for &mob in file.mobs() {
            if !file.is_a(mob, &class_id::COMPOSITION_MOB) {
                continue;
            }
            let usage_code = file.get_opt::<Auid>(mob, pid::MOB_USAGE_CODE);
            if self.state.edit_protocol && usage_code != Some(usage::TOP_LEVEL) {
                debug!("skipping lower level composition '{}'", file.object(mob).name);
                continue;
            }
            self.state.reset();
            self.parse_mob(mob);
        }
        self.comp
    }

    // ========================================================================
    // Mobs and slots
    // ========================================================================

    fn parse_mob(&mut self, mob: ObjectId) {
        let file = self.file;
        let usage_code = file.get_opt::<Auid>(mob, pid::MOB_USAGE_CODE);
        if usage_code == Some(usage::ADJUSTED_CLIP) {
            debug!("skipping AdjustedClip composition");
            return;
        }
        self.state.top_level = usage_code == Some(usage::TOP_LEVEL);

        if let Some(name) = file.get_opt::<String>(mob, pid::MOB_NAME) {
            self.comp.name = name;
        }
        for (name, text) in self.tagged_values(mob, pid::MOB_USER_COMMENTS).iter() {
            self.comp.comments.push(name, text);
        }

        for &slot in file.members(mob, pid::MOB_SLOTS) {
            self.parse_mob_slot(slot);
        }
    }

    fn parse_mob_slot(&mut self, slot: ObjectId) {
        let file = self.file;
        let Some(segment) = file.strong_ref(slot, pid::MOB_SLOT_SEGMENT) else {
            warn!("MobSlot '{}' has no Segment", file.object(slot).name);
            return;
        };
        let Some(media) = self.media_of(segment) else {
            warn!("could not resolve DataDefinition of slot segment");
            return;
        };
        let Some(mob) = file.parent(slot) else {
            return;
        };

        if file.is_a(slot, &class_id::EVENT_MOB_SLOT) {
            if file.get::<Rational>(slot, pid::EVENT_MOB_SLOT_EDIT_RATE).is_none() {
                return;
            }
            self.parse_segment(segment);
            return;
        }

        if !file.is_a(slot, &class_id::TIMELINE_MOB_SLOT) {
            debug!("unsupported slot class {}", file.class_name(slot));
            return;
        }
        let Some(edit_rate) = file.get::<Rational>(slot, pid::TIMELINE_MOB_SLOT_EDIT_RATE) else {
            return;
        };

        if file.is_a(mob, &class_id::COMPOSITION_MOB) {
            match media {
                Media::Sound => {
                    if !self.state.inside_derivation_chain {
                        self.begin_audio_track(slot, edit_rate);
                    }
                    self.parse_segment(segment);

                    if !self.state.inside_derivation_chain {
                        let session_end = self
                            .state
                            .current_track
                            .map_or(0, |t| self.comp.audio.tracks[t].current_pos);
                        if let Some(tc) = self.comp.timecode.as_mut() {
                            if session_end > 0 && tc.end < session_end {
                                tc.end = session_end;
                            }
                        }
                    }
                }
                Media::Timecode => self.parse_segment(segment),
                Media::Picture => {
                    if !self.state.inside_derivation_chain && !self.begin_video_track(slot, edit_rate) {
                        return;
                    }
                    self.parse_segment(segment);
                }
                Media::Other => debug!("unsupported slot data definition"),
            }
        } else if file.is_a(mob, &class_id::MASTER_MOB) {
            self.parse_segment(segment);
        } else {
            debug!("unexpected slot owner {}", file.class_name(mob));
        }
    }

    fn begin_audio_track(&mut self, slot: ObjectId, edit_rate: Rational) {
        let file = self.file;
        let tracks = &mut self.comp.audio.tracks;
        let number = file
            .get_opt::<u32>(slot, pid::MOB_SLOT_PHYSICAL_TRACK_NUMBER)
            .unwrap_or(tracks.len() as u32 + 1);

        let index = match tracks.iter().position(|t| t.number == number) {
            Some(i) => i,
            None => {
                tracks.push(AudioTrack::new(number));
                tracks.len() - 1
            }
        };

        let track = &mut tracks[index];
        track.name = file.get_opt::<String>(slot, pid::MOB_SLOT_SLOT_NAME).unwrap_or_default();
        track.edit_rate = edit_rate;
        self.state.current_track = Some(index);
    }

    /// Only one video track is kept; false when the slot is skipped.
    fn begin_video_track(&mut self, slot: ObjectId, edit_rate: Rational) -> bool {
        let file = self.file;
        let number = file
            .get_opt::<u32>(slot, pid::MOB_SLOT_PHYSICAL_TRACK_NUMBER)
            .unwrap_or(1);
        let tracks = &mut self.comp.video.tracks;

        if let Some(track) = tracks.first() {
            if track.number != number {
                warn!("only one video track is supported, skipping track {}", number);
                return false;
            }
        } else {
            tracks.push(VideoTrack {
                number,
                name: file.get_opt::<String>(slot, pid::MOB_SLOT_SLOT_NAME).unwrap_or_default(),
                edit_rate,
                ..Default::default()
            });
        }
        self.state.current_video_track = Some(0);
        true
    }

    // ========================================================================
    // Segments
    // ========================================================================

    fn parse_segment(&mut self, segment: ObjectId) {
        let file = self.file;
        let is = |class: &Auid| file.is_a(segment, class);

        if is(&class_id::SEQUENCE) {
            self.parse_sequence(segment);
        } else if is(&class_id::SOURCE_CLIP) {
            self.parse_source_clip(segment);
        } else if is(&class_id::OPERATION_GROUP) {
            self.parse_operation_group(segment);
        } else if is(&class_id::FILLER) {
            self.parse_filler(segment);
        } else if is(&class_id::SELECTOR) {
            if let Some(selected) = file.strong_ref(segment, pid::SELECTOR_SELECTED) {
                self.parse_segment(selected);
            }
        } else if is(&class_id::NESTED_SCOPE) {
            for &slot in file.members(segment, pid::NESTED_SCOPE_SLOTS) {
                self.parse_segment(slot);
            }
        } else if is(&class_id::TIMECODE) {
            self.parse_timecode(segment);
        } else if is(&class_id::COMMENT_MARKER) {
            self.parse_marker(segment);
        } else if is(&class_id::ESSENCE_GROUP) {
            warn!("EssenceGroup is not supported");
        } else {
            warn!("unsupported segment {}", file.class_name(segment));
        }
    }

    fn parse_sequence(&mut self, sequence: ObjectId) {
        let file = self.file;
        let components = file.members(sequence, pid::SEQUENCE_COMPONENTS);
        for (i, &component) in components.iter().enumerate() {
            if file.is_a(component, &class_id::TRANSITION) {
                let prev = i.checked_sub(1).map(|p| components[p]);
                let next = components.get(i + 1).copied();
                self.parse_transition(component, prev, next);
            } else {
                self.parse_segment(component);
            }
        }
    }

    fn parse_filler(&mut self, filler: ObjectId) {
        let file = self.file;
        let Some(parent) = file.parent(filler) else {
            return;
        };
        if file.is_a(parent, &class_id::TIMELINE_MOB_SLOT) {
            // whole empty slot
            return;
        }
        if !file.is_a(parent, &class_id::SEQUENCE) && !file.is_a(parent, &class_id::SELECTOR) {
            debug!("Filler under {} ignored", file.class_name(parent));
            return;
        }
        if self.state.inside_derivation_chain {
            return;
        }
        let Some(len) = file.get::<i64>(filler, pid::COMPONENT_LENGTH) else {
            return;
        };

        match self.media_of(filler) {
            Some(Media::Sound) => {
                if let Some(t) = self.state.current_track {
                    self.comp.audio.tracks[t].current_pos += len;
                }
            }
            Some(Media::Picture) => {
                if let Some(t) = self.state.current_video_track {
                    self.comp.video.tracks[t].current_pos += len;
                }
            }
            _ => {}
        }
    }

    fn parse_transition(&mut self, transition: ObjectId, prev: Option<ObjectId>, next: Option<ObjectId>) {
        let file = self.file;
        if self.media_of(transition) != Some(Media::Sound) {
            warn!("only audio transitions are supported");
            return;
        }
        let Some(len) = file.get::<i64>(transition, pid::COMPONENT_LENGTH) else {
            return;
        };
        let is_filler = |c: Option<ObjectId>| c.is_some_and(|c| file.is_a(c, &class_id::FILLER));

        let kind = if is_filler(prev) {
            FadeKind::FadeIn
        } else if is_filler(next) {
            FadeKind::FadeOut
        } else if prev.is_some() && next.is_some() {
            FadeKind::XFade
        } else {
            warn!("cannot tell whether transition is a fade in, fade out or cross fade");
            return;
        };

        let Some(t) = self.state.current_track else {
            warn!("transition outside of an audio track");
            return;
        };

        let track = &mut self.comp.audio.tracks[t];
        let mut trans = Transition::linear(kind, track.current_pos - len, len);
        match file.get_opt::<i64>(transition, pid::TRANSITION_CUT_POINT) {
            Some(cut) => trans.cut_pt = cut,
            None => debug!("transition has no CutPoint, using half its length"),
        }
        track.items.push(TimelineItem::Transition(trans));
        let item = track.items.len() - 1;

        if let Some(op_group) = file.strong_ref(transition, pid::TRANSITION_OPERATION_GROUP) {
            self.state.current_transition = Some((t, item));
            self.parse_operation_group(op_group);
            self.state.current_transition = None;
        } else {
            debug!("transition has no OperationGroup, using a linear curve");
        }

        self.comp.audio.tracks[t].current_pos -= len;
    }

    fn parse_timecode(&mut self, timecode: ObjectId) {
        let file = self.file;
        let edit_rate = file
            .ancestor(timecode, &class_id::TIMELINE_MOB_SLOT)
            .and_then(|slot| file.get::<Rational>(slot, pid::TIMELINE_MOB_SLOT_EDIT_RATE));
        let (Some(start), Some(fps), Some(drop), Some(edit_rate)) = (
            file.get::<i64>(timecode, pid::TIMECODE_START),
            file.get::<u16>(timecode, pid::TIMECODE_FPS),
            file.get::<u8>(timecode, pid::TIMECODE_DROP),
            edit_rate,
        ) else {
            warn!("incomplete Timecode");
            return;
        };

        if self.comp.timecode.is_some() {
            warn!("timecode already set, ignoring another one at {}", start);
            return;
        }
        self.comp.timecode = Some(Timecode { start, end: 0, fps, drop: drop != 0, edit_rate });
    }

    fn parse_marker(&mut self, marker: ObjectId) {
        let file = self.file;
        let Some(edit_rate) = file
            .ancestor(marker, &class_id::EVENT_MOB_SLOT)
            .and_then(|slot| file.get::<Rational>(slot, pid::EVENT_MOB_SLOT_EDIT_RATE))
        else {
            warn!("marker outside of an EventMobSlot");
            return;
        };
        let Some(start) = file.get::<i64>(marker, pid::EVENT_POSITION) else {
            return;
        };

        let dynamic = |names: &[&str]| names.iter().find_map(|n| file.pid_by_name(n));
        let name = dynamic(&["CommentMarkerUSer", "CommentMarkerUser"])
            .and_then(|p| file.get_opt::<String>(marker, p))
            .unwrap_or_default();
        let color = dynamic(&["CommentMarkerColor"])
            .and_then(|p| file.object(marker).property(p))
            .and_then(|p| p.raw())
            .and_then(|raw| Some([le_u16(raw, 0).ok()?, le_u16(raw, 2).ok()?, le_u16(raw, 4).ok()?]));

        self.comp.markers.push(Marker {
            start,
            length: file.get_opt::<i64>(marker, pid::COMPONENT_LENGTH).unwrap_or(0),
            edit_rate,
            name,
            comment: file.get_opt::<String>(marker, pid::EVENT_COMMENT).unwrap_or_default(),
            color,
        });
    }

    // ========================================================================
    // Operation groups and parameters
    // ========================================================================

    fn parse_operation_group(&mut self, op_group: ObjectId) {
        let file = self.file;
        if file.ancestor(op_group, &class_id::COMPOSITION_MOB).is_none() {
            debug!("OperationGroup outside of a CompositionMob ignored");
            return;
        }
        let Some(op) = file.weak_ref_definition(
            op_group,
            pid::OPERATION_GROUP_OPERATION,
            pid::DICTIONARY_OPERATION_DEFINITIONS,
        ) else {
            warn!("could not resolve OperationDefinition");
            return;
        };

        if file.parent(op_group).is_some_and(|p| file.is_a(p, &class_id::TRANSITION)) {
            if op == operation_def::MONO_AUDIO_DISSOLVE {
                self.parse_parameters(op_group, &op);
            } else {
                warn!("unsupported transition effect {}", op);
            }
            return;
        }

        if op == operation_def::AUDIO_CHANNEL_COMBINER {
            self.parse_channel_combiner(op_group);
            return;
        }

        if op == operation_def::MONO_AUDIO_GAIN || op == operation_def::MONO_AUDIO_PAN {
            self.parse_parameters(op_group, &op);
        } else if op == operation_def::STEREO_AUDIO_GAIN || op == operation_def::MONO_AUDIO_MIXDOWN {
            warn!("unsupported audio operation {}", op);
        } else {
            debug!("unsupported operation {}", op);
        }

        for &input in file.members(op_group, pid::OPERATION_GROUP_INPUT_SEGMENTS) {
            self.parse_segment(input);
        }

        // Clip gain only applies to the clips under this group.
        if op == operation_def::MONO_AUDIO_GAIN && !self.is_track_parameter(op_group) {
            self.state.reset_clip_context();
        }
    }

    fn parse_channel_combiner(&mut self, op_group: ObjectId) {
        let file = self.file;
        let inputs = file.members(op_group, pid::OPERATION_GROUP_INPUT_SEGMENTS);
        let Some(format) = TrackFormat::from_channels(inputs.len()).filter(|f| f.channels() > 1) else {
            warn!("AudioChannelCombiner with {} inputs is not supported", inputs.len());
            return;
        };
        let Some(t) = self.state.current_track else {
            warn!("AudioChannelCombiner outside of an audio track");
            return;
        };

        let track = &mut self.comp.audio.tracks[t];
        if track.format != TrackFormat::Unknown && track.format != format {
            error!("track {} mixes {:?} and {:?} clips", track.number, track.format, format);
            return;
        }
        track.format = format;

        let outer = self.state.combiner.replace(Combiner { channels: inputs.len(), clip: None });
        for &input in inputs {
            self.parse_segment(input);
        }
        self.state.combiner = outer;
    }

    fn parse_parameters(&mut self, op_group: ObjectId, op: &Auid) {
        let file = self.file;
        for &param in file.members(op_group, pid::OPERATION_GROUP_PARAMETERS) {
            if file.is_a(param, &class_id::CONSTANT_VALUE) {
                self.parse_constant_value(param, op_group, op);
            } else if file.is_a(param, &class_id::VARYING_VALUE) {
                self.parse_varying_value(param, op_group, op);
            } else {
                debug!("unsupported parameter {}", file.class_name(param));
            }
        }
    }

    fn parse_constant_value(&mut self, param: ObjectId, op_group: ObjectId, op: &Auid) {
        let file = self.file;
        let Some(def) = self.parameter_definition(param) else {
            return;
        };
        let Some(value) = file.indirect::<Rational>(param, pid::CONSTANT_VALUE_VALUE) else {
            warn!("ConstantValue has no rational Value");
            return;
        };

        if *op == operation_def::MONO_AUDIO_GAIN && def == parameter_def::AMPLITUDE {
            let gain = Gain::constant(value);
            if self.is_track_parameter(op_group) {
                if let Some(t) = self.state.current_track {
                    self.comp.audio.tracks[t].gain = Some(gain);
                }
            } else if self.state.clip_gain.is_some() {
                error!("clip gain was already set, ignoring {}", value);
            } else {
                self.state.clip_mute = value.numerator == 0;
                self.state.clip_gain = Some(gain);
            }
        } else if *op == operation_def::MONO_AUDIO_PAN && def == parameter_def::PAN {
            if let Some(t) = self.state.current_track {
                self.comp.audio.tracks[t].pan = Some(Gain::constant(value));
            }
        } else {
            debug!("unsupported constant parameter {} of {}", def, op);
        }
    }

    fn parse_varying_value(&mut self, param: ObjectId, op_group: ObjectId, op: &Auid) {
        let file = self.file;
        let Some(def) = self.parameter_definition(param) else {
            return;
        };
        let interpolation = self.interpolation(param);
        if file.object_list(param, pid::VARYING_VALUE_POINT_LIST).is_none() {
            warn!("VaryingValue has no PointList");
            return;
        }
        let points: Vec<ControlPoint> = file
            .members(param, pid::VARYING_VALUE_POINT_LIST)
            .iter()
            .filter_map(|&cp| {
                Some(ControlPoint::new(
                    file.get::<Rational>(cp, pid::CONTROL_POINT_TIME)?,
                    file.indirect::<Rational>(cp, pid::CONTROL_POINT_VALUE)?,
                ))
            })
            .collect();

        let flat = match points.as_slice() {
            [a, b] if a.value.same_value(b.value) => Some(a.value),
            _ => None,
        };

        if *op == operation_def::MONO_AUDIO_DISSOLVE && def == parameter_def::LEVEL {
            let Some((t, i)) = self.state.current_transition else {
                return;
            };
            if let Some(TimelineItem::Transition(trans)) = self.comp.audio.tracks[t].items.get_mut(i) {
                trans.curve_mode = CurveMode::Single;
                trans.interpolation = interpolation;
                trans.curve_in = points;
            }
        } else if *op == operation_def::MONO_AUDIO_GAIN && def == parameter_def::AMPLITUDE {
            let gain = match flat {
                Some(v) if v.same_value(Rational::ONE) => {
                    debug!("unity gain curve dropped");
                    return;
                }
                Some(v) => Gain::constant(v),
                None => Gain::variable(interpolation, points),
            };

            if self.is_track_parameter(op_group) {
                let Some(t) = self.state.current_track else {
                    return;
                };
                let track = &mut self.comp.audio.tracks[t];
                if track.gain.is_some() {
                    error!("track {} gain was already set", track.number);
                    return;
                }
                track.gain = Some(gain);
            } else if gain.is_constant() {
                if self.state.clip_gain.is_some() {
                    error!("clip gain was already set");
                    return;
                }
                self.state.clip_mute = gain.value().is_some_and(|v| v.numerator == 0);
                self.state.clip_gain = Some(gain);
            } else {
                if self.state.clip_automation.is_some() {
                    error!("clip automation was already set");
                    return;
                }
                self.state.clip_automation = Some(gain);
            }
        } else if *op == operation_def::MONO_AUDIO_PAN && def == parameter_def::PAN {
            let pan = match flat {
                Some(v) => Gain::constant(v),
                None => Gain::variable(interpolation, points),
            };
            if let Some(t) = self.state.current_track {
                self.comp.audio.tracks[t].pan = Some(pan);
            }
        } else {
            debug!("unsupported varying parameter {} of {}", def, op);
        }
    }

    // ========================================================================
    // Source clips
    // ========================================================================

    fn parse_source_clip(&mut self, clip: ObjectId) {
        let file = self.file;
        let Some(media) = self.media_of(clip) else {
            warn!("could not resolve SourceClip DataDefinition");
            return;
        };
        let Some(parent_mob) = file.ancestor(clip, &class_id::MOB) else {
            return;
        };
        let Some(parent_mob_id) = file.get::<MobId>(parent_mob, pid::MOB_MOB_ID) else {
            return;
        };
        let source_id = file
            .get_opt::<MobId>(clip, pid::SOURCE_REFERENCE_SOURCE_ID)
            .filter(|id| !id.is_null())
            .unwrap_or(parent_mob_id);
        let Some(source_slot_id) = file.get::<u32>(clip, pid::SOURCE_REFERENCE_SOURCE_MOB_SLOT_ID) else {
            return;
        };

        if file.is_a(parent_mob, &class_id::COMPOSITION_MOB) {
            self.parse_composition_clip(clip, media, source_id, source_slot_id);
        } else if file.is_a(parent_mob, &class_id::MASTER_MOB) {
            self.parse_master_clip(clip, parent_mob, parent_mob_id, media, source_id, source_slot_id);
        } else {
            debug!("SourceClip under {} ignored", file.class_name(parent_mob));
        }
    }

    /// SourceClip of a composition track: creates the timeline clip.
    fn parse_composition_clip(&mut self, clip: ObjectId, media: Media, source_id: MobId, source_slot_id: u32) {
        let file = self.file;
        let Some(ref_mob) = file.find_mob_by_id(&source_id) else {
            warn!("SourceClip references unknown mob {}", source_id);
            return;
        };
        let Some(ref_slot) = file.find_slot_by_id(ref_mob, source_slot_id) else {
            warn!("SourceClip references unknown slot {} of {}", source_slot_id, source_id);
            return;
        };
        let (Some(len), Some(start)) = (
            file.get::<i64>(clip, pid::COMPONENT_LENGTH),
            file.get::<i64>(clip, pid::SOURCE_CLIP_START_TIME),
        ) else {
            return;
        };

        if file.is_a(ref_mob, &class_id::COMPOSITION_MOB) {
            self.parse_derivation_chain(ref_slot, media, len, start);
            return;
        }

        match media {
            Media::Sound => self.add_audio_clip(clip, ref_mob, ref_slot, source_id, len, start),
            Media::Picture => self.add_video_clip(ref_mob, ref_slot, source_id, len, start),
            _ => debug!("SourceClip of unsupported data kind"),
        }
    }

    /// Clip pointing into another CompositionMob. The referenced slot builds
    /// the clip; this level gives it its length, offset and gain.
    fn parse_derivation_chain(&mut self, ref_slot: ObjectId, media: Media, len: i64, start: i64) {
        let saved = self.state.clone();
        let before = (self.state.current_clip, self.state.current_video_clip);

        self.state.inside_derivation_chain = true;
        self.state.chain_depth += 1;
        self.state.reset_clip_context();
        self.parse_mob_slot(ref_slot);
        let created = (self.state.current_clip, self.state.current_video_clip);
        self.state = saved;

        // Deeper levels only build the clip; the outermost one places it.
        let outermost = self.state.chain_depth == 0;

        match media {
            Media::Sound => {
                let Some((t, i)) = created.0.filter(|c| Some(*c) != before.0) else {
                    return;
                };
                self.state.current_clip = Some((t, i));
                if !outermost || !self.state.top_level {
                    return;
                }
                let (gain, automation, mute) = (
                    self.state.clip_gain.clone(),
                    self.state.clip_automation.clone(),
                    self.state.clip_mute,
                );
                let track = &mut self.comp.audio.tracks[t];
                if let Some(audio) = track.items.get_mut(i).and_then(TimelineItem::as_audio_mut) {
                    audio.len = len;
                    audio.essence_offset = start;
                    if let Some(offset) = &gain {
                        match apply_gain_offset(audio.gain.as_ref(), offset) {
                            Ok(g) => audio.gain = Some(g),
                            Err(e) => warn!("clip gain: {}", e),
                        }
                    }
                    if automation.is_some() {
                        if audio.automation.is_some() {
                            warn!("clip already has automation, keeping it");
                        } else {
                            audio.automation = automation;
                        }
                    }
                    audio.mute |= mute;
                }
                track.current_pos += len;
            }
            Media::Picture => {
                let (Some(i), Some(t)) = (created.1.filter(|c| Some(*c) != before.1), self.state.current_video_track)
                else {
                    return;
                };
                self.state.current_video_clip = Some(i);
                if !outermost {
                    return;
                }
                let track = &mut self.comp.video.tracks[t];
                if let Some(video) = track.items.get_mut(i).and_then(TimelineItem::as_video_mut) {
                    video.len = len;
                    video.essence_offset = start;
                }
                track.current_pos += len;
            }
            _ => {}
        }
    }

    fn add_audio_clip(
        &mut self,
        clip: ObjectId,
        ref_mob: ObjectId,
        ref_slot: ObjectId,
        source_id: MobId,
        len: i64,
        start: i64,
    ) {
        let file = self.file;
        let Some(t) = self.state.current_track else {
            warn!("audio SourceClip outside of an audio track");
            return;
        };

        // Later inputs of a channel combiner extend the first one's clip.
        if let Some(target) = self.state.combiner.and_then(|c| c.clip) {
            let Some(existing) = self.audio_clip(target) else {
                return;
            };
            if existing.len != len || existing.master_mob_id != source_id {
                warn!("AudioChannelCombiner inputs differ in length or source, skipping input");
                return;
            }
            self.state.current_clip = Some(target);
            self.parse_master_slot(ref_mob, ref_slot);
            return;
        }

        let metadata = self.tagged_values(clip, pid::COMPONENT_USER_COMMENTS);
        let track = &mut self.comp.audio.tracks[t];
        if self.state.combiner.is_none() {
            match track.format {
                TrackFormat::Unknown => track.format = TrackFormat::Mono,
                TrackFormat::Mono => {}
                other => {
                    error!("mono clip on a {:?} track {}", other, track.number);
                    return;
                }
            }
        }

        let mut audio = AudioClip::new(t, track.current_pos, len, start);
        audio.gain = self.state.clip_gain.clone();
        audio.automation = self.state.clip_automation.clone();
        audio.mute = self.state.clip_mute;
        audio.master_mob_id = source_id;
        audio.metadata = metadata;

        track.items.push(TimelineItem::Audio(audio));
        track.clip_count += 1;
        let item = track.items.len() - 1;
        if !self.state.inside_derivation_chain {
            track.current_pos += len;
        }

        self.state.current_clip = Some((t, item));
        if let Some(combiner) = self.state.combiner.as_mut() {
            combiner.clip = Some((t, item));
        }

        self.parse_master_slot(ref_mob, ref_slot);
    }

    fn add_video_clip(&mut self, ref_mob: ObjectId, ref_slot: ObjectId, source_id: MobId, len: i64, start: i64) {
        let Some(t) = self.state.current_video_track else {
            warn!("video SourceClip outside of a video track");
            return;
        };
        let advance = !self.state.inside_derivation_chain;

        let track = &mut self.comp.video.tracks[t];
        if !track.items.is_empty() {
            warn!("only one video clip is supported");
            return;
        }
        track.items.push(TimelineItem::Video(VideoClip {
            track: t,
            pos: track.current_pos,
            len,
            essence_offset: start,
            essence: None,
            master_mob_id: source_id,
        }));
        if advance {
            track.current_pos += len;
        }
        self.state.current_video_clip = Some(track.items.len() - 1);

        if self.file.is_a(ref_mob, &class_id::MASTER_MOB) {
            self.parse_mob_slot(ref_slot);
        } else {
            warn!("video SourceClip does not reference a MasterMob");
        }
    }

    /// Walk a MasterMob slot with a fresh context bound to the current clip.
    fn parse_master_slot(&mut self, ref_mob: ObjectId, ref_slot: ObjectId) {
        if !self.file.is_a(ref_mob, &class_id::MASTER_MOB) {
            warn!("SourceClip references a {}, not a MasterMob", self.file.class_name(ref_mob));
            return;
        }
        let saved = self.state.clone();
        self.state.reset();
        self.state.current_track = saved.current_track;
        self.state.current_clip = saved.current_clip;
        self.parse_mob_slot(ref_slot);
        self.state = saved;
    }

    /// SourceClip of a MasterMob: links the clip to its essence.
    fn parse_master_clip(
        &mut self,
        clip: ObjectId,
        master_mob: ObjectId,
        master_mob_id: MobId,
        media: Media,
        source_id: MobId,
        source_slot_id: u32,
    ) {
        let file = self.file;
        let Some(master_slot_id) = file
            .ancestor(clip, &class_id::MOB_SLOT)
            .and_then(|s| file.get::<u32>(s, pid::MOB_SLOT_SLOT_ID))
        else {
            return;
        };
        let name = file.get_opt::<String>(master_mob, pid::MOB_NAME).unwrap_or_default();

        match media {
            Media::Sound => {
                let Some((t, i)) = self.state.current_clip else {
                    warn!("MasterMob SourceClip without a clip to link");
                    return;
                };
                let channel = file
                    .get_opt::<Vec<u32>>(clip, pid::SOURCE_REFERENCE_CHANNEL_IDS)
                    .and_then(|ids| ids.first().copied())
                    .unwrap_or(0);

                let essences = &self.comp.audio.essence_files;
                let essence = match essences
                    .iter()
                    .position(|e| e.source_mob_id == source_id && e.source_mob_slot_id == source_slot_id)
                {
                    Some(e) => {
                        debug!("essence '{}' already known", essences[e].name);
                        e
                    }
                    None => {
                        let Some(source_mob) = file.find_mob_by_id(&source_id) else {
                            warn!("could not find SourceMob {}", source_id);
                            return;
                        };
                        let metadata = self.tagged_values(master_mob, pid::MOB_USER_COMMENTS);
                        self.comp.audio.essence_files.push(EssenceFile {
                            name,
                            master_mob_id,
                            master_mob_slot_id: master_slot_id,
                            source_mob_id: source_id,
                            source_mob_slot_id: source_slot_id,
                            metadata,
                            ..Default::default()
                        });
                        let e = self.comp.audio.essence_files.len() - 1;
                        self.state.current_essence = Some(e);

                        self.parse_source_mob(source_mob, source_slot_id);
                        if let Some(data) = file.find_essence_data_by_mob_id(&source_id) {
                            self.parse_essence_data(data);
                        }
                        let unique = self.unique_audio_name(e);
                        self.comp.audio.essence_files[e].unique_name = unique;
                        e
                    }
                };

                if let Some(audio) = self.audio_clip_mut((t, i)) {
                    audio.pointers.push(EssencePointer { essence, channel });
                }
            }
            Media::Picture => {
                let Some(i) = self.state.current_video_clip else {
                    warn!("MasterMob SourceClip without a video clip to link");
                    return;
                };
                let essences = &self.comp.video.essence_files;
                let essence = match essences
                    .iter()
                    .position(|e| e.source_mob_id == source_id && e.source_mob_slot_id == source_slot_id)
                {
                    Some(e) => e,
                    None => {
                        let Some(source_mob) = file.find_mob_by_id(&source_id) else {
                            warn!("could not find SourceMob {}", source_id);
                            return;
                        };
                        self.comp.video.essence_files.push(VideoEssence {
                            name,
                            master_mob_id,
                            master_mob_slot_id: master_slot_id,
                            source_mob_id: source_id,
                            source_mob_slot_id: source_slot_id,
                            ..Default::default()
                        });
                        let e = self.comp.video.essence_files.len() - 1;
                        self.state.current_video_essence = Some(e);

                        if let Some(desc) = file.strong_ref(source_mob, pid::SOURCE_MOB_ESSENCE_DESCRIPTION) {
                            self.parse_video_descriptor(desc, e);
                        }
                        if let Some(data) = file.find_essence_data_by_mob_id(&source_id) {
                            if let Some(node) = file.stream_node(data, pid::ESSENCE_DATA_DATA) {
                                let video = &mut self.comp.video.essence_files[e];
                                video.node = Some(node);
                                video.is_embedded = true;
                            }
                        }
                        let unique = unique_name(
                            &self.comp.video.essence_files[e].name,
                            |n| self.comp.video.essence_files.iter().any(|v| v.unique_name == n),
                        );
                        self.comp.video.essence_files[e].unique_name = unique;
                        e
                    }
                };

                if let Some(t) = self.state.current_video_track {
                    if let Some(video) = self.comp.video.tracks[t].items.get_mut(i).and_then(TimelineItem::as_video_mut) {
                        video.essence = Some(essence);
                    }
                }
            }
            _ => {}
        }
    }

    // ========================================================================
    // Source mobs and descriptors
    // ========================================================================

    fn parse_source_mob(&mut self, source_mob: ObjectId, slot_id: u32) {
        let file = self.file;
        let Some(e) = self.state.current_essence else {
            return;
        };

        let created = file.get::<TimeStamp>(source_mob, pid::MOB_CREATION_TIME);
        let origin = file.find_slot_by_id(source_mob, slot_id).and_then(|slot| {
            Some((
                file.get_opt::<i64>(slot, pid::TIMELINE_MOB_SLOT_ORIGIN).unwrap_or(0),
                file.get_opt::<Rational>(slot, pid::TIMELINE_MOB_SLOT_EDIT_RATE)?,
            ))
        });

        let essence = &mut self.comp.audio.essence_files[e];
        if let Some(ts) = created {
            essence.origination_date = ts.date_string();
            essence.origination_time = ts.time_string();
        }
        if let Some((origin, edit_rate)) = origin {
            essence.source_mob_slot_origin = origin;
            essence.mob_slot_edit_rate = edit_rate;
        }

        let Some(desc) = file.strong_ref(source_mob, pid::SOURCE_MOB_ESSENCE_DESCRIPTION) else {
            warn!("SourceMob has no EssenceDescription");
            return;
        };
        self.parse_audio_descriptor(desc, e);
    }

    fn parse_audio_descriptor(&mut self, desc: ObjectId, e: usize) {
        let file = self.file;
        let class = file.class_of(desc);

        if class == class_id::AES3_PCM_DESCRIPTOR {
            warn!("AES3PCMDescriptor is not supported");
        } else if file.is_a(desc, &class_id::PCM_DESCRIPTOR) {
            self.parse_pcm_descriptor(desc, e);
        } else if file.is_a(desc, &class_id::WAVE_DESCRIPTOR) {
            self.read_summary(desc, e, EssenceType::Wave, pid::WAVE_DESCRIPTOR_SUMMARY);
        } else if file.is_a(desc, &class_id::AIFC_DESCRIPTOR) {
            self.read_summary(desc, e, EssenceType::Aifc, pid::AIFC_DESCRIPTOR_SUMMARY);
        } else if file.is_a(desc, &class_id::MULTIPLE_DESCRIPTOR) {
            warn!("MultipleDescriptor is not supported");
        } else {
            warn!("unsupported audio descriptor {}", file.class_name(desc));
        }

        if let Some(url) = self.locator(desc) {
            self.comp.audio.essence_files[e].original_file_path = Some(url);
        }
    }

    fn parse_pcm_descriptor(&mut self, desc: ObjectId, e: usize) {
        let file = self.file;
        let essence = &mut self.comp.audio.essence_files[e];
        essence.essence_type = EssenceType::Pcm;

        let (Some(length), Some(channels), Some(rate), Some(bits)) = (
            file.get::<i64>(desc, pid::FILE_DESCRIPTOR_LENGTH),
            file.get::<u32>(desc, pid::SOUND_DESCRIPTOR_CHANNELS),
            file.get::<Rational>(desc, pid::FILE_DESCRIPTOR_SAMPLE_RATE),
            file.get::<u32>(desc, pid::SOUND_DESCRIPTOR_QUANTIZATION_BITS),
        ) else {
            warn!("incomplete PCMDescriptor");
            return;
        };
        if rate.denominator != 1 {
            error!("PCM sample rate should be an integer, got {}", rate);
            return;
        }
        if bits >= 1 << 15 {
            error!("invalid PCM quantization bits {}", bits);
            return;
        }

        essence.length = length.max(0) as u64;
        essence.channels = channels.min(u16::MAX as u32) as u16;
        essence.samplerate = rate.numerator.max(0) as u32;
        essence.samplerate_rational = rate;
        essence.samplesize = bits as u16;
    }

    fn read_summary(&mut self, desc: ObjectId, e: usize, essence_type: EssenceType, summary_pid: u16) {
        let summary = self
            .file
            .object(desc)
            .property(summary_pid)
            .and_then(|p| p.raw())
            .map(<[u8]>::to_vec);
        let essence = &mut self.comp.audio.essence_files[e];
        essence.essence_type = essence_type;
        if summary.is_none() {
            error!("{:?} descriptor has no Summary", essence_type);
        }
        essence.summary = summary;
    }

    fn parse_video_descriptor(&mut self, desc: ObjectId, e: usize) {
        let file = self.file;
        if file.is_a(desc, &class_id::DIGITAL_IMAGE_DESCRIPTOR) {
            let video = &mut self.comp.video.essence_files[e];
            video.length = file.get_opt::<i64>(desc, pid::FILE_DESCRIPTOR_LENGTH).unwrap_or(0);
            video.framerate = file.get_opt::<Rational>(desc, pid::FILE_DESCRIPTOR_SAMPLE_RATE).unwrap_or_default();
        } else {
            warn!("unsupported video descriptor {}", file.class_name(desc));
        }
        if let Some(url) = self.locator(desc) {
            self.comp.video.essence_files[e].original_file_path = Some(url);
        }
    }

    /// URL of the last NetworkLocator of a descriptor.
    fn locator(&self, desc: ObjectId) -> Option<String> {
        let file = self.file;
        let mut url = None;
        for &loc in file.members(desc, pid::ESSENCE_DESCRIPTOR_LOCATOR) {
            if file.is_a(loc, &class_id::NETWORK_LOCATOR) {
                url = file.get::<String>(loc, pid::NETWORK_LOCATOR_URL_STRING).or(url);
            } else {
                debug!("unsupported locator {}", file.class_name(loc));
            }
        }
        url
    }

    fn parse_essence_data(&mut self, data: ObjectId) {
        let Some(e) = self.state.current_essence else {
            return;
        };
        match self.file.stream_node(data, pid::ESSENCE_DATA_DATA) {
            Some(node) => {
                let essence = &mut self.comp.audio.essence_files[e];
                essence.node = Some(node);
                essence.is_embedded = true;
            }
            None => warn!("EssenceData has no data stream"),
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn media_of(&self, component: ObjectId) -> Option<Media> {
        self.file
            .weak_ref_definition(component, pid::COMPONENT_DATA_DEFINITION, pid::DICTIONARY_DATA_DEFINITIONS)
            .map(|d| Media::of(&d))
    }

    /// Parameter definition, stored either as an AUID or as a weak reference.
    fn parameter_definition(&self, param: ObjectId) -> Option<Auid> {
        let file = self.file;
        if let Some(id) = file.get_opt::<Auid>(param, pid::PARAMETER_DEFINITION) {
            return Some(id);
        }
        if file.get_opt::<WeakRef>(param, pid::PARAMETER_DEFINITION).is_some() {
            return file.weak_ref_definition(param, pid::PARAMETER_DEFINITION, pid::DICTIONARY_PARAMETER_DEFINITIONS);
        }
        warn!("parameter has no Definition");
        None
    }

    fn interpolation(&self, varying: ObjectId) -> Interpolation {
        let def = self.file.weak_ref_definition(
            varying,
            pid::VARYING_VALUE_INTERPOLATION,
            pid::DICTIONARY_INTERPOLATION_DEFINITIONS,
        );
        match def {
            Some(d) if d == interpolation_def::NONE => Interpolation::None,
            Some(d) if d == interpolation_def::LINEAR => Interpolation::Linear,
            Some(d) if d == interpolation_def::POWER => Interpolation::Power,
            Some(d) if d == interpolation_def::CONSTANT => Interpolation::Constant,
            Some(d) if d == interpolation_def::BSPLINE => Interpolation::BSpline,
            Some(d) if d == interpolation_def::LOG => Interpolation::Log,
            Some(d) => {
                debug!("unknown interpolation {}, using linear", d);
                Interpolation::Linear
            }
            None => Interpolation::Linear,
        }
    }

    /// True when the first non-OperationGroup ancestor of `op_group` is a
    /// TimelineMobSlot: the parameter belongs to the track, not to clips.
    fn is_track_parameter(&self, op_group: ObjectId) -> bool {
        let file = self.file;
        let mut cur = Some(op_group);
        while let Some(obj) = cur {
            if !file.is_a(obj, &class_id::OPERATION_GROUP) {
                return file.is_a(obj, &class_id::TIMELINE_MOB_SLOT);
            }
            cur = file.parent(obj);
        }
        false
    }

    fn tagged_values(&self, obj: ObjectId, list_pid: u16) -> MetaData {
        let file = self.file;
        file.members(obj, list_pid)
            .iter()
            .filter_map(|&tv| {
                let name = file.get::<String>(tv, pid::TAGGED_VALUE_NAME)?;
                let text = file.indirect::<String>(tv, pid::TAGGED_VALUE_VALUE).unwrap_or_default();
                Some((name, text))
            })
            .collect()
    }

    fn unique_audio_name(&self, e: usize) -> String {
        let essences = &self.comp.audio.essence_files;
        if self.options.mobid_essence_filename {
            return material_name(&essences[e].source_mob_id.material());
        }
        unique_name(&essences[e].name, |n| essences.iter().any(|o| o.unique_name == n))
    }

    fn audio_clip(&self, (t, i): (usize, usize)) -> Option<&AudioClip> {
        self.comp.audio.tracks.get(t)?.items.get(i)?.as_audio()
    }

    fn audio_clip_mut(&mut self, (t, i): (usize, usize)) -> Option<&mut AudioClip> {
        self.comp.audio.tracks.get_mut(t)?.items.get_mut(i)?.as_audio_mut()
    }
}

/// `name` (or "unknown"), suffixed with `_1`, `_2`... until `taken` rejects it.
pub fn unique_name(name: &str, taken: impl Fn(&str) -> bool) -> String {
    let base = if name.is_empty() { "unknown" } else { name };
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|i| format!("{}_{}", base, i))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Material id as `xxxxxxxx-xxxx-xxxx-xxxxxxxxxxxxxxxx`.
pub fn material_name(uid: &Auid) -> String {
    let mut out = format!("{:08x}-{:04x}-{:04x}-", uid.data1, uid.data2, uid.data3);
    for b in uid.data4 {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_name_suffixes() {
        let taken = ["take", "take_1"];
        assert_eq!(unique_name("take", |n| taken.contains(&n)), "take_2");
        assert_eq!(unique_name("other", |n| taken.contains(&n)), "other");
        assert_eq!(unique_name("", |_| false), "unknown");
    }

    #[test]
    fn test_material_name() {
        let uid = Auid::new(0x0102_0304, 0x0506, 0x0708, [9, 10, 11, 12, 13, 14, 15, 16]);
        assert_eq!(material_name(&uid), "01020304-0506-0708-090a0b0c0d0e0f10");
    }

    #[test]
    fn test_media_kind() {
        assert_eq!(Media::of(&data_def::SOUND), Media::Sound);
        assert_eq!(Media::of(&data_def::LEGACY_PICTURE), Media::Picture);
        assert_eq!(Media::of(&data_def::TIMECODE), Media::Timecode);
        assert_eq!(Media::of(&data_def::DESCRIPTIVE_METADATA), Media::Other);
    }
}
