//! Test-only AAF writer.
//!
//! Builds an object tree in memory and serializes it into a version 3
//! compound file laid out the way AAF files store objects: one storage per
//! object with a `properties` stream, child storages for strong references,
//! `<name> index` streams for vectors and one stream per data stream
//! property. The mini stream is disabled (cutoff 0) so every stream lives in
//! regular sectors.

#![allow(dead_code)]

use aaf::core::defs::{class_id, data_def, operation_def, parameter_def, pid, type_id};
use aaf::core::{Auid, MobId, Rational, TimeStamp};
use aaf::util::string_to_utf16le;

const SECTOR: usize = 512;
const ENTRIES_PER_SECTOR: usize = SECTOR / 128;
const NOSTREAM: u32 = 0xFFFF_FFFF;
const ENDOFCHAIN: u32 = 0xFFFF_FFFE;
const FATSECT: u32 = 0xFFFF_FFFD;
const FREESECT: u32 = 0xFFFF_FFFF;

const FORM_DATA: u16 = 0x82;
const FORM_STREAM: u16 = 0x42;
const FORM_STRONG: u16 = 0x22;
const FORM_VECTOR: u16 = 0x32;
const FORM_WEAK: u16 = 0x02;

// ============================================================================
// Object model
// ============================================================================

enum PropValue {
    Data(Vec<u8>),
    Weak(Vec<u8>),
    Stream(Vec<u8>),
    Strong(Box<Obj>),
    Vector(Vec<Obj>),
}

/// An object to be written.
pub struct Obj {
    class: Auid,
    props: Vec<(u16, PropValue)>,
}

impl Obj {
    pub fn new(class: Auid) -> Self {
        Self { class, props: Vec::new() }
    }

    pub fn data(mut self, pid: u16, bytes: impl Into<Vec<u8>>) -> Self {
        self.props.push((pid, PropValue::Data(bytes.into())));
        self
    }

    pub fn string(self, pid: u16, s: &str) -> Self {
        self.data(pid, string_to_utf16le(s))
    }

    pub fn u8(self, pid: u16, v: u8) -> Self {
        self.data(pid, vec![v])
    }

    pub fn u16(self, pid: u16, v: u16) -> Self {
        self.data(pid, v.to_le_bytes())
    }

    pub fn u32(self, pid: u16, v: u32) -> Self {
        self.data(pid, v.to_le_bytes())
    }

    pub fn i64(self, pid: u16, v: i64) -> Self {
        self.data(pid, v.to_le_bytes())
    }

    pub fn rational(self, pid: u16, r: Rational) -> Self {
        self.data(pid, [r.numerator.to_le_bytes(), r.denominator.to_le_bytes()].concat())
    }

    pub fn auid(self, pid: u16, id: Auid) -> Self {
        self.data(pid, id.to_bytes())
    }

    pub fn mob_id(self, pid: u16, id: MobId) -> Self {
        self.data(pid, id.0)
    }

    pub fn timestamp(self, pid: u16, ts: TimeStamp) -> Self {
        let mut b = ts.year.to_le_bytes().to_vec();
        b.extend_from_slice(&[ts.month, ts.day, ts.hour, ts.minute, ts.second, ts.fraction]);
        self.data(pid, b)
    }

    pub fn u32_array(self, pid: u16, values: &[u32]) -> Self {
        self.data(pid, values.iter().flat_map(|v| v.to_le_bytes()).collect::<Vec<u8>>())
    }

    /// Weak reference keyed by the AUID of the target definition.
    pub fn weak(mut self, pid: u16, target: Auid) -> Self {
        let mut b = vec![0, 0];
        b.extend_from_slice(&0x1B01u16.to_le_bytes());
        b.push(16);
        b.extend_from_slice(&target.to_bytes());
        self.props.push((pid, PropValue::Weak(b)));
        self
    }

    pub fn stream(mut self, pid: u16, bytes: impl Into<Vec<u8>>) -> Self {
        self.props.push((pid, PropValue::Stream(bytes.into())));
        self
    }

    pub fn strong(mut self, pid: u16, child: Obj) -> Self {
        self.props.push((pid, PropValue::Strong(Box::new(child))));
        self
    }

    pub fn vector(mut self, pid: u16, members: Vec<Obj>) -> Self {
        self.props.push((pid, PropValue::Vector(members)));
        self
    }
}

// ============================================================================
// Compound file layout
// ============================================================================

struct Entry {
    name: String,
    kind: u8,
    clsid: [u8; 16],
    children: Vec<usize>,
    data: Vec<u8>,
    start: u32,
}

impl Entry {
    fn storage(name: &str, clsid: Auid) -> Self {
        Self { name: name.into(), kind: 1, clsid: clsid.to_bytes(), children: Vec::new(), data: Vec::new(), start: ENDOFCHAIN }
    }

    fn stream(name: &str, data: Vec<u8>) -> Self {
        Self { name: name.into(), kind: 2, clsid: [0; 16], children: Vec::new(), data, start: ENDOFCHAIN }
    }
}

fn add_object(entries: &mut Vec<Entry>, at: usize, obj: &Obj) {
    let mut header = vec![0x4C, 0x20];
    header.extend_from_slice(&(obj.props.len() as u16).to_le_bytes());
    let mut values = Vec::new();

    for (pid, value) in &obj.props {
        let (form, bytes) = match value {
            PropValue::Data(b) => (FORM_DATA, b.clone()),
            PropValue::Weak(b) => (FORM_WEAK, b.clone()),
            PropValue::Stream(data) => {
                let name = format!("D{:04x}", pid);
                push_child(entries, at, Entry::stream(&name, data.clone()));
                let mut b = vec![0x4C];
                b.extend_from_slice(&string_to_utf16le(&name));
                (FORM_STREAM, b)
            }
            PropValue::Strong(child) => {
                let name = format!("S{:04x}", pid);
                let idx = push_child(entries, at, Entry::storage(&name, child.class));
                add_object(entries, idx, child);
                (FORM_STRONG, string_to_utf16le(&name))
            }
            PropValue::Vector(members) => {
                let name = format!("V{:04x}", pid);
                let mut index = Vec::new();
                index.extend_from_slice(&(members.len() as u32).to_le_bytes());
                index.extend_from_slice(&(members.len() as u32).to_le_bytes());
                index.extend_from_slice(&0u32.to_le_bytes());
                for (key, member) in members.iter().enumerate() {
                    index.extend_from_slice(&(key as u32).to_le_bytes());
                    let member_name = format!("{}{{{:x}}}", name, key);
                    let idx = push_child(entries, at, Entry::storage(&member_name, member.class));
                    add_object(entries, idx, member);
                }
                push_child(entries, at, Entry::stream(&format!("{} index", name), index));
                (FORM_VECTOR, string_to_utf16le(&name))
            }
        };
        header.extend_from_slice(&pid.to_le_bytes());
        header.extend_from_slice(&form.to_le_bytes());
        header.extend_from_slice(&(bytes.len() as u16).to_le_bytes());
        values.extend_from_slice(&bytes);
    }

    header.extend_from_slice(&values);
    push_child(entries, at, Entry::stream("properties", header));
}

fn push_child(entries: &mut Vec<Entry>, parent: usize, entry: Entry) -> usize {
    entries.push(entry);
    let idx = entries.len() - 1;
    entries[parent].children.push(idx);
    idx
}

fn sectors_for(len: usize) -> usize {
    len.div_ceil(SECTOR)
}

/// Serialize `root` (an object of class Root) into compound file bytes.
pub fn write_cfb(root: &Obj) -> Vec<u8> {
    let mut entries = vec![Entry { kind: 5, ..Entry::storage("Root Entry", root.class) }];
    add_object(&mut entries, 0, root);

    let dir_sectors = sectors_for(entries.len() * 128).max(1);
    let data_sectors: usize = entries.iter().map(|e| sectors_for(e.data.len())).sum();
    let mut fat_sectors = 1;
    while fat_sectors * (SECTOR / 4) < fat_sectors + dir_sectors + data_sectors {
        fat_sectors += 1;
    }
    assert!(fat_sectors <= 109, "test file too large for the header DiFAT");

    let total = fat_sectors + dir_sectors + data_sectors;
    let mut fat = vec![FREESECT; fat_sectors * (SECTOR / 4)];
    for entry in fat.iter_mut().take(fat_sectors) {
        *entry = FATSECT;
    }
    let mut chain = |fat: &mut Vec<u32>, start: usize, count: usize| {
        for s in start..start + count {
            fat[s] = if s + 1 < start + count { (s + 1) as u32 } else { ENDOFCHAIN };
        }
    };
    chain(&mut fat, fat_sectors, dir_sectors);

    let mut next = fat_sectors + dir_sectors;
    for e in entries.iter_mut() {
        let n = sectors_for(e.data.len());
        if n > 0 {
            e.start = next as u32;
            chain(&mut fat, next, n);
            next += n;
        }
    }

    let mut out = vec![0u8; SECTOR * (total + 1)];

    // Header
    let h = &mut out[..SECTOR];
    h[..8].copy_from_slice(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]);
    h[0x18..0x1A].copy_from_slice(&0x3Eu16.to_le_bytes());
    h[0x1A..0x1C].copy_from_slice(&3u16.to_le_bytes());
    h[0x1C..0x1E].copy_from_slice(&0xFFFEu16.to_le_bytes());
    h[0x1E..0x20].copy_from_slice(&9u16.to_le_bytes());
    h[0x20..0x22].copy_from_slice(&6u16.to_le_bytes());
    h[0x2C..0x30].copy_from_slice(&(fat_sectors as u32).to_le_bytes());
    h[0x30..0x34].copy_from_slice(&(fat_sectors as u32).to_le_bytes());
    h[0x38..0x3C].copy_from_slice(&0u32.to_le_bytes());
    h[0x3C..0x40].copy_from_slice(&ENDOFCHAIN.to_le_bytes());
    h[0x44..0x48].copy_from_slice(&ENDOFCHAIN.to_le_bytes());
    for i in 0..109 {
        let v = if i < fat_sectors { i as u32 } else { FREESECT };
        h[0x4C + i * 4..0x50 + i * 4].copy_from_slice(&v.to_le_bytes());
    }

    // FAT
    for (i, v) in fat.iter().enumerate() {
        let at = SECTOR + i * 4;
        out[at..at + 4].copy_from_slice(&v.to_le_bytes());
    }

    // Directory: children chained through their right sibling links.
    let dir_at = SECTOR * (fat_sectors + 1);
    for slot in 0..dir_sectors * ENTRIES_PER_SECTOR {
        let raw = &mut out[dir_at + slot * 128..dir_at + (slot + 1) * 128];
        raw[68..72].copy_from_slice(&NOSTREAM.to_le_bytes());
        raw[72..76].copy_from_slice(&NOSTREAM.to_le_bytes());
        raw[76..80].copy_from_slice(&NOSTREAM.to_le_bytes());
        let Some(e) = entries.get(slot) else { continue };

        let units: Vec<u16> = e.name.encode_utf16().chain(std::iter::once(0)).collect();
        for (i, u) in units.iter().enumerate() {
            raw[i * 2..i * 2 + 2].copy_from_slice(&u.to_le_bytes());
        }
        raw[64..66].copy_from_slice(&((units.len() * 2) as u16).to_le_bytes());
        raw[66] = e.kind;
        raw[67] = 1;
        if let Some(&first) = e.children.first() {
            raw[76..80].copy_from_slice(&(first as u32).to_le_bytes());
        }
        raw[80..96].copy_from_slice(&e.clsid);
        raw[116..120].copy_from_slice(&e.start.to_le_bytes());
        raw[120..128].copy_from_slice(&(e.data.len() as u64).to_le_bytes());
    }
    for e in &entries {
        for pair in e.children.windows(2) {
            let raw = dir_at + pair[0] * 128;
            out[raw + 72..raw + 76].copy_from_slice(&(pair[1] as u32).to_le_bytes());
        }
    }

    // Stream data
    for e in &entries {
        if !e.data.is_empty() {
            let at = SECTOR * (e.start as usize + 1);
            out[at..at + e.data.len()].copy_from_slice(&e.data);
        }
    }
    out
}

// ============================================================================
// AAF building blocks
// ============================================================================

pub fn mob_id(n: u8) -> MobId {
    MobId::from_material(Auid::new(0x1000 + n as u32, 0x0001, 0x0002, [n, 1, 2, 3, 4, 5, 6, 7]))
}

pub fn identification(company: &str, product: &str, version: &str) -> Obj {
    Obj::new(class_id::IDENTIFICATION)
        .string(pid::IDENTIFICATION_COMPANY_NAME, company)
        .string(pid::IDENTIFICATION_PRODUCT_NAME, product)
        .string(pid::IDENTIFICATION_PRODUCT_VERSION_STRING, version)
        .string(pid::IDENTIFICATION_PLATFORM, "test")
}

/// Root -> Header -> ContentStorage holding `mobs` and `essence_data`.
pub fn aaf_file(ident: Obj, mobs: Vec<Obj>, essence_data: Vec<Obj>) -> Vec<u8> {
    aaf_file_with(ident, mobs, essence_data, None)
}

/// [`aaf_file`] with an optional Header OperationalPattern.
pub fn aaf_file_with(ident: Obj, mobs: Vec<Obj>, essence_data: Vec<Obj>, pattern: Option<Auid>) -> Vec<u8> {
    let storage = Obj::new(class_id::CONTENT_STORAGE)
        .vector(pid::CONTENT_STORAGE_MOBS, mobs)
        .vector(pid::CONTENT_STORAGE_ESSENCE_DATA, essence_data);
    let mut header = Obj::new(class_id::HEADER)
        .strong(pid::HEADER_CONTENT, storage)
        .vector(pid::HEADER_IDENTIFICATION_LIST, vec![ident]);
    if let Some(pattern) = pattern {
        header = header.auid(pid::HEADER_OPERATIONAL_PATTERN, pattern);
    }
    let root = Obj::new(class_id::ROOT).strong(pid::ROOT_HEADER, header);
    write_cfb(&root)
}

pub fn source_clip(data_def: Auid, len: i64, start: i64, source: MobId, slot: u32) -> Obj {
    Obj::new(class_id::SOURCE_CLIP)
        .weak(pid::COMPONENT_DATA_DEFINITION, data_def)
        .i64(pid::COMPONENT_LENGTH, len)
        .i64(pid::SOURCE_CLIP_START_TIME, start)
        .mob_id(pid::SOURCE_REFERENCE_SOURCE_ID, source)
        .u32(pid::SOURCE_REFERENCE_SOURCE_MOB_SLOT_ID, slot)
}

pub fn audio_clip(len: i64, start: i64, master: MobId) -> Obj {
    source_clip(data_def::SOUND, len, start, master, 1)
}

pub fn filler(len: i64) -> Obj {
    Obj::new(class_id::FILLER)
        .weak(pid::COMPONENT_DATA_DEFINITION, data_def::SOUND)
        .i64(pid::COMPONENT_LENGTH, len)
}

pub fn sequence(data_def: Auid, components: Vec<Obj>) -> Obj {
    Obj::new(class_id::SEQUENCE)
        .weak(pid::COMPONENT_DATA_DEFINITION, data_def)
        .vector(pid::SEQUENCE_COMPONENTS, components)
}

pub fn timeline_slot(slot_id: u32, track: u32, edit_rate: Rational, segment: Obj) -> Obj {
    Obj::new(class_id::TIMELINE_MOB_SLOT)
        .u32(pid::MOB_SLOT_SLOT_ID, slot_id)
        .u32(pid::MOB_SLOT_PHYSICAL_TRACK_NUMBER, track)
        .rational(pid::TIMELINE_MOB_SLOT_EDIT_RATE, edit_rate)
        .i64(pid::TIMELINE_MOB_SLOT_ORIGIN, 0)
        .strong(pid::MOB_SLOT_SEGMENT, segment)
}

pub fn timecode_slot(start: i64, fps: u16) -> Obj {
    let tc = Obj::new(class_id::TIMECODE)
        .weak(pid::COMPONENT_DATA_DEFINITION, data_def::TIMECODE)
        .i64(pid::COMPONENT_LENGTH, 0)
        .i64(pid::TIMECODE_START, start)
        .u16(pid::TIMECODE_FPS, fps)
        .u8(pid::TIMECODE_DROP, 0);
    Obj::new(class_id::TIMELINE_MOB_SLOT)
        .u32(pid::MOB_SLOT_SLOT_ID, 100)
        .rational(pid::TIMELINE_MOB_SLOT_EDIT_RATE, Rational::new(fps as i32, 1))
        .strong(pid::MOB_SLOT_SEGMENT, tc)
}

pub fn composition_mob(name: &str, id: MobId, slots: Vec<Obj>) -> Obj {
    Obj::new(class_id::COMPOSITION_MOB)
        .mob_id(pid::MOB_MOB_ID, id)
        .string(pid::MOB_NAME, name)
        .vector(pid::MOB_SLOTS, slots)
}

/// MasterMob with one sound slot pointing at slot 1 of `source`.
pub fn master_mob(name: &str, id: MobId, source: MobId, length: i64, rate: Rational) -> Obj {
    let clip = source_clip(data_def::SOUND, length, 0, source, 1);
    Obj::new(class_id::MASTER_MOB)
        .mob_id(pid::MOB_MOB_ID, id)
        .string(pid::MOB_NAME, name)
        .vector(pid::MOB_SLOTS, vec![timeline_slot(1, 1, rate, clip)])
}

/// MasterMob with one picture slot pointing at slot 1 of `source`.
pub fn picture_master_mob(name: &str, id: MobId, source: MobId, length: i64, rate: Rational) -> Obj {
    let clip = source_clip(data_def::PICTURE, length, 0, source, 1);
    Obj::new(class_id::MASTER_MOB)
        .mob_id(pid::MOB_MOB_ID, id)
        .string(pid::MOB_NAME, name)
        .vector(pid::MOB_SLOTS, vec![timeline_slot(1, 1, rate, clip)])
}

pub fn cdci_descriptor(length: i64, rate: Rational) -> Obj {
    Obj::new(class_id::CDCI_DESCRIPTOR)
        .i64(pid::FILE_DESCRIPTOR_LENGTH, length)
        .rational(pid::FILE_DESCRIPTOR_SAMPLE_RATE, rate)
}

pub fn pcm_descriptor(channels: u32, rate: i32, bits: u32, length: i64) -> Obj {
    Obj::new(class_id::PCM_DESCRIPTOR)
        .i64(pid::FILE_DESCRIPTOR_LENGTH, length)
        .rational(pid::FILE_DESCRIPTOR_SAMPLE_RATE, Rational::new(rate, 1))
        .u32(pid::SOUND_DESCRIPTOR_CHANNELS, channels)
        .u32(pid::SOUND_DESCRIPTOR_QUANTIZATION_BITS, bits)
}

pub fn wave_descriptor(summary: Vec<u8>, url: Option<&str>) -> Obj {
    let mut desc = Obj::new(class_id::WAVE_DESCRIPTOR).data(pid::WAVE_DESCRIPTOR_SUMMARY, summary);
    if let Some(url) = url {
        let loc = Obj::new(class_id::NETWORK_LOCATOR).string(pid::NETWORK_LOCATOR_URL_STRING, url);
        desc = desc.vector(pid::ESSENCE_DESCRIPTOR_LOCATOR, vec![loc]);
    }
    desc
}

pub fn source_mob(id: MobId, rate: Rational, length: i64, descriptor: Obj) -> Obj {
    let slot_segment = Obj::new(class_id::SOURCE_CLIP)
        .weak(pid::COMPONENT_DATA_DEFINITION, data_def::SOUND)
        .i64(pid::COMPONENT_LENGTH, length)
        .i64(pid::SOURCE_CLIP_START_TIME, 0)
        .mob_id(pid::SOURCE_REFERENCE_SOURCE_ID, MobId::default())
        .u32(pid::SOURCE_REFERENCE_SOURCE_MOB_SLOT_ID, 0);
    Obj::new(class_id::SOURCE_MOB)
        .mob_id(pid::MOB_MOB_ID, id)
        .string(pid::MOB_NAME, "")
        .timestamp(
            pid::MOB_CREATION_TIME,
            TimeStamp { year: 2024, month: 3, day: 14, hour: 9, minute: 26, second: 53, fraction: 0 },
        )
        .vector(pid::MOB_SLOTS, vec![timeline_slot(1, 1, rate, slot_segment)])
        .strong(pid::SOURCE_MOB_ESSENCE_DESCRIPTION, descriptor)
}

pub fn essence_data(id: MobId, data: Vec<u8>) -> Obj {
    Obj::new(class_id::ESSENCE_DATA)
        .mob_id(pid::ESSENCE_DATA_MOB_ID, id)
        .stream(pid::ESSENCE_DATA_DATA, data)
}

/// Indirect value holding a Rational.
pub fn indirect_rational(r: Rational) -> Vec<u8> {
    let mut b = vec![0x4C];
    b.extend_from_slice(&type_id::RATIONAL.to_bytes());
    b.extend_from_slice(&r.numerator.to_le_bytes());
    b.extend_from_slice(&r.denominator.to_le_bytes());
    b
}

/// MonoAudioGain OperationGroup with a constant amplitude over `inputs`.
pub fn gain_group(amplitude: Rational, len: i64, inputs: Vec<Obj>) -> Obj {
    let param = Obj::new(class_id::CONSTANT_VALUE)
        .auid(pid::PARAMETER_DEFINITION, parameter_def::AMPLITUDE)
        .data(pid::CONSTANT_VALUE_VALUE, indirect_rational(amplitude));
    Obj::new(class_id::OPERATION_GROUP)
        .weak(pid::COMPONENT_DATA_DEFINITION, data_def::SOUND)
        .i64(pid::COMPONENT_LENGTH, len)
        .weak(pid::OPERATION_GROUP_OPERATION, operation_def::MONO_AUDIO_GAIN)
        .vector(pid::OPERATION_GROUP_INPUT_SEGMENTS, inputs)
        .vector(pid::OPERATION_GROUP_PARAMETERS, vec![param])
}

/// 24-bit mono PCM bytes with a recognisable ramp.
pub fn pcm_bytes(frames: usize) -> Vec<u8> {
    (0..frames * 3).map(|i| (i % 251) as u8).collect()
}
