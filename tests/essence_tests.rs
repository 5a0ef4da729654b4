//! Integration tests for essence location, summary parsing and extraction.

mod common;

use std::path::Path;

use aaf::aaf::AafFile;
use aaf::core::defs::data_def;
use aaf::core::Rational;
use aaf::essence::{
    extract_audio_clip, extract_audio_essence, parse_audio_file, write_wav_header, ExtractFormat, FileReader,
    ParseMode, WavFmt,
};
use aaf::iface::{load, parse_composition, EssenceType, Options};

use common::*;
use tempfile::tempdir;

const RATE: Rational = Rational::new(48000, 1);

/// Mono 24-bit embedded essence "Dialog" with two clips on one track.
fn embedded_session() -> Vec<u8> {
    let (source, master) = (mob_id(1), mob_id(2));
    let sequence = sequence(
        data_def::SOUND,
        vec![audio_clip(480, 0, master), filler(100), audio_clip(200, 100, master)],
    );
    let mobs = vec![
        source_mob(source, RATE, 1000, pcm_descriptor(1, 48000, 24, 1000)),
        master_mob("Dialog", master, source, 1000, RATE),
        composition_mob("Session", mob_id(3), vec![timeline_slot(1, 1, RATE, sequence)]),
    ];
    aaf_file(identification("Acme", "Mixer", "2.1"), mobs, vec![essence_data(source, pcm_bytes(1000))])
}

/// WAVE header for `frames` of 16-bit stereo, followed by the samples when `with_data`.
fn stereo_wave(frames: u32, with_data: bool) -> Vec<u8> {
    let fmt = WavFmt { channels: 2, sample_rate: 44100, bits_per_sample: 16 };
    let size = frames * fmt.block_align().expect("block align") as u32;
    let mut out = Vec::new();
    write_wav_header(&mut out, &fmt, None, if with_data { size } else { 0 }).expect("header");
    if with_data {
        out.extend((0..size).map(|i| (i % 7) as u8));
    }
    out
}

/// Session whose only essence is an external WAVE file at `url`.
fn external_session(summary: Vec<u8>, url: &str) -> Vec<u8> {
    let (source, master) = (mob_id(1), mob_id(2));
    let rate = Rational::new(44100, 1);
    let sequence = sequence(data_def::SOUND, vec![audio_clip(100, 0, master)]);
    let mobs = vec![
        source_mob(source, rate, 480, wave_descriptor(summary, Some(url))),
        master_mob("vox", master, source, 480, rate),
        composition_mob("Session", mob_id(3), vec![timeline_slot(1, 1, rate, sequence)]),
    ];
    aaf_file(identification("Acme", "Mixer", "2.1"), mobs, vec![])
}

fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

#[test]
fn test_extract_embedded_pcm_as_bwav() {
    let file = AafFile::from_bytes(embedded_session()).expect("Failed to read generated AAF");
    let mut comp = parse_composition(&file, &Options::default()).expect("Failed to parse composition");
    let out = tempdir().expect("Failed to create temp dir");

    let path = extract_audio_essence(&file, &mut comp, 0, ExtractFormat::Default, out.path()).expect("extract");
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("Dialog.wav"));
    assert_eq!(comp.audio.essence_files[0].usable_file_path.as_deref(), Some(path.as_path()));

    let wav = parse_audio_file(&FileReader::open(&path).expect("open"), ParseMode::Full).expect("parse wav");
    assert_eq!((wav.channels, wav.sample_rate, wav.sample_size), (1, 48000, 24));
    assert_eq!(wav.sample_count, 1000);

    let bext = wav.bext.expect("PCM extraction should write a bext chunk");
    assert_eq!(bext.description, "Dialog\nSession.aaf");
    assert_eq!(bext.originator, "Mixer 2.1");
    assert_eq!(bext.origination_date, "2024:03:14");
    assert_eq!(bext.origination_time, "09:26:53");
    assert_eq!(&bext.umid[..32], &mob_id(1).0);

    let bytes = std::fs::read(&path).expect("read output");
    let start = wav.pcm_audio_start_offset as usize;
    assert_eq!(&bytes[start..start + 3000], pcm_bytes(1000).as_slice());
}

#[test]
fn test_extract_clip_range() {
    let file = AafFile::from_bytes(embedded_session()).expect("Failed to read generated AAF");
    let comp = parse_composition(&file, &Options::default()).expect("Failed to parse composition");
    let out = tempdir().expect("Failed to create temp dir");

    let paths = extract_audio_clip(&file, &comp, 0, 1, ExtractFormat::Wav, out.path()).expect("extract clip");
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].file_name().and_then(|n| n.to_str()), Some("1_2_Dialog.wav"));

    let wav = parse_audio_file(&FileReader::open(&paths[0]).expect("open"), ParseMode::Full).expect("parse wav");
    assert_eq!(wav.sample_count, 200);
    assert!(wav.bext.is_none(), "plain WAVE output has no bext");

    let bytes = std::fs::read(&paths[0]).expect("read output");
    let start = wav.pcm_audio_start_offset as usize;
    assert_eq!(&bytes[start..start + 600], &pcm_bytes(1000)[300..900]);
}

#[test]
fn test_extract_rejects_external_essence() {
    let file = AafFile::from_bytes(external_session(stereo_wave(480, false), "file:///nowhere/vox.wav"))
        .expect("Failed to read generated AAF");
    let mut comp = parse_composition(&file, &Options::default()).expect("Failed to parse composition");
    let out = tempdir().expect("Failed to create temp dir");
    assert!(extract_audio_essence(&file, &mut comp, 0, ExtractFormat::Default, out.path()).is_err());
    assert!(extract_audio_essence(&file, &mut comp, 7, ExtractFormat::Default, out.path()).is_err());
}

#[test]
fn test_incomplete_summary_falls_back_to_located_file() {
    let media = tempdir().expect("Failed to create temp dir");
    let wav_path = media.path().join("vox.wav");
    std::fs::write(&wav_path, stereo_wave(480, true)).expect("write wav");

    let file = AafFile::from_bytes(external_session(stereo_wave(480, false), &file_url(&wav_path)))
        .expect("Failed to read generated AAF");
    let comp = parse_composition(&file, &Options::default()).expect("Failed to parse composition");

    let essence = &comp.audio.essence_files[0];
    assert!(!essence.is_embedded);
    assert_eq!(essence.essence_type, EssenceType::Wave);
    assert_eq!(essence.usable_file_path, Some(std::fs::canonicalize(&wav_path).expect("canonicalize")));
    assert_eq!((essence.channels, essence.samplerate, essence.samplesize), (2, 44100, 16));
    assert_eq!(essence.length, 480);
    assert_eq!(essence.pcm_audio_start_offset, 44);
    assert_eq!(comp.audio.samplerate, 44100);
}

#[test]
fn test_media_location_search() {
    let media = tempdir().expect("Failed to create temp dir");
    std::fs::create_dir(media.path().join("Audio Files")).expect("mkdir");
    let wav_path = media.path().join("Audio Files").join("vox 1.wav");
    std::fs::write(&wav_path, stereo_wave(480, true)).expect("write wav");

    let bytes = external_session(stereo_wave(480, false), "file:///Volumes/Session/Audio%20Files/vox%201.wav");
    let options = Options { media_location: Some(media.path().to_path_buf()), ..Options::default() };
    let comp = parse_composition(&AafFile::from_bytes(bytes).expect("read"), &options).expect("parse");

    let essence = &comp.audio.essence_files[0];
    assert_eq!(essence.original_file_path.as_deref(), Some("file:///Volumes/Session/Audio%20Files/vox%201.wav"));
    assert_eq!(essence.usable_file_path, Some(std::fs::canonicalize(&wav_path).expect("canonicalize")));
    assert_eq!(essence.length, 480);
}

#[test]
fn test_missing_media_keeps_summary_values() {
    let bytes = external_session(stereo_wave(480, true)[..44].to_vec(), "file:///nowhere/vox.wav");
    let comp = parse_composition(&AafFile::from_bytes(bytes).expect("read"), &Options::default()).expect("parse");

    let essence = &comp.audio.essence_files[0];
    assert!(essence.usable_file_path.is_none());
    assert_eq!(essence.essence_type, EssenceType::Wave);
    assert_eq!((essence.channels, essence.samplerate, essence.samplesize), (2, 44100, 16));
    assert_eq!(essence.length, 480);
}

#[test]
fn test_load_from_disk_finds_media_next_to_aaf() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("vox.wav"), stereo_wave(480, true)).expect("write wav");
    let aaf_path = dir.path().join("session.aaf");
    std::fs::write(&aaf_path, external_session(stereo_wave(480, false), "file:///elsewhere/vox.wav"))
        .expect("write aaf");

    for use_mmap in [true, false] {
        let options = Options { use_mmap, ..Options::default() };
        let (file, comp) = load(&aaf_path, &options).expect("load");
        assert_eq!(file.path(), Some(aaf_path.as_path()));
        let essence = &comp.audio.essence_files[0];
        assert!(essence.usable_file_path.is_some(), "media next to the AAF should be found");
        assert_eq!(essence.length, 480);
    }
}
