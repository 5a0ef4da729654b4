//! Audio essence: locating external media, reading audio file headers and
//! extracting embedded media to WAVE files.

mod extract;
mod locate;
mod parse;
pub mod reader;
pub mod riff;
pub mod uri;

pub use extract::{
    check_wav_payload_size, extract_audio_clip, extract_audio_essence, extract_from_reader, ExtractFormat,
    ExtractRequest,
};
pub use locate::{candidates, locate_external_essence_file, locate_with};
pub use parse::parse_audio_essence;
pub use reader::{ByteRangeReader, FileReader, MemReader};
pub use riff::{parse_audio_file, write_wav_header, AudioFormat, ParseMode, RiffAudioFile, WavBext, WavFmt};
pub use uri::{percent_decode, HostKind, Uri};
