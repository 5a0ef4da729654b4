//! AAF CLI - Tool for inspecting AAF files and extracting embedded audio.

use aaf::aaf::{AafFile, ObjectId, PropertyData};
use aaf::core::Rational;
use aaf::essence::{extract_audio_essence, ExtractFormat};
use aaf::iface::{load, Composition, Gain, Options, TimelineItem};
use std::env;
use std::path::{Path, PathBuf};
use std::process;

use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(true)
        .with_writer(std::io::stderr);
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut filter = "warn";
    let mut options = Options::load();
    let mut filtered_args: Vec<&str> = Vec::new();
    let mut iter = args[1..].iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => filter = "info",
            "-vv" | "--trace" => filter = "debug",
            "-q" | "--quiet" => filter = "off",
            "--no-protools" => {
                options.protools_remove_sample_accurate_edit = false;
                options.protools_replace_rendered_fades = false;
            }
            "--media" => match iter.next() {
                Some(dir) => options.media_location = Some(PathBuf::from(dir)),
                None => fail("--media needs a directory"),
            },
            other => filtered_args.push(other),
        }
    }
    init_tracing(filter);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let command = filtered_args[0];
    match command {
        "info" | "i" => cmd_info(file_arg(&filtered_args, "info <file.aaf>"), &options),
        "tracks" | "t" => cmd_tracks(file_arg(&filtered_args, "tracks <file.aaf>"), &options),
        "essences" | "e" => cmd_essences(file_arg(&filtered_args, "essences <file.aaf>"), &options),
        "extract" | "x" => {
            let path = file_arg(&filtered_args, "extract <file.aaf> <out dir>");
            let Some(out_dir) = filtered_args.get(2) else {
                fail("missing output directory\nUsage: aaf-cli extract <file.aaf> <out dir>");
            };
            cmd_extract(path, Path::new(out_dir), &options);
        }
        "dump" | "d" => cmd_dump(file_arg(&filtered_args, "dump <file.aaf>"), &options),
        "json" | "j" => cmd_json(file_arg(&filtered_args, "json <file.aaf>"), &options),

        // Help
        "help" | "h" | "-h" | "--help" => print_help(),

        // Default: if file exists, show info; otherwise error
        _ => {
            if Path::new(command).exists() {
                cmd_info(command, &options);
            } else {
                eprintln!("Unknown command: {}", command);
                eprintln!();
                print_help();
                process::exit(1);
            }
        }
    }
}

fn file_arg<'a>(args: &[&'a str], usage: &str) -> &'a str {
    match args.get(1) {
        Some(path) => path,
        None => {
            eprintln!("Error: missing file argument");
            eprintln!("Usage: aaf-cli {}", usage);
            process::exit(1);
        }
    }
}

fn print_help() {
    println!("aaf-cli - AAF file toolkit");
    println!(
        "version {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("AAF_BUILD_DATE").unwrap_or("unknown"),
        option_env!("AAF_BUILD_TIME").unwrap_or("unknown")
    );
    println!();
    println!("USAGE:");
    println!("    aaf-cli [OPTIONS] <COMMAND> <file.aaf> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info     <file>            Show identification and composition summary");
    println!("    t, tracks   <file>            List tracks, clips, transitions and gains");
    println!("    e, essences <file>            List essence files and their locations");
    println!("    x, extract  <file> <dir>      Extract embedded audio to WAVE files");
    println!("    d, dump     <file>            Dump the object tree");
    println!("    j, json     <file>            Print the composition as JSON");
    println!("    h, help                       Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show info output");
    println!("    -vv, --trace     Show debug output");
    println!("    -q, --quiet      Suppress all diagnostics");
    println!("    --media <dir>    Search <dir> first for external media");
    println!("    --no-protools    Keep Pro Tools rendered fades and edit clips as is");
    println!();
    println!("NOTES:");
    println!("    - Passing a .aaf file directly is equivalent to 'info'");
    println!("    - RUST_LOG overrides the verbosity flags");
    println!("    - Defaults are read from <config dir>/aaf/options.json");
}

fn fail(msg: &str) -> ! {
    eprintln!("Error: {}", msg);
    process::exit(1);
}

fn open(path: &str, options: &Options) -> (AafFile, Composition) {
    info!("Opening file: {}", path);
    match load(path, options) {
        Ok(v) => v,
        Err(e) => fail(&format!("failed to open {}: {}", path, e)),
    }
}

fn seconds(value: i64, rate: Rational) -> f64 {
    if rate.is_zero() {
        0.0
    } else {
        value as f64 / rate.to_f64()
    }
}

/// `HH:MM:SS:FF` of a frame count.
fn timecode_string(frames: i64, fps: u16) -> String {
    let fps = fps.max(1) as i64;
    let (h, rest) = (frames / (3600 * fps), frames % (3600 * fps));
    let (m, rest) = (rest / (60 * fps), rest % (60 * fps));
    format!("{:02}:{:02}:{:02}:{:02}", h, m, rest / fps, rest % fps)
}

fn gain_string(gain: &Gain) -> String {
    match gain.value() {
        Some(v) => format!("{:.3}", v.to_f64()),
        None => format!("{} points ({:?})", gain.points.len(), gain.interpolation),
    }
}

fn cmd_info(path: &str, options: &Options) {
    let (file, comp) = open(path, options);
    let ident = &comp.identification;

    println!("File: {}", path);
    if let Some((major, minor)) = file.version() {
        println!("Version: {}.{}", major, minor);
    }
    println!();
    println!("Identification:");
    println!("  Company:  {}", ident.company_name);
    println!("  Product:  {} {}", ident.product_name, ident.product_version_string);
    println!("  Platform: {}", ident.platform);
    println!("  Date:     {}", ident.date);
    println!();

    let tc = comp.timecode();
    println!("Composition: {}", comp.name);
    println!(
        "  Start:    {} ({} fps{})",
        timecode_string(tc.start, tc.fps),
        tc.fps,
        if tc.drop { " drop" } else { "" }
    );
    println!("  Length:   {:.3} s", seconds(comp.length, comp.length_edit_rate));
    println!("  Audio:    {} tracks, {} essence files", comp.audio.tracks.len(), comp.audio.essence_files.len());
    if comp.audio.samplerate > 0 {
        println!("            {} Hz / {} bit", comp.audio.samplerate, comp.audio.samplesize);
    }
    println!("  Video:    {} tracks", comp.video.tracks.len());
    println!("  Markers:  {}", comp.markers.len());
    for (name, text) in comp.comments.iter() {
        println!("  Comment:  {} = {}", name, text);
    }
}

fn cmd_tracks(path: &str, options: &Options) {
    let (_file, comp) = open(path, options);
    let essences = &comp.audio.essence_files;

    for track in &comp.audio.tracks {
        println!(
            "Audio track {} '{}' ({:?}, {} clips, edit rate {})",
            track.number, track.name, track.format, track.clip_count, track.edit_rate
        );
        if let Some(g) = &track.gain {
            println!("  gain {}", gain_string(g));
        }
        if let Some(p) = &track.pan {
            println!("  pan {}", gain_string(p));
        }
        for item in &track.items {
            match item {
                TimelineItem::Audio(c) => {
                    let name = c.essence(essences).map_or("?", |e| e.unique_name.as_str());
                    print!(
                        "  clip  {:>10} +{:<8} offset {:<8} {}ch '{}'",
                        c.pos,
                        c.len,
                        c.essence_offset,
                        c.channels(essences),
                        name
                    );
                    if let Some(g) = &c.gain {
                        print!(" gain {}", gain_string(g));
                    }
                    if c.automation.is_some() {
                        print!(" automation");
                    }
                    if c.mute {
                        print!(" muted");
                    }
                    println!();
                }
                TimelineItem::Transition(t) => {
                    println!("  {:?} {:>10} +{:<8} cut {}", t.kind, t.pos, t.len, t.cut_pt);
                }
                TimelineItem::Video(_) => {}
            }
        }
        println!();
    }

    for track in &comp.video.tracks {
        println!("Video track {} '{}' (edit rate {})", track.number, track.name, track.edit_rate);
        for c in track.items.iter().filter_map(|i| match i {
            TimelineItem::Video(c) => Some(c),
            _ => None,
        }) {
            println!("  clip  {:>10} +{:<8} offset {}", c.pos, c.len, c.essence_offset);
        }
        println!();
    }

    for m in &comp.markers {
        println!("Marker {} +{} '{}' {}", m.start, m.length, m.name, m.comment);
    }
}

fn cmd_essences(path: &str, options: &Options) {
    let (_file, comp) = open(path, options);

    for (i, e) in comp.audio.essence_files.iter().enumerate() {
        println!("[{}] {} ({:?})", i, e.unique_name, e.essence_type);
        println!(
            "    {} ch, {} Hz, {} bit, {} samples",
            e.channels, e.samplerate, e.samplesize, e.length
        );
        if e.is_embedded {
            println!("    embedded");
        }
        if let Some(uri) = &e.original_file_path {
            println!("    locator: {}", uri);
        }
        match &e.usable_file_path {
            Some(p) => println!("    found:   {}", p.display()),
            None if !e.is_embedded => println!("    found:   (missing)"),
            None => {}
        }
    }
    for e in &comp.video.essence_files {
        println!("[video] {} ({} @ {})", e.unique_name, e.length, e.framerate);
    }
}

fn cmd_extract(path: &str, out_dir: &Path, options: &Options) {
    let (file, mut comp) = open(path, options);
    if let Err(e) = std::fs::create_dir_all(out_dir) {
        fail(&format!("cannot create {}: {}", out_dir.display(), e));
    }

    let mut extracted = 0;
    for i in 0..comp.audio.essence_files.len() {
        if !comp.audio.essence_files[i].is_embedded {
            debug!("skipping external essence '{}'", comp.audio.essence_files[i].unique_name);
            continue;
        }
        match extract_audio_essence(&file, &mut comp, i, ExtractFormat::Default, out_dir) {
            Ok(p) => {
                println!("{}", p.display());
                extracted += 1;
            }
            Err(e) => eprintln!("Failed to extract '{}': {}", comp.audio.essence_files[i].unique_name, e),
        }
    }
    info!("Extracted {} essence files", extracted);
}

fn cmd_dump(path: &str, options: &Options) {
    info!("Opening file: {}", path);
    let file = match AafFile::open_opts(path, options.use_mmap) {
        Ok(f) => f,
        Err(e) => fail(&format!("failed to open {}: {}", path, e)),
    };
    print_object(&file, file.root(), None, 0);
}

fn print_object(file: &AafFile, id: ObjectId, via: Option<&str>, depth: usize) {
    let indent = "  ".repeat(depth);
    let obj = file.object(id);
    match via {
        Some(prop) => println!("{}{}: {}", indent, prop, file.class_name(id)),
        None => println!("{}{}", indent, file.class_name(id)),
    }

    for prop in &obj.properties {
        let name = file
            .dictionary()
            .property_name(prop.pid)
            .map_or_else(|| format!("0x{:04x}", prop.pid), str::to_string);
        match &prop.data {
            PropertyData::Raw(bytes) => println!("{}  {} [{:?}, {} bytes]", indent, name, prop.form, bytes.len()),
            PropertyData::Object(child) => print_object(file, *child, Some(&name), depth + 1),
            PropertyData::List(list) => {
                println!("{}  {} [{} items]", indent, name, list.items.len());
                for &child in &list.items {
                    print_object(file, child, None, depth + 2);
                }
            }
        }
    }
}

fn cmd_json(path: &str, options: &Options) {
    let (_file, comp) = open(path, options);
    match serde_json::to_string_pretty(&comp) {
        Ok(s) => println!("{}", s),
        Err(e) => fail(&format!("cannot serialize composition: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timecode_string() {
        assert_eq!(timecode_string(0, 25), "00:00:00:00");
        assert_eq!(timecode_string(90_000, 25), "01:00:00:00");
        assert_eq!(timecode_string(25 * 61 + 3, 25), "00:01:01:03");
    }

    #[test]
    fn test_seconds_zero_rate() {
        assert_eq!(seconds(100, Rational::new(0, 0)), 0.0);
        assert_eq!(seconds(96_000, Rational::new(48_000, 1)), 2.0);
    }
}
