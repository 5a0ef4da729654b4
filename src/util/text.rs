//! Text helpers: UTF-16 decoding and file name handling.

use std::path::Path;

/// Decode little-endian UTF-16 bytes, stopping at the first NUL.
///
/// Unpaired surrogates are replaced; a trailing odd byte is ignored.
pub fn utf16le_to_string(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .take_while(|&u| u != 0)
        .collect();
    String::from_utf16_lossy(&units)
}

/// True when `bytes` holds UTF-16 code units ending with a NUL unit.
pub fn is_utf16_nul_terminated(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes.len() % 2 == 0 && bytes[bytes.len() - 2..] == [0, 0]
}

/// Encode a string as NUL-terminated little-endian UTF-16.
pub fn string_to_utf16le(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity((s.len() + 1) * 2);
    for u in s.encode_utf16().chain(std::iter::once(0)) {
        out.extend_from_slice(&u.to_le_bytes());
    }
    out
}

/// Make a string safe to use as a single file name on any platform.
///
/// Path separators, reserved characters and control characters become `_`,
/// trailing dots and spaces are dropped.
pub fn clean_filename(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    while out.ends_with('.') || out.ends_with(' ') {
        out.pop();
    }

    if out.is_empty() {
        out.push('_');
    }
    out
}

/// Case-insensitive extension check.
pub fn has_extension(path: impl AsRef<Path>, ext: &str) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_roundtrip_stops_at_nul() {
        let mut bytes = string_to_utf16le("Audio 1");
        bytes.extend_from_slice(&[b'x', 0]);
        assert_eq!(utf16le_to_string(&bytes), "Audio 1");
        assert!(is_utf16_nul_terminated(&string_to_utf16le("a")));
        assert!(!is_utf16_nul_terminated(&[b'a', 0]));
    }

    #[test]
    fn test_clean_filename() {
        assert_eq!(clean_filename("a/b\\c:d*e?f\"g<h>i|j"), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(clean_filename("take\t1 . "), "take_1");
        assert_eq!(clean_filename("..."), "_");
        assert_eq!(clean_filename("Fondu 1.wav"), "Fondu 1.wav");
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("/tmp/A.WAV", "wav"));
        assert!(has_extension("x.aifc", "AIFC"));
        assert!(!has_extension("noext", "wav"));
    }
}
