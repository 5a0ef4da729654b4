//! Locator URI parsing.
//!
//! NetworkLocator URLs follow RFC 1738/3986 (`file:///C:/Media/take.wav`),
//! with a few quirks of real files: drive letters written `C|`, Windows
//! `//./` prefixes and unescaped `#`/`?` inside file names.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::util::{Error, Result};

/// Longest URI accepted.
pub const MAX_URI_LENGTH: usize = 64_000;

/// Kind of host named in the authority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HostKind {
    /// No host (`file:///path`, `file:/path`).
    #[default]
    None,
    Ipv4,
    Ipv6,
    /// Registered name, `localhost` included.
    RegName,
}

/// A parsed URI. Every component is percent-decoded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Uri {
    /// Lower-cased scheme.
    pub scheme: String,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub host: Option<String>,
    pub host_kind: HostKind,
    /// Host is empty, `localhost` or a loopback address.
    pub is_localhost: bool,
    pub port: Option<u16>,
    /// Path, drive letter first when there is one (`C:/Media/a.wav`).
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl Uri {
    pub fn parse(input: &str) -> Result<Self> {
        if input.len() >= MAX_URI_LENGTH {
            return Err(malformed("uri is too long"));
        }
        let mut uri = Uri::default();
        let mut rest = uri.parse_scheme(input)?;

        if let Some(after) = rest.strip_prefix("//") {
            let end = after
                .find(|c| c == '/' || (!uri.is_file() && (c == '?' || c == '#')))
                .unwrap_or(after.len());
            uri.parse_authority(&after[..end])?;
            rest = &after[end..];
        } else if uri.is_file() {
            uri.is_localhost = true;
        }

        rest = uri.parse_path(rest);

        if !uri.is_file() {
            if let Some(q) = rest.strip_prefix('?') {
                let end = q.find('#').unwrap_or(q.len());
                uri.query = Some(percent_decode(&q[..end]));
                rest = &q[end..];
            }
            if let Some(f) = rest.strip_prefix('#') {
                uri.fragment = Some(percent_decode(f));
            }
        }
        Ok(uri)
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        self.scheme == "file"
    }

    fn parse_scheme<'s>(&mut self, input: &'s str) -> Result<&'s str> {
        let Some((scheme, rest)) = input.split_once(':') else {
            return Err(malformed("uri is missing scheme"));
        };
        if scheme.is_empty() {
            return Err(malformed("uri is missing scheme"));
        }
        if let Some(c) = scheme.chars().find(|&c| !(c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))) {
            return Err(malformed(format!("uri scheme contains invalid character '{}'", c)));
        }
        self.scheme = scheme.to_ascii_lowercase();
        Ok(rest)
    }

    fn parse_authority(&mut self, authority: &str) -> Result<()> {
        if authority.is_empty() {
            self.is_localhost = true;
            return Ok(());
        }

        let hostport = match authority.split_once('@') {
            Some((userinfo, hostport)) => {
                let bad = userinfo.chars().filter(|&c| !is_userinfo_char(c)).count();
                if bad > 0 {
                    return Err(malformed(format!("uri userinfo contains {} invalid characters", bad)));
                }
                match userinfo.split_once(':') {
                    Some((user, pass)) => {
                        self.user = Some(percent_decode(user));
                        self.pass = Some(percent_decode(pass));
                    }
                    None => self.user = Some(percent_decode(userinfo)),
                }
                hostport
            }
            None => authority,
        };

        // Windows device prefixes: file://./C:/... and file://?/C:/...
        if hostport == "." || hostport == "?" {
            self.is_localhost = true;
            return Ok(());
        }

        let port = if let Some(v6) = hostport.strip_prefix('[') {
            let (host, after) = v6
                .split_once(']')
                .ok_or_else(|| malformed("unterminated IPv6 address"))?;
            let addr = Ipv6Addr::from_str(host).map_err(|e| malformed(format!("IPv6 address '{}': {}", host, e)))?;
            self.host = Some(host.to_string());
            self.host_kind = HostKind::Ipv6;
            self.is_localhost = addr.is_loopback();
            after.strip_prefix(':')
        } else {
            let (host, port) = match hostport.split_once(':') {
                Some((h, p)) => (h, Some(p)),
                None => (hostport, None),
            };
            let host = percent_decode(host);
            if host.is_empty() {
                self.is_localhost = true;
            } else if let Ok(addr) = Ipv4Addr::from_str(&host) {
                self.host_kind = HostKind::Ipv4;
                self.is_localhost = addr.is_loopback();
            } else {
                self.host_kind = HostKind::RegName;
                self.is_localhost = host.eq_ignore_ascii_case("localhost");
            }
            if !host.is_empty() {
                self.host = Some(host);
            }
            port
        };

        if let Some(port) = port.filter(|p| !p.is_empty()) {
            if let Some(c) = port.chars().find(|c| !c.is_ascii_digit()) {
                return Err(malformed(format!("uri port contains non-digit '{}'", c)));
            }
            self.port = Some(port.parse().map_err(|_| malformed(format!("uri port {} out of range", port)))?);
        }
        Ok(())
    }

    fn parse_path<'s>(&mut self, input: &'s str) -> &'s str {
        // extra leading slashes
        let mut path = input;
        while path.starts_with("//") {
            path = &path[1..];
        }
        if path.starts_with('/') && is_drive_letter(&path[1..]) {
            path = &path[1..];
        }

        let end = if self.is_file() {
            path.len()
        } else {
            path.find(|c| c == '?' || c == '#').unwrap_or(path.len())
        };

        let mut decoded = percent_decode(&path[..end]);
        if is_drive_letter(&decoded) && decoded.as_bytes()[1] == b'|' {
            decoded.replace_range(1..2, ":");
        }
        self.path = decoded;
        &path[end..]
    }
}

impl FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if self.host.is_some() || self.is_file() {
            f.write_str("//")?;
            if let Some(user) = &self.user {
                write!(f, "{}@", user)?;
            }
            match (&self.host, self.host_kind) {
                (Some(h), HostKind::Ipv6) => write!(f, "[{}]", h)?,
                (Some(h), _) => f.write_str(h)?,
                (None, _) => {}
            }
            if let Some(port) = self.port {
                write!(f, ":{}", port)?;
            }
            if is_drive_letter(&self.path) {
                f.write_str("/")?;
            }
        }
        f.write_str(&self.path)
    }
}

/// Decode `%XX` escapes. Invalid escapes are kept verbatim; the result is
/// read as UTF-8, lossily.
pub fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                out.push(h << 4 | l);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}

/// `C:/` or `C|/` at the start of `s`.
fn is_drive_letter(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 3 && b[0].is_ascii_alphabetic() && (b[1] == b':' || b[1] == b'|') && b[2] == b'/'
}

fn is_userinfo_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '%' | ';' | ':' | '&' | '=' | '+' | '$' | ',' | '-' | '.' | '_' | '~' | '!' | '*' | '\'' | '(' | ')')
}

fn malformed(msg: impl Into<String>) -> Error {
    Error::MalformedUri(msg.into())
}
