//! External essence lookup.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::uri::Uri;
use crate::util::Result;

/// Find the file a locator URI points to.
///
/// Candidates, first existing wins:
/// 1. `search_location/<file>`
/// 2. `search_location/<parent>/<file>`
/// 3. the URI itself as a local path
/// 4. the decoded URI path
/// 5. `<aaf dir>/<file>`
/// 6. `<aaf dir>/<parent>/<file>`
///
/// `Ok(None)` when nothing exists; an unparsable URI is an error.
pub fn locate_external_essence_file(
    uri: &str,
    search_location: Option<&Path>,
    aaf_path: Option<&Path>,
) -> Result<Option<PathBuf>> {
    let found = locate_with(uri, search_location, aaf_path, |p| p.is_file())?;
    Ok(found.map(|p| std::fs::canonicalize(&p).unwrap_or(p)))
}

/// [`locate_external_essence_file`] with a custom existence check.
pub fn locate_with(
    uri: &str,
    search_location: Option<&Path>,
    aaf_path: Option<&Path>,
    exists: impl Fn(&Path) -> bool,
) -> Result<Option<PathBuf>> {
    let found = candidates(uri, search_location, aaf_path)?.into_iter().find(|c| {
        debug!("trying {}", c.display());
        exists(c)
    });
    match &found {
        Some(p) => debug!("essence found at {}", p.display()),
        None => debug!("essence '{}' not found", uri),
    }
    Ok(found)
}

/// Every path tried for `uri`, in search order.
pub fn candidates(uri: &str, search_location: Option<&Path>, aaf_path: Option<&Path>) -> Result<Vec<PathBuf>> {
    let parsed = Uri::parse(uri)?;
    debug!("locator {} -> host {:?} path {}", uri, parsed.host, parsed.path);

    let (file_name, relative) = relative_parts(&parsed.path);
    let mut out = Vec::with_capacity(6);

    if let Some(dir) = search_location {
        out.push(dir.join(file_name));
        out.push(dir.join(relative));
    }
    out.push(PathBuf::from(uri));
    out.push(PathBuf::from(&parsed.path));
    if let Some(dir) = aaf_path.and_then(Path::parent) {
        out.push(dir.join(file_name));
        out.push(dir.join(relative));
    }
    Ok(out)
}

/// `(file, parent/file)` out of a `/`-separated path. With no parent
/// directory both are the file name.
fn relative_parts(path: &str) -> (&str, &str) {
    let path = path.trim_end_matches('/');
    let Some(last) = path.rfind('/') else {
        return (path, path);
    };
    let file = &path[last + 1..];
    let relative = match path[..last].rfind('/') {
        Some(prev) => &path[prev + 1..],
        None => path,
    };
    (file, relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const URI: &str = "file:///C:/Users/user/Desktop/AudioFiles/essence%20one.wav";

    #[test]
    fn test_relative_parts() {
        assert_eq!(relative_parts("C:/a/b/c.wav"), ("c.wav", "b/c.wav"));
        assert_eq!(relative_parts("b/c.wav"), ("c.wav", "b/c.wav"));
        assert_eq!(relative_parts("c.wav"), ("c.wav", "c.wav"));
    }

    #[test]
    fn test_search_order() {
        let tried = RefCell::new(Vec::new());
        let found = locate_with(URI, Some(Path::new("/media")), Some(Path::new("/projects/mix.aaf")), |p| {
            tried.borrow_mut().push(p.to_path_buf());
            false
        })
        .unwrap();

        assert_eq!(found, None);
        let tried = tried.into_inner();
        assert_eq!(
            tried,
            vec![
                PathBuf::from("/media/essence one.wav"),
                PathBuf::from("/media/AudioFiles/essence one.wav"),
                PathBuf::from(URI),
                PathBuf::from("C:/Users/user/Desktop/AudioFiles/essence one.wav"),
                PathBuf::from("/projects/essence one.wav"),
                PathBuf::from("/projects/AudioFiles/essence one.wav"),
            ]
        );
    }

    #[test]
    fn test_first_hit_wins() {
        let hits = [PathBuf::from("/projects/AudioFiles/essence one.wav"), PathBuf::from("/projects/essence one.wav")];
        let found = locate_with(URI, None, Some(Path::new("/projects/mix.aaf")), |p| hits.iter().any(|h| h == p)).unwrap();
        assert_eq!(found, Some(PathBuf::from("/projects/essence one.wav")));
    }

    #[test]
    fn test_real_file_in_search_location() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("AudioFiles")).unwrap();
        let media = dir.path().join("AudioFiles").join("essence one.wav");
        std::fs::write(&media, b"RIFF").unwrap();

        let found = locate_external_essence_file(URI, Some(dir.path()), None).unwrap();
        assert_eq!(found, Some(std::fs::canonicalize(&media).unwrap()));
    }

    #[test]
    fn test_bad_uri_is_error() {
        assert!(locate_with("not a uri", None, None, |_| true).is_err());
    }
}
