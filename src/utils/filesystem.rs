use crate::utils::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const MEDIA_EXTENSIONS: &[&str] = &[
    ".mkv", ".mp4", ".m4v", ".mov", ".avi", ".webm", ".ts", ".m2ts", ".wmv", ".mka", ".m4a",
];

/// Expands `path` into the media files it names: the file itself, or every
/// media file below a directory, sorted.
pub fn find_media_files<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Error::validation(format!(
            "Path does not exist: {}",
            path.display()
        )));
    }

    let mut media_files = Vec::new();

    if path.is_file() {
        if is_media_file(path) {
            media_files.push(path.to_path_buf());
        } else {
            return Err(Error::validation(format!(
                "File is not a supported media format: {}",
                path.display()
            )));
        }
    } else if path.is_dir() {
        for entry in WalkDir::new(path).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if is_media_file(entry.path()) {
                media_files.push(entry.into_path());
            } else {
                debug!("Skipping non-media file: {}", entry.path().display());
            }
        }

        if media_files.is_empty() {
            return Err(Error::validation(format!(
                "No supported media files found in directory: {}",
                path.display()
            )));
        }

        media_files.sort();
    }

    Ok(media_files)
}

pub fn is_media_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .is_some_and(|ext| MEDIA_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_media_file() {
        assert!(is_media_file("movie.mkv"));
        assert!(is_media_file("MOVIE.MP4"));
        assert!(is_media_file("music.m4a"));
        assert!(!is_media_file("notes.txt"));
        assert!(!is_media_file("no_extension"));
    }

    #[test]
    fn test_find_media_files_in_directory() {
        let temp_dir = TempDir::new().unwrap();
        let season = temp_dir.path().join("Season 1");
        fs::create_dir(&season).unwrap();
        fs::write(season.join("b.mkv"), b"").unwrap();
        fs::write(temp_dir.path().join("a.mp4"), b"").unwrap();
        fs::write(temp_dir.path().join("cover.jpg"), b"").unwrap();

        let files = find_media_files(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| is_media_file(f)));
        assert!(!files.iter().any(|f| f.ends_with("cover.jpg")));
        assert!(files.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_find_media_files_errors() {
        let temp_dir = TempDir::new().unwrap();
        assert!(find_media_files(temp_dir.path()).is_err());
        assert!(find_media_files(temp_dir.path().join("missing.mkv")).is_err());

        let text = temp_dir.path().join("readme.txt");
        fs::write(&text, b"").unwrap();
        assert!(find_media_files(&text).is_err());
    }
}
