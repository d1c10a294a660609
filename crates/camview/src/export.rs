//! Export sink: file naming and on-disk delivery of captured frames.
//!
//! All exported file names derive from the panel title with whitespace runs
//! collapsed to underscores, timestamped with unix milliseconds. Archives are
//! produced when the `archive` feature is enabled; otherwise frames are
//! written as individual files with a short gap between writes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use camview_core::{CamviewError, Result};

/// Writes exports into a target directory.
#[derive(Debug, Clone)]
pub struct ExportSink {
    dir: PathBuf,
}

impl ExportSink {
    /// Creates a sink writing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Changes the target directory.
    pub fn set_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dir = dir.into();
    }

    /// Writes one file into the sink directory, creating it if needed.
    pub fn write_file(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        std::fs::write(&path, bytes)?;
        log::info!("exported {}", path.display());
        Ok(path)
    }

    /// Writes frames as individual files, pausing between writes.
    ///
    /// The pause mirrors the delivery gap the original sequential download
    /// path used so downstream watchers see files arrive one at a time.
    pub fn write_files_sequential(
        &self,
        files: &[(String, Vec<u8>)],
        gap: Duration,
    ) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(files.len());
        for (i, (name, bytes)) in files.iter().enumerate() {
            if i > 0 && !gap.is_zero() {
                std::thread::sleep(gap);
            }
            paths.push(self.write_file(name, bytes)?);
        }
        Ok(paths)
    }

    /// Packages frames into a zip archive and writes it as one file.
    #[cfg(feature = "archive")]
    pub fn write_zip(&self, archive_name: &str, entries: &[(String, Vec<u8>)]) -> Result<PathBuf> {
        use std::io::Write;

        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options: zip::write::SimpleFileOptions = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);
            for (name, bytes) in entries {
                writer
                    .start_file(name, options)
                    .map_err(|e| CamviewError::ExportError(format!("zip entry {name}: {e}")))?;
                writer.write_all(bytes)?;
            }
            writer
                .finish()
                .map_err(|e| CamviewError::ExportError(format!("zip finish: {e}")))?;
        }
        self.write_file(archive_name, &cursor.into_inner())
    }
}

impl Default for ExportSink {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Collapses each run of whitespace in a title to a single underscore.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out
}

/// Current unix timestamp in milliseconds.
#[must_use]
pub fn timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// `<title>_<timestamp>.png`
#[must_use]
pub fn single_frame_name(title: &str, timestamp: i64) -> String {
    format!("{}_{timestamp}.png", sanitize_title(title))
}

/// `<title>_NNNN.png` with the index zero-padded to 4 digits.
#[must_use]
pub fn numbered_frame_name(title: &str, index: usize) -> String {
    format!("{}_{index:04}.png", sanitize_title(title))
}

/// `<title>_sequence_<timestamp>.zip`
#[must_use]
pub fn sequence_archive_name(title: &str, timestamp: i64) -> String {
    format!("{}_sequence_{timestamp}.zip", sanitize_title(title))
}

/// `<title>_recording_<timestamp>.zip`
#[must_use]
pub fn recording_archive_name(title: &str, timestamp: i64) -> String {
    format!("{}_recording_{timestamp}.zip", sanitize_title(title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sanitize_collapses_whitespace_runs() {
        assert_eq!(sanitize_title("Main Camera"), "Main_Camera");
        assert_eq!(sanitize_title("a  \t b"), "a_b");
        assert_eq!(sanitize_title("plain"), "plain");
        assert_eq!(sanitize_title(""), "");
    }

    #[test]
    fn file_names_follow_conventions() {
        assert_eq!(single_frame_name("Cam 1", 17), "Cam_1_17.png");
        assert_eq!(numbered_frame_name("Cam", 3), "Cam_0003.png");
        assert_eq!(numbered_frame_name("Cam", 12345), "Cam_12345.png");
        assert_eq!(sequence_archive_name("Cam", 9), "Cam_sequence_9.zip");
        assert_eq!(recording_archive_name("Cam", 9), "Cam_recording_9.zip");
    }

    #[test]
    fn write_files_sequential_writes_all() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ExportSink::new(dir.path());
        let files = vec![
            ("a_0000.png".to_string(), vec![1u8]),
            ("a_0001.png".to_string(), vec![2u8]),
        ];
        let paths = sink
            .write_files_sequential(&files, Duration::ZERO)
            .unwrap();
        assert_eq!(paths.len(), 2);
        for path in &paths {
            assert!(path.exists());
        }
    }

    #[cfg(feature = "archive")]
    #[test]
    fn write_zip_contains_all_entries() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ExportSink::new(dir.path());
        let entries = vec![
            ("f_0000.png".to_string(), vec![0u8; 16]),
            ("f_0001.png".to_string(), vec![1u8; 16]),
            ("f_0002.png".to_string(), vec![2u8; 16]),
        ];
        let path = sink.write_zip("f_sequence_1.zip", &entries).unwrap();

        let file = std::fs::File::open(path).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        assert_eq!(archive.len(), 3);
    }

    proptest! {
        #[test]
        fn sanitized_titles_never_contain_whitespace(title in ".*") {
            let sanitized = sanitize_title(&title);
            prop_assert!(!sanitized.chars().any(char::is_whitespace));
        }

        #[test]
        fn sanitize_preserves_non_whitespace(title in "[a-zA-Z0-9_]*") {
            prop_assert_eq!(sanitize_title(&title), title);
        }
    }
}
