use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// @module: File and directory utilities

const UTF8_BOM: char = '\u{feff}';

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Default output path, `<stem>_translated.<ext>` next to the input
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P) -> PathBuf {
        let input_file = input_file.as_ref();

        let stem = input_file.file_stem().unwrap_or_default();
        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str("_translated");
        if let Some(ext) = input_file.extension() {
            output_filename.push('.');
            output_filename.push_str(&ext.to_string_lossy());
        }

        input_file.with_file_name(output_filename)
    }

    /// Read a UTF-8 file to a string, dropping a leading byte order mark
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> io::Result<String> {
        let content = fs::read_to_string(path)?;
        Ok(match content.strip_prefix(UTF8_BOM) {
            Some(stripped) => stripped.to_string(),
            None => content,
        })
    }

    /// Write a string to a file atomically
    ///
    /// The content goes to a temporary file in the target directory which is
    /// then renamed over the target, so readers never observe a partial file.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::ensure_dir(&parent)?;

        let mut temp = NamedTempFile::new_in(&parent)?;
        temp.write_all(content.as_bytes())?;
        temp.flush()?;
        temp.persist(path).map_err(|e| e.error)?;

        Ok(())
    }
}
