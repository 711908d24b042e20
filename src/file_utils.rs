use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::SubtitleError;
use crate::subtitle_processor::SubtitleFormat;

// @module: File discovery, decoding and writing

/// UTF-8 byte order mark
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read a subtitle file and decode it to text
    pub fn read_subtitle<P: AsRef<Path>>(path: P, encoding: Option<&str>) -> Result<String> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
        Ok(Self::decode_text(path, &bytes, encoding)?)
    }

    /// Decode subtitle bytes.
    ///
    /// A byte order mark (UTF-8, UTF-16LE, UTF-16BE) decides the encoding.
    /// Without one, the explicit label is used, and without a label the
    /// bytes must be valid UTF-8. Malformed input is an error, never
    /// replaced.
    pub fn decode_text(path: &Path, bytes: &[u8], encoding: Option<&str>) -> Result<String, SubtitleError> {
        let (encoding, payload) = match Encoding::for_bom(bytes) {
            Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
            None => {
                let encoding = match encoding {
                    Some(label) => Encoding::for_label(label.trim().as_bytes())
                        .ok_or_else(|| SubtitleError::UnknownEncoding(label.to_string()))?,
                    None => UTF_8,
                };
                (encoding, bytes)
            }
        };

        debug!("Decoding {:?} as {}", path, encoding.name());
        encoding
            .decode_without_bom_handling_and_without_replacement(payload)
            .map(|text| text.into_owned())
            .ok_or_else(|| SubtitleError::EncodingDecodeFailure {
                path: path.to_path_buf(),
                encoding: encoding.name().to_string(),
            })
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write subtitle text as UTF-8 with a byte order mark
    pub fn write_subtitle<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let mut bytes = Vec::with_capacity(UTF8_BOM.len() + content.len());
        bytes.extend_from_slice(UTF8_BOM);
        bytes.extend_from_slice(content.trim_start_matches('\u{feff}').as_bytes());

        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    /// Script path without its extension, as a string to append suffixes to
    fn script_base<P: AsRef<Path>>(script: P) -> String {
        script.as_ref().with_extension("").to_string_lossy().into_owned()
    }

    // @finds: First `<script stem>.<ext>` subtitle next to the script
    pub fn find_sibling_subtitle<P: AsRef<Path>>(script: P) -> Option<PathBuf> {
        let base = Self::script_base(script);
        SubtitleFormat::ALL
            .iter()
            .map(|format| PathBuf::from(format!("{}.{}", base, format.extension())))
            .find(|path| Self::file_exists(path))
    }

    // @finds: First `<script stem><suffix>` timecode file
    pub fn find_timecode_file<P: AsRef<Path>, S: AsRef<str>>(script: P, suffixes: &[S]) -> Option<PathBuf> {
        let base = Self::script_base(script);
        suffixes
            .iter()
            .map(|suffix| PathBuf::from(format!("{}{}", base, suffix.as_ref())))
            .find(|path| Self::file_exists(path))
    }

    // @generates: `<stem>.cut.<ext>` next to the input
    pub fn default_output_path<P: AsRef<Path>>(input: P) -> PathBuf {
        let input = input.as_ref();
        let stem = input.with_extension("").to_string_lossy().into_owned();
        match input.extension() {
            Some(ext) => PathBuf::from(format!("{}.cut.{}", stem, ext.to_string_lossy())),
            None => PathBuf::from(format!("{}.cut", stem)),
        }
    }

    // @generates: Output timecode path
    // @params: timecodes (input timecode file, if any), script
    pub fn default_timecode_output<P: AsRef<Path>>(timecodes: Option<&Path>, script: P) -> PathBuf {
        match timecodes {
            Some(timecodes) => {
                // `movie.tc.txt` -> `movie.otc.txt`
                let base = timecodes.with_extension("").with_extension("");
                let base = base.to_string_lossy();
                match timecodes.extension() {
                    Some(ext) => PathBuf::from(format!("{}.otc.{}", base, ext.to_string_lossy())),
                    None => PathBuf::from(format!("{}.otc", base)),
                }
            }
            None => PathBuf::from(format!("{}.otc.txt", Self::script_base(script))),
        }
    }
}
