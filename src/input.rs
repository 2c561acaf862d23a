//! Validation of user-supplied input. Everything here runs before any request
//! reaches the backend.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

/// Extensions offered for analysis, with whether each is on by default.
pub const KNOWN_FILE_TYPES: [(&str, bool); 6] = [
    ("py", true),
    ("java", true),
    ("cpp", false),
    ("js", false),
    ("txt", false),
    ("docx", true),
];

pub const DEFAULT_THRESHOLD: u8 = 70;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("please enter both texts to compare")]
    MissingText,
    #[error("please enter an assignment name")]
    MissingAssignmentName,
    #[error("submission archive {0} does not exist")]
    MissingFile(PathBuf),
    #[error("submission archive {0} is empty")]
    EmptyFile(PathBuf),
    #[error("only .zip archives can be uploaded, got {0}")]
    NotZip(PathBuf),
    #[error("unsupported file type .{0}; choose from py, java, cpp, js, txt, docx")]
    UnsupportedFileType(String),
    #[error("similarity threshold must be between 0 and 100, got {0}")]
    ThresholdOutOfRange(u32),
}

#[derive(Debug, Clone, Serialize)]
pub struct TextPair {
    pub text_a: String,
    pub text_b: String,
}

impl TextPair {
    /// Both texts must contain something other than whitespace. The texts are
    /// sent as typed.
    pub fn new(text_a: String, text_b: String) -> Result<Self, InputError> {
        if text_a.trim().is_empty() || text_b.trim().is_empty() {
            return Err(InputError::MissingText);
        }
        Ok(Self { text_a, text_b })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DetectionMode {
    Code,
    Text,
    #[default]
    Both,
}

impl DetectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMode::Code => "code",
            DetectionMode::Text => "text",
            DetectionMode::Both => "both",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub archive: PathBuf,
    pub assignment_name: String,
    pub threshold: u8,
    pub file_types: BTreeMap<String, bool>,
    pub detection_mode: DetectionMode,
}

impl UploadRequest {
    pub fn new(
        archive: &Path,
        assignment_name: &str,
        threshold: u32,
        file_types: &[String],
        detection_mode: DetectionMode,
    ) -> Result<Self, InputError> {
        check_archive(archive)?;

        if assignment_name.trim().is_empty() {
            return Err(InputError::MissingAssignmentName);
        }

        let threshold =
            u8::try_from(threshold).map_err(|_| InputError::ThresholdOutOfRange(threshold))?;
        if threshold > 100 {
            return Err(InputError::ThresholdOutOfRange(u32::from(threshold)));
        }

        Ok(Self {
            archive: archive.to_path_buf(),
            assignment_name: assignment_name.to_string(),
            threshold,
            file_types: file_type_selection(file_types)?,
            detection_mode,
        })
    }

    pub fn archive_name(&self) -> String {
        self.archive
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "submissions.zip".to_string())
    }
}

fn check_archive(path: &Path) -> Result<(), InputError> {
    let is_zip = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);
    if !is_zip {
        return Err(InputError::NotZip(path.to_path_buf()));
    }

    let metadata =
        std::fs::metadata(path).map_err(|_| InputError::MissingFile(path.to_path_buf()))?;
    if !metadata.is_file() {
        return Err(InputError::MissingFile(path.to_path_buf()));
    }
    if metadata.len() == 0 {
        return Err(InputError::EmptyFile(path.to_path_buf()));
    }
    Ok(())
}

/// Extension -> enabled map sent as the `fileTypes` form field. An empty
/// selection keeps the defaults.
pub fn file_type_selection(selected: &[String]) -> Result<BTreeMap<String, bool>, InputError> {
    if selected.is_empty() {
        return Ok(KNOWN_FILE_TYPES
            .iter()
            .map(|(ext, enabled)| (ext.to_string(), *enabled))
            .collect());
    }

    let mut selection: BTreeMap<String, bool> = KNOWN_FILE_TYPES
        .iter()
        .map(|(ext, _)| (ext.to_string(), false))
        .collect();

    for raw in selected {
        let ext = raw.trim().trim_start_matches('.').to_lowercase();
        match selection.get_mut(&ext) {
            Some(enabled) => *enabled = true,
            None => return Err(InputError::UnsupportedFileType(ext)),
        }
    }

    Ok(selection)
}
