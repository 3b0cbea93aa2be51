use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod float_ext;
pub mod log_setup;
pub mod test_utils;

pub const EPSILON: f64 = 1e-6;

#[derive(Debug, thiserror::Error)]
pub enum FileExtensionError {
    #[error("Failed to get file extension")]
    MissingFileExtension,
    #[error("Unsupported file extension for file: {0}")]
    UnsupportedFileExtension(String),
}

pub type FileFormatResult<T> = Result<T, FileExtensionError>;

#[derive(Debug, thiserror::Error)]
pub enum SerdeFormatError {
    #[error("YAML serialization failed")]
    Yaml(#[from] serde_yml::Error),
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
}

pub type SerdeFormatResult<T> = Result<T, SerdeFormatError>;

pub fn get_file_extension(filename: &str) -> Option<&str> {
    Path::new(filename)
        .extension()
        .and_then(|os_str| os_str.to_str())
}

/// Text formats accepted for job and diagnostics files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    pub fn from_file_name(file_name: &str) -> FileFormatResult<Self> {
        let extension = get_file_extension(file_name)
            .map(|ext| ext.to_ascii_lowercase())
            .ok_or(FileExtensionError::MissingFileExtension)?;

        match extension.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(FileExtensionError::UnsupportedFileExtension(
                file_name.to_string(),
            )),
        }
    }
}

/// Serializes `value` and guarantees a single trailing newline.
pub fn serialize<T: Serialize>(value: &T, format: FileFormat) -> SerdeFormatResult<String> {
    let mut text = match format {
        FileFormat::Yaml => serde_yml::to_string(value)?,
        FileFormat::Json => serde_json::to_string_pretty(value)?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

pub fn deserialize<T: DeserializeOwned>(
    serialized: &str,
    format: FileFormat,
) -> SerdeFormatResult<T> {
    match format {
        FileFormat::Yaml => Ok(serde_yml::from_str(serialized)?),
        FileFormat::Json => Ok(serde_json::from_str(serialized)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Job {
        name: String,
        points: Vec<[f64; 3]>,
    }

    fn sample() -> Job {
        Job {
            name: "c2".to_string(),
            points: vec![[1.0, 2.0, 3.0], [-4.5, 0.0, 7.25]],
        }
    }

    #[test]
    fn file_format_from_extension() {
        assert_eq!(FileFormat::from_file_name("job.yaml").unwrap(), FileFormat::Yaml);
        assert_eq!(FileFormat::from_file_name("job.YML").unwrap(), FileFormat::Yaml);
        assert_eq!(FileFormat::from_file_name("dir/job.json").unwrap(), FileFormat::Json);
    }

    #[test]
    fn file_format_rejects_unknown_and_missing_extension() {
        assert!(matches!(
            FileFormat::from_file_name("job"),
            Err(FileExtensionError::MissingFileExtension)
        ));
        assert!(matches!(
            FileFormat::from_file_name("job.toml"),
            Err(FileExtensionError::UnsupportedFileExtension(name)) if name == "job.toml"
        ));
    }

    #[test]
    fn yaml_and_json_round_trip() {
        for format in [FileFormat::Yaml, FileFormat::Json] {
            let text = serialize(&sample(), format).unwrap();
            assert!(text.ends_with('\n'));
            let back: Job = deserialize(&text, format).unwrap();
            assert_eq!(back, sample());
        }
    }

    #[test]
    fn deserialize_reports_format_specific_error() {
        let err = deserialize::<Job>("{ not json", FileFormat::Json).unwrap_err();
        assert!(matches!(err, SerdeFormatError::Json(_)));
    }
}
