use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::field;
use crate::envelope::Versioned;

/// 5 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
pub const DEFAULT_ALLOWED_FORMATS: [&str; 3] = ["jpg", "jpeg", "png"];
pub const DEFAULT_COMPRESSION_QUALITY: f64 = 0.8;

/// A photo the patient is asked to upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Photo-upload question configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PhotoUploadConfig {
    pub types: Vec<PhotoType>,
    pub max_file_size: u64,
    pub allowed_formats: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_resolution: Option<Resolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_resolution: Option<Resolution>,
    pub compression_quality: f64,
}

impl Default for PhotoUploadConfig {
    fn default() -> Self {
        Self {
            types: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_formats: default_allowed_formats(),
            min_resolution: None,
            max_resolution: None,
            compression_quality: DEFAULT_COMPRESSION_QUALITY,
        }
    }
}

impl PhotoUploadConfig {
    pub fn parse(raw: &Value) -> Self {
        Self {
            types: field(raw, "types").unwrap_or_default(),
            max_file_size: field(raw, "maxFileSize").unwrap_or(DEFAULT_MAX_FILE_SIZE),
            allowed_formats: field(raw, "allowedFormats").unwrap_or_else(default_allowed_formats),
            min_resolution: field(raw, "minResolution"),
            max_resolution: field(raw, "maxResolution"),
            compression_quality: field(raw, "compressionQuality")
                .unwrap_or(DEFAULT_COMPRESSION_QUALITY),
        }
    }

    pub fn wrap(&self) -> Versioned<PhotoUploadConfig> {
        Versioned::new(self.clone())
    }

    /// Case-insensitive check of a file extension against `allowed_formats`.
    pub fn accepts_format(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.');
        self.allowed_formats
            .iter()
            .any(|format| format.eq_ignore_ascii_case(extension))
    }

    pub fn required_types(&self) -> impl Iterator<Item = &PhotoType> {
        self.types.iter().filter(|photo| photo.required)
    }
}

fn default_allowed_formats() -> Vec<String> {
    DEFAULT_ALLOWED_FORMATS.map(String::from).to_vec()
}

fn photo_type(id: &str, name: &str, description: &str, required: bool, instructions: &str) -> PhotoType {
    PhotoType {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        required,
        example_image: None,
        instructions: Some(instructions.to_string()),
    }
}

/// Standard set of dental photos offered when authoring a photo question.
pub fn default_photo_types() -> Vec<PhotoType> {
    vec![
        photo_type(
            "front_smile",
            "Front Smile",
            "Full smile facing the camera",
            true,
            "Face the camera and smile naturally so all front teeth are visible.",
        ),
        photo_type(
            "left_profile",
            "Left Profile",
            "Smile photographed from the left side",
            false,
            "Turn your head to the right and smile, keeping the camera level.",
        ),
        photo_type(
            "right_profile",
            "Right Profile",
            "Smile photographed from the right side",
            false,
            "Turn your head to the left and smile, keeping the camera level.",
        ),
        photo_type(
            "upper_teeth",
            "Upper Teeth",
            "Biting surfaces of the upper teeth",
            true,
            "Tilt your head back and open wide; a mirror helps capture the whole arch.",
        ),
        photo_type(
            "lower_teeth",
            "Lower Teeth",
            "Biting surfaces of the lower teeth",
            true,
            "Tilt your head forward and open wide to show the lower arch.",
        ),
        photo_type(
            "bite_view",
            "Bite View",
            "Teeth closed together, lips apart",
            false,
            "Close your teeth together and pull your lips back with your fingers.",
        ),
    ]
}
