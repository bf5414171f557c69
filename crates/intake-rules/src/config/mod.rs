//! Typed configuration for photo-upload, slider and rating questions.
//!
//! Each `parse` reads a stored JSON object field by field: a field that is
//! absent, `null` or of the wrong type takes its default without discarding
//! its neighbours.

pub mod photo;
pub mod rating;
pub mod slider;

pub use photo::{PhotoType, PhotoUploadConfig, Resolution, default_photo_types};
pub use rating::{RatingConfig, default_rating_labels};
pub use slider::SliderConfig;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

pub(crate) fn field<T: DeserializeOwned>(raw: &Value, key: &str) -> Option<T> {
    let value = raw.get(key).filter(|value| !value.is_null())?;
    match T::deserialize(value) {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            debug!(field = key, %error, "ignoring malformed config field");
            None
        }
    }
}
