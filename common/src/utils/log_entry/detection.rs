use crate::detection::count_estimator::CountStrategy;
use serde_json::error::Error as SerdeJsonError;
use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectionEntry {
    #[error("Failed to start detector process: {0}")]
    SpawnError(IoError),
    #[error("Detector process exit with code: {0}")]
    ProcessExitError(i32),
    #[error("Failed to parse detector output: {0}")]
    ParseOutputError(SerdeJsonError),
    #[error("Failed to decode image {0}: {1}")]
    DecodeImageError(String, String),
    #[error("Failed to save annotated image {0}: {1}")]
    SaveImageError(String, String),
    #[error("Image {0}: {1} boxes detected, {2} estimate {3}")]
    DetectionComplete(String, usize, CountStrategy, usize),
}

impl From<DetectionEntry> for String {
    #[inline(always)]
    fn from(value: DetectionEntry) -> Self {
        value.to_string()
    }
}
