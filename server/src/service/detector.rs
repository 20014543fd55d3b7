use crate::utils::config::Config;
use crate::utils::logging::*;
use async_trait::async_trait;
use common::detection::bounding_box::BoundingBox;
use common::detection::detection_set::DetectionSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command as AsyncCommand;

#[derive(Debug, Clone, PartialEq)]
pub struct InferenceArgument {
    pub model_path: PathBuf,
    pub image_size: usize,
    pub confidence: f32,
}

impl From<&Config> for InferenceArgument {
    fn from(config: &Config) -> Self {
        Self {
            model_path: PathBuf::from(&config.model_path),
            image_size: config.image_size,
            confidence: config.confidence,
        }
    }
}

#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, image_path: &Path, inference_argument: &InferenceArgument) -> Result<DetectionSet, LogEntry>;
}

/// Runs an Ultralytics YOLO model through a Python child process.
///
/// The script receives `<model> <image> <imgsz> <conf>` and prints a JSON array of
/// `{"x1", "y1", "x2", "y2", "confidence"}` objects on stdout. Only the corners are kept.
///
/// Every call starts a fresh interpreter and reloads the weights, so each request pays the
/// model load latency on top of inference.
pub struct UltralyticsDetector {
    python: String,
    script: PathBuf,
}

#[derive(Deserialize)]
struct RawDetection {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl UltralyticsDetector {
    pub fn new<T: Into<String>, P: Into<PathBuf>>(python: T, script: P) -> Self {
        Self {
            python: python.into(),
            script: script.into(),
        }
    }

    pub fn parse_output(stdout: &[u8]) -> Result<DetectionSet, LogEntry> {
        let raw_detections = serde_json::from_slice::<Vec<RawDetection>>(stdout)
            .map_err(|err| error_entry!(DetectionEntry::ParseOutputError(err)))?;
        let detections = raw_detections.into_iter()
            .map(|raw| BoundingBox::from_corners(raw.x1, raw.y1, raw.x2, raw.y2))
            .collect();
        Ok(detections)
    }
}

#[async_trait]
impl Detector for UltralyticsDetector {
    async fn detect(&self, image_path: &Path, inference_argument: &InferenceArgument) -> Result<DetectionSet, LogEntry> {
        let output = AsyncCommand::new(&self.python)
            .arg(&self.script)
            .arg(&inference_argument.model_path)
            .arg(image_path)
            .arg(inference_argument.image_size.to_string())
            .arg(inference_argument.confidence.to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| error_entry!(DetectionEntry::SpawnError(err)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(error_entry!(DetectionEntry::ProcessExitError(output.status.code().unwrap_or(-1)), stderr));
        }
        Self::parse_output(&output.stdout)
    }
}
