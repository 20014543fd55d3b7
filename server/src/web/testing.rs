use crate::service::detector::{Detector, InferenceArgument};
use crate::service::service::ServiceState;
use crate::utils::config::Config;
use crate::utils::logging::*;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{test, App, Error};
use async_trait::async_trait;
use common::detection::bounding_box::BoundingBox;
use common::detection::detection_set::DetectionSet;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

const BOUNDARY: &str = "----fruitcountboundary";

pub struct FixedDetector {
    bounding_boxes: Vec<BoundingBox>,
}

impl FixedDetector {
    pub fn new(bounding_boxes: Vec<BoundingBox>) -> Self {
        Self { bounding_boxes }
    }
}

#[async_trait]
impl Detector for FixedDetector {
    async fn detect(&self, image_path: &Path, _inference_argument: &InferenceArgument) -> Result<DetectionSet, LogEntry> {
        assert!(image_path.is_file());
        Ok(DetectionSet::from(self.bounding_boxes.clone()))
    }
}

pub struct FailingDetector;

#[async_trait]
impl Detector for FailingDetector {
    async fn detect(&self, _image_path: &Path, _inference_argument: &InferenceArgument) -> Result<DetectionSet, LogEntry> {
        Err(error_entry!(DetectionEntry::ProcessExitError(1), "Traceback (most recent call last)"))
    }
}

/// Service state over a scratch upload folder.
pub struct TestContext {
    folder: TempDir,
    state: ServiceState,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_detector(FixedDetector::new(Vec::new()))
    }

    pub fn with_detector<D: Detector + 'static>(detector: D) -> Self {
        let folder = tempfile::tempdir().unwrap();
        let config = Config {
            upload_folder: folder.path().display().to_string(),
            ..Config::default()
        };
        let state = ServiceState::new(config, Arc::new(detector));
        Self { folder, state }
    }

    pub fn folder(&self) -> PathBuf {
        self.folder.path().to_path_buf()
    }

    pub async fn config(&self) -> Config {
        self.state.config.read().await.clone()
    }

    pub async fn update_config<F: FnOnce(&mut Config)>(&self, update: F) {
        update(&mut *self.state.config.write().await);
    }

    pub fn app(&self) -> App<impl ServiceFactory<ServiceRequest, Config = (), Response = ServiceResponse<impl MessageBody + use<>>, Error = Error, InitError = ()> + use<>> {
        App::new().configure(|service_config| self.state.configure(service_config))
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    RgbImage::new(width, height).write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

pub fn multipart_request(uri: &str, field_name: &str, file_name: &str, data: &[u8]) -> test::TestRequest {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{file_name}\"\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    test::TestRequest::post()
        .uri(uri)
        .insert_header((header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}")))
        .set_payload(body)
}
