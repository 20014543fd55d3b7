use crate::service::annotator::{AnnotationStyle, Annotator};
use crate::service::detector::{Detector, InferenceArgument};
use crate::service::upload_store::UploadStore;
use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::utils::response::Rejection;
use actix_multipart::{Field, Multipart};
use actix_web::{post, web, HttpResponse, Scope};
use futures::{StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use uuid::Uuid;

pub fn initialize() -> Scope {
    web::scope("/detect")
        .service(detect)
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct DetectResponse {
    pub estimated_apples: usize,
    pub detection_image: String,
}

#[post("")]
async fn detect(payload: Multipart, config: web::Data<RwLock<Config>>, detector: web::Data<dyn Detector>) -> HttpResponse {
    let config = config.read().await.clone();
    match run_detection(payload, &config, detector.get_ref()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(rejection) => rejection.into_response().await,
    }
}

async fn run_detection(payload: Multipart, config: &Config, detector: &dyn Detector) -> Result<DetectResponse, Rejection> {
    let id = Uuid::new_v4();
    let folder = PathBuf::from(&config.upload_folder);
    let image_path = save_upload(payload, &folder, id).await?;
    let result = detect_upload(&image_path, &folder, id, config, detector).await;
    if result.is_err() {
        discard_upload(&image_path).await;
    }
    result
}

async fn detect_upload(image_path: &Path, folder: &Path, id: Uuid, config: &Config, detector: &dyn Detector) -> Result<DetectResponse, Rejection> {
    let image = Annotator::load(image_path.to_path_buf()).await
        .map_err(Rejection::BadRequest)?;
    let detections = detector.detect(image_path, &InferenceArgument::from(config)).await
        .map_err(Rejection::Internal)?;
    let estimated_apples = config.count_strategy.estimate(&detections);
    let image_name = image_path.file_name().map(|name| name.to_string_lossy().to_string()).unwrap_or_default();
    logging_information!(DetectionEntry::DetectionComplete(image_name, detections.len(), config.count_strategy, estimated_apples));
    let annotated_file_name = UploadStore::annotated_file_name(id);
    Annotator::render(image, detections, AnnotationStyle::from(config), folder.join(&annotated_file_name)).await
        .map_err(Rejection::Internal)?;
    Ok(DetectResponse {
        estimated_apples,
        detection_image: UploadStore::public_path(&annotated_file_name),
    })
}

async fn discard_upload(image_path: &Path) {
    if let Err(err) = fs::remove_file(image_path).await {
        logging_entry!(warning_entry!(IOEntry::RemoveFileError(image_path.display(), err)));
    }
}

/// Stores the `file` field of the upload and returns where it landed. Other fields are skipped.
async fn save_upload(mut payload: Multipart, folder: &Path, id: Uuid) -> Result<PathBuf, Rejection> {
    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(Rejection::BadRequest(warning_entry!(RequestEntry::NoFileUploaded))),
            Err(err) => return Err(Rejection::BadRequest(warning_entry!(RequestEntry::InvalidPayload(err.to_string())))),
        };
        if field.name() != Some("file") {
            continue;
        }
        let file_name = match field.content_disposition().and_then(|content_disposition| content_disposition.get_filename()) {
            Some(file_name) if !file_name.is_empty() => file_name.to_string(),
            _ => return Err(Rejection::BadRequest(warning_entry!(RequestEntry::NoFileUploaded))),
        };
        let file_path = UploadStore::upload_path(folder, id, &file_name)
            .map_err(Rejection::BadRequest)?;
        if let Err(rejection) = create_file(&file_path, &mut field).await {
            discard_upload(&file_path).await;
            return Err(rejection);
        }
        return Ok(file_path);
    }
}

async fn create_file(file_path: &Path, field: &mut Field) -> Result<(), Rejection> {
    let mut file = File::create(file_path).await
        .map_err(|err| Rejection::Internal(error_entry!(IOEntry::CreateFileError(file_path.display(), err))))?;
    while let Some(chunk) = field.next().await {
        let data = chunk
            .map_err(|err| Rejection::BadRequest(warning_entry!(RequestEntry::InvalidPayload(err.to_string()))))?;
        file.write_all(&data).await
            .map_err(|err| Rejection::Internal(error_entry!(IOEntry::WriteFileError(file_path.display(), err))))?;
    }
    file.flush().await
        .map_err(|err| Rejection::Internal(error_entry!(IOEntry::WriteFileError(file_path.display(), err))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::testing::{multipart_request, png_bytes, FailingDetector, FixedDetector, TestContext};
    use actix_web::test;
    use common::detection::bounding_box::BoundingBox;
    use common::detection::count_estimator::CountStrategy;
    use serde_json::Value;

    fn folder_is_empty(context: &TestContext) -> bool {
        std::fs::read_dir(context.folder()).unwrap().next().is_none()
    }

    fn three_boxes() -> Vec<BoundingBox> {
        vec![
            BoundingBox::new(2, 2, 12, 12),
            BoundingBox::new(20, 2, 30, 12),
            BoundingBox::new(2, 20, 22, 30),
        ]
    }

    #[actix_web::test]
    async fn detect_returns_estimate_and_served_image() {
        let context = TestContext::with_detector(FixedDetector::new(three_boxes()));
        let app = test::init_service(context.app()).await;
        let request = multipart_request("/detect", "file", "orchard.png", &png_bytes(40, 40)).to_request();
        let response: DetectResponse = test::call_and_read_body_json(&app, request).await;
        assert_eq!(response.estimated_apples, 3);
        assert!(response.detection_image.starts_with("/uploads/"));
        assert!(response.detection_image.ends_with("_detections.jpg"));

        let request = test::TestRequest::get().uri(&response.detection_image).to_request();
        let served = test::call_service(&app, request).await;
        assert!(served.status().is_success());
        let bytes = test::read_body(served).await;
        let annotated = image::load_from_memory(&bytes).unwrap();
        assert_eq!((annotated.width(), annotated.height()), (40, 40));
    }

    #[actix_web::test]
    async fn detect_follows_configured_strategy() {
        let boxes = vec![BoundingBox::new(0, 0, 0, 5), BoundingBox::new(3, 3, 3, 9)];
        let context = TestContext::with_detector(FixedDetector::new(boxes));
        context.update_config(|config| config.count_strategy = CountStrategy::Raw).await;
        let app = test::init_service(context.app()).await;
        let request = multipart_request("/detect", "file", "crate.jpg", &png_bytes(16, 16)).to_request();
        let response = test::call_service(&app, request).await;
        // a PNG payload under a .jpg name still decodes, format is sniffed from content
        assert!(response.status().is_success());
        let body: DetectResponse = test::read_body_json(response).await;
        assert_eq!(body.estimated_apples, 2);
    }

    #[actix_web::test]
    async fn no_detections_counts_zero() {
        let context = TestContext::with_detector(FixedDetector::new(Vec::new()));
        let app = test::init_service(context.app()).await;
        let request = multipart_request("/detect", "file", "empty.png", &png_bytes(8, 8)).to_request();
        let response: DetectResponse = test::call_and_read_body_json(&app, request).await;
        assert_eq!(response.estimated_apples, 0);
    }

    #[actix_web::test]
    async fn missing_file_field_is_bad_request() {
        let context = TestContext::new();
        let app = test::init_service(context.app()).await;
        let request = multipart_request("/detect", "picture", "orchard.png", &png_bytes(8, 8)).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 400);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "No file uploaded");
    }

    #[actix_web::test]
    async fn non_multipart_request_is_bad_request() {
        let context = TestContext::new();
        let app = test::init_service(context.app()).await;
        let request = test::TestRequest::post().uri("/detect").set_payload("plain").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 400);
    }

    #[actix_web::test]
    async fn unsupported_extension_is_bad_request() {
        let context = TestContext::new();
        let app = test::init_service(context.app()).await;
        let request = multipart_request("/detect", "file", "notes.txt", b"hello").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 400);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "Unsupported file type: notes.txt");
    }

    #[actix_web::test]
    async fn undecodable_image_is_bad_request() {
        let context = TestContext::with_detector(FixedDetector::new(three_boxes()));
        let app = test::init_service(context.app()).await;
        let request = multipart_request("/detect", "file", "broken.jpg", b"not really a jpeg").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 400);
        assert!(folder_is_empty(&context));
    }

    #[actix_web::test]
    async fn detector_failure_is_internal_error() {
        let context = TestContext::with_detector(FailingDetector);
        let app = test::init_service(context.app()).await;
        let request = multipart_request("/detect", "file", "orchard.png", &png_bytes(8, 8)).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 500);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "Detector process exit with code: 1");
        assert!(folder_is_empty(&context));
    }
}
