use crate::service::upload_store::UploadStore;
use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::utils::response::Rejection;
use actix_files::NamedFile;
use actix_web::{get, web, HttpRequest, HttpResponse, Scope};
use std::path::PathBuf;
use tokio::sync::RwLock;

pub fn initialize() -> Scope {
    web::scope("/uploads")
        .service(uploaded_file)
}

#[get("/{filename}")]
async fn uploaded_file(req: HttpRequest, filename: web::Path<String>, config: web::Data<RwLock<Config>>) -> HttpResponse {
    let filename = filename.into_inner();
    let folder = PathBuf::from(&config.read().await.upload_folder);
    let file_path = match UploadStore::resolve(&folder, &filename) {
        Ok(file_path) => file_path,
        Err(entry) => return Rejection::NotFound(entry).into_response().await,
    };
    match NamedFile::open_async(&file_path).await {
        Ok(named_file) => named_file
            .set_content_type(mime_guess::from_path(&file_path).first_or_octet_stream())
            .into_response(&req),
        Err(err) => Rejection::Internal(error_entry!(IOEntry::ReadFileError(file_path.display(), err))).into_response().await,
    }
}

#[cfg(test)]
mod tests {
    use crate::web::testing::TestContext;
    use actix_web::http::header;
    use actix_web::test;
    use serde_json::Value;

    #[actix_web::test]
    async fn serves_stored_file_with_image_type() {
        let context = TestContext::new();
        std::fs::write(context.folder().join("abc_detections.jpg"), b"\xff\xd8\xff").unwrap();
        let app = test::init_service(context.app()).await;
        let request = test::TestRequest::get().uri("/uploads/abc_detections.jpg").to_request();
        let response = test::call_service(&app, request).await;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "image/jpeg");
        assert_eq!(test::read_body(response).await.as_ref(), b"\xff\xd8\xff");
    }

    #[actix_web::test]
    async fn unknown_file_is_not_found() {
        let context = TestContext::new();
        let app = test::init_service(context.app()).await;
        let request = test::TestRequest::get().uri("/uploads/nothing.jpg").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), 404);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "File nothing.jpg not found");
    }
}
