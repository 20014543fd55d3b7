use crate::service::upload_store::UploadStore;
use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::utils::response::Rejection;
use actix_web::{get, post, web, HttpResponse, Responder, Scope};
use std::path::Path;
use tokio::sync::RwLock;

pub fn initialize() -> Scope {
    web::scope("/config")
        .service(get_config)
        .service(update_config)
}

#[get("/get")]
async fn get_config(config: web::Data<RwLock<Config>>) -> impl Responder {
    HttpResponse::Ok().json(&*config.read().await)
}

#[post("/update")]
async fn update_config(config: web::Data<RwLock<Config>>, new_config: web::Json<Config>) -> impl Responder {
    let new_config = new_config.into_inner();
    if !Config::validate(&new_config) {
        return Rejection::BadRequest(warning_entry!(RequestEntry::InvalidConfig)).into_response().await;
    }
    if let Err(entry) = UploadStore::prepare(Path::new(&new_config.upload_folder)).await {
        return Rejection::Internal(entry).into_response().await;
    }
    *config.write().await = new_config;
    logging_information!(SystemEntry::ConfigUpdated);
    HttpResponse::Ok().finish()
}
