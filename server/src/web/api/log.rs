use crate::utils::logging::*;
use crate::web::utils::response::Rejection;
use actix_web::{get, web, HttpResponse, Responder, Scope};
use chrono::{DateTime, Local};

pub fn initialize() -> Scope {
    web::scope("/log")
        .service(system_log)
        .service(system_log_since)
}

#[get("/system_log")]
async fn system_log() -> impl Responder {
    let system_log = Logger::get_system_logs().await
        .into_iter().map(|log| log.to_plain_string()).collect::<Vec<String>>();
    HttpResponse::Ok().json(system_log)
}

#[get("/system_log/since/{since}")]
async fn system_log_since(since: web::Path<String>) -> impl Responder {
    match parse_datetime(&since.into_inner()) {
        Some(since_time) => {
            let logs = Logger::get_system_logs_since(since_time).await
                .into_iter().map(|log| log.to_plain_string()).collect::<Vec<String>>();
            HttpResponse::Ok().json(logs)
        }
        None => Rejection::BadRequest(warning_entry!(RequestEntry::InvalidDatetime)).into_response().await,
    }
}

fn parse_datetime(datetime_str: &str) -> Option<DateTime<Local>> {
    DateTime::parse_from_rfc3339(datetime_str)
        .ok()
        .map(|date_time| date_time.with_timezone(&Local))
}
