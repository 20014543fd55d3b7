use crate::service::average_weight::AverageWeight;
use crate::utils::logging::*;
use actix_web::{get, post, web, HttpResponse, Responder, Scope};
use serde::{Deserialize, Serialize};

pub fn initialize() -> Scope {
    web::scope("/average-weight")
        .service(get_average_weight)
        .service(update_average_weight)
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AverageWeightBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_weight: Option<f64>,
}

#[get("")]
async fn get_average_weight(average_weight: web::Data<AverageWeight>) -> impl Responder {
    let grams = average_weight.get().await;
    HttpResponse::Ok().json(AverageWeightBody { average_weight: Some(grams) })
}

#[post("")]
async fn update_average_weight(average_weight: web::Data<AverageWeight>, body: web::Json<AverageWeightBody>) -> impl Responder {
    if let Some(grams) = body.into_inner().average_weight {
        average_weight.set(grams).await;
        logging_information!(RequestEntry::AverageWeightUpdated(grams));
    }
    let grams = average_weight.get().await;
    HttpResponse::Ok().json(AverageWeightBody { average_weight: Some(grams) })
}
