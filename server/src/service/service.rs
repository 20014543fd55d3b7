use crate::service::average_weight::AverageWeight;
use crate::service::detector::{Detector, UltralyticsDetector};
use crate::service::upload_store::UploadStore;
use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::api::{average_weight, config, detect, log, uploads};
use crate::web::utils::response::json_config;
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::sleep;

/// Everything a request handler can reach.
#[derive(Clone)]
pub struct ServiceState {
    pub config: web::Data<RwLock<Config>>,
    pub average_weight: web::Data<AverageWeight>,
    pub detector: web::Data<dyn Detector>,
}

impl ServiceState {
    pub fn new(config: Config, detector: Arc<dyn Detector>) -> Self {
        Self {
            average_weight: web::Data::new(AverageWeight::new(config.default_average_weight)),
            config: web::Data::new(RwLock::new(config)),
            detector: web::Data::from(detector),
        }
    }

    pub fn configure(&self, service_config: &mut web::ServiceConfig) {
        service_config
            .app_data(self.config.clone())
            .app_data(self.average_weight.clone())
            .app_data(self.detector.clone())
            .app_data(json_config())
            .service(detect::initialize())
            .service(average_weight::initialize())
            .service(uploads::initialize())
            .service(config::initialize())
            .service(log::initialize());
    }
}

pub struct Service;

impl Service {
    pub async fn run() {
        logging_information!(SystemEntry::Initializing);
        let config = Config::new();
        if let Err(entry) = UploadStore::prepare(Path::new(&config.upload_folder)).await {
            logging_entry!(entry);
        }
        let detector = Arc::new(UltralyticsDetector::new(&config.python_path, &config.detector_script));
        let state = ServiceState::new(config, detector);
        let http_server = loop {
            let config = state.config.read().await.clone();
            let state = state.clone();
            let http_server = HttpServer::new(move || {
                let cors = Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600);
                App::new()
                    .wrap(cors)
                    .configure(|service_config| state.configure(service_config))
            })
            .bind(format!("0.0.0.0:{}", config.http_server_bind_port));
            match http_server {
                Ok(http_server) => {
                    logging_information!(NetworkEntry::Listening(format!("0.0.0.0:{}", config.http_server_bind_port)));
                    break http_server;
                }
                Err(err) => {
                    logging_critical!(NetworkEntry::BindPortError(err));
                    sleep(Duration::from_secs(config.bind_retry_duration)).await;
                    continue;
                }
            }
        };
        logging_information!(SystemEntry::WebReady);
        logging_information!(SystemEntry::InitializeComplete);
        logging_information!(SystemEntry::Online);
        if let Err(err) = http_server.run().await {
            logging_emergency!(SystemEntry::WebPanic(err));
        }
    }

    pub async fn terminate() {
        logging_information!(SystemEntry::Terminating);
        logging_information!(SystemEntry::TerminateComplete);
    }
}
