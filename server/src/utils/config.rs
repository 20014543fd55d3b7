use crate::utils::logging::*;
use common::detection::count_estimator::CountStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ConfigTable {
    #[serde(rename = "Config")]
    config: Config,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub http_server_bind_port: u16, //port
    pub bind_retry_duration: u64, //seconds
    pub upload_folder: String, //path
    pub python_path: String, //path
    pub detector_script: String, //path
    pub model_path: String, //path
    pub image_size: usize, //pixels
    pub confidence: f32, //0..=1
    pub count_strategy: CountStrategy,
    pub default_average_weight: f64, //grams
    pub border_width: u32, //pixels
    pub border_color: [u8; 3], //RGB
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_server_bind_port: 5000,
            bind_retry_duration: 5,
            upload_folder: "uploads".to_string(),
            python_path: "python3".to_string(),
            detector_script: "script/detect.py".to_string(),
            model_path: "model/best.pt".to_string(),
            image_size: 640,
            confidence: 0.25,
            count_strategy: CountStrategy::Stacking,
            default_average_weight: 150.0,
            border_width: 2,
            border_color: [0, 255, 0],
        }
    }
}

impl Config {
    pub fn new() -> Self {
        //Seriously, the program must be terminated.
        match Self::load("./server.toml") {
            Ok(config) => config,
            Err(entry) => {
                logging_console!(entry);
                panic!("Unable to load configuration file");
            }
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LogEntry> {
        let path = path.as_ref();
        let toml_string = fs::read_to_string(path)
            .map_err(|err| emergency_entry!(SystemEntry::ConfigNotFound, IOEntry::ReadFileError(path.display(), err)))?;
        Self::parse(&toml_string)
    }

    pub fn parse(toml_string: &str) -> Result<Self, LogEntry> {
        let config = toml::from_str::<ConfigTable>(toml_string)
            .map_err(|err| emergency_entry!(SystemEntry::ConfigParseError(err.message().to_string()), IOEntry::TomlDeserializeError(err)))?
            .config;
        if !Self::validate(&config) {
            return Err(emergency_entry!(SystemEntry::InvalidConfig));
        }
        Ok(config)
    }

    pub fn validate(config: &Config) -> bool {
        Config::validate_second(config.bind_retry_duration)
            && Config::validate_path(&config.upload_folder)
            && Config::validate_path(&config.python_path)
            && Config::validate_path(&config.detector_script)
            && Config::validate_path(&config.model_path)
            && Config::validate_image_size(config.image_size)
            && Config::validate_confidence(config.confidence)
            && Config::validate_border_width(config.border_width)
    }

    fn validate_second(second: u64) -> bool {
        second <= 3600
    }

    fn validate_path(path: &str) -> bool {
        !path.trim().is_empty()
    }

    fn validate_image_size(size: usize) -> bool {
        size > 0 && size % 32 == 0
    }

    fn validate_confidence(confidence: f32) -> bool {
        (0.0..=1.0).contains(&confidence)
    }

    fn validate_border_width(width: u32) -> bool {
        width > 0_u32
    }
}
