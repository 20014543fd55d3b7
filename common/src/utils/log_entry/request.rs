use thiserror::Error;

#[derive(Error, Debug)]
pub enum RequestEntry {
    #[error("No file uploaded")]
    NoFileUploaded,
    #[error("Invalid filename")]
    InvalidFileName,
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
    #[error("File {0} not found")]
    FileNotFound(String),
    #[error("Invalid datetime format")]
    InvalidDatetime,
    #[error("Invalid configuration")]
    InvalidConfig,
    #[error("Average weight set to {0} grams")]
    AverageWeightUpdated(f64),
}

impl From<RequestEntry> for String {
    #[inline(always)]
    fn from(value: RequestEntry) -> Self {
        value.to_string()
    }
}
