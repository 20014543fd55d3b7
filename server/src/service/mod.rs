pub mod annotator;
pub mod average_weight;
pub mod detector;
pub mod service;
pub mod upload_store;
