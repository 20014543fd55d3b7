pub mod bounding_box;
pub mod count_estimator;
pub mod detection_set;
