use crate::utils::logging::*;
use sanitize_filename::sanitize;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "webp"];

/// Where uploads and annotated results live on disk.
pub struct UploadStore;

impl UploadStore {
    pub async fn prepare(folder: &Path) -> Result<(), LogEntry> {
        fs::create_dir_all(folder).await
            .map_err(|err| critical_entry!(IOEntry::CreateDirectoryError(folder.display(), err)))
    }

    /// Destination of an uploaded image: `<folder>/<id>_<sanitized name>`.
    pub fn upload_path(folder: &Path, id: Uuid, file_name: &str) -> Result<PathBuf, LogEntry> {
        let sanitized_file_name = sanitize(file_name);
        if sanitized_file_name.is_empty() {
            return Err(warning_entry!(RequestEntry::InvalidFileName));
        }
        let extension = Path::new(&sanitized_file_name).extension()
            .and_then(|os_str| os_str.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(warning_entry!(RequestEntry::UnsupportedFileType(sanitized_file_name)));
        }
        Ok(folder.join(format!("{id}_{sanitized_file_name}")))
    }

    pub fn annotated_file_name(id: Uuid) -> String {
        format!("{id}_detections.jpg")
    }

    /// Looks up a stored file by the name handed out to clients.
    pub fn resolve(folder: &Path, file_name: &str) -> Result<PathBuf, LogEntry> {
        let sanitized_file_name = sanitize(file_name);
        if sanitized_file_name.is_empty() || sanitized_file_name != file_name {
            return Err(warning_entry!(RequestEntry::InvalidFileName));
        }
        let path = folder.join(sanitized_file_name);
        if !path.is_file() {
            return Err(warning_entry!(RequestEntry::FileNotFound(file_name.to_string())));
        }
        Ok(path)
    }

    pub fn public_path(file_name: &str) -> String {
        format!("/uploads/{file_name}")
    }
}
