use async_trait::async_trait;
use chrono::{DateTime, Utc};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use transferdeck_common::{Result, TransferdeckError};

pub const MAX_LIST_KEYS: usize = 1000;

/// A single S3 object (or directory placeholder) as shown in the file
/// browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Object)]
pub struct RemoteObject {
    pub key: String,
    pub name: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub storage_class: String,
    pub etag: Option<String>,
    pub is_folder: bool,
    pub extension: Option<String>,
}

impl RemoteObject {
    pub fn file(
        key: String,
        size: u64,
        last_modified: Option<DateTime<Utc>>,
        storage_class: Option<String>,
        etag: Option<String>,
    ) -> Self {
        let name = object_name(&key).to_owned();
        let extension = extension_of(&name);
        Self {
            key,
            name,
            size,
            last_modified,
            storage_class: storage_class.unwrap_or_else(|| "STANDARD".into()),
            etag,
            is_folder: false,
            extension,
        }
    }

    /// A common-prefix entry from a delimited listing.
    pub fn directory(prefix: String) -> Self {
        let name = object_name(prefix.trim_end_matches('/')).to_owned();
        Self {
            key: prefix,
            name,
            size: 0,
            last_modified: None,
            storage_class: "DIRECTORY".into(),
            etag: None,
            is_folder: true,
            extension: None,
        }
    }
}

fn object_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Aggregate statistics for a top-level folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Object)]
pub struct FolderSummary {
    pub name: String,
    pub prefix: String,
    pub total_size: u64,
    pub object_count: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub prefix: Option<String>,
    pub max_keys: Option<usize>,
    pub continuation: Option<String>,
}

impl ListQuery {
    /// Effective page size, clamped into `1..=MAX_LIST_KEYS`.
    pub fn effective_max_keys(&self) -> usize {
        self.max_keys.unwrap_or(MAX_LIST_KEYS).clamp(1, MAX_LIST_KEYS)
    }
}

/// Normalize a raw listing prefix into the folder that must be authorized
/// and the slash-terminated prefix to list with. The terminator keeps a
/// listing of `users/alice` from raw-prefix matching sibling keys such as
/// `users/alice-archive/...`; the bucket root stays an absent prefix.
pub fn normalize_prefix(raw: Option<&str>) -> (String, Option<String>) {
    let folder = raw.unwrap_or("").trim_matches('/').to_owned();
    let prefix = (!folder.is_empty()).then(|| format!("{folder}/"));
    (folder, prefix)
}

#[derive(Debug, Clone, Serialize, Deserialize, Object)]
pub struct ListChunk {
    pub objects: Vec<RemoteObject>,
    pub has_more: bool,
    pub next_continuation: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Object)]
pub struct UploadRequest {
    pub file_name: String,
    pub file_size: u64,
    pub content_type: String,
    pub folder: Option<String>,
}

impl UploadRequest {
    pub fn validate(&self, max_size: u64) -> Result<()> {
        if self.file_name.trim().is_empty() {
            return Err(TransferdeckError::InvalidRequest(
                "file name is required".into(),
            ));
        }
        if self.file_name.contains('/') || self.file_name.contains("..") {
            return Err(TransferdeckError::InvalidRequest(
                "invalid file name".into(),
            ));
        }
        if self.file_size == 0 {
            return Err(TransferdeckError::InvalidRequest(
                "file size must be greater than 0".into(),
            ));
        }
        if self.file_size > max_size {
            return Err(TransferdeckError::InvalidRequest(format!(
                "file size exceeds maximum allowed size of {max_size} bytes"
            )));
        }
        if self.content_type.is_empty() {
            return Err(TransferdeckError::InvalidRequest(
                "content type is required".into(),
            ));
        }
        Ok(())
    }

    pub fn object_key(&self) -> String {
        match &self.folder {
            Some(folder) => format!("{}/{}", folder.trim_matches('/'), self.file_name),
            None => self.file_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Object)]
pub struct CreateFolderRequest {
    pub folder_name: String,
    pub parent: Option<String>,
}

impl CreateFolderRequest {
    pub fn validate(&self) -> Result<()> {
        if self.folder_name.trim().is_empty() {
            return Err(TransferdeckError::InvalidRequest(
                "folder name is required".into(),
            ));
        }
        if !self
            .folder_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TransferdeckError::InvalidRequest(
                "folder name can only contain letters, numbers, hyphens, and underscores".into(),
            ));
        }
        Ok(())
    }

    /// Marker key for the new folder, always slash-terminated.
    pub fn object_key(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{}/{}/", parent.trim_matches('/'), self.folder_name),
            None => format!("{}/", self.folder_name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Object)]
pub struct PresignedUpload {
    pub url: String,
    pub key: String,
    pub method: String,
    pub expires_in_secs: u64,
}

/// Seam to the object storage service backing the transfer server. The
/// production implementation talks to S3; callers must run folder
/// authorization before invoking anything here.
#[async_trait]
pub trait FileStore {
    /// Top-level folders with aggregate stats.
    async fn list_folders(&self) -> Result<Vec<FolderSummary>>;

    /// One page of a delimited listing under `query.prefix`.
    async fn list_objects(&self, query: ListQuery) -> Result<ListChunk>;

    async fn head_object(&self, key: &str) -> Result<Option<RemoteObject>>;

    async fn delete_object(&self, key: &str) -> Result<()>;

    async fn copy_object(&self, source: &str, destination: &str) -> Result<()>;

    /// Move = copy + delete; storage offers no rename.
    async fn move_object(&self, source: &str, destination: &str) -> Result<()> {
        self.copy_object(source, destination).await?;
        self.delete_object(source).await
    }

    async fn create_folder(&self, request: &CreateFolderRequest) -> Result<()>;

    async fn presign_upload(&self, request: &UploadRequest) -> Result<PresignedUpload>;

    async fn presign_download(&self, key: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_validation_rejects_traversal_and_size() {
        let mut request = UploadRequest {
            file_name: "report.pdf".into(),
            file_size: 100,
            content_type: "application/pdf".into(),
            folder: Some("shared".into()),
        };
        assert!(request.validate(1000).is_ok());

        request.file_name = "../etc/passwd".into();
        assert!(request.validate(1000).is_err());

        request.file_name = "a/b.txt".into();
        assert!(request.validate(1000).is_err());

        request.file_name = "big.bin".into();
        request.file_size = 2000;
        assert!(request.validate(1000).is_err());

        request.file_size = 0;
        assert!(request.validate(1000).is_err());
    }

    #[test]
    fn upload_key_joins_folder_and_name() {
        let request = UploadRequest {
            file_name: "q3.csv".into(),
            file_size: 1,
            content_type: "text/csv".into(),
            folder: Some("/shared/reports/".into()),
        };
        assert_eq!(request.object_key(), "shared/reports/q3.csv");

        let bare = UploadRequest {
            folder: None,
            ..request
        };
        assert_eq!(bare.object_key(), "q3.csv");
    }

    #[test]
    fn folder_names_are_restricted() {
        let mut request = CreateFolderRequest {
            folder_name: "project_1-final".into(),
            parent: Some("users/alice".into()),
        };
        assert!(request.validate().is_ok());
        assert_eq!(request.object_key(), "users/alice/project_1-final/");

        for bad in ["", "a/b", "..", "a b", "naïve"] {
            request.folder_name = bad.into();
            assert!(request.validate().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn listing_prefixes_are_slash_terminated() {
        assert_eq!(
            normalize_prefix(Some("users/alice")),
            ("users/alice".into(), Some("users/alice/".into()))
        );
        assert_eq!(
            normalize_prefix(Some("/shared/reports/")),
            ("shared/reports".into(), Some("shared/reports/".into()))
        );
        assert_eq!(normalize_prefix(Some("")), (String::new(), None));
        assert_eq!(normalize_prefix(None), (String::new(), None));
    }

    #[test]
    fn sibling_folder_keys_do_not_match_the_listing_prefix() {
        let (_, prefix) = normalize_prefix(Some("users/alice"));
        let prefix = prefix.unwrap();
        assert!("users/alice/report.pdf".starts_with(&prefix));
        assert!(!"users/alice-archive/report.pdf".starts_with(&prefix));
        assert!(!"users/alice2/report.pdf".starts_with(&prefix));
    }

    #[test]
    fn list_query_clamps_page_size() {
        assert_eq!(ListQuery::default().effective_max_keys(), MAX_LIST_KEYS);
        let query = ListQuery {
            max_keys: Some(5000),
            ..Default::default()
        };
        assert_eq!(query.effective_max_keys(), MAX_LIST_KEYS);
        let query = ListQuery {
            max_keys: Some(0),
            ..Default::default()
        };
        assert_eq!(query.effective_max_keys(), 1);
    }

    #[test]
    fn object_metadata_is_derived_from_the_key() {
        let file = RemoteObject::file("users/alice/Report.PDF".into(), 10, None, None, None);
        assert_eq!(file.name, "Report.PDF");
        assert_eq!(file.extension.as_deref(), Some("pdf"));
        assert!(!file.is_folder);

        let noext = RemoteObject::file("users/alice/README".into(), 1, None, None, None);
        assert_eq!(noext.extension, None);

        let dir = RemoteObject::directory("users/alice/projects/".into());
        assert_eq!(dir.name, "projects");
        assert!(dir.is_folder);
        assert_eq!(dir.storage_class, "DIRECTORY");
    }
}
