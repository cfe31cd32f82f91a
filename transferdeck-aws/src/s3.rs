use std::time::Duration;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::{ByteStream, DateTime as AwsDateTime};
use chrono::{DateTime, Utc};
use tracing::*;
use transferdeck_common::{AwsConfig, Result, TransferdeckError};
use transferdeck_core::store::{
    CreateFolderRequest, FileStore, FolderSummary, ListChunk, ListQuery, PresignedUpload,
    RemoteObject, UploadRequest,
};

const FOLDER_CONTENT_TYPE: &str = "application/x-directory";

/// [`FileStore`] over an S3 bucket.
pub struct S3FileStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    presign_ttl: Duration,
    max_upload_size: u64,
}

impl S3FileStore {
    pub fn new(
        sdk_config: &SdkConfig,
        config: &AwsConfig,
        presign_ttl: Duration,
        max_upload_size: u64,
    ) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(sdk_config),
            bucket: config.bucket.clone(),
            presign_ttl,
            max_upload_size,
        }
    }

    fn presigning_config(&self) -> Result<PresigningConfig> {
        PresigningConfig::expires_in(self.presign_ttl).map_err(TransferdeckError::storage)
    }

    /// Walk every object under `prefix/` and aggregate size/count/mtime.
    /// Folder markers (keys ending in `/`) are not counted.
    async fn folder_stats(&self, prefix: &str) -> Result<(u64, u64, Option<DateTime<Utc>>)> {
        let mut total_size = 0u64;
        let mut object_count = 0u64;
        let mut last_modified: Option<DateTime<Utc>> = None;
        let mut continuation: Option<String> = None;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(format!("{prefix}/"))
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(TransferdeckError::storage)?;

            for object in response.contents() {
                let Some(key) = object.key() else { continue };
                if key.ends_with('/') {
                    continue;
                }
                total_size += object.size().unwrap_or(0).max(0) as u64;
                object_count += 1;
                if let Some(modified) = object.last_modified().and_then(to_chrono) {
                    if last_modified.map_or(true, |current| modified > current) {
                        last_modified = Some(modified);
                    }
                }
            }

            match response.next_continuation_token() {
                Some(token) => continuation = Some(token.to_owned()),
                None => break,
            }
        }

        Ok((total_size, object_count, last_modified))
    }
}

fn to_chrono(dt: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn list_folders(&self) -> Result<Vec<FolderSummary>> {
        debug!(bucket=%self.bucket, "Listing top-level folders");

        let response = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .delimiter("/")
            .send()
            .await
            .map_err(TransferdeckError::storage)?;

        let mut folders = vec![];
        for common_prefix in response.common_prefixes() {
            let Some(prefix) = common_prefix.prefix() else {
                continue;
            };
            let name = prefix.trim_end_matches('/').to_owned();
            let (total_size, object_count, last_modified) = self.folder_stats(&name).await?;
            folders.push(FolderSummary {
                name,
                prefix: prefix.to_owned(),
                total_size,
                object_count,
                last_modified,
            });
        }

        debug!(count = folders.len(), "Found folders");
        Ok(folders)
    }

    async fn list_objects(&self, query: ListQuery) -> Result<ListChunk> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .delimiter("/")
            .max_keys(query.effective_max_keys() as i32)
            .set_prefix(query.prefix.clone())
            .set_continuation_token(query.continuation.clone())
            .send()
            .await
            .map_err(TransferdeckError::storage)?;

        let mut objects = vec![];

        for common_prefix in response.common_prefixes() {
            if let Some(prefix) = common_prefix.prefix() {
                objects.push(RemoteObject::directory(prefix.to_owned()));
            }
        }

        for object in response.contents() {
            let Some(key) = object.key() else { continue };
            // Folder markers show up as their directory entry instead
            if key.ends_with('/') {
                continue;
            }
            objects.push(RemoteObject::file(
                key.to_owned(),
                object.size().unwrap_or(0).max(0) as u64,
                object.last_modified().and_then(to_chrono),
                object.storage_class().map(|c| c.as_str().to_owned()),
                object.e_tag().map(str::to_owned),
            ));
        }

        Ok(ListChunk {
            objects,
            has_more: response.is_truncated().unwrap_or(false),
            next_continuation: response.next_continuation_token().map(str::to_owned),
        })
    }

    async fn head_object(&self, key: &str) -> Result<Option<RemoteObject>> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(response) => Ok(Some(RemoteObject::file(
                key.to_owned(),
                response.content_length().unwrap_or(0).max(0) as u64,
                response.last_modified().and_then(to_chrono),
                response.storage_class().map(|c| c.as_str().to_owned()),
                response.e_tag().map(str::to_owned),
            ))),
            Err(error) => {
                let error = error.into_service_error();
                if error.is_not_found() {
                    return Ok(None);
                }
                Err(TransferdeckError::storage(error))
            }
        }
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        info!(%key, "Deleting object");
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(TransferdeckError::storage)?;
        Ok(())
    }

    async fn copy_object(&self, source: &str, destination: &str) -> Result<()> {
        info!(%source, %destination, "Copying object");
        self.client
            .copy_object()
            .bucket(&self.bucket)
            .copy_source(format!("{}/{}", self.bucket, source))
            .key(destination)
            .send()
            .await
            .map_err(TransferdeckError::storage)?;
        Ok(())
    }

    async fn create_folder(&self, request: &CreateFolderRequest) -> Result<()> {
        request.validate()?;
        let key = request.object_key();
        info!(%key, "Creating folder marker");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(FOLDER_CONTENT_TYPE)
            .body(ByteStream::from_static(b""))
            .send()
            .await
            .map_err(TransferdeckError::storage)?;
        Ok(())
    }

    async fn presign_upload(&self, request: &UploadRequest) -> Result<PresignedUpload> {
        request.validate(self.max_upload_size)?;
        let key = request.object_key();
        debug!(%key, "Presigning upload");

        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(&request.content_type)
            .content_length(request.file_size as i64)
            .presigned(self.presigning_config()?)
            .await
            .map_err(TransferdeckError::storage)?;

        Ok(PresignedUpload {
            url: presigned.uri().to_string(),
            key,
            method: presigned.method().to_string(),
            expires_in_secs: self.presign_ttl.as_secs(),
        })
    }

    async fn presign_download(&self, key: &str) -> Result<String> {
        debug!(%key, "Presigning download");
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(self.presigning_config()?)
            .await
            .map_err(TransferdeckError::storage)?;
        Ok(presigned.uri().to_string())
    }
}
