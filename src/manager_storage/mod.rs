use std::fs;
use std::io::Write;
use std::path::PathBuf;
use log::info;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tempfile::NamedTempFile;
use thiserror::Error;
use crate::config::{LocalParameters, S3Parameters, Storage};

/// A durable store where each put replaces the whole object at a key
pub trait ObjectStore {
    /// Writes content under the given key, overwriting any existing object.
    /// A failed put leaves no partial object behind.
    ///
    /// # Arguments
    ///
    /// * 'key' - object key, '/' separated
    /// * 'content' - the complete object content
    /// * 'content_type' - MIME type of the content
    fn put(&self, key: &str, content: &[u8], content_type: &str) -> Result<(), StorageError>;

    /// Human readable location of a key, used for logging
    fn location(&self, key: &str) -> String;
}

/// Builds the object store selected in the configuration
///
/// # Arguments
///
/// * 'config' - storage configuration
pub fn from_config(config: &Storage) -> Result<Box<dyn ObjectStore>, StorageError> {
    match config {
        Storage::S3(s3) => Ok(Box::new(S3Store::new(s3)?)),
        Storage::Local(local) => Ok(Box::new(LocalStore::new(local))),
    }
}

/// Object store backed by an S3 (or S3 compatible) bucket
pub struct S3Store {
    bucket: Box<Bucket>,
}

impl S3Store {
    /// Returns a new S3Store for the configured bucket
    ///
    /// # Arguments
    ///
    /// * 'config' - S3 configuration parameters
    pub fn new(config: &S3Parameters) -> Result<S3Store, StorageError> {
        let credentials = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) =>
                Credentials::new(Some(access_key.as_str()), Some(secret_key.as_str()), None, None, None),
            _ => Credentials::default(),
        }.map_err(|e| StorageError::SetupError(format!("credentials: {}", e)))?;

        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom { region: config.region.clone(), endpoint: endpoint.clone() },
            None => config.region.parse::<Region>()
                .map_err(|e| StorageError::SetupError(format!("region {}: {}", config.region, e)))?,
        };

        let bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::SetupError(format!("bucket {}: {}", config.bucket, e)))?;

        // Custom endpoints (MinIO and friends) mostly don't do virtual hosted buckets
        let bucket = if config.endpoint.is_some() { bucket.with_path_style() } else { bucket };

        Ok(S3Store { bucket })
    }
}

impl ObjectStore for S3Store {
    fn put(&self, key: &str, content: &[u8], content_type: &str) -> Result<(), StorageError> {
        let response = self.bucket
            .put_object_with_content_type(key, content, content_type)
            .map_err(|e| StorageError::WriteError(format!("s3 put {}: {}", key, e)))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            // the sync client does not hand back the error document of a rejected put
            return Err(StorageError::StatusError(status, key.to_string()));
        }

        info!("put {} bytes to {}", content.len(), self.location(key));
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket.name(), key)
    }
}

/// Object store backed by a directory on a local filesystem
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Returns a new LocalStore rooted at the configured directory
    pub fn new(config: &LocalParameters) -> LocalStore {
        LocalStore { root: PathBuf::from(&config.root) }
    }
}

impl ObjectStore for LocalStore {
    fn put(&self, key: &str, content: &[u8], _content_type: &str) -> Result<(), StorageError> {
        if key.split('/').any(|p| p == ".." || p.is_empty()) {
            return Err(StorageError::KeyError(key.to_string()));
        }

        let path = self.root.join(key);
        let dir = path.parent()
            .ok_or(StorageError::KeyError(key.to_string()))?;
        fs::create_dir_all(dir)?;

        // Write next to the target and rename into place, so readers never see a partial file
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)
            .map_err(|e| StorageError::IoError(e.error))?;

        info!("put {} bytes to {}", content.len(), self.location(key));
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        self.root.join(key).display().to_string()
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SetupError: {0}")]
    SetupError(String),
    #[error("WriteError: {0}")]
    WriteError(String),
    #[error("StatusError: status {0} writing {1}")]
    StatusError(u16, String),
    #[error("KeyError: invalid key {0:?}")]
    KeyError(String),
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),
}
