use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod s3;

/// Failure categories of the object store. `NotFound` is a distinct
/// category so callers never have to guess whether an object was absent
/// or the transfer itself broke.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("transfer failed: {0}")]
    Transfer(String),
}

/// Object storage as seen by the export pipeline: existence checks,
/// single-object fetch, single-object upload. The bucket is passed per
/// call because every request names its own buckets.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StorageError>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

#[cfg(test)]
pub mod testing {
    use super::{ObjectStore, StorageError};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// In-memory store that records every fetch and upload for assertions.
    #[derive(Default)]
    pub struct MockStore {
        buckets: Mutex<HashSet<String>>,
        objects: Mutex<HashMap<String, Bytes>>,
        fetch_log: Mutex<Vec<String>>,
        uploads: Mutex<Vec<(String, String)>>,
    }

    impl MockStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_bucket(bucket: &str) -> Self {
            let store = Self::default();
            store.add_bucket(bucket);
            store
        }

        pub fn add_bucket(&self, bucket: &str) {
            self.buckets.lock().unwrap().insert(bucket.to_string());
        }

        pub fn put(&self, bucket: &str, key: &str, data: &[u8]) {
            self.add_bucket(bucket);
            self.objects
                .lock()
                .unwrap()
                .insert(Self::object_key(bucket, key), Bytes::copy_from_slice(data));
        }

        /// Keys passed to `get_object`, in call order, including failed fetches.
        pub fn fetched(&self) -> Vec<String> {
            self.fetch_log.lock().unwrap().clone()
        }

        /// `(bucket/key, content_type)` pairs recorded by `put_object`.
        pub fn uploaded(&self) -> Vec<(String, String)> {
            self.uploads.lock().unwrap().clone()
        }

        pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
            self.objects
                .lock()
                .unwrap()
                .get(&Self::object_key(bucket, key))
                .cloned()
        }

        fn object_key(bucket: &str, key: &str) -> String {
            format!("{}/{}", bucket, key)
        }
    }

    #[async_trait]
    impl ObjectStore for MockStore {
        async fn bucket_exists(&self, bucket: &str) -> Result<bool, StorageError> {
            Ok(self.buckets.lock().unwrap().contains(bucket))
        }

        async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError> {
            self.fetch_log.lock().unwrap().push(key.to_string());
            self.objects
                .lock()
                .unwrap()
                .get(&Self::object_key(bucket, key))
                .cloned()
                .ok_or_else(|| StorageError::NotFound(key.to_string()))
        }

        async fn put_object(
            &self,
            bucket: &str,
            key: &str,
            data: Bytes,
            content_type: &str,
        ) -> Result<(), StorageError> {
            self.uploads
                .lock()
                .unwrap()
                .push((Self::object_key(bucket, key), content_type.to_string()));
            self.objects
                .lock()
                .unwrap()
                .insert(Self::object_key(bucket, key), data);
            Ok(())
        }
    }
}
