//! Object storage access (S3, local filesystem, in-memory)

use super::glob::GlobPattern;
use crate::config::AwsCredentials;
use crate::error::{Error, Result, ResultExt};
use bytes::Bytes;
use futures::StreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectMeta, ObjectStore};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Options used when opening a storage root
#[derive(Debug, Clone, Default)]
pub struct StorageOptions {
    /// S3 credentials; when absent the builder falls back to its own discovery
    pub credentials: Option<AwsCredentials>,
    /// Create a local root directory if it does not exist
    pub create_local_root: bool,
}

impl StorageOptions {
    /// Options for reading input with explicit credentials
    pub fn for_input(credentials: &AwsCredentials) -> Self {
        Self {
            credentials: Some(credentials.clone()),
            create_local_root: false,
        }
    }

    /// Options for writing output with explicit credentials
    pub fn for_output(credentials: &AwsCredentials) -> Self {
        Self {
            credentials: Some(credentials.clone()),
            create_local_root: true,
        }
    }
}

/// A storage root: an object store plus the prefix every path is resolved under
#[derive(Debug, Clone)]
pub struct Storage {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket
    prefix: ObjectPath,
    /// URL scheme for logging (s3, file, memory)
    scheme: String,
    /// Root as given by the caller, for display
    root: String,
}

impl Storage {
    /// Open a storage root from a URL or local path
    ///
    /// Supported formats:
    /// - `s3://bucket/path/`, `s3a://bucket/path/`, `s3n://bucket/path/` - AWS S3
    /// - `memory://path/` - fresh in-memory store
    /// - `/local/path/`, `./path/` or `file:///path/` - Local filesystem
    pub fn open(root: &str, options: &StorageOptions) -> Result<Self> {
        let scheme = root.split_once("://").map(|(scheme, _)| scheme);
        match scheme {
            Some("s3" | "s3a" | "s3n") => Self::open_s3(root, options),
            Some("memory") => {
                let url = Url::parse(root)?;
                let prefix = format!("{}{}", url.host_str().unwrap_or_default(), url.path());
                Ok(Self::from_store(Arc::new(InMemory::new()), &prefix, "memory", root))
            }
            Some("file") | None => Self::open_local(root, options),
            Some(other) => Err(Error::config(format!(
                "Unsupported storage scheme '{other}' in {root}"
            ))),
        }
    }

    /// Wrap an existing object store under a prefix
    pub fn from_store(
        store: Arc<dyn ObjectStore>,
        prefix: &str,
        scheme: &str,
        root: &str,
    ) -> Self {
        Self {
            store,
            prefix: ObjectPath::from(prefix),
            scheme: scheme.to_string(),
            root: root.to_string(),
        }
    }

    fn open_s3(root: &str, options: &StorageOptions) -> Result<Self> {
        let url = Url::parse(root)?;
        let bucket = url
            .host_str()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| Error::config(format!("Missing bucket in {root}")))?;

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        if let Some(creds) = &options.credentials {
            builder = builder
                .with_access_key_id(&creds.access_key_id)
                .with_secret_access_key(&creds.secret_access_key);
            if let Some(region) = &creds.region {
                builder = builder.with_region(region);
            }
            if let Some(endpoint) = &creds.endpoint {
                builder = builder
                    .with_endpoint(endpoint)
                    .with_allow_http(endpoint.starts_with("http://"));
            }
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create S3 client for {root}: {e}")))?;

        Ok(Self::from_store(Arc::new(store), url.path(), url.scheme(), root))
    }

    fn open_local(root: &str, options: &StorageOptions) -> Result<Self> {
        let path = root.strip_prefix("file://").unwrap_or(root);

        if options.create_local_root {
            std::fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory {path}"))?;
        }

        let store = LocalFileSystem::new_with_prefix(path)?;
        Ok(Self::from_store(Arc::new(store), "", "file", root))
    }

    /// Get the scheme (s3, s3a, s3n, file, memory)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Root as configured
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Resolve path segments under the root; each segment is kept whole
    pub fn path<I, S>(&self, segments: I) -> ObjectPath
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        segments
            .into_iter()
            .fold(self.prefix.clone(), |path, segment| path.child(segment.as_ref()))
    }

    /// Resolve a `/`-separated relative path under the root
    pub fn relative(&self, relative: &str) -> ObjectPath {
        self.path(relative.split('/').filter(|s| !s.is_empty()))
    }

    /// Human-readable location of a relative path
    pub fn display(&self, relative: &str) -> String {
        format!(
            "{}/{}",
            self.root.trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }

    /// List every object under a path
    pub async fn list(&self, prefix: &ObjectPath) -> Result<Vec<ObjectMeta>> {
        let mut stream = self.store.list(Some(prefix));
        let mut objects = Vec::new();
        while let Some(item) = stream.next().await {
            match item {
                Ok(meta) => objects.push(meta),
                // A prefix that does not exist lists as empty
                Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(objects)
    }

    /// Expand a glob pattern relative to the root into object paths, sorted
    pub async fn glob(&self, pattern: &str) -> Result<Vec<ObjectPath>> {
        let glob = GlobPattern::new(pattern)?;
        let base = self.path(glob.literal_prefix());

        if !glob.has_wildcards() {
            // A literal path names either a single object or a directory
            match self.store.head(&base).await {
                Ok(meta) => return Ok(vec![meta.location]),
                Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }

        let mut matched: Vec<ObjectPath> = self
            .list(&base)
            .await?
            .into_iter()
            .filter_map(|meta| {
                let rest: Vec<String> = meta
                    .location
                    .prefix_match(&base)?
                    .map(|part| part.as_ref().to_string())
                    .collect();
                glob.matches_relative(&rest).then_some(meta.location)
            })
            .collect();
        matched.sort();

        debug!(pattern, root = %self.root, files = matched.len(), "Glob expanded");
        Ok(matched)
    }

    /// Read a whole object
    pub async fn read(&self, location: &ObjectPath) -> Result<Bytes> {
        let result = self.store.get(location).await?;
        Ok(result.bytes().await?)
    }

    /// Write a whole object, replacing any previous content
    pub async fn put(&self, location: &ObjectPath, data: Bytes) -> Result<()> {
        self.store.put(location, data.into()).await?;
        Ok(())
    }

    /// Whether any object exists under a path
    pub async fn has_data(&self, prefix: &ObjectPath) -> Result<bool> {
        let mut stream = self.store.list(Some(prefix));
        while let Some(item) = stream.next().await {
            match item {
                Ok(_) => return Ok(true),
                Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(false)
    }

    /// Delete every object under a path, returning how many were removed
    pub async fn delete_prefix(&self, prefix: &ObjectPath) -> Result<usize> {
        let objects = self.list(prefix).await?;
        for meta in &objects {
            self.store.delete(&meta.location).await?;
        }
        Ok(objects.len())
    }
}
