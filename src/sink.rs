//! The sink component: resolves one blob handle at startup and writes every
//! inbound payload to it.

use std::fmt;

use tracing::{error, info};

use crate::{
    client::{AzureBlobService, BlobServiceTrait},
    config::Config,
    errors::{InitError, InitResult, StorageError, WriteError, WriteResult},
    runtime::Message,
};

/// Write strategy for the resolved blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Each payload is appended to an append blob, followed by a newline.
    Append,
    /// Each payload replaces the block blob's entire content.
    Block,
}

impl From<&Config> for WriteMode {
    fn from(config: &Config) -> Self {
        if config.append_only {
            Self::Append
        } else {
            Self::Block
        }
    }
}

/// The single resolved blob handle of a sink instance. Created once during
/// initialization and reused for every write; all writes from one instance
/// target the same remote object.
pub struct BlobTarget {
    service: Box<dyn BlobServiceTrait>,
    container: String,
    blob: String,
    mode: WriteMode,
}

impl Clone for BlobTarget {
    fn clone(&self) -> Self {
        Self {
            service: dyn_clone::clone_box(&*self.service),
            container: self.container.clone(),
            blob: self.blob.clone(),
            mode: self.mode,
        }
    }
}

impl fmt::Debug for BlobTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobTarget")
            .field("container", &self.container)
            .field("blob", &self.blob)
            .field("mode", &self.mode)
            .finish()
    }
}

impl BlobTarget {
    /// Resolves the container and blob named in the configuration against
    /// the provided blob service.
    ///
    /// In order: creates the container when `auto_create_container` is set,
    /// grants anonymous container-wide read when `public_permission` is set,
    /// and in append mode recreates the blob (discarding prior content) when
    /// `overwrite_existing_append` is set. Block blobs involve no remote call
    /// here; they come into existence on the first write.
    ///
    /// # Errors
    ///
    /// Returns an [`InitError`] when any of the remote calls fail.
    pub async fn resolve(
        config: &Config,
        service: Box<dyn BlobServiceTrait>,
    ) -> InitResult<Self> {
        info!(account = %config.account_name, "using storage account");
        info!(container = %config.container_name, "using container");

        if config.auto_create_container {
            service
                .create_container_if_missing(&config.container_name)
                .await
                .map_err(|error| InitError::Container(error.kind().into()))?;
        }

        if config.public_permission {
            info!("making container publicly accessible");
            service
                .set_container_public_access(&config.container_name)
                .await
                .map_err(|error| InitError::Container(error.kind().into()))?;
        }

        info!(blob = %config.blob_name, "using blob name");

        let mode = WriteMode::from(config);
        if mode == WriteMode::Append && config.overwrite_existing_append {
            // destructive: truncates whatever the append blob held before
            service
                .create_append_blob(&config.container_name, &config.blob_name)
                .await
                .map_err(|error| InitError::Blob(error.kind().into()))?;
        }

        Ok(Self {
            service,
            container: config.container_name.clone(),
            blob: config.blob_name.clone(),
            mode,
        })
    }

    #[must_use]
    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Writes one payload to the blob according to the write mode.
    ///
    /// Append mode appends the payload plus a trailing newline, creating the
    /// append blob first if it does not exist yet. Block mode replaces the
    /// blob's entire content with the payload.
    ///
    /// # Errors
    ///
    /// Returns a [`WriteError`] when the remote write fails.
    pub async fn write(&self, payload: &str) -> WriteResult<()> {
        match self.mode {
            WriteMode::Append => {
                let exists = self
                    .service
                    .blob_exists(&self.container, &self.blob)
                    .await
                    .map_err(storage_error)?;

                if !exists {
                    self.service
                        .create_append_blob(&self.container, &self.blob)
                        .await
                        .map_err(storage_error)?;
                }

                let mut body = payload.as_bytes().to_vec();
                body.push(b'\n');

                self.service
                    .append_block(&self.container, &self.blob, body)
                    .await
                    .map_err(storage_error)?;
            }
            WriteMode::Block => {
                self.service
                    .put_block_blob(&self.container, &self.blob, payload.as_bytes().to_vec())
                    .await
                    .map_err(storage_error)?;
            }
        }

        Ok(())
    }
}

fn storage_error(error: azure_core::error::Error) -> WriteError {
    WriteError::Storage(StorageError::from(error.kind()))
}

/// The inbound-message-consuming component. Holds at most one [`BlobTarget`];
/// a sink whose initialization failed holds none and reports every write as
/// [`WriteError::NotInitialized`].
pub struct Sink {
    target: Option<BlobTarget>,
}

impl Clone for Sink {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
        }
    }
}

impl Sink {
    /// Initializes a sink against the Azure account named in the
    /// configuration.
    ///
    /// Never fails: a resolution error is logged and the sink starts without
    /// a blob handle, so process startup is not blocked by an unreachable or
    /// misconfigured account. Use [`Sink::try_initialize`] to observe the
    /// error instead.
    pub async fn initialize(config: &Config) -> Self {
        Self::with_service(config, Box::new(AzureBlobService::new(config))).await
    }

    /// Same as [`Sink::initialize`], but against an arbitrary blob service.
    pub async fn with_service(config: &Config, service: Box<dyn BlobServiceTrait>) -> Self {
        match BlobTarget::resolve(config, service).await {
            Ok(target) => Self {
                target: Some(target),
            },
            Err(error) => {
                error!(%error, "blob resolution failed; sink starts without a handle");
                Self { target: None }
            }
        }
    }

    /// Initializes a sink, propagating resolution failures to the caller.
    ///
    /// # Errors
    ///
    /// Returns an [`InitError`] when the container or blob cannot be
    /// resolved.
    pub async fn try_initialize(config: &Config) -> InitResult<Self> {
        let service = Box::new(AzureBlobService::new(config)) as Box<dyn BlobServiceTrait>;
        let target = BlobTarget::resolve(config, service).await?;

        Ok(Self {
            target: Some(target),
        })
    }

    /// Whether initialization resolved a blob handle.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.target.is_some()
    }

    /// Writes one message's payload to the resolved blob.
    ///
    /// The payload is rendered through its `Display` representation. The
    /// remote write is not retried on failure; delivery guarantees stay with
    /// the upstream messaging runtime.
    ///
    /// # Errors
    ///
    /// Returns a [`WriteError`] when no blob handle is available or the
    /// remote write fails.
    pub async fn handle_message<P: fmt::Display>(
        &self,
        message: &Message<P>,
    ) -> WriteResult<()> {
        let Some(target) = &self.target else {
            return Err(WriteError::NotInitialized);
        };

        target.write(&message.payload().to_string()).await
    }
}
