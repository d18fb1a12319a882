//! Remote blob-service seam. The sink talks to storage exclusively through
//! [`BlobServiceTrait`], so tests can substitute an in-memory client.

use azure_storage::{prelude::*, CloudLocation};
use azure_storage_blobs::prelude::*;
use dyn_clone::DynClone;

use crate::config::Config;

// The narrow set of remote operations the sink depends on.
#[async_trait::async_trait]
pub trait BlobServiceTrait: DynClone + Sync + Send {
    async fn create_container_if_missing(&self, container: &str) -> azure_core::Result<()>;
    async fn set_container_public_access(&self, container: &str) -> azure_core::Result<()>;
    async fn create_append_blob(&self, container: &str, blob: &str) -> azure_core::Result<()>;
    async fn append_block(
        &self,
        container: &str,
        blob: &str,
        body: Vec<u8>,
    ) -> azure_core::Result<()>;
    async fn put_block_blob(
        &self,
        container: &str,
        blob: &str,
        body: Vec<u8>,
    ) -> azure_core::Result<()>;
    async fn blob_exists(&self, container: &str, blob: &str) -> azure_core::Result<bool>;
}

/// Blob service backed by the Azure Storage account named in the
/// configuration.
#[derive(Clone)]
pub struct AzureBlobService {
    client_builder: ClientBuilder,
}

impl AzureBlobService {
    /// Builds a client from the account name, access key and endpoint
    /// protocol of the provided configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let credentials = StorageCredentials::access_key(
            config.account_name.clone(),
            config.account_key.clone(),
        );

        let location = CloudLocation::Custom {
            account: config.account_name.clone(),
            uri: config.endpoint(),
        };

        Self {
            client_builder: ClientBuilder::with_location(location, credentials),
        }
    }
}

#[async_trait::async_trait]
impl BlobServiceTrait for AzureBlobService {
    async fn create_container_if_missing(&self, container: &str) -> azure_core::Result<()> {
        let container_client = self
            .client_builder
            .clone()
            .container_client(container.to_string());

        if container_client.exists().await? {
            return Ok(());
        }

        container_client.create().await.map(|_| ())
    }

    async fn set_container_public_access(&self, container: &str) -> azure_core::Result<()> {
        self.client_builder
            .clone()
            .container_client(container.to_string())
            .set_acl(PublicAccess::Container)
            .await
            .map(|_| ())
    }

    async fn create_append_blob(&self, container: &str, blob: &str) -> azure_core::Result<()> {
        self.client_builder
            .clone()
            .blob_client(container.to_string(), blob)
            .put_append_blob()
            .await
            .map(|_| ())
    }

    async fn append_block(
        &self,
        container: &str,
        blob: &str,
        body: Vec<u8>,
    ) -> azure_core::Result<()> {
        self.client_builder
            .clone()
            .blob_client(container.to_string(), blob)
            .append_block(body)
            .await
            .map(|_| ())
    }

    async fn put_block_blob(
        &self,
        container: &str,
        blob: &str,
        body: Vec<u8>,
    ) -> azure_core::Result<()> {
        self.client_builder
            .clone()
            .blob_client(container.to_string(), blob)
            .put_block_blob(body)
            .await
            .map(|_| ())
    }

    async fn blob_exists(&self, container: &str, blob: &str) -> azure_core::Result<bool> {
        self.client_builder
            .clone()
            .blob_client(container.to_string(), blob)
            .exists()
            .await
    }
}
