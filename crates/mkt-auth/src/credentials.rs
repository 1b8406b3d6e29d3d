//! Marketplace credentials.
//!
//! All credential types implement custom Debug to redact sensitive data.

use crate::error::{Error, ErrorKind, Result};

/// Credentials for the client-credentials grant: the publisher's directory
/// tenant, the registered application, and the audience resource.
#[derive(Clone)]
pub struct MarketplaceCredentials {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    resource: String,
}

impl std::fmt::Debug for MarketplaceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketplaceCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("resource", &self.resource)
            .finish()
    }
}

impl MarketplaceCredentials {
    /// Create credentials for the marketplace fulfillment resource.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        let credentials = Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            resource: crate::MARKETPLACE_RESOURCE.to_string(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Override the audience resource.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    /// Load credentials from `MKT_TENANT_ID`, `MKT_CLIENT_ID`,
    /// `MKT_CLIENT_SECRET`, and optionally `MKT_RESOURCE`.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name).map_err(|_| Error::new(ErrorKind::EnvVar(name.to_string())))
        };

        let mut credentials = Self::new(
            var("MKT_TENANT_ID")?,
            var("MKT_CLIENT_ID")?,
            var("MKT_CLIENT_SECRET")?,
        )?;
        if let Ok(resource) = std::env::var("MKT_RESOURCE") {
            credentials = credentials.with_resource(resource);
        }
        Ok(credentials)
    }

    /// The directory tenant id.
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// The application (client) id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The client secret (for internal use).
    pub(crate) fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// The audience resource.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    fn validate(&self) -> Result<()> {
        if self.tenant_id.is_empty() || self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "tenant id, client id, and client secret must be non-empty".into(),
            )));
        }
        Ok(())
    }
}
