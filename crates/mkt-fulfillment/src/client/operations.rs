//! Long-running operation tracking.

use tracing::instrument;
use url::Url;
use uuid::Uuid;

use relay_mkt_client::{parser, CallOptions, RequestMethod, Result};

use super::CollectionFormat;
use crate::operation::{OperationUpdate, SubscriptionOperation};

impl super::FulfillmentClient {
    /// List pending operations across all subscriptions.
    #[instrument(skip(self, opts))]
    pub async fn list_operations(
        &self,
        opts: &CallOptions,
    ) -> Result<Vec<SubscriptionOperation>> {
        let url = self.resource_url(&["operations"]);
        self.fetch_operation_list(url, opts).await
    }

    /// List the operations of one subscription.
    #[instrument(skip(self, opts))]
    pub async fn list_subscription_operations(
        &self,
        subscription_id: Uuid,
        opts: &CallOptions,
    ) -> Result<Vec<SubscriptionOperation>> {
        let url =
            self.resource_url(&["subscriptions", &subscription_id.to_string(), "operations"]);
        self.fetch_operation_list(url, opts).await
    }

    /// Fetch one operation.
    #[instrument(skip(self, opts))]
    pub async fn get_operation(
        &self,
        subscription_id: Uuid,
        operation_id: Uuid,
        opts: &CallOptions,
    ) -> Result<SubscriptionOperation> {
        let url = self.resource_url(&[
            "subscriptions",
            &subscription_id.to_string(),
            "operations",
            &operation_id.to_string(),
        ]);
        let request_id = opts.request_id.unwrap_or_default();
        let correlation_id = opts.correlation_id.unwrap_or_default();

        let response = self
            .execute(
                RequestMethod::Get,
                url,
                request_id,
                correlation_id,
                None,
                None,
                &opts.cancel,
            )
            .await?;

        parser::parse_one(response).await
    }

    /// Acknowledge an operation's outcome. Returns the operation as echoed
    /// by the server.
    #[instrument(skip(self, update, opts))]
    pub async fn update_operation(
        &self,
        subscription_id: Uuid,
        operation_id: Uuid,
        update: &OperationUpdate,
        opts: &CallOptions,
    ) -> Result<SubscriptionOperation> {
        let url = self.resource_url(&[
            "subscriptions",
            &subscription_id.to_string(),
            "operations",
            &operation_id.to_string(),
        ]);
        let request_id = opts.request_id.unwrap_or_default();
        let correlation_id = opts.correlation_id.unwrap_or_default();

        let response = self
            .execute(
                RequestMethod::Patch,
                url,
                request_id,
                correlation_id,
                Some(serde_json::to_string(update)?),
                None,
                &opts.cancel,
            )
            .await?;

        parser::parse_one(response).await
    }

    /// List operations in the shape the configured API version uses: a bare
    /// array for the mock version, a paginated envelope otherwise.
    async fn fetch_operation_list(
        &self,
        url: Url,
        opts: &CallOptions,
    ) -> Result<Vec<SubscriptionOperation>> {
        let request_id = opts.request_id.unwrap_or_default();
        let correlation_id = opts.correlation_id.unwrap_or_default();

        match self.collection_format() {
            CollectionFormat::BareArray => {
                let response = self
                    .execute(
                        RequestMethod::Get,
                        url,
                        request_id,
                        correlation_id,
                        None,
                        None,
                        &opts.cancel,
                    )
                    .await?;
                parser::parse_many(response).await
            }
            CollectionFormat::Envelope => {
                self.collect_pages(url, request_id, correlation_id, &opts.cancel)
                    .await
            }
        }
    }
}
