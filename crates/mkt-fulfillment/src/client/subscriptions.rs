//! Subscription lifecycle operations.

use tracing::instrument;
use uuid::Uuid;

use relay_mkt_client::{
    parser, CallOptions, HeaderHook, RequestMethod, Result, MARKETPLACE_TOKEN_HEADER,
};

use crate::plan::SubscriptionPlans;
use crate::result::{FulfillmentResult, SubscriptionActionResult};
use crate::subscription::{ActivatedSubscription, ResolvedSubscription, Subscription};

impl super::FulfillmentClient {
    /// Activate a pending subscription on the given plan.
    #[instrument(skip(self, details, opts))]
    pub async fn activate_subscription(
        &self,
        subscription_id: Uuid,
        details: &ActivatedSubscription,
        opts: &CallOptions,
    ) -> Result<FulfillmentResult> {
        let url =
            self.resource_url(&["subscriptions", &subscription_id.to_string(), "activate"]);
        let request_id = opts.request_id.unwrap_or_default();
        let correlation_id = opts.correlation_id.unwrap_or_default();

        let response = self
            .execute(
                RequestMethod::Post,
                url,
                request_id,
                correlation_id,
                Some(serde_json::to_string(details)?),
                None,
                &opts.cancel,
            )
            .await?;

        let response = parser::ensure_success(response).await?;
        Ok(FulfillmentResult::from_response(&response))
    }

    /// Fetch one subscription.
    #[instrument(skip(self, opts))]
    pub async fn get_subscription(
        &self,
        subscription_id: Uuid,
        opts: &CallOptions,
    ) -> Result<Subscription> {
        let url = self.resource_url(&["subscriptions", &subscription_id.to_string()]);
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

    /// List every subscription, following pagination to exhaustion.
    #[instrument(skip(self, opts))]
    pub async fn list_subscriptions(&self, opts: &CallOptions) -> Result<Vec<Subscription>> {
        let url = self.resource_url(&["subscriptions"]);
        let request_id = opts.request_id.unwrap_or_default();
        let correlation_id = opts.correlation_id.unwrap_or_default();

        self.collect_pages(url, request_id, correlation_id, &opts.cancel)
            .await
    }

    /// Unsubscribe. The outcome is forwarded to the operation ledger when
    /// one is configured.
    #[instrument(skip(self, opts))]
    pub async fn delete_subscription(
        &self,
        subscription_id: Uuid,
        opts: &CallOptions,
    ) -> Result<SubscriptionActionResult> {
        let url = self.resource_url(&["subscriptions", &subscription_id.to_string()]);
        let request_id = opts.request_id.unwrap_or_default();
        let correlation_id = opts.correlation_id.unwrap_or_default();

        let response = self
            .execute(
                RequestMethod::Delete,
                url,
                request_id,
                correlation_id,
                None,
                None,
                &opts.cancel,
            )
            .await?;

        let response = parser::ensure_success(response).await?;
        let result = SubscriptionActionResult::from_response(&response);
        self.record_to_ledger(subscription_id, &result).await;
        Ok(result)
    }

    /// Move the subscription to another plan. The outcome is forwarded to
    /// the operation ledger when one is configured.
    #[instrument(skip(self, opts))]
    pub async fn update_subscription_plan(
        &self,
        subscription_id: Uuid,
        plan_id: &str,
        opts: &CallOptions,
    ) -> Result<SubscriptionActionResult> {
        let url = self.resource_url(&["subscriptions", &subscription_id.to_string()]);
        let request_id = opts.request_id.unwrap_or_default();
        let correlation_id = opts.correlation_id.unwrap_or_default();
        let body = serde_json::json!({ "planId": plan_id }).to_string();

        let response = self
            .execute(
                RequestMethod::Patch,
                url,
                request_id,
                correlation_id,
                Some(body),
                None,
                &opts.cancel,
            )
            .await?;

        let response = parser::ensure_success(response).await?;
        let result = SubscriptionActionResult::from_response(&response);
        self.record_to_ledger(subscription_id, &result).await;
        Ok(result)
    }

    /// Change the purchased seat quantity.
    #[instrument(skip(self, opts))]
    pub async fn update_subscription_quantity(
        &self,
        subscription_id: Uuid,
        quantity: u32,
        opts: &CallOptions,
    ) -> Result<SubscriptionActionResult> {
        let url = self.resource_url(&["subscriptions", &subscription_id.to_string()]);
        let request_id = opts.request_id.unwrap_or_default();
        let correlation_id = opts.correlation_id.unwrap_or_default();
        let body = serde_json::json!({ "quantity": quantity }).to_string();

        let response = self
            .execute(
                RequestMethod::Patch,
                url,
                request_id,
                correlation_id,
                Some(body),
                None,
                &opts.cancel,
            )
            .await?;

        let response = parser::ensure_success(response).await?;
        Ok(SubscriptionActionResult::from_response(&response))
    }

    /// List the plans this subscription may move to.
    #[instrument(skip(self, opts))]
    pub async fn list_available_plans(
        &self,
        subscription_id: Uuid,
        opts: &CallOptions,
    ) -> Result<SubscriptionPlans> {
        let url = self.resource_url(&[
            "subscriptions",
            &subscription_id.to_string(),
            "listAvailablePlans",
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

    /// Resolve a one-time purchase token into the subscription it belongs
    /// to. The token travels in the `x-ms-marketplace-token` header, never
    /// in the URL, and is valid for about an hour after purchase.
    #[instrument(skip(self, marketplace_token, opts))]
    pub async fn resolve_subscription(
        &self,
        marketplace_token: &str,
        opts: &CallOptions,
    ) -> Result<ResolvedSubscription> {
        let url = self.resource_url(&["subscriptions", "resolve"]);
        let request_id = opts.request_id.unwrap_or_default();
        let correlation_id = opts.correlation_id.unwrap_or_default();

        let token = marketplace_token.to_string();
        let hook: HeaderHook = Box::new(move |headers| {
            headers.insert(MARKETPLACE_TOKEN_HEADER.to_string(), token.clone());
        });

        let response = self
            .execute(
                RequestMethod::Post,
                url,
                request_id,
                correlation_id,
                None,
                Some(hook),
                &opts.cancel,
            )
            .await?;

        parser::parse_one(response).await
    }
}
