use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{errors::Error, orders::ActiveOrder, pagination::FetchRequest};

/// One page of active orders plus the total across all pages
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderPage {
    pub orders: Vec<ActiveOrder>,
    pub total_count: u64,
}

#[async_trait]
pub trait OrderQuery: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<OrderPage, Error>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderResults {
    results: Vec<ActiveOrder>,
    #[serde(default)]
    total_count: Option<u64>,
}

impl From<OrderResults> for OrderPage {
    fn from(body: OrderResults) -> Self {
        let total_count = body.total_count.unwrap_or(body.results.len() as u64);
        Self {
            orders: body.results,
            total_count,
        }
    }
}

/// Order service over the OpenMRS REST API
#[derive(Clone)]
pub struct HttpOrderQuery {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOrderQuery {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self) -> String {
        format!("{}/ws/rest/v1/order", self.base_url.trim_end_matches('/'))
    }
}

fn query_params(request: &FetchRequest) -> Vec<(&'static str, String)> {
    vec![
        ("t", "drugorder".to_string()),
        ("v", "full".to_string()),
        ("patient", request.patient_uuid.clone()),
        ("careSetting", request.care_setting_uuid.clone()),
        ("limit", request.limit.to_string()),
        ("startIndex", request.offset.to_string()),
        ("totalCount", "true".to_string()),
    ]
}

#[async_trait]
impl OrderQuery for HttpOrderQuery {
    async fn fetch(&self, request: &FetchRequest) -> Result<OrderPage, Error> {
        let body: OrderResults = self
            .client
            .get(self.url())
            .query(&query_params(request))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::debug!(
            "Received {} active orders for {:?}",
            body.results.len(),
            request.token
        );
        Ok(body.into())
    }
}
