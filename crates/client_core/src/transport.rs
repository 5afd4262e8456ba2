use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{UpdateCategoryRequest, UpdateCategoryResponse, UPDATE_CATEGORY_PATH};
use tracing::debug;
use url::Url;

use crate::error::{ClientError, TransportError};

#[async_trait]
pub trait CategoryTransport: Send + Sync {
    async fn update_category(
        &self,
        request: &UpdateCategoryRequest,
    ) -> Result<UpdateCategoryResponse, TransportError>;
}

/// Builds `{context}account/update_cat.json`. The context URL is treated as a
/// directory whether or not it ends with a slash.
pub fn update_endpoint(context_url: &str) -> Result<Url, ClientError> {
    let invalid = |source| ClientError::InvalidContextUrl {
        url: context_url.to_string(),
        source,
    };
    let mut base = Url::parse(context_url.trim()).map_err(invalid)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(UPDATE_CATEGORY_PATH).map_err(invalid)
}

pub struct HttpCategoryTransport {
    http: Client,
    endpoint: Url,
}

impl HttpCategoryTransport {
    pub fn new(context_url: &str) -> Result<Self, ClientError> {
        Ok(Self::with_client(Client::new(), update_endpoint(context_url)?))
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl CategoryTransport for HttpCategoryTransport {
    async fn update_category(
        &self,
        request: &UpdateCategoryRequest,
    ) -> Result<UpdateCategoryResponse, TransportError> {
        debug!(endpoint = %self.endpoint, op = request.op, cat = request.cat, "posting category update");
        let response = self
            .http
            .post(self.endpoint.clone())
            .form(request)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<UpdateCategoryResponse>().await?)
    }
}
