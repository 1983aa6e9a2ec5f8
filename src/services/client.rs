use std::sync::Arc;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{ApiErrorBody, Genre, GenreListResponse, MovieListing},
    services::{
        credentials::AuthMode,
        endpoint::{Endpoint, EndpointBuilder, QueryParams},
        transport::{CatalogTransport, RawResponse, ReqwestTransport},
    },
};

/// Catalog API client shared by the orchestrator and the auxiliary fetchers.
///
/// Combines URL construction, the process-wide auth mode and the transport.
/// Cheap to clone.
#[derive(Clone)]
pub struct CatalogClient {
    builder: EndpointBuilder,
    auth: Arc<AuthMode>,
    transport: Arc<dyn CatalogTransport>,
}

impl CatalogClient {
    pub fn new(
        builder: EndpointBuilder,
        auth: AuthMode,
        transport: Arc<dyn CatalogTransport>,
    ) -> Self {
        Self {
            builder,
            auth: Arc::new(auth),
            transport,
        }
    }

    /// Client backed by reqwest, configured from `config`
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let transport = ReqwestTransport::new(config.request_timeout())?;
        let auth = config.auth_mode();

        tracing::info!(
            base_url = %config.tmdb_api_url,
            auth = auth.kind(),
            "Catalog client configured"
        );

        Ok(Self::new(
            EndpointBuilder::new(config.tmdb_api_url.clone()),
            auth,
            Arc::new(transport),
        ))
    }

    pub fn auth(&self) -> &AuthMode {
        &self.auth
    }

    /// Issues a GET for `endpoint` with `params` exactly as given
    pub async fn fetch(&self, endpoint: Endpoint, params: &QueryParams) -> AppResult<RawResponse> {
        let url = self.builder.build(endpoint, params)?;

        tracing::debug!(endpoint = %endpoint, "Catalog request started");
        let response = self.transport.get(url, self.auth.headers()).await?;
        tracing::debug!(
            endpoint = %endpoint,
            status = response.status,
            "Catalog request completed"
        );

        Ok(response)
    }

    /// Fetches a paged movie listing (search, discover or trending).
    ///
    /// Non-2xx statuses become `Upstream` when the body has a
    /// `status_message`, `UpstreamGeneric` otherwise. A 2xx body that is not
    /// JSON is `MalformedBody`.
    pub async fn fetch_listing(
        &self,
        endpoint: Endpoint,
        params: &QueryParams,
    ) -> AppResult<MovieListing> {
        let response = self.fetch(endpoint, params).await?;
        ensure_success(&response)?;
        MovieListing::from_body(&response.body)
    }

    pub async fn fetch_genres(&self) -> AppResult<Vec<Genre>> {
        let response = self.fetch(Endpoint::GenreList, &QueryParams::new()).await?;
        ensure_success(&response)?;

        let parsed: GenreListResponse = serde_json::from_str(&response.body)
            .map_err(|e| AppError::Upstream(format!("Failed to parse genre list: {}", e)))?;
        Ok(parsed.genres)
    }
}

fn ensure_success(response: &RawResponse) -> AppResult<()> {
    if response.is_success() {
        return Ok(());
    }

    match ApiErrorBody::message_from(&response.body) {
        Some(message) => Err(AppError::Upstream(message)),
        None => Err(AppError::UpstreamGeneric),
    }
}
