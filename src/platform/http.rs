// ABOUTME: HTTP implementation of the platform admin API traits.
// ABOUTME: Talks JSON over hyper to a regional serving-platform gateway.

use super::api::{DeploymentApi, OperationPoller, RoutingApi};
use super::error::PlatformError;
use super::types::{
    OperationStatus, RemoteRevision, RemoteService, RoutingState, ServiceDescriptor, TrafficTarget,
};
use crate::types::{OperationId, RevisionId, ServiceName};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{ACCEPT, CONTENT_TYPE};
use hyper::{Method, Request, StatusCode};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Client for the platform's REST-shaped admin API.
///
/// Scoped to one project and region, the way the remote API itself is.
/// The endpoint is typically a local authenticated gateway in front of the
/// regional admin service.
pub struct HttpPlatform {
    client: Client<HttpConnector, Full<Bytes>>,
    base_url: String,
    project: String,
    region: String,
}

impl HttpPlatform {
    pub fn new(
        endpoint: impl Into<String>,
        project: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        let base_url = endpoint.into().trim_end_matches('/').to_string();
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            base_url,
            project: project.into(),
            region: region.into(),
        }
    }

    fn service_url(&self, name: &ServiceName) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/services/{}",
            self.base_url,
            urlencoding::encode(&self.project),
            urlencoding::encode(&self.region),
            urlencoding::encode(name.as_str())
        )
    }

    fn revision_url(&self, name: &ServiceName, revision: &RevisionId) -> String {
        format!(
            "{}/revisions/{}",
            self.service_url(name),
            urlencoding::encode(revision.as_str())
        )
    }

    fn routing_url(&self, name: &ServiceName) -> String {
        format!("{}/routing", self.service_url(name))
    }

    fn operation_url(&self, op: &OperationId) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/operations/{}",
            self.base_url,
            urlencoding::encode(&self.project),
            urlencoding::encode(&self.region),
            urlencoding::encode(op.as_str())
        )
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Option<T>, PlatformError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(url)
            .header(ACCEPT, "application/json")
            .body(Full::new(Bytes::new()))
            .map_err(|e| PlatformError::Malformed {
                message: format!("failed to build request for {url}: {e}"),
            })?;

        let (status, body) = self.dispatch(request).await?;

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check_status(status, &body)?;

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| PlatformError::Malformed {
                message: format!("failed to decode response from {url}: {e}"),
            })
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        payload: &B,
    ) -> Result<T, PlatformError> {
        let body = serde_json::to_vec(payload).map_err(|e| PlatformError::Malformed {
            message: format!("failed to encode request body: {e}"),
        })?;

        let request = Request::builder()
            .method(Method::PUT)
            .uri(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| PlatformError::Malformed {
                message: format!("failed to build request for {url}: {e}"),
            })?;

        let (status, body) = self.dispatch(request).await?;
        check_status(status, &body)?;

        serde_json::from_slice(&body).map_err(|e| PlatformError::Malformed {
            message: format!("failed to decode response from {url}: {e}"),
        })
    }

    async fn dispatch(
        &self,
        request: Request<Full<Bytes>>,
    ) -> Result<(StatusCode, Bytes), PlatformError> {
        let response =
            self.client
                .request(request)
                .await
                .map_err(|e| PlatformError::Unavailable {
                    message: e.to_string(),
                })?;

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| PlatformError::Unavailable {
                message: format!("connection interrupted while reading response: {e}"),
            })?
            .to_bytes();

        Ok((status, body))
    }
}

/// Map a non-success status to a platform error. 429 and 5xx are transient;
/// everything else is a terminal rejection.
fn check_status(status: StatusCode, body: &Bytes) -> Result<(), PlatformError> {
    if status.is_success() {
        return Ok(());
    }

    let message = String::from_utf8_lossy(body).trim().to_string();
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        return Err(PlatformError::Unavailable {
            message: format!("{status}: {message}"),
        });
    }

    Err(PlatformError::Rejected {
        code: status.as_u16(),
        message,
    })
}

/// Response body of a mutation: the operation to poll.
#[derive(Debug, serde::Deserialize)]
struct OperationRef {
    operation: OperationId,
}

/// Request body of a routing update.
#[derive(Debug, serde::Serialize)]
struct RoutingUpdate<'a> {
    targets: &'a [TrafficTarget],
}

#[async_trait]
impl OperationPoller for HttpPlatform {
    async fn poll_operation(&self, op: &OperationId) -> Result<OperationStatus, PlatformError> {
        let url = self.operation_url(op);
        self.get_json(&url)
            .await?
            .ok_or_else(|| PlatformError::Rejected {
                code: 404,
                message: format!("operation {op} not found"),
            })
    }
}

#[async_trait]
impl DeploymentApi for HttpPlatform {
    async fn get_service(
        &self,
        name: &ServiceName,
    ) -> Result<Option<RemoteService>, PlatformError> {
        let url = self.service_url(name);
        self.get_json(&url).await
    }

    async fn apply_service(
        &self,
        desired: &ServiceDescriptor,
    ) -> Result<OperationId, PlatformError> {
        let url = self.service_url(&desired.service);
        let op: OperationRef = self.put_json(&url, desired).await?;
        Ok(op.operation)
    }

    async fn get_revision(
        &self,
        name: &ServiceName,
        revision: &RevisionId,
    ) -> Result<Option<RemoteRevision>, PlatformError> {
        let url = self.revision_url(name, revision);
        self.get_json(&url).await
    }
}

#[async_trait]
impl RoutingApi for HttpPlatform {
    async fn get_routing(&self, name: &ServiceName) -> Result<RoutingState, PlatformError> {
        let url = self.routing_url(name);
        // A service that exists but was never routed reports empty routing.
        Ok(self.get_json(&url).await?.unwrap_or_default())
    }

    async fn apply_routing(
        &self,
        name: &ServiceName,
        targets: &[TrafficTarget],
    ) -> Result<OperationId, PlatformError> {
        let url = self.routing_url(name);
        let op: OperationRef = self.put_json(&url, &RoutingUpdate { targets }).await?;
        Ok(op.operation)
    }
}
