use futures::future::LocalBoxFuture;
use gloo_net::http::{Request, Response};
use serde::Serialize;
use serde_json::Value;
use shared::constants::{CUSTOMER_CREATE_ENDPOINT, CUSTOMER_VERIFY_ENDPOINT, WHEEL_ENDPOINT};
use shared::customer::{
    error_from_body, success_body, ApiError, CreateCustomerRequest, CustomerApi, VerifyCustomerRequest,
    VerifyCustomerResponse,
};
use shared::wheel_config::wheel_status_error;
use shared::{SpinError, WheelConfiguration};

/// `gloo-net` client for the customer endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpCustomerApi {
    base_url: String,
}

impl HttpCustomerApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

async fn post_json<B: Serialize>(url: &str, body: &B) -> Result<Response, ApiError> {
    Request::post(url)
        .header("Content-Type", "application/json")
        .json(body)
        .map_err(|e| ApiError::Decode(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))
}

async fn failure(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error_from_body(status, &body)
}

async fn read_success_body(response: Response) -> Result<Value, ApiError> {
    let text = response.text().await.map_err(|e| ApiError::Decode(e.to_string()))?;
    success_body(&text)
}

impl CustomerApi for HttpCustomerApi {
    fn verify_customer(
        &self,
        request: VerifyCustomerRequest,
    ) -> LocalBoxFuture<'static, Result<VerifyCustomerResponse, ApiError>> {
        let url = format!("{}{}", self.base_url, CUSTOMER_VERIFY_ENDPOINT);
        Box::pin(async move {
            let response = post_json(&url, &request).await?;
            if !response.ok() {
                return Err(failure(response).await);
            }
            let value = read_success_body(response).await?;
            serde_json::from_value::<VerifyCustomerResponse>(value)
                .map_err(|e| ApiError::Decode(e.to_string()))
        })
    }

    fn create_customer(&self, request: CreateCustomerRequest) -> LocalBoxFuture<'static, Result<(), ApiError>> {
        let url = format!("{}{}", self.base_url, CUSTOMER_CREATE_ENDPOINT);
        Box::pin(async move {
            let response = post_json(&url, &request).await?;
            if !response.ok() {
                return Err(failure(response).await);
            }
            read_success_body(response).await.map(|_| ())
        })
    }
}

/// Loads and validates a wheel by id.
pub async fn fetch_wheel(base_url: &str, wheel_id: &str) -> Result<WheelConfiguration, SpinError> {
    let url = format!("{}{}/{}", base_url.trim_end_matches('/'), WHEEL_ENDPOINT, wheel_id);

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| SpinError::Transport(format!("Network error: {}", e)))?;

    if !response.ok() {
        return Err(wheel_status_error(wheel_id, response.status()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| SpinError::Transport(format!("Error reading wheel response: {}", e)))?;
    WheelConfiguration::from_json(wheel_id, &body)
}
