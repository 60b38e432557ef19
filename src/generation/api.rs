use std::time::Duration;

use reqwest::blocking::{Client, Response};

use crate::config::ApiConfig;
use crate::foundation::error::{InpaintError, InpaintResult};
use crate::generation::request::{InpaintRequest, StatusResponse, SubmitResponse};

const API_KEY_HEADER: &str = "x-key";

/// Remote inpainting service.
pub trait InpaintApi {
    /// Submit a fill job, returning its id.
    fn submit(&self, request: &InpaintRequest) -> InpaintResult<SubmitResponse>;

    /// Fetch the current status of job `id`.
    fn poll(&self, id: &str) -> InpaintResult<StatusResponse>;

    /// Download a finished sample.
    fn download(&self, url: &str) -> InpaintResult<Vec<u8>>;
}

impl<T: InpaintApi + ?Sized> InpaintApi for &T {
    fn submit(&self, request: &InpaintRequest) -> InpaintResult<SubmitResponse> {
        (**self).submit(request)
    }

    fn poll(&self, id: &str) -> InpaintResult<StatusResponse> {
        (**self).poll(id)
    }

    fn download(&self, url: &str) -> InpaintResult<Vec<u8>> {
        (**self).download(url)
    }
}

/// Pause between status checks.
pub trait Delay {
    fn sleep(&mut self, dur: Duration);
}

impl<T: Delay + ?Sized> Delay for &mut T {
    fn sleep(&mut self, dur: Duration) {
        (**self).sleep(dur);
    }
}

/// [`Delay`] backed by [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleep;

impl Delay for ThreadSleep {
    fn sleep(&mut self, dur: Duration) {
        std::thread::sleep(dur);
    }
}

/// Blocking HTTP client for the Flux Fill endpoints.
#[derive(Clone, Debug)]
pub struct HttpInpaintApi {
    client: Client,
    config: ApiConfig,
    api_key: String,
}

impl HttpInpaintApi {
    pub fn new(config: ApiConfig) -> InpaintResult<Self> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            InpaintError::validation(format!(
                "missing API key: set {} or api.api_key",
                config.api_key_env
            ))
        })?;
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("wildmind-inpaint/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InpaintError::network(format!("build HTTP client: {e}")))?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint_for(&self, request: &InpaintRequest) -> &str {
        if request.uses_finetune() {
            &self.config.finetune_endpoint
        } else {
            &self.config.fill_endpoint
        }
    }
}

impl InpaintApi for HttpInpaintApi {
    fn submit(&self, request: &InpaintRequest) -> InpaintResult<SubmitResponse> {
        let endpoint = self.endpoint_for(request);
        tracing::info!(
            endpoint,
            finetune = request.uses_finetune(),
            steps = request.steps,
            guidance = request.guidance,
            "submitting inpaint request"
        );
        let resp = self
            .client
            .post(endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(request.to_json()?)
            .send()
            .map_err(|e| InpaintError::network(format!("submit request failed: {e}")))?;
        let body = ok_body(resp, "FLUX API error")?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn poll(&self, id: &str) -> InpaintResult<StatusResponse> {
        let resp = self
            .client
            .get(&self.config.result_endpoint)
            .query(&[("id", id)])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .map_err(|e| InpaintError::network(format!("status request failed: {e}")))?;
        let body = ok_body(resp, "FLUX polling error")?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn download(&self, url: &str) -> InpaintResult<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| InpaintError::network(format!("download failed: {e}")))?;
        ok_body(resp, "download error")
    }
}

fn ok_body(resp: Response, what: &str) -> InpaintResult<Vec<u8>> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().unwrap_or_default();
        tracing::error!(status = status.as_u16(), body = %text, "{what}");
        return Err(InpaintError::network(format!("{what}: {}", status.as_u16())));
    }
    let bytes = resp
        .bytes()
        .map_err(|e| InpaintError::network(format!("{what}: read body: {e}")))?;
    Ok(bytes.to_vec())
}
