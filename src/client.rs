use crate::catalog::{COMBINER_APP, DEFAULT_APP, DEFAULT_MODEL};
use crate::clock::{Clock, SystemClock};
use crate::config::DEFAULT_API_URL;
use crate::error::{FashError, Result};
use crate::prompt::StyleRequest;
use crate::session::{Session, TokenPolicy};
use crate::types::{
    ApiResponse, ChallengeData, CreateTaskData, CreateTaskRequest, Failure, GenerateOptions,
    Generation, GenerationOutcome, ImageSource, TaskResultData, TaskState, UploadSlot,
};
use crate::validation::{validate, Issue};
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT,
};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const SITE_ORIGIN: &str = "https://headshotmaster.io";
const SITE_REFERER: &str = "https://headshotmaster.io/";
const MOBILE_CHROME_UA: &str = "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/127.0.0.0 Mobile Safari/537.36";
const SEC_CH_UA: &str = r#""Not)A;Brand";v="99", "Google Chrome";v="127", "Chromium";v="127""#;

const IDENTITY_HEADER: &str = "x-identity-id";
const TOKEN_HEADER: &str = "x-auth-challenge";

const CHALLENGE_ENDPOINT: &str = "sys/challenge/token";
const UPLOAD_REQUEST_ENDPOINT: &str = "aigc/file/upload/request";
const TASK_CREATE_ENDPOINT: &str = "aigc/task/create";
const TASK_RESULT_ENDPOINT: &str = "aigc/task/result/get";

const UPLOAD_CONTENT_TYPE: &str = "image/png";

/// Deadline and spacing of task status queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(180),
            interval: Duration::from_secs(3),
        }
    }
}

/// Client for the upstream image-generation service.
///
/// Each instance owns one identity and one [`Session`]. `authenticate` and
/// task creation mutate the session, so concurrent logical requests should
/// each use their own client.
#[derive(Debug, Clone)]
pub struct FashClient {
    /// Carries the browser-like header set every API call is sent with.
    client: reqwest::Client,
    /// Plain client for remote image fetches and slot transfers.
    transfer: reqwest::Client,
    base_url: Url,
    session: Session,
    clock: Arc<dyn Clock>,
    poll: PollSettings,
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("id-ID"));
    headers.insert(ORIGIN, HeaderValue::from_static(SITE_ORIGIN));
    headers.insert(REFERER, HeaderValue::from_static(SITE_REFERER));
    headers.insert(USER_AGENT, HeaderValue::from_static(MOBILE_CHROME_UA));
    headers.insert("sec-ch-ua", HeaderValue::from_static(SEC_CH_UA));
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?1"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"Android\""));
    headers
}

impl FashClient {
    /// Creates a client for the public service with a fresh random identity.
    ///
    /// No network call is made.
    pub fn new() -> Result<Self> {
        Self::new_with_url(DEFAULT_API_URL)
    }

    /// Creates a client against a custom base URL (e.g. a mock server).
    ///
    /// # Errors
    ///
    /// - `FashError::UrlParseFailed` if `base_url` is invalid.
    /// - `FashError::RequestFailed` if the HTTP client fails to build.
    pub fn new_with_url(base_url: &str) -> Result<Self> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .build()?;

        Ok(Self {
            client,
            transfer: reqwest::Client::new(),
            base_url,
            session: Session::new(uuid::Uuid::new_v4().to_string(), TokenPolicy::default()),
            clock: Arc::new(SystemClock),
            poll: PollSettings::default(),
        })
    }

    /// Replaces the random identity, resetting the session.
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.session = Session::new(identity, self.session.policy());
        self
    }

    pub fn with_token_policy(mut self, policy: TokenPolicy) -> Self {
        self.session.set_policy(policy);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_poll_settings(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn identity(&self) -> &str {
        self.session.identity()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn api_request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(endpoint)?;
        Ok(self
            .client
            .request(method, url)
            .header(IDENTITY_HEADER, HeaderValue::from_str(self.session.identity())?)
            .header(TOKEN_HEADER, HeaderValue::from_str(self.session.token())?))
    }

    async fn dispatch<T>(&self, endpoint: &str, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let response = request.send().await?;

        if response.status().is_success() {
            let api_response: ApiResponse<T> = response.json().await?;
            Ok(api_response.data.unwrap_or_default())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<Value>(&body) {
                Ok(json) => json.to_string(),
                Err(_) => format!("HTTP {}: {}", status, body),
            };
            tracing::error!(endpoint, %status, "upstream request failed");
            Err(FashError::Api {
                endpoint: endpoint.to_string(),
                message,
            })
        }
    }

    /// Obtains a challenge token and makes it the session token.
    ///
    /// # Errors
    ///
    /// - `FashError::Authentication` if the response carries no `challenge_token`.
    pub async fn authenticate(&mut self) -> Result<()> {
        tracing::info!(identity = self.session.identity(), "authenticating");
        self.session.reset();

        let request = self.api_request(Method::GET, CHALLENGE_ENDPOINT)?;
        let data: ChallengeData = self.dispatch(CHALLENGE_ENDPOINT, request).await?;

        match data.challenge_token.filter(|t| !t.is_empty()) {
            Some(token) => {
                self.session.authenticated(token);
                tracing::info!("auth token secured");
                Ok(())
            }
            None => Err(FashError::Authentication(
                "Failed to get challenge token".to_string(),
            )),
        }
    }

    /// Uploads the images in order and returns one read URL per image.
    ///
    /// Empty sources are skipped; with nothing left to send no request is
    /// made. The first failed fetch or transfer aborts the whole upload.
    ///
    /// # Errors
    ///
    /// - `FashError::Upload` if the slot count differs from the image count,
    ///   or if fetching or transferring an image fails.
    pub async fn upload(&self, images: &[ImageSource]) -> Result<Vec<String>> {
        let images: Vec<&ImageSource> = images.iter().filter(|i| !i.is_empty()).collect();
        if images.is_empty() {
            return Ok(Vec::new());
        }

        let count = images.len();
        let request = self
            .api_request(Method::GET, UPLOAD_REQUEST_ENDPOINT)?
            .query(&[
                ("f_suffix", "png".to_string()),
                ("count", count.to_string()),
                ("unsafe", "1".to_string()),
            ]);
        let slots: Vec<UploadSlot> = self.dispatch(UPLOAD_REQUEST_ENDPOINT, request).await?;

        if slots.len() != count {
            return Err(FashError::Upload(format!(
                "Upload slot count mismatch: requested {}, received {}",
                count,
                slots.len()
            )));
        }

        let mut uploaded = Vec::with_capacity(count);
        for (i, (image, slot)) in images.into_iter().zip(slots).enumerate() {
            tracing::info!("uploading {}/{}", i + 1, count);
            let bytes = self.resolve_image(image).await?;
            self.transfer_to_slot(&slot, bytes).await?;
            uploaded.push(slot.get);
        }

        Ok(uploaded)
    }

    async fn resolve_image(&self, image: &ImageSource) -> Result<Vec<u8>> {
        if let Some(url) = image.remote_url() {
            tracing::debug!(url, "fetching remote image");
            let response = self
                .transfer
                .get(url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| FashError::Upload(format!("Failed to fetch {}: {}", url, e)))?;
            let bytes = response
                .bytes()
                .await
                .map_err(|e| FashError::Upload(format!("Failed to read {}: {}", url, e)))?;
            return Ok(bytes.to_vec());
        }

        Ok(match image {
            ImageSource::Bytes(bytes) => bytes.clone(),
            ImageSource::Text(text) => text.as_bytes().to_vec(),
        })
    }

    async fn transfer_to_slot(&self, slot: &UploadSlot, bytes: Vec<u8>) -> Result<()> {
        self.transfer
            .put(&slot.put)
            .header(CONTENT_TYPE, UPLOAD_CONTENT_TYPE)
            .body(bytes)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FashError::Upload(format!("Transfer to upload slot failed: {}", e)))?;
        Ok(())
    }

    /// Submits a generation task for already uploaded media and returns its creation id.
    ///
    /// Unset `app`/`model` default to the combiner app and its first model.
    /// Under [`TokenPolicy::ExpireAfterTask`] the session expires on success.
    ///
    /// # Errors
    ///
    /// - `FashError::TaskCreation` if the response carries no `creation_id`.
    pub async fn create_task(
        &mut self,
        options: &GenerateOptions,
        media_urls: &[String],
    ) -> Result<String> {
        let payload = CreateTaskRequest {
            app_code: resolved_app(options),
            model_code: resolved_model(options),
            media_urls,
            extra_params: Map::new(),
            user_prompt: non_empty(&options.prompt),
            style: non_empty(&options.style),
            aspect_ratio: non_empty(&options.ratio),
        };
        tracing::info!(app = payload.app_code, model = payload.model_code, "creating task");
        tracing::debug!(payload = ?payload, "task payload");

        let request = self
            .api_request(Method::POST, TASK_CREATE_ENDPOINT)?
            .json(&payload);
        let data: CreateTaskData = self.dispatch(TASK_CREATE_ENDPOINT, request).await?;

        let creation_id = data
            .creation_id
            .filter(|id| !id.is_empty())
            .ok_or(FashError::TaskCreation)?;
        self.session.task_created();

        Ok(creation_id)
    }

    /// Polls a task with the client's configured [`PollSettings`].
    pub async fn poll(&self, creation_id: &str) -> Result<Vec<Value>> {
        self.poll_with(creation_id, self.poll.timeout, self.poll.interval)
            .await
    }

    /// Queries task status every `interval` until it succeeds, fails, or `timeout` elapses.
    ///
    /// # Returns
    ///
    /// The result list of a succeeded task.
    ///
    /// # Errors
    ///
    /// - `FashError::TaskFailed` if the service marks the task failed.
    /// - `FashError::PollTimeout` if no terminal status arrives before the deadline.
    pub async fn poll_with(
        &self,
        creation_id: &str,
        timeout: Duration,
        interval: Duration,
    ) -> Result<Vec<Value>> {
        tracing::info!(creation_id, "monitoring task");
        let start = self.clock.now();

        while self.clock.now().duration_since(start) < timeout {
            let request = self
                .api_request(Method::GET, TASK_RESULT_ENDPOINT)?
                .query(&[("creation_id", creation_id)]);
            let data: TaskResultData = self.dispatch(TASK_RESULT_ENDPOINT, request).await?;

            match TaskState::from_code(data.status) {
                TaskState::Succeeded => return Ok(data.list.unwrap_or_default()),
                TaskState::Failed => {
                    return Err(FashError::TaskFailed {
                        creation_id: creation_id.to_string(),
                    })
                }
                TaskState::Pending => {
                    tracing::debug!(creation_id, status = ?data.status, "task pending");
                    self.clock.sleep(interval).await;
                }
            }
        }

        Err(FashError::PollTimeout {
            creation_id: creation_id.to_string(),
            timeout,
        })
    }

    /// Runs the whole workflow: validate, authenticate, upload, create task, poll.
    ///
    /// Never returns an error: invalid options come back as
    /// [`GenerationOutcome::Rejected`] without any network activity, and any
    /// fault after that as [`GenerationOutcome::Failed`].
    pub async fn generate(&mut self, options: &GenerateOptions) -> GenerationOutcome {
        let report = validate(options);
        if !report.valid {
            tracing::warn!(errors = %report.error_summary(), "options rejected");
            return GenerationOutcome::Rejected(report);
        }

        for warning in &report.warnings {
            tracing::warn!(field = %warning.field, "{}", warning.message);
        }

        match self.run_workflow(options, report.warnings).await {
            Ok(generation) => GenerationOutcome::Completed(generation),
            Err(e) => {
                tracing::error!(error = %e, "generation failed");
                GenerationOutcome::Failed(Failure {
                    code: e.code(),
                    message: e.to_string(),
                })
            }
        }
    }

    async fn run_workflow(
        &mut self,
        options: &GenerateOptions,
        warnings: Vec<Issue>,
    ) -> Result<Generation> {
        self.authenticate().await?;
        let media_urls = self.upload(&options.images).await?;
        let creation_id = self.create_task(options, &media_urls).await?;
        let result = self.poll(&creation_id).await?;

        Ok(Generation {
            creation_id,
            result,
            app: resolved_app(options).to_string(),
            model: resolved_model(options).to_string(),
            style: non_empty(&options.style).map(str::to_string),
            warnings,
        })
    }

    /// Renders a try-on prompt from `style` and runs it through [`generate`](Self::generate)
    /// on the combiner app with its default model.
    pub async fn fash_ai(
        &mut self,
        image: impl Into<ImageSource>,
        style: &StyleRequest,
    ) -> GenerationOutcome {
        let options = GenerateOptions {
            app: Some(COMBINER_APP.to_string()),
            model: Some(DEFAULT_MODEL.to_string()),
            style: None,
            images: vec![image.into()],
            prompt: Some(style.render_prompt()),
            ratio: Some(style.ratio.clone()),
        };
        self.generate(&options).await
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn resolved_app(options: &GenerateOptions) -> &str {
    non_empty(&options.app).unwrap_or(DEFAULT_APP)
}

fn resolved_model(options: &GenerateOptions) -> &str {
    non_empty(&options.model).unwrap_or(DEFAULT_MODEL)
}
