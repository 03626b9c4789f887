use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response, StatusCode,
};
use shared::{
    domain::CourseId,
    error::ApiErrorBody,
    protocol::{
        course_route, CourseEnvelope, CourseRecord, DocumentUploadResponse, UpdateCourseRequest,
        UploadedVideo, VideoUploadResponse, DOCUMENTS_ROUTE, VIDEOS_ROUTE,
    },
};
use tracing::{debug, info};
use url::Url;

use crate::{
    asset::LocalAsset,
    backend::{CourseBackend, VideoUpload},
    error::BackendError,
};

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`CourseBackend`] over the course service's REST API.
#[derive(Debug, Clone)]
pub struct HttpCourseBackend {
    http: Client,
    base_url: String,
}

impl HttpCourseBackend {
    /// Only connecting is time-limited; uploads may take as long as they need.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::build(base_url, None)
    }

    pub fn with_request_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        Self::build(base_url, Some(timeout))
    }

    fn build(base_url: &str, request_timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        Url::parse(base_url).with_context(|| format!("invalid backend url '{base_url}'"))?;
        let mut builder = Client::builder().connect_timeout(CONNECT_TIMEOUT);
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{path}", self.base_url)
    }
}

fn file_part(asset: LocalAsset) -> Result<Part> {
    let LocalAsset {
        file_name,
        mime_type,
        bytes,
    } = asset;
    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(&mime_type)
        .with_context(|| format!("invalid mime type '{mime_type}'"))
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError {
        status: status.as_u16(),
        message: error_message(status, &body),
    }
    .into())
}

pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        if !parsed.error.is_empty() {
            return parsed.error;
        }
    }
    let text = body.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[async_trait]
impl CourseBackend for HttpCourseBackend {
    async fn fetch_course(&self, course_id: &CourseId) -> Result<Option<CourseRecord>> {
        let response = self
            .http
            .get(self.url(&course_route(course_id)))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            info!(course_id = %course_id, "course not found");
            return Ok(None);
        }

        let envelope: CourseEnvelope = ensure_success(response)
            .await?
            .json()
            .await
            .context("invalid course payload from server")?;
        debug!(
            course_id = %course_id,
            modules = envelope.course.modules.len(),
            "course fetched"
        );
        Ok(Some(envelope.course))
    }

    async fn upload_video(&self, upload: VideoUpload) -> Result<UploadedVideo> {
        let field = upload.field;
        let size_bytes = upload.asset.size_bytes();
        let form = Form::new()
            .text("title", upload.title)
            .part(field.as_str(), file_part(upload.asset)?);

        let response: VideoUploadResponse = ensure_success(
            self.http
                .post(self.url(VIDEOS_ROUTE))
                .multipart(form)
                .send()
                .await?,
        )
        .await?
        .json()
        .await
        .context("invalid video upload response from server")?;

        debug!(field = field.as_str(), size_bytes, "asset uploaded");
        Ok(response.video.unwrap_or_default())
    }

    async fn upload_document(&self, asset: LocalAsset) -> Result<DocumentUploadResponse> {
        let size_bytes = asset.size_bytes();
        let form = Form::new().part("document", file_part(asset)?);

        let response: DocumentUploadResponse = ensure_success(
            self.http
                .post(self.url(DOCUMENTS_ROUTE))
                .multipart(form)
                .send()
                .await?,
        )
        .await?
        .json()
        .await
        .context("invalid document upload response from server")?;

        debug!(
            size_bytes,
            document_type = response.document_type.as_deref().unwrap_or_default(),
            "document uploaded"
        );
        Ok(response)
    }

    async fn update_course(
        &self,
        course_id: &CourseId,
        request: &UpdateCourseRequest,
    ) -> Result<()> {
        ensure_success(
            self.http
                .put(self.url(&course_route(course_id)))
                .json(request)
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
