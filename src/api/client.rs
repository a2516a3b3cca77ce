//! `HttpBackend` — reqwest implementation of [`StudioBackend`].
//!
//! All connection details come from [`ApiConfig`]; nothing is hardcoded.
//! Every request obtains a fresh bearer token from the injected
//! [`TokenProvider`] — short-lived credentials are never cached here.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart;

use crate::config::ApiConfig;

use super::auth::TokenProvider;
use super::backend::{ScriptGenParams, StudioBackend, TransportError};
use super::types::{
    AudioFileInfo, AudioLibraryResponse, GenerationRequest, ScriptResponse, TaskHandle,
    TaskResponse, UploadFile, VoiceProfile, VoiceUploadResponse, WireScriptLine,
};

// ---------------------------------------------------------------------------
// HttpBackend
// ---------------------------------------------------------------------------

/// Authenticated JSON/multipart transport over the backend's REST surface.
///
/// Stateless beyond the connection pool: no retry, no credential caching,
/// no response caching. Retries, when appropriate, belong to the caller
/// (the poller swallows transient errors; one-shot calls surface them).
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl HttpBackend {
    /// Build an `HttpBackend` from transport config and a token provider.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`. A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &ApiConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn bearer(&self) -> Result<String, TransportError> {
        self.tokens.access_token().await
    }

    /// Map a non-success response to [`TransportError::Status`], preferring
    /// the server's `detail` field over the bare status line.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("detail")
                .and_then(|d| d.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!("API error: {}", status.canonical_reason().unwrap_or("unknown"))
                }),
            Err(_) => format!("API error: {}", status.canonical_reason().unwrap_or("unknown")),
        };

        Err(TransportError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<T, TransportError> {
        let token = self.bearer().await?;
        let response = self
            .client
            .get(self.url(endpoint))
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let token = self.bearer().await?;
        let response = self
            .client
            .post(self.url(endpoint))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// POST a multipart form. No explicit content type: reqwest computes the
    /// multipart boundary itself and setting one would break it.
    async fn post_multipart<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        form: multipart::Form,
    ) -> Result<T, TransportError> {
        let token = self.bearer().await?;
        let response = self
            .client
            .post(self.url(endpoint))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn get_bytes(&self, endpoint: &str) -> Result<Vec<u8>, TransportError> {
        let token = self.bearer().await?;
        let response = self
            .client
            .get(self.url(endpoint))
            .bearer_auth(token)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn delete(&self, endpoint: &str) -> Result<(), TransportError> {
        let token = self.bearer().await?;
        let response = self
            .client
            .delete(self.url(endpoint))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// StudioBackend impl
// ---------------------------------------------------------------------------

#[async_trait]
impl StudioBackend for HttpBackend {
    async fn generate_script(
        &self,
        params: &ScriptGenParams,
    ) -> Result<ScriptResponse, TransportError> {
        let mut form = multipart::Form::new()
            .text("host_name", params.host_name.clone())
            .text("guest_name", params.guest_name.clone())
            .text("mode", params.mode.clone())
            .text("style", params.style.clone())
            .text("language", params.language.clone())
            .text("n_rounds", params.n_rounds.to_string());

        if let Some(text) = &params.text {
            form = form.text("text", text.clone());
        }
        if let Some(document) = &params.document {
            let part = multipart::Part::bytes(document.bytes.clone())
                .file_name(document.filename.clone());
            form = form.part("file", part);
        }

        self.post_multipart("/api/generate/script", form).await
    }

    async fn optimize_script(
        &self,
        lines: Vec<WireScriptLine>,
    ) -> Result<ScriptResponse, TransportError> {
        let body = serde_json::json!({ "script": lines });
        self.post_json("/api/optimize-script", &body).await
    }

    async fn submit_generation(
        &self,
        request: &GenerationRequest,
    ) -> Result<TaskHandle, TransportError> {
        let task: TaskResponse = self.post_json("/api/generate", request).await?;
        if task.task_id.is_empty() {
            return Err(TransportError::Decode("no task id in response".into()));
        }
        Ok(TaskHandle {
            task_id: task.task_id,
        })
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskResponse, TransportError> {
        self.get_json(&format!("/api/tasks/{task_id}")).await
    }

    async fn list_voices(&self) -> Result<Vec<VoiceProfile>, TransportError> {
        self.get_json("/api/voices").await
    }

    async fn upload_voice(
        &self,
        name: &str,
        file: &UploadFile,
    ) -> Result<VoiceProfile, TransportError> {
        let part =
            multipart::Part::bytes(file.bytes.clone()).file_name(file.filename.clone());
        let form = multipart::Form::new()
            .text("name", name.to_string())
            .part("file", part);

        let response: VoiceUploadResponse =
            self.post_multipart("/api/voices/upload", form).await?;
        Ok(response.voice)
    }

    async fn delete_voice(&self, voice_id: &str) -> Result<(), TransportError> {
        self.delete(&format!("/api/voices/{voice_id}")).await
    }

    async fn voice_sample(&self, voice_id: &str) -> Result<Vec<u8>, TransportError> {
        self.get_bytes(&format!("/api/voices/{voice_id}/sample")).await
    }

    async fn audio_library(&self) -> Result<Vec<AudioFileInfo>, TransportError> {
        let response: AudioLibraryResponse = self.get_json("/api/audio/library").await?;
        Ok(response.audio_files)
    }

    async fn fetch_audio(&self, filename: &str) -> Result<Vec<u8>, TransportError> {
        self.get_bytes(&format!("/api/audio/{filename}")).await
    }

    async fn delete_audio(&self, filename: &str) -> Result<(), TransportError> {
        self.delete(&format!("/api/audio/{filename}")).await
    }

    async fn health(&self) -> Result<(), TransportError> {
        let _: serde_json::Value = self.get_json("/api/health").await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::StaticTokenProvider;

    fn make_backend(base_url: &str) -> HttpBackend {
        let config = ApiConfig {
            base_url: base_url.into(),
            timeout_secs: 5,
        };
        HttpBackend::from_config(&config, Arc::new(StaticTokenProvider::new("test-token")))
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _backend = make_backend("http://localhost:8000");
    }

    #[test]
    fn trailing_slash_is_normalised() {
        let backend = make_backend("http://localhost:8000/");
        assert_eq!(backend.url("/api/voices"), "http://localhost:8000/api/voices");
    }

    #[test]
    fn url_joins_endpoint() {
        let backend = make_backend("https://studio.example.com");
        assert_eq!(
            backend.url("/api/tasks/abc"),
            "https://studio.example.com/api/tasks/abc"
        );
    }

    /// Verify that `HttpBackend` is usable as `dyn StudioBackend`.
    #[test]
    fn backend_is_object_safe() {
        let backend: Box<dyn StudioBackend> = Box::new(make_backend("http://localhost:8000"));
        drop(backend);
    }
}
