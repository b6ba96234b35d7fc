use super::actions::{Clipboard, Speaker};
use super::export;
use super::state::{render, ClientState, DisplayedQuote, View};
use crate::error::ClientError;
use crate::models::{Category, GenerateRequest, ServerEnvelope, DEFAULT_PORT};
use reqwest::{Client, Url};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Result of pressing the generate button.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// A request ran; carries the state it settled in.
    Completed(super::state::UiState),
    /// Another request was already in flight, so nothing was sent.
    Ignored,
}

/// Drives the generate / copy / speak / export actions against the relay.
pub struct QuoteController {
    client: Client,
    base_url: String,
    server_port: u16,
    timeout: Duration,
    with_image: bool,
    speaker: Option<Arc<dyn Speaker>>,
    state: Mutex<ClientState>,
}

/// Settles a request that is still `Loading` when `generate` is dropped
/// before it finishes.
struct InFlight<'a> {
    controller: &'a QuoteController,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("Generate abandoned before the response arrived");
            self.controller.lock().complete(Err(ClientError::Cancelled));
        }
    }
}

impl QuoteController {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::new_with_client(base_url, Client::new())
    }

    pub fn new_with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let server_port = Url::parse(&base_url)
            .ok()
            .and_then(|u| u.port_or_known_default())
            .unwrap_or(DEFAULT_PORT);

        Self {
            client,
            base_url,
            server_port,
            timeout: DEFAULT_TIMEOUT,
            with_image: false,
            speaker: None,
            state: Mutex::new(ClientState::new()),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Request a background image alongside each quote.
    pub fn with_images(mut self, with_image: bool) -> Self {
        self.with_image = with_image;
        self
    }

    /// Speech output used by [`Self::toggle_speech`].
    pub fn with_speaker(mut self, speaker: Arc<dyn Speaker>) -> Self {
        self.speaker = Some(speaker);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ClientState> {
        // State stays consistent across a panic in a renderer, so keep going.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> ClientState {
        self.lock().clone()
    }

    pub fn view(&self, now: Instant) -> View {
        render(&self.lock(), now)
    }

    /// Request a new quote. A call made while another is in flight returns
    /// [`Trigger::Ignored`] without touching the network. Any speech in
    /// progress is stopped. Dropping the returned future settles the state
    /// with [`ClientError::Cancelled`].
    pub async fn generate(&self, category: Category) -> Trigger {
        {
            let mut state = self.lock();
            let was_speaking = state.is_speaking();
            if !state.begin_request() {
                debug!("Generate ignored: request already in flight");
                return Trigger::Ignored;
            }
            if was_speaking {
                if let Some(speaker) = &self.speaker {
                    speaker.cancel();
                }
            }
        }
        let mut in_flight = InFlight {
            controller: self,
            settled: false,
        };

        let outcome = match tokio::time::timeout(self.timeout, self.fetch(category)).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout),
        };

        if let Err(e) = &outcome {
            error!("Quote generation error: {}", e);
        }

        let mut state = self.lock();
        state.complete(outcome);
        in_flight.settled = true;
        Trigger::Completed(state.ui().clone())
    }

    async fn fetch(&self, category: Category) -> Result<DisplayedQuote, ClientError> {
        let endpoint = if self.with_image {
            "generate-with-image"
        } else {
            "generate"
        };
        let url = format!("{}/{}", self.base_url, endpoint);
        let body = GenerateRequest {
            category: Some(category.as_str().to_string()),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.classify_transport(e))?;
        let envelope = serde_json::from_str::<ServerEnvelope>(&text).ok();

        if !status.is_success() {
            let message = envelope
                .and_then(|e| e.error)
                .unwrap_or_else(|| format!("Server error: {}", status.as_u16()));
            return Err(ClientError::Server(message));
        }

        let envelope = envelope.ok_or(ClientError::MissingQuote)?;
        if let Some(message) = envelope.error {
            return Err(ClientError::Server(message));
        }

        let quote = envelope
            .quote
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .ok_or(ClientError::MissingQuote)?;

        Ok(DisplayedQuote {
            quote,
            image_url: envelope.image_url.filter(|u| !u.is_empty()),
            category: envelope
                .category
                .map(|c| Category::from_input(Some(&c)))
                .unwrap_or(category),
        })
    }

    fn classify_transport(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_connect() {
            ClientError::Connect {
                port: self.server_port,
            }
        } else {
            warn!("Request to quote server failed: {}", e);
            ClientError::Request
        }
    }

    /// Signal that the background image finished loading.
    pub fn image_loaded(&self) {
        self.lock().mark_image_loaded();
    }

    /// Copy the displayed quote. Returns whether anything was copied.
    pub fn copy_quote(&self, clipboard: &dyn Clipboard) -> bool {
        let mut state = self.lock();
        let Some(text) = state.current_quote().map(|d| d.quote.clone()) else {
            return false;
        };

        let copied = match clipboard.write_text(&text) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to copy: {}", e);
                false
            }
        };
        state.record_copy(copied, Instant::now());
        copied
    }

    /// Start reading the displayed quote aloud, or stop if already speaking.
    /// Does nothing without a configured speaker.
    pub fn toggle_speech(&self) {
        let Some(speaker) = &self.speaker else {
            return;
        };
        let mut state = self.lock();
        if state.is_speaking() {
            speaker.cancel();
            state.set_speaking(false);
            return;
        }

        let Some(text) = state.current_quote().map(|d| d.quote.clone()) else {
            return;
        };
        match speaker.speak(&text) {
            Ok(()) => state.set_speaking(true),
            Err(e) => warn!("Speech playback failed: {}", e),
        }
    }

    /// Playback reached the end on its own.
    pub fn speech_finished(&self) {
        self.lock().set_speaking(false);
    }

    /// Save a card for the displayed quote into `dir`. `None` when no quote
    /// is displayed.
    pub fn export_card(&self, dir: &Path) -> crate::Result<Option<PathBuf>> {
        let displayed = self.lock().current_quote().cloned();
        displayed
            .map(|d| export::save_card(&d, dir))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::actions::{MemoryClipboard, RecordingSpeaker};
    use crate::client::state::UiState;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount(server: &MockServer, route: &str, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(template)
            .mount(server)
            .await;
    }

    fn error_message(trigger: Trigger) -> String {
        match trigger {
            Trigger::Completed(UiState::Error(message)) => message,
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_transitions_to_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .and(body_json(serde_json::json!({ "category": "courage" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "quote": "Be brave. — Anon" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let controller = QuoteController::new(server.uri());
        let trigger = controller.generate(Category::Courage).await;

        assert_eq!(
            trigger,
            Trigger::Completed(UiState::Success(DisplayedQuote {
                quote: "Be brave. — Anon".to_string(),
                image_url: None,
                category: Category::Courage,
            }))
        );
    }

    #[tokio::test]
    async fn test_image_variant_reads_image_and_category() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/generate-with-image",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "quote": "Hope is a waking dream.",
                "imageUrl": "https://img.test/hope.jpg",
                "category": "hope"
            })),
        )
        .await;

        let controller = QuoteController::new(server.uri()).with_images(true);
        controller.generate(Category::Hope).await;

        let state = controller.state();
        let displayed = state.current_quote().unwrap();
        assert_eq!(displayed.image_url.as_deref(), Some("https://img.test/hope.jpg"));
        assert_eq!(displayed.category, Category::Hope);
    }

    #[tokio::test]
    async fn test_error_status_uses_body_message() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/generate",
            ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": "API quota exceeded. Please try again later."
            })),
        )
        .await;

        let controller = QuoteController::new(server.uri());
        let message = error_message(controller.generate(Category::General).await);
        assert_eq!(message, "API quota exceeded. Please try again later.");
    }

    #[tokio::test]
    async fn test_unparseable_error_body_falls_back_to_status() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/generate",
            ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"),
        )
        .await;

        let controller = QuoteController::new(server.uri());
        let message = error_message(controller.generate(Category::General).await);
        assert_eq!(message, "Server error: 502");
    }

    #[tokio::test]
    async fn test_error_field_with_success_status_is_error() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/generate",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "quote": "ignored",
                "error": "Something odd happened"
            })),
        )
        .await;

        let controller = QuoteController::new(server.uri());
        let message = error_message(controller.generate(Category::General).await);
        assert_eq!(message, "Something odd happened");
    }

    #[tokio::test]
    async fn test_blank_quote_is_error() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/generate",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "quote": "   " })),
        )
        .await;

        let controller = QuoteController::new(server.uri());
        let message = error_message(controller.generate(Category::General).await);
        assert_eq!(message, "No quote received from server");
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/generate",
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "quote": "Too late." }))
                .set_delay(Duration::from_millis(500)),
        )
        .await;

        let controller =
            QuoteController::new(server.uri()).with_timeout(Duration::from_millis(50));
        let message = error_message(controller.generate(Category::General).await);
        assert_eq!(message, "Request timeout — please try again");
    }

    #[tokio::test]
    async fn test_unreachable_server_reports_connect_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let controller = QuoteController::new(format!("http://127.0.0.1:{}", port));
        let message = error_message(controller.generate(Category::General).await);
        assert_eq!(
            message,
            format!(
                "Cannot connect to server. Make sure the server is running on port {}.",
                port
            )
        );
    }

    #[test]
    fn test_default_port_in_connect_message() {
        let controller = QuoteController::new(DEFAULT_SERVER_URL);
        assert_eq!(controller.server_port, 3000);
    }

    #[test]
    fn test_default_timeout_is_thirty_seconds() {
        let controller = QuoteController::new(DEFAULT_SERVER_URL);
        assert_eq!(controller.timeout, Duration::from_secs(30));
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_dropped_generate_does_not_wedge_loading() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "quote": "Try again." }))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let controller = QuoteController::new(server.uri());

        // The caller gives up long before the server answers.
        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            controller.generate(Category::General),
        )
        .await;
        assert!(abandoned.is_err());
        assert_eq!(
            controller.state().ui(),
            &UiState::Error("Request cancelled — please try again".to_string())
        );
        assert!(controller.view(Instant::now()).button_enabled);

        let next = controller.generate(Category::General).await;
        assert_ne!(next, Trigger::Ignored);
        assert!(matches!(next, Trigger::Completed(UiState::Success(_))));
    }

    #[tokio::test]
    async fn test_trigger_while_loading_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "quote": "Once." }))
                    .set_delay(Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let controller = Arc::new(QuoteController::new(server.uri()));

        let first = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.generate(Category::General).await })
        };
        // Let the first request enter Loading.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(controller.state().is_loading());

        let second = controller.generate(Category::Hope).await;
        assert_eq!(second, Trigger::Ignored);

        let first = first.await.unwrap();
        assert!(matches!(first, Trigger::Completed(UiState::Success(_))));
    }

    #[tokio::test]
    async fn test_copy_and_speech_use_displayed_quote() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/generate",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "quote": "Keep going." })),
        )
        .await;

        let speaker = RecordingSpeaker::new();
        let controller =
            QuoteController::new(server.uri()).with_speaker(Arc::new(speaker.clone()));
        let clipboard = MemoryClipboard::new();

        // Nothing displayed yet.
        assert!(!controller.copy_quote(&clipboard));
        controller.toggle_speech();
        assert!(speaker.spoken().is_empty());

        controller.generate(Category::Perseverance).await;

        assert!(controller.copy_quote(&clipboard));
        assert_eq!(clipboard.contents().as_deref(), Some("Keep going."));
        assert_eq!(controller.view(Instant::now()).copy_label, "✓ Copied!");

        controller.toggle_speech();
        assert!(controller.state().is_speaking());
        controller.toggle_speech();
        assert!(!controller.state().is_speaking());
        assert_eq!(speaker.spoken(), vec!["Keep going."]);
        assert_eq!(speaker.cancel_count(), 1);

        // Auxiliary actions leave the generation state alone.
        assert!(matches!(controller.state().ui(), UiState::Success(_)));
    }

    #[tokio::test]
    async fn test_speech_finishing_restores_speak_label() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/generate",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "quote": "Breathe." })),
        )
        .await;

        let speaker = RecordingSpeaker::new();
        let controller =
            QuoteController::new(server.uri()).with_speaker(Arc::new(speaker.clone()));
        controller.generate(Category::Hope).await;

        controller.toggle_speech();
        assert_eq!(controller.view(Instant::now()).speak_label, "Stop");
        controller.speech_finished();
        assert_eq!(controller.view(Instant::now()).speak_label, "Speak");

        // Playback ended by itself, so the next press speaks again.
        controller.toggle_speech();
        assert_eq!(speaker.spoken(), vec!["Breathe.", "Breathe."]);
        assert_eq!(speaker.cancel_count(), 0);
    }

    #[tokio::test]
    async fn test_new_request_cancels_active_speech() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/generate",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "quote": "Onward." })),
        )
        .await;

        let speaker = RecordingSpeaker::new();
        let controller =
            QuoteController::new(server.uri()).with_speaker(Arc::new(speaker.clone()));
        controller.generate(Category::General).await;
        controller.toggle_speech();
        assert!(controller.state().is_speaking());

        controller.generate(Category::General).await;

        assert!(!controller.state().is_speaking());
        assert_eq!(controller.view(Instant::now()).speak_label, "Speak");
        assert_eq!(speaker.cancel_count(), 1);
    }

    #[tokio::test]
    async fn test_copy_failure_is_reported() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/generate",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "quote": "Rise." })),
        )
        .await;

        let controller = QuoteController::new(server.uri());
        controller.generate(Category::General).await;

        assert!(!controller.copy_quote(&MemoryClipboard::unavailable()));
        assert_eq!(controller.view(Instant::now()).copy_label, "Copy failed");
        assert!(matches!(controller.state().ui(), UiState::Success(_)));
    }

    #[tokio::test]
    async fn test_export_requires_displayed_quote() {
        let dir = tempfile::tempdir().unwrap();
        let controller = QuoteController::new(DEFAULT_SERVER_URL);
        assert!(controller.export_card(dir.path()).unwrap().is_none());
    }
}
