use super::theme::{self, Gradient};
use crate::error::ClientError;
use crate::models::Category;
use std::time::{Duration, Instant};

/// How long the copy button shows its confirmation.
pub const COPY_CONFIRMATION: Duration = Duration::from_secs(2);
/// Opacity of a loaded background image.
pub const IMAGE_OPACITY: f32 = 0.3;

pub const GENERATE_LABEL: &str = "Generate Quote";
pub const GENERATING_LABEL: &str = "Generating...";

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedQuote {
    pub quote: String,
    pub image_url: Option<String>,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Success(DisplayedQuote),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CopyFeedback {
    Copied(Instant),
    Failed,
}

/// Everything the client shows, in one place.
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    ui: UiState,
    image_loaded: bool,
    speaking: bool,
    copy_feedback: Option<CopyFeedback>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.ui, UiState::Loading)
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn current_quote(&self) -> Option<&DisplayedQuote> {
        match &self.ui {
            UiState::Success(displayed) => Some(displayed),
            _ => None,
        }
    }

    /// Enter `Loading`. Returns false, changing nothing, if a request is
    /// already in flight.
    pub fn begin_request(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        self.ui = UiState::Loading;
        self.image_loaded = false;
        self.speaking = false;
        self.copy_feedback = None;
        true
    }

    /// Leave `Loading` with the request outcome. Ignored in any other state.
    pub fn complete(&mut self, outcome: Result<DisplayedQuote, ClientError>) {
        if !self.is_loading() {
            return;
        }
        self.ui = match outcome {
            Ok(displayed) => UiState::Success(displayed),
            Err(e) => UiState::Error(e.to_string()),
        };
    }

    pub fn mark_image_loaded(&mut self) {
        if let UiState::Success(DisplayedQuote {
            image_url: Some(_),
            ..
        }) = &self.ui
        {
            self.image_loaded = true;
        }
    }

    pub fn record_copy(&mut self, copied: bool, at: Instant) {
        self.copy_feedback = Some(if copied {
            CopyFeedback::Copied(at)
        } else {
            CopyFeedback::Failed
        });
    }

    pub fn set_speaking(&mut self, speaking: bool) {
        self.speaking = speaking;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageView {
    Hidden,
    /// URL assigned but not yet loaded; nothing is drawn.
    Pending { url: String },
    Shown { url: String, opacity: f32 },
}

/// What a front-end should draw for a given [`ClientState`].
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub spinner_visible: bool,
    pub button_label: &'static str,
    pub button_enabled: bool,
    pub quote_text: Option<String>,
    pub error_text: Option<String>,
    pub actions_visible: bool,
    pub copy_label: &'static str,
    pub speak_label: &'static str,
    pub image: ImageView,
    pub theme: Option<Gradient>,
}

pub fn render(state: &ClientState, now: Instant) -> View {
    let loading = state.is_loading();

    let copy_label = match state.copy_feedback {
        Some(CopyFeedback::Copied(at)) if now.saturating_duration_since(at) < COPY_CONFIRMATION => {
            "✓ Copied!"
        }
        Some(CopyFeedback::Failed) => "Copy failed",
        _ => "Copy",
    };

    let mut view = View {
        spinner_visible: loading,
        button_label: if loading {
            GENERATING_LABEL
        } else {
            GENERATE_LABEL
        },
        button_enabled: !loading,
        quote_text: None,
        error_text: None,
        actions_visible: false,
        copy_label,
        speak_label: if state.speaking { "Stop" } else { "Speak" },
        image: ImageView::Hidden,
        theme: None,
    };

    match &state.ui {
        UiState::Idle | UiState::Loading => {}
        UiState::Success(displayed) => {
            view.quote_text = Some(displayed.quote.clone());
            view.actions_visible = true;
            view.theme = Some(theme::gradient(displayed.category));
            view.image = match &displayed.image_url {
                None => ImageView::Hidden,
                Some(url) if state.image_loaded => ImageView::Shown {
                    url: url.clone(),
                    opacity: IMAGE_OPACITY,
                },
                Some(url) => ImageView::Pending { url: url.clone() },
            };
        }
        UiState::Error(message) => {
            view.error_text = Some(format!("❌ Error: {}", message));
        }
    }

    view
}
