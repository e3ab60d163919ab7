// src/services/view_model.rs
use std::{
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::sync::watch;
use tracing::warn;
use uuid::Uuid;

use crate::message::PredictionRequest;
use crate::services::coercion::{parse_float, parse_int};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

impl Severity {
    pub fn glyph(self) -> &'static str {
        match self {
            Severity::Info => "ℹ",
            Severity::Warning => "⚠",
            Severity::Error => "✖",
            Severity::Success => "✔",
        }
    }
}

/// One transcript entry. Never mutated once appended.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    /// Set for system messages only.
    pub severity: Option<Severity>,
    /// May carry inline markup (`<strong>`, `<br>`, `<small>`).
    pub text: String,
}

impl ChatMessage {
    fn new(role: Role, severity: Option<Severity>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            severity,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, None, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, None, text)
    }

    pub fn system(severity: Severity, text: impl Into<String>) -> Self {
        Self::new(Role::System, Some(severity), text)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadingIndicator {
    pub visible: bool,
    pub shown: u64,
    pub hidden: u64,
}

impl LoadingIndicator {
    fn show(&mut self) {
        self.visible = true;
        self.shown += 1;
    }

    fn hide(&mut self) {
        self.visible = false;
        self.hidden += 1;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Input,
    Elsewhere,
}

pub const PANEL_BASE_CLASS: &str = "prediction-result";

/// The prediction result area: a style class plus marked-up body text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredictionPanel {
    pub class: String,
    pub body: String,
}

impl Default for PredictionPanel {
    fn default() -> Self {
        Self {
            class: PANEL_BASE_CLASS.to_string(),
            body: String::new(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown prediction field {0:?}")]
pub struct UnknownField(pub String);

/// Raw text of the nine prediction inputs, as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PredictionForm {
    pub day: String,
    pub month: String,
    pub year: String,
    pub hour: String,
    pub pt08_s1_co: String,
    pub c6h6_gt: String,
    pub pt08_s5_o3: String,
    pub pt08_s2_nmhc: String,
    pub pt08_s4_no2: String,
}

impl PredictionForm {
    pub const FIELD_IDS: [&'static str; 9] = [
        "day",
        "month",
        "year",
        "hour",
        "pt08_s1_co",
        "c6h6_gt",
        "pt08_s5_o3",
        "pt08_s2_nmhc",
        "pt08_s4_no2",
    ];

    fn field_mut(&mut self, id: &str) -> Option<&mut String> {
        Some(match id {
            "day" => &mut self.day,
            "month" => &mut self.month,
            "year" => &mut self.year,
            "hour" => &mut self.hour,
            "pt08_s1_co" => &mut self.pt08_s1_co,
            "c6h6_gt" => &mut self.c6h6_gt,
            "pt08_s5_o3" => &mut self.pt08_s5_o3,
            "pt08_s2_nmhc" => &mut self.pt08_s2_nmhc,
            "pt08_s4_no2" => &mut self.pt08_s4_no2,
            _ => return None,
        })
    }

    pub fn set_field(&mut self, id: &str, value: impl Into<String>) -> Result<(), UnknownField> {
        let slot = self
            .field_mut(id)
            .ok_or_else(|| UnknownField(id.to_string()))?;
        *slot = value.into();
        Ok(())
    }

    /// Coerces every field. Fields that are not numbers are forwarded as
    /// not-a-number, with a warning.
    pub fn to_request(&self) -> PredictionRequest {
        let int = |id: &str, raw: &str| {
            let v = parse_int(raw);
            if v.is_none() {
                warn!(field = id, raw, "prediction field is not an integer, sending null");
            }
            v
        };
        let float = |id: &str, raw: &str| {
            let v = parse_float(raw);
            if !v.is_finite() {
                warn!(field = id, raw, "prediction field is not a finite number, sending null");
            }
            v
        };

        PredictionRequest {
            day: int("day", &self.day),
            month: int("month", &self.month),
            year: int("year", &self.year),
            hour: int("hour", &self.hour),
            pt08_s1_co: float("pt08_s1_co", &self.pt08_s1_co),
            c6h6_gt: float("c6h6_gt", &self.c6h6_gt),
            pt08_s5_o3: float("pt08_s5_o3", &self.pt08_s5_o3),
            pt08_s2_nmhc: float("pt08_s2_nmhc", &self.pt08_s2_nmhc),
            pt08_s4_no2: float("pt08_s4_no2", &self.pt08_s4_no2),
        }
    }
}

/// Everything the display surface shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewModel {
    pub transcript: Vec<ChatMessage>,
    pub input: String,
    pub focus: Focus,
    pub loading: LoadingIndicator,
    pub form: PredictionForm,
    pub panel: PredictionPanel,
    pub revision: u64,
}

/// Shared handle to the view-model. Every mutation goes through
/// [`ViewHandle::update`], which serializes writers and bumps the revision
/// watched by renderers.
#[derive(Clone)]
pub struct ViewHandle {
    inner: Arc<Mutex<ViewModel>>,
    revisions: Arc<watch::Sender<u64>>,
}

impl Debug for ViewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewHandle")
            .field("revision", &*self.revisions.borrow())
            .finish()
    }
}

impl Default for ViewHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            inner: Arc::new(Mutex::new(ViewModel::default())),
            revisions: Arc::new(tx),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ViewModel> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut ViewModel) -> R) -> R {
        let (out, revision) = {
            let mut guard = self.lock();
            let out = f(&mut guard);
            guard.revision += 1;
            (out, guard.revision)
        };
        self.revisions.send_replace(revision);
        out
    }

    pub fn read<R>(&self, f: impl FnOnce(&ViewModel) -> R) -> R {
        f(&self.lock())
    }

    pub fn snapshot(&self) -> ViewModel {
        self.lock().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revisions.subscribe()
    }

    /// Append to the transcript and return its new length.
    pub fn append(&self, message: ChatMessage) -> usize {
        self.update(|vm| {
            vm.transcript.push(message);
            vm.transcript.len()
        })
    }
}

/// Shows the loading indicator for as long as it lives.
///
/// Dropping it hides the indicator, so every exit path of a submission
/// (success, failure, early return, unwind) clears it exactly once.
#[must_use = "the indicator is hidden as soon as the guard is dropped"]
pub struct LoadingGuard {
    view: ViewHandle,
}

impl LoadingGuard {
    pub fn show(view: &ViewHandle) -> Self {
        view.update(|vm| vm.loading.show());
        Self { view: view.clone() }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.view.update(|vm| vm.loading.hide());
    }
}
