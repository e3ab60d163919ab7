use std::{sync::Arc, time::Duration};

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::{
    error::ClientError,
    message::{PredictionRequest, PredictionResponse, QueryRequest, StatsQuery},
    services::{
        api_client::Backend,
        levels::{MAX_LEVEL, style_for_level},
        locale::Locale,
        view_model::{
            ChatMessage, Focus, LoadingGuard, PANEL_BASE_CLASS, PredictionPanel, Severity,
            UnknownField, ViewHandle,
        },
    },
    state::{AppState, SharedState},
};

/// How a submission ended. Every submission goes
/// `idle -> pending -> Success | Error`; `Skipped` never left idle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settled {
    Skipped,
    Success,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub focus: Focus,
}

/// A chat query that has been echoed to the transcript and is waiting on the
/// backend. Holds the loading indicator until it is dropped.
pub struct PendingQuery {
    id: Uuid,
    request: QueryRequest,
    _loading: LoadingGuard,
}

/// A prediction whose panel already shows the placeholder.
pub struct PendingPrediction {
    id: Uuid,
    request: PredictionRequest,
}

pub struct PendingStats {
    id: Uuid,
    query: StatsQuery,
    _loading: LoadingGuard,
}

pub struct UiController<B> {
    state: SharedState<B>,
}

impl<B> Clone for UiController<B> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<B: Backend + 'static> UiController<B> {
    pub fn new(backend: B, locale: Locale) -> Self {
        Self {
            state: Arc::new(AppState::new(backend, locale)),
        }
    }

    pub fn view(&self) -> &ViewHandle {
        &self.state.view
    }

    pub fn backend(&self) -> &B {
        &self.state.backend
    }

    fn system(&self, severity: Severity, text: &str) -> usize {
        self.view().append(ChatMessage::system(severity, text))
    }

    /// One-shot startup probe. Never fails outward; problems become a
    /// banner in the transcript.
    pub async fn check_system_health(&self) {
        let strings = self.state.strings;
        match self.state.backend.health().await {
            Ok(health) => {
                debug!(status = ?health.status, version = ?health.version, ai_handler = ?health.ai_handler, "health check");
                if health.ai_unavailable() {
                    warn!("backend reports the AI handler as unavailable");
                    self.system(Severity::Warning, strings.ai_unavailable);
                }
            }
            Err(ClientError::UnexpectedShape(e)) => {
                warn!(error = %e, "health payload has an unexpected shape");
            }
            Err(e) => {
                error!(error = %e, "health check failed");
                self.system(Severity::Error, strings.server_unreachable);
            }
        }
    }

    pub fn set_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.view().update(|vm| vm.input = text);
    }

    /// Synchronous half of [`send_message`](Self::send_message): echoes the
    /// trimmed input, clears the field and shows the loading indicator.
    /// Returns `None` for blank input.
    pub fn begin_send(&self) -> Option<PendingQuery> {
        let message = self.view().update(|vm| {
            let message = vm.input.trim().to_string();
            if message.is_empty() {
                return None;
            }
            vm.transcript.push(ChatMessage::user(message.clone()));
            vm.input.clear();
            Some(message)
        })?;

        Some(PendingQuery {
            id: Uuid::new_v4(),
            request: QueryRequest { message },
            _loading: LoadingGuard::show(self.view()),
        })
    }

    pub async fn complete_send(&self, pending: PendingQuery) -> Settled {
        let span = info_span!("chat", id = %pending.id);
        async move {
            info!(chars = pending.request.message.chars().count(), "sending query");
            let strings = self.state.strings;
            let settled = match self.state.backend.query(&pending.request).await {
                Ok(resp) if resp.success => {
                    self.view()
                        .append(ChatMessage::assistant(resp.response.unwrap_or_default()));
                    Settled::Success
                }
                Ok(_) => {
                    warn!("backend flagged the query as failed");
                    self.system(Severity::Error, strings.query_failed);
                    Settled::Error
                }
                Err(ClientError::UnexpectedShape(e)) => {
                    warn!(error = %e, "query response has an unexpected shape");
                    self.system(Severity::Error, strings.query_failed);
                    Settled::Error
                }
                Err(e) => {
                    error!(error = %e, "query failed");
                    self.system(Severity::Error, strings.send_failed);
                    Settled::Error
                }
            };
            // Hides the loading indicator.
            drop(pending);
            settled
        }
        .instrument(span)
        .await
    }

    pub async fn send_message(&self) -> Settled {
        match self.begin_send() {
            Some(pending) => self.complete_send(pending).await,
            None => Settled::Skipped,
        }
    }

    pub fn set_form_field(&self, id: &str, value: impl Into<String>) -> Result<(), UnknownField> {
        let value = value.into();
        self.view().update(|vm| vm.form.set_field(id, value))
    }

    /// Synchronous half of [`make_prediction`](Self::make_prediction): reads
    /// the form and puts the placeholder in the panel.
    pub fn begin_prediction(&self) -> PendingPrediction {
        let placeholder = self.state.strings.predicting;
        let request = self.view().update(|vm| {
            let request = vm.form.to_request();
            vm.panel.body = placeholder.to_string();
            request
        });
        PendingPrediction {
            id: Uuid::new_v4(),
            request,
        }
    }

    pub async fn complete_prediction(&self, pending: PendingPrediction) -> Settled {
        let span = info_span!("prediction", id = %pending.id);
        async move {
            info!(at = %pending.request.timestamp_label(), "requesting prediction");
            let strings = self.state.strings;
            match self.state.backend.predict(&pending.request).await {
                Ok(PredictionResponse {
                    success: true,
                    prediction: Some(prediction),
                }) => {
                    let level = prediction.pollution_level;
                    let style = style_for_level(level);
                    if !(0..=MAX_LEVEL).contains(&level) {
                        warn!(level, "pollution level outside the known range");
                    }
                    info!(level, class = style.class, "prediction rendered");

                    self.view().update(|vm| {
                        vm.panel = PredictionPanel {
                            class: format!("{PANEL_BASE_CLASS} {}", style.class),
                            body: format!(
                                "{} <strong>{}: {}</strong><br><small>{}: {level}/{MAX_LEVEL}</small>",
                                style.icon, strings.pollution_level, prediction.description, strings.index,
                            ),
                        };
                        vm.transcript.push(ChatMessage::assistant(format!(
                            "{}: {} <strong>{}</strong> ({level}/{MAX_LEVEL})",
                            strings.prediction_result, style.icon, prediction.description,
                        )));
                    });
                    Settled::Success
                }
                Ok(_) => {
                    warn!("backend returned no prediction");
                    self.fail_panel(strings.prediction_failed);
                    Settled::Error
                }
                Err(ClientError::UnexpectedShape(e)) => {
                    warn!(error = %e, "prediction response has an unexpected shape");
                    self.fail_panel(strings.prediction_failed);
                    Settled::Error
                }
                Err(e) => {
                    error!(error = %e, "prediction request failed");
                    self.fail_panel(strings.prediction_unreachable);
                    Settled::Error
                }
            }
        }
        .instrument(span)
        .await
    }

    fn fail_panel(&self, text: &str) {
        self.view().update(|vm| {
            vm.panel = PredictionPanel {
                class: PANEL_BASE_CLASS.to_string(),
                body: text.to_string(),
            };
        });
    }

    pub async fn make_prediction(&self) -> Settled {
        let pending = self.begin_prediction();
        self.complete_prediction(pending).await
    }

    pub fn begin_statistics(&self, query: StatsQuery) -> PendingStats {
        let label = format!(
            "{} {}: {}/{} → {}/{}/{}",
            self.state.strings.stats_request,
            query.stat_type,
            query.start_day,
            query.start_month,
            query.end_day,
            query.end_month,
            query.year,
        );
        self.view().append(ChatMessage::user(label));
        PendingStats {
            id: Uuid::new_v4(),
            query,
            _loading: LoadingGuard::show(self.view()),
        }
    }

    pub async fn complete_statistics(&self, pending: PendingStats) -> Settled {
        let span = info_span!("statistics", id = %pending.id, stat_type = %pending.query.stat_type);
        async move {
            let strings = self.state.strings;
            let settled = match self.state.backend.statistics(&pending.query).await {
                Ok(resp) if resp.success => {
                    let summary = resp
                        .statistics
                        .as_ref()
                        .map(summarize_statistics)
                        .unwrap_or_default();
                    self.view().append(ChatMessage::assistant(summary));
                    Settled::Success
                }
                Ok(_) => {
                    warn!("backend flagged the statistics request as failed");
                    self.system(Severity::Error, strings.stats_failed);
                    Settled::Error
                }
                Err(ClientError::UnexpectedShape(e)) => {
                    warn!(error = %e, "statistics response has an unexpected shape");
                    self.system(Severity::Error, strings.stats_failed);
                    Settled::Error
                }
                Err(e) => {
                    error!(error = %e, "statistics request failed");
                    self.system(Severity::Error, strings.stats_unreachable);
                    Settled::Error
                }
            };
            drop(pending);
            settled
        }
        .instrument(span)
        .await
    }

    pub async fn fetch_statistics(&self, query: StatsQuery) -> Settled {
        let pending = self.begin_statistics(query);
        self.complete_statistics(pending).await
    }

    pub fn show_sample_queries(&self) {
        let strings = self.state.strings;
        let mut text = strings.sample_intro.to_string();
        for sample in strings.samples {
            text.push_str(&format!("<br>• \"{sample}\""));
        }
        self.system(Severity::Info, &text);
    }

    /// Emits the sample-queries hint once, after `delay`.
    pub fn schedule_sample_queries(&self, delay: Duration) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.show_sample_queries();
        })
    }

    /// Enter in the input field sends, Ctrl+Enter sends from anywhere,
    /// Escape clears the input and focuses it.
    pub async fn handle_key(&self, event: KeyEvent) -> Option<Settled> {
        match event.key {
            Key::Enter if event.ctrl || event.focus == Focus::Input => {
                Some(self.send_message().await)
            }
            Key::Escape => {
                self.view().update(|vm| {
                    vm.input.clear();
                    vm.focus = Focus::Input;
                });
                None
            }
            _ => None,
        }
    }
}

/// Flattens a statistics payload into one transcript line.
fn summarize_statistics(stats: &Value) -> String {
    if let Some(message) = stats.get("message").and_then(Value::as_str) {
        return message.to_string();
    }

    let stat_type = stats.get("stat_type").and_then(Value::as_str);
    let body = match stats.get("result").unwrap_or(stats) {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{k}: {}", scalar(v)))
            .collect::<Vec<_>>()
            .join("<br>"),
        other => scalar(other),
    };

    match stat_type {
        Some(stat_type) => format!("📊 <strong>{stat_type}</strong><br>{body}"),
        None => format!("📊 {body}"),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{f:.2}"),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
