//! Projects the view-model onto a line-oriented terminal.

use crate::services::view_model::{ChatMessage, PredictionPanel, Role, ViewModel};

/// Turns the inline markup used in messages into plain text.
pub fn flatten_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let Some(len) = rest[start..].find('>') else {
            out.push_str(&rest[start..]);
            return collapse(out);
        };
        let tag = rest[start + 1..start + len].trim().to_ascii_lowercase();
        match tag.trim_end_matches('/').trim() {
            "br" => out.push('\n'),
            "strong" | "/strong" => out.push('*'),
            "small" | "/small" => {}
            _ => out.push_str(&rest[start..start + len + 1]),
        }
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    collapse(out)
}

fn collapse(text: String) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_message(message: &ChatMessage) -> String {
    let prefix = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
        Role::System => message.severity.map_or("system", |s| s.glyph()),
    };
    let body = flatten_markup(&message.text);
    let indent = " ".repeat(prefix.chars().count() + 2);
    let mut lines = body.lines();
    let mut out = format!("{prefix}> {}", lines.next().unwrap_or_default());
    for line in lines {
        out.push('\n');
        out.push_str(&indent);
        out.push_str(line);
    }
    out
}

pub fn render_panel(panel: &PredictionPanel) -> String {
    format!("[{}] {}", panel.class, flatten_markup(&panel.body).replace('\n', " | "))
}

/// Remembers what has already been printed so each redraw only emits what
/// changed.
#[derive(Debug, Default)]
pub struct Renderer {
    printed: usize,
    loading_visible: bool,
    panel: PredictionPanel,
}

impl Renderer {
    pub fn drain(&mut self, vm: &ViewModel) -> Vec<String> {
        let mut out = Vec::new();

        if vm.loading.visible && !self.loading_visible {
            out.push("…".to_string());
        }
        self.loading_visible = vm.loading.visible;

        for message in vm.transcript.iter().skip(self.printed) {
            out.push(render_message(message));
        }
        self.printed = vm.transcript.len();

        if vm.panel != self.panel {
            if !vm.panel.body.is_empty() {
                out.push(render_panel(&vm.panel));
            }
            self.panel = vm.panel.clone();
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::view_model::Severity;

    #[test]
    fn flattens_inline_markup() {
        assert_eq!(
            flatten_markup("🟠 <strong>Ô nhiễm: cao</strong><br>\n   <small>Chỉ số: 2/4</small>"),
            "🟠 *Ô nhiễm: cao*\nChỉ số: 2/4"
        );
        assert_eq!(flatten_markup("a <br/> b"), "a\nb");
        assert_eq!(flatten_markup("x < y"), "x < y");
        assert_eq!(flatten_markup("<em>kept</em>"), "<em>kept</em>");
    }

    #[test]
    fn renders_roles() {
        assert_eq!(render_message(&ChatMessage::user("hi")), "you> hi");
        assert_eq!(
            render_message(&ChatMessage::system(Severity::Warning, "a<br>b")),
            "⚠> a\n   b"
        );
    }

    #[test]
    fn renderer_only_prints_new_state() {
        let mut vm = ViewModel::default();
        let mut renderer = Renderer::default();
        assert!(renderer.drain(&vm).is_empty());

        vm.transcript.push(ChatMessage::user("hello"));
        vm.loading.visible = true;
        assert_eq!(renderer.drain(&vm), vec!["…".to_string(), "you> hello".to_string()]);
        assert!(renderer.drain(&vm).is_empty());

        vm.loading.visible = false;
        vm.panel.body = "⏳".into();
        assert_eq!(renderer.drain(&vm), vec!["[prediction-result] ⏳".to_string()]);
    }
}
