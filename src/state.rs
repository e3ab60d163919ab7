// src/state.rs
use std::sync::Arc;

use crate::services::locale::{Locale, Strings};
use crate::services::view_model::ViewHandle;

pub type SharedState<B> = Arc<AppState<B>>;

/// Application context, built once at startup and shared by every handler.
pub struct AppState<B> {
    pub backend: B,
    pub view: ViewHandle,
    pub strings: &'static Strings,
}

impl<B> AppState<B> {
    pub fn new(backend: B, locale: Locale) -> Self {
        Self {
            backend,
            view: ViewHandle::new(),
            strings: locale.strings(),
        }
    }
}
