pub mod api_client;
pub mod coercion;
pub mod controller;
pub mod levels;
pub mod locale;
pub mod view_model;
