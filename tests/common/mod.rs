#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use air_quality_console::error::ClientError;
use air_quality_console::message::{
    HealthStatus, PredictionRequest, PredictionResponse, QueryRequest, QueryResponse, StatsQuery,
    StatsResponse,
};
use air_quality_console::services::api_client::Backend;
use async_trait::async_trait;
use axum::Router;
use tokio::sync::Notify;

/// What a scripted endpoint answers.
#[derive(Clone, Debug)]
pub enum Reply<T> {
    Json(T),
    /// Body is not JSON (proxy error page, connection reset mid-body...).
    NotJson,
    /// JSON, but the wrong shape.
    WrongShape,
}

impl<T: Clone> Reply<T> {
    fn produce(&self) -> Result<T, ClientError> {
        match self {
            Reply::Json(value) => Ok(value.clone()),
            Reply::NotJson => Err(ClientError::Decode(
                serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
            )),
            Reply::WrongShape => Err(ClientError::UnexpectedShape(
                serde_json::from_str::<bool>("\"yes\"").unwrap_err(),
            )),
        }
    }
}

pub struct FakeBackend {
    pub health: Reply<HealthStatus>,
    pub query: Reply<QueryResponse>,
    pub predict: Reply<PredictionResponse>,
    pub stats: Reply<StatsResponse>,
    /// When set, `query` waits for a permit before answering.
    pub gate: Option<Arc<Notify>>,
    pub calls: Mutex<Vec<&'static str>>,
    pub queries: Mutex<Vec<QueryRequest>>,
    pub predictions: Mutex<Vec<PredictionRequest>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            health: Reply::Json(HealthStatus {
                ai_handler: Some("available".into()),
                status: Some("healthy".into()),
                version: Some("1.0.0".into()),
            }),
            query: Reply::Json(QueryResponse {
                success: true,
                response: Some("Chất lượng không khí tốt.".into()),
            }),
            predict: Reply::Json(PredictionResponse::default()),
            stats: Reply::Json(StatsResponse::default()),
            gate: None,
            calls: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
            predictions: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.calls.lock().unwrap().push("health");
        self.health.produce()
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError> {
        self.calls.lock().unwrap().push("query");
        self.queries.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.query.produce()
    }

    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, ClientError> {
        self.calls.lock().unwrap().push("predict");
        self.predictions.lock().unwrap().push(request.clone());
        self.predict.produce()
    }

    async fn statistics(&self, _query: &StatsQuery) -> Result<StatsResponse, ClientError> {
        self.calls.lock().unwrap().push("statistics");
        self.stats.produce()
    }
}

/// Serves `router` on an ephemeral localhost port and returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A localhost URL nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub const SAMPLE_FORM: [(&str, &str); 9] = [
    ("day", "1"),
    ("month", "5"),
    ("year", "2004"),
    ("hour", "8"),
    ("pt08_s1_co", "120"),
    ("c6h6_gt", "5.3"),
    ("pt08_s5_o3", "45.2"),
    ("pt08_s2_nmhc", "220.7"),
    ("pt08_s4_no2", "34.1"),
];
