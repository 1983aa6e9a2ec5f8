#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use movie_finder::{
    error::{AppError, AppResult},
    models::SortSpec,
    services::{
        AuthMode, CatalogClient, CatalogTransport, EndpointBuilder, QueryOrchestrator, RawResponse,
    },
};
use tokio::sync::oneshot;
use url::Url;

pub enum Reply {
    Now(AppResult<RawResponse>),
    Gated(oneshot::Receiver<RawResponse>),
}

/// Transport that records every request and answers from a script.
///
/// Once the script runs out it answers with a single-movie listing.
#[derive(Default)]
pub struct ScriptedTransport {
    requests: Mutex<Vec<(Url, Vec<(&'static str, String)>)>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn push_ok(&self, status: u16, body: impl Into<String>) {
        self.push(Reply::Now(Ok(RawResponse::new(status, body))));
    }

    pub fn push_err(&self, err: AppError) {
        self.push(Reply::Now(Err(err)));
    }

    /// Queues a reply that is held until the returned sender fires
    pub fn push_gated(&self) -> oneshot::Sender<RawResponse> {
        let (tx, rx) = oneshot::channel();
        self.push(Reply::Gated(rx));
        tx
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn url(&self, index: usize) -> Url {
        self.requests.lock().unwrap()[index].0.clone()
    }

    pub fn headers(&self, index: usize) -> Vec<(&'static str, String)> {
        self.requests.lock().unwrap()[index].1.clone()
    }

    pub fn params(&self, index: usize) -> HashMap<String, String> {
        self.url(index).query_pairs().into_owned().collect()
    }
}

#[async_trait::async_trait]
impl CatalogTransport for ScriptedTransport {
    async fn get(&self, url: Url, headers: Vec<(&'static str, String)>) -> AppResult<RawResponse> {
        self.requests.lock().unwrap().push((url, headers));
        let reply = self.replies.lock().unwrap().pop_front();

        match reply {
            Some(Reply::Now(result)) => result,
            Some(Reply::Gated(rx)) => rx
                .await
                .map_err(|_| AppError::Network("gate dropped".to_string())),
            None => Ok(RawResponse::new(200, listing(&[1], 1))),
        }
    }
}

pub fn listing(ids: &[u64], total_pages: i64) -> String {
    let results: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "title": format!("Movie {}", id),
                "poster_path": format!("/{}.jpg", id),
                "vote_average": 7.5,
                "release_date": "1999-03-31"
            })
        })
        .collect();
    serde_json::json!({"page": 1, "results": results, "total_pages": total_pages}).to_string()
}

pub fn client(transport: &Arc<ScriptedTransport>, auth: AuthMode) -> CatalogClient {
    CatalogClient::new(
        EndpointBuilder::new("https://api.themoviedb.org/3"),
        auth,
        transport.clone(),
    )
}

pub fn orchestrator(transport: &Arc<ScriptedTransport>) -> QueryOrchestrator {
    QueryOrchestrator::new(client(transport, AuthMode::None), SortSpec::default())
}

/// Lets spawned tasks run until `transport` has seen `count` requests
pub async fn wait_for_requests(transport: &ScriptedTransport, count: usize) {
    while transport.request_count() < count {
        tokio::task::yield_now().await;
    }
}
