/// Query orchestration
///
/// Owns the user-facing query state (settled search text, filters, page) and
/// turns every change into exactly one catalog request. Transitions:
///
/// ```text
/// Idle -> Loading -> Success | Empty | Failed -> Loading -> ...
/// ```
///
/// Changing the search text, sort order or genre selection resets the page to
/// 1 and fetches it; a page change fetches the requested page as-is.
///
/// Requests are never cancelled. Each one is tagged with a sequence number
/// when issued and its response is applied only if no newer request was
/// issued in the meantime, so the last *requested* state wins even when
/// responses arrive out of order.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        EmptyReason, GenreId, Movie, MovieListing, RequestOutcome, ResultPage, SortSpec, MAX_PAGES,
    },
    services::{
        client::CatalogClient,
        credentials::AuthMode,
        endpoint::{Endpoint, QueryParams},
        filters::FilterState,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Free-text search; sort and genres are ignored
    Search,
    /// Browse by sort order and genres
    Discover,
}

impl QueryMode {
    pub fn for_query(query: &str) -> Self {
        if query.is_empty() {
            QueryMode::Discover
        } else {
            QueryMode::Search
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            QueryMode::Search => Endpoint::SearchMovie,
            QueryMode::Discover => Endpoint::DiscoverMovie,
        }
    }

    fn empty_reason(&self) -> EmptyReason {
        match self {
            QueryMode::Search => EmptyReason::NoSearchMatches,
            QueryMode::Discover => EmptyReason::NothingToDiscover,
        }
    }
}

/// Everything a single fetch depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryInputs {
    /// Settled (debounced) search text
    pub query: String,
    pub filters: FilterState,
    /// 1-based page cursor
    pub page: u32,
}

impl QueryInputs {
    pub fn new(sort: SortSpec) -> Self {
        Self {
            query: String::new(),
            filters: FilterState::new(sort),
            page: 1,
        }
    }
}

/// Endpoint and parameters for one fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub mode: QueryMode,
    pub endpoint: Endpoint,
    pub params: QueryParams,
}

/// Decides search vs discover and builds the parameter set.
///
/// Search mode sends only `page`, `query` (and `api_key` for query-key
/// auth); sort and genres are dropped, not combined.
pub fn plan_fetch(inputs: &QueryInputs, auth: &AuthMode) -> FetchPlan {
    let mode = QueryMode::for_query(&inputs.query);
    let endpoint = mode.endpoint();

    let mut params = QueryParams::new();
    params.set("page", inputs.page);
    auth.apply_query_key(endpoint, &mut params);

    match mode {
        QueryMode::Search => {
            params.set("query", &inputs.query);
        }
        QueryMode::Discover => {
            params
                .set("sort_by", inputs.filters.sort())
                .set_opt("with_genres", inputs.filters.genres().to_param());
        }
    }

    FetchPlan {
        mode,
        endpoint,
        params,
    }
}

/// What consumers see after every transition
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySnapshot {
    pub inputs: QueryInputs,
    pub total_pages: u32,
    pub outcome: RequestOutcome,
    /// List currently on screen. Survives `Loading` and `Failed`, cleared on
    /// `Empty`.
    pub movies: Vec<Movie>,
    pub updated_at: DateTime<Utc>,
}

struct OrchestratorState {
    inputs: QueryInputs,
    total_pages: u32,
    outcome: RequestOutcome,
    movies: Vec<Movie>,
    latest_seq: u64,
}

impl OrchestratorState {
    fn snapshot(&self) -> QuerySnapshot {
        QuerySnapshot {
            inputs: self.inputs.clone(),
            total_pages: self.total_pages,
            outcome: self.outcome.clone(),
            movies: self.movies.clone(),
            updated_at: Utc::now(),
        }
    }

    /// Enters `Loading` for the current inputs and hands out a new sequence
    /// number
    fn begin(&mut self, auth: &AuthMode) -> (u64, FetchPlan) {
        self.latest_seq += 1;
        self.outcome = RequestOutcome::Loading;
        (self.latest_seq, plan_fetch(&self.inputs, auth))
    }

    /// Reduces a finished fetch into state
    fn complete(&mut self, mode: QueryMode, page: u32, result: AppResult<MovieListing>) {
        match result {
            Ok(listing) => {
                self.total_pages = listing.total_pages;
                if listing.results.is_empty() {
                    self.movies.clear();
                    self.outcome = RequestOutcome::Empty(mode.empty_reason());
                } else {
                    self.movies = listing.results.clone();
                    self.outcome = RequestOutcome::Success(ResultPage {
                        page,
                        movies: listing.results,
                        total_pages: listing.total_pages,
                    });
                }
            }
            Err(e) => {
                self.outcome = RequestOutcome::Failed(e.user_message());
            }
        }
    }
}

/// Central query state machine. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct QueryOrchestrator {
    client: CatalogClient,
    state: Arc<Mutex<OrchestratorState>>,
    snapshot_tx: Arc<watch::Sender<QuerySnapshot>>,
}

impl QueryOrchestrator {
    pub fn new(client: CatalogClient, default_sort: SortSpec) -> Self {
        let state = OrchestratorState {
            inputs: QueryInputs::new(default_sort),
            total_pages: 1,
            outcome: RequestOutcome::Idle,
            movies: Vec::new(),
            latest_seq: 0,
        };
        let (snapshot_tx, _) = watch::channel(state.snapshot());

        Self {
            client,
            state: Arc::new(Mutex::new(state)),
            snapshot_tx: Arc::new(snapshot_tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<QuerySnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub async fn snapshot(&self) -> QuerySnapshot {
        self.state.lock().await.snapshot()
    }

    /// Fetches the current inputs without changing them (initial load)
    pub async fn refresh(&self) -> QuerySnapshot {
        let pending = {
            let mut state = self.state.lock().await;
            self.start(&mut state)
        };
        self.run_fetch(pending).await
    }

    /// Applies a newly settled search text
    pub async fn set_query(&self, query: impl Into<String>) -> QuerySnapshot {
        let step = self.begin_query(query.into()).await;
        self.finish(step).await
    }

    pub async fn set_sort(&self, spec: SortSpec) -> QuerySnapshot {
        let step = self
            .reset_and_begin(move |inputs| inputs.filters.set_sort(spec))
            .await;
        self.finish(step).await
    }

    pub async fn toggle_genre(&self, id: GenreId) -> QuerySnapshot {
        let step = self
            .reset_and_begin(move |inputs| inputs.filters.toggle_genre(id))
            .await;
        self.finish(step).await
    }

    pub async fn clear_genres(&self) -> QuerySnapshot {
        let step = self
            .reset_and_begin(|inputs| inputs.filters.clear_genres())
            .await;
        self.finish(step).await
    }

    /// Fetches `page` without touching the other inputs.
    ///
    /// Pages outside `1..=total_pages` are rejected without a request. The
    /// page count of new inputs is unknown until their first page arrives,
    /// so only page 1 is accepted while that fetch is outstanding.
    pub async fn change_page(&self, page: u32) -> AppResult<QuerySnapshot> {
        let pending = {
            let mut state = self.state.lock().await;
            let total_pages = state.total_pages.min(MAX_PAGES);
            if page == 0 || page > total_pages {
                return Err(AppError::InvalidInput(format!(
                    "Page {} is outside 1..={}",
                    page, total_pages
                )));
            }
            state.inputs.page = page;
            self.start(&mut state)
        };

        Ok(self.run_fetch(pending).await)
    }

    async fn begin_query(&self, query: String) -> Step {
        self.reset_and_begin(move |inputs| {
            if inputs.query == query {
                return false;
            }
            inputs.query = query;
            true
        })
        .await
    }

    /// Mutates inputs and, if they changed, resets to page 1 and enters
    /// `Loading` under the same lock
    async fn reset_and_begin<F>(&self, mutate: F) -> Step
    where
        F: FnOnce(&mut QueryInputs) -> bool,
    {
        let mut state = self.state.lock().await;
        if !mutate(&mut state.inputs) {
            return Step::Unchanged(state.snapshot());
        }
        state.inputs.page = 1;
        state.total_pages = 1;
        Step::Fetch(self.start(&mut state))
    }

    async fn finish(&self, step: Step) -> QuerySnapshot {
        match step {
            Step::Fetch(pending) => self.run_fetch(pending).await,
            Step::Unchanged(snapshot) => snapshot,
        }
    }

    fn start(&self, state: &mut OrchestratorState) -> PendingFetch {
        let (seq, plan) = state.begin(self.client.auth());
        let page = state.inputs.page;
        self.snapshot_tx.send_replace(state.snapshot());
        PendingFetch { seq, plan, page }
    }

    /// Runs one fetch and applies it if it is still the latest
    async fn run_fetch(&self, pending: PendingFetch) -> QuerySnapshot {
        let PendingFetch { seq, plan, page } = pending;

        let span = tracing::info_span!(
            "movie_fetch",
            seq,
            fetch_id = %Uuid::new_v4(),
            endpoint = %plan.endpoint,
            page,
        );

        let result = self
            .client
            .fetch_listing(plan.endpoint, &plan.params)
            .instrument(span.clone())
            .await;

        span.in_scope(|| match &result {
            Ok(listing) => tracing::info!(
                results = listing.results.len(),
                total_pages = listing.total_pages,
                "Movie fetch completed"
            ),
            Err(e) => tracing::error!(error = %e, "Movie fetch failed"),
        });

        let mut state = self.state.lock().await;
        if seq != state.latest_seq {
            span.in_scope(|| {
                tracing::debug!(latest = state.latest_seq, "Discarding superseded response")
            });
            return state.snapshot();
        }

        state.complete(plan.mode, page, result);
        let snapshot = state.snapshot();
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }
}

/// A fetch that has entered `Loading` but not yet gone out
struct PendingFetch {
    seq: u64,
    plan: FetchPlan,
    page: u32,
}

enum Step {
    Fetch(PendingFetch),
    Unchanged(QuerySnapshot),
}

/// Feeds settled search text into the orchestrator.
///
/// Inputs are applied in the order they settle; only the network round trip
/// runs on its own task, so a slow fetch never delays the next one. Stale
/// results are dropped by the orchestrator.
pub fn spawn_query_listener(
    orchestrator: QueryOrchestrator,
    mut settled: watch::Receiver<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while settled.changed().await.is_ok() {
            let query = settled.borrow_and_update().clone();
            if let Step::Fetch(pending) = orchestrator.begin_query(query).await {
                let orchestrator = orchestrator.clone();
                tokio::spawn(async move {
                    orchestrator.run_fetch(pending).await;
                });
            }
        }
    })
}
