//! One browsing session over a listing: the fetched collection, the
//! current filter selection and the scroll window, plus the background
//! refresh task.
//!
//! All recomputation is wholesale: a criteria change or a periodic
//! refresh re-fetches the full collection and re-runs the pipeline. A
//! monotonic generation counter guards against out-of-order fetch
//! resolution — the original application let the last response win,
//! which could leave a stale result on screen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::{FilterCriteria, Listable, ListingPipeline};
use crate::errors::ApiError;
use crate::listing::window::{DEFAULT_PAGE_SIZE, PageWindow};

/// How often the background task replaces the displayed collection.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(2 * 60);

/// Delay between arming a scroll-triggered extension and growing the
/// window, so one long scroll gesture produces one extension.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// The persistence boundary the session fetches through. Implementors
/// are expected to return the collection already visibility-gated for
/// the session's viewer.
#[async_trait]
pub trait CollectionFetcher<T>: Send + Sync + 'static {
    async fn fetch_all(&self) -> Result<Vec<T>, ApiError>;
}

struct SessionState<T> {
    criteria: FilterCriteria,
    items: Vec<T>,
    window: PageWindow,
}

/// UI-facing controller for one listing view.
///
/// Cheap to clone; clones share the same session state, so the render
/// loop, the scroll handler and the refresh task can each hold one.
pub struct ListingController<T> {
    fetcher: Arc<dyn CollectionFetcher<T>>,
    pipeline: ListingPipeline<T>,
    state: Arc<Mutex<SessionState<T>>>,
    generation: Arc<AtomicU64>,
    settle_delay: Duration,
}

impl<T> Clone for ListingController<T> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            pipeline: self.pipeline.clone(),
            state: self.state.clone(),
            generation: self.generation.clone(),
            settle_delay: self.settle_delay,
        }
    }
}

impl<T> ListingController<T>
where
    T: Listable + Clone + Send + 'static,
{
    pub fn new(fetcher: Arc<dyn CollectionFetcher<T>>, pipeline: ListingPipeline<T>) -> Self {
        Self {
            fetcher,
            pipeline,
            state: Arc::new(Mutex::new(SessionState {
                criteria: FilterCriteria::default(),
                items: Vec::new(),
                window: PageWindow::new(DEFAULT_PAGE_SIZE),
            })),
            generation: Arc::new(AtomicU64::new(0)),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_page_size(self, page_size: usize) -> Self {
        self.state.lock().unwrap().window = PageWindow::new(page_size);
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Re-fetches the full collection and replaces the displayed one.
    ///
    /// Best effort: on fetch failure the previous collection stays on
    /// screen. A result that resolves after the criteria have moved on
    /// is discarded.
    pub async fn refresh(&self) {
        let generation = self.generation.load(Ordering::SeqCst);
        let criteria = self.state.lock().unwrap().criteria.clone();

        match self.fetcher.fetch_all().await {
            Ok(fetched) => {
                let filtered = self.pipeline.run(fetched, &criteria);

                let mut state = self.state.lock().unwrap();
                if self.generation.load(Ordering::SeqCst) != generation {
                    debug!(generation, "discarding stale fetch result");
                    return;
                }
                state.items = filtered;
                state.window.reset();
            }
            Err(err) => {
                warn!(error = %err, "listing refresh failed, keeping previous collection");
            }
        }
    }

    /// Replaces the filter selection: bumps the generation (so any
    /// in-flight fetch or extension is abandoned), resets the window to
    /// one page and recomputes from a fresh fetch.
    pub async fn apply_criteria(&self, criteria: FilterCriteria) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        {
            let mut state = self.state.lock().unwrap();
            state.criteria = criteria;
            state.window.reset();
        }
        self.refresh().await;
    }

    /// Scroll-triggered extension. Arms the window, waits out the
    /// settling delay, then grows it by one page — unless the session
    /// moved to a new filter generation in the meantime.
    pub async fn extend(&self) -> bool {
        let generation = self.generation.load(Ordering::SeqCst);
        {
            let mut state = self.state.lock().unwrap();
            let total = state.items.len();
            if !state.window.begin_extension(total) {
                return false;
            }
        }

        tokio::time::sleep(self.settle_delay).await;

        let mut state = self.state.lock().unwrap();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "abandoning extension from a stale filter session");
            return false;
        }
        state.window.settle()
    }

    /// The windowed prefix the rendering layer should display.
    pub fn visible(&self) -> Vec<T> {
        let state = self.state.lock().unwrap();
        let count = state.window.visible_count(state.items.len());
        state.items[..count].to_vec()
    }

    /// Total match count, for the "N results found" readout.
    pub fn total(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }

    /// Whether an extension is in flight, for the end-of-list spinner.
    pub fn is_extending(&self) -> bool {
        self.state.lock().unwrap().window.is_extending()
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.state.lock().unwrap().criteria.clone()
    }
}

/// Spawns the best-effort background refresh. The first tick of a tokio
/// interval fires immediately; it is skipped so the task only re-runs
/// the pipeline after a full period.
pub fn spawn_periodic_refresh<T>(
    controller: ListingController<T>,
    period: Duration,
) -> JoinHandle<()>
where
    T: Listable + Clone + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            controller.refresh().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i32,
        category: String,
    }

    impl Row {
        fn new(id: i32, category: &str) -> Self {
            Self {
                id,
                category: category.into(),
            }
        }
    }

    impl Listable for Row {
        fn category(&self) -> Option<&str> {
            Some(&self.category)
        }

        fn search_fields(&self) -> Vec<String> {
            Vec::new()
        }
    }

    fn by_id(a: &Row, b: &Row) -> std::cmp::Ordering {
        a.id.cmp(&b.id)
    }

    /// Replays scripted responses, optionally delaying each one.
    struct ScriptedFetcher {
        responses: Mutex<VecDeque<(Duration, Result<Vec<Row>, ApiError>)>>,
        calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                calls: AtomicUsize::new(0),
            }
        }

        fn push(&self, delay: Duration, response: Result<Vec<Row>, ApiError>) {
            self.responses.lock().unwrap().push_back((delay, response));
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CollectionFetcher<Row> for ScriptedFetcher {
        async fn fetch_all(&self) -> Result<Vec<Row>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay, response) = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((Duration::ZERO, Ok(Vec::new())));
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            response
        }
    }

    fn rows(ids: &[i32]) -> Vec<Row> {
        ids.iter().map(|&id| Row::new(id, "a")).collect()
    }

    fn controller(fetcher: Arc<ScriptedFetcher>) -> ListingController<Row> {
        ListingController::new(fetcher, ListingPipeline::new(by_id))
            .with_settle_delay(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn refresh_replaces_the_collection_sorted() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.push(Duration::ZERO, Ok(rows(&[3, 1, 2])));
        let session = controller(fetcher);

        session.refresh().await;

        assert_eq!(session.total(), 3);
        let ids: Vec<i32> = session.visible().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn fetch_failure_keeps_the_previous_collection() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.push(Duration::ZERO, Ok(rows(&[1, 2])));
        fetcher.push(Duration::ZERO, Err(ApiError::Internal));
        let session = controller(fetcher);

        session.refresh().await;
        session.refresh().await;

        assert_eq!(session.total(), 2);
    }

    #[tokio::test]
    async fn first_fetch_failure_leaves_an_empty_view() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.push(Duration::ZERO, Err(ApiError::Internal));
        let session = controller(fetcher);

        session.refresh().await;

        assert_eq!(session.total(), 0);
        assert!(session.visible().is_empty());
    }

    #[tokio::test]
    async fn apply_criteria_refilters_and_resets_the_window() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let mixed: Vec<Row> = (0..30)
            .map(|id| Row::new(id, if id % 2 == 0 { "a" } else { "b" }))
            .collect();
        fetcher.push(Duration::ZERO, Ok(mixed.clone()));
        fetcher.push(Duration::ZERO, Ok(mixed));
        let session = ListingController::new(
            fetcher,
            ListingPipeline::new(by_id),
        )
        .with_page_size(10)
        .with_settle_delay(Duration::from_millis(5));

        session.refresh().await;
        assert!(session.extend().await);
        assert_eq!(session.visible().len(), 20);

        session
            .apply_criteria(FilterCriteria {
                categories: vec!["b".into()],
                ..Default::default()
            })
            .await;

        // 15 odd-category rows match; the reset window shows one page.
        assert_eq!(session.total(), 15);
        assert_eq!(session.visible().len(), 10);
    }

    #[tokio::test]
    async fn stale_fetch_result_is_discarded() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        // The first fetch is slow and resolves after the criteria change.
        fetcher.push(Duration::from_millis(50), Ok(rows(&[1, 2, 3])));
        fetcher.push(Duration::ZERO, Ok(rows(&[9])));
        let session = controller(fetcher);

        let slow = {
            let session = session.clone();
            tokio::spawn(async move { session.refresh().await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        session.apply_criteria(FilterCriteria::default()).await;
        slow.await.unwrap();

        // The late first response must not overwrite the newer one.
        let ids: Vec<i32> = session.visible().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![9]);
    }

    #[tokio::test]
    async fn extension_settles_after_the_delay() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.push(Duration::ZERO, Ok(rows(&(0..25).collect::<Vec<_>>())));
        let session = ListingController::new(fetcher, ListingPipeline::new(by_id))
            .with_page_size(20)
            .with_settle_delay(Duration::from_millis(10));

        session.refresh().await;
        assert_eq!(session.visible().len(), 20);

        assert!(session.extend().await);
        assert_eq!(session.visible().len(), 25);

        // Everything shown: further triggers are no-ops.
        assert!(!session.extend().await);
    }

    #[tokio::test]
    async fn extension_is_abandoned_when_criteria_change_mid_settle() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.push(Duration::ZERO, Ok(rows(&(0..50).collect::<Vec<_>>())));
        fetcher.push(Duration::ZERO, Ok(rows(&(0..50).collect::<Vec<_>>())));
        let session = ListingController::new(fetcher, ListingPipeline::new(by_id))
            .with_page_size(20)
            .with_settle_delay(Duration::from_millis(50));

        session.refresh().await;

        let extending = {
            let session = session.clone();
            tokio::spawn(async move { session.extend().await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        session.apply_criteria(FilterCriteria::default()).await;

        assert!(!extending.await.unwrap());
        assert_eq!(session.visible().len(), 20);
    }

    #[tokio::test]
    async fn periodic_refresh_keeps_fetching() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let session = controller(fetcher.clone());

        let task = spawn_periodic_refresh(session, Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(90)).await;
        task.abort();

        assert!(fetcher.calls() >= 2, "got {} calls", fetcher.calls());
    }
}
