//! Async query abstraction for data fetching.
//!
//! `Query<T>` encapsulates one async fetch with loading states, polled from
//! the UI tick. `PagedQuery<T>` layers eager pagination on top: exactly one
//! page request is in flight at a time, each arriving page extends the
//! accumulated in-memory set, and the next page is requested automatically
//! until the source reports the last page. Consumers re-derive everything
//! from the full accumulated set on every change.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// The state of a query
#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// Query has not been started
  Idle,
  /// Query is currently fetching data
  Loading,
  /// Query completed successfully
  Success(T),
  /// Query failed with an error
  Error(String),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// A boxed future that returns a Result<T, String>
type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send>>;

/// A factory function that creates futures for fetching data
type FetcherFn<T> = Box<dyn Fn() -> BoxFuture<T> + Send + Sync>;

/// One-shot async query with state management.
pub struct Query<T> {
  state: QueryState<T>,
  fetcher: FetcherFn<T>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, String>>>,
  fetched_at: Option<Instant>,
  stale_time: Duration,
}

impl<T: Send + 'static> Query<T> {
  /// Create a new query with the given fetcher function. The fetcher is
  /// called each time `fetch()` or `refetch()` is invoked.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    Self {
      state: QueryState::Idle,
      fetcher: Box::new(move || Box::pin(fetcher())),
      receiver: None,
      fetched_at: None,
      stale_time: Duration::from_secs(5 * 60),
    }
  }

  /// Set the stale time for this query
  pub fn with_stale_time(mut self, duration: Duration) -> Self {
    self.stale_time = duration;
    self
  }

  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  pub fn error(&self) -> Option<&str> {
    self.state.error()
  }

  /// Check if the data is older than the stale time
  pub fn is_stale(&self) -> bool {
    match &self.state {
      QueryState::Success(_) => self
        .fetched_at
        .map(|t| t.elapsed() > self.stale_time)
        .unwrap_or(true),
      _ => false,
    }
  }

  /// Start fetching data. No-op if already loading.
  pub fn fetch(&mut self) {
    if self.state.is_loading() {
      return;
    }
    self.start_fetch();
  }

  /// Force a refetch, superseding any pending fetch.
  pub fn refetch(&mut self) {
    // Dropping the receiver abandons the in-flight request
    self.receiver = None;
    self.start_fetch();
  }

  /// Poll for results from a pending fetch.
  ///
  /// Returns `true` if the state changed. Call this from the tick handler.
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    match receiver.try_recv() {
      Ok(Ok(data)) => {
        self.state = QueryState::Success(data);
        self.fetched_at = Some(Instant::now());
        self.receiver = None;
        true
      }
      Ok(Err(error)) => {
        self.state = QueryState::Error(error);
        self.receiver = None;
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        self.state = QueryState::Error("Query was cancelled".to_string());
        self.receiver = None;
        true
      }
    }
  }

  fn start_fetch(&mut self) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.state = QueryState::Loading;

    let future = (self.fetcher)();
    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - receiver may have been dropped
      let _ = tx.send(result);
    });
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .field("fetched_at", &self.fetched_at)
      .finish_non_exhaustive()
  }
}

/// One page of a paginated result set
#[derive(Debug, Clone)]
pub struct Page<T> {
  pub items: Vec<T>,
  /// Total matching items across all pages
  pub total: u64,
  pub is_last: bool,
}

/// A factory function that creates futures for fetching one page (1-based)
type PageFetcherFn<T> = Box<dyn Fn(u64) -> BoxFuture<Page<T>> + Send + Sync>;

/// Paginated query that accumulates pages eagerly, one request in flight at
/// a time.
pub struct PagedQuery<T> {
  items: Vec<T>,
  total: u64,
  is_last: bool,
  next_page: u64,
  started: bool,
  loading: bool,
  error: Option<String>,
  fetcher: PageFetcherFn<T>,
  receiver: Option<mpsc::UnboundedReceiver<Result<Page<T>, String>>>,
}

impl<T: Send + 'static> PagedQuery<T> {
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn(u64) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Page<T>, String>> + Send + 'static,
  {
    Self {
      items: Vec::new(),
      total: 0,
      is_last: false,
      next_page: 1,
      started: false,
      loading: false,
      error: None,
      fetcher: Box::new(move |page| Box::pin(fetcher(page))),
      receiver: None,
    }
  }

  /// The full accumulated set fetched so far
  pub fn items(&self) -> &[T] {
    &self.items
  }

  /// Total matching items reported by the source
  pub fn total(&self) -> u64 {
    self.total
  }

  /// Whether a page request is in flight
  pub fn is_loading(&self) -> bool {
    self.loading
  }

  /// Whether every page has arrived
  pub fn is_complete(&self) -> bool {
    self.started && self.is_last && !self.loading
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Start fetching from page one. No-op once started.
  pub fn fetch(&mut self) {
    if self.started {
      return;
    }
    self.started = true;
    self.start_page_fetch();
  }

  /// Discard the accumulated set and restart from page one.
  pub fn refetch(&mut self) {
    self.items.clear();
    self.total = 0;
    self.is_last = false;
    self.next_page = 1;
    self.error = None;
    self.receiver = None;
    self.started = true;
    self.start_page_fetch();
  }

  /// Poll for an arriving page. Returns `true` if the accumulated set or
  /// error state changed; the next page request starts automatically.
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    match receiver.try_recv() {
      Ok(Ok(page)) => {
        self.items.extend(page.items);
        self.total = page.total;
        self.is_last = page.is_last;
        self.next_page += 1;
        self.loading = false;
        self.receiver = None;
        if !self.is_last {
          self.start_page_fetch();
        }
        true
      }
      Ok(Err(error)) => {
        self.error = Some(error);
        self.loading = false;
        self.receiver = None;
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        self.error = Some("Fetch was cancelled".to_string());
        self.loading = false;
        self.receiver = None;
        true
      }
    }
  }

  fn start_page_fetch(&mut self) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.loading = true;
    self.error = None;

    let future = (self.fetcher)(self.next_page);
    tokio::spawn(async move {
      let result = future.await;
      let _ = tx.send(result);
    });
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PagedQuery<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PagedQuery")
      .field("items", &self.items.len())
      .field("total", &self.total)
      .field("is_last", &self.is_last)
      .field("next_page", &self.next_page)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  async fn settle<T: Send + 'static>(query: &mut PagedQuery<T>) {
    // Poll until every page has arrived
    for _ in 0..50 {
      tokio::time::sleep(Duration::from_millis(5)).await;
      query.poll();
      if query.is_complete() || query.error().is_some() {
        break;
      }
    }
  }

  #[tokio::test]
  async fn test_query_success() {
    let mut query = Query::new(|| async { Ok::<_, String>(vec![1, 2, 3]) });

    assert!(matches!(query.state(), QueryState::Idle));

    query.fetch();
    assert!(query.is_loading());

    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(query.poll());
    assert_eq!(query.data(), Some(&vec![1, 2, 3]));
  }

  #[tokio::test]
  async fn test_query_error() {
    let mut query: Query<i32> = Query::new(|| async { Err("Something went wrong".to_string()) });

    query.fetch();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(query.poll());
    assert_eq!(query.error(), Some("Something went wrong"));
  }

  #[tokio::test]
  async fn test_query_stale() {
    let mut query = Query::new(|| async { Ok::<_, String>(42) }).with_stale_time(Duration::ZERO);

    query.fetch();
    tokio::time::sleep(Duration::from_millis(10)).await;
    query.poll();

    assert!(query.is_stale());
  }

  #[tokio::test]
  async fn test_fetch_while_loading_is_noop() {
    let mut query = Query::new(|| async {
      tokio::time::sleep(Duration::from_millis(100)).await;
      Ok::<_, String>(42)
    });

    query.fetch();
    assert!(query.is_loading());

    query.fetch();
    assert!(query.is_loading());
  }

  #[tokio::test]
  async fn test_paged_query_accumulates_all_pages() {
    let mut query = PagedQuery::new(|page| async move {
      match page {
        1 => Ok(Page {
          items: vec![1, 2],
          total: 4,
          is_last: false,
        }),
        2 => Ok(Page {
          items: vec![3, 4],
          total: 4,
          is_last: true,
        }),
        _ => Err(format!("unexpected page {}", page)),
      }
    });

    query.fetch();
    settle(&mut query).await;

    assert!(query.is_complete());
    assert_eq!(query.items(), &[1, 2, 3, 4]);
    assert_eq!(query.total(), 4);
    assert!(query.error().is_none());
  }

  #[tokio::test]
  async fn test_paged_query_stops_on_error_and_keeps_items() {
    let mut query = PagedQuery::new(|page| async move {
      match page {
        1 => Ok(Page {
          items: vec![1],
          total: 2,
          is_last: false,
        }),
        _ => Err("boom".to_string()),
      }
    });

    query.fetch();
    settle(&mut query).await;

    assert_eq!(query.error(), Some("boom"));
    assert_eq!(query.items(), &[1]);
    assert!(!query.is_complete());
  }

  #[tokio::test]
  async fn test_paged_query_refetch_restarts() {
    let mut query = PagedQuery::new(|_page| async move {
      Ok(Page {
        items: vec![7],
        total: 1,
        is_last: true,
      })
    });

    query.fetch();
    settle(&mut query).await;
    assert_eq!(query.items(), &[7]);

    query.refetch();
    assert!(query.is_loading());
    assert!(query.items().is_empty());

    settle(&mut query).await;
    assert_eq!(query.items(), &[7]);
    assert!(query.is_complete());
  }
}
