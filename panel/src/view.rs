//! Search view state and the fetch operation driving it.
//!
//! Only the owner of [`SearchView`] mutates [`ViewState`]. Requests run as
//! spawned tasks that hold no view state, they report back through a channel
//! and the owner applies the outcome on its own schedule.

use common::io::drom::{Part, SearchQuery};
use requester::drom::{DromRequesterExt, RequesterError};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

pub type Generation = u64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub query: SearchQuery,
    pub parts: Vec<Part>,
    pub loading: bool,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub generation: Generation,
    pub result: Result<Vec<Part>, RequesterError>,
}

pub struct SearchView<R> {
    state: ViewState,
    requester: R,
    /// Generation of the most recently issued request, 0 before the first one
    latest: Generation,
    outcome_sender: UnboundedSender<FetchOutcome>,
    outcome_receiver: UnboundedReceiver<FetchOutcome>,
}

impl<R> SearchView<R> {
    pub fn new(requester: R) -> Self {
        let (outcome_sender, outcome_receiver) = tokio::sync::mpsc::unbounded_channel();
        Self {
            state: ViewState::default(),
            requester,
            latest: 0,
            outcome_sender,
            outcome_receiver,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn set_search_string(&mut self, text: impl Into<String>) {
        self.state.query.search_string = text.into();
    }

    pub fn set_model(&mut self, text: impl Into<String>) {
        self.state.query.model = text.into();
    }

    /// Applies an outcome if it belongs to the latest request. Returns
    /// whether the state changed.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.generation != self.latest {
            debug!(
                generation = outcome.generation,
                latest = self.latest,
                "dropping outcome of superseded request"
            );
            return false;
        }

        match outcome.result {
            Ok(parts) => {
                debug!(n_parts = parts.len(), generation = outcome.generation, "parts fetched");
                self.state.parts = parts;
            }
            Err(e) => error!(fetch_error = ?e, generation = outcome.generation, "error fetching parts"),
        }
        self.state.loading = false;
        true
    }

    /// Drains every outcome that has already arrived without waiting.
    /// Returns the number of outcomes applied.
    pub fn poll_outcomes(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcome_receiver.try_recv() {
            if self.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next outcome and applies it. Returns whether it was applied.
    pub async fn next_outcome(&mut self) -> bool {
        match self.outcome_receiver.recv().await {
            Some(outcome) => self.apply(outcome),
            None => false,
        }
    }
}

impl<R> SearchView<R>
where
    R: DromRequesterExt + Clone + Send + Sync + 'static,
{
    /// Issues a request for the current query and marks the view as loading.
    /// Requests still in flight are not cancelled, their outcomes are dropped
    /// once they arrive.
    ///
    /// Must be called from within a tokio runtime.
    pub fn fetch_parts(&mut self) -> Generation {
        self.latest += 1;
        self.state.loading = true;

        let generation = self.latest;
        let query = self.state.query.clone();
        info!(
            generation,
            search_string = %query.search_string,
            model = %query.model,
            "fetching parts"
        );

        tokio::spawn({
            let requester = R::clone(&self.requester);
            let outcome_sender = UnboundedSender::clone(&self.outcome_sender);
            async move {
                let result = requester.search_parts(&query).await;
                // the receiver lives inside the view, a failed send means the view is gone
                let _ = outcome_sender.send(FetchOutcome { generation, result });
            }
        });

        generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{ScriptedRequester, part};
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output for assertions
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            self.0
                .lock()
                .map(|buf| String::from_utf8_lossy(&buf).into_owned())
                .unwrap_or_default()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if let Ok(mut inner) = self.0.lock() {
                inner.extend_from_slice(buf);
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_initial_state() {
        let view = SearchView::new(ScriptedRequester::new());
        assert_eq!(view.state(), &ViewState::default());
        assert!(!view.state().loading);
        assert!(view.state().parts.is_empty());
    }

    #[tokio::test]
    async fn test_setters_have_no_side_effect() {
        let requester = ScriptedRequester::new();
        let mut view = SearchView::new(requester.clone());
        view.set_search_string("колодки");
        view.set_model("camry");

        assert_eq!(view.state().query, SearchQuery::new("колодки", "camry"));
        assert!(!view.state().loading);
        tokio::task::yield_now().await;
        assert!(requester.requested().is_empty());
    }

    #[tokio::test]
    async fn test_loading_cleared_after_success() {
        let requester =
            ScriptedRequester::new().with("brake", 10, Ok(vec![part("A"), part("B")]));
        let mut view = SearchView::new(requester);
        view.set_search_string("brake");

        view.fetch_parts();
        assert!(view.state().loading);

        assert!(view.next_outcome().await);
        assert!(!view.state().loading);
        let titles = view
            .state()
            .parts
            .iter()
            .map(|p| p.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_parts() {
        let requester = ScriptedRequester::new()
            .with("brake", 0, Ok(vec![part("A")]))
            .with("broken", 10, Err(503));
        let mut view = SearchView::new(requester);

        view.set_search_string("brake");
        view.fetch_parts();
        view.next_outcome().await;
        assert_eq!(view.state().parts, vec![part("A")]);

        view.set_search_string("broken");
        view.fetch_parts();
        assert!(view.state().loading);
        assert!(view.next_outcome().await);

        assert!(!view.state().loading);
        assert_eq!(view.state().parts, vec![part("A")]);
    }

    #[tokio::test]
    async fn test_failure_is_logged_at_error() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let _default = tracing::subscriber::set_default(subscriber);

        let requester = ScriptedRequester::new()
            .with("brake", 0, Ok(vec![part("A")]))
            .with("broken", 5, Err(503));
        let mut view = SearchView::new(requester);

        view.set_search_string("brake");
        view.fetch_parts();
        view.next_outcome().await;
        assert!(!logs.contents().contains("ERROR"));

        view.set_search_string("broken");
        view.fetch_parts();
        assert!(view.next_outcome().await);

        let output = logs.contents();
        let failure = output
            .lines()
            .find(|line| line.contains("error fetching parts"))
            .unwrap_or_default();
        assert!(failure.contains("ERROR"), "no error line in {output:?}");
        assert!(failure.contains("Status(503)"));
        assert!(failure.contains("generation=2"));
        assert_eq!(view.state().parts, vec![part("A")]);
    }

    #[tokio::test]
    async fn test_empty_success_replaces_parts() {
        let requester = ScriptedRequester::new()
            .with("brake", 0, Ok(vec![part("A")]))
            .with("nothing", 0, Ok(vec![]));
        let mut view = SearchView::new(requester);

        view.set_search_string("brake");
        view.fetch_parts();
        view.next_outcome().await;

        view.set_search_string("nothing");
        view.fetch_parts();
        view.next_outcome().await;

        assert!(view.state().parts.is_empty());
    }

    #[tokio::test]
    async fn test_query_snapshot_taken_at_fetch() {
        let requester = ScriptedRequester::new();
        let mut view = SearchView::new(requester.clone());

        view.set_model("camry");
        view.fetch_parts();
        view.set_search_string("typed after");
        view.set_model("corolla");
        view.next_outcome().await;

        assert_eq!(requester.requested(), vec![SearchQuery::new("", "camry")]);
    }

    #[tokio::test]
    async fn test_superseded_response_arriving_last_is_dropped() {
        let requester = ScriptedRequester::new()
            .with("slow", 60, Ok(vec![part("slow")]))
            .with("fast", 5, Ok(vec![part("fast")]));
        let mut view = SearchView::new(requester);

        view.set_search_string("slow");
        let first = view.fetch_parts();
        view.set_search_string("fast");
        let second = view.fetch_parts();
        assert!(second > first);

        assert!(view.next_outcome().await);
        assert!(!view.state().loading);
        assert_eq!(view.state().parts, vec![part("fast")]);

        assert!(!view.next_outcome().await);
        assert_eq!(view.state().parts, vec![part("fast")]);
    }

    #[tokio::test]
    async fn test_superseded_response_arriving_first_keeps_loading() {
        let requester = ScriptedRequester::new()
            .with("fast", 5, Ok(vec![part("fast")]))
            .with("slow", 60, Ok(vec![part("slow")]));
        let mut view = SearchView::new(requester);

        view.set_search_string("fast");
        view.fetch_parts();
        view.set_search_string("slow");
        view.fetch_parts();

        assert!(!view.next_outcome().await);
        assert!(view.state().loading);
        assert!(view.state().parts.is_empty());

        assert!(view.next_outcome().await);
        assert!(!view.state().loading);
        assert_eq!(view.state().parts, vec![part("slow")]);
    }

    #[tokio::test]
    async fn test_poll_outcomes_does_not_block() {
        let requester = ScriptedRequester::new().with("brake", 30, Ok(vec![part("A")]));
        let mut view = SearchView::new(requester);
        view.set_search_string("brake");
        view.fetch_parts();

        assert_eq!(view.poll_outcomes(), 0);
        assert!(view.state().loading);

        tokio::time::sleep(std::time::Duration::from_millis(80)).await;
        assert_eq!(view.poll_outcomes(), 1);
        assert!(!view.state().loading);
    }
}
