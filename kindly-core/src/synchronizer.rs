//! Orchestrator that maps selections to queries and keeps one result set current.
//!
//! Every query gets a [`QueryToken`] from a monotonic counter. Queries run as
//! spawned tasks and report back over a channel owned by the synchronizer; the
//! owning UI loop applies them with [`ResultSynchronizer::drain_completions`]
//! or [`ResultSynchronizer::settle`]. A completion is applied only when its
//! token is the latest one issued, so the last selection wins whatever order
//! the responses arrive in.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::model::{CategoryId, ProviderRecord};
use crate::ports::{GatewayError, ProviderGateway, ProviderQuery};

/// Identity of an issued query. Later queries carry larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryToken(u64);

impl QueryToken {
    /// Sequence number of the query.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Lifecycle of the synchronizer between selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No query for the latest selection is outstanding.
    Idle,
    /// The latest selection's query has not answered yet.
    QueryInFlight {
        /// Token of the outstanding query.
        token: QueryToken,
        /// Category it was issued for.
        category: CategoryId,
    },
}

/// The most recent query that failed for the latest selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFailure {
    /// Category the failed query was issued for.
    pub category: CategoryId,
    /// Error reported by the gateway.
    pub message: String,
}

/// Answer of a spawned query, delivered back to the owning loop.
#[derive(Debug)]
pub(crate) struct QueryCompletion {
    token: QueryToken,
    category: CategoryId,
    outcome: Result<Vec<ProviderRecord>, GatewayError>,
}

/// What applying a completion did to the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The result set was replaced.
    Applied {
        /// Number of records now held.
        records: usize,
    },
    /// The query failed; the previous result set was kept.
    Failed,
    /// A newer query had been issued; the completion was dropped.
    Stale,
}

/// Read-only view of the synchronizer handed to the result view.
#[derive(Debug, Clone, Copy)]
pub struct ResultSnapshot<'a> {
    /// Current result set.
    pub results: &'a [ProviderRecord],
    /// Category the current result set was produced for.
    pub category: Option<CategoryId>,
    /// Category of the outstanding query, if any.
    pub pending: Option<CategoryId>,
    /// Failure of the latest query, if it failed.
    pub failure: Option<&'a QueryFailure>,
}

/// Owns the result set of one active services view.
pub struct ResultSynchronizer {
    gateway: Arc<dyn ProviderGateway>,
    completion_tx: UnboundedSender<QueryCompletion>,
    completion_rx: UnboundedReceiver<QueryCompletion>,

    results: Vec<ProviderRecord>,
    results_category: Option<CategoryId>,
    last_failure: Option<QueryFailure>,

    phase: SyncPhase,
    next_token: u64,
    latest: Option<QueryToken>,
    outstanding: usize,
}

impl ResultSynchronizer {
    /// Create an idle synchronizer with an empty result set.
    #[must_use]
    pub fn new(gateway: Arc<dyn ProviderGateway>) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            gateway,
            completion_tx,
            completion_rx,
            results: Vec::new(),
            results_category: None,
            last_failure: None,
            phase: SyncPhase::Idle,
            next_token: 0,
            latest: None,
            outstanding: 0,
        }
    }

    /// Issue the query for `category` and return without waiting for it.
    ///
    /// Accepted in any phase. Must be called from within a tokio runtime.
    pub fn select_category(&mut self, category: CategoryId) -> QueryToken {
        let token = self.issue(category);
        let query = ProviderQuery::for_category(category);
        let gateway = Arc::clone(&self.gateway);
        let completions = self.completion_tx.clone();

        debug!(token = token.0, %category, ?query, "dispatching provider query");

        tokio::spawn(async move {
            // A panicking gateway still has to answer, or the query stays in flight.
            let outcome = tokio::spawn(async move { query.run(gateway.as_ref()).await })
                .await
                .unwrap_or_else(|err| {
                    Err(GatewayError::Internal(format!("query task aborted: {err}")))
                });
            let completion = QueryCompletion {
                token,
                category,
                outcome,
            };
            if completions.send(completion).is_err() {
                debug!(token = token.0, "view released before the query answered");
            }
        });

        token
    }

    /// Select by raw selector code. Unknown codes fall back to all providers.
    pub fn select_code(&mut self, code: u8) -> QueryToken {
        let category = CategoryId::from_code(code).unwrap_or_else(|| {
            warn!(code, "unrecognized category code, querying all providers");
            CategoryId::All
        });
        self.select_category(category)
    }

    /// Apply one completion, honouring the latest-token rule.
    pub(crate) fn apply(&mut self, completion: QueryCompletion) -> CompletionOutcome {
        let QueryCompletion {
            token,
            category,
            outcome,
        } = completion;
        self.outstanding = self.outstanding.saturating_sub(1);

        if self.latest != Some(token) {
            debug!(token = token.0, %category, "dropping stale provider response");
            return CompletionOutcome::Stale;
        }

        self.phase = SyncPhase::Idle;

        match outcome {
            Ok(records) => {
                let count = records.len();
                info!(token = token.0, %category, records = count, "provider results updated");
                self.results = records;
                self.results_category = Some(category);
                self.last_failure = None;
                CompletionOutcome::Applied { records: count }
            }
            Err(err) => {
                warn!(token = token.0, %category, error = %err, "provider query failed, keeping previous results");
                self.last_failure = Some(QueryFailure {
                    category,
                    message: err.to_string(),
                });
                CompletionOutcome::Failed
            }
        }
    }

    /// Apply every completion that has already arrived. Never waits.
    ///
    /// Returns how many completions were handled, stale ones included.
    pub fn drain_completions(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply(completion);
            handled += 1;
        }
        handled
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `None` right away when no query is outstanding.
    pub async fn settle(&mut self) -> Option<CompletionOutcome> {
        if self.outstanding == 0 {
            return None;
        }
        let completion = self.completion_rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Current result set.
    #[must_use]
    pub fn results(&self) -> &[ProviderRecord] {
        &self.results
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Failure of the latest query, if it failed.
    #[must_use]
    pub const fn last_failure(&self) -> Option<&QueryFailure> {
        self.last_failure.as_ref()
    }

    /// Token of the most recently issued query.
    #[must_use]
    pub const fn latest_token(&self) -> Option<QueryToken> {
        self.latest
    }

    /// Category the current result set was produced for.
    #[must_use]
    pub const fn selected_category(&self) -> Option<CategoryId> {
        self.results_category
    }

    /// Whether the latest selection is still waiting for its answer.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.phase, SyncPhase::QueryInFlight { .. })
    }

    /// Borrow everything the result view needs.
    #[must_use]
    pub fn snapshot(&self) -> ResultSnapshot<'_> {
        let pending = match self.phase {
            SyncPhase::Idle => None,
            SyncPhase::QueryInFlight { category, .. } => Some(category),
        };
        ResultSnapshot {
            results: &self.results,
            category: self.results_category,
            pending,
            failure: self.last_failure.as_ref(),
        }
    }

    fn issue(&mut self, category: CategoryId) -> QueryToken {
        self.next_token += 1;
        let token = QueryToken(self.next_token);
        self.latest = Some(token);
        self.outstanding += 1;
        self.phase = SyncPhase::QueryInFlight { token, category };
        token
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use tokio::sync::oneshot;

    use super::*;

    type Reply = Result<Vec<ProviderRecord>, GatewayError>;

    /// Gateway answering immediately unless a reply was put on hold.
    #[derive(Default)]
    pub(crate) struct ScriptedGateway {
        calls: Mutex<Vec<ProviderQuery>>,
        held: Mutex<HashMap<ProviderQuery, oneshot::Receiver<Reply>>>,
    }

    impl ScriptedGateway {
        pub(crate) fn hold(&self, query: ProviderQuery) -> oneshot::Sender<Reply> {
            let (reply_tx, reply_rx) = oneshot::channel();
            self.held
                .lock()
                .expect("held replies lock")
                .insert(query, reply_rx);
            reply_tx
        }

        pub(crate) fn calls(&self) -> Vec<ProviderQuery> {
            self.calls.lock().expect("calls lock").clone()
        }

        pub(crate) fn records_for(query: ProviderQuery) -> Vec<ProviderRecord> {
            vec![ProviderRecord::named(format!("{query:?}"))]
        }

        async fn answer(&self, query: ProviderQuery) -> Reply {
            self.calls.lock().expect("calls lock").push(query);
            let held = self.held.lock().expect("held replies lock").remove(&query);
            match held {
                Some(reply_rx) => reply_rx
                    .await
                    .unwrap_or_else(|_| Err(GatewayError::Internal("reply dropped".to_owned()))),
                None => Ok(Self::records_for(query)),
            }
        }
    }

    #[async_trait]
    impl ProviderGateway for ScriptedGateway {
        async fn fetch_all(&self) -> Reply {
            self.answer(ProviderQuery::FetchAll).await
        }

        async fn fetch_child_care(&self) -> Reply {
            self.answer(ProviderQuery::FetchChildCare).await
        }

        async fn fetch_elder_care(&self) -> Reply {
            self.answer(ProviderQuery::FetchElderCare).await
        }

        async fn fetch_pet_care(&self) -> Reply {
            self.answer(ProviderQuery::FetchPetCare).await
        }
    }

    fn names(records: &[ProviderRecord]) -> Vec<String> {
        records.iter().map(ProviderRecord::display_name).collect()
    }

    #[tokio::test]
    async fn starts_idle_and_empty() {
        let mut sync = ResultSynchronizer::new(Arc::new(ScriptedGateway::default()));

        assert!(sync.results().is_empty());
        assert_eq!(sync.phase(), SyncPhase::Idle);
        assert_eq!(sync.latest_token(), None);
        assert_eq!(sync.settle().await, None);
    }

    #[tokio::test]
    async fn last_selection_wins_when_everything_answers() {
        let gateway = Arc::new(ScriptedGateway::default());
        let mut sync = ResultSynchronizer::new(gateway.clone());

        sync.select_category(CategoryId::ChildCare);
        sync.select_category(CategoryId::PetCare);
        let last = sync.select_category(CategoryId::ElderCare);
        while sync.settle().await.is_some() {}

        assert_eq!(sync.latest_token(), Some(last));
        assert_eq!(
            sync.results(),
            ScriptedGateway::records_for(ProviderQuery::FetchElderCare).as_slice()
        );
        assert_eq!(sync.selected_category(), Some(CategoryId::ElderCare));
        assert_eq!(sync.phase(), SyncPhase::Idle);
    }

    #[tokio::test]
    async fn late_answer_for_older_selection_is_dropped() {
        let gateway = Arc::new(ScriptedGateway::default());
        let child_reply = gateway.hold(ProviderQuery::FetchChildCare);
        let pet_reply = gateway.hold(ProviderQuery::FetchPetCare);
        let mut sync = ResultSynchronizer::new(gateway.clone());

        sync.select_category(CategoryId::ChildCare);
        sync.select_category(CategoryId::PetCare);

        pet_reply
            .send(Ok(vec![ProviderRecord::named("pet-sitter")]))
            .expect("pet query waiting");
        assert_eq!(
            sync.settle().await,
            Some(CompletionOutcome::Applied { records: 1 })
        );

        child_reply
            .send(Ok(vec![
                ProviderRecord::named("nanny"),
                ProviderRecord::named("babysitter"),
            ]))
            .expect("child query waiting");
        assert_eq!(sync.settle().await, Some(CompletionOutcome::Stale));

        assert_eq!(names(sync.results()), vec!["pet-sitter"]);
        assert_eq!(sync.selected_category(), Some(CategoryId::PetCare));
    }

    #[tokio::test]
    async fn stale_answer_keeps_newer_query_in_flight() {
        let gateway = Arc::new(ScriptedGateway::default());
        let child_reply = gateway.hold(ProviderQuery::FetchChildCare);
        let elder_reply = gateway.hold(ProviderQuery::FetchElderCare);
        let mut sync = ResultSynchronizer::new(gateway.clone());

        sync.select_category(CategoryId::ChildCare);
        let elder = sync.select_category(CategoryId::ElderCare);

        child_reply
            .send(Ok(vec![ProviderRecord::named("nanny")]))
            .expect("child query waiting");
        assert_eq!(sync.settle().await, Some(CompletionOutcome::Stale));
        assert_eq!(
            sync.phase(),
            SyncPhase::QueryInFlight {
                token: elder,
                category: CategoryId::ElderCare
            }
        );
        assert!(sync.results().is_empty());

        elder_reply.send(Ok(Vec::new())).expect("elder query waiting");
        assert_eq!(
            sync.settle().await,
            Some(CompletionOutcome::Applied { records: 0 })
        );
        assert!(!sync.is_pending());
    }

    #[tokio::test]
    async fn elder_care_selection_issues_exactly_one_query() {
        let gateway = Arc::new(ScriptedGateway::default());
        let mut sync = ResultSynchronizer::new(gateway.clone());

        sync.select_category(CategoryId::ElderCare);
        sync.settle().await;

        assert_eq!(gateway.calls(), vec![ProviderQuery::FetchElderCare]);
    }

    #[tokio::test]
    async fn unknown_code_queries_all_providers() {
        let gateway = Arc::new(ScriptedGateway::default());
        let mut sync = ResultSynchronizer::new(gateway.clone());

        sync.select_code(42);
        sync.settle().await;

        assert_eq!(gateway.calls(), vec![ProviderQuery::FetchAll]);
        assert_eq!(sync.selected_category(), Some(CategoryId::All));
    }

    #[tokio::test]
    async fn known_codes_map_to_their_queries() {
        let gateway = Arc::new(ScriptedGateway::default());
        let mut sync = ResultSynchronizer::new(gateway.clone());

        for code in [1, 2, 3] {
            sync.select_code(code);
            sync.settle().await;
        }

        assert_eq!(
            gateway.calls(),
            vec![
                ProviderQuery::FetchChildCare,
                ProviderQuery::FetchElderCare,
                ProviderQuery::FetchPetCare
            ]
        );
    }

    #[tokio::test]
    async fn failure_keeps_previous_results_and_is_reported() {
        let gateway = Arc::new(ScriptedGateway::default());
        let child_reply = gateway.hold(ProviderQuery::FetchChildCare);
        let mut sync = ResultSynchronizer::new(gateway.clone());

        sync.select_category(CategoryId::PetCare);
        sync.settle().await;
        let before = sync.results().to_vec();

        sync.select_category(CategoryId::ChildCare);
        child_reply
            .send(Err(GatewayError::Status {
                status: 500,
                message: "database down".to_owned(),
            }))
            .expect("child query waiting");
        assert_eq!(sync.settle().await, Some(CompletionOutcome::Failed));

        assert_eq!(sync.results(), before.as_slice());
        assert_eq!(sync.selected_category(), Some(CategoryId::PetCare));
        let failure = sync.last_failure().expect("failure recorded");
        assert_eq!(failure.category, CategoryId::ChildCare);
        assert!(failure.message.contains("database down"));
        assert_eq!(sync.phase(), SyncPhase::Idle);
    }

    #[tokio::test]
    async fn success_clears_previous_failure() {
        let gateway = Arc::new(ScriptedGateway::default());
        let elder_reply = gateway.hold(ProviderQuery::FetchElderCare);
        let mut sync = ResultSynchronizer::new(gateway.clone());

        sync.select_category(CategoryId::ElderCare);
        elder_reply
            .send(Err(GatewayError::Internal("timeout".to_owned())))
            .expect("elder query waiting");
        sync.settle().await;
        assert!(sync.last_failure().is_some());

        sync.select_category(CategoryId::PetCare);
        sync.settle().await;
        assert_eq!(sync.last_failure(), None);
    }

    #[tokio::test]
    async fn stale_failure_is_ignored() {
        let gateway = Arc::new(ScriptedGateway::default());
        let child_reply = gateway.hold(ProviderQuery::FetchChildCare);
        let mut sync = ResultSynchronizer::new(gateway.clone());

        sync.select_category(CategoryId::ChildCare);
        sync.select_category(CategoryId::PetCare);
        sync.settle().await;

        child_reply
            .send(Err(GatewayError::Internal("late failure".to_owned())))
            .expect("child query waiting");
        assert_eq!(sync.settle().await, Some(CompletionOutcome::Stale));
        assert_eq!(sync.last_failure(), None);
        assert_eq!(sync.selected_category(), Some(CategoryId::PetCare));
    }

    #[tokio::test]
    async fn tokens_increase_with_every_selection() {
        let mut sync = ResultSynchronizer::new(Arc::new(ScriptedGateway::default()));

        let first = sync.select_category(CategoryId::PetCare);
        let second = sync.select_category(CategoryId::PetCare);

        assert!(second > first, "tokens must be monotonic");
        assert_eq!(sync.latest_token(), Some(second));
    }

    #[tokio::test]
    async fn drain_applies_arrived_completions_without_waiting() {
        let gateway = Arc::new(ScriptedGateway::default());
        let mut sync = ResultSynchronizer::new(gateway.clone());

        assert_eq!(sync.drain_completions(), 0);

        sync.select_category(CategoryId::ChildCare);
        let mut handled = 0;
        while handled == 0 {
            tokio::task::yield_now().await;
            handled = sync.drain_completions();
        }

        assert_eq!(handled, 1);
        assert_eq!(sync.selected_category(), Some(CategoryId::ChildCare));
    }

    #[tokio::test]
    async fn released_synchronizer_ignores_late_answers() {
        let gateway = Arc::new(ScriptedGateway::default());
        let pet_reply = gateway.hold(ProviderQuery::FetchPetCare);
        let mut sync = ResultSynchronizer::new(gateway.clone());

        sync.select_category(CategoryId::PetCare);
        tokio::task::yield_now().await;
        drop(sync);

        pet_reply
            .send(Ok(vec![ProviderRecord::named("walker")]))
            .expect("pet query still waiting");
        tokio::task::yield_now().await;

        assert_eq!(gateway.calls(), vec![ProviderQuery::FetchPetCare]);
    }

    struct PanickingGateway;

    #[async_trait]
    impl ProviderGateway for PanickingGateway {
        async fn fetch_all(&self) -> Reply {
            Ok(Vec::new())
        }

        async fn fetch_child_care(&self) -> Reply {
            panic!("child care backend exploded")
        }

        async fn fetch_elder_care(&self) -> Reply {
            Ok(Vec::new())
        }

        async fn fetch_pet_care(&self) -> Reply {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn panicking_gateway_is_reported_as_failure() {
        let mut sync = ResultSynchronizer::new(Arc::new(PanickingGateway));

        sync.select_category(CategoryId::ChildCare);

        assert_eq!(sync.settle().await, Some(CompletionOutcome::Failed));
        assert_eq!(sync.phase(), SyncPhase::Idle);
        let failure = sync.last_failure().expect("panic surfaced as failure");
        assert_eq!(failure.category, CategoryId::ChildCare);
        assert!(failure.message.contains("query task aborted"));
        assert_eq!(sync.settle().await, None);
    }

    #[tokio::test]
    async fn every_issued_query_is_settled_exactly_once() {
        let mut sync = ResultSynchronizer::new(Arc::new(ScriptedGateway::default()));

        let first = sync.select_category(CategoryId::ChildCare);
        let second = sync.select_category(CategoryId::ElderCare);
        assert_eq!(second.get(), first.get() + 1);

        let mut outcomes = Vec::new();
        while let Some(outcome) = sync.settle().await {
            outcomes.push(outcome);
        }

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.contains(&CompletionOutcome::Stale));
        assert!(outcomes.contains(&CompletionOutcome::Applied { records: 1 }));
        assert_eq!(sync.drain_completions(), 0);
    }
}
