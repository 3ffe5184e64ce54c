use std::sync::Arc;

use chrono::{DateTime, Utc};
use lexilens_backend::DefinitionBackend;
use lexilens_types::LookupResult;

use crate::definition;
use crate::error::{LookupError, StoreError};
use crate::history::HistoryStore;
use crate::quota::{QuotaDecision, QuotaTracker};
use crate::storage::{ClientStore, HISTORY_KEY, QUOTA_KEY};
use crate::validator::{self, Query};

/// Validates, checks quota, asks the backend once and records the outcome.
///
/// `lookup` takes `&mut self`, so one client can only run one lookup at a
/// time. Quota and history change only after a fully successful round trip,
/// and both are persisted in a single store commit.
pub struct LookupClient<S: ClientStore> {
    backend: Arc<dyn DefinitionBackend>,
    store: S,
    quota: QuotaTracker,
    history: HistoryStore,
}

impl<S: ClientStore> LookupClient<S> {
    /// Restore quota and history from `store`
    pub fn new(backend: Arc<dyn DefinitionBackend>, store: S, daily_limit: u32) -> Self {
        let quota = QuotaTracker::load(&store, daily_limit);
        let history = HistoryStore::load(&store);

        let meta = backend.metadata();
        tracing::debug!(
            history_len = history.len(),
            backend = %meta.name,
            model = %meta.model,
            "lookup client ready"
        );

        Self {
            backend,
            store,
            quota,
            history,
        }
    }

    pub async fn lookup(
        &mut self,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<LookupResult, LookupError> {
        let query = validator::validate(raw)?;

        if self.quota.remaining(now) == 0 {
            tracing::info!("Daily limit reached, skipping lookup of {query}");
            return Err(LookupError::QuotaExceeded);
        }

        tracing::info!("Looking up {query}");

        let result = definition::fetch_definition(self.backend.as_ref(), query.as_str())
            .await
            .map_err(|e| {
                tracing::error!("Lookup of {query} failed: {e}");
                LookupError::BackendFailure(e)
            })?;

        self.commit(query, now)?;

        Ok(result)
    }

    /// Apply the success-path updates to copies, persist both, then swap them in
    fn commit(&mut self, query: Query, now: DateTime<Utc>) -> Result<(), LookupError> {
        let mut quota = self.quota.clone();
        if let QuotaDecision::Denied(reason) = quota.check_and_consume(now) {
            tracing::info!("Quota denied at commit: {reason:?}");
            return Err(LookupError::QuotaExceeded);
        }

        let mut history = self.history.clone();
        history.add(query);

        let quota_record = serde_json::to_value(quota.state())
            .map_err(|e| LookupError::Persistence(StoreError::from(e)))?;

        self.store
            .commit(vec![
                (QUOTA_KEY, quota_record),
                (HISTORY_KEY, history.to_record()),
            ])
            .map_err(|e| {
                tracing::error!("Failed to persist lookup state: {e}");
                LookupError::Persistence(e)
            })?;

        self.quota = quota;
        self.history = history;
        Ok(())
    }

    pub fn history(&self) -> &[Query] {
        self.history.all()
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> u32 {
        self.quota.remaining(now)
    }

    pub fn quota(&self) -> &QuotaTracker {
        &self.quota
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn reset_history(&mut self) -> Result<(), StoreError> {
        self.store.remove(&[HISTORY_KEY])?;
        self.history.clear();
        Ok(())
    }

    pub fn reset_quota(&mut self, now: DateTime<Utc>) -> Result<(), StoreError> {
        let mut quota = self.quota.clone();
        quota.reset(now);

        self.store
            .commit(vec![(QUOTA_KEY, serde_json::to_value(quota.state())?)])?;
        self.quota = quota;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use lexilens_backend::{BackendError, Completion, ProviderMetadata};
    use lexilens_types::TokenUsage;
    use serde_json::{Value, json};

    use super::*;
    use crate::error::{FetchError, ValidationError};
    use crate::quota::{MAX_QUERIES_PER_DAY, QuotaState};
    use crate::storage::MemoryStore;

    const GOOD: &str = r#"{"definition":"d","synonyms":["s"],"antonyms":["a"],"examples":["e"],"fact":"f"}"#;

    enum Reply {
        Text(&'static str),
        Fail,
    }

    /// Canned backend that records every prompt it receives
    struct FakeBackend {
        reply: Reply,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DefinitionBackend for FakeBackend {
        async fn generate(&self, prompt: &str) -> Result<Completion, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());

            match self.reply {
                Reply::Text(content) => Ok(Completion {
                    content: content.to_string(),
                    usage: TokenUsage::new(1000, 500),
                }),
                Reply::Fail => Err(BackendError::RateLimitExceeded),
            }
        }

        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                name: "fake".to_string(),
                model: "fake-1".to_string(),
                requires_api_key: false,
            }
        }
    }

    /// Store whose commits always fail
    struct BrokenStore;

    impl ClientStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Ok(None)
        }

        fn commit(&mut self, _records: Vec<(&str, Value)>) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }

        fn remove(&mut self, _keys: &[&str]) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 4, 12, 0, 0).unwrap()
    }

    fn client(backend: Arc<FakeBackend>, store: MemoryStore) -> LookupClient<MemoryStore> {
        LookupClient::new(backend, store, MAX_QUERIES_PER_DAY)
    }

    fn words<S: ClientStore>(client: &LookupClient<S>) -> Vec<&str> {
        client.history().iter().map(Query::as_str).collect()
    }

    fn store_with_history(entries: &[&str]) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.commit(vec![(HISTORY_KEY, json!(entries))]).unwrap();
        store
    }

    #[tokio::test]
    async fn success_updates_quota_and_history() {
        let backend = FakeBackend::new(Reply::Text(GOOD));
        let mut client = client(backend.clone(), MemoryStore::new());
        let before = client.remaining(now());

        let result = client.lookup("  resilience ", now()).await.unwrap();

        assert_eq!(result.definition, "d");
        assert_eq!(result.fact.as_deref(), Some("f"));
        assert_eq!(result.usage, TokenUsage::new(1000, 500));
        assert_eq!(client.remaining(now()), before - 1);
        assert_eq!(words(&client), ["resilience"]);
        assert_eq!(backend.calls(), 1);
        assert_eq!(
            backend.prompts.lock().unwrap()[0],
            definition::build_prompt("resilience")
        );
    }

    #[tokio::test]
    async fn success_is_persisted() {
        let mut client = client(FakeBackend::new(Reply::Text(GOOD)), MemoryStore::new());
        client.lookup("epiphany", now()).await.unwrap();

        let store = client.store().clone();
        assert_eq!(store.load(HISTORY_KEY).unwrap(), Some(json!(["epiphany"])));

        let quota: QuotaState =
            serde_json::from_value(store.load(QUOTA_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(quota.count, 1);
        assert_eq!(quota.window_expiry, now() + Duration::hours(24));

        let restored = LookupClient::new(
            FakeBackend::new(Reply::Text(GOOD)),
            store,
            MAX_QUERIES_PER_DAY,
        );
        assert_eq!(restored.remaining(now()), MAX_QUERIES_PER_DAY - 1);
        assert_eq!(words(&restored), ["epiphany"]);
    }

    #[tokio::test]
    async fn too_many_words_has_no_side_effects() {
        let backend = FakeBackend::new(Reply::Text(GOOD));
        let mut client = client(backend.clone(), MemoryStore::new());

        let err = client.lookup("a b c d", now()).await.unwrap_err();

        assert!(matches!(err, LookupError::Invalid(ValidationError::TooManyWords)));
        assert_eq!(backend.calls(), 0);
        assert_eq!(client.remaining(now()), MAX_QUERIES_PER_DAY);
        assert!(client.history().is_empty());
        assert!(client.store().load(QUOTA_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_input_has_no_side_effects() {
        let backend = FakeBackend::new(Reply::Text(GOOD));
        let mut client = client(backend.clone(), MemoryStore::new());

        for raw in ["", "   ", "\n\t"] {
            let err = client.lookup(raw, now()).await.unwrap_err();
            assert!(matches!(err, LookupError::Invalid(ValidationError::Missing)));
        }

        assert_eq!(backend.calls(), 0);
        assert_eq!(client.remaining(now()), MAX_QUERIES_PER_DAY);
        assert!(client.history().is_empty());
    }

    #[tokio::test]
    async fn exhausted_quota_skips_backend() {
        let mut store = MemoryStore::new();
        let state = QuotaState {
            count: MAX_QUERIES_PER_DAY,
            window_expiry: now() + Duration::hours(3),
        };
        store
            .commit(vec![(QUOTA_KEY, serde_json::to_value(state).unwrap())])
            .unwrap();

        let backend = FakeBackend::new(Reply::Text(GOOD));
        let mut client = client(backend.clone(), store);

        let err = client.lookup("anyword", now()).await.unwrap_err();

        assert!(matches!(err, LookupError::QuotaExceeded));
        assert_eq!(backend.calls(), 0);
        assert!(client.history().is_empty());
        assert_eq!(client.quota().state(), Some(state));
    }

    #[tokio::test]
    async fn expired_window_allows_lookup_again() {
        let mut store = MemoryStore::new();
        let state = QuotaState {
            count: MAX_QUERIES_PER_DAY,
            window_expiry: now() - Duration::minutes(1),
        };
        store
            .commit(vec![(QUOTA_KEY, serde_json::to_value(state).unwrap())])
            .unwrap();

        let mut client = client(FakeBackend::new(Reply::Text(GOOD)), store);
        client.lookup("anyword", now()).await.unwrap();

        assert_eq!(client.quota().state().unwrap().count, 1);
        assert_eq!(client.remaining(now()), MAX_QUERIES_PER_DAY - 1);
    }

    #[tokio::test]
    async fn unstructured_reply_is_backend_failure() {
        let backend = FakeBackend::new(Reply::Text("Sorry, I cannot help with that."));
        let mut client = client(backend.clone(), store_with_history(&["a"]));

        let err = client.lookup("resilience", now()).await.unwrap_err();

        assert!(matches!(err, LookupError::BackendFailure(FetchError::Parse(_))));
        assert_eq!(err.to_string(), "Failed to fetch definition");
        assert_eq!(backend.calls(), 1);
        assert_eq!(client.remaining(now()), MAX_QUERIES_PER_DAY);
        assert_eq!(words(&client), ["a"]);
    }

    #[tokio::test]
    async fn backend_error_is_backend_failure() {
        let backend = FakeBackend::new(Reply::Fail);
        let mut client = client(backend.clone(), MemoryStore::new());

        let err = client.lookup("resilience", now()).await.unwrap_err();

        assert!(matches!(err, LookupError::BackendFailure(FetchError::Backend(_))));
        assert_eq!(backend.calls(), 1);
        assert_eq!(client.remaining(now()), MAX_QUERIES_PER_DAY);
        assert!(client.history().is_empty());
    }

    #[tokio::test]
    async fn repeat_moves_entry_to_front() {
        let mut client = client(
            FakeBackend::new(Reply::Text(GOOD)),
            store_with_history(&["a", "b", "c"]),
        );

        client.lookup("b", now()).await.unwrap();

        assert_eq!(words(&client), ["b", "a", "c"]);
    }

    #[tokio::test]
    async fn history_keeps_five_most_recent() {
        let mut client = client(FakeBackend::new(Reply::Text(GOOD)), MemoryStore::new());

        for word in ["one", "two", "three", "four", "five", "six"] {
            client.lookup(word, now()).await.unwrap();
        }

        assert_eq!(words(&client), ["six", "five", "four", "three", "two"]);
        assert_eq!(client.remaining(now()), MAX_QUERIES_PER_DAY - 6);
    }

    #[tokio::test]
    async fn history_entries_can_be_looked_up_again() {
        let mut client = client(FakeBackend::new(Reply::Text(GOOD)), MemoryStore::new());
        client.lookup("  ice cream ", now()).await.unwrap();
        client.lookup("sorbet", now()).await.unwrap();

        let again = client.history()[1].as_str().to_string();
        client.lookup(&again, now()).await.unwrap();

        assert_eq!(words(&client), ["ice cream", "sorbet"]);
    }

    #[tokio::test]
    async fn failed_commit_changes_nothing() {
        let backend = FakeBackend::new(Reply::Text(GOOD));
        let mut client = LookupClient::new(backend.clone(), BrokenStore, MAX_QUERIES_PER_DAY);

        let err = client.lookup("resilience", now()).await.unwrap_err();

        assert!(matches!(err, LookupError::Persistence(_)));
        assert_eq!(client.remaining(now()), MAX_QUERIES_PER_DAY);
        assert!(client.history().is_empty());
    }

    #[tokio::test]
    async fn resets_clear_client_state() {
        let mut client = client(FakeBackend::new(Reply::Text(GOOD)), MemoryStore::new());
        client.lookup("resilience", now()).await.unwrap();

        client.reset_history().unwrap();
        client.reset_quota(now()).unwrap();

        assert!(client.history().is_empty());
        assert_eq!(client.remaining(now()), MAX_QUERIES_PER_DAY);
        assert!(client.store().load(HISTORY_KEY).unwrap().is_none());
    }
}
