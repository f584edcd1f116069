use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::errors::AuthError;
use crate::domain::invitation::models::InvitationToken;
use crate::domain::invitation::models::InvitationTokenFilter;
use crate::domain::invitation::models::InvitationTokenStatus;
use crate::domain::invitation::models::Paging;
use crate::domain::invitation::ports::InvitationTokenStore;

const GENERATE_ATTEMPTS: usize = 5;

#[derive(Debug, Clone)]
struct Entry {
    record: InvitationToken,
    /// `None` keeps the entry until the process exits.
    evict_at: Option<DateTime<Utc>>,
}

/// Process-local invitation token store.
///
/// One mutex guards the whole map, so every operation, consume included, is a
/// single critical section. Evictions are applied lazily on each access.
#[derive(Debug)]
pub struct InMemoryInvitationTokenStore {
    entries: Mutex<BTreeMap<String, Entry>>,
    ttl: Duration,
}

impl InMemoryInvitationTokenStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            ttl,
        }
    }

    /// Seed a record as-is, bypassing generation.
    ///
    /// `evict_after` plays the role of the backend TTL; `None` never evicts,
    /// which lets an expired record stay visible.
    pub async fn insert_record(&self, record: InvitationToken, evict_after: Option<Duration>) {
        let evict_at = evict_after.map(|after| Utc::now() + after);
        self.entries
            .lock()
            .await
            .insert(record.token.clone(), Entry { record, evict_at });
    }

    /// Current record for a token, without any status check.
    pub async fn get(&self, token: &str) -> Option<InvitationToken> {
        let mut entries = self.entries.lock().await;
        evict(&mut entries, Utc::now());
        entries.get(token).map(|entry| entry.record.clone())
    }
}

fn evict(entries: &mut BTreeMap<String, Entry>, now: DateTime<Utc>) {
    entries.retain(|_, entry| entry.evict_at.map_or(true, |at| at > now));
}

#[async_trait]
impl InvitationTokenStore for InMemoryInvitationTokenStore {
    async fn generate(&self) -> Result<InvitationToken, AuthError> {
        let now = Utc::now();
        let mut entries = self.entries.lock().await;
        evict(&mut entries, now);

        for _ in 0..GENERATE_ATTEMPTS {
            let record = InvitationToken::pending(InvitationToken::generate_value(), now, self.ttl);
            if entries.contains_key(&record.token) {
                continue;
            }

            entries.insert(
                record.token.clone(),
                Entry {
                    record: record.clone(),
                    evict_at: Some(now + self.ttl),
                },
            );
            return Ok(record);
        }

        Err(AuthError::StoreError(format!(
            "No free invitation token after {} attempts",
            GENERATE_ATTEMPTS
        )))
    }

    async fn validate(&self, token: &str) -> Result<(), AuthError> {
        let now = Utc::now();
        let mut entries = self.entries.lock().await;
        evict(&mut entries, now);

        entries
            .get(token)
            .ok_or(AuthError::TokenNotFound)?
            .record
            .ensure_redeemable(now.timestamp())
    }

    async fn consume(&self, token: &str) -> Result<(), AuthError> {
        let now = Utc::now();
        let mut entries = self.entries.lock().await;
        evict(&mut entries, now);

        let entry = entries.get_mut(token).ok_or(AuthError::TokenNotFound)?;
        entry.record.ensure_redeemable(now.timestamp())?;
        entry.record.status = InvitationTokenStatus::Used;

        Ok(())
    }

    async fn list(
        &self,
        filter: &InvitationTokenFilter,
        paging: &Paging,
    ) -> Result<Vec<InvitationToken>, AuthError> {
        let mut entries = self.entries.lock().await;
        evict(&mut entries, Utc::now());

        Ok(paging.apply(
            entries
                .values()
                .map(|entry| &entry.record)
                .filter(|record| filter.matches(record))
                .cloned(),
        ))
    }

    async fn update(&self, token: &str, status: InvitationTokenStatus) -> Result<(), AuthError> {
        let mut entries = self.entries.lock().await;
        evict(&mut entries, Utc::now());

        let entry = entries.get_mut(token).ok_or(AuthError::TokenNotFound)?;
        entry.record.status = status;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::Barrier;

    use super::*;

    fn store() -> InMemoryInvitationTokenStore {
        InMemoryInvitationTokenStore::new(Duration::hours(24))
    }

    fn record(token: &str, status: InvitationTokenStatus, expiry: i64) -> InvitationToken {
        InvitationToken {
            token: token.to_string(),
            status,
            expiry,
        }
    }

    #[tokio::test]
    async fn test_generate_then_validate_leaves_status_pending() {
        let store = store();
        let before = Utc::now().timestamp();

        let token = store.generate().await.unwrap();
        assert_eq!(token.status, InvitationTokenStatus::Pending);
        assert!(token.expiry >= before + 24 * 60 * 60);

        assert_eq!(store.validate(&token.token).await, Ok(()));
        assert_eq!(store.validate(&token.token).await, Ok(()));
        assert_eq!(
            store.get(&token.token).await.unwrap().status,
            InvitationTokenStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_consume_once() {
        let store = store();
        let token = store.generate().await.unwrap();

        assert_eq!(store.consume(&token.token).await, Ok(()));
        assert_eq!(
            store.consume(&token.token).await,
            Err(AuthError::TokenAlreadyUsed)
        );
        assert_eq!(
            store.validate(&token.token).await,
            Err(AuthError::TokenAlreadyUsed)
        );
    }

    #[tokio::test]
    async fn test_concurrent_consume_has_single_winner() {
        let store = Arc::new(store());
        let token = store.generate().await.unwrap().token;

        let barrier = Arc::new(Barrier::new(10));
        let mut handles = Vec::new();

        for _ in 0..10 {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let token = token.clone();

            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                store.consume(&token).await
            }));
        }

        let mut successes = 0;
        let mut already_used = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(AuthError::TokenAlreadyUsed) => already_used += 1,
                Err(other) => panic!("Unexpected consume outcome: {:?}", other),
            }
        }

        assert_eq!(successes, 1, "Exactly one concurrent consumer should succeed");
        assert_eq!(already_used, 9);
        assert_eq!(
            store.get(&token).await.unwrap().status,
            InvitationTokenStatus::Used
        );
    }

    #[tokio::test]
    async fn test_expired_record_is_not_mutated() {
        let store = store();
        let expired = record(
            "EXPIRED1",
            InvitationTokenStatus::Pending,
            Utc::now().timestamp() - 60,
        );
        store.insert_record(expired.clone(), None).await;

        assert_eq!(store.validate("EXPIRED1").await, Err(AuthError::TokenExpired));
        assert_eq!(store.consume("EXPIRED1").await, Err(AuthError::TokenExpired));
        assert_eq!(store.get("EXPIRED1").await, Some(expired));
    }

    #[tokio::test]
    async fn test_absent_and_evicted_are_not_found() {
        let store = store();
        store
            .insert_record(
                record("GONE1", InvitationTokenStatus::Pending, Utc::now().timestamp() + 60),
                Some(Duration::zero()),
            )
            .await;

        assert_eq!(store.consume("NEVER1").await, Err(AuthError::TokenNotFound));
        assert_eq!(store.validate("GONE1").await, Err(AuthError::TokenNotFound));
        assert_eq!(store.get("GONE1").await, None);
    }

    #[tokio::test]
    async fn test_update_overrides_status_and_keeps_expiry() {
        let store = store();
        let token = store.generate().await.unwrap();

        store
            .update(&token.token, InvitationTokenStatus::Used)
            .await
            .unwrap();
        assert_eq!(
            store.validate(&token.token).await,
            Err(AuthError::TokenAlreadyUsed)
        );

        store
            .update(&token.token, InvitationTokenStatus::Pending)
            .await
            .unwrap();
        assert_eq!(store.get(&token.token).await, Some(token.clone()));
        assert_eq!(store.consume(&token.token).await, Ok(()));

        assert_eq!(
            store.update("NEVER1", InvitationTokenStatus::Used).await,
            Err(AuthError::TokenNotFound)
        );
    }

    #[tokio::test]
    async fn test_list_filters_and_pages() {
        let store = store();
        let expiry = Utc::now().timestamp() + 3600;
        for (token, status) in [
            ("A", InvitationTokenStatus::Pending),
            ("B", InvitationTokenStatus::Used),
            ("C", InvitationTokenStatus::Pending),
            ("D", InvitationTokenStatus::Pending),
        ] {
            store.insert_record(record(token, status, expiry), None).await;
        }

        let all = store
            .list(&InvitationTokenFilter::default(), &Paging::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 4);

        let pending = InvitationTokenFilter {
            status: Some(InvitationTokenStatus::Pending),
        };
        let second_page = store
            .list(&pending, &Paging::new(Some(2), Some(2)).unwrap())
            .await
            .unwrap();
        let tokens: Vec<&str> = second_page.iter().map(|t| t.token.as_str()).collect();
        assert_eq!(tokens, vec!["D"]);

        let past_the_end = store
            .list(&pending, &Paging::new(Some(3), Some(2)).unwrap())
            .await
            .unwrap();
        assert!(past_the_end.is_empty());
    }
}
