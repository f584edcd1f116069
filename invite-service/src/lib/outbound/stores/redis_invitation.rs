use std::collections::HashMap;
use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::RedisError;
use redis::Script;

use crate::domain::errors::AuthError;
use crate::domain::invitation::models::InvitationToken;
use crate::domain::invitation::models::InvitationTokenFilter;
use crate::domain::invitation::models::InvitationTokenStatus;
use crate::domain::invitation::models::Paging;
use crate::domain::invitation::ports::InvitationTokenStore;

pub const DEFAULT_KEY_PREFIX: &str = "invitation_token:";

/// Attempts at finding an unused token string before giving up.
const GENERATE_ATTEMPTS: usize = 5;

const SCAN_BATCH: usize = 100;

// KEYS[1] = token key, ARGV[1] = expiry (epoch s), ARGV[2] = ttl (s).
// 1 when written, 0 when the key already exists.
const GENERATE_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return 0
end
redis.call('HSET', KEYS[1], 'status', 0, 'expiry', ARGV[1])
redis.call('EXPIRE', KEYS[1], ARGV[2])
return 1
"#;

// KEYS[1] = token key, ARGV[1] = now (epoch s).
// 0 consumed, -1 not found, -2 expired, -3 already used.
const CONSUME_SCRIPT: &str = r#"
local fields = redis.call('HMGET', KEYS[1], 'status', 'expiry')
if not fields[1] or not fields[2] then
    return -1
end
if tonumber(fields[2]) < tonumber(ARGV[1]) then
    return -2
end
if tonumber(fields[1]) ~= 0 then
    return -3
end
redis.call('HSET', KEYS[1], 'status', 1)
return 0
"#;

// KEYS[1] = token key, ARGV[1] = status.
// HSET on an existing hash keeps its TTL.
const UPDATE_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return 0
end
redis.call('HSET', KEYS[1], 'status', ARGV[1])
return 1
"#;

/// Invitation token store on Redis, one hash per token.
///
/// Every state change runs as a single server-side script, so concurrent
/// consumers are serialized by Redis itself.
#[derive(Clone)]
pub struct RedisInvitationTokenStore {
    connection: ConnectionManager,
    key_prefix: String,
    ttl: Duration,
    generate_script: Script,
    consume_script: Script,
    update_script: Script,
}

impl RedisInvitationTokenStore {
    /// Connect to Redis and prepare the store.
    ///
    /// # Arguments
    /// * `url` - Redis connection URL
    /// * `key_prefix` - Namespace prepended to every token key
    /// * `ttl` - Lifetime of generated tokens
    pub async fn connect(
        url: &str,
        key_prefix: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, RedisError> {
        let client = redis::Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;

        Ok(Self {
            connection,
            key_prefix: key_prefix.into(),
            ttl,
            generate_script: Script::new(GENERATE_SCRIPT),
            consume_script: Script::new(CONSUME_SCRIPT),
            update_script: Script::new(UPDATE_SCRIPT),
        })
    }

    fn key(&self, token: &str) -> String {
        format!("{}{}", self.key_prefix, token)
    }

    async fn fetch(&self, token: &str) -> Result<Option<InvitationToken>, AuthError> {
        let mut conn = self.connection.clone();

        let fields: HashMap<String, String> = redis::cmd("HGETALL")
            .arg(self.key(token))
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;

        decode_record(token, &fields)
    }
}

fn store_error(e: RedisError) -> AuthError {
    AuthError::StoreError(e.to_string())
}

/// Rebuild a record from its hash fields. An empty map is an absent key.
fn decode_record(
    token: &str,
    fields: &HashMap<String, String>,
) -> Result<Option<InvitationToken>, AuthError> {
    if fields.is_empty() {
        return Ok(None);
    }

    let field = |name: &str| -> Result<i64, AuthError> {
        fields
            .get(name)
            .and_then(|value| value.parse::<i64>().ok())
            .ok_or_else(|| {
                AuthError::StoreError(format!("Malformed invitation record field: {}", name))
            })
    };

    let status = InvitationTokenStatus::try_from(field("status")?)
        .map_err(|e| AuthError::StoreError(e.to_string()))?;

    Ok(Some(InvitationToken {
        token: token.to_string(),
        status,
        expiry: field("expiry")?,
    }))
}

/// Listing variant of [`decode_record`]: evicted keys and malformed hashes are
/// skipped so one bad entry does not hide the rest.
fn decode_listed(token: &str, fields: &HashMap<String, String>) -> Option<InvitationToken> {
    match decode_record(token, fields) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping malformed invitation record");
            None
        }
    }
}

#[async_trait]
impl InvitationTokenStore for RedisInvitationTokenStore {
    async fn generate(&self) -> Result<InvitationToken, AuthError> {
        let mut conn = self.connection.clone();

        for _ in 0..GENERATE_ATTEMPTS {
            let record =
                InvitationToken::pending(InvitationToken::generate_value(), Utc::now(), self.ttl);

            let written: i64 = self
                .generate_script
                .key(self.key(&record.token))
                .arg(record.expiry)
                .arg(self.ttl.num_seconds())
                .invoke_async(&mut conn)
                .await
                .map_err(store_error)?;

            if written == 1 {
                return Ok(record);
            }

            tracing::debug!("Invitation token collision, retrying");
        }

        Err(AuthError::StoreError(format!(
            "No free invitation token after {} attempts",
            GENERATE_ATTEMPTS
        )))
    }

    async fn validate(&self, token: &str) -> Result<(), AuthError> {
        self.fetch(token)
            .await?
            .ok_or(AuthError::TokenNotFound)?
            .ensure_redeemable(Utc::now().timestamp())
    }

    async fn consume(&self, token: &str) -> Result<(), AuthError> {
        let mut conn = self.connection.clone();

        let outcome: i64 = self
            .consume_script
            .key(self.key(token))
            .arg(Utc::now().timestamp())
            .invoke_async(&mut conn)
            .await
            .map_err(store_error)?;

        match outcome {
            0 => Ok(()),
            -1 => Err(AuthError::TokenNotFound),
            -2 => Err(AuthError::TokenExpired),
            -3 => Err(AuthError::TokenAlreadyUsed),
            other => Err(AuthError::StoreError(format!(
                "Unexpected consume outcome: {}",
                other
            ))),
        }
    }

    async fn list(
        &self,
        filter: &InvitationTokenFilter,
        paging: &Paging,
    ) -> Result<Vec<InvitationToken>, AuthError> {
        let mut conn = self.connection.clone();
        let pattern = format!("{}*", self.key_prefix);

        let mut seen = HashSet::new();
        let mut matched = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(store_error)?;

            // SCAN may return a key more than once across iterations.
            let keys: Vec<String> = keys
                .into_iter()
                .filter(|key| seen.insert(key.clone()))
                .collect();

            if !keys.is_empty() {
                let mut pipe = redis::pipe();
                for key in &keys {
                    pipe.hgetall(key);
                }
                let records: Vec<HashMap<String, String>> =
                    pipe.query_async(&mut conn).await.map_err(store_error)?;

                for (key, fields) in keys.iter().zip(records.iter()) {
                    let token = key.strip_prefix(&self.key_prefix).unwrap_or(key);
                    if let Some(record) = decode_listed(token, fields) {
                        if filter.matches(&record) {
                            matched.push(record);
                        }
                    }
                }
            }

            cursor = next;
            if cursor == 0 || matched.len() >= paging.end() {
                break;
            }
        }

        Ok(paging.apply(matched))
    }

    async fn update(&self, token: &str, status: InvitationTokenStatus) -> Result<(), AuthError> {
        let mut conn = self.connection.clone();

        let updated: i64 = self
            .update_script
            .key(self.key(token))
            .arg(status.as_i64())
            .invoke_async(&mut conn)
            .await
            .map_err(store_error)?;

        if updated == 0 {
            return Err(AuthError::TokenNotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_decode_record() {
        let record = decode_record("abc", &fields(&[("status", "1"), ("expiry", "1700000000")]))
            .unwrap()
            .unwrap();

        assert_eq!(record.token, "abc");
        assert_eq!(record.status, InvitationTokenStatus::Used);
        assert_eq!(record.expiry, 1_700_000_000);
    }

    #[test]
    fn test_decode_absent_record() {
        assert_eq!(decode_record("abc", &HashMap::new()), Ok(None));
    }

    #[test]
    fn test_listing_skips_malformed_and_evicted_records() {
        assert_eq!(decode_listed("abc", &fields(&[("status", "7"), ("expiry", "1")])), None);
        assert_eq!(decode_listed("abc", &fields(&[("expiry", "1")])), None);
        assert_eq!(decode_listed("abc", &HashMap::new()), None);

        let record = decode_listed("abc", &fields(&[("status", "0"), ("expiry", "1")])).unwrap();
        assert_eq!(record.status, InvitationTokenStatus::Pending);
    }

    #[test]
    fn test_decode_malformed_record() {
        assert!(matches!(
            decode_record("abc", &fields(&[("status", "7"), ("expiry", "1")])),
            Err(AuthError::StoreError(_))
        ));
        assert!(matches!(
            decode_record("abc", &fields(&[("status", "0")])),
            Err(AuthError::StoreError(_))
        ));
    }
}
