use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;

use crate::domain::errors::AuthError;
use crate::domain::invitation::errors::InvitationStatusError;
use crate::domain::invitation::errors::PagingError;

/// Length of a generated invitation token string.
pub const TOKEN_LENGTH: usize = 32;

/// Lifecycle status of an invitation token.
///
/// Exposed as `0`/`1` on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvitationTokenStatus {
    Pending,
    Used,
}

impl InvitationTokenStatus {
    pub fn as_i64(&self) -> i64 {
        match self {
            InvitationTokenStatus::Pending => 0,
            InvitationTokenStatus::Used => 1,
        }
    }
}

impl TryFrom<i64> for InvitationTokenStatus {
    type Error = InvitationStatusError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(InvitationTokenStatus::Pending),
            1 => Ok(InvitationTokenStatus::Used),
            other => Err(InvitationStatusError::Unknown(other)),
        }
    }
}

/// Invitation token record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationToken {
    pub token: String,
    pub status: InvitationTokenStatus,
    /// Unix timestamp, seconds.
    pub expiry: i64,
}

impl InvitationToken {
    /// Fresh pending record expiring `ttl` after `now`.
    pub fn pending(token: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            token,
            status: InvitationTokenStatus::Pending,
            expiry: (now + ttl).timestamp(),
        }
    }

    /// Random token string drawn from the OS RNG.
    pub fn generate_value() -> String {
        OsRng
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expiry < now
    }

    /// Check the record can still be redeemed at `now`.
    ///
    /// Expiry is checked before status, so an expired token reports
    /// `TokenExpired` whatever its status.
    ///
    /// # Errors
    /// * `TokenExpired` - Stored expiry has passed
    /// * `TokenAlreadyUsed` - Status is `Used`
    pub fn ensure_redeemable(&self, now: i64) -> Result<(), AuthError> {
        if self.is_expired(now) {
            return Err(AuthError::TokenExpired);
        }

        match self.status {
            InvitationTokenStatus::Pending => Ok(()),
            InvitationTokenStatus::Used => Err(AuthError::TokenAlreadyUsed),
        }
    }
}

/// Listing filter. No status means every status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvitationTokenFilter {
    pub status: Option<InvitationTokenStatus>,
}

impl InvitationTokenFilter {
    pub fn matches(&self, token: &InvitationToken) -> bool {
        self.status.map_or(true, |status| status == token.status)
    }
}

/// Page over the store's natural iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    page: u32,
    limit: u32,
}

impl Paging {
    pub const DEFAULT_LIMIT: u32 = 50;
    pub const MAX_LIMIT: u32 = 200;

    /// Build a page, falling back to defaults for missing values.
    ///
    /// # Errors
    /// * `ZeroPage` - Pages are 1-based
    /// * `LimitOutOfRange` - Limit is zero or above the maximum
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self, PagingError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);

        if page == 0 {
            return Err(PagingError::ZeroPage);
        }
        if limit == 0 || limit > Self::MAX_LIMIT {
            return Err(PagingError::LimitOutOfRange {
                max: Self::MAX_LIMIT,
                actual: limit,
            });
        }

        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }

    /// Number of matching records needed before this page is complete.
    pub fn end(&self) -> usize {
        self.offset() + self.limit as usize
    }

    /// Slice this page out of an ordered sequence.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.limit as usize)
            .collect()
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(InvitationTokenStatus::Pending.as_i64(), 0);
        assert_eq!(InvitationTokenStatus::Used.as_i64(), 1);
        assert_eq!(
            InvitationTokenStatus::try_from(1),
            Ok(InvitationTokenStatus::Used)
        );
        assert_eq!(
            InvitationTokenStatus::try_from(2),
            Err(InvitationStatusError::Unknown(2))
        );
    }

    #[test]
    fn test_generate_value() {
        let a = InvitationToken::generate_value();
        let b = InvitationToken::generate_value();

        assert_eq!(a.len(), TOKEN_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_pending_expiry() {
        let now = Utc::now();
        let token = InvitationToken::pending("abc".to_string(), now, Duration::hours(24));

        assert_eq!(token.status, InvitationTokenStatus::Pending);
        assert_eq!(token.expiry, now.timestamp() + 24 * 60 * 60);
    }

    #[test]
    fn test_ensure_redeemable() {
        let token = InvitationToken {
            token: "abc".to_string(),
            status: InvitationTokenStatus::Pending,
            expiry: 1000,
        };
        assert_eq!(token.ensure_redeemable(999), Ok(()));
        assert_eq!(token.ensure_redeemable(1000), Ok(()));
        assert_eq!(token.ensure_redeemable(1001), Err(AuthError::TokenExpired));

        let used = InvitationToken {
            status: InvitationTokenStatus::Used,
            ..token
        };
        assert_eq!(used.ensure_redeemable(999), Err(AuthError::TokenAlreadyUsed));
        assert_eq!(used.ensure_redeemable(1001), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_filter_matches() {
        let token = InvitationToken {
            token: "abc".to_string(),
            status: InvitationTokenStatus::Used,
            expiry: 1000,
        };

        assert!(InvitationTokenFilter::default().matches(&token));
        assert!(InvitationTokenFilter {
            status: Some(InvitationTokenStatus::Used)
        }
        .matches(&token));
        assert!(!InvitationTokenFilter {
            status: Some(InvitationTokenStatus::Pending)
        }
        .matches(&token));
    }

    #[test]
    fn test_paging() {
        let paging = Paging::new(Some(2), Some(3)).unwrap();
        assert_eq!(paging.offset(), 3);
        assert_eq!(paging.end(), 6);
        assert_eq!(paging.apply(1..=10), vec![4, 5, 6]);

        assert_eq!(Paging::new(None, None).unwrap(), Paging::default());
        assert_eq!(Paging::new(Some(0), None), Err(PagingError::ZeroPage));
        assert!(Paging::new(None, Some(0)).is_err());
        assert!(Paging::new(None, Some(Paging::MAX_LIMIT + 1)).is_err());
    }

    #[test]
    fn test_paging_past_the_end_is_empty() {
        let paging = Paging::new(Some(5), Some(10)).unwrap();
        assert!(paging.apply(1..=10).is_empty());
    }
}
