//! Session Entity
//!
//! Server-side login state for the session strategy. A session row is
//! the source of truth; the client only ever holds the signed token
//! that references it.

use crate::domain::value_object::user_id::UserId;
use chrono::{DateTime, Duration, Utc};
use kernel::id::Id;

pub struct SessionMarker;
pub type SessionId = Id<SessionMarker>;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId, user_id: UserId, now: DateTime<Utc>, ttl_secs: i64) -> Self {
        Self {
            id,
            user_id,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_secs),
            last_seen_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Record activity. Does not extend expiry; lifetime is fixed at
    /// creation.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let session = Session::new(SessionId::new(), UserId::new(), now, 3600);

        assert!(!session.is_expired(now));
        assert!(!session.is_expired(now + Duration::seconds(3599)));
        assert!(session.is_expired(now + Duration::seconds(3600)));
    }

    #[test]
    fn test_touch_does_not_extend_expiry() {
        let now = Utc::now();
        let mut session = Session::new(SessionId::new(), UserId::new(), now, 60);
        let expires = session.expires_at;

        session.touch(now + Duration::seconds(30));

        assert_eq!(session.expires_at, expires);
        assert_eq!(session.last_seen_at, now + Duration::seconds(30));
    }
}
