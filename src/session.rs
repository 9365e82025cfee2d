use std::collections::HashMap;

use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::utils::rand::rand_str;

pub const SESSION_COOKIE: &str = "tagmark_session";
const TOKEN_LENGTH: usize = 32;

struct SessionRecord {
    user_id: Uuid,
    expires_at: OffsetDateTime,
}

/// Server-side sessions keyed by an opaque token carried in a cookie.
pub struct Sessions {
    ttl: Duration,
    records: RwLock<HashMap<String, SessionRecord>>,
}

impl Sessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Issues a new token. Expired records are swept on the way in, so tokens
    /// from abandoned cookies do not pile up.
    pub async fn login(&self, user_id: Uuid) -> String {
        let now = OffsetDateTime::now_utc();
        let token = rand_str(TOKEN_LENGTH);
        let record = SessionRecord {
            user_id,
            expires_at: now + self.ttl,
        };

        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.expires_at > now);
        let swept = before - records.len();
        if swept > 0 {
            debug!(swept, "expired sessions dropped");
        }
        records.insert(token.clone(), record);
        debug!(%user_id, "session issued");
        token
    }

    pub async fn resolve(&self, token: &str) -> Option<Uuid> {
        let now = OffsetDateTime::now_utc();
        {
            let records = self.records.read().await;
            match records.get(token) {
                Some(r) if r.expires_at > now => return Some(r.user_id),
                Some(_) => {}
                None => return None,
            }
        }
        // expired
        self.records.write().await.remove(token);
        debug!("session expired");
        None
    }

    pub async fn logout(&self, token: &str) {
        if let Some(r) = self.records.write().await.remove(token) {
            debug!(user_id = %r.user_id, "session closed");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn login_resolve_logout() {
        let sessions = Sessions::new(Duration::hours(1));
        let user_id = Uuid::new_v4();

        let token = sessions.login(user_id).await;
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert_eq!(sessions.resolve(&token).await, Some(user_id));

        sessions.logout(&token).await;
        assert_eq!(sessions.resolve(&token).await, None);

        // logging out twice is fine
        sessions.logout(&token).await;
    }

    #[tokio::test]
    async fn tokens_are_distinct_per_login() {
        let sessions = Sessions::new(Duration::hours(1));
        let user_id = Uuid::new_v4();

        let t1 = sessions.login(user_id).await;
        let t2 = sessions.login(user_id).await;
        assert_ne!(t1, t2);

        sessions.logout(&t1).await;
        assert_eq!(sessions.resolve(&t2).await, Some(user_id));
    }

    #[tokio::test]
    async fn unknown_token() {
        let sessions = Sessions::new(Duration::hours(1));
        assert_eq!(sessions.resolve("nope").await, None);
        assert_eq!(sessions.resolve("").await, None);
    }

    #[tokio::test]
    async fn expired_session() {
        let sessions = Sessions::new(Duration::seconds(-1));
        let token = sessions.login(Uuid::new_v4()).await;
        assert_eq!(sessions.resolve(&token).await, None);
        assert!(sessions.records.read().await.is_empty());
    }

    #[tokio::test]
    async fn abandoned_expired_sessions_are_swept() {
        let sessions = Sessions::new(Duration::seconds(-1));
        for _ in 0..100 {
            sessions.login(Uuid::new_v4()).await;
        }
        // only the record issued last survives the sweep
        assert_eq!(sessions.records.read().await.len(), 1);
    }

    #[tokio::test]
    async fn sweep_keeps_live_sessions() {
        let sessions = Sessions::new(Duration::hours(1));
        let user_id = Uuid::new_v4();
        let live = sessions.login(user_id).await;
        sessions.records.write().await.insert(
            "stale".to_string(),
            SessionRecord {
                user_id: Uuid::new_v4(),
                expires_at: OffsetDateTime::now_utc() - Duration::minutes(1),
            },
        );

        sessions.login(Uuid::new_v4()).await;
        let records = sessions.records.read().await;
        assert_eq!(records.len(), 2);
        assert!(!records.contains_key("stale"));
        assert!(records.contains_key(&live));
    }
}
