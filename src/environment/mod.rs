//! Identity and clock lookup for creation metadata.

use std::cell::Cell;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "displayName")]
    pub name: Option<String>,
}

pub trait Environment {
    /// `None` puts the editor in anonymous mode: no creation metadata is stamped.
    fn current_user(&self) -> Option<UserIdentity>;

    /// Local time corrected by the last known server clock offset.
    fn current_time_adjusted(&self) -> DateTime<Utc>;
}

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

pub struct LocalEnvironment {
    user: Option<UserIdentity>,
    server_offset: Cell<Duration>,
    clock: Clock,
}

impl LocalEnvironment {
    pub fn new(user: Option<UserIdentity>) -> Self {
        Self {
            user,
            server_offset: Cell::new(Duration::zero()),
            clock: Box::new(Utc::now),
        }
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_server_offset(self, offset: Duration) -> Self {
        self.server_offset.set(offset);
        self
    }

    /// Records the difference between the server's clock and ours.
    pub fn set_server_time(&self, server_now: DateTime<Utc>) {
        let offset = server_now - (self.clock)();
        tracing::debug!(offset_ms = offset.num_milliseconds(), "server clock offset updated");
        self.server_offset.set(offset);
    }

    pub fn server_offset(&self) -> Duration {
        self.server_offset.get()
    }
}

impl Environment for LocalEnvironment {
    fn current_user(&self) -> Option<UserIdentity> {
        self.user.clone()
    }

    fn current_time_adjusted(&self) -> DateTime<Utc> {
        (self.clock)() + self.server_offset.get()
    }
}

impl std::fmt::Debug for LocalEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEnvironment")
            .field("user", &self.user)
            .field("server_offset", &self.server_offset.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn adjusted_time_applies_server_offset() {
        let env = LocalEnvironment::anonymous().with_clock(fixed_now);
        assert_eq!(env.current_time_adjusted(), fixed_now());

        env.set_server_time(fixed_now() + Duration::seconds(90));
        assert_eq!(env.server_offset(), Duration::seconds(90));
        assert_eq!(
            env.current_time_adjusted(),
            fixed_now() + Duration::seconds(90)
        );
    }

    #[test]
    fn anonymous_environment_has_no_user() {
        assert!(LocalEnvironment::anonymous().current_user().is_none());
    }

    #[test]
    fn user_identity_accepts_display_name_alias() {
        let user: UserIdentity =
            serde_json::from_str(r#"{"id":"u1","displayName":"Ada"}"#).expect("should parse");
        assert_eq!(user.name.as_deref(), Some("Ada"));
    }
}
