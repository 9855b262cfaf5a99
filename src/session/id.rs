//! Client-minted session identifiers.

use std::fmt;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Prefix shared by every generated identifier.
const SESSION_PREFIX: &str = "session_";

/// Length of the random base-36 suffix.
const SUFFIX_LEN: usize = 9;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque token correlating this widget's messages with server-side
/// conversation state.
///
/// The format is `session_<unix-millis>_<9 base-36 chars>`. It is
/// collision-resistant enough for a single-user session, not globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Mint a new identifier from the current time and a random suffix.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
            .collect();
        Self(format!(
            "{SESSION_PREFIX}{}_{suffix}",
            Utc::now().timestamp_millis()
        ))
    }

    /// Borrow the identifier as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The session state owned by one widget instance.
///
/// The identifier is replaced wholesale on [`SessionContext::renew`], never
/// edited in place.
#[derive(Debug, Clone)]
pub struct SessionContext {
    current: SessionId,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// Start a context with a freshly generated identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(SessionId::generate())
    }

    /// Start a context with a known identifier.
    #[must_use]
    pub fn with_id(id: SessionId) -> Self {
        Self { current: id }
    }

    /// The identifier currently in use.
    #[must_use]
    pub fn current(&self) -> &SessionId {
        &self.current
    }

    /// Replace the identifier with a new one and return the retired one.
    ///
    /// The new identifier always differs from the retired one.
    pub fn renew(&mut self) -> SessionId {
        let mut next = SessionId::generate();
        while next == self.current {
            next = SessionId::generate();
        }
        std::mem::replace(&mut self.current, next)
    }
}
