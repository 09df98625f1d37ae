use serde::{Serialize, Serializer};

/// Whether a failed backend call is worth repeating. Advisory only: the
/// gateway never retries on its own, but the class rides on every error so
/// callers can tell a flaky upstream (`Transient`) from a request that will
/// never succeed (`Permanent`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryClass {
    None,
    Transient,
    Permanent,
}

impl RetryClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            RetryClass::None => "none",
            RetryClass::Transient => "transient",
            RetryClass::Permanent => "permanent",
        }
    }
}

impl Serialize for RetryClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
