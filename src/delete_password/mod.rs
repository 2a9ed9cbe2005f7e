use subtle::ConstantTimeEq;

/// The shared secret that authorizes score deletion.
/// Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone)]
pub struct DeletePassword {
    key: String,
}

impl DeletePassword {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Compares `attempt` against the secret in constant time for a given length.
    pub fn matches(&self, attempt: &str) -> bool {
        self.key.as_bytes().ct_eq(attempt.as_bytes()).into()
    }
}

impl std::fmt::Debug for DeletePassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DeletePassword(<redacted>)")
    }
}
