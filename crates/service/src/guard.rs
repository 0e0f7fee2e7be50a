/// Shared-secret check for privileged routes.
///
/// Plain string equality: no per-admin identity, no rate limiting and no
/// constant-time comparison.
#[derive(Clone, Debug)]
pub struct AccessGuard {
    secret: String,
}

impl AccessGuard {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    pub fn from_config(cfg: &configs::AdminConfig) -> Self {
        Self::new(cfg.api_key.clone())
    }

    /// True only when `provided` is present and exactly equals the secret.
    pub fn authorize(&self, provided: Option<&str>) -> bool {
        provided == Some(self.secret.as_str())
    }
}
