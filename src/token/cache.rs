/// Cached bearer token plus the instants bounding its useful life, in
/// milliseconds since the epoch. The pair is always written together from
/// one successful grant; readers never see a token with a stale expiry.
#[derive(Clone)]
pub struct TokenCache {
    pub token: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl TokenCache {
    pub fn new(token: String, issued_at: i64, expires_at: i64) -> Self {
        Self {
            token,
            issued_at,
            expires_at,
        }
    }

    /// The valid window is exclusive at its end: the expiry instant itself
    /// counts as expired.
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at
    }
}
