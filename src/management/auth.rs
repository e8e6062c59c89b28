use crate::{Res, spotify::auth::OAuthClient, types::Token, utils};

/// Seconds before expiry at which a token is considered stale.
pub const REFRESH_WINDOW_SECS: i64 = 60;

/// Holds the single token of the current run.
///
/// The slot starts empty and is filled by the OAuth callback. It is never
/// written to disk.
pub struct TokenManager {
    oauth: OAuthClient,
    token: Option<Token>,
}

impl TokenManager {
    /// Creates a manager with an empty token slot.
    pub fn new(oauth: OAuthClient) -> Self {
        TokenManager { oauth, token: None }
    }

    /// Creates a manager that already holds `token`.
    pub fn with_token(oauth: OAuthClient, token: Token) -> Self {
        TokenManager {
            oauth,
            token: Some(token),
        }
    }

    /// Replaces the held token, e.g. after a code exchange.
    pub fn store(&mut self, token: Token) {
        self.token = Some(token);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Returns a token that is valid for at least another minute.
    ///
    /// `Ok(None)` means no login happened yet. A stale token is refreshed and
    /// replaces the stored one; a failed refresh is returned as an error.
    pub async fn get_valid_token(&mut self) -> Res<Option<Token>> {
        let Some(token) = self.token.as_ref() else {
            return Ok(None);
        };

        if needs_refresh(token, utils::unix_now()) {
            let refreshed = self.oauth.refresh(&token.refresh_token).await?;
            self.token = Some(refreshed);
        }

        Ok(self.token.clone())
    }
}

/// Whether `token` expires within [`REFRESH_WINDOW_SECS`] of `now`.
///
/// # Example
///
/// ```
/// let token = Token { expires_at: 1_060, ..token };
/// assert!(!needs_refresh(&token, 1_000));
/// assert!(needs_refresh(&token, 1_001));
/// ```
pub fn needs_refresh(token: &Token, now: i64) -> bool {
    token.expires_at - now < REFRESH_WINDOW_SECS
}
