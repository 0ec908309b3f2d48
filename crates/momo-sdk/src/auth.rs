use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::sync::Arc;

use crate::error::MomoError;
use crate::token::{AuthContext, TokenProvider};

/// Per-request decorator that sets `Authorization: Bearer <token>`.
///
/// Holds the authentication context and the token provider; the token is
/// resolved each time [`BearerAuth::decorate`] runs, never at construction.
pub struct BearerAuth<T> {
    context: AuthContext,
    tokens: Arc<T>,
}

impl<T: TokenProvider> BearerAuth<T> {
    pub fn new(context: AuthContext, tokens: Arc<T>) -> Self {
        Self { context, tokens }
    }

    pub fn context(&self) -> &AuthContext {
        &self.context
    }

    /// Fetch a current token and write it into `headers`.
    ///
    /// Only `Authorization` is touched; every other header is left as is.
    pub async fn decorate(&self, headers: &mut HeaderMap) -> Result<(), MomoError> {
        let token = self
            .tokens
            .create_or_refresh_access_token(&self.context)
            .await?;

        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.access_token))
            .map_err(|e| MomoError::Token(format!("access token is not a valid header value: {e}")))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}
