use reqwest::{Client, Url};

use crate::{
    Res,
    config::Settings,
    errors::Error,
    spotify::ensure_success,
    types::{Token, TokenResponse},
    utils,
};

/// Client for Spotify's accounts service.
///
/// Holds the application credentials and endpoints needed for the
/// authorization-code grant. The client authenticates to the token endpoint
/// with HTTP Basic auth built from the client id and secret.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
    auth_url: String,
    token_url: String,
}

impl OAuthClient {
    pub fn from_settings(settings: &Settings) -> Self {
        OAuthClient {
            http: Client::new(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            redirect_uri: settings.redirect_uri.clone(),
            scope: settings.scope.clone(),
            auth_url: settings.auth_url.clone(),
            token_url: settings.token_url.clone(),
        }
    }

    /// Builds the URL the user is sent to for granting access.
    ///
    /// # Arguments
    ///
    /// * `state` - Per-run random value echoed back on the callback
    ///
    /// # Example
    ///
    /// ```
    /// let url = oauth.authorize_url("p1Yx...")?;
    /// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
    /// ```
    pub fn authorize_url(&self, state: &str) -> Res<String> {
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", self.scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| Error::Config(format!("invalid authorize URL '{}': {}", self.auth_url, e)))?;

        Ok(url.to_string())
    }

    /// Exchanges an authorization code from the callback for a token.
    ///
    /// # Errors
    ///
    /// Any network failure or rejected exchange is reported as [`Error::Auth`].
    pub async fn exchange_code(&self, code: &str) -> Res<Token> {
        let response = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .await
            .map_err(|e| Error::Auth(e.to_string()))?;

        Ok(Token::from_response(response, None, utils::unix_now()))
    }

    /// Exchanges a refresh token for a fresh access token.
    ///
    /// # Errors
    ///
    /// Any failure is reported as [`Error::TokenRefresh`]; there is no retry.
    pub async fn refresh(&self, refresh_token: &str) -> Res<Token> {
        let response = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await
            .map_err(|e| Error::TokenRefresh(e.to_string()))?;

        Ok(Token::from_response(
            response,
            Some(refresh_token),
            utils::unix_now(),
        ))
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Res<TokenResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await?;

        let response = ensure_success(response, "requesting a token").await?;
        Ok(response.json::<TokenResponse>().await?)
    }
}
