//! OAuth2 for installed applications.
//!
//! The client is described by the `credentials.json` that can be downloaded
//! from the Google cloud console, the authorized token is kept in a
//! `token.json` next to it.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, TimeDelta, Utc};
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils;

/// Read access to the spreadsheets is all that is needed.
pub const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// Used when the credentials do not list any redirect uri, google will then
/// display the code to the user.
const OUT_OF_BAND_REDIRECT: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Tokens are refreshed this many seconds before they expire.
const EXPIRY_DELTA: i64 = 10;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unable to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to parse `{}`", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unable to save the token to `{}`", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to read the authorization code")]
    Prompt(#[source] io::Error),
    #[error("no authorization code has been entered")]
    MissingCode,
    #[error("the token is expired and has no refresh token")]
    NotRefreshable,
    #[error("`{0}` is not a valid url")]
    InvalidUrl(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("the token endpoint responded with {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// The `credentials.json` of an oauth client.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientCredentials {
    #[serde(alias = "web")]
    installed: ClientSecrets,
}

impl ClientCredentials {
    pub fn try_from_file(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        read_json(path.as_ref())
    }

    pub fn secrets(&self) -> &ClientSecrets {
        &self.installed
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    client_id: String,
    #[serde(default)]
    client_secret: String,
    auth_uri: String,
    token_uri: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

impl ClientSecrets {
    fn redirect_uri(&self) -> &str {
        self.redirect_uris
            .first()
            .map_or(OUT_OF_BAND_REDIRECT, String::as_str)
    }

    /// The page where the user grants access to the sheets.
    pub fn authorization_url(&self) -> Result<Url, AuthError> {
        Url::parse_with_params(
            &self.auth_uri,
            &[
                ("access_type", "offline"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri()),
                ("response_type", "code"),
                ("scope", SCOPE),
                ("state", "state-token"),
            ],
        )
        .map_err(|_| AuthError::InvalidUrl(self.auth_uri.clone()))
    }

    fn request_token(
        &self,
        http: &Client,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, AuthError> {
        debug!("POST {}", self.token_uri);
        let response = http.post(&self.token_uri).form(form).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }

        Ok(response.json()?)
    }

    /// Exchanges the code the user got after granting access for a token.
    pub fn exchange_code(&self, http: &Client, code: &str) -> Result<Token, AuthError> {
        let response = self.request_token(
            http,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri()),
            ],
        )?;

        Ok(response.into_token(None, Utc::now()))
    }

    /// Returns a new access token for an expired token.
    pub fn refresh(&self, http: &Client, token: &Token) -> Result<Token, AuthError> {
        let Some(refresh_token) = token.refresh_token.as_deref() else {
            return Err(AuthError::NotRefreshable);
        };

        let response = self.request_token(
            http,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ],
        )?;

        Ok(response.into_token(token.refresh_token.clone(), Utc::now()))
    }
}

/// The contents of `token.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiry: Option<DateTime<Utc>>,
}

impl Token {
    pub fn try_from_file(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        read_json(path.as_ref())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AuthError> {
        let path = path.as_ref();
        info!("saving token to `{}`", path.display());

        let save_error = |source| AuthError::Save {
            path: path.to_path_buf(),
            source,
        };

        let json = serde_json::to_string(self)
            .map_err(io::Error::from)
            .map_err(save_error)?;
        utils::write(path, json).map_err(save_error)
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Tokens without an expiry (or with the zero time) never expire.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) if expiry.year() > 1 => {
                expiry - TimeDelta::seconds(EXPIRY_DELTA) <= now
            }
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_token(self, refresh_token: Option<String>, now: DateTime<Utc>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type,
            // a refresh does not always hand out a new refresh token
            refresh_token: self.refresh_token.or(refresh_token),
            expiry: self
                .expires_in
                .and_then(TimeDelta::try_seconds)
                .map(|expires_in| now + expires_in),
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AuthError> {
    let contents = utils::read_to_string(path).map_err(|source| AuthError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| AuthError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn prompt_for_code(url: &Url, input: &mut impl BufRead) -> Result<String, AuthError> {
    println!(
        "Go to the following link in your browser then type the authorization code:\n{}",
        url
    );
    io::stdout().flush().map_err(AuthError::Prompt)?;

    let mut code = String::new();
    input.read_line(&mut code).map_err(AuthError::Prompt)?;

    let code = code.trim();
    if code.is_empty() {
        return Err(AuthError::MissingCode);
    }

    Ok(code.to_string())
}

/// Returns a valid access token.
///
/// Without a stored token the user is asked to authorize the client on the
/// terminal. Expired tokens are refreshed. New tokens are stored in
/// `token_file`.
pub fn authorize(
    credentials: impl AsRef<Path>,
    token_file: impl AsRef<Path>,
) -> Result<String, AuthError> {
    authorize_with_input(credentials, token_file, &mut io::stdin().lock())
}

/// Like [`authorize`], but reads the authorization code from `input`.
fn authorize_with_input(
    credentials: impl AsRef<Path>,
    token_file: impl AsRef<Path>,
    input: &mut impl BufRead,
) -> Result<String, AuthError> {
    let token_file = token_file.as_ref();
    let credentials = ClientCredentials::try_from_file(credentials)?;
    let secrets = credentials.secrets();
    let http = Client::new();

    let mut token = if token_file.is_file() {
        debug!("using token from `{}`", token_file.display());
        Token::try_from_file(token_file)?
    } else {
        info!("no token found, authorization is required");
        let code = prompt_for_code(&secrets.authorization_url()?, input)?;
        let token = secrets.exchange_code(&http, &code)?;
        token.save(token_file)?;
        token
    };

    if token.is_expired(Utc::now()) {
        info!("refreshing the expired token");
        token = secrets.refresh(&http, &token)?;
        token.save(token_file)?;
    }

    Ok(token.access_token)
}
