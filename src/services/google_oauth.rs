// src/services/google_oauth.rs
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// The parts of a service account key file we need. Other keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json_bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read service account key {}", path.display()))?;
        serde_json::from_slice(&json_bytes)
            .with_context(|| format!("Invalid service account key {}", path.display()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    exp: i64,
    iat: i64,
}

fn claims_for(key: &ServiceAccountKey, scope: &str) -> Claims {
    let iat = Utc::now();
    let exp = iat + Duration::minutes(59);
    Claims {
        iss: key.client_email.clone(),
        scope: scope.to_string(),
        aud: key.token_uri.clone(),
        exp: exp.timestamp(),
        iat: iat.timestamp(),
    }
}

/// Sign a JWT with the service account key and exchange it for a bearer token.
pub async fn fetch_access_token(client: &Client, key: &ServiceAccountKey, scope: &str) -> Result<String> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .context("Service account private key is not valid RSA PEM")?;
    let jwt = encode(&Header::new(Algorithm::RS256), &claims_for(key, scope), &encoding_key)?;

    #[derive(Debug, Serialize)]
    struct TokenRequest<'a> {
        grant_type: &'a str,
        assertion: &'a str,
    }
    let req_body = TokenRequest {
        grant_type: "urn:ietf:params:oauth:grant-type:jwt-bearer",
        assertion: &jwt,
    };

    #[derive(Debug, Deserialize)]
    struct TokenResponse {
        access_token: String,
    }

    debug!("Requesting access token for {}", key.client_email);
    let resp = client
        .post(&key.token_uri)
        .json(&req_body)
        .send()
        .await?
        .error_for_status()?
        .json::<TokenResponse>()
        .await?;

    Ok(resp.access_token)
}
