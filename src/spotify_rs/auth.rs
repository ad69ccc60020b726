use std::time::Duration;

use crate::spotify_rs::types::SpotifyTokenResponse;

const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

#[derive(Debug, thiserror::Error)]
pub enum ClientCredentialsError {
    #[error("Spotify rejected the client credentials ({status}): {reason}")]
    Rejected { status: u16, reason: String },
    #[error("Failed to send http request: {0}")]
    FailedToSendRequest(reqwest::Error),
    #[error("Failed to parse response: {0}")]
    FailedToParseResponse(reqwest::Error),
}

/// Request an app-only access token with the client credentials grant.
/// https://developer.spotify.com/documentation/web-api/tutorials/client-credentials-flow
pub async fn request_client_credentials_token(
    client: &reqwest::Client,
    client_id: &str,
    client_secret: &str,
    timeout: Duration,
) -> Result<SpotifyTokenResponse, ClientCredentialsError> {
    let response = client
        .post(SPOTIFY_TOKEN_URL)
        // Serialized as x-www-form-urlencoded, as required by spotify
        .form(&[("grant_type", "client_credentials")])
        .basic_auth(client_id, Some(client_secret))
        .timeout(timeout)
        .send()
        .await
        .map_err(ClientCredentialsError::FailedToSendRequest)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientCredentialsError::Rejected {
            status: status.as_u16(),
            reason: response
                .text()
                .await
                .unwrap_or("Failed to get error text".to_string()),
        });
    }

    response
        .json()
        .await
        .map_err(ClientCredentialsError::FailedToParseResponse)
}
