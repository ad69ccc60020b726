use std::time::Duration;

use reqwest::StatusCode;

use crate::youtube_rs::types::{
    ApiErrorResponse, PlaylistInsertRequest, PlaylistItemInsertRequest, PlaylistItemSnippet,
    PlaylistResource, PlaylistSnippet, PlaylistStatus, PrivacyStatus, ResourceId,
};

const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
const PLAYLIST_TAG: &str = "SpotTube playlist";

/// Error reasons Google uses when a quota or rate limit is hit
const QUOTA_REASONS: [&str; 3] = [
    "quotaExceeded",
    "rateLimitExceeded",
    "userRateLimitExceeded",
];

#[derive(Debug, thiserror::Error)]
pub enum YoutubeApiError {
    #[error("YouTube quota exceeded: {message}")]
    QuotaExceeded { message: String },
    #[error("YouTube API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Failed to send http request: {0}")]
    Request(#[from] reqwest::Error),
}

/// Turn a non-success response into an error, separating quota exhaustion from everything else.
pub fn classify_error(status: StatusCode, body: &str) -> YoutubeApiError {
    let parsed = serde_json::from_str::<ApiErrorResponse>(body).ok();
    let message = parsed
        .as_ref()
        .map(|response| response.error.message.clone())
        .unwrap_or_else(|| body.to_string());

    let quota_reason = parsed.as_ref().is_some_and(|response| {
        response
            .error
            .errors
            .iter()
            .any(|detail| QUOTA_REASONS.contains(&detail.reason.as_str()))
    });

    if quota_reason
        && (status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS)
    {
        YoutubeApiError::QuotaExceeded { message }
    } else {
        YoutubeApiError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// YouTube Data API client authenticated with an OAuth access token
pub struct YoutubeClient {
    access_token: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl YoutubeClient {
    pub fn new(access_token: String, client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            access_token,
            client,
            timeout,
        }
    }

    async fn post<T: serde::Serialize>(
        &self,
        endpoint: &str,
        part: &str,
        body: &T,
    ) -> Result<reqwest::Response, YoutubeApiError> {
        let response = self
            .client
            .post(format!("{}/{}", YOUTUBE_API_URL, endpoint))
            .query(&[("part", part)])
            .bearer_auth(&self.access_token)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status, &body));
        }
        Ok(response)
    }

    /// Create a playlist owned by the authenticated channel
    pub async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        privacy_status: PrivacyStatus,
    ) -> Result<PlaylistResource, YoutubeApiError> {
        let body = PlaylistInsertRequest {
            snippet: PlaylistSnippet {
                title: title.to_string(),
                description: description.to_string(),
                tags: vec![PLAYLIST_TAG.to_string()],
            },
            status: PlaylistStatus { privacy_status },
        };

        let response = self.post("playlists", "snippet,status", &body).await?;
        Ok(response.json().await?)
    }

    /// Append a video to the end of a playlist
    pub async fn insert_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), YoutubeApiError> {
        let body = PlaylistItemInsertRequest {
            snippet: PlaylistItemSnippet {
                playlist_id: playlist_id.to_string(),
                resource_id: ResourceId {
                    kind: "youtube#video".to_string(),
                    video_id: video_id.to_string(),
                },
            },
        };

        self.post("playlistItems", "snippet", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_body(code: u16, reason: &str) -> String {
        serde_json::json!({
            "error": {
                "code": code,
                "message": "The request cannot be completed.",
                "errors": [{"reason": reason, "message": "details"}]
            }
        })
        .to_string()
    }

    #[test]
    fn test_quota_exceeded_is_classified() {
        let error = classify_error(StatusCode::FORBIDDEN, &error_body(403, "quotaExceeded"));

        assert!(matches!(error, YoutubeApiError::QuotaExceeded { .. }));
    }

    #[test]
    fn test_rate_limit_is_classified_as_quota() {
        let error = classify_error(
            StatusCode::TOO_MANY_REQUESTS,
            &error_body(429, "rateLimitExceeded"),
        );

        assert!(matches!(error, YoutubeApiError::QuotaExceeded { .. }));
    }

    #[test]
    fn test_other_forbidden_is_api_error() {
        let error = classify_error(StatusCode::FORBIDDEN, &error_body(403, "forbidden"));

        match error {
            YoutubeApiError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "The request cannot be completed.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_body_is_kept_as_message() {
        let error = classify_error(StatusCode::BAD_GATEWAY, "upstream down");

        assert!(matches!(
            error,
            YoutubeApiError::Api { status: 502, ref message } if message == "upstream down"
        ));
    }

    #[test]
    fn test_playlist_body_shape() {
        let body = PlaylistInsertRequest {
            snippet: PlaylistSnippet {
                title: "Road Trip".into(),
                description: "".into(),
                tags: vec![PLAYLIST_TAG.into()],
            },
            status: PlaylistStatus {
                privacy_status: PrivacyStatus::Private,
            },
        };

        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["status"]["privacyStatus"], "private");
        assert_eq!(json["snippet"]["tags"][0], "SpotTube playlist");
    }
}
