use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use url::Url;

use crate::track_identity::TrackIdentity;

const SEARCH_URL: &str = "https://www.youtube.com/results?search_query=";

// First video renderer in the embedded `ytInitialData` of a results page
static VIDEO_RENDERER_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""videoRenderer"\s*:\s*\{\s*"videoId"\s*:\s*"([A-Za-z0-9_-]{11})""#)
        .expect("video renderer regex is valid")
});

// Plain anchors, as served to clients without javascript
static WATCH_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="(/watch\?v=[^"]+)""#).expect("watch href regex is valid")
});

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("No video found within the time limit.")]
    Timeout,
    #[error("No suitable video found.")]
    NoVideo,
    #[error("Failed to send http request: {0}")]
    Request(reqwest::Error),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Invalid YouTube URL")]
pub struct InvalidYoutubeUrl;

/// Build the results page URL for a track: artists first, then the title, words joined by `+`.
pub fn build_search_url(track: &TrackIdentity) -> String {
    let terms = track
        .artist_names()
        .chain(std::iter::once(track.title.as_str()))
        .flat_map(str::split_whitespace)
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+");

    format!("{}{}", SEARCH_URL, terms)
}

/// Id of the first video listed on a results page.
pub fn first_video_id(html: &str) -> Option<String> {
    if let Some(id) = VIDEO_RENDERER_ID
        .captures(html)
        .and_then(|captures| captures.get(1))
    {
        return Some(id.as_str().to_string());
    }

    WATCH_HREF.captures_iter(html).find_map(|captures| {
        let href = captures.get(1)?.as_str().replace("&amp;", "&");
        video_id_from_watch_url(&format!("https://www.youtube.com{}", href)).ok()
    })
}

/// Extract the `v` parameter of a `watch` link.
pub fn video_id_from_watch_url(href: &str) -> Result<String, InvalidYoutubeUrl> {
    let url = Url::parse(href).map_err(|_| InvalidYoutubeUrl)?;
    let is_youtube = url
        .host_str()
        .is_some_and(|host| host == "youtube.com" || host.ends_with(".youtube.com"));
    if !is_youtube || url.path() != "/watch" {
        return Err(InvalidYoutubeUrl);
    }

    url.query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.to_string())
        .filter(|id| !id.is_empty())
        .ok_or(InvalidYoutubeUrl)
}

/// Search YouTube for a track and return the first video id, giving up after `timeout`.
pub async fn search_video_id(
    client: &reqwest::Client,
    track: &TrackIdentity,
    timeout: Duration,
) -> Result<String, SearchError> {
    let url = build_search_url(track);
    tracing::debug!("Searching YouTube: {}", url);

    let body = client
        .get(&url)
        .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .timeout(timeout)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(search_error)?
        .text()
        .await
        .map_err(search_error)?;

    first_video_id(&body).ok_or(SearchError::NoVideo)
}

fn search_error(error: reqwest::Error) -> SearchError {
    if error.is_timeout() {
        SearchError::Timeout
    } else {
        SearchError::Request(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track_identity::Artist;

    fn rick() -> TrackIdentity {
        TrackIdentity::new("Never Gonna Give You Up", ["Rick Astley"])
    }

    #[test]
    fn test_build_search_url() {
        assert_eq!(
            build_search_url(&rick()),
            "https://www.youtube.com/results?search_query=Rick+Astley+Never+Gonna+Give+You+Up"
        );
    }

    #[test]
    fn test_build_search_url_empty_track() {
        let track = TrackIdentity::new("", Vec::<Artist>::new());

        assert_eq!(
            build_search_url(&track),
            "https://www.youtube.com/results?search_query="
        );
    }

    #[test]
    fn test_build_search_url_skips_empty_parts() {
        let no_artist = TrackIdentity::new("Never Gonna Give You Up", Vec::<Artist>::new());
        let no_title = TrackIdentity::new("", ["Rick Astley"]);

        assert_eq!(
            build_search_url(&no_artist),
            "https://www.youtube.com/results?search_query=Never+Gonna+Give+You+Up"
        );
        assert_eq!(
            build_search_url(&no_title),
            "https://www.youtube.com/results?search_query=Rick+Astley"
        );
    }

    #[test]
    fn test_build_search_url_encodes_words() {
        let track = TrackIdentity::new("I Don't Care", ["Ed Sheeran", "Justin Bieber"]);

        assert_eq!(
            build_search_url(&track),
            "https://www.youtube.com/results?search_query=Ed+Sheeran+Justin+Bieber+I+Don%27t+Care"
        );
    }

    #[test]
    fn test_first_video_id() {
        let html = r#"<script>var ytInitialData = {"contents":{"itemSectionRenderer":{"contents":[
            {"adSlotRenderer":{}},
            {"videoRenderer":{"videoId":"dQw4w9WgXcQ","title":{"runs":[{"text":"Rick Astley"}]}}},
            {"videoRenderer":{"videoId":"yPYZpwSpKmA"}}
        ]}}};</script>"#;

        assert_eq!(first_video_id(html), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_first_video_id_from_plain_anchor() {
        let html = r#"<div><a href="/channel/UCuAXFkgsw1L7xaCfnd5JJOw">Rick</a>
            <a id="video-title" href="/watch?v=dQw4w9WgXcQ&amp;pp=ygUIcmljayByb2xs">Never Gonna</a></div>"#;

        assert_eq!(first_video_id(html), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_first_video_id_without_results() {
        let html = r#"<script>var ytInitialData = {"contents":{"channelRenderer":{"channelId":"UCuAXFkgsw1L7xaCfnd5JJOw"}}};</script>"#;

        assert_eq!(first_video_id(html), None);
    }

    #[test]
    fn test_video_id_from_watch_url() {
        assert_eq!(
            video_id_from_watch_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&pp=ygUIcmljayByb2xs"),
            Ok("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_video_id_from_invalid_url() {
        assert_eq!(
            video_id_from_watch_url("https://example.com/watch?v=dQw4w9WgXcQ"),
            Err(InvalidYoutubeUrl)
        );
        assert_eq!(
            video_id_from_watch_url("https://www.youtube.com/results?search_query=rick"),
            Err(InvalidYoutubeUrl)
        );
        assert_eq!(video_id_from_watch_url("not a url"), Err(InvalidYoutubeUrl));
        assert_eq!(InvalidYoutubeUrl.to_string(), "Invalid YouTube URL");
    }
}
