use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A credited artist. Two artists are the same when their names are byte-for-byte equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

impl Artist {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<&str> for Artist {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Artist {
    fn from(name: String) -> Self {
        Self { name }
    }
}

/// Title plus artist credits, used to decide whether two records are the same song.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackIdentity {
    pub title: String,
    pub artists: Vec<Artist>,
}

impl TrackIdentity {
    pub fn new<A>(title: impl Into<String>, artists: impl IntoIterator<Item = A>) -> Self
    where
        A: Into<Artist>,
    {
        Self {
            title: title.into(),
            artists: artists.into_iter().map(Into::into).collect(),
        }
    }

    pub fn artist_names(&self) -> impl Iterator<Item = &str> {
        self.artists.iter().map(|artist| artist.name.as_str())
    }

    /// Whether `other` is the same track: exact title and the same multiset of artist names.
    pub fn matches(&self, other: &TrackIdentity) -> bool {
        matches(self, other)
    }

    fn artist_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for name in self.artist_names() {
            *counts.entry(name).or_insert(0) += 1;
        }
        counts
    }
}

impl fmt::Display for TrackIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let artists = self.artist_names().collect::<Vec<_>>().join(", ");
        if artists.is_empty() {
            write!(f, "'{}'", self.title)
        } else {
            write!(f, "'{}' by {}", self.title, artists)
        }
    }
}

/// Two tracks match iff the titles are equal and the artist names form the same multiset.
///
/// No case folding or trimming is applied. Credit order is ignored but multiplicity is not,
/// so `[A, B]` matches `[B, A]` while `[A]` and `[A, B, C]` do not match `[A, B]`.
pub fn matches(a: &TrackIdentity, b: &TrackIdentity) -> bool {
    if a.title != b.title {
        return false;
    }
    if a.artists.len() != b.artists.len() {
        return false;
    }
    a.artist_counts() == b.artist_counts()
}

/// A playlist as read from the source catalog. Track order is playback order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub name: String,
    pub description: String,
    pub tracks: Vec<TrackIdentity>,
}

impl Playlist {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(title: &str, artists: &[&str]) -> TrackIdentity {
        TrackIdentity::new(title, artists.iter().copied())
    }

    #[test]
    fn test_matches_ignores_artist_order() {
        let a = track("X", &["A", "B"]);
        let b = track("X", &["B", "A"]);

        assert!(matches(&a, &b));
        assert!(matches(&b, &a));
    }

    #[test]
    fn test_subset_and_superset_do_not_match() {
        let pair = track("X", &["A", "B"]);

        assert!(!matches(&track("X", &["A"]), &pair));
        assert!(!matches(&pair, &track("X", &["A"])));
        assert!(!matches(&track("X", &["A", "B", "C"]), &pair));
    }

    #[test]
    fn test_multiplicity_counts() {
        let doubled = track("X", &["A", "A"]);

        assert!(!matches(&doubled, &track("X", &["A"])));
        assert!(!matches(&doubled, &track("X", &["A", "B"])));
        assert!(matches(&doubled, &track("X", &["A", "A"])));
    }

    #[test]
    fn test_title_must_be_exact() {
        let artists = &["Ed Sheeran", "Justin Bieber"];

        assert!(!matches(
            &track("I Don't Care", artists),
            &track("i don't care", artists)
        ));
        assert!(!matches(
            &track("I Don't Care", artists),
            &track("I Don't Care ", artists)
        ));
    }

    #[test]
    fn test_artist_names_are_case_sensitive() {
        assert!(!matches(
            &track("X", &["Ed Sheeran"]),
            &track("X", &["ed sheeran"])
        ));
    }

    #[test]
    fn test_empty_artists_only_match_empty_artists() {
        assert!(matches(&track("X", &[]), &track("X", &[])));
        assert!(!matches(&track("X", &[]), &track("X", &["A"])));
        assert!(!matches(&track("", &[]), &track("Y", &[])));
    }

    #[test]
    fn test_matches_is_symmetric() {
        let tracks = [
            track("X", &[]),
            track("X", &["A"]),
            track("X", &["A", "B"]),
            track("X", &["B", "A"]),
            track("X", &["A", "A"]),
            track("Y", &["A"]),
        ];

        for a in &tracks {
            for b in &tracks {
                assert_eq!(matches(a, b), matches(b, a), "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            track("I Don't Care", &["Ed Sheeran", "Justin Bieber"]).to_string(),
            "'I Don't Care' by Ed Sheeran, Justin Bieber"
        );
        assert_eq!(track("Intro", &[]).to_string(), "'Intro'");
    }
}
