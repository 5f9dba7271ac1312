//! Movie model

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A unique identifier for a movie, using UUID v7 (time-sortable)
///
/// Parsing accepts either case. Display, storage and the wire always use the
/// upper-case hyphenated form, which is how the remote store keys documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct MovieId(Uuid);

impl MovieId {
    /// Create a new unique movie ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.to_string()
    }
}

impl Serialize for MovieId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Default for MovieId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = Uuid::encode_buffer();
        f.write_str(self.0.hyphenated().encode_upper(&mut buffer))
    }
}

impl FromStr for MovieId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Wire representation of a movie, as exchanged with the search API and the
/// remote store.
///
/// Search results carry neither `identifier` nor `hasWatched`; remote records
/// may be malformed and miss either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<MovieId>,
    pub title: String,
    #[serde(
        rename = "hasWatched",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub has_watched: Option<bool>,
}

impl MovieRecord {
    /// Build a record that has not been synced yet.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            identifier: None,
            title: title.into(),
            has_watched: None,
        }
    }

    /// A record can take part in reconciliation only with both an identifier
    /// and a watched flag.
    pub const fn is_syncable(&self) -> bool {
        self.identifier.is_some() && self.has_watched.is_some()
    }
}

/// A movie in the local store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Unique identifier, the join key with the remote store
    pub id: MovieId,
    pub title: String,
    pub has_watched: bool,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

impl Movie {
    /// Create a new, unwatched movie with a fresh identifier
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(MovieId::new(), title, false)
    }

    #[must_use]
    pub fn with_id(id: MovieId, title: impl Into<String>, has_watched: bool) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id,
            title: title.into(),
            has_watched,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a local movie from a syncable remote record.
    ///
    /// Returns `None` when the record lacks an identifier or a watched flag.
    #[must_use]
    pub fn from_record(record: &MovieRecord) -> Option<Self> {
        let id = record.identifier?;
        let has_watched = record.has_watched?;
        Some(Self::with_id(id, record.title.clone(), has_watched))
    }

    /// Wire representation of this movie
    #[must_use]
    pub fn to_record(&self) -> MovieRecord {
        MovieRecord {
            identifier: Some(self.id),
            title: self.title.clone(),
            has_watched: Some(self.has_watched),
        }
    }

    /// Whether the remote record would change this movie
    #[must_use]
    pub fn differs_from(&self, title: &str, has_watched: bool) -> bool {
        self.title != title || self.has_watched != has_watched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ID: &str = "0190B7A4-3C1E-7D2A-9B1F-5A6C7D8E9F01";

    #[test]
    fn test_movie_id_unique() {
        let id1 = MovieId::new();
        let id2 = MovieId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_movie_id_parse() {
        let id = MovieId::new();
        let parsed: MovieId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<MovieId>().is_err());
    }

    #[test]
    fn test_movie_id_formats_upper_case() {
        let id: MovieId = "0190b7a4-3c1e-7d2a-9b1f-5a6c7d8e9f01".parse().unwrap();
        assert_eq!(id.to_string(), ID);
        assert_eq!(id, ID.parse().unwrap());
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!(ID));
        let decoded: MovieId = serde_json::from_str(&format!("{:?}", ID.to_lowercase())).unwrap();
        assert_eq!(decoded, id);
    }

    #[test]
    fn record_uses_wire_field_names() {
        let record = MovieRecord {
            identifier: Some(ID.parse().unwrap()),
            title: "Alien".to_string(),
            has_watched: Some(true),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "identifier": ID, "title": "Alien", "hasWatched": true })
        );
    }

    #[test]
    fn record_omits_absent_fields() {
        let json = serde_json::to_string(&MovieRecord::new("Heat")).unwrap();
        assert_eq!(json, r#"{"title":"Heat"}"#);
    }

    #[test]
    fn record_ignores_search_api_extras() {
        let record: MovieRecord = serde_json::from_str(
            r#"{"id": 603, "title": "The Matrix", "overview": "...", "vote_average": 8.2}"#,
        )
        .unwrap();
        assert_eq!(record, MovieRecord::new("The Matrix"));
        assert!(!record.is_syncable());
    }

    #[test]
    fn record_rejects_missing_title() {
        assert!(serde_json::from_str::<MovieRecord>(r#"{"hasWatched": true}"#).is_err());
    }

    #[test]
    fn from_record_requires_identifier_and_watched_flag() {
        let mut record = MovieRecord::new("Z");
        assert!(Movie::from_record(&record).is_none());

        record.identifier = Some(ID.parse().unwrap());
        assert!(Movie::from_record(&record).is_none());

        record.has_watched = Some(false);
        let movie = Movie::from_record(&record).unwrap();
        assert_eq!(movie.id.to_string(), ID);
        assert_eq!(movie.title, "Z");
        assert!(!movie.has_watched);
    }

    #[test]
    fn to_record_round_trips_through_from_record() {
        let movie = Movie::with_id(ID.parse().unwrap(), "Arrival", true);
        let record = movie.to_record();
        assert!(record.is_syncable());
        let rebuilt = Movie::from_record(&record).unwrap();
        assert_eq!(rebuilt.id, movie.id);
        assert!(!rebuilt.differs_from(&movie.title, movie.has_watched));
    }
}
