use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use tabled::Tabled;

use crate::error::ClientError;

/// Raw answer of the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub expires_in: i64,
}

/// The access token together with the instant it stops being valid.
///
/// Always read and written as a whole so that a value is never paired with
/// somebody else's expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// True while `now` is still before `expires_at - lead`.
    pub fn is_fresh(&self, now: DateTime<Utc>, lead: chrono::Duration) -> bool {
        now < self.expires_at - lead
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn is_complete(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

/// An artist the user watches. `last_checked` is the high-water mark below
/// which releases count as already seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntity {
    pub id: String,
    pub last_checked: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TrackedEntity {
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            last_checked: now,
            created_at: now,
        }
    }
}

/// A release as seen during one poll pass, discarded after evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCandidate {
    pub entity_id: String,
    pub artist_name: String,
    pub name: String,
    pub release_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub release_date: Option<String>,
    pub release_date_precision: Option<String>,
    pub album_type: Option<String>,
    pub total_tracks: Option<u32>,
    pub artists: Vec<AlbumArtist>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub duration_ms: Option<u64>,
    pub track_number: Option<u32>,
    pub artists: Vec<AlbumArtist>,
    pub album: Option<Album>,
}

/// One page of a list endpoint. Items that do not decode are dropped rather
/// than failing the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Paging<T> {
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> Default for Paging<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next: None,
            total: None,
        }
    }
}

fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    pub artists: Option<Paging<Artist>>,
    pub albums: Option<Paging<Album>>,
    pub tracks: Option<Paging<Track>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub artists: Vec<Artist>,
    pub albums: Vec<Album>,
    pub tracks: Vec<Track>,
}

impl From<SearchResponse> for SearchResult {
    fn from(res: SearchResponse) -> Self {
        Self {
            artists: res.artists.map(|p| p.items).unwrap_or_default(),
            albums: res.albums.map(|p| p.items).unwrap_or_default(),
            tracks: res.tracks.map(|p| p.items).unwrap_or_default(),
        }
    }
}

/// Artist object plus the artist's latest albums and singles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistDetail {
    pub artist: Artist,
    pub albums: Vec<Album>,
}

impl ArtistDetail {
    pub fn release_candidates(&self) -> Vec<ReleaseCandidate> {
        self.albums
            .iter()
            .map(|album| ReleaseCandidate {
                entity_id: self.artist.id.clone(),
                artist_name: self.artist.name.clone(),
                name: album.name.clone(),
                release_date: album.release_date.clone().unwrap_or_default(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumDetail {
    pub id: String,
    pub name: String,
    pub release_date: Option<String>,
    pub label: Option<String>,
    pub total_tracks: Option<u32>,
    pub artists: Vec<AlbumArtist>,
    pub tracks: Paging<Track>,
}

pub type TrackDetail = Track;

/// Outcome of a single poll pass.
#[derive(Debug, Clone, Serialize)]
pub struct PollReport {
    pub started_at: DateTime<Utc>,
    pub checked: usize,
    pub notified: usize,
    pub errors: Vec<EntityError>,
}

impl PollReport {
    pub fn empty(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            checked: 0,
            notified: 0,
            errors: Vec::new(),
        }
    }
}

/// A failure scoped to one tracked artist.
#[derive(Debug, Clone, Serialize)]
pub struct EntityError {
    pub id: String,
    #[serde(serialize_with = "display_string")]
    pub cause: ClientError,
}

fn display_string<S: serde::Serializer>(cause: &ClientError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(cause)
}

#[derive(Tabled)]
pub struct TrackedArtistRow {
    pub id: String,
    pub last_checked: String,
    pub created_at: String,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub id: String,
    pub name: String,
    pub genres: String,
}

#[derive(Tabled)]
pub struct ReleaseTableRow {
    pub id: String,
    pub date: String,
    pub name: String,
    pub artists: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub id: String,
    pub name: String,
    pub artists: String,
    pub duration: String,
}

#[derive(Tabled)]
pub struct EntityErrorRow {
    pub id: String,
    pub cause: String,
}
