use tabled::Table;
use tokio_util::sync::CancellationToken;

use crate::{
    error, info, spotify,
    types::{Album, Artist, ArtistTableRow, ReleaseTableRow, Track, TrackTableRow},
    utils,
};

/// Searches artists, albums and tracks and prints one table per kind.
pub async fn search(query: String) {
    let engine = super::open_engine().await;
    let token = super::access_token(&engine).await;

    let pb = super::spinner(format!("Searching for \"{}\"...", query));
    let result =
        spotify::search::search(engine.client(), &token.value, &query, &CancellationToken::new())
            .await;
    pb.finish_and_clear();

    let result = match result {
        Ok(result) => result,
        Err(e) => error!("Search failed. Err: {}", e),
    };

    if result.artists.is_empty() && result.albums.is_empty() && result.tracks.is_empty() {
        info!("Nothing found for \"{}\"", query);
        return;
    }

    if !result.artists.is_empty() {
        info!("Artists");
        print_artists(&result.artists);
    }
    if !result.albums.is_empty() {
        info!("Albums");
        print_albums(&result.albums);
    }
    if !result.tracks.is_empty() {
        info!("Tracks");
        print_tracks(&result.tracks);
    }
}

pub(super) fn print_artists(artists: &[Artist]) {
    let rows: Vec<ArtistTableRow> = artists
        .iter()
        .map(|a| ArtistTableRow {
            id: a.id.clone(),
            name: a.name.clone(),
            genres: a.genres.iter().take(3).cloned().collect::<Vec<_>>().join(","),
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub(super) fn print_albums(albums: &[Album]) {
    let rows: Vec<ReleaseTableRow> = albums
        .iter()
        .map(|a| ReleaseTableRow {
            id: a.id.clone(),
            date: a.release_date.clone().unwrap_or_default(),
            name: a.name.clone(),
            artists: utils::join_artist_names(&a.artists),
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub(super) fn print_tracks(tracks: &[Track]) {
    let rows: Vec<TrackTableRow> = tracks
        .iter()
        .map(|t| TrackTableRow {
            id: t.id.clone(),
            name: t.name.clone(),
            artists: utils::join_artist_names(&t.artists),
            duration: utils::format_duration_ms(t.duration_ms),
        })
        .collect();
    println!("{}", Table::new(rows));
}
