use chrono::Utc;
use tabled::Table;
use tokio_util::sync::CancellationToken;

use crate::{
    error, info,
    management::SyncStore,
    spotify, success,
    types::TrackedArtistRow,
    utils, warning,
};

pub async fn list_artists() {
    let store = super::load_store().await;
    let mut artists = match store.get_tracked_entities().await {
        Ok(artists) => artists,
        Err(e) => error!("Cannot read tracked artists. Err: {}", e),
    };

    if artists.is_empty() {
        info!("No artists tracked yet.");
        return;
    }

    artists.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    let rows: Vec<TrackedArtistRow> = artists
        .into_iter()
        .map(|a| TrackedArtistRow {
            id: a.id,
            last_checked: utils::format_timestamp(a.last_checked),
            created_at: utils::format_timestamp(a.created_at),
        })
        .collect();

    println!("{}", Table::new(rows));
}

/// Starts tracking `id`. Unless `skip_verify` is set the id is looked up
/// first, so typos do not end up in the store.
pub async fn add_artist(id: String, skip_verify: bool) {
    let id = id.trim().to_string();
    if id.is_empty() {
        error!("Artist id must not be empty");
    }

    let store = super::load_store().await;

    if !skip_verify {
        let engine = super::build_engine(store.clone());
        let token = super::access_token(&engine).await;
        match spotify::artists::get_artist(engine.client(), &token.value, &id, &CancellationToken::new())
            .await
        {
            Ok(artist) => info!("Found {} ({})", artist.name, artist.id),
            Err(e) => error!("Cannot find artist {}. Err: {}", id, e),
        }
    }

    match store.add_artist(&id, Utc::now()).await {
        Ok(true) => success!("Tracking {}, releases after now will be announced", id),
        Ok(false) => warning!("{} is already tracked", id),
        Err(e) => error!("Cannot save artist. Err: {}", e),
    }
}

pub async fn remove_artist(id: String) {
    let store = super::load_store().await;
    match store.remove_artist(id.trim()).await {
        Ok(true) => success!("Stopped tracking {}", id.trim()),
        Ok(false) => warning!("{} is not tracked", id.trim()),
        Err(e) => error!("Cannot save artists. Err: {}", e),
    }
}
