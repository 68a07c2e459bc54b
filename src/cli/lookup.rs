use tokio_util::sync::CancellationToken;

use crate::{
    cli::search::{print_albums, print_artists, print_tracks},
    error, info, spotify, utils,
};

pub async fn lookup_artist(id: String) {
    let engine = super::open_engine().await;
    let token = super::access_token(&engine).await;

    let detail = match spotify::artists::get_artist_details(
        engine.client(),
        &token.value,
        &id,
        &CancellationToken::new(),
    )
    .await
    {
        Ok(detail) => detail,
        Err(e) => error!("Cannot load artist {}. Err: {}", id, e),
    };

    print_artists(std::slice::from_ref(&detail.artist));
    if let Some(popularity) = detail.artist.popularity {
        info!("Popularity: {}", popularity);
    }

    if detail.albums.is_empty() {
        info!("No albums or singles");
    } else {
        info!("Latest albums and singles");
        print_albums(&detail.albums);
    }
}

pub async fn lookup_album(id: String) {
    let engine = super::open_engine().await;
    let token = super::access_token(&engine).await;

    let album = match spotify::albums::get_album(
        engine.client(),
        &token.value,
        &id,
        &CancellationToken::new(),
    )
    .await
    {
        Ok(album) => album,
        Err(e) => error!("Cannot load album {}. Err: {}", id, e),
    };

    info!(
        "{} by {} ({})",
        album.name,
        utils::join_artist_names(&album.artists),
        album.release_date.as_deref().unwrap_or("unknown date")
    );
    if let Some(label) = &album.label {
        info!("Label: {}", label);
    }
    print_tracks(&album.tracks.items);
}

pub async fn lookup_track(id: String) {
    let engine = super::open_engine().await;
    let token = super::access_token(&engine).await;

    let track = match spotify::tracks::get_track(
        engine.client(),
        &token.value,
        &id,
        &CancellationToken::new(),
    )
    .await
    {
        Ok(track) => track,
        Err(e) => error!("Cannot load track {}. Err: {}", id, e),
    };

    print_tracks(std::slice::from_ref(&track));
    if let Some(album) = &track.album {
        info!(
            "From {} ({})",
            album.name,
            album.release_date.as_deref().unwrap_or("unknown date")
        );
    }
}
