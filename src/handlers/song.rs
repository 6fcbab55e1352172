//! Song search links

use url::form_urlencoded;

use crate::types::ChatResponse;

pub const SEARCH_URL: &str = "https://www.youtube.com/results";

/// Build a video-search link for a song name
///
/// The name is used verbatim in the reply text and percent-encoded into the
/// `search_query` parameter. An empty name yields an empty query.
pub fn song_link(song: &str) -> ChatResponse {
    let query: String = form_urlencoded::byte_serialize(song.as_bytes()).collect();

    ChatResponse::YoutubeLink {
        text: format!("I found results for '{}'.", song),
        url: format!("{}?search_query={}", SEARCH_URL, query),
    }
}
