use super::{ParamKind, ParamLocation, ParamSpec, ToolSpec};

const TIME_RANGES: &[&str] = &["short_term", "medium_term", "long_term"];

const fn query(description: &'static str) -> ParamSpec {
    ParamSpec {
        name: "query",
        description,
        kind: ParamKind::Text,
        location: ParamLocation::Query("q"),
        required: true,
        default: None,
    }
}

const fn limit(default: &'static str) -> ParamSpec {
    ParamSpec {
        name: "limit",
        description: "Maximum number of results to return (at most 50)",
        kind: ParamKind::Limit { max: 50 },
        location: ParamLocation::Query("limit"),
        required: false,
        default: Some(default),
    }
}

const fn id(name: &'static str, kind: &'static str, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        description,
        kind: ParamKind::Id(kind),
        location: ParamLocation::Path,
        required: true,
        default: None,
    }
}

const TIME_RANGE: ParamSpec = ParamSpec {
    name: "time_range",
    description: "short_term (about 4 weeks), medium_term (about 6 months) or long_term (several years)",
    kind: ParamKind::Choice(TIME_RANGES),
    location: ParamLocation::Query("time_range"),
    required: false,
    default: Some("medium_term"),
};

const MARKET: ParamSpec = ParamSpec {
    name: "market",
    description: "ISO 3166-1 alpha-2 country code",
    kind: ParamKind::Text,
    location: ParamLocation::Query("market"),
    required: false,
    default: Some("US"),
};

pub static TOOLS: [ToolSpec; 14] = [
    ToolSpec {
        name: "search_tracks",
        description: "Search for tracks on Spotify.",
        endpoint: "/search",
        fixed: &[("type", "track")],
        params: &[query("Search query for tracks"), limit("10")],
    },
    ToolSpec {
        name: "get_track",
        description: "Get detailed information about a specific track by ID.",
        endpoint: "/tracks/{track_id}",
        fixed: &[],
        params: &[id("track_id", "track", "Spotify track ID, URI or URL")],
    },
    ToolSpec {
        name: "search_artists",
        description: "Search for artists on Spotify.",
        endpoint: "/search",
        fixed: &[("type", "artist")],
        params: &[query("Search query for artists"), limit("10")],
    },
    ToolSpec {
        name: "get_artist",
        description: "Get detailed information about a specific artist by ID.",
        endpoint: "/artists/{artist_id}",
        fixed: &[],
        params: &[id("artist_id", "artist", "Spotify artist ID, URI or URL")],
    },
    ToolSpec {
        name: "get_artist_top_tracks",
        description: "Get top tracks for a specific artist.",
        endpoint: "/artists/{artist_id}/top-tracks",
        fixed: &[],
        params: &[
            id("artist_id", "artist", "Spotify artist ID, URI or URL"),
            MARKET,
        ],
    },
    ToolSpec {
        name: "search_albums",
        description: "Search for albums on Spotify.",
        endpoint: "/search",
        fixed: &[("type", "album")],
        params: &[query("Search query for albums"), limit("10")],
    },
    ToolSpec {
        name: "get_album",
        description: "Get detailed information about a specific album by ID.",
        endpoint: "/albums/{album_id}",
        fixed: &[],
        params: &[id("album_id", "album", "Spotify album ID, URI or URL")],
    },
    ToolSpec {
        name: "search_playlists",
        description: "Search for playlists on Spotify.",
        endpoint: "/search",
        fixed: &[("type", "playlist")],
        params: &[query("Search query for playlists"), limit("10")],
    },
    ToolSpec {
        name: "get_playlist",
        description: "Get detailed information about a specific playlist by ID.",
        endpoint: "/playlists/{playlist_id}",
        fixed: &[],
        params: &[id("playlist_id", "playlist", "Spotify playlist ID, URI or URL")],
    },
    ToolSpec {
        name: "get_current_user",
        description: "Get the current user's profile information.",
        endpoint: "/me",
        fixed: &[],
        params: &[],
    },
    ToolSpec {
        name: "get_user_playlists",
        description: "Get the current user's playlists.",
        endpoint: "/me/playlists",
        fixed: &[],
        params: &[limit("20")],
    },
    ToolSpec {
        name: "get_user_top_tracks",
        description: "Get the current user's top tracks.",
        endpoint: "/me/top/tracks",
        fixed: &[],
        params: &[limit("20"), TIME_RANGE],
    },
    ToolSpec {
        name: "get_user_top_artists",
        description: "Get the current user's top artists.",
        endpoint: "/me/top/artists",
        fixed: &[],
        params: &[limit("20"), TIME_RANGE],
    },
    ToolSpec {
        name: "get_recently_played",
        description: "Get the current user's recently played tracks.",
        endpoint: "/me/player/recently-played",
        fixed: &[],
        params: &[limit("20")],
    },
];
