use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of chart page a source points at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    YoutubeInsights,
    SpotifyCountry,
    DeezerChart,
    ItunesChart,
    #[default]
    Unknown,
}

impl SourceType {
    /// Detect the source type from a chart page URL.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        let url = url.to_lowercase();
        if url.contains("kworb.net/youtube/insights/") {
            Self::YoutubeInsights
        } else if url.contains("kworb.net/spotify/country/") {
            Self::SpotifyCountry
        } else if url.contains("kworb.net/charts/deezer/") {
            Self::DeezerChart
        } else if url.contains("kworb.net/charts/itunes/") {
            Self::ItunesChart
        } else {
            Self::Unknown
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::YoutubeInsights => "youtube_insights",
            Self::SpotifyCountry => "spotify_country",
            Self::DeezerChart => "deezer_chart",
            Self::ItunesChart => "itunes_chart",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
