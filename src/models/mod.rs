use serde::{Deserialize, Serialize};

pub mod movie;
pub mod navigation;

pub use movie::{FeatureVector, MovieRecord, Recommendation, RecommendationSet};
pub use navigation::{NavigationState, Page, Theme};

/// Poster shown when the metadata service has no image for a movie
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/400x600?text=No+Image";

const UNKNOWN_TITLE: &str = "Unknown";
const UNKNOWN_RATING: &str = "N/A";
const MISSING_PLOT: &str = "No plot available.";
const TRAILER_SEARCH_URL: &str = "https://www.youtube.com/results";

/// Descriptive fields and poster for a movie, as displayed on a poster card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetadataRecord {
    pub title: String,
    pub year: String,
    pub rating: String,
    pub plot: String,
    pub trailer_link: String,
    pub poster_url: String,
}

impl MetadataRecord {
    /// Degraded record used whenever the metadata service cannot answer
    pub fn placeholder() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            year: String::new(),
            rating: UNKNOWN_RATING.to_string(),
            plot: MISSING_PLOT.to_string(),
            trailer_link: trailer_link(UNKNOWN_TITLE),
            poster_url: PLACEHOLDER_POSTER_URL.to_string(),
        }
    }

    pub fn has_poster(&self) -> bool {
        self.poster_url != PLACEHOLDER_POSTER_URL
    }
}

/// Builds a video search URL for "<title> trailer"
pub fn trailer_link(title: &str) -> String {
    let query = format!("{} trailer", title);
    reqwest::Url::parse_with_params(TRAILER_SEARCH_URL, &[("search_query", query.as_str())])
        .map(|url| url.to_string())
        .unwrap_or_else(|_| TRAILER_SEARCH_URL.to_string())
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// Raw API response from OMDb (`GET /?i=<imdb id>`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default, rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    /// "True" or "False"
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl OmdbResponse {
    /// OMDb reports lookup failures with `"Response": "False"` and a 200 status
    pub fn is_error(&self) -> bool {
        self.response
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("false"))
    }
}

/// OMDb uses "N/A" for fields it has no value for
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "N/A")
}

impl From<OmdbResponse> for MetadataRecord {
    fn from(response: OmdbResponse) -> Self {
        let title = present(response.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let trailer_link = trailer_link(&title);

        MetadataRecord {
            year: present(response.year).unwrap_or_default(),
            rating: present(response.imdb_rating).unwrap_or_else(|| UNKNOWN_RATING.to_string()),
            plot: present(response.plot).unwrap_or_else(|| MISSING_PLOT.to_string()),
            poster_url: present(response.poster)
                .unwrap_or_else(|| PLACEHOLDER_POSTER_URL.to_string()),
            title,
            trailer_link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omdb_response_to_metadata() {
        let json = r#"{
            "Title": "Inception",
            "Year": "2010",
            "imdbRating": "8.8",
            "Plot": "A thief who steals corporate secrets through dream-sharing technology.",
            "Poster": "https://m.media-amazon.com/images/M/inception.jpg",
            "Response": "True"
        }"#;

        let response: OmdbResponse = serde_json::from_str(json).unwrap();
        assert!(!response.is_error());

        let record = MetadataRecord::from(response);
        assert_eq!(record.title, "Inception");
        assert_eq!(record.year, "2010");
        assert_eq!(record.rating, "8.8");
        assert_eq!(
            record.poster_url,
            "https://m.media-amazon.com/images/M/inception.jpg"
        );
        assert_eq!(
            record.trailer_link,
            "https://www.youtube.com/results?search_query=Inception+trailer"
        );
        assert!(record.has_poster());
    }

    #[test]
    fn test_poster_not_available_uses_placeholder() {
        let json = r#"{"Title": "Obscure Short", "Poster": "N/A", "imdbRating": "N/A"}"#;
        let record = MetadataRecord::from(serde_json::from_str::<OmdbResponse>(json).unwrap());
        assert_eq!(record.poster_url, PLACEHOLDER_POSTER_URL);
        assert_eq!(record.rating, "N/A");
        assert!(!record.has_poster());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let record = MetadataRecord::from(OmdbResponse::default());
        assert_eq!(record.title, "Unknown");
        assert_eq!(record.year, "");
        assert_eq!(record.rating, "N/A");
        assert_eq!(record.plot, "No plot available.");
        assert_eq!(record.poster_url, PLACEHOLDER_POSTER_URL);
    }

    #[test]
    fn test_error_response_detected() {
        let json = r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#;
        let response: OmdbResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_error());
        assert_eq!(response.error.as_deref(), Some("Incorrect IMDb ID."));
    }

    #[test]
    fn test_trailer_link_encodes_title() {
        assert_eq!(
            trailer_link("Amélie & Co"),
            "https://www.youtube.com/results?search_query=Am%C3%A9lie+%26+Co+trailer"
        );
    }

    #[test]
    fn test_placeholder_record() {
        let record = MetadataRecord::placeholder();
        assert_eq!(record.title, "Unknown");
        assert_eq!(record.poster_url, PLACEHOLDER_POSTER_URL);
        assert_eq!(record.plot, "No plot available.");
    }
}
