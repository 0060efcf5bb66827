use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::media::{Genre, MediaId};
use crate::settings::{AppSettings, DEFAULT_LANGUAGE};

pub const API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    W185,
    #[default]
    W500,
    Original,
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSize::W185 => write!(f, "w185"),
            ImageSize::W500 => write!(f, "w500"),
            ImageSize::Original => write!(f, "original"),
        }
    }
}

/// Absolute URL for a relative image path, or the placeholder when there is no path.
pub fn image_url(path: &str, size: ImageSize) -> String {
    if path.is_empty() {
        return String::from(PLACEHOLDER_IMAGE);
    }
    format!("{}/{}{}", IMAGE_BASE_URL, size, path)
}

pub fn backdrop_url(path: &str) -> String {
    image_url(path, ImageSize::Original)
}

pub fn is_placeholder(url: &str) -> bool {
    url == PLACEHOLDER_IMAGE
}

pub async fn fetch_image_bytes(url: String) -> Result<Vec<u8>, String> {
    reqwest::get(&url)
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())?
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Listing, search and combined-credit entry; movies carry `title`, series carry `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMediaResult {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub profile_path: Option<String>,
    pub media_type: Option<String>,
    pub vote_average: Option<f32>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub id: u64,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f32>,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub status: Option<String>,
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvDetails {
    #[serde(default)]
    pub id: u64,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub status: Option<String>,
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastCredit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastCredit {
    pub id: u64,
    pub name: Option<String>,
    pub profile_path: Option<String>,
    pub character: Option<String>,
    pub known_for_department: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPersonDetails {
    #[serde(default)]
    pub id: u64,
    pub name: Option<String>,
    pub biography: Option<String>,
    pub profile_path: Option<String>,
    pub birthday: Option<String>,
    pub place_of_birth: Option<String>,
    pub known_for_department: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCombinedCredits {
    #[serde(default)]
    pub cast: Vec<TmdbMediaResult>,
}

/// Every upstream call a page can make. Implementations must not retry or cache.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn trending_today(&self) -> Result<TmdbPage<TmdbMediaResult>, ApiError>;
    async fn popular_movies(&self) -> Result<TmdbPage<TmdbMediaResult>, ApiError>;
    async fn free_to_watch(&self) -> Result<TmdbPage<TmdbMediaResult>, ApiError>;
    async fn search_multi(&self, query: &str) -> Result<TmdbPage<TmdbMediaResult>, ApiError>;
    async fn movie_details(&self, id: MediaId) -> Result<TmdbMovieDetails, ApiError>;
    async fn tv_details(&self, id: MediaId) -> Result<TmdbTvDetails, ApiError>;
    async fn movie_credits(&self, id: MediaId) -> Result<TmdbCredits, ApiError>;
    async fn tv_credits(&self, id: MediaId) -> Result<TmdbCredits, ApiError>;
    async fn person_details(&self, id: MediaId) -> Result<TmdbPersonDetails, ApiError>;
    async fn person_credits(&self, id: MediaId) -> Result<TmdbCombinedCredits, ApiError>;
}

#[derive(Clone)]
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    language: String,
    http_client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(api_key: String, language: String) -> Self {
        Self {
            api_key,
            base_url: String::from(API_BASE_URL),
            language,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        let language = if settings.language.is_empty() {
            String::from(DEFAULT_LANGUAGE)
        } else {
            settings.language.clone()
        };
        Self::new(settings.api_key.clone(), language)
    }

    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}{}?api_key={}&language={}",
            self.base_url, endpoint, self.api_key, self.language
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        debug!(endpoint, "catalog request");
        let response = self
            .http_client
            .get(self.build_url(endpoint, params))
            .send()
            .await?;

        if let Some(error) = ApiError::from_status(response.status().as_u16()) {
            debug!(endpoint, %error, "catalog request rejected");
            return Err(error);
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn trending_today(&self) -> Result<TmdbPage<TmdbMediaResult>, ApiError> {
        self.fetch_json("/trending/all/day", &[]).await
    }

    async fn popular_movies(&self) -> Result<TmdbPage<TmdbMediaResult>, ApiError> {
        self.fetch_json("/movie/popular", &[]).await
    }

    async fn free_to_watch(&self) -> Result<TmdbPage<TmdbMediaResult>, ApiError> {
        self.fetch_json(
            "/discover/movie",
            &[("with_watch_monetization_types", "free")],
        )
        .await
    }

    async fn search_multi(&self, query: &str) -> Result<TmdbPage<TmdbMediaResult>, ApiError> {
        self.fetch_json("/search/multi", &[("query", query)]).await
    }

    async fn movie_details(&self, id: MediaId) -> Result<TmdbMovieDetails, ApiError> {
        self.fetch_json(&format!("/movie/{}", id), &[]).await
    }

    async fn tv_details(&self, id: MediaId) -> Result<TmdbTvDetails, ApiError> {
        self.fetch_json(&format!("/tv/{}", id), &[]).await
    }

    async fn movie_credits(&self, id: MediaId) -> Result<TmdbCredits, ApiError> {
        self.fetch_json(&format!("/movie/{}/credits", id), &[]).await
    }

    async fn tv_credits(&self, id: MediaId) -> Result<TmdbCredits, ApiError> {
        self.fetch_json(&format!("/tv/{}/credits", id), &[]).await
    }

    async fn person_details(&self, id: MediaId) -> Result<TmdbPersonDetails, ApiError> {
        self.fetch_json(&format!("/person/{}", id), &[]).await
    }

    async fn person_credits(&self, id: MediaId) -> Result<TmdbCombinedCredits, ApiError> {
        self.fetch_json(&format!("/person/{}/combined_credits", id), &[])
            .await
    }
}

#[cfg(test)]
pub mod fake {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use serde_json::Value;

    use super::*;

    /// Serves canned JSON keyed by endpoint path. Unknown paths answer `NotFound`.
    #[derive(Default)]
    pub struct FakeCatalog {
        responses: HashMap<String, Result<Value, ApiError>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        pub fn with(mut self, endpoint: &str, body: Value) -> Self {
            self.responses.insert(endpoint.to_string(), Ok(body));
            self
        }

        pub fn failing(mut self, endpoint: &str, error: ApiError) -> Self {
            self.responses.insert(endpoint.to_string(), Err(error));
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn respond<T: DeserializeOwned>(&self, endpoint: String) -> Result<T, ApiError> {
            self.calls.lock().unwrap().push(endpoint.clone());
            match self.responses.get(&endpoint) {
                Some(Ok(body)) => serde_json::from_value(body.clone())
                    .map_err(|e| ApiError::Parse(e.to_string())),
                Some(Err(error)) => Err(error.clone()),
                None => Err(ApiError::NotFound),
            }
        }
    }

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        async fn trending_today(&self) -> Result<TmdbPage<TmdbMediaResult>, ApiError> {
            self.respond(String::from("/trending/all/day"))
        }

        async fn popular_movies(&self) -> Result<TmdbPage<TmdbMediaResult>, ApiError> {
            self.respond(String::from("/movie/popular"))
        }

        async fn free_to_watch(&self) -> Result<TmdbPage<TmdbMediaResult>, ApiError> {
            self.respond(String::from("/discover/movie"))
        }

        async fn search_multi(&self, query: &str) -> Result<TmdbPage<TmdbMediaResult>, ApiError> {
            self.respond(format!("/search/multi?query={}", query))
        }

        async fn movie_details(&self, id: MediaId) -> Result<TmdbMovieDetails, ApiError> {
            self.respond(format!("/movie/{}", id))
        }

        async fn tv_details(&self, id: MediaId) -> Result<TmdbTvDetails, ApiError> {
            self.respond(format!("/tv/{}", id))
        }

        async fn movie_credits(&self, id: MediaId) -> Result<TmdbCredits, ApiError> {
            self.respond(format!("/movie/{}/credits", id))
        }

        async fn tv_credits(&self, id: MediaId) -> Result<TmdbCredits, ApiError> {
            self.respond(format!("/tv/{}/credits", id))
        }

        async fn person_details(&self, id: MediaId) -> Result<TmdbPersonDetails, ApiError> {
            self.respond(format!("/person/{}", id))
        }

        async fn person_credits(&self, id: MediaId) -> Result<TmdbCombinedCredits, ApiError> {
            self.respond(format!("/person/{}/combined_credits", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_path_yields_placeholder() {
        assert_eq!(image_url("", ImageSize::W500), PLACEHOLDER_IMAGE);
        assert_eq!(backdrop_url(""), PLACEHOLDER_IMAGE);
        assert!(is_placeholder(&image_url("", ImageSize::W185)));
    }

    #[test]
    fn image_url_joins_base_size_and_path() {
        assert_eq!(
            image_url("/abc.jpg", ImageSize::W500),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            image_url("/abc.jpg", ImageSize::W185),
            "https://image.tmdb.org/t/p/w185/abc.jpg"
        );
        assert_eq!(
            backdrop_url("/wide.jpg"),
            "https://image.tmdb.org/t/p/original/wide.jpg"
        );
    }

    #[test]
    fn build_url_carries_key_language_and_encoded_params() {
        let client = TmdbClient::new(String::from("k3y"), String::from("de-DE"));
        assert_eq!(
            client.build_url("/movie/550", &[]),
            "https://api.themoviedb.org/3/movie/550?api_key=k3y&language=de-DE"
        );
        assert_eq!(
            client.build_url("/search/multi", &[("query", "tom & jerry")]),
            "https://api.themoviedb.org/3/search/multi?api_key=k3y&language=de-DE&query=tom%20%26%20jerry"
        );
    }

    #[test]
    fn from_settings_defaults_language() {
        let settings = AppSettings {
            api_key: String::from("k"),
            language: String::new(),
        };
        let client = TmdbClient::from_settings(&settings);
        assert!(client.build_url("/x", &[]).ends_with("language=en-US"));
    }

    #[test]
    fn person_hits_with_null_fields_still_decode() {
        let page: TmdbPage<TmdbMediaResult> = serde_json::from_value(json!({
            "page": 1,
            "results": [
                {
                    "id": 287,
                    "name": "Brad Pitt",
                    "media_type": "person",
                    "profile_path": "/brad.jpg",
                    "overview": null
                },
                { "id": 550, "title": "Fight Club", "media_type": "movie", "vote_average": 8.4 }
            ]
        }))
        .expect("page decode");
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].overview, None);
        assert_eq!(page.results[1].vote_average, Some(8.4));
    }

    #[test]
    fn missing_results_decode_as_empty_page() {
        let page: TmdbPage<TmdbMediaResult> =
            serde_json::from_value(json!({ "page": 1 })).expect("page decode");
        assert!(page.results.is_empty());
    }
    #[test]
    fn combined_credits_keep_only_cast() {
        let credits: TmdbCombinedCredits = serde_json::from_value(json!({
            "id": 31,
            "cast": [{ "id": 13, "title": "Forrest Gump", "media_type": "movie" }],
            "crew": [{ "id": 5, "title": "Produced Thing", "media_type": "movie" }]
        }))
        .expect("credits decode");
        assert_eq!(credits.cast.len(), 1);
        assert_eq!(credits.cast[0].id, 13);

        let empty: TmdbCombinedCredits =
            serde_json::from_value(json!({ "id": 31 })).expect("credits decode");
        assert!(empty.cast.is_empty());
    }
}
