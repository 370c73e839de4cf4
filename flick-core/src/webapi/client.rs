use std::{io::Read, path::PathBuf};

use serde::{de::DeserializeOwned, Deserialize};
use ureq::{
    http::{Response, StatusCode},
    Agent, Body,
};
use url::Url;

use crate::{
    cache::Cached,
    error::Error,
    movie::{Movie, MovieId},
    util::default_ureq_agent_builder,
};

use super::{cache::WebApiCache, RecommendationSource};

/// Client for the movie back-end.
pub struct WebApi {
    agent: Agent,
    base_url: Url,
    cache: WebApiCache,
}

impl WebApi {
    pub fn new(
        base_url: &str,
        proxy_url: Option<&str>,
        cache_base: Option<PathBuf>,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)
            .map_err(|err| Error::WebApiError(format!("invalid API url {base_url:?}: {err}")))?;
        let agent = default_ureq_agent_builder(proxy_url).build();
        Ok(Self {
            agent: agent.into(),
            base_url,
            cache: WebApiCache::new(cache_base),
        })
    }

    fn url(&self, path: &str, queries: &[(&str, String)]) -> Result<Url, Error> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|err| Error::WebApiError(err.to_string()))?;
        url.query_pairs_mut()
            .extend_pairs(queries.iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }

    fn request(&self, url: &Url) -> Result<Response<Body>, Error> {
        log::debug!("GET {}", url);
        let response = self.agent.get(url.as_str()).call()?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status == StatusCode::NOT_FOUND {
            Err(Error::WebApiError(format!("not found: {url}")))
        } else {
            Err(Error::WebApiError(format!("{status} from {url}")))
        }
    }

    /// Send a request and return the deserialized JSON body.
    fn load<T: DeserializeOwned>(&self, url: &Url) -> Result<T, Error> {
        let mut response = self.request(url)?;
        response
            .body_mut()
            .read_json()
            .map_err(|err| Error::WebApiError(err.to_string()))
    }

    /// Send a request and return the raw body.
    fn load_bytes(&self, url: &Url) -> Result<Vec<u8>, Error> {
        let response = self.request(url)?;
        let mut reader = response.into_body().into_reader();
        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;
        Ok(body)
    }
}

/// Movie endpoints.
impl WebApi {
    pub fn get_movie(&self, id: MovieId) -> Result<Movie, Error> {
        let url = self.url("api/movies/id", &[("id", id.to_string())])?;
        self.load(&url)
    }

    /// Load recommendations for `id`, trying the in-memory cache first, then
    /// the disk bucket, and finally the network.  Only successful responses
    /// are cached.
    pub fn get_recommendations(
        &self,
        id: MovieId,
        count: usize,
    ) -> Result<Cached<Vec<Movie>>, Error> {
        if let Some(cached) = self.cache.get_recommendations(id, count) {
            log::debug!("recommendations for {id} served from memory");
            return Ok(cached);
        }

        let bucket = WebApiCache::recommendations_bucket();
        let key = WebApiCache::recommendations_key(id, count);
        if let Some(file) = self.cache.get(bucket, &key) {
            let cached_at = file.metadata()?.modified()?;
            match serde_json::from_reader(file).map_err(Error::from) {
                Ok(response) => {
                    let movies = RecommendationsResponse::into_result(response)?;
                    log::debug!("recommendations for {id} served from disk");
                    self.cache.set_recommendations(id, count, movies.clone());
                    return Ok(Cached::new(movies, cached_at));
                }
                Err(err) => {
                    log::warn!("ignoring unreadable cache entry {key}: {err}");
                }
            }
        }

        let url = self.url(
            "api/movies/similar",
            &[("id", id.to_string()), ("n", count.to_string())],
        )?;
        let body = self.load_bytes(&url)?;
        let movies = parse_recommendations(&body)?;
        self.cache.set(bucket, &key, &body);
        self.cache.set_recommendations(id, count, movies.clone());
        Ok(Cached::fresh(movies))
    }
}

impl RecommendationSource for WebApi {
    fn recommendations(&self, id: MovieId, count: usize) -> Result<Vec<Movie>, Error> {
        self.get_recommendations(id, count).map(|cached| cached.data)
    }
}

#[derive(Deserialize)]
struct RecommendationsResponse {
    #[serde(default, alias = "items")]
    movie_response: Option<Vec<Movie>>,
    #[serde(default)]
    error: String,
}

impl RecommendationsResponse {
    fn into_result(self) -> Result<Vec<Movie>, Error> {
        if !self.error.is_empty() {
            return Err(Error::WebApiError(self.error));
        }
        self.movie_response.ok_or(Error::UnexpectedResponse)
    }
}

/// Parse a recommendations response body.  A non-empty `error` field is a
/// failure even if the status code was fine.
pub fn parse_recommendations(body: &[u8]) -> Result<Vec<Movie>, Error> {
    let response: RecommendationsResponse = serde_json::from_slice(body)?;
    response.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_movie_response_list() {
        let body = br#"{
            "movie_response": [
                {"id": 1, "title": "Heat", "genres": "Action,Crime", "similarity": 0.91},
                {"id": 2, "title": "Ronin", "genres": [{"id": 28, "name": "Action"}]}
            ],
            "error": "",
            "target_movie": "Collateral"
        }"#;
        let movies = parse_recommendations(body).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].similarity, Some(0.91));
        assert!(movies[1].has_genre("Action"));
    }

    #[test]
    fn accepts_items_alias() {
        let movies = parse_recommendations(br#"{"items": [{"id": 9}]}"#).unwrap();
        assert_eq!(movies[0].id, MovieId(9));
    }

    #[test]
    fn error_field_is_a_failure() {
        let err = parse_recommendations(br#"{"error": "No recommendations found", "movie_response": null}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "No recommendations found");
    }

    #[test]
    fn missing_list_is_unexpected() {
        assert!(matches!(
            parse_recommendations(b"{}"),
            Err(Error::UnexpectedResponse)
        ));
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(
            parse_recommendations(b"<html>"),
            Err(Error::JsonError(_))
        ));
    }

    #[test]
    fn urls_join_onto_the_base() {
        let api = WebApi::new("http://localhost:8080/", None, None).unwrap();
        let url = api
            .url("api/movies/similar", &[("id", "10".into()), ("n", "7".into())])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/movies/similar?id=10&n=7");
    }

    #[test]
    fn disk_cache_is_read_before_the_network() {
        let dir = tempfile::tempdir().unwrap();
        let cache = WebApiCache::new(Some(dir.path().to_path_buf()));
        cache.set(
            WebApiCache::recommendations_bucket(),
            &WebApiCache::recommendations_key(MovieId(10), 3),
            br#"{"movie_response": [{"id": 11}, {"id": 12}]}"#,
        );

        // Nothing listens on this port; a network hit would fail.
        let api = WebApi::new("http://127.0.0.1:9/", None, Some(dir.path().to_path_buf())).unwrap();
        let cached = api.get_recommendations(MovieId(10), 3).unwrap();
        assert!(cached.is_cached());
        assert_eq!(cached.data.len(), 2);
    }
}
