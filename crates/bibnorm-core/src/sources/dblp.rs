//! DBLP source plugin
//!
//! API docs: https://dblp.org/faq/How+to+use+the+dblp+search+API.html
//! Publication search: `/search/publ/api?q=..&format=json&h=..`
//! Venue search: `/search/venue/api?q=..&format=json`
//! Detail records: `<record url>.bib?param=1`

use serde::Deserialize;

use super::traits::BibliographicIndex;
use crate::candidate::{CandidateRecord, PublicationKind, VenueHit};
use crate::config::{DblpConfig, ReconcileConfig};
use crate::error::{ReconcileError, Result};
use crate::http::{HttpClient, HttpError};

/// DBLP search API response wrapper (shared by publication and venue search)
#[derive(Debug, Deserialize)]
struct DblpResponse<T> {
    result: DblpResult<T>,
}

#[derive(Debug, Deserialize)]
struct DblpResult<T> {
    hits: DblpHits<T>,
}

#[derive(Debug, Deserialize)]
struct DblpHits<T> {
    /// Absent when the search has no results
    #[serde(default = "Vec::new")]
    hit: Vec<DblpHit<T>>,
}

#[derive(Debug, Deserialize)]
struct DblpHit<T> {
    #[serde(rename = "@score", default)]
    score: Option<Score>,
    info: T,
}

/// Scores arrive as strings, but accept numbers too
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Score {
    Number(f64),
    Text(String),
}

impl Score {
    fn value(&self) -> f64 {
        match self {
            Score::Number(n) => *n,
            Score::Text(s) => s.trim().parse().unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PublicationInfo {
    title: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    key: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VenueInfo {
    venue: Option<String>,
    acronym: Option<String>,
    url: Option<String>,
}

pub struct DblpSource {
    client: HttpClient,
    config: DblpConfig,
}

impl DblpSource {
    pub fn new(config: &ReconcileConfig) -> std::result::Result<Self, HttpError> {
        Ok(Self::with_client(
            HttpClient::new(&config.http)?,
            config.dblp.clone(),
        ))
    }

    pub fn with_client(client: HttpClient, config: DblpConfig) -> Self {
        Self { client, config }
    }

    /// Parse a publication search response. Hits without a title, key or
    /// URL are skipped.
    pub fn parse_search_response(json: &str) -> Result<Vec<CandidateRecord>> {
        let response: DblpResponse<PublicationInfo> = serde_json::from_str(json)
            .map_err(|e| ReconcileError::Parse(format!("Invalid DBLP search JSON: {}", e)))?;

        Ok(response
            .result
            .hits
            .hit
            .into_iter()
            .filter_map(Self::parse_publication_hit)
            .collect())
    }

    fn parse_publication_hit(hit: DblpHit<PublicationInfo>) -> Option<CandidateRecord> {
        let info = hit.info;
        Some(CandidateRecord {
            key: info.key?,
            url: info.url?,
            kind: PublicationKind::from_label(info.kind.as_deref().unwrap_or_default()),
            title: info.title?,
            score: hit.score.map(|s| s.value()).unwrap_or(0.0),
        })
    }

    /// Parse a venue search response. Hits without a name or URL are skipped.
    pub fn parse_venue_response(json: &str) -> Result<Vec<VenueHit>> {
        let response: DblpResponse<VenueInfo> = serde_json::from_str(json)
            .map_err(|e| ReconcileError::Parse(format!("Invalid DBLP venue JSON: {}", e)))?;

        Ok(response
            .result
            .hits
            .hit
            .into_iter()
            .filter_map(|hit| {
                Some(VenueHit {
                    url: hit.info.url?,
                    name: hit.info.venue?,
                    acronym: hit.info.acronym,
                })
            })
            .collect())
    }
}

impl BibliographicIndex for DblpSource {
    async fn search_publications(&self, title: &str) -> Result<Vec<CandidateRecord>> {
        let max_hits = self.config.max_hits.to_string();
        let response = self
            .client
            .get_with_params(
                &self.config.publication_search_url,
                &[("q", title), ("format", "json"), ("h", max_hits.as_str())],
            )
            .await?;

        Self::parse_search_response(&response.body)
    }

    async fn fetch_record(&self, candidate: &CandidateRecord) -> Result<String> {
        let url = format!("{}.bib", candidate.url);
        let response = self.client.get_with_params(&url, &[("param", "1")]).await?;
        Ok(response.body)
    }

    async fn search_venues(&self, venue_key: &str) -> Result<Vec<VenueHit>> {
        let response = self
            .client
            .get_with_params(
                &self.config.venue_search_url,
                &[("q", venue_key), ("format", "json")],
            )
            .await?;

        Self::parse_venue_response(&response.body)
    }

    fn venue_url(&self, venue_key: &str) -> String {
        let base = self.config.db_base_url.trim_end_matches('/');
        format!("{}/{}/", base, venue_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use httpmock::prelude::*;

    const SEARCH_RESPONSE: &str = r#"{
        "result": {
            "query": "Federated Machine Learning*",
            "status": {"@code": "200", "text": "OK"},
            "hits": {
                "@total": "2", "@computed": "2", "@sent": "2", "@first": "0",
                "hit": [
                    {
                        "@score": "7", "@id": "1",
                        "info": {
                            "title": "Federated Machine Learning: Concept and Applications.",
                            "venue": "ACM Trans. Intell. Syst. Technol.",
                            "year": "2019",
                            "type": "Journal Articles",
                            "key": "journals/tist/YangLCT19",
                            "url": "https://dblp.org/rec/journals/tist/YangLCT19"
                        }
                    },
                    {
                        "@score": "5", "@id": "2",
                        "info": {
                            "title": "Federated Machine Learning: Concept and Applications.",
                            "venue": "CoRR",
                            "type": "Informal and Other Publications",
                            "key": "journals/corr/abs-1902-04885",
                            "url": "https://dblp.org/rec/journals/corr/abs-1902-04885"
                        }
                    }
                ]
            }
        }
    }"#;

    const EMPTY_RESPONSE: &str = r#"{
        "result": {
            "query": "zzzz*",
            "hits": {"@total": "0", "@computed": "0", "@sent": "0", "@first": "0"}
        }
    }"#;

    const VENUE_RESPONSE: &str = r#"{
        "result": {
            "hits": {
                "@total": "2",
                "hit": [
                    {
                        "@score": "1",
                        "info": {
                            "venue": "ACM Transactions on Intelligent Systems and Technology (TIST)",
                            "acronym": "TIST",
                            "type": "Journal",
                            "url": "https://dblp.org/db/journals/tist/"
                        }
                    },
                    {
                        "@score": "1",
                        "info": {
                            "venue": "Some Other Venue",
                            "type": "Journal",
                            "url": "https://dblp.org/db/journals/tist2/"
                        }
                    }
                ]
            }
        }
    }"#;

    #[test]
    fn test_parse_search_response() {
        let results = DblpSource::parse_search_response(SEARCH_RESPONSE).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].key, "journals/tist/YangLCT19");
        assert_eq!(results[0].kind, PublicationKind::JournalArticle);
        assert_eq!(results[0].score, 7.0);
        assert!(results[1].kind.is_informal());
    }

    #[test]
    fn test_parse_empty_search_response() {
        let results = DblpSource::parse_search_response(EMPTY_RESPONSE).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = DblpSource::parse_search_response("<html>busy</html>").unwrap_err();
        assert!(matches!(err, ReconcileError::Parse(_)));
    }

    #[test]
    fn test_hit_without_key_is_skipped() {
        let json = r#"{"result": {"hits": {"hit": [{"@score": 3, "info": {"title": "T"}}]}}}"#;
        assert!(DblpSource::parse_search_response(json).unwrap().is_empty());
    }

    #[test]
    fn test_parse_venue_response() {
        let venues = DblpSource::parse_venue_response(VENUE_RESPONSE).unwrap();
        assert_eq!(venues.len(), 2);
        assert_eq!(venues[0].acronym.as_deref(), Some("TIST"));
        assert_eq!(venues[1].acronym, None);
    }

    #[test]
    fn test_venue_url() {
        let source = DblpSource::new(&ReconcileConfig::default()).unwrap();
        assert_eq!(
            source.venue_url("journals/tist"),
            "https://dblp.org/db/journals/tist/"
        );

        let mut config = DblpConfig::default();
        config.db_base_url = "https://dblp.uni-trier.de/db".to_string();
        let mirror =
            DblpSource::with_client(HttpClient::new(&HttpConfig::default()).unwrap(), config);
        assert_eq!(
            mirror.venue_url("conf/nips"),
            "https://dblp.uni-trier.de/db/conf/nips/"
        );
    }

    fn mock_source(server: &MockServer) -> DblpSource {
        let config = DblpConfig {
            publication_search_url: server.url("/search/publ/api"),
            venue_search_url: server.url("/search/venue/api"),
            db_base_url: server.url("/db/"),
            max_hits: 50,
        };
        DblpSource::with_client(HttpClient::new(&HttpConfig::default()).unwrap(), config)
    }

    #[tokio::test]
    async fn test_search_publications_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search/publ/api")
                    .query_param("q", "Federated Machine Learning: Concept and Applications")
                    .query_param("format", "json")
                    .query_param("h", "50");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(SEARCH_RESPONSE);
            })
            .await;

        let results = mock_source(&server)
            .search_publications("Federated Machine Learning: Concept and Applications")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://dblp.org/rec/journals/tist/YangLCT19");
    }

    #[tokio::test]
    async fn test_fetch_record_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rec/journals/tist/YangLCT19.bib")
                    .query_param("param", "1");
                then.status(200)
                    .body("@article{DBLP:journals/tist/YangLCT19, title = {T}}");
            })
            .await;

        let candidate = CandidateRecord {
            key: "journals/tist/YangLCT19".to_string(),
            url: server.url("/rec/journals/tist/YangLCT19"),
            kind: PublicationKind::JournalArticle,
            title: "T".to_string(),
            score: 1.0,
        };
        let record = mock_source(&server).fetch_record(&candidate).await.unwrap();

        mock.assert_async().await;
        assert!(record.starts_with("@article{DBLP:journals/tist/YangLCT19"));
    }

    #[tokio::test]
    async fn test_fetch_record_status_is_fetch_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rec/gone.bib");
                then.status(404);
            })
            .await;

        let candidate = CandidateRecord {
            key: "gone".to_string(),
            url: server.url("/rec/gone"),
            kind: PublicationKind::Informal,
            title: "T".to_string(),
            score: 1.0,
        };
        let err = mock_source(&server).fetch_record(&candidate).await.unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::Fetch(HttpError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_venue_search_resolves_against_db_base() {
        let server = MockServer::start_async().await;
        let body = format!(
            r#"{{"result": {{"hits": {{"hit": [
                {{"info": {{"venue": "Other", "url": "{other}"}}}},
                {{"info": {{"venue": "ACM Transactions on Intelligent Systems and Technology (TIST), USA",
                           "acronym": "TIST", "url": "{tist}"}}}}
            ]}}}}}}"#,
            other = server.url("/db/journals/tist2/"),
            tist = server.url("/db/journals/tist/"),
        );
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search/venue/api")
                    .query_param("q", "journals/tist")
                    .query_param("format", "json");
                then.status(200).body(body.as_str());
            })
            .await;

        let source = mock_source(&server);
        let name = crate::venue::resolve_venue(&source, "journals/tist/YangLCT19")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            name.as_deref(),
            Some("ACM Transactions on Intelligent Systems and Technology")
        );
    }

    #[tokio::test]
    async fn test_garbled_search_body_is_parse_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search/publ/api");
                then.status(200).body("<html>busy</html>");
            })
            .await;

        let err = mock_source(&server)
            .search_publications("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Parse(_)));
    }
}
