//! OpenAlex adapter
//!
//! Resolves each tracked person to an OpenAlex author id (preferring the
//! affiliation hint), then pulls their recent works filtered by publication
//! date. A person who cannot be resolved or fetched is a skip, not a
//! failure; only an unreadable people roster fails the whole source.

use super::{FetchOptions, FetchOutcome, RawPaper, RawRecord, Skip};
use crate::client::HttpClient;
use scout_common::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const BASE_URL: &str = "https://api.openalex.org";

/// One tracked person from the people roster file
#[derive(Debug, Clone, Deserialize)]
pub struct PersonEntry {
    pub name: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub ids: PersonIds,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonIds {
    #[serde(default)]
    pub openalex: Option<String>,
}

/// OpenAlex works source configured with a people roster file
#[derive(Debug, Clone)]
pub struct OpenAlexSource {
    pub id: String,
    pub people_json: PathBuf,
    /// Institution name preferred when disambiguating authors by name
    pub affiliation_hint: String,
}

// Response shapes, trimmed to the fields the pipeline consumes

#[derive(Debug, Deserialize)]
struct AuthorsResponse {
    #[serde(default)]
    results: Vec<AuthorResult>,
}

#[derive(Debug, Deserialize)]
struct AuthorResult {
    id: Option<String>,
    last_known_institution: Option<Institution>,
}

#[derive(Debug, Deserialize)]
struct Institution {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorksResponse {
    #[serde(default)]
    results: Vec<Work>,
}

#[derive(Debug, Deserialize)]
struct Work {
    id: Option<String>,
    display_name: Option<String>,
    publication_date: Option<String>,
    publication_year: Option<i32>,
    doi: Option<String>,
    primary_location: Option<PrimaryLocation>,
    #[serde(default)]
    authorships: Vec<Authorship>,
}

#[derive(Debug, Deserialize)]
struct PrimaryLocation {
    source: Option<LocationSource>,
    landing_page_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocationSource {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Authorship {
    author: Option<AuthorRef>,
}

#[derive(Debug, Deserialize)]
struct AuthorRef {
    display_name: Option<String>,
}

impl OpenAlexSource {
    pub fn new(people_json: &Path) -> Self {
        Self {
            id: "openalex".into(),
            people_json: people_json.to_path_buf(),
            affiliation_hint: "Stanford".into(),
        }
    }

    pub async fn fetch(&self, client: &HttpClient, opts: &FetchOptions) -> Result<FetchOutcome> {
        let people = self.load_people()?;
        let mailto = std::env::var("OPENALEX_MAILTO").unwrap_or_default();

        let mut outcome = FetchOutcome::default();
        for person in &people {
            let author_id = match &person.ids.openalex {
                Some(id) => Some(id.clone()),
                None => match self.resolve_author_id(client, &mailto, &person.name).await {
                    Ok(id) => id,
                    Err(e) => {
                        outcome.skipped.push(Skip {
                            source: self.id.clone(),
                            reason: format!("Author search failed for '{}': {}", person.name, e),
                        });
                        continue;
                    }
                },
            };

            let Some(author_id) = author_id else {
                outcome.skipped.push(Skip {
                    source: self.id.clone(),
                    reason: format!("No OpenAlex author found for '{}'", person.name),
                });
                continue;
            };

            match self.fetch_works(client, &mailto, &author_id, opts).await {
                Ok(works) => {
                    tracing::info!(
                        person = %person.name,
                        count = works.len(),
                        "Retrieved works from OpenAlex"
                    );
                    for work in works {
                        match self.to_raw_paper(work, person) {
                            Ok(paper) => outcome.raw.push(RawRecord::Paper(paper)),
                            Err(reason) => outcome.skipped.push(Skip {
                                source: self.id.clone(),
                                reason,
                            }),
                        }
                    }
                }
                Err(e) => outcome.skipped.push(Skip {
                    source: self.id.clone(),
                    reason: format!("Works fetch failed for '{}': {}", person.name, e),
                }),
            }
        }
        Ok(outcome)
    }

    fn load_people(&self) -> Result<Vec<PersonEntry>> {
        let data = std::fs::read_to_string(&self.people_json).map_err(|e| {
            Error::SourceUnavailable {
                source: self.id.clone(),
                reason: format!(
                    "Cannot read people roster {}: {}",
                    self.people_json.display(),
                    e
                ),
            }
        })?;
        serde_json::from_str(&data).map_err(|e| Error::SourceUnavailable {
            source: self.id.clone(),
            reason: format!("People roster is not valid JSON: {}", e),
        })
    }

    /// Search `/authors` by name, preferring the affiliation hint and
    /// falling back to the top result.
    async fn resolve_author_id(
        &self,
        client: &HttpClient,
        mailto: &str,
        name: &str,
    ) -> Result<Option<String>> {
        let url = format!("{}/authors", BASE_URL);
        let mut query = vec![("search", name), ("per-page", "25")];
        if !mailto.is_empty() {
            query.push(("mailto", mailto));
        }

        let response: AuthorsResponse = client.get_json(&self.id, &url, &query).await?;

        let hint = self.affiliation_hint.to_lowercase();
        for author in &response.results {
            let institution = author
                .last_known_institution
                .as_ref()
                .and_then(|i| i.display_name.as_deref())
                .unwrap_or_default()
                .to_lowercase();
            if institution.contains(&hint) {
                return Ok(author.id.clone());
            }
        }
        Ok(response.results.first().and_then(|a| a.id.clone()))
    }

    async fn fetch_works(
        &self,
        client: &HttpClient,
        mailto: &str,
        author_id: &str,
        opts: &FetchOptions,
    ) -> Result<Vec<Work>> {
        let url = format!("{}/works", BASE_URL);
        let filter = format!(
            "authorships.author.id:{},from_publication_date:{}",
            author_id, opts.from_date
        );
        let per_page = opts.max_papers.to_string();
        let mut query = vec![
            ("filter", filter.as_str()),
            ("sort", "publication_date:desc"),
            ("per-page", per_page.as_str()),
        ];
        if !mailto.is_empty() {
            query.push(("mailto", mailto));
        }

        let response: WorksResponse = client.get_json(&self.id, &url, &query).await?;
        Ok(response.results)
    }

    fn to_raw_paper(&self, work: Work, person: &PersonEntry) -> std::result::Result<RawPaper, String> {
        let title = work.display_name.unwrap_or_default();
        if title.trim().is_empty() {
            return Err(format!(
                "Work {} has no title",
                work.id.as_deref().unwrap_or("<unknown>")
            ));
        }

        let landing = work
            .primary_location
            .as_ref()
            .and_then(|loc| loc.landing_page_url.clone());
        let url = landing
            .or_else(|| work.id.clone())
            .ok_or_else(|| format!("Work '{}' has no URL", title))?;

        let venue = work
            .primary_location
            .as_ref()
            .and_then(|loc| loc.source.as_ref())
            .and_then(|s| s.display_name.clone());
        let first_author = work
            .authorships
            .first()
            .and_then(|a| a.author.as_ref())
            .and_then(|a| a.display_name.clone())
            .or_else(|| Some(person.name.clone()));

        Ok(RawPaper {
            source: self.id.clone(),
            title,
            url,
            venue,
            doi: work.doi,
            published: work.publication_date,
            year: work.publication_year,
            first_author,
            topics: person.topics.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> OpenAlexSource {
        OpenAlexSource::new(Path::new("data/people.json"))
    }

    fn person() -> PersonEntry {
        PersonEntry {
            name: "Ada Lovelace".into(),
            topics: vec!["nlp".into()],
            ids: PersonIds::default(),
        }
    }

    #[test]
    fn test_work_mapping_prefers_landing_page() {
        let work: Work = serde_json::from_str(
            r#"{
                "id": "https://openalex.org/W1",
                "display_name": "A Paper",
                "publication_date": "2026-02-01",
                "publication_year": 2026,
                "doi": "https://doi.org/10.1/x",
                "primary_location": {
                    "source": {"display_name": "NeurIPS"},
                    "landing_page_url": "https://example.org/paper"
                },
                "authorships": [{"author": {"display_name": "Ada Lovelace"}}]
            }"#,
        )
        .unwrap();

        let paper = source().to_raw_paper(work, &person()).unwrap();
        assert_eq!(paper.url, "https://example.org/paper");
        assert_eq!(paper.venue.as_deref(), Some("NeurIPS"));
        assert_eq!(paper.first_author.as_deref(), Some("Ada Lovelace"));
        assert_eq!(paper.topics, vec!["nlp".to_string()]);
    }

    #[test]
    fn test_work_without_title_is_rejected() {
        let work: Work = serde_json::from_str(r#"{"id": "https://openalex.org/W2"}"#).unwrap();
        assert!(source().to_raw_paper(work, &person()).is_err());
    }

    #[test]
    fn test_work_falls_back_to_openalex_id_url() {
        let work: Work = serde_json::from_str(
            r#"{"id": "https://openalex.org/W3", "display_name": "Untracked Venue Paper"}"#,
        )
        .unwrap();
        let paper = source().to_raw_paper(work, &person()).unwrap();
        assert_eq!(paper.url, "https://openalex.org/W3");
        // person supplies the author when authorships are missing
        assert_eq!(paper.first_author.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_missing_roster_is_source_unavailable() {
        let src = OpenAlexSource::new(Path::new("/nonexistent/people.json"));
        let err = src.load_people().unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { .. }));
    }
}
