//! Source adapters: one module per external data origin
//!
//! The set of sources is fixed and known, so adapters are a tagged enum
//! rather than a pluggable trait registry. Each adapter produces raw
//! candidate records in its own shape plus a list of per-item skips; only
//! total unavailability of a source propagates as an error.

pub mod career;
pub mod openalex;
pub mod roster;

use crate::client::HttpClient;
use chrono::NaiveDate;
use scout_common::Result;
use serde::Serialize;
use std::path::Path;

/// A raw item the adapter could not turn into a candidate record
#[derive(Debug, Clone, Serialize)]
pub struct Skip {
    pub source: String,
    pub reason: String,
}

/// Raw job posting as scraped from a career page
#[derive(Debug, Clone)]
pub struct RawJob {
    pub source: String,
    pub company: String,
    pub title: String,
    pub url: String,
    pub location: Option<String>,
    pub snippet: Option<String>,
    pub remote: bool,
}

/// Raw paper as returned by OpenAlex or extracted from a lab page
#[derive(Debug, Clone)]
pub struct RawPaper {
    pub source: String,
    pub title: String,
    pub url: String,
    pub venue: Option<String>,
    pub doi: Option<String>,
    pub published: Option<String>,
    pub year: Option<i32>,
    pub first_author: Option<String>,
    pub topics: Vec<String>,
}

/// Tagged union over the known raw shapes, feeding one normalizer arm per kind
#[derive(Debug, Clone)]
pub enum RawRecord {
    Job(RawJob),
    Paper(RawPaper),
}

impl RawRecord {
    pub fn source(&self) -> &str {
        match self {
            RawRecord::Job(j) => &j.source,
            RawRecord::Paper(p) => &p.source,
        }
    }
}

/// What one adapter produced for this run
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub raw: Vec<RawRecord>,
    pub skipped: Vec<Skip>,
}

/// Run-level knobs shared by all adapters
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Only include papers published on or after this date
    pub from_date: NaiveDate,
    /// Cap on papers fetched per author
    pub max_papers: usize,
}

/// One configured external source
#[derive(Debug, Clone)]
pub enum SourceConfig {
    Career(career::CareerSite),
    OpenAlex(openalex::OpenAlexSource),
    Roster(roster::LabRoster),
}

impl SourceConfig {
    /// Stable adapter identifier, recorded on every record it produces
    pub fn id(&self) -> &str {
        match self {
            SourceConfig::Career(site) => &site.id,
            SourceConfig::OpenAlex(src) => &src.id,
            SourceConfig::Roster(lab) => &lab.id,
        }
    }

    /// Fetch all candidate records from this source.
    pub async fn fetch(&self, client: &HttpClient, opts: &FetchOptions) -> Result<FetchOutcome> {
        match self {
            SourceConfig::Career(site) => site.fetch(client).await,
            SourceConfig::OpenAlex(src) => src.fetch(client, opts).await,
            SourceConfig::Roster(lab) => lab.fetch(client).await,
        }
    }
}

/// The full fixed source set: career pages, OpenAlex works for the people
/// roster, and lab publication pages.
pub fn default_sources(people_json: &Path) -> Vec<SourceConfig> {
    let mut sources: Vec<SourceConfig> = career::default_sites()
        .into_iter()
        .map(SourceConfig::Career)
        .collect();
    sources.push(SourceConfig::OpenAlex(openalex::OpenAlexSource::new(
        people_json,
    )));
    sources.extend(
        roster::default_rosters()
            .into_iter()
            .map(SourceConfig::Roster),
    );
    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources_have_unique_ids() {
        let sources = default_sources(Path::new("data/people.json"));
        let mut ids: Vec<&str> = sources.iter().map(|s| s.id()).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
        assert!(before >= 3);
    }
}
