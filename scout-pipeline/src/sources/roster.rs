//! Lab publication page adapter
//!
//! Crawls a lab's publications/roster page and keeps anchors that point at
//! papers (arXiv, DOI, or the lab's own publication pages). The lab name
//! stands in as the venue and the lab's topic list seeds the record's tags.

use super::{FetchOutcome, RawPaper, RawRecord, Skip};
use crate::client::HttpClient;
use scout_common::{Error, Result};
use scraper::{Html, Selector};
use url::Url;

/// Href fragments that mark an anchor as a paper link
const PAPER_HREF_HINTS: &[&str] = &["arxiv.org", "doi.org", "/pubs/", "/publications/", "/paper"];

/// Anchor text shorter than this is navigation chrome, not a paper title
const MIN_TITLE_LEN: usize = 20;

/// One tracked lab page
#[derive(Debug, Clone)]
pub struct LabRoster {
    pub id: String,
    pub name: String,
    pub url: String,
    pub topics: Vec<String>,
}

impl LabRoster {
    pub async fn fetch(&self, client: &HttpClient) -> Result<FetchOutcome> {
        let body = client.get_text(&self.id, &self.url).await?;
        self.parse_page(&body)
    }

    pub fn parse_page(&self, body: &str) -> Result<FetchOutcome> {
        let document = Html::parse_document(body);
        let base = Url::parse(&self.url).map_err(|e| {
            Error::Config(format!("Bad base URL for source '{}': {}", self.id, e))
        })?;
        let anchor_sel = Selector::parse("a[href]").map_err(|e| {
            Error::Config(format!("Bad selector for source '{}': {}", self.id, e))
        })?;

        let mut outcome = FetchOutcome::default();
        for anchor in document.select(&anchor_sel) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let href_lower = href.to_lowercase();
            if !PAPER_HREF_HINTS.iter().any(|hint| href_lower.contains(hint)) {
                continue;
            }

            let title = anchor
                .text()
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            if title.len() < MIN_TITLE_LEN {
                continue;
            }

            let url = match base.join(href) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    outcome.skipped.push(Skip {
                        source: self.id.clone(),
                        reason: format!("Unusable paper link '{}': {}", href, e),
                    });
                    continue;
                }
            };

            outcome.raw.push(RawRecord::Paper(RawPaper {
                source: self.id.clone(),
                title,
                url,
                venue: Some(self.name.clone()),
                doi: None,
                published: None,
                year: None,
                first_author: None,
                topics: self.topics.clone(),
            }));
        }
        Ok(outcome)
    }
}

/// The tracked Stanford lab pages.
pub fn default_rosters() -> Vec<LabRoster> {
    vec![
        LabRoster {
            id: "sail".into(),
            name: "Stanford AI Lab (SAIL)".into(),
            url: "https://ai.stanford.edu/people/".into(),
            topics: vec![
                "robotics".into(),
                "computer vision".into(),
                "nlp".into(),
                "multimodal".into(),
            ],
        },
        LabRoster {
            id: "stanford-nlp".into(),
            name: "Stanford NLP Group".into(),
            url: "https://nlp.stanford.edu/people/".into(),
            topics: vec!["nlp".into(), "llm".into(), "rlhf".into()],
        },
        LabRoster {
            id: "crfm".into(),
            name: "Center for Research on Foundation Models (CRFM)".into(),
            url: "https://crfm.stanford.edu/people.html".into(),
            topics: vec![
                "foundation model".into(),
                "preference learning".into(),
                "tokenization".into(),
            ],
        },
    ]
}
