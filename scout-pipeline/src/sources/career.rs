//! Career page adapter
//!
//! Covers the two page shapes the tracked sites use: Lever-hosted boards
//! (posting cards with a title heading and an apply link) and plain listing
//! pages where each match of an anchor selector is one posting. Candidates
//! are pre-filtered for relevance before they ever reach the normalizer so
//! a noisy careers portal cannot flood the snapshot.

use super::{FetchOutcome, RawJob, RawRecord, Skip};
use crate::client::HttpClient;
use scout_common::{Error, Result};
use scraper::{Html, Selector};
use url::Url;

/// Role/topic keywords a posting must mention to be considered at all
const INCLUDE_KEYWORDS: &[&str] = &[
    "research",
    "researcher",
    "scientist",
    "machine learning",
    "deep learning",
    "ai engineer",
    "ml engineer",
    "research engineer",
    "nlp",
    "natural language",
    "llm",
    "multimodal",
    "generative",
    "diffusion",
    "reinforcement learning",
    "rlhf",
    "preference learning",
    "tokenization",
    "foundation model",
    "computer vision",
];

/// Seniority/track keywords that disqualify a posting
const EXCLUDE_KEYWORDS: &[&str] = &[
    "lead",
    "manager",
    "head",
    "principal",
    "director",
    "architect",
    "vp",
    "senior vice",
    "consultant",
];

/// Hard exclusions: never relevant regardless of other signals
const EXCLUDE_HARD: &[&str] = &[
    "postdoc",
    "post-doctoral",
    "post doctoral",
    "phd required",
    "assistant professor",
    "associate professor",
    "professor",
    "faculty",
    "intern",
    "internship",
    "student",
];

const REMOTE_KEYWORDS: &[&str] = &[
    "remote",
    "hybrid",
    "flexible",
    "work from home",
    "wfh",
    "remote-friendly",
    "remote friendly",
];

/// True when the posting text passes the keyword filters.
pub fn is_relevant_job(title: &str, company: &str, location: &str, snippet: &str) -> bool {
    let text = format!("{} {} {} {}", title, company, location, snippet).to_lowercase();

    if EXCLUDE_HARD.iter().any(|k| text.contains(k)) {
        return false;
    }
    if !INCLUDE_KEYWORDS.iter().any(|k| text.contains(k)) {
        return false;
    }
    if EXCLUDE_KEYWORDS.iter().any(|k| text.contains(k)) {
        return false;
    }
    true
}

/// Topic keywords found in the given text, used to seed a job's tags.
pub fn matched_keywords(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    INCLUDE_KEYWORDS
        .iter()
        .copied()
        .filter(|k| lower.contains(k))
        .collect()
}

/// Detect remote/hybrid postings from the location line and snippet.
pub fn detect_remote(location: &str, snippet: &str) -> bool {
    let text = format!("{} {}", location, snippet).to_lowercase();
    REMOTE_KEYWORDS.iter().any(|k| text.contains(k))
}

/// Which parsing strategy a site needs
#[derive(Debug, Clone)]
pub enum PageStyle {
    /// Lever-hosted board: `div.posting` cards with an `h5` title
    Lever,
    /// Generic listing: every anchor matching the selector is one posting
    Anchors { selector: String },
}

/// One tracked career page
#[derive(Debug, Clone)]
pub struct CareerSite {
    pub id: String,
    pub company: String,
    pub url: String,
    pub style: PageStyle,
    /// Location to assume when the page does not state one per posting
    pub default_location: String,
}

impl CareerSite {
    pub async fn fetch(&self, client: &HttpClient) -> Result<FetchOutcome> {
        let body = client.get_text(&self.id, &self.url).await?;
        self.parse_page(&body)
    }

    /// Parse a fetched page into raw jobs plus per-item skips.
    ///
    /// Split from `fetch` so site parsing is testable against fixture HTML.
    pub fn parse_page(&self, body: &str) -> Result<FetchOutcome> {
        let document = Html::parse_document(body);
        let base = Url::parse(&self.url).map_err(|e| {
            Error::Config(format!("Bad base URL for source '{}': {}", self.id, e))
        })?;

        match &self.style {
            PageStyle::Lever => self.parse_lever(&document, &base),
            PageStyle::Anchors { selector } => self.parse_anchors(&document, &base, selector),
        }
    }

    fn parse_lever(&self, document: &Html, base: &Url) -> Result<FetchOutcome> {
        let posting_sel = parse_selector(&self.id, "div.posting")?;
        let title_sel = parse_selector(&self.id, "h5")?;
        let location_sel = parse_selector(&self.id, "span.sort-by-location")?;
        let link_sel = parse_selector(&self.id, "a.posting-btn-submit")?;

        let mut outcome = FetchOutcome::default();
        for posting in document.select(&posting_sel) {
            let title = posting
                .select(&title_sel)
                .next()
                .map(|el| collect_text(el))
                .unwrap_or_default();
            let href = posting
                .select(&link_sel)
                .next()
                .and_then(|el| el.value().attr("href").map(str::to_string));

            let Some(href) = href else {
                outcome.skipped.push(Skip {
                    source: self.id.clone(),
                    reason: format!("Posting '{}' has no apply link", title),
                });
                continue;
            };
            if title.is_empty() {
                outcome.skipped.push(Skip {
                    source: self.id.clone(),
                    reason: format!("Posting at {} has no title", href),
                });
                continue;
            }

            let location = posting
                .select(&location_sel)
                .next()
                .map(|el| collect_text(el))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| self.default_location.clone());

            self.push_if_relevant(&mut outcome, title, href, location, None, base);
        }
        Ok(outcome)
    }

    fn parse_anchors(&self, document: &Html, base: &Url, selector: &str) -> Result<FetchOutcome> {
        let anchor_sel = parse_selector(&self.id, selector)?;

        let mut outcome = FetchOutcome::default();
        for anchor in document.select(&anchor_sel) {
            let title = collect_text(anchor);
            let Some(href) = anchor.value().attr("href").map(str::to_string) else {
                outcome.skipped.push(Skip {
                    source: self.id.clone(),
                    reason: format!("Anchor '{}' has no href", title),
                });
                continue;
            };
            if title.is_empty() {
                // Image links and icons; not worth a skip entry each
                continue;
            }

            // Surrounding row text doubles as a filter snippet
            let snippet = anchor
                .parent()
                .and_then(scraper::ElementRef::wrap)
                .map(|parent| collect_text(parent));

            self.push_if_relevant(
                &mut outcome,
                title,
                href,
                self.default_location.clone(),
                snippet,
                base,
            );
        }
        Ok(outcome)
    }

    fn push_if_relevant(
        &self,
        outcome: &mut FetchOutcome,
        title: String,
        href: String,
        location: String,
        snippet: Option<String>,
        base: &Url,
    ) {
        let url = match base.join(&href) {
            Ok(url) => url.to_string(),
            Err(e) => {
                outcome.skipped.push(Skip {
                    source: self.id.clone(),
                    reason: format!("Unusable link '{}': {}", href, e),
                });
                return;
            }
        };

        let snippet_text = snippet.as_deref().unwrap_or("");
        if !is_relevant_job(&title, &self.company, &location, snippet_text) {
            return;
        }

        let remote = detect_remote(&location, snippet_text);
        outcome.raw.push(RawRecord::Job(RawJob {
            source: self.id.clone(),
            company: self.company.clone(),
            title,
            url,
            location: Some(location),
            snippet,
            remote,
        }));
    }
}

fn parse_selector(source: &str, raw: &str) -> Result<Selector> {
    Selector::parse(raw)
        .map_err(|e| Error::Config(format!("Bad selector '{}' for source '{}': {}", raw, source, e)))
}

fn collect_text(el: scraper::ElementRef<'_>) -> String {
    let joined = el.text().collect::<Vec<_>>().join(" ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The tracked career pages.
pub fn default_sites() -> Vec<CareerSite> {
    vec![
        CareerSite {
            id: "mistral".into(),
            company: "Mistral AI".into(),
            url: "https://jobs.lever.co/mistral".into(),
            style: PageStyle::Lever,
            default_location: "Paris".into(),
        },
        CareerSite {
            id: "astar".into(),
            company: "A*STAR".into(),
            url: "https://careers.a-star.edu.sg/JobListing.aspx".into(),
            style: PageStyle::Anchors {
                selector: "a[href*='JobDetails.aspx']".into(),
            },
            default_location: "Singapore".into(),
        },
        CareerSite {
            id: "ethz".into(),
            company: "ETH Zürich".into(),
            url: "https://jobs.ethz.ch".into(),
            style: PageStyle::Anchors {
                selector: "a[href*='/job/view/']".into(),
            },
            default_location: "Switzerland".into(),
        },
        CareerSite {
            id: "tno".into(),
            company: "TNO".into(),
            url: "https://www.tno.nl/en/career/vacancies/?q=machine%20learning".into(),
            style: PageStyle::Anchors {
                selector: "a[href*='/en/career/vacancies/']".into(),
            },
            default_location: "Netherlands".into(),
        },
        CareerSite {
            id: "stability".into(),
            company: "Stability AI".into(),
            url: "https://stability.ai/careers".into(),
            style: PageStyle::Anchors {
                selector: "a[href*='/careers/']".into(),
            },
            default_location: "Europe / Remote".into(),
        },
    ]
}
