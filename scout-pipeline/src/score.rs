//! Scorer: deterministic, explainable relevance scoring
//!
//! A pure function of the record's fields and a fixed rule table. No hidden
//! state and no wall-clock dependence beyond the recency term, which takes
//! `today` as an argument so identical input always produces identical
//! output. Every signal is additive with non-negative weight, so the score
//! is monotonic in each: adding a matching keyword never lowers it, and
//! dropping the date never raises it.

use chrono::NaiveDate;
use scout_common::{Error, Record, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Weight table driving the scorer.
///
/// Loadable from a TOML file; the defaults encode the role/topic weights
/// the pipeline shipped with.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoreRules {
    /// Keyword -> weight, matched against lower-cased title and tags
    pub keywords: BTreeMap<String, f64>,
    /// Full boost for a record published today, fading to zero at the horizon
    pub recency_weight: f64,
    /// Age in days at which the recency boost reaches zero
    pub recency_horizon_days: u32,
    /// Bonus for carrying a publication/posting date at all
    pub date_bonus: f64,
    /// Bonus for a populated location
    pub location_bonus: f64,
    /// Bonus for remote-friendly postings
    pub remote_bonus: f64,
}

impl Default for ScoreRules {
    fn default() -> Self {
        let keywords = [
            ("multimodal", 10.0),
            ("large language model", 9.0),
            ("llm", 9.0),
            ("research engineer", 10.0),
            ("research scientist", 8.0),
            ("applied scientist", 8.0),
            ("foundation model", 8.0),
            ("agent", 8.0),
            ("rlhf", 8.0),
            ("reinforcement learning", 8.0),
            ("generative", 8.0),
            ("diffusion", 7.0),
            ("preference learning", 7.0),
            ("tokenization", 6.0),
            ("computer vision", 6.0),
            ("robotics", 6.0),
            ("embodied", 6.0),
            ("nlp", 6.0),
            ("simulation", 5.0),
            ("engineer", 3.0),
        ]
        .into_iter()
        .map(|(k, w)| (k.to_string(), w))
        .collect();

        Self {
            keywords,
            recency_weight: 6.0,
            recency_horizon_days: 180,
            date_bonus: 1.0,
            location_bonus: 0.5,
            remote_bonus: 2.0,
        }
    }
}

impl ScoreRules {
    /// Load rules from a TOML file, rejecting negative weights up front so
    /// monotonicity cannot be configured away by accident.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read rules file {}: {}", path.display(), e)))?;
        let rules: ScoreRules = toml::from_str(&data)
            .map_err(|e| Error::Config(format!("Bad rules file {}: {}", path.display(), e)))?;
        rules.validate()?;
        Ok(rules)
    }

    fn validate(&self) -> Result<()> {
        if let Some((k, w)) = self.keywords.iter().find(|(_, w)| **w < 0.0) {
            return Err(Error::Config(format!(
                "Keyword weight for '{}' is negative ({})",
                k, w
            )));
        }
        for (name, value) in [
            ("recency_weight", self.recency_weight),
            ("date_bonus", self.date_bonus),
            ("location_bonus", self.location_bonus),
            ("remote_bonus", self.remote_bonus),
        ] {
            if value < 0.0 {
                return Err(Error::Config(format!("{} is negative ({})", name, value)));
            }
        }
        Ok(())
    }

    /// Score one record relative to `today`.
    pub fn score(&self, record: &Record, today: NaiveDate) -> f64 {
        let title = record.title.to_lowercase();
        let mut total = 0.0;

        for (keyword, weight) in &self.keywords {
            if title.contains(keyword) || record.tags.contains(keyword) {
                total += weight;
            }
        }

        if let Some(date) = record.published_or_posted_date {
            total += self.date_bonus;
            let age_days = today.signed_duration_since(date).num_days().max(0) as f64;
            let horizon = f64::from(self.recency_horizon_days).max(1.0);
            let fraction = (1.0 - age_days / horizon).clamp(0.0, 1.0);
            total += self.recency_weight * fraction;
        }

        if record.location.is_some() {
            total += self.location_bonus;
        }
        if record.remote {
            total += self.remote_bonus;
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scout_common::RecordKind;
    use std::collections::BTreeSet;

    fn record() -> Record {
        let now = Utc::now();
        Record {
            id: "acme-ml-engineer".into(),
            kind: RecordKind::Job,
            title: "ML Engineer".into(),
            organization_or_venue: "Acme".into(),
            url: "https://acme.example/jobs/1".into(),
            published_or_posted_date: None,
            location: None,
            remote: false,
            tags: BTreeSet::new(),
            score: None,
            first_seen_at: now,
            last_seen_at: now,
            removed_at: None,
            source: "acme".into(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 24).unwrap()
    }

    #[test]
    fn test_adding_matching_keyword_never_decreases_score() {
        let rules = ScoreRules::default();
        let base = record();
        let without = rules.score(&base, today());

        let mut with = base.clone();
        with.tags.insert("multimodal".into());
        assert!(rules.score(&with, today()) >= without);
    }

    #[test]
    fn test_recent_date_beats_no_date() {
        let rules = ScoreRules::default();
        let base = record();
        let undated = rules.score(&base, today());

        let mut dated = base.clone();
        dated.published_or_posted_date = NaiveDate::from_ymd_opt(2026, 8, 20);
        assert!(rules.score(&dated, today()) > undated);
    }

    #[test]
    fn test_recency_decays_with_age() {
        let rules = ScoreRules::default();
        let mut fresh = record();
        fresh.published_or_posted_date = NaiveDate::from_ymd_opt(2026, 8, 20);
        let mut stale = record();
        stale.published_or_posted_date = NaiveDate::from_ymd_opt(2025, 1, 1);

        assert!(rules.score(&fresh, today()) > rules.score(&stale, today()));
        // past the horizon the boost bottoms out at the date bonus alone
        let mut ancient = record();
        ancient.published_or_posted_date = NaiveDate::from_ymd_opt(2020, 1, 1);
        assert_eq!(
            rules.score(&stale, today()),
            rules.score(&ancient, today())
        );
    }

    #[test]
    fn test_future_date_clamps_to_full_boost() {
        let rules = ScoreRules::default();
        let mut future = record();
        future.published_or_posted_date = NaiveDate::from_ymd_opt(2026, 12, 1);
        let mut today_dated = record();
        today_dated.published_or_posted_date = Some(today());
        assert_eq!(
            rules.score(&future, today()),
            rules.score(&today_dated, today())
        );
    }

    #[test]
    fn test_deterministic_across_calls() {
        let rules = ScoreRules::default();
        let mut r = record();
        r.tags.insert("rlhf".into());
        r.remote = true;
        let a = rules.score(&r, today());
        let b = rules.score(&r, today());
        assert_eq!(a, b);
    }

    #[test]
    fn test_title_keywords_counted() {
        let rules = ScoreRules::default();
        let mut r = record();
        r.title = "Research Engineer, Multimodal Generation".into();
        // "research engineer" + "engineer" + "multimodal" all hit
        assert!(rules.score(&r, today()) >= 23.0);
    }

    #[test]
    fn test_negative_weights_rejected() {
        let mut rules = ScoreRules::default();
        rules.keywords.insert("spam".into(), -5.0);
        assert!(rules.validate().is_err());
    }
}
