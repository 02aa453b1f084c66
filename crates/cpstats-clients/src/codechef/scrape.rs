//! Fallback parsing of the public CodeChef profile page.
//!
//! Everything that depends on CodeChef's markup lives in a [`ParseStrategy`]
//! table. When the page changes, add a new strategy with a new version tag
//! rather than editing control flow.

use chrono::{DateTime, Utc};
use cpstats_core::{CodeChefProfile, Platform};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ProfileError;
use crate::stars::calculate_stars;

/// Selectors and text patterns for one revision of the profile page markup.
#[derive(Debug)]
pub struct ParseStrategy {
    /// Reported in logs and [`ProfileError::Parse`].
    pub version: &'static str,
    /// Present only on the "user not found" page.
    pub not_found: &'static str,
    /// Element whose text is the current rating.
    pub rating: &'static str,
    /// One element per star icon.
    pub star: &'static str,
    pub highest_rating_scope: &'static str,
    /// First capture group is the highest rating.
    pub highest_rating_pattern: &'static str,
    pub ranks_scope: &'static str,
    pub global_rank_pattern: &'static str,
    pub country_rank_pattern: &'static str,
}

pub const PROFILE_PAGE_V1: ParseStrategy = ParseStrategy {
    version: "codechef-profile-v1",
    not_found: ".user-not-found",
    rating: ".rating-number",
    star: ".rating-star",
    highest_rating_scope: ".rating-header .small",
    highest_rating_pattern: r"\(Highest Rating (\d+)",
    ranks_scope: ".rating-ranks",
    global_rank_pattern: r"Global Rank:\s*(\d+)",
    country_rank_pattern: r"Country Rank:\s*(\d+)",
};

/// A [`ParseStrategy`] with its selectors and patterns compiled, built once
/// per client and reused for every scrape.
#[derive(Debug)]
pub struct PageParser {
    strategy: &'static ParseStrategy,
    not_found: Selector,
    rating: Selector,
    star: Selector,
    highest_rating_scope: Selector,
    highest_rating: Regex,
    ranks_scope: Selector,
    global_rank: Regex,
    country_rank: Regex,
}

impl PageParser {
    /// # Errors
    ///
    /// Returns [`ProfileError::Parse`] if a selector or pattern in `strategy`
    /// does not compile.
    pub fn new(strategy: &'static ParseStrategy) -> Result<Self, ProfileError> {
        Ok(Self {
            strategy,
            not_found: selector(strategy, strategy.not_found)?,
            rating: selector(strategy, strategy.rating)?,
            star: selector(strategy, strategy.star)?,
            highest_rating_scope: selector(strategy, strategy.highest_rating_scope)?,
            highest_rating: pattern(strategy, strategy.highest_rating_pattern)?,
            ranks_scope: selector(strategy, strategy.ranks_scope)?,
            global_rank: pattern(strategy, strategy.global_rank_pattern)?,
            country_rank: pattern(strategy, strategy.country_rank_pattern)?,
        })
    }

    #[must_use]
    pub fn version(&self) -> &'static str {
        self.strategy.version
    }

    /// Parses a profile page into a verified [`CodeChefProfile`].
    ///
    /// Stars follow the rating tier when a rating is shown, otherwise the
    /// number of star icons. A missing "highest rating" line falls back to
    /// the current rating.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::NotFound`] if the not-found marker is present.
    /// - [`ProfileError::Parse`] if neither the rating nor the ranks block is
    ///   on the page.
    pub fn parse(
        &self,
        html: &str,
        username: &str,
        fetched_at: DateTime<Utc>,
    ) -> Result<CodeChefProfile, ProfileError> {
        let document = Html::parse_document(html);

        if document.select(&self.not_found).next().is_some() {
            return Err(ProfileError::NotFound {
                platform: Platform::CodeChef,
                username: username.to_owned(),
            });
        }

        let rating_el = document.select(&self.rating).next();
        let ranks_el = document.select(&self.ranks_scope).next();
        if rating_el.is_none() && ranks_el.is_none() {
            return Err(parse_error(
                self.strategy,
                "neither rating nor ranks markup found".to_owned(),
            ));
        }

        let rating = rating_el
            .and_then(|el| leading_int(&element_text(el)))
            .filter(|r| *r > 0);

        let star_icons = document.select(&self.star).count();
        let stars = rating.map_or_else(
            || u8::try_from(star_icons.min(7)).unwrap_or(7),
            calculate_stars,
        );

        let highest_text = document
            .select(&self.highest_rating_scope)
            .next()
            .map(element_text)
            .unwrap_or_default();
        let highest_rating = capture_int(&self.highest_rating, &highest_text).or(rating);

        let ranks_text = ranks_el.map(element_text).unwrap_or_default();
        let global_rank = capture_int(&self.global_rank, &ranks_text);
        let country_rank = capture_int(&self.country_rank, &ranks_text);

        Ok(CodeChefProfile {
            username: Some(username.to_owned()),
            stars,
            rating,
            highest_rating,
            global_rank,
            country_rank,
            last_updated: Some(fetched_at),
            verified: true,
        })
    }
}

/// One-off parse with a freshly compiled [`PageParser`].
///
/// # Errors
///
/// As for [`PageParser::new`] and [`PageParser::parse`].
pub fn parse_profile_page(
    html: &str,
    username: &str,
    strategy: &'static ParseStrategy,
    fetched_at: DateTime<Utc>,
) -> Result<CodeChefProfile, ProfileError> {
    PageParser::new(strategy)?.parse(html, username, fetched_at)
}

fn selector(strategy: &ParseStrategy, css: &str) -> Result<Selector, ProfileError> {
    Selector::parse(css).map_err(|e| parse_error(strategy, format!("selector {css:?}: {e}")))
}

fn pattern(strategy: &ParseStrategy, re: &str) -> Result<Regex, ProfileError> {
    Regex::new(re).map_err(|e| parse_error(strategy, format!("pattern {re:?}: {e}")))
}

fn capture_int(re: &Regex, text: &str) -> Option<i64> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

fn parse_error(strategy: &ParseStrategy, reason: String) -> ProfileError {
    ProfileError::Parse {
        platform: Platform::CodeChef,
        strategy: strategy.version,
        reason,
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_owned()
}

/// Integer prefix of `text`, e.g. `"1850?"` is 1850 and `"--"` is `None`.
fn leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let end = trimmed
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && *c == '-')))
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed[..end].parse().ok()
}

#[cfg(test)]
#[path = "scrape_test.rs"]
mod tests;
