//! Motivational quotes from Quotable, with a local list when the service is unavailable.

use rand::seq::IndexedRandom;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::DashboardError, model::Quote};

const SERVICE: &str = "quotable";

/// Never empty, so the fallback path always has an answer.
pub const FALLBACK_QUOTES: &[(&str, &str)] = &[
    ("The only way to do great work is to love what you do.", "Steve Jobs"),
    ("Innovation distinguishes between a leader and a follower.", "Steve Jobs"),
    ("Stay hungry, stay foolish.", "Steve Jobs"),
    (
        "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        "Winston Churchill",
    ),
    ("Believe you can and you're halfway there.", "Theodore Roosevelt"),
];

#[derive(Debug, Deserialize)]
struct QuotableResponse {
    content: String,
    author: String,
}

#[derive(Debug, Clone)]
pub struct QuoteService {
    base_url: String,
    http: Client,
}

impl QuoteService {
    pub fn new(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// A random inspirational quote. Upstream problems are logged and answered locally.
    pub async fn random(&self) -> Quote {
        match self.fetch_upstream().await {
            Ok(quote) => quote,
            Err(err) => {
                tracing::warn!(error = %err, "Quote API failed, using fallback quotes");
                fallback_quote()
            }
        }
    }

    async fn fetch_upstream(&self) -> Result<Quote, DashboardError> {
        let url = format!("{}/random", self.base_url);
        tracing::debug!(%url, "Fetching random motivational quote");

        let res = self
            .http
            .get(&url)
            .query(&[("tags", "inspirational")])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(DashboardError::Upstream {
                service: SERVICE,
                status: Some(status.as_u16()),
                body: String::new(),
            });
        }

        let body = res.text().await?;
        let parsed: QuotableResponse = serde_json::from_str(&body)
            .map_err(|source| DashboardError::Decode { service: SERVICE, source })?;

        Ok(Quote {
            quote: parsed.content,
            author: parsed.author,
        })
    }
}

pub fn fallback_quote() -> Quote {
    let (quote, author) = FALLBACK_QUOTES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(FALLBACK_QUOTES[0]);

    Quote {
        quote: quote.to_string(),
        author: author.to_string(),
    }
}
