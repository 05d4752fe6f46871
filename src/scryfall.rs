//! Scryfall API client for resolving a card's printing history
//!
//! Uses async reqwest for non-blocking HTTP requests. A lookup is two steps:
//! the exact-name card endpoint, then the card's `prints_search_uri`.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Response, StatusCode};
use serde::Deserialize;

use crate::config::ScryfallConfig;
use crate::error::Result;
use crate::models::{PrintRecord, ResolvedCard};
use crate::resolver::{LookupError, PrintResolver};

/// Stop following `next_page` after this many pages
const MAX_PRINT_PAGES: usize = 20;

/// Scryfall card response (only the fields needed here)
#[derive(Debug, Deserialize)]
pub struct ScryfallCard {
    pub name: String,
    #[serde(default)]
    pub prints_search_uri: Option<String>,
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub set_name: Option<String>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    /// For double-faced cards, images are in card_faces
    #[serde(default)]
    pub card_faces: Option<Vec<CardFace>>,
}

#[derive(Debug, Deserialize)]
pub struct ImageUris {
    pub normal: Option<String>,
    pub large: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CardFace {
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

/// One entry of a prints search page
#[derive(Debug, Deserialize)]
pub struct ScryfallPrint {
    pub set: String,
    pub set_name: String,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    #[serde(default)]
    pub card_faces: Option<Vec<CardFace>>,
}

/// Paginated list response
#[derive(Debug, Deserialize)]
pub struct PrintsPage {
    pub data: Vec<ScryfallPrint>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page: Option<String>,
}

/// Scryfall API error response
#[derive(Debug, Deserialize)]
pub struct ScryfallError {
    pub code: String,
    pub details: String,
}

impl ImageUris {
    /// Normal resolution, falling back to large
    fn preferred(&self) -> Option<&str> {
        self.normal.as_deref().or(self.large.as_deref())
    }
}

fn preferred_image<'a>(
    image_uris: &'a Option<ImageUris>,
    card_faces: &'a Option<Vec<CardFace>>,
) -> Option<&'a str> {
    // Try direct image_uris first
    if let Some(url) = image_uris.as_ref().and_then(ImageUris::preferred) {
        return Some(url);
    }
    // For double-faced cards, use the front face
    card_faces
        .as_ref()
        .and_then(|faces| faces.first())
        .and_then(|face| face.image_uris.as_ref())
        .and_then(ImageUris::preferred)
}

impl ScryfallCard {
    pub fn image_url(&self) -> Option<&str> {
        preferred_image(&self.image_uris, &self.card_faces)
    }

    /// The card's own printing, used when it carries no prints search link
    fn own_print(&self) -> Option<PrintRecord> {
        let set = self.set.as_deref()?;
        let set_name = self.set_name.as_deref().unwrap_or(set);
        Some(PrintRecord {
            set_code: set.to_string(),
            set_name: set_name.to_string(),
            image_url: self.image_url().map(str::to_string),
        })
    }
}

impl ScryfallPrint {
    pub fn image_url(&self) -> Option<&str> {
        preferred_image(&self.image_uris, &self.card_faces)
    }

    pub fn to_record(&self) -> PrintRecord {
        PrintRecord {
            set_code: self.set.clone(),
            set_name: self.set_name.clone(),
            image_url: self.image_url().map(str::to_string),
        }
    }
}

/// Turn a non-success response into a lookup error
async fn error_from_response(response: Response) -> LookupError {
    let status = response.status();
    match response.json::<ScryfallError>().await {
        Ok(error) => LookupError::Api {
            code: error.code,
            details: error.details,
        },
        Err(_) => LookupError::HttpStatus(status),
    }
}

/// Print resolver backed by the Scryfall REST API
#[derive(Debug, Clone)]
pub struct ScryfallClient {
    client: reqwest::Client,
    base_url: String,
}

impl ScryfallClient {
    pub fn new(config: &ScryfallConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, url: &str) -> std::result::Result<Response, LookupError> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        Ok(response)
    }

    /// Fetch a card from Scryfall by exact name
    pub async fn fetch_card_by_name(
        &self,
        name: &str,
    ) -> std::result::Result<ScryfallCard, LookupError> {
        let url = format!(
            "{}/cards/named?exact={}",
            self.base_url,
            urlencoding::encode(name)
        );

        let response = self.get(&url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound {
                name: name.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response.json::<ScryfallCard>().await?)
    }

    /// Fetch every printing of a card, following pagination
    pub async fn fetch_prints(
        &self,
        card: &ScryfallCard,
    ) -> std::result::Result<Vec<PrintRecord>, LookupError> {
        let Some(first_page) = card.prints_search_uri.as_deref() else {
            return Ok(card.own_print().into_iter().collect());
        };

        let mut records = Vec::new();
        let mut next = Some(first_page.to_string());
        let mut pages = 0;

        while let Some(url) = next.take() {
            if pages == MAX_PRINT_PAGES {
                log::warn!(
                    "Stopping after {} pages of prints for {}",
                    MAX_PRINT_PAGES,
                    card.name
                );
                break;
            }
            pages += 1;

            let response = self.get(&url).await?;
            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }

            let page: PrintsPage = response.json().await?;
            records.extend(page.data.iter().map(ScryfallPrint::to_record));
            if page.has_more {
                next = page.next_page;
            }
        }

        log::debug!("{} has {} printings", card.name, records.len());
        Ok(records)
    }
}

#[async_trait]
impl PrintResolver for ScryfallClient {
    async fn resolve(
        &self,
        card_name: &str,
    ) -> std::result::Result<ResolvedCard, LookupError> {
        let card = self.fetch_card_by_name(card_name).await?;
        let prints = self.fetch_prints(&card).await?;
        Ok(ResolvedCard {
            name: card.name,
            prints,
        })
    }
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
