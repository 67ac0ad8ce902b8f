//! GraphQL Catalog Client
//!
//! Posts the characters and single-character queries to a GraphQL
//! endpoint over HTTP. Transport failures, non-success statuses, and
//! GraphQL error payloads all surface as `DomainError::Remote`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::client::{CatalogClient, CharacterPage, PageRequest};
use crate::domain::{Character, DomainError, DomainResult};

/// Characters page query; unset filter fields are simply absent
const CHARACTERS_QUERY: &str = "\
query Characters($page: Int, $filter: FilterCharacter) {
  characters(page: $page, filter: $filter) {
    info { next }
    results {
      id
      name
      status
      species
      type
      gender
      origin { name url }
      location { name url }
      image
    }
  }
}";

/// Single-character query for the detail view
const CHARACTER_QUERY: &str = "\
query Character($id: ID!) {
  character(id: $id) {
    id
    name
    status
    species
    type
    gender
    origin { name url }
    location { name url }
    image
  }
}";

/// HTTP GraphQL implementation of the catalog boundary
pub struct GraphQlCatalog {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphQlCatalog {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    async fn post(&self, query: &str, variables: Value) -> DomainResult<Value> {
        let body = json!({ "query": query, "variables": variables });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Remote(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DomainError::Remote(format!(
                "catalog returned HTTP {}",
                response.status()
            )));
        }

        let envelope: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Remote(e.to_string()))?;

        if let Some(first) = envelope.errors.and_then(|mut e| e.drain(..).next()) {
            return Err(DomainError::Remote(first.message));
        }

        envelope
            .data
            .ok_or_else(|| DomainError::Remote("catalog response had no data".to_string()))
    }
}

#[async_trait]
impl CatalogClient for GraphQlCatalog {
    async fn fetch_page(&self, request: &PageRequest) -> DomainResult<CharacterPage> {
        log::debug!("fetching page {} with filter {:?}", request.page, request.filter);
        let variables = json!({ "page": request.page, "filter": request.filter });
        let data = self.post(CHARACTERS_QUERY, variables).await?;
        decode_page(data)
    }

    async fn fetch_character(&self, id: &str) -> DomainResult<Option<Character>> {
        log::debug!("fetching character {}", id);
        let data = self.post(CHARACTER_QUERY, json!({ "id": id })).await?;
        decode_character(data)
    }
}

// ========================
// Response decoding
// ========================

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct CharactersData {
    characters: CharactersConnection,
}

#[derive(Deserialize)]
struct CharactersConnection {
    #[serde(default)]
    info: PageInfo,
    #[serde(default)]
    results: Vec<Character>,
}

#[derive(Deserialize, Default)]
struct PageInfo {
    next: Option<u32>,
}

#[derive(Deserialize)]
struct CharacterData {
    character: Option<Character>,
}

fn decode_page(data: Value) -> DomainResult<CharacterPage> {
    let decoded: CharactersData = serde_json::from_value(data)
        .map_err(|e| DomainError::Remote(format!("decode characters page: {}", e)))?;

    Ok(CharacterPage {
        results: decoded.characters.results,
        has_next: decoded.characters.info.next.is_some(),
    })
}

fn decode_character(data: Value) -> DomainResult<Option<Character>> {
    let decoded: CharacterData = serde_json::from_value(data)
        .map_err(|e| DomainError::Remote(format!("decode character: {}", e)))?;

    Ok(decoded.character)
}
