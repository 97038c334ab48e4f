//! Record types - the three kinds of reference data
//!
//! Every record is a fixed-shape struct whose fields are all optional, so a
//! record coming from the UI can carry unknown values (most commonly the id of
//! a record that has not been created yet).
//! - `Continent`: top-level grouping
//! - `Country`: belongs to a continent
//! - `Region`: belongs to a continent and a country

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The kinds of record the engine manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Continent,
    Country,
    Region,
}

impl EntityKind {
    /// Get the string representation of the entity kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Continent => "continent",
            EntityKind::Country => "country",
            EntityKind::Region => "region",
        }
    }

    /// Get all entity kinds
    pub fn all() -> &'static [EntityKind] {
        &[EntityKind::Continent, EntityKind::Country, EntityKind::Region]
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "continent" | "continents" => Ok(EntityKind::Continent),
            "country" | "countries" => Ok(EntityKind::Country),
            "region" | "regions" => Ok(EntityKind::Region),
            _ => Err(Error::UnknownEntity(s.to_string())),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A continent, e.g. `{ code: "AS", name: "Asia" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continent {
    pub id: Option<i64>,
    pub code: Option<String>,
    pub name: Option<String>,
}

impl Continent {
    /// Create a continent that has not been assigned an id yet
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            code: Some(code.into()),
            name: Some(name.into()),
        }
    }
}

/// A country and the continent it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: Option<i64>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub continent_id: Option<i64>,
    pub wikipedia_link: Option<String>,
    pub keywords: Option<String>,
}

impl Country {
    /// Create a country that has not been assigned an id yet
    pub fn new(code: impl Into<String>, name: impl Into<String>, continent_id: i64) -> Self {
        Self {
            id: None,
            code: Some(code.into()),
            name: Some(name.into()),
            continent_id: Some(continent_id),
            wikipedia_link: None,
            keywords: None,
        }
    }

    /// Set the wikipedia link
    pub fn with_wikipedia_link(mut self, link: impl Into<String>) -> Self {
        self.wikipedia_link = Some(link.into());
        self
    }

    /// Set the search keywords
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }
}

/// A region within a country.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: Option<i64>,
    pub region_code: Option<String>,
    pub local_code: Option<String>,
    pub name: Option<String>,
    pub continent_id: Option<i64>,
    pub country_id: Option<i64>,
    pub wikipedia_link: Option<String>,
    pub keywords: Option<String>,
}

impl Region {
    /// Create a region that has not been assigned an id yet
    pub fn new(
        region_code: impl Into<String>,
        local_code: impl Into<String>,
        name: impl Into<String>,
        continent_id: i64,
        country_id: i64,
    ) -> Self {
        Self {
            id: None,
            region_code: Some(region_code.into()),
            local_code: Some(local_code.into()),
            name: Some(name.into()),
            continent_id: Some(continent_id),
            country_id: Some(country_id),
            wikipedia_link: None,
            keywords: None,
        }
    }

    /// Set the wikipedia link
    pub fn with_wikipedia_link(mut self, link: impl Into<String>) -> Self {
        self.wikipedia_link = Some(link.into());
        self
    }

    /// Set the search keywords
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }
}

/// Empty optional text is stored as NULL.
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_roundtrip() {
        for kind in EntityKind::all() {
            let parsed: EntityKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_entity_kind_aliases() {
        assert_eq!(EntityKind::from_str("Countries").unwrap(), EntityKind::Country);
        assert!(matches!(
            EntityKind::from_str("airport"),
            Err(Error::UnknownEntity(name)) if name == "airport"
        ));
    }

    #[test]
    fn test_blank_to_none() {
        assert_eq!(blank_to_none(Some(String::new())), None);
        assert_eq!(blank_to_none(Some("alps".into())), Some("alps".to_string()));
        assert_eq!(blank_to_none(None), None);
    }

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let country: Country =
            serde_json::from_str(r#"{"code": "NP", "name": "Nepal", "continent_id": 1}"#).unwrap();
        assert_eq!(country.id, None);
        assert_eq!(country.continent_id, Some(1));
        assert_eq!(country.keywords, None);
    }
}
