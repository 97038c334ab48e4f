//! Events exchanged with the user interface
//!
//! [`Event`]s flow from the UI into the engine, [`Response`]s flow back.
//! Both serialize as internally tagged JSON objects, e.g.
//! `{"event": "load_continent", "id": 1}`.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use crate::record::{Continent, Country, Region};
use crate::storage::Entity;

/// An intent sent by the user interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    QuitInitiated,
    OpenDatabase { path: PathBuf },
    CloseDatabase,

    StartContinentSearch { name: Option<String>, code: Option<String> },
    LoadContinent { id: i64 },
    SaveNewContinent { continent: Continent },
    SaveContinent { continent: Continent },

    StartCountrySearch { name: Option<String>, code: Option<String> },
    LoadCountry { id: i64 },
    SaveNewCountry { country: Country },
    SaveCountry { country: Country },

    StartRegionSearch {
        name: Option<String>,
        region_code: Option<String>,
        local_code: Option<String>,
    },
    LoadRegion { id: i64 },
    SaveNewRegion { region: Region },
    SaveRegion { region: Region },
}

/// A response sent back to the user interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Response {
    EndApplication,
    DatabaseOpened { path: PathBuf },
    DatabaseOpenFailed { message: String },
    DatabaseClosed,

    ContinentSearchResult { continent: Continent },
    ContinentLoaded { continent: Continent },
    ContinentLoadFailed { message: String },
    ContinentSaved { continent: Continent },
    SaveContinentFailed { message: String },

    CountrySearchResult { country: Country },
    CountryLoaded { country: Country },
    CountryLoadFailed { message: String },
    CountrySaved { country: Country },
    SaveCountryFailed { message: String },

    RegionSearchResult { region: Region },
    RegionLoaded { region: Region },
    RegionLoadFailed { message: String },
    RegionSaved { region: Region },
    SaveRegionFailed { message: String },

    Error { message: String },
}

impl Response {
    /// Generic application error
    pub fn error(err: &crate::Error) -> Self {
        Response::Error { message: err.to_string() }
    }

    /// True for failure responses of any kind
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Response::DatabaseOpenFailed { .. }
                | Response::ContinentLoadFailed { .. }
                | Response::SaveContinentFailed { .. }
                | Response::CountryLoadFailed { .. }
                | Response::SaveCountryFailed { .. }
                | Response::RegionLoadFailed { .. }
                | Response::SaveRegionFailed { .. }
                | Response::Error { .. }
        )
    }
}

/// Per-record constructors for the responses the engine emits.
pub trait EntityResponses: Entity {
    fn search_result(self) -> Response;
    fn loaded(self) -> Response;
    fn load_failed(message: String) -> Response;
    fn saved(self) -> Response;
    fn save_failed(message: String) -> Response;
}

impl EntityResponses for Continent {
    fn search_result(self) -> Response {
        Response::ContinentSearchResult { continent: self }
    }

    fn loaded(self) -> Response {
        Response::ContinentLoaded { continent: self }
    }

    fn load_failed(message: String) -> Response {
        Response::ContinentLoadFailed { message }
    }

    fn saved(self) -> Response {
        Response::ContinentSaved { continent: self }
    }

    fn save_failed(message: String) -> Response {
        Response::SaveContinentFailed { message }
    }
}

impl EntityResponses for Country {
    fn search_result(self) -> Response {
        Response::CountrySearchResult { country: self }
    }

    fn loaded(self) -> Response {
        Response::CountryLoaded { country: self }
    }

    fn load_failed(message: String) -> Response {
        Response::CountryLoadFailed { message }
    }

    fn saved(self) -> Response {
        Response::CountrySaved { country: self }
    }

    fn save_failed(message: String) -> Response {
        Response::SaveCountryFailed { message }
    }
}

impl EntityResponses for Region {
    fn search_result(self) -> Response {
        Response::RegionSearchResult { region: self }
    }

    fn loaded(self) -> Response {
        Response::RegionLoaded { region: self }
    }

    fn load_failed(message: String) -> Response {
        Response::RegionLoadFailed { message }
    }

    fn saved(self) -> Response {
        Response::RegionSaved { region: self }
    }

    fn save_failed(message: String) -> Response {
        Response::SaveRegionFailed { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let event: Event =
            serde_json::from_str(r#"{"event": "start_continent_search", "code": "AS"}"#).unwrap();
        assert_eq!(event, Event::StartContinentSearch { name: None, code: Some("AS".into()) });

        let event: Event = serde_json::from_str(
            r#"{"event": "save_new_continent", "continent": {"code": "AS", "name": "Asia"}}"#,
        )
        .unwrap();
        assert_eq!(event, Event::SaveNewContinent { continent: Continent::new("AS", "Asia") });
    }

    #[test]
    fn test_response_wire_format() {
        let json = serde_json::to_value(Response::DatabaseClosed).unwrap();
        assert_eq!(json, serde_json::json!({ "event": "database_closed" }));

        let json = serde_json::to_value(Response::SaveRegionFailed { message: "nope".into() }).unwrap();
        assert_eq!(json["event"], "save_region_failed");
    }

    #[test]
    fn test_failure_classification() {
        assert!(Response::Error { message: String::new() }.is_failure());
        assert!(Country::load_failed("gone".into()).is_failure());
        assert!(!Country::default().loaded().is_failure());
    }
}
