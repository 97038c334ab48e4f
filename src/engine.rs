//! The engine: turns UI events into storage operations and responses
//!
//! The engine holds at most one open [`Database`]. Every inbound [`Event`]
//! is handled to completion, including draining a whole search, before
//! [`Engine::process`] returns the responses it produced.

use std::path::PathBuf;
use crate::event::{EntityResponses, Event, Response};
use crate::record::{Continent, Country, Region};
use crate::storage::{Database, SearchFilter};
use crate::{Error, Result};

/// Event-driven data-access engine
#[derive(Default)]
pub struct Engine {
    db: Option<Database>,
}

impl Engine {
    /// Create an engine with no database open
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a database is currently open
    pub fn is_open(&self) -> bool {
        self.db.is_some()
    }

    /// The open database, if any
    pub fn database(&self) -> Option<&Database> {
        self.db.as_ref()
    }

    /// Process one event, returning the responses in order
    pub fn process(&mut self, event: Event) -> Vec<Response> {
        tracing::debug!("Processing {:?}", event);
        match event {
            Event::QuitInitiated => vec![Response::EndApplication],
            Event::OpenDatabase { path } => vec![self.open(path)],
            Event::CloseDatabase => self.close(),

            Event::StartContinentSearch { name, code } => self.search::<Continent>(
                SearchFilter::new()
                    .and("name", name)
                    .and("continent_code", code),
            ),
            Event::LoadContinent { id } => vec![self.load::<Continent>(id)],
            Event::SaveNewContinent { continent } => vec![self.save_new(continent)],
            Event::SaveContinent { continent } => vec![self.save(continent)],

            Event::StartCountrySearch { name, code } => self.search::<Country>(
                SearchFilter::new()
                    .and("name", name)
                    .and("country_code", code),
            ),
            Event::LoadCountry { id } => vec![self.load::<Country>(id)],
            Event::SaveNewCountry { country } => vec![self.save_new(country)],
            Event::SaveCountry { country } => vec![self.save(country)],

            Event::StartRegionSearch { name, region_code, local_code } => self.search::<Region>(
                SearchFilter::new()
                    .and("name", name)
                    .and("region_code", region_code)
                    .and("local_code", local_code),
            ),
            Event::LoadRegion { id } => vec![self.load::<Region>(id)],
            Event::SaveNewRegion { region } => vec![self.save_new(region)],
            Event::SaveRegion { region } => vec![self.save(region)],
        }
    }

    fn open(&mut self, path: PathBuf) -> Response {
        match Database::open(&path) {
            Ok(db) => {
                if let Some(previous) = self.db.take() {
                    tracing::info!("Closing {} before switching databases", previous.path().display());
                    if let Err(e) = previous.close() {
                        tracing::warn!("{}", e);
                    }
                }
                self.db = Some(db);
                tracing::info!("Opened database {}", path.display());
                Response::DatabaseOpened { path }
            }
            Err(e) => {
                tracing::warn!("Opening {} failed: {}", path.display(), e);
                Response::DatabaseOpenFailed { message: e.to_string() }
            }
        }
    }

    /// Close is always applied locally, even when it reports a failure.
    fn close(&mut self) -> Vec<Response> {
        match self.db.take() {
            Some(db) => {
                let path = db.path().to_path_buf();
                if let Err(e) = db.close() {
                    tracing::warn!("{}", e);
                }
                tracing::info!("Closed database {}", path.display());
                vec![Response::DatabaseClosed]
            }
            None => {
                let err = Error::DatabaseNotOpen;
                tracing::warn!("Close requested: {}", err);
                vec![Response::error(&err), Response::DatabaseClosed]
            }
        }
    }

    fn connected(&self) -> Result<&Database> {
        self.db.as_ref().ok_or(Error::DatabaseNotOpen)
    }

    fn search<E: EntityResponses>(&self, filter: SearchFilter) -> Vec<Response> {
        let mut responses = Vec::new();
        if let Err(e) = self.drain_search::<E>(&filter, &mut responses) {
            tracing::warn!("{} search ended early: {}", E::KIND, e);
            responses.push(Response::error(&e));
        }
        responses
    }

    fn drain_search<E: EntityResponses>(
        &self,
        filter: &SearchFilter,
        responses: &mut Vec<Response>,
    ) -> Result<()> {
        let db = self.connected()?;
        let mut cursor = db.table::<E>().search(filter)?;
        for record in cursor.results()? {
            responses.push(record?.search_result());
        }
        tracing::debug!("{} search produced {} results", E::KIND, responses.len());
        Ok(())
    }

    fn load<E: EntityResponses>(&self, id: i64) -> Response {
        let result = self.connected().and_then(|db| db.table::<E>().load(id));
        respond(result, E::loaded, E::load_failed)
    }

    fn save_new<E: EntityResponses>(&self, record: E) -> Response {
        let result = self.connected().and_then(|db| db.table::<E>().create(record));
        respond(result, E::saved, E::save_failed)
    }

    fn save<E: EntityResponses>(&self, record: E) -> Response {
        let result = self
            .connected()
            .and_then(|db| db.table::<E>().update(&record))
            .map(|()| record);
        respond(result, E::saved, E::save_failed)
    }
}

/// Map an outcome to its success event, its failure event, or the generic
/// error channel.
fn respond<E>(result: Result<E>, ok: fn(E) -> Response, failed: fn(String) -> Response) -> Response {
    match result {
        Ok(record) => ok(record),
        Err(e) if e.is_unexpected() => {
            tracing::warn!("{}", e);
            Response::error(&e)
        }
        Err(e) => {
            tracing::debug!("Operation failed: {}", e);
            failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn fresh_store(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        Database::create(&path).unwrap().close().unwrap();
        path
    }

    fn opened(path: &Path) -> Engine {
        let mut engine = Engine::new();
        let responses = engine.process(Event::OpenDatabase { path: path.to_path_buf() });
        assert_eq!(responses, vec![Response::DatabaseOpened { path: path.to_path_buf() }]);
        engine
    }

    fn save_continent(engine: &mut Engine, code: &str, name: &str) -> Vec<Response> {
        engine.process(Event::SaveNewContinent { continent: Continent::new(code, name) })
    }

    #[test]
    fn test_create_and_load_continent() {
        let dir = TempDir::new().unwrap();
        let mut engine = opened(&fresh_store(&dir, "fresh.db"));

        let expected = Continent { id: Some(1), ..Continent::new("AS", "Asia") };
        assert_eq!(
            save_continent(&mut engine, "AS", "Asia"),
            vec![Response::ContinentSaved { continent: expected.clone() }]
        );
        assert_eq!(
            engine.process(Event::LoadContinent { id: 1 }),
            vec![Response::ContinentLoaded { continent: expected }]
        );
    }

    #[test]
    fn test_duplicate_continent_fails() {
        let dir = TempDir::new().unwrap();
        let mut engine = opened(&fresh_store(&dir, "dup.db"));

        save_continent(&mut engine, "AS", "Asia");
        let responses = save_continent(&mut engine, "AS", "Asia");
        assert_eq!(responses.len(), 1);
        assert!(matches!(
            &responses[0],
            Response::SaveContinentFailed { message } if message.starts_with("Duplicate continent info")
        ));
    }

    #[test]
    fn test_search_without_filters_is_invalid() {
        let dir = TempDir::new().unwrap();
        let mut engine = opened(&fresh_store(&dir, "search.db"));
        save_continent(&mut engine, "AS", "Asia");

        let responses = engine.process(Event::StartContinentSearch { name: None, code: None });
        assert_eq!(responses.len(), 1);
        assert!(matches!(&responses[0], Response::Error { message } if message.starts_with("Invalid search")));
    }

    #[test]
    fn test_search_results_and_empty_search() {
        let dir = TempDir::new().unwrap();
        let mut engine = opened(&fresh_store(&dir, "search.db"));
        save_continent(&mut engine, "AS", "Asia");
        save_continent(&mut engine, "EU", "Europe");

        let responses = engine.process(Event::StartContinentSearch {
            name: Some("Europe".into()),
            code: Some("EU".into()),
        });
        assert_eq!(
            responses,
            vec![Response::ContinentSearchResult {
                continent: Continent { id: Some(2), ..Continent::new("EU", "Europe") }
            }]
        );

        let responses = engine.process(Event::StartContinentSearch {
            name: Some("Atlantis".into()),
            code: None,
        });
        assert!(responses.is_empty());
    }

    #[test]
    fn test_region_search_with_local_code() {
        let dir = TempDir::new().unwrap();
        let mut engine = opened(&fresh_store(&dir, "regions.db"));
        save_continent(&mut engine, "NA", "North America");
        engine.process(Event::SaveNewCountry { country: Country::new("CA", "Canada", 1) });
        engine.process(Event::SaveNewRegion { region: Region::new("CA-ON", "ON", "Ontario", 1, 1) });
        engine.process(Event::SaveNewRegion { region: Region::new("CA-QC", "QC", "Quebec", 1, 1) });

        let responses = engine.process(Event::StartRegionSearch {
            name: None,
            region_code: None,
            local_code: Some("QC".into()),
        });
        assert_eq!(responses.len(), 1);
        assert!(matches!(
            &responses[0],
            Response::RegionSearchResult { region } if region.id == Some(2)
        ));
    }

    #[test]
    fn test_mid_scan_failure_caps_results_with_error() {
        let dir = TempDir::new().unwrap();
        let path = fresh_store(&dir, "broken.db");
        {
            let conn = rusqlite::Connection::open(&path).unwrap();
            conn.execute_batch(
                "PRAGMA foreign_keys = OFF;
                 INSERT INTO continent VALUES (1, 'AS', 'Asia');
                 INSERT INTO country VALUES (1, 'NP', 'Nepal', 1, NULL, NULL);
                 INSERT INTO country VALUES (2, 'N2', 'Nepal', 'garbage', NULL, NULL);
                 INSERT INTO country VALUES (3, 'N3', 'Nepal', 1, NULL, NULL);",
            )
            .unwrap();
        }
        let mut engine = opened(&path);

        let responses = engine.process(Event::StartCountrySearch { name: Some("Nepal".into()), code: None });
        assert_eq!(responses.len(), 2);
        assert!(matches!(&responses[0], Response::CountrySearchResult { country } if country.id == Some(1)));
        assert!(matches!(&responses[1], Response::Error { .. }));
    }

    #[test]
    fn test_save_new_country_with_missing_continent() {
        let dir = TempDir::new().unwrap();
        let mut engine = opened(&fresh_store(&dir, "fk.db"));

        let responses = engine.process(Event::SaveNewCountry { country: Country::new("NP", "Nepal", 5) });
        assert_eq!(
            responses,
            vec![Response::SaveCountryFailed {
                message: "continent matching id 5 does not exist".into()
            }]
        );
        assert_eq!(
            engine.database().unwrap().table::<Country>().count().unwrap(),
            0
        );
    }

    #[test]
    fn test_save_new_when_ids_are_exhausted() {
        let dir = TempDir::new().unwrap();
        let path = fresh_store(&dir, "full.db");
        {
            let conn = rusqlite::Connection::open(&path).unwrap();
            conn.execute("INSERT INTO continent VALUES (9223372036854775807, 'AS', 'Asia')", [])
                .unwrap();
        }
        let mut engine = opened(&path);

        let responses = save_continent(&mut engine, "EU", "Europe");
        assert_eq!(
            responses,
            vec![Response::SaveContinentFailed { message: "The continent table is unavailable".into() }]
        );
    }

    #[test]
    fn test_region_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut engine = opened(&fresh_store(&dir, "region.db"));
        save_continent(&mut engine, "AS", "Asia");
        engine.process(Event::SaveNewCountry { country: Country::new("NP", "Nepal", 1) });

        let bagmati = Region::new("NP-P3", "P3", "Bagmati", 1, 1)
            .with_wikipedia_link("https://en.wikipedia.org/wiki/Bagmati_Province")
            .with_keywords("kathmandu, lalitpur");
        let expected = Region { id: Some(1), ..bagmati.clone() };

        assert_eq!(
            engine.process(Event::SaveNewRegion { region: bagmati }),
            vec![Response::RegionSaved { region: expected.clone() }]
        );
        assert_eq!(
            engine.process(Event::LoadRegion { id: 1 }),
            vec![Response::RegionLoaded { region: expected.clone() }]
        );

        let moved = Region { country_id: Some(9), ..expected.clone() };
        assert_eq!(
            engine.process(Event::SaveRegion { region: moved }),
            vec![Response::SaveRegionFailed { message: "country matching id 9 does not exist".into() }]
        );
        assert_eq!(
            engine.process(Event::LoadRegion { id: 1 }),
            vec![Response::RegionLoaded { region: expected }]
        );
    }

    #[test]
    fn test_update_echoes_supplied_record() {
        let dir = TempDir::new().unwrap();
        let mut engine = opened(&fresh_store(&dir, "update.db"));
        save_continent(&mut engine, "AS", "Asia");
        engine.process(Event::SaveNewCountry { country: Country::new("NP", "Nepal", 1) });

        let edited = Country { id: Some(1), keywords: Some(String::new()), ..Country::new("NP", "Nepal", 1) };
        let responses = engine.process(Event::SaveCountry { country: edited.clone() });
        assert_eq!(responses, vec![Response::CountrySaved { country: edited }]);

        let responses = engine.process(Event::LoadCountry { id: 1 });
        assert!(matches!(
            &responses[0],
            Response::CountryLoaded { country } if country.keywords.is_none() && country.id == Some(1)
        ));
    }

    #[test]
    fn test_update_missing_record() {
        let dir = TempDir::new().unwrap();
        let mut engine = opened(&fresh_store(&dir, "update.db"));

        let ghost = Continent { id: Some(3), ..Continent::new("AN", "Antarctica") };
        let responses = engine.process(Event::SaveContinent { continent: ghost });
        assert_eq!(
            responses,
            vec![Response::SaveContinentFailed { message: "No continent exists with id 3".into() }]
        );
    }

    #[test]
    fn test_load_missing_emits_load_failed() {
        let dir = TempDir::new().unwrap();
        let mut engine = opened(&fresh_store(&dir, "load.db"));

        let responses = engine.process(Event::LoadRegion { id: 4 });
        assert_eq!(
            responses,
            vec![Response::RegionLoadFailed { message: "region 4 could not be loaded".into() }]
        );
    }

    #[test]
    fn test_operations_without_database() {
        let mut engine = Engine::new();

        for event in [
            Event::LoadContinent { id: 1 },
            Event::SaveNewCountry { country: Country::new("NP", "Nepal", 1) },
            Event::StartRegionSearch { name: Some("Ontario".into()), region_code: None, local_code: None },
        ] {
            let responses = engine.process(event);
            assert_eq!(responses, vec![Response::Error { message: "No database is open".into() }]);
        }
    }

    #[test]
    fn test_close_without_database() {
        let mut engine = Engine::new();
        let responses = engine.process(Event::CloseDatabase);
        assert_eq!(
            responses,
            vec![
                Response::Error { message: "No database is open".into() },
                Response::DatabaseClosed,
            ]
        );
        assert!(!engine.is_open());
    }

    #[test]
    fn test_close_clears_connection() {
        let dir = TempDir::new().unwrap();
        let mut engine = opened(&fresh_store(&dir, "close.db"));

        assert_eq!(engine.process(Event::CloseDatabase), vec![Response::DatabaseClosed]);
        assert!(!engine.is_open());
    }

    #[test]
    fn test_failed_open_keeps_current_database() {
        let dir = TempDir::new().unwrap();
        let path = fresh_store(&dir, "keep.db");
        let mut engine = opened(&path);

        let responses = engine.process(Event::OpenDatabase { path: dir.path().join("missing.db") });
        assert!(matches!(&responses[0], Response::DatabaseOpenFailed { .. }));
        assert_eq!(engine.database().unwrap().path(), path.as_path());
    }

    #[test]
    fn test_open_replaces_current_database() {
        let dir = TempDir::new().unwrap();
        let first = fresh_store(&dir, "first.db");
        let second = fresh_store(&dir, "second.db");
        let mut engine = opened(&first);
        save_continent(&mut engine, "AS", "Asia");

        engine.process(Event::OpenDatabase { path: second.clone() });
        assert_eq!(engine.database().unwrap().path(), second.as_path());
        assert!(matches!(
            &engine.process(Event::LoadContinent { id: 1 })[0],
            Response::ContinentLoadFailed { .. }
        ));
    }

    #[test]
    fn test_quit() {
        let mut engine = Engine::new();
        assert_eq!(engine.process(Event::QuitInitiated), vec![Response::EndApplication]);
    }
}
