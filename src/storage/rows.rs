//! Row mapping for the three record tables.

use rusqlite::Row;
use rusqlite::types::Value;
use crate::record::{blank_to_none, Continent, Country, EntityKind, Region};
use super::schema::{self, TableSchema};
use super::table::Entity;

impl Entity for Continent {
    const KIND: EntityKind = EntityKind::Continent;
    const SCHEMA: &'static TableSchema = &schema::CONTINENT;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Continent {
            id: row.get(0)?,
            code: row.get(1)?,
            name: row.get(2)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.code.clone().into(),
            self.name.clone().into(),
        ]
    }

    fn normalized(self) -> Self {
        self
    }
}

impl Entity for Country {
    const KIND: EntityKind = EntityKind::Country;
    const SCHEMA: &'static TableSchema = &schema::COUNTRY;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Country {
            id: row.get(0)?,
            code: row.get(1)?,
            name: row.get(2)?,
            continent_id: row.get(3)?,
            wikipedia_link: row.get(4)?,
            keywords: row.get(5)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.code.clone().into(),
            self.name.clone().into(),
            self.continent_id.into(),
            self.wikipedia_link.clone().into(),
            self.keywords.clone().into(),
        ]
    }

    fn normalized(mut self) -> Self {
        self.wikipedia_link = blank_to_none(self.wikipedia_link);
        self.keywords = blank_to_none(self.keywords);
        self
    }
}

impl Entity for Region {
    const KIND: EntityKind = EntityKind::Region;
    const SCHEMA: &'static TableSchema = &schema::REGION;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Region {
            id: row.get(0)?,
            region_code: row.get(1)?,
            local_code: row.get(2)?,
            name: row.get(3)?,
            continent_id: row.get(4)?,
            country_id: row.get(5)?,
            wikipedia_link: row.get(6)?,
            keywords: row.get(7)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.region_code.clone().into(),
            self.local_code.clone().into(),
            self.name.clone().into(),
            self.continent_id.into(),
            self.country_id.into(),
            self.wikipedia_link.clone().into(),
            self.keywords.clone().into(),
        ]
    }

    fn normalized(mut self) -> Self {
        self.wikipedia_link = blank_to_none(self.wikipedia_link);
        self.keywords = blank_to_none(self.keywords);
        self
    }
}
