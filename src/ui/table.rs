use tabled::{settings::Style, Table, Tabled};
use crate::record::{Continent, Country, Region};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            field: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Labelled field values of a record, for display
pub trait Fields {
    fn fields(&self) -> Vec<(&'static str, Option<String>)>;
}

impl Fields for Continent {
    fn fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("id", self.id.map(|id| id.to_string())),
            ("code", self.code.clone()),
            ("name", self.name.clone()),
        ]
    }
}

impl Fields for Country {
    fn fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("id", self.id.map(|id| id.to_string())),
            ("code", self.code.clone()),
            ("name", self.name.clone()),
            ("continent id", self.continent_id.map(|id| id.to_string())),
            ("wikipedia", self.wikipedia_link.clone()),
            ("keywords", self.keywords.clone()),
        ]
    }
}

impl Fields for Region {
    fn fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("id", self.id.map(|id| id.to_string())),
            ("region code", self.region_code.clone()),
            ("local code", self.local_code.clone()),
            ("name", self.name.clone()),
            ("continent id", self.continent_id.map(|id| id.to_string())),
            ("country id", self.country_id.map(|id| id.to_string())),
            ("wikipedia", self.wikipedia_link.clone()),
            ("keywords", self.keywords.clone()),
        ]
    }
}

/// Render one record as a two-column table; absent values show as `-`
pub fn record_table(record: &impl Fields) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in record.fields() {
        builder.add_row(label, value.as_deref().unwrap_or("-"));
    }
    builder.build()
}
