//! Table layouts and schema definitions

/// A foreign key declared by a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    /// Column in the declaring table
    pub column: &'static str,
    /// Referenced table
    pub table: &'static str,
    /// Primary key column of the referenced table
    pub key: &'static str,
}

/// Static description of one record table.
///
/// `columns` lists every column in record order, primary key first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub table: &'static str,
    pub key: &'static str,
    pub columns: &'static [&'static str],
    pub foreign_keys: &'static [ForeignKey],
}

impl TableSchema {
    /// Comma separated column list for SELECT and INSERT
    pub fn column_list(&self) -> String {
        self.columns.join(", ")
    }

    /// Index of `column` within `columns`
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }
}

pub const CONTINENT: TableSchema = TableSchema {
    table: "continent",
    key: "continent_id",
    columns: &["continent_id", "continent_code", "name"],
    foreign_keys: &[],
};

pub const COUNTRY: TableSchema = TableSchema {
    table: "country",
    key: "country_id",
    columns: &[
        "country_id",
        "country_code",
        "name",
        "continent_id",
        "wikipedia_link",
        "keywords",
    ],
    foreign_keys: &[ForeignKey {
        column: "continent_id",
        table: "continent",
        key: "continent_id",
    }],
};

pub const REGION: TableSchema = TableSchema {
    table: "region",
    key: "region_id",
    columns: &[
        "region_id",
        "region_code",
        "local_code",
        "name",
        "continent_id",
        "country_id",
        "wikipedia_link",
        "keywords",
    ],
    foreign_keys: &[
        ForeignKey {
            column: "continent_id",
            table: "continent",
            key: "continent_id",
        },
        ForeignKey {
            column: "country_id",
            table: "country",
            key: "country_id",
        },
    ],
};

/// Tables a store must contain to be opened
pub const REQUIRED_TABLES: &[&str] = &["continent", "country", "region"];

/// SQL to create the continent table
pub const CREATE_CONTINENT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS continent (
    continent_id INTEGER PRIMARY KEY,
    continent_code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
)
"#;

/// SQL to create the country table
pub const CREATE_COUNTRY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS country (
    country_id INTEGER PRIMARY KEY,
    country_code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    continent_id INTEGER NOT NULL,
    wikipedia_link TEXT,
    keywords TEXT,
    FOREIGN KEY (continent_id) REFERENCES continent(continent_id)
)
"#;

/// SQL to create the region table
pub const CREATE_REGION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS region (
    region_id INTEGER PRIMARY KEY,
    region_code TEXT NOT NULL UNIQUE,
    local_code TEXT NOT NULL,
    name TEXT NOT NULL,
    continent_id INTEGER NOT NULL,
    country_id INTEGER NOT NULL,
    wikipedia_link TEXT,
    keywords TEXT,
    FOREIGN KEY (continent_id) REFERENCES continent(continent_id),
    FOREIGN KEY (country_id) REFERENCES country(country_id)
)
"#;

/// SQL to create indexes used by search
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_continent_name ON continent(name)",
    "CREATE INDEX IF NOT EXISTS idx_country_name ON country(name)",
    "CREATE INDEX IF NOT EXISTS idx_region_name ON region(name)",
    "CREATE INDEX IF NOT EXISTS idx_region_local_code ON region(local_code)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_CONTINENT_TABLE,
        CREATE_COUNTRY_TABLE,
        CREATE_REGION_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
