/// Declared SQL type of a column.
///
/// Values are always bound as text; the declared type only sets SQLite's
/// column affinity, which turns numeric-looking text into numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnType {
    Integer,
    /// Integer affinity without making a primary key a rowid alias,
    /// so a non-numeric key is stored as text instead of rejected
    Int,
    Real,
    Text,
    /// `yyyy-MM-dd`, stays text under NUMERIC affinity
    Date,
}

impl ColumnType {
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Int => "INT",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
            ColumnType::Date => "DATE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    Nullable,
    NotNull,
    PrimaryKey,
}

impl Constraint {
    pub fn sql(self) -> &'static str {
        match self {
            Constraint::Nullable => "",
            Constraint::NotNull => " NOT NULL",
            Constraint::PrimaryKey => " PRIMARY KEY",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub constraint: Constraint,
}

impl Column {
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            constraint: Constraint::Nullable,
        }
    }

    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            constraint: Constraint::NotNull,
        }
    }

    pub const fn primary(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            constraint: Constraint::PrimaryKey,
        }
    }
}

/// Table filled from one tab-separated dump.
///
/// Columns are listed in the same order as the fields of the source file,
/// so a source line binds to the table positionally.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
    /// Secondary indexes, each a list of column names
    pub indexes: &'static [&'static [&'static str]],
}

impl TableSchema {
    /// Number of tab-separated fields a source line must carry
    pub fn expected_fields(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}
