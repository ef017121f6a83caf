//! Table schema definitions for the GeoNames dumps

use super::types::*;

/// `countryInfo.txt`
pub static COUNTRY: TableSchema = TableSchema {
    name: "country",
    columns: &[
        Column::primary("iso", ColumnType::Text),
        Column::required("iso3", ColumnType::Text),
        Column::required("iso_numeric", ColumnType::Text),
        Column::required("fips", ColumnType::Text),
        Column::required("country", ColumnType::Text),
        Column::required("capital", ColumnType::Text),
        Column::required("area", ColumnType::Integer),
        Column::required("population", ColumnType::Integer),
        Column::required("continent", ColumnType::Text),
        Column::required("tld", ColumnType::Text),
        Column::required("currency_code", ColumnType::Text),
        Column::required("currency_name", ColumnType::Text),
        Column::required("phone", ColumnType::Text),
        Column::new("postal_code_format", ColumnType::Text),
        Column::new("postal_code_regex", ColumnType::Text),
        Column::required("languages", ColumnType::Text),
        Column::required("geonameid", ColumnType::Integer),
        Column::required("neighbours", ColumnType::Text),
        Column::required("equivalent_fips_code", ColumnType::Text),
    ],
    indexes: &[],
};

/// `admin1CodesASCII.txt`, keyed by `<country>.<admin1>`
pub static ADMIN1: TableSchema = TableSchema {
    name: "admin1",
    columns: &[
        Column::primary("key", ColumnType::Text),
        Column::required("name", ColumnType::Text),
        Column::required("asciiname", ColumnType::Text),
        Column::required("geonameid", ColumnType::Integer),
    ],
    indexes: &[],
};

/// `citiesN.txt`
pub static GEONAME: TableSchema = TableSchema {
    name: "geoname",
    columns: &[
        Column::primary("geonameid", ColumnType::Int),
        Column::new("name", ColumnType::Text),
        Column::new("asciiname", ColumnType::Text),
        Column::new("alternatenames", ColumnType::Text),
        Column::new("latitude", ColumnType::Real),
        Column::new("longitude", ColumnType::Real),
        Column::new("fclass", ColumnType::Text),
        Column::new("fcode", ColumnType::Text),
        Column::new("country", ColumnType::Text),
        Column::new("cc2", ColumnType::Text),
        Column::new("admin1", ColumnType::Text),
        Column::new("admin2", ColumnType::Text),
        Column::new("admin3", ColumnType::Text),
        Column::new("admin4", ColumnType::Text),
        Column::new("population", ColumnType::Integer),
        Column::new("elevation", ColumnType::Integer),
        Column::new("gtopo30", ColumnType::Integer),
        Column::new("timezone", ColumnType::Text),
        Column::new("moddate", ColumnType::Date),
    ],
    indexes: &[&["country", "admin1"]],
};

/// Base tables in load order
pub static ALL_TABLES: &[&TableSchema] = &[&COUNTRY, &ADMIN1, &GEONAME];
