use crate::schema::TableSchema;

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let columns: Vec<String> = schema
        .columns
        .iter()
        .map(|col| {
            format!(
                "    {} {}{}",
                col.name,
                col.col_type.sql_type(),
                col.constraint.sql()
            )
        })
        .collect();

    format!("CREATE TABLE {} (\n{}\n)", schema.name, columns.join(",\n"))
}

pub fn generate_drop_table(name: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", name)
}

/// Generate CREATE INDEX statements
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    schema
        .indexes
        .iter()
        .map(|columns| {
            format!(
                "CREATE INDEX idx_{}_{} ON {}({})",
                schema.name,
                columns.join("_"),
                schema.name,
                columns.join(", ")
            )
        })
        .collect()
}

/// Positional insert: `INSERT INTO t VALUES (?1, ?2, ...)`
pub fn generate_insert(schema: &TableSchema) -> String {
    let placeholders: Vec<String> = (1..=schema.expected_fields())
        .map(|i| format!("?{}", i))
        .collect();
    format!(
        "INSERT INTO {} VALUES ({})",
        schema.name,
        placeholders.join(", ")
    )
}
