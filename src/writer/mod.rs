pub mod fulltext;
pub mod schema_gen;
pub mod sqlite;

pub use fulltext::*;
pub use schema_gen::*;
pub use sqlite::*;
