pub mod cli;
pub mod config;
pub mod download;
pub mod enrich;
pub mod parser;
pub mod pipeline;
pub mod schema;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::{CitySize, PipelineConfig, UnresolvedPolicy};
pub use pipeline::{Pipeline, PipelineSummary};
pub use ui::{ConsoleUi, Phase, SilentUi, Ui, UiApp};
