use anyhow::Result;
use geonames_to_sqlite::{
    cli::{Cli, Commands},
    config::{PipelineConfig, Sources},
    download::{CacheManager, GeoNamesClient},
    ConsoleUi, Pipeline, Ui, UiApp,
};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    if cli.tui {
        let mut ui = UiApp::new()?;
        match execute(cli.command, &mut ui) {
            Ok(summary) => ui.finish(&summary),
            Err(e) => {
                ui.restore()?;
                Err(e)
            }
        }
    } else {
        let summary = execute(cli.command, &mut ConsoleUi::new())?;
        println!("\n{}", summary);
        Ok(())
    }
}

/// Run one subcommand, returning the closing summary line
fn execute(command: Commands, ui: &mut impl Ui) -> Result<String> {
    match command {
        Commands::Sync {
            output_db,
            source,
            load,
        } => {
            let cache = CacheManager::new(source.cache_dir.clone())?;
            let mut config = PipelineConfig::new(cache.into_path())?;
            config.cities = source.cities;
            config.base_url = source.base_url.clone();
            load.apply(&mut config)?;

            let client = GeoNamesClient::new(source.timeout())?;
            let summary = Pipeline::new(config).run(&client, &output_db, ui)?;
            Ok(format!("Created {:?}: {}", output_db, summary))
        }

        Commands::Download { source } => {
            let cache = CacheManager::new(source.cache_dir.clone())?;
            let mut config = PipelineConfig::new(cache.into_path())?;
            config.cities = source.cities;
            config.base_url = source.base_url.clone();

            let client = GeoNamesClient::new(source.timeout())?;
            let pipeline = Pipeline::new(config);
            pipeline.fetch(&client, ui)?;
            Ok(format!(
                "GeoNames dumps ready in {:?}",
                pipeline.config().work_dir()
            ))
        }

        Commands::Import {
            input_dir,
            output_db,
            cities,
            load,
        } => {
            let mut config = PipelineConfig::new(input_dir)?;
            config.cities = cities;
            load.apply(&mut config)?;

            let summary = Pipeline::new(config).load(&output_db, ui)?;
            Ok(format!("Created {:?}: {}", output_db, summary))
        }

        Commands::ListSources { cities, base_url } => {
            let sources = Sources::new(&base_url, cities);
            for source in sources.all() {
                ui.log(format!("  {:<22} {}", source.file_name, source.url));
            }
            Ok(format!("{} sources", sources.all().len()))
        }
    }
}
