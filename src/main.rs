extern crate log;
pub mod geofile;
pub mod incident;
pub mod pipeline;
pub mod source;
use crate::geofile::geojson::{read_features_from_geojson, write_features_to_geojson};
use crate::incident::assembler::{AssemblerOptions, OutputMode};
use crate::pipeline::collect_regions;
use crate::source::download::{FetchConfig, HttpFetcher};
use crate::source::region::RegionConfig;
use anyhow::anyhow;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::{fs::read_to_string, path::Path};

/// Convert traffic incident feeds into a single GeoJSON FeatureCollection.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input config file.
    #[arg(short, long)]
    config_filepath: String,
}

#[derive(Deserialize, Debug)]
struct Config {
    regions: Vec<RegionConfig>,
    output_filepath: PathBuf,
    #[serde(default)]
    output_mode: OutputMode,
    #[serde(default)]
    region_property: Option<String>,
    /// Existing FeatureCollections whose features are appended after the fetched regions.
    #[serde(default)]
    merge_geojson_files: Vec<PathBuf>,
    #[serde(default)]
    fetch: FetchConfig,
}

impl Config {
    fn assembler_options(&self) -> AssemblerOptions {
        AssemblerOptions {
            mode: self.output_mode,
            region_property: self.region_property.clone(),
        }
    }
}

fn read_merge_features(filepaths: &[PathBuf]) -> Vec<geojson::Feature> {
    let mut features = Vec::new();
    for filepath in filepaths {
        match read_features_from_geojson(filepath) {
            Ok(file_features) => {
                log::info!("Merging {} features from {:?}", file_features.len(), filepath);
                features.extend(file_features);
            }
            Err(err) => log::warn!("Skipping merge file {:?}: {:?}", filepath, err),
        }
    }
    features
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    if !Path::new(&args.config_filepath).exists() {
        return Err(anyhow!("Config file {} not found", &args.config_filepath));
    }
    let config_contents = read_to_string(args.config_filepath)?;
    let config: Config = serde_yaml::from_str(&config_contents)?;

    let fetcher = HttpFetcher::new(config.fetch.clone())?;
    log::info!("Processing {} regions", config.regions.len());
    let mut collected = collect_regions(&config.regions, &fetcher, &config.assembler_options());
    if !collected.failed_regions.is_empty() {
        log::warn!(
            "{} regions failed: {}",
            collected.failed_regions.len(),
            collected.failed_regions.join(", ")
        );
    }
    collected
        .features
        .extend(read_merge_features(&config.merge_geojson_files));

    log::info!(
        "Writing {} features to {:?}",
        collected.features.len(),
        &config.output_filepath
    );
    write_features_to_geojson(collected.features, &config.output_filepath)
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
