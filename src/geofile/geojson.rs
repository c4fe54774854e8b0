use std::{fs, path::Path};

use anyhow::{anyhow, Context};

/// Write features as a FeatureCollection, replacing any existing file.
pub fn write_features_to_geojson(
    features: Vec<geojson::Feature>,
    output_filepath: &Path,
) -> anyhow::Result<()> {
    if let Some(parent) = output_filepath.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let feature_collection = geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    // serde_json leaves non-ASCII characters unescaped.
    let geojson_contents =
        serde_json::to_string_pretty(&geojson::GeoJson::from(feature_collection))?;
    fs::write(output_filepath, geojson_contents)
        .with_context(|| format!("Writing GeoJSON to {:?}", output_filepath))
}

pub fn read_features_from_geojson(filepath: &Path) -> anyhow::Result<Vec<geojson::Feature>> {
    let contents = fs::read_to_string(filepath)
        .with_context(|| format!("Reading GeoJSON from {:?}", filepath))?;
    match contents.parse::<geojson::GeoJson>()? {
        geojson::GeoJson::FeatureCollection(feature_collection) => Ok(feature_collection.features),
        _ => Err(anyhow!(
            "{:?} does not contain a GeoJSON FeatureCollection",
            filepath
        )),
    }
}
