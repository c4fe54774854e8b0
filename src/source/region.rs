use std::{collections::BTreeMap, path::PathBuf};

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    Datex,
    Incident,
    Geojson,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RegionSource {
    Url { url: String },
    File { filepath: PathBuf },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StatusStyle {
    pub status_field: String,
    pub property: String,
    pub colors: BTreeMap<String, String>,
    pub fallback_color: String,
}

impl Default for StatusStyle {
    fn default() -> Self {
        let colors = [
            ("0", "#2ecc71"),
            ("1", "#f39c12"),
            ("2", "#e74c3c"),
            ("3", "#000000"),
            ("5", "#2ecc71"),
            ("6", "#f39c12"),
            ("7", "#e74c3c"),
            ("8", "#000000"),
        ];
        Self {
            status_field: "estado".to_string(),
            property: "color".to_string(),
            colors: colors
                .iter()
                .map(|(status, color)| (status.to_string(), color.to_string()))
                .collect(),
            fallback_color: "#95a5a6".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RegionConfig {
    pub name: String,
    pub dialect: Dialect,
    pub source: RegionSource,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub style: Option<StatusStyle>,
}
