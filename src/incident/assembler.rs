use serde::Deserialize;

use crate::geofile::feature::Feature;

use super::normalize::NormalizedProperties;

/// Property key holding the concatenated fields in flattened mode.
pub const DESCRIPTION_PROPERTY: &str = "description";

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    #[default]
    Structured,
    /// A single `description` property with one `Label: value` line per field.
    Flattened,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssemblerOptions {
    pub mode: OutputMode,
    pub region_property: Option<String>,
}

/// Lines of the flattened description, in field order.
pub fn flatten_description(properties: &NormalizedProperties) -> String {
    properties
        .iter()
        .map(|field| format!("{}: {}\n", field.label, field.value))
        .collect()
}

/// Build a feature from the normalized properties of one record.
///
/// Records without a point or without any property produce no feature.
pub fn assemble_feature(
    properties: &NormalizedProperties,
    point: Option<geo::Point>,
    region: &str,
    options: &AssemblerOptions,
) -> Option<Feature> {
    let point = point?;
    if properties.is_empty() {
        return None;
    }

    let mut feature = Feature::new(point);
    match options.mode {
        OutputMode::Structured => {
            for field in properties.iter() {
                feature
                    .properties
                    .insert(field.name.clone(), field.value.clone().into());
            }
        }
        OutputMode::Flattened => {
            feature.properties.insert(
                DESCRIPTION_PROPERTY.to_string(),
                flatten_description(properties).into(),
            );
        }
    }
    if let Some(region_property) = &options.region_property {
        feature
            .properties
            .insert(region_property.clone(), region.into());
    }
    Some(feature)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::incident::normalize::NormalizedProperties;

    use super::{assemble_feature, AssemblerOptions, OutputMode, DESCRIPTION_PROPERTY};

    fn sample_properties() -> NormalizedProperties {
        let mut properties = NormalizedProperties::default();
        properties.insert("fecha", "Fecha de Creación", "01/05/2024 - 10:00:00".to_string());
        properties.insert("tipo", "Tipo de Incidencia", "Corte Total".to_string());
        properties
    }

    #[rstest]
    fn test_structured_keeps_field_order() {
        let feature = assemble_feature(
            &sample_properties(),
            Some(geo::Point::new(2.17, 41.38)),
            "Cataluña",
            &AssemblerOptions::default(),
        )
        .unwrap();
        let keys: Vec<&str> = feature.properties.keys().map(|key| key.as_str()).collect();
        assert_eq!(vec!["fecha", "tipo"], keys);
        assert_eq!(geo::Point::new(2.17, 41.38), feature.geometry);
    }

    #[rstest]
    fn test_flattened_description() {
        let options = AssemblerOptions {
            mode: OutputMode::Flattened,
            region_property: Some("region".to_string()),
        };
        let feature = assemble_feature(
            &sample_properties(),
            Some(geo::Point::new(2.17, 41.38)),
            "Cataluña",
            &options,
        )
        .unwrap();
        assert_eq!(
            Some(&serde_json::Value::from(
                "Fecha de Creación: 01/05/2024 - 10:00:00\nTipo de Incidencia: Corte Total\n"
            )),
            feature.properties.get(DESCRIPTION_PROPERTY)
        );
        assert_eq!(
            Some(&serde_json::Value::from("Cataluña")),
            feature.properties.get("region")
        );
        assert_eq!(2, feature.properties.len());
    }

    #[rstest]
    #[case(OutputMode::Structured)]
    #[case(OutputMode::Flattened)]
    fn test_missing_point_or_properties_emit_nothing(#[case] mode: OutputMode) {
        let options = AssemblerOptions {
            mode,
            region_property: Some("region".to_string()),
        };
        assert!(assemble_feature(&sample_properties(), None, "A", &options).is_none());
        assert!(assemble_feature(
            &NormalizedProperties::default(),
            Some(geo::Point::new(0.0, 0.0)),
            "A",
            &options
        )
        .is_none());
    }
}
