use anyhow::anyhow;

use super::region::StatusStyle;

fn status_key(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(status) => Some(status.trim().to_string()),
        serde_json::Value::Number(status) => match status.as_f64() {
            // Whole-number floats such as 2.0 share the key of the integer status.
            Some(float) if status.as_i64().is_none() && float.fract() == 0.0 => {
                Some((float as i64).to_string())
            }
            _ => Some(status.to_string()),
        },
        _ => None,
    }
}

/// Colour for the status value of a feature, or the fallback colour.
pub fn status_color<'a>(
    style: &'a StatusStyle,
    properties: Option<&geojson::JsonObject>,
) -> &'a str {
    properties
        .and_then(|properties| properties.get(&style.status_field))
        .and_then(status_key)
        .and_then(|status| style.colors.get(&status))
        .unwrap_or(&style.fallback_color)
}

/// Features of a GeoJSON FeatureCollection payload, passed through unchanged apart from the optional
/// style annotation and region label. Features without geometry are dropped.
pub fn read_passthrough_features(
    payload: &[u8],
    region: &str,
    style: Option<&StatusStyle>,
    region_property: Option<&str>,
) -> anyhow::Result<Vec<geojson::Feature>> {
    let feature_collection = match serde_json::from_slice::<geojson::GeoJson>(payload)? {
        geojson::GeoJson::FeatureCollection(feature_collection) => feature_collection,
        _ => return Err(anyhow!("Expected a GeoJSON FeatureCollection")),
    };

    let num_features = feature_collection.features.len();
    let features: Vec<geojson::Feature> = feature_collection
        .features
        .into_iter()
        .filter(|feature| feature.geometry.is_some())
        .map(|mut feature| {
            if let Some(style) = style {
                let color = status_color(style, feature.properties.as_ref()).to_string();
                feature
                    .properties
                    .get_or_insert_with(geojson::JsonObject::new)
                    .insert(style.property.clone(), color.into());
            }
            if let Some(region_property) = region_property {
                feature
                    .properties
                    .get_or_insert_with(geojson::JsonObject::new)
                    .insert(region_property.to_string(), region.into());
            }
            feature
        })
        .collect();
    if features.len() != num_features {
        log::debug!(
            "Out of {} features of {}, {} had a geometry.",
            num_features,
            region,
            features.len()
        );
    }
    Ok(features)
}
