/// Point feature produced from one incident record.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: geo::Point,
    pub properties: geojson::JsonObject,
}

impl Feature {
    pub fn new(geometry: geo::Point) -> Self {
        Self {
            geometry,
            properties: geojson::JsonObject::new(),
        }
    }
}

impl From<Feature> for geojson::Feature {
    fn from(value: Feature) -> Self {
        Self {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(
                &value.geometry,
            ))),
            id: None,
            properties: Some(value.properties),
            foreign_members: None,
        }
    }
}
