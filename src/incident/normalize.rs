use chrono::{DateTime, NaiveDateTime};

use crate::source::records::IncidentRecord;

use super::field_spec::{CoordinateSpec, FieldSpec, ValueFormatter};

/// Literal marking a field as not populated. Compared ignoring case.
pub const UNKNOWN_SENTINEL: &str = "desconocido";

const DISPLAY_DATETIME_FORMAT: &str = "%d/%m/%Y - %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedField {
    pub name: String,
    pub label: String,
    pub value: String,
}

/// Extracted properties of one record, in FieldSpec order. Only valid fields are present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedProperties {
    fields: Vec<NormalizedField>,
}

impl NormalizedProperties {
    pub fn insert(&mut self, name: &str, label: &str, value: String) {
        self.fields.push(NormalizedField {
            name: name.to_string(),
            label: label.to_string(),
            value,
        });
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub fn valid_value(raw: Option<&str>) -> Option<&str> {
    let value = raw?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(UNKNOWN_SENTINEL) {
        return None;
    }
    Some(value)
}

/// Render an ISO-8601 timestamp for display. Timestamps with an offset keep the wall-clock time of that offset.
/// Unparsable input is returned unchanged.
pub fn format_datetime(raw: &str) -> String {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return datetime
            .naive_local()
            .format(DISPLAY_DATETIME_FORMAT)
            .to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(datetime) => datetime.format(DISPLAY_DATETIME_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

fn normalize_value(field: &FieldSpec, value: &str) -> String {
    let value = match &field.translation {
        Some(table) => table.translate(value),
        None => value.to_string(),
    };
    match field.formatter {
        Some(ValueFormatter::DateTime) => format_datetime(&value),
        None => value,
    }
}

fn extract_field<'a, R: IncidentRecord + ?Sized>(
    record: &'a R,
    field: &FieldSpec,
) -> Option<&'a str> {
    field
        .selectors
        .iter()
        .find_map(|selector| valid_value(record.select(selector)))
}

/// Extract the properties described by `fields` from a record.
///
/// Returns `None` when a required field is missing, meaning the record must be dropped.
pub fn extract_properties<R: IncidentRecord + ?Sized>(
    record: &R,
    fields: &[FieldSpec],
) -> Option<NormalizedProperties> {
    let mut properties = NormalizedProperties::default();
    for field in fields {
        match extract_field(record, field) {
            Some(value) => {
                properties.insert(&field.name, &field.label, normalize_value(field, value))
            }
            None if field.required => {
                log::debug!("Dropping record without required field {}", field.name);
                return None;
            }
            None => {}
        }
    }
    Some(properties)
}

fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    let value: f64 = valid_value(raw)?.parse().ok()?;
    value.is_finite().then_some(value)
}

/// Point geometry of a record in (longitude, latitude) order. `None` unless both coordinates parse.
pub fn extract_point<R: IncidentRecord + ?Sized>(
    record: &R,
    coordinates: &CoordinateSpec,
) -> Option<geo::Point> {
    let latitude = parse_coordinate(record.select(&coordinates.latitude))?;
    let longitude = parse_coordinate(record.select(&coordinates.longitude))?;
    Some(geo::Point::new(longitude, latitude))
}
