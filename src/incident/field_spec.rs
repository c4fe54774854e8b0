use super::translations::{direction_table, incident_type_table, TranslationTable};

/// Namespace of the DATEX II 1.0 situation publications.
pub const DATEX_NAMESPACE: &str = "http://datex2.eu/schema/1_0/1_0";

/// A chain of descendant steps into a record, equivalent to `.//a//b//c`.
/// A `namespace` of `None` matches elements in any namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub namespace: Option<String>,
    pub steps: Vec<String>,
}

impl Selector {
    /// Build a selector from a `//`-separated path, e.g. `pointCoordinates//latitude`.
    pub fn parse(namespace: Option<&str>, path: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            steps: path
                .split("//")
                .map(str::trim)
                .filter(|step| !step.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueFormatter {
    /// ISO-8601 timestamp rendered as `dd/mm/YYYY - HH:MM:SS`.
    DateTime,
}

/// Declarative extraction rule for one property.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    /// Alternative locations of the value; the first one that yields a valid value wins.
    pub selectors: Vec<Selector>,
    pub translation: Option<TranslationTable>,
    pub formatter: Option<ValueFormatter>,
    /// Records where this field is not valid are dropped.
    pub required: bool,
}

impl FieldSpec {
    pub fn new(name: &str, label: &str, selectors: Vec<Selector>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            selectors,
            translation: None,
            formatter: None,
            required: false,
        }
    }

    pub fn with_translation(mut self, translation: TranslationTable) -> Self {
        self.translation = Some(translation);
        self
    }

    pub fn with_formatter(mut self, formatter: ValueFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSpec {
    pub latitude: Selector,
    pub longitude: Selector,
}

/// Everything needed to turn one feed dialect into features: which elements are records,
/// which properties to extract from them and where the coordinates are.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    pub namespace: Option<String>,
    pub record_element: String,
    pub fields: Vec<FieldSpec>,
    pub coordinates: CoordinateSpec,
}

/// Schema for DATEX II situation publications.
pub fn datex_schema(namespace: &str) -> RecordSchema {
    let ns = Some(namespace);
    let selector = |path: &str| Selector::parse(ns, path);
    RecordSchema {
        namespace: Some(namespace.to_string()),
        record_element: "situation".to_string(),
        fields: vec![
            FieldSpec::new(
                "fecha",
                "Fecha de Creación",
                vec![selector("situationRecordCreationTime")],
            )
            .with_formatter(ValueFormatter::DateTime),
            FieldSpec::new(
                "tipo",
                "Tipo de Incidencia",
                vec![
                    selector("environmentalObstructionType"),
                    selector("vehicleObstructionType"),
                    selector("networkManagementType"),
                ],
            )
            .with_translation(incident_type_table()),
            FieldSpec::new("carretera", "Carretera", vec![selector("roadNumber")]),
            FieldSpec::new(
                "kilometro",
                "Punto Kilométrico",
                vec![selector("referencePointDistance")],
            ),
            FieldSpec::new(
                "sentido",
                "Sentido",
                vec![selector("directionRelative"), selector("tpegDirection")],
            )
            .with_translation(direction_table()),
        ],
        coordinates: CoordinateSpec {
            latitude: selector("pointCoordinates//latitude"),
            longitude: selector("pointCoordinates//longitude"),
        },
    }
}

/// Schema for the flat `incident` dialect, which carries no namespace.
pub fn incident_schema() -> RecordSchema {
    let selector = |path: &str| Selector::parse(None, path);
    RecordSchema {
        namespace: None,
        record_element: "incident".to_string(),
        fields: vec![
            FieldSpec::new("descripcion", "Descripción", vec![selector("description")]),
            FieldSpec::new("carretera", "Carretera", vec![selector("road")]),
        ],
        coordinates: CoordinateSpec {
            latitude: selector("latitude"),
            longitude: selector("longitude"),
        },
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{datex_schema, Selector, DATEX_NAMESPACE};

    #[rstest]
    #[case("latitude", vec!["latitude"])]
    #[case("pointCoordinates//latitude", vec!["pointCoordinates", "latitude"])]
    #[case(".//a//b", vec![".", "a", "b"])]
    #[case("//a//", vec!["a"])]
    fn test_selector_parse(#[case] path: &str, #[case] expected_steps: Vec<&str>) {
        let selector = Selector::parse(None, path);
        assert_eq!(expected_steps, selector.steps);
    }

    #[rstest]
    fn test_datex_schema_field_order() {
        let schema = datex_schema(DATEX_NAMESPACE);
        let names: Vec<&str> = schema.fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(
            vec!["fecha", "tipo", "carretera", "kilometro", "sentido"],
            names
        );
        assert!(schema
            .fields
            .iter()
            .flat_map(|field| field.selectors.iter())
            .all(|selector| selector.namespace.as_deref() == Some(DATEX_NAMESPACE)));
    }
}
