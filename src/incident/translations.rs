/// Lookup table from feed codes to display strings.
///
/// Keys are matched ignoring ASCII case, so `roadClosed`, `roadclosed` and `ROADCLOSED` all hit the same entry.
/// Values that are not in the table pass through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationTable {
    entries: Vec<(String, String)>,
}

impl TranslationTable {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(code, display)| (code.to_string(), display.to_string()))
                .collect(),
        }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(code))
            .map(|(_, display)| display.as_str())
    }

    pub fn translate(&self, code: &str) -> String {
        self.get(code).unwrap_or(code).to_string()
    }
}

/// Obstruction and network management codes, as used by environmentalObstructionType,
/// vehicleObstructionType and networkManagementType.
const INCIDENT_TYPES: &[(&str, &str)] = &[
    ("flooding", "Inundación"),
    ("roadClosed", "Corte Total"),
    ("restrictions", "Restricciones"),
    ("narrowLanes", "Carriles Estrechos"),
    ("laneClosures", "Cierre de Carriles"),
    ("carriagewayClosures", "Cierre de Calzada"),
    ("contraflow", "Contraflujo"),
    ("intermittentClosures", "Cortes Intermitentes"),
    ("snowfall", "Nieve"),
    ("iceOnRoad", "Hielo en la Calzada"),
    ("fog", "Niebla"),
    ("heavyRain", "Lluvia Intensa"),
    ("strongWinds", "Viento Fuerte"),
    ("fallenTrees", "Árboles Caídos"),
    ("rockfalls", "Desprendimientos"),
    ("landslips", "Corrimiento de Tierras"),
    ("fire", "Incendio"),
    ("smokeHazard", "Humo"),
    ("brokenDownVehicle", "Vehículo Averiado"),
    ("vehicleOnFire", "Vehículo Incendiado"),
    ("abandonedVehicle", "Vehículo Abandonado"),
    ("vehicleStuck", "Vehículo Atascado"),
    ("objectOnTheRoad", "Objeto en la Calzada"),
    ("spillageOnTheRoad", "Derrame en la Calzada"),
];

/// Values of directionRelative and tpegDirection.
const DIRECTIONS: &[(&str, &str)] = &[
    ("positive", "Creciente"),
    ("negative", "Decreciente"),
    ("both", "Ambos sentidos"),
    ("bothWays", "Ambos sentidos"),
    ("allDirections", "Todos los sentidos"),
    ("northBound", "Norte"),
    ("southBound", "Sur"),
    ("eastBound", "Este"),
    ("westBound", "Oeste"),
    ("clockwise", "Sentido horario"),
    ("anticlockwise", "Sentido antihorario"),
    ("inboundTowardsTown", "Hacia la ciudad"),
    ("outboundFromTown", "Desde la ciudad"),
];

pub fn incident_type_table() -> TranslationTable {
    TranslationTable::new(INCIDENT_TYPES)
}

pub fn direction_table() -> TranslationTable {
    TranslationTable::new(DIRECTIONS)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{
        direction_table, incident_type_table, TranslationTable, DIRECTIONS, INCIDENT_TYPES,
    };

    #[rstest]
    #[case(incident_type_table(), INCIDENT_TYPES)]
    #[case(direction_table(), DIRECTIONS)]
    fn test_every_code_translates_to_its_entry(
        #[case] table: TranslationTable,
        #[case] entries: &[(&str, &str)],
    ) {
        for (code, display) in entries {
            assert_eq!(*display, table.translate(code));
            assert_eq!(*display, table.translate(&code.to_uppercase()));
        }
    }

    #[rstest]
    #[case("roadClosed", "Corte Total")]
    #[case("roadclosed", "Corte Total")]
    #[case("FLOODING", "Inundación")]
    #[case("somethingNew", "somethingNew")]
    #[case("", "")]
    fn test_translate_incident_type(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(expected, incident_type_table().translate(code));
    }

    #[rstest]
    #[case("positive", "Creciente")]
    #[case("negative", "Decreciente")]
    #[case("unknown", "unknown")]
    fn test_translate_direction(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(expected, direction_table().translate(code));
    }
}
