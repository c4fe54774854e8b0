use indicatif::ProgressBar;

use crate::{
    incident::{
        assembler::{assemble_feature, AssemblerOptions},
        field_spec::{datex_schema, incident_schema, RecordSchema, DATEX_NAMESPACE},
        normalize::{extract_point, extract_properties},
    },
    source::{
        download::PayloadFetcher,
        passthrough::read_passthrough_features,
        records::select_records,
        region::{Dialect, RegionConfig},
        xml_tree::parse_xml,
    },
};

/// Features gathered over a run, in region order, and the regions that could not be processed.
#[derive(Debug, Default)]
pub struct CollectedFeatures {
    pub features: Vec<geojson::Feature>,
    pub failed_regions: Vec<String>,
}

fn schema_for_region(region: &RegionConfig) -> Option<RecordSchema> {
    match region.dialect {
        Dialect::Datex => Some(datex_schema(
            region.namespace.as_deref().unwrap_or(DATEX_NAMESPACE),
        )),
        Dialect::Incident => Some(incident_schema()),
        Dialect::Geojson => None,
    }
}

/// Convert incident records of an XML document into features.
pub fn convert_xml_payload(
    payload: &[u8],
    region: &str,
    schema: &RecordSchema,
    options: &AssemblerOptions,
) -> anyhow::Result<Vec<geojson::Feature>> {
    let root = parse_xml(payload)?;
    let records = select_records(&root, schema);
    let features: Vec<geojson::Feature> = records
        .iter()
        .filter_map(|record| {
            let properties = extract_properties(*record, &schema.fields)?;
            let point = extract_point(*record, &schema.coordinates);
            assemble_feature(&properties, point, region, options)
        })
        .map(geojson::Feature::from)
        .collect();
    if features.len() != records.len() {
        log::debug!(
            "Out of {} {} records of {}, {} became features.",
            records.len(),
            schema.record_element,
            region,
            features.len()
        );
    }
    Ok(features)
}

/// Convert an already fetched region payload according to the region's dialect.
pub fn convert_payload(
    region: &RegionConfig,
    payload: &[u8],
    options: &AssemblerOptions,
) -> anyhow::Result<Vec<geojson::Feature>> {
    match schema_for_region(region) {
        Some(schema) => convert_xml_payload(payload, &region.name, &schema, options),
        None => read_passthrough_features(
            payload,
            &region.name,
            region.style.as_ref(),
            options.region_property.as_deref(),
        ),
    }
}

pub fn process_region(
    region: &RegionConfig,
    fetcher: &dyn PayloadFetcher,
    options: &AssemblerOptions,
) -> anyhow::Result<Vec<geojson::Feature>> {
    let payload = fetcher.fetch(&region.source)?;
    convert_payload(region, &payload, options)
}

/// Process every region in order. A failing region is logged and contributes no features.
pub fn collect_regions(
    regions: &[RegionConfig],
    fetcher: &dyn PayloadFetcher,
    options: &AssemblerOptions,
) -> CollectedFeatures {
    let mut collected = CollectedFeatures::default();
    let bar = ProgressBar::new(regions.len() as u64);
    for region in regions {
        match process_region(region, fetcher, options) {
            Ok(features) => {
                log::info!("Read {} features for {}", features.len(), region.name);
                collected.features.extend(features);
            }
            Err(err) => {
                log::warn!("Skipping region {}: {:?}", region.name, err);
                collected.failed_regions.push(region.name.clone());
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    collected
}
