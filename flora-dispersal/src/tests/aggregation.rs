use layered_flora::TermTable;
use serde_json::{json, Value};

use crate::{export_entities, DispersalFormatter, LinkConfig, Pipeline, PipelineConfig};

fn shipped_table() -> TermTable {
    TermTable::load(&PipelineConfig::default().terms).unwrap()
}

#[test]
fn extract_matches_export_then_format() {
    let table = shipped_table();
    let text = "Achenes winged, seeds without pappus; beak short.";
    let pipeline = Pipeline::standard();

    let treatment = pipeline.run_on_text(text, &table).unwrap();
    let mut bag = export_entities(treatment.entities());
    let block = DispersalFormatter::new(&table, &LinkConfig::default()).format(&mut bag);

    let output = pipeline.extractor(&table).unwrap().extract(text);
    assert_eq!(output.dispersal, block);
    assert_eq!(output.properties, bag);
    assert_eq!(Value::Object(bag), json!({"seedSubpart": "beak"}));
}

#[test]
fn formatting_consumes_dispersal_keys_once() {
    let table = shipped_table();
    let formatter = DispersalFormatter::new(&table, &LinkConfig::default());
    let treatment = Pipeline::standard()
        .run_on_text("Fruit a berry; seeds arillate, beak short.", &table)
        .unwrap();

    let mut bag = export_entities(treatment.entities());
    let first = formatter.format(&mut bag);
    assert_eq!(first.traits.get("fleshy_reward"), Some(1));
    assert_eq!(first.traits.get("elaiosome"), Some(1));
    assert_eq!(first.traits.fruit_type.as_deref(), Some("berry"));

    let remaining = bag.clone();
    let second = formatter.format(&mut bag);
    assert!(second.traits.is_empty());
    assert!(second.keywords_found.is_empty());
    assert_eq!(bag, remaining);
}

#[test]
fn present_wins_over_absent_across_parts() {
    let table = shipped_table();
    let output = Pipeline::standard()
        .extractor(&table)
        .unwrap()
        .extract("Seeds winged; fruit wingless.");

    assert_eq!(
        serde_json::to_value(&output.dispersal).unwrap(),
        json!({
            "keywords_found": ["winged", "wingless"],
            "traits": {"wing": 1},
        })
    );
}

#[test]
fn conflicting_values_on_one_part_are_disambiguated() {
    let table = shipped_table();
    let treatment = Pipeline::standard()
        .run_on_text("Seeds winged; seeds wingless.", &table)
        .unwrap();

    // the later sentence is exported first
    assert_eq!(
        Value::Object(export_entities(treatment.entities())),
        json!({
            "seedDispersalTraits": "wing_absent",
            "seedDispersalKeyword": "wingless",
            "seedDispersalTraits_winged": "wing",
            "seedDispersalKeyword_winged": "winged",
        })
    );

    let output = Pipeline::standard().extractor(&table).unwrap().extract("Seeds winged; seeds wingless.");
    assert_eq!(output.dispersal.traits.get("wing"), Some(1));
    assert_eq!(output.dispersal.keywords_found, vec!["winged", "wingless"]);
}

#[test]
fn unlinked_traits_are_dropped() {
    let table = shipped_table();
    let output = Pipeline::standard()
        .extractor(&table)
        .unwrap()
        .extract("Seeds ovoid. Winged.");

    assert!(output.dispersal.traits.is_empty());
    assert!(output.dispersal.keywords_found.is_empty());
    assert!(output.properties.is_empty());
}
