use layered_flora::TermTable;
use serde_json::json;

use crate::{export_entities, Pipeline, PipelineConfig};

fn shipped_table() -> TermTable {
    TermTable::load(&PipelineConfig::default().terms).unwrap()
}

fn test_pipeline(pipeline: Pipeline, input: &str) -> String {
    let table = shipped_table();
    let treatment = pipeline.run_on_text(input, &table).unwrap();
    format!("{}", treatment.display())
}

#[test]
fn fruit_type_and_part_anchors() {
    insta::assert_snapshot!(test_pipeline(Pipeline::standard(), "Achenes winged, seeds without pappus."), @r###"
    Achenes  winged  ,  seeds  without  pappus  .
                               ╰─────────────╯DispersalTraits(pappus_absent @ seed)
                                 └─@part─>[B]
                        ╰───╯[B] Part(seed)
             ╰────╯DispersalTraits(wing @ achene)
               └─@part─>[A]
    ╰─────╯[A] FruitType(achene)
    "###);
}

#[test]
fn subpart_moves_from_fruit_type_to_seed() {
    insta::assert_snapshot!(test_pipeline(Pipeline::standard(), "Fruit a samara, beak short; seed solitary."), @r###"
    Fruit  a  samara  ,  beak  short  ;  seed  solitary  .
                                         ╰──╯[A] Part(seed)
                         ╰──╯Subpart(beak @ seed)
                           └─@part─>[A]
              ╰────╯FruitType(samara)
    ╰───╯Part(fruit)
    "###);
}

#[test]
fn stem_linked_trait() {
    insta::assert_snapshot!(test_pipeline(Pipeline::standard(), "Stems hooked; fruit a berry."), @r###"
    Stems  hooked  ;  fruit  a  berry  .
                                ╰───╯FruitType(berry)
                      ╰───╯Part(fruit)
           ╰────╯DispersalTraits(hook @ stem)
             └─@part─>[A]
    ╰───╯[A] Part(stem)
    "###);
}

#[test]
fn part_list_and_absence_term() {
    insta::assert_snapshot!(test_pipeline(Pipeline::standard(), "Fruit and seed wingless"), @r###"
    Fruit  and  seed  wingless
                      ╰──────╯DispersalTraits(wing_absent @ fruit|seed)
                        └─@part─>[A]
    ╰──────────────╯[A] Part(fruit|seed)
    "###);
}

#[test]
fn multi_word_mapping() {
    insta::assert_snapshot!(test_pipeline(Pipeline::standard(), "Cypselae with plumose pappus."), @r###"
    Cypselae  with  plumose pappus  .
                    ╰────────────╯DispersalTraits(pappus|plume @ cypsela)
                      └─@part─>[A]
    ╰──────╯[A] FruitType(cypsela)
    "###);
}

#[test]
fn extract_encodes_present_and_absent() {
    let table = shipped_table();
    let extractor = Pipeline::standard().extractor(&table).unwrap();
    let output = extractor.extract("Achenes winged, seeds without pappus.");

    assert_eq!(
        serde_json::to_value(&output.dispersal).unwrap(),
        json!({
            "keywords_found": ["achenes", "pappus", "winged"],
            "traits": {"wing": 1, "pappus": 0, "fruitType": "achene"},
        })
    );
    assert!(output.properties.is_empty());
    assert_eq!(output.text, "Achenes winged, seeds without pappus.");
}

#[test]
fn extract_keeps_subparts_and_implied_traits() {
    let table = shipped_table();
    let extractor = Pipeline::standard().extractor(&table).unwrap();
    let output = extractor.extract("Fruit a samara, beak short; seed solitary.");

    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        json!({
            "properties": {"seedSubpart": "beak"},
            "dispersal": {
                "keywords_found": ["samara"],
                "traits": {"wing": 1, "fruitType": "samara"},
            },
            "text": "Fruit a samara, beak short; seed solitary.",
        })
    );
}

#[test]
fn stem_traits_never_surface() {
    let table = shipped_table();
    let extractor = Pipeline::standard().extractor(&table).unwrap();
    let output = extractor.extract("Stems hooked; fruit a berry.");

    assert_eq!(output.dispersal.traits.get("hook"), None);
    assert_eq!(output.dispersal.traits.get("fleshy_reward"), Some(1));
    assert_eq!(output.dispersal.keywords_found, vec!["berry"]);
}

#[test]
fn multi_trait_keyword_and_fruit_type() {
    let table = shipped_table();
    let extractor = Pipeline::standard().extractor(&table).unwrap();
    let output = extractor.extract("Cypselae with plumose pappus.");

    assert_eq!(
        serde_json::to_value(&output.dispersal).unwrap(),
        json!({
            "keywords_found": ["cypselae", "plumose pappus"],
            "traits": {"pappus": 1, "plume": 1, "fruitType": "cypsela"},
        })
    );
}

#[test]
fn structure_preset_exports_structure_keys() {
    let table = shipped_table();
    let pipeline = Pipeline::structure_only();
    let treatment = pipeline.run_on_text("Seeds winged or hooked.", &table).unwrap();

    // entities are in reverse text order after linking
    assert_eq!(
        serde_json::Value::Object(export_entities(treatment.entities())),
        json!({
            "seedDispersalStructure": "hook",
            "seedDispersalKeyword": "hooked",
            "seedDispersalStructure_winged": "wing",
            "seedDispersalKeyword_winged": "winged",
        })
    );

    let output = pipeline.extractor(&table).unwrap().extract("Seeds winged or hooked.");
    assert_eq!(output.dispersal.traits.get("wing"), Some(1));
    assert_eq!(output.dispersal.traits.get("hook"), Some(1));
    assert_eq!(output.dispersal.keywords_found, vec!["hooked", "winged"]);
    assert!(output.properties.is_empty());
}

#[test]
fn treatment_without_traits_is_empty() {
    let table = shipped_table();
    let output = Pipeline::standard()
        .extractor(&table)
        .unwrap()
        .extract("Leaves opposite, ovate.");

    assert!(output.dispersal.traits.is_empty());
    assert!(output.dispersal.keywords_found.is_empty());
    assert!(output.properties.is_empty());
}

#[test]
fn missing_tables_degrade_to_no_traits() {
    let table = TermTable::empty();
    let output = Pipeline::standard()
        .extractor(&table)
        .unwrap()
        .extract("Seeds winged.");
    assert!(output.dispersal.traits.is_empty());
}

#[test]
fn abbreviations_do_not_split_sentences() {
    let table = shipped_table();
    let output = Pipeline::standard()
        .extractor(&table)
        .unwrap()
        .extract("Achenes ca. 3 mm, winged.");

    assert_eq!(
        serde_json::to_value(&output.dispersal).unwrap(),
        json!({
            "keywords_found": ["achenes", "winged"],
            "traits": {"wing": 1, "fruitType": "achene"},
        })
    );
}

#[test]
fn adjacent_unrelated_terms_each_resolve() {
    let table = shipped_table();
    let output = Pipeline::standard()
        .extractor(&table)
        .unwrap()
        .extract("Seeds arillate winged.");

    assert_eq!(
        serde_json::to_value(&output.dispersal).unwrap(),
        json!({
            "keywords_found": ["arillate", "winged"],
            "traits": {"wing": 1, "fleshy_reward": 1, "elaiosome": 1},
        })
    );
}

#[test]
fn first_fruit_type_in_text_wins() {
    let table = shipped_table();
    let output = Pipeline::standard()
        .extractor(&table)
        .unwrap()
        .extract("Fruit a samara; fruit an achene.");

    assert_eq!(output.dispersal.traits.fruit_type.as_deref(), Some("samara"));
    assert_eq!(output.dispersal.traits.get("wing"), Some(1));
    assert_eq!(output.dispersal.keywords_found, vec!["achene", "samara"]);
}
