use cinebreak_core::{BreakdownDocument, CharacterRole, SceneNumber};

const PROJECT: &str = r##"{
  "title": "O Casamento",
  "author": "R. Lima",
  "logline": "Uma noiva foge da igreja.",
  "total_scenes": 2,
  "scenes": [
    {
      "scene_number": 1,
      "header": "INT. IGREJA - NOITE",
      "location": "IGREJA",
      "time": "NOITE",
      "characters": ["MARIA", "PADRE JOÃO"],
      "props": ["velas", "bíblia"],
      "summary": "Maria hesita no altar.",
      "estimated_duration_mins": 1.5,
      "shots": [
        {
          "shot_number": 1,
          "size": "Wide Shot (WS)",
          "angle": "Eye Level",
          "movement": "Static",
          "subject": "Maria",
          "description": "Maria caminha até o altar.",
          "background_details": "Bancos cheios",
          "visual_prompt": "Woman in a red dress walking down a church aisle",
          "imageUrl": "data:image/png;base64,AAAA"
        }
      ]
    },
    {
      "scene_number": "2A",
      "header": "EXT. RUA - NOITE",
      "location": "RUA",
      "time": "NOITE",
      "characters": ["MARIA"],
      "props": [],
      "summary": "Maria corre pela rua."
    }
  ],
  "characters_metadata": [
    {
      "name": "MARIA",
      "role": "Protagonista",
      "costume_suggestion": "Woman in her 30s, red dress",
      "color_palette_hex": "#B22222",
      "actor_name": "Ana Souza",
      "portraitUrl": "https://img.test/maria.png"
    },
    {
      "name": "PADRE JOÃO",
      "role": "Elenco de Apoio",
      "costume_suggestion": "Elderly priest, black cassock",
      "color_palette_hex": "#000000"
    }
  ],
  "unique_locations": ["IGREJA", "RUA"],
  "production_notes": {"budget": "low"}
}"##;

#[test]
fn project_file_round_trip_is_lossless() {
    let doc = BreakdownDocument::from_json(PROJECT).unwrap();
    let json = doc.to_json().unwrap();
    let reloaded = BreakdownDocument::from_json(&json).unwrap();
    assert_eq!(doc, reloaded);

    let original: serde_json::Value = serde_json::from_str(PROJECT).unwrap();
    let written: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(original["production_notes"], written["production_notes"]);
}

#[test]
fn missing_shots_load_as_empty() {
    let doc = BreakdownDocument::from_json(PROJECT).unwrap();
    assert!(doc.scenes[1].shots.is_empty());
    assert_eq!(doc.scenes_with_shots(), vec![0]);
    assert_eq!(doc.shot_count(), 1);

    let json = doc.to_json().unwrap();
    let written: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(written["scenes"][1]["shots"], serde_json::json!([]));
}

#[test]
fn absent_optionals_stay_absent() {
    let doc = BreakdownDocument::from_json(PROJECT).unwrap();
    let written: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

    let second = &written["scenes"][1];
    assert!(second.get("estimated_duration_mins").is_none());
    assert!(second.get("sceneImageUrl").is_none());

    let priest = &written["characters_metadata"][1];
    assert!(priest.get("actor_name").is_none());
    assert!(priest.get("contract_status").is_none());
    assert!(priest.get("portraitUrl").is_none());
}

#[test]
fn portraits_are_kept() {
    let doc = BreakdownDocument::from_json(PROJECT).unwrap();
    let maria = doc.character("MARIA").unwrap();
    assert_eq!(maria.portrait_url.as_deref(), Some("https://img.test/maria.png"));

    let written: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
    assert_eq!(
        written["characters_metadata"][0]["portraitUrl"],
        serde_json::json!("https://img.test/maria.png")
    );
}

#[test]
fn scene_numbers_keep_their_form() {
    let doc = BreakdownDocument::from_json(PROJECT).unwrap();
    assert_eq!(doc.scenes[0].scene_number, SceneNumber::Number(1));
    assert_eq!(doc.scenes[1].scene_number, SceneNumber::Label("2A".into()));
    assert_eq!(doc.scenes[1].scene_number.to_string(), "2A");

    let written: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
    assert_eq!(written["scenes"][0]["scene_number"], serde_json::json!(1));
    assert_eq!(written["scenes"][1]["scene_number"], serde_json::json!("2A"));
}

#[test]
fn registry_lookup_is_case_sensitive() {
    let doc = BreakdownDocument::from_json(PROJECT).unwrap();
    assert!(doc.character("MARIA").is_some());
    assert!(doc.character("Maria").is_none());
    assert_eq!(doc.character("PADRE JOÃO").unwrap().role, CharacterRole::SupportingCast);
}

#[test]
fn missing_scenes_is_rejected() {
    let result = BreakdownDocument::from_json(r#"{"title": "Sem cenas"}"#);
    assert!(result.is_err());
}

#[test]
fn minimal_document_uses_defaults() {
    let doc = BreakdownDocument::from_json(r#"{"scenes": []}"#).unwrap();
    assert_eq!(doc.title, "");
    assert!(doc.total_scenes.is_none());
    assert!(doc.unique_locations.is_empty());
    assert!(doc.extensions.is_empty());
}
