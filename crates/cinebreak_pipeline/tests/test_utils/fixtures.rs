//! Screenplay fixtures and canned model responses.

use super::mock_transport::{MockResponse, request_text};
use cinebreak_core::{
    BreakdownDocument, Character, CharacterRole, Scene, SceneNumber, ScriptInput, Shot,
    StructuredRequest,
};
use serde_json::json;

pub const SCRIPT: &str = "INT. IGREJA - NOITE\nMARIA, de vestido vermelho, hesita no altar.\n\n\
EXT. RUA - NOITE\nMARIA corre. JUANA observa da janela.\n\n\
INT. CASA - DIA\nMARIA e o PADRE JOÃO conversam.";

pub fn script() -> ScriptInput {
    ScriptInput::text(SCRIPT)
}

/// A valid structure analysis response for [`SCRIPT`].
pub fn structure_response() -> String {
    json!({
        "title": "O Casamento",
        "author": "R. Lima",
        "logline": "Uma noiva foge da igreja.",
        "total_scenes": 3,
        "characters_metadata": [
            {"name": "MARIA", "role": "Protagonista", "costume_suggestion": "Woman in her 30s, red dress", "color_palette_hex": "#B22222"},
            {"name": "ANA", "role": "Figuração", "costume_suggestion": "Girl with green scarf", "color_palette_hex": "#00FF00"},
            {"name": "JOÃO", "role": "Elenco de Apoio", "costume_suggestion": "Elderly priest, black cassock", "color_palette_hex": "#000000"}
        ],
        "unique_locations": ["IGREJA", "RUA", "CASA"],
        "scenes": [
            {"scene_number": "1", "header": "INT. IGREJA - NOITE", "location": "IGREJA", "time": "NOITE",
             "characters": ["MARIA"], "props": ["Velas", "Bíblia"], "summary": "Maria hesita no altar.",
             "estimated_duration_mins": 1.5},
            {"scene_number": 2, "header": "EXT. RUA - NOITE", "location": "RUA", "time": "NOITE",
             "characters": ["MARIA", "JUANA"], "props": [], "summary": "Maria corre."},
            {"scene_number": "3", "header": "INT. CASA - DIA", "location": "CASA", "time": "DIA",
             "characters": ["MARIA", "PADRE JOÃO"], "props": ["Xícaras"], "summary": "Maria e o padre conversam."}
        ]
    })
    .to_string()
}

/// A shot list response with `count` shots numbered from 10 in steps of 5.
pub fn shots_response(count: usize, prompt: &str) -> String {
    let shots: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "shot_number": 10 + i * 5,
                "size": "Medium Shot (MS)",
                "angle": "Eye Level",
                "movement": "Static",
                "subject": "Maria",
                "description": format!("Plano {}", i + 1),
                "background_details": "Bancos da igreja",
                "visual_prompt": prompt,
            })
        })
        .collect();
    json!({ "shots": shots }).to_string()
}

pub fn shot(number: u32, prompt: &str, image: Option<&str>) -> Shot {
    Shot {
        shot_number: number,
        size: "Close-Up (CU)".to_string(),
        angle: "Low Angle".to_string(),
        movement: "Dolly In".to_string(),
        subject: "Maria".to_string(),
        description: format!("Ação {}", number),
        background_details: "Vitral".to_string(),
        visual_prompt: prompt.to_string(),
        image_url: image.map(str::to_string),
    }
}

pub fn scene(number: i64, characters: &[&str], shots: Vec<Shot>) -> Scene {
    Scene {
        scene_number: SceneNumber::Number(number),
        header: format!("INT. LOCAL {} - DIA", number),
        location: format!("LOCAL {}", number),
        time: "DIA".to_string(),
        characters: characters.iter().map(|c| c.to_string()).collect(),
        props: vec!["Velas".to_string()],
        summary: format!("Resumo {}", number),
        estimated_duration_minutes: None,
        shots,
        scene_image_url: None,
    }
}

/// Three scenes: MARIA in 0 and 2 (with shots), JUANA alone in 1 (with shots).
pub fn document_with_shots() -> BreakdownDocument {
    BreakdownDocument {
        title: "O Casamento".to_string(),
        scenes: vec![
            scene(
                1,
                &["MARIA"],
                vec![
                    shot(1, "Woman in a red dress at the altar", Some("data:image/png;base64,AAA")),
                    shot(2, "Close on woman in a red dress, candles", Some("data:image/png;base64,BBB")),
                ],
            ),
            scene(
                2,
                &["JUANA"],
                vec![shot(1, "Girl at a window, green scarf", Some("https://img.test/j.png"))],
            ),
            scene(
                3,
                &["MARIA", "PADRE JOÃO"],
                vec![shot(1, "Woman in a red dress talks to a priest", None)],
            ),
        ],
        characters: vec![
            Character::new("MARIA", CharacterRole::Protagonist, "Woman in her 30s, red dress"),
            Character::new("JUANA", CharacterRole::Background, "Girl with green scarf"),
            Character::new("JOÃO", CharacterRole::SupportingCast, "Elderly priest, black cassock"),
        ],
        unique_locations: vec!["LOCAL 1".into(), "LOCAL 2".into(), "LOCAL 3".into()],
        ..Default::default()
    }
}

/// Parse the repair context back into `(shot_number, current_prompt)` pairs.
pub fn context_shots(request: &StructuredRequest) -> Vec<(u32, String)> {
    request_text(request)
        .lines()
        .filter_map(|line| {
            let rest = line.strip_prefix("Shot ")?;
            let (number, rest) = rest.split_once(':')?;
            let prompt = rest.split("[Current Prompt: ").nth(1)?.strip_suffix(']')?;
            Some((number.trim().parse().ok()?, prompt.to_string()))
        })
        .collect()
}

/// Repair responder that rewrites `from` to `to` in every prompt.
pub fn rewrite_responder(
    from: &str,
    to: &str,
) -> impl Fn(&StructuredRequest) -> MockResponse + Send + Sync + 'static {
    let from = from.to_string();
    let to = to.to_string();
    move |request: &StructuredRequest| {
        let updated: Vec<_> = context_shots(request)
            .into_iter()
            .map(|(n, prompt)| json!({"shot_number": n, "visual_prompt": prompt.replace(&from, &to)}))
            .collect();
        MockResponse::Success(json!({ "updated_prompts": updated }).to_string())
    }
}

/// Repair responder that returns every prompt unchanged.
pub fn echo_responder() -> impl Fn(&StructuredRequest) -> MockResponse + Send + Sync + 'static {
    |request: &StructuredRequest| {
        let updated: Vec<_> = context_shots(request)
            .into_iter()
            .map(|(n, prompt)| json!({"shot_number": n, "visual_prompt": prompt}))
            .collect();
        MockResponse::Success(json!({ "updated_prompts": updated }).to_string())
    }
}
