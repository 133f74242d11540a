//! System instructions and context blocks for each stage.

use cinebreak_core::{Character, Scene, SceneNumber, Shot};

/// Instruction for structure analysis.
pub fn structure_instruction(language: &str) -> String {
    format!(
        r#"Atue como um experiente 1º Assistente de Direção (AD) e Diretor de Arte.

TAREFA: Analisar o roteiro para estruturar a produção.
IDIOMA DE SAÍDA: **{language}**.

CLASSIFICAÇÃO DE ELENCO (Use estritamente estes termos):
- **Protagonista**: Personagens principais.
- **Elenco de Apoio**: Personagens com falas ou relevância, mas secundários.
- **Figuração**: Personagens de fundo, sem nome próprio ou falas relevantes.

INSTRUÇÕES CRÍTICAS DE INFERÊNCIA:
1. **Objetos de Cena (Props):** Não liste apenas o que está escrito. Deduza objetos lógicos pelo contexto.
   - Ex: Se é uma "Igreja/Casamento", inclua: "Bíblia, Velas, Cálice, Flores de Altar".
2. **Figurino & Aparência:**
   - Descreva o figurino completo E características físicas marcantes.
   - Ex: "Padre idoso, barba branca, batina cerimonial preta com dourado, Estola bordada".

Se o input for PDF, extraia as cenas mesmo com formatação quebrada."#
    )
}

/// Character block for shot generation: `NAME (actor): costume`, one per line.
pub fn cast_block(characters: &[&Character], actor_placeholder: &str) -> String {
    characters
        .iter()
        .map(|c| {
            format!(
                "{} ({}): {}",
                c.name,
                c.actor_name
                    .as_deref()
                    .filter(|a| !a.trim().is_empty())
                    .unwrap_or(actor_placeholder),
                c.costume_description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Instruction for shot generation of one scene.
pub fn shots_instruction(
    scene_number: &SceneNumber,
    scene: &Scene,
    cast_block: &str,
    language: &str,
) -> String {
    format!(
        r#"Atue como um Diretor de Fotografia (DoP).
TAREFA: Criar a DECUPAGEM (Shot List) para a CENA {scene_number}.

IDIOMA:
- description, subject: {language}.
- visual_prompt: INGLÊS.

CONTEXTO DA CENA:
Header: {header}
Resumo: {summary}
Objetos: {props}

**CONSISTÊNCIA VISUAL DE PERSONAGENS (CRÍTICO):**
Use estas descrições exatas para gerar o 'visual_prompt':
{cast_block}

INSTRUÇÕES:
1. No 'visual_prompt', SEMPRE descreva o personagem baseado na lista acima (roupas, aparência) para manter consistência entre planos.
2. Se houver objetos (props) importantes, inclua-os no prompt visual."#,
        header = scene.header,
        summary = scene.summary,
        props = scene.props.join(", "),
    )
}

/// Text payload used when the original screenplay is not available.
pub fn scene_payload(scene: &Scene) -> String {
    format!("Scene: {}\nSummary: {}", scene.header, scene.summary)
}

/// Image prompt for a scene's master concept art.
pub fn scene_concept_prompt(scene: &Scene) -> String {
    format!(
        "Wide master shot concept art for a movie scene. Location: {}. Time: {}. Mood/Action: {}. Cinematic composition, highly detailed.",
        scene.location, scene.time, scene.summary
    )
}

/// Image prompt for a character portrait, built from the registry entry.
pub fn character_portrait_prompt(character: &Character) -> String {
    format!(
        "Cinematic portrait, {}, {}, full figure showing the costume, professional film production still, dramatic lighting, high quality, detailed",
        character.name, character.costume_description
    )
}

/// Character block for consistency repair: `NAME: costume`, one per line.
pub fn appearance_block(characters: &[&Character]) -> String {
    characters
        .iter()
        .map(|c| format!("{}: {}", c.name, c.costume_description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Current shots as repair context, one line per shot.
pub fn shots_context(shots: &[Shot]) -> String {
    shots
        .iter()
        .map(|s| {
            format!(
                "Shot {}: [Action: {}] [Current Prompt: {}]",
                s.shot_number, s.description, s.visual_prompt
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Instruction for consistency repair.
pub fn repair_instruction(appearance_block: &str) -> String {
    format!(
        r#"TASK: Rewrite the 'visual_prompt' (English) for the provided shots to MATCH the UPDATED character descriptions exactly.

UPDATED CHARACTER DESCRIPTIONS (Apply these strictly):
{appearance_block}

INSTRUCTIONS:
1. Keep the original camera angle, shot size, and action/subject described in the shot.
2. ONLY update the physical appearance and clothing of the characters in the 'visual_prompt' to match the "UPDATED CHARACTER DESCRIPTIONS".
3. Return a JSON with the updated visual_prompt for each shot_number."#
    )
}
