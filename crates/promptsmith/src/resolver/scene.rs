//! Scene resolvers: scene builder, background, four-panel comic.

use promptsmith_template::{record, Record, Variables};

use super::{common, set_non_empty};
use crate::escape::{escape_yaml, file_name, newlines_to_comma};
use crate::state::{AppState, FourPanelCharacter, FourPanelSettings, Speaker};

const PANEL_LABELS: [&str; 4] = ["introduction", "development", "twist", "conclusion"];

pub(super) fn scene_builder(state: &AppState) -> Variables {
    let mut vars = common(state);
    let Some(settings) = &state.scene_builder else {
        return vars;
    };

    vars.set("scene_type", settings.scene_type.as_str());
    let background = file_name(&settings.background_image_path);
    if !background.is_empty() {
        vars.set("background_image_path", escape_yaml(&background));
    }
    set_non_empty(
        &mut vars,
        "scene_description",
        newlines_to_comma(&settings.scene_description),
    );

    let characters: Vec<Record> = settings
        .characters
        .iter()
        .filter(|c| !c.name.is_empty() || !c.image_path.is_empty())
        .map(|c| {
            record! {
                "name" => escape_yaml(&c.name),
                "image" => escape_yaml(&file_name(&c.image_path)),
                "description" => newlines_to_comma(&c.description),
            }
        })
        .collect();
    vars.set("character_count", characters.len());
    vars.set("characters", characters);

    set_non_empty(&mut vars, "narration", escape_yaml(&settings.narration));
    vars
}

pub(super) fn background(state: &AppState) -> Variables {
    let mut vars = common(state);
    let Some(settings) = &state.background else {
        return vars;
    };

    let use_reference = settings.uses_reference();
    vars.set("use_reference", use_reference);
    if use_reference {
        vars.set(
            "reference_image_path",
            escape_yaml(&file_name(&settings.reference_image_path)),
        );
    }
    vars.set("background_description", escape_yaml(&settings.description));
    vars
}

pub(super) fn four_panel(state: &AppState) -> Variables {
    let mut vars = common(state);
    let Some(settings) = &state.four_panel else {
        return vars;
    };

    let characters: Vec<Record> = [(1, &settings.character1), (2, &settings.character2)]
        .into_iter()
        .filter(|(_, c)| !c.name.is_empty() || !c.image_path.is_empty())
        .map(|(slot, c)| {
            let reference = match file_name(&c.image_path) {
                file if file.is_empty() => format!("see attached image {slot}"),
                file => format!("see attached image {slot} ({file})"),
            };
            record! {
                "name" => escape_yaml(&character_name(slot, c)),
                "reference" => reference,
                "description" => newlines_to_comma(&c.description),
            }
        })
        .collect();
    vars.set("characters", characters);

    let panels: Vec<Record> = settings
        .panels
        .iter()
        .enumerate()
        .map(|(index, panel)| {
            let label = PANEL_LABELS
                .get(index)
                .map(|label| label.to_string())
                .unwrap_or_else(|| (index + 1).to_string());

            let speeches: Vec<Record> = panel
                .speeches
                .iter()
                .filter(|speech| !speech.text.is_empty())
                .filter_map(|speech| {
                    let name = speaker_name(speech.speaker, settings)?;
                    Some(record! {
                        "character" => escape_yaml(&name),
                        "content" => escape_yaml(&speech.text),
                        "position" => speech.position.as_str(),
                    })
                })
                .collect();

            let mut entry = record! {
                "panel_number" => index + 1,
                "label" => label,
                "prompt" => newlines_to_comma(&panel.scene),
                "speeches" => speeches,
            };
            if !panel.narration.is_empty() {
                entry.insert("narration".into(), escape_yaml(&panel.narration).into());
            }
            entry
        })
        .collect();
    vars.set("panel_count", panels.len());
    vars.set("panels", panels);
    vars
}

fn character_name(slot: usize, character: &FourPanelCharacter) -> String {
    if character.name.is_empty() {
        format!("Character {slot}")
    } else {
        character.name.clone()
    }
}

fn speaker_name(speaker: Speaker, settings: &FourPanelSettings) -> Option<String> {
    match speaker {
        Speaker::None => None,
        Speaker::Character1 => Some(character_name(1, &settings.character1)),
        Speaker::Character2 => Some(character_name(2, &settings.character2)),
    }
}
