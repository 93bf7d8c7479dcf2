//! Graphic resolvers: decorative text, style transform, infographic.

use promptsmith_template::{record, Record, Variables};

use super::common;
use crate::escape::{escape_yaml, file_name};
use crate::state::AppState;

pub(super) fn decorative_text(state: &AppState) -> Variables {
    let mut vars = common(state);
    let Some(settings) = &state.decorative_text else {
        return vars;
    };

    vars.set("text_content", escape_yaml(&settings.text));
    vars.set("text_type", settings.text_type.as_str());
    vars.set("transparent_background", settings.transparent_background);
    vars
}

pub(super) fn style_transform(state: &AppState) -> Variables {
    let mut vars = common(state);
    let Some(settings) = &state.style_transform else {
        return vars;
    };

    let source = file_name(&settings.source_image_path);
    if !source.is_empty() {
        vars.set("source_image_path", escape_yaml(&source));
    }
    vars.set("transform_type", settings.transform_type.as_str());
    vars.set("transparent_background", settings.transparent_background);
    vars.set(
        "output_background",
        if settings.transparent_background {
            "transparent"
        } else {
            "white"
        },
    );
    vars
}

pub(super) fn infographic(state: &AppState) -> Variables {
    let mut vars = common(state);
    let Some(settings) = &state.infographic else {
        return vars;
    };

    vars.set("infographic_style", settings.infographic_style.as_str());
    vars.set("output_language", settings.output_language.as_str());
    vars.set("main_title", escape_yaml(&settings.main_title));
    vars.set("subtitle", escape_yaml(&settings.subtitle));

    let main = file_name(&settings.main_character_image_path);
    if !main.is_empty() {
        vars.set("main_character_image_path", escape_yaml(&main));
    }
    let sub = file_name(&settings.sub_character_image_path);
    vars.set("sub_character_enabled", !sub.is_empty());
    if !sub.is_empty() {
        vars.set("sub_character_image_path", escape_yaml(&sub));
    }

    // Half-filled sections are dropped.
    let sections: Vec<Record> = settings
        .sections
        .iter()
        .filter(|s| !s.title.is_empty() && !s.content.is_empty())
        .map(|s| {
            record! {
                "title" => escape_yaml(&s.title),
                "content" => escape_yaml(&s.content),
            }
        })
        .collect();
    vars.set("info_sections", sections);
    vars
}
