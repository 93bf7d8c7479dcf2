//! Character design resolvers: face sheet, body sheet, outfit sheet, pose.

use promptsmith_template::Variables;

use super::{common, set_non_empty};
use crate::escape::{escape_yaml, file_name, newlines_to_comma};
use crate::state::AppState;

pub(super) fn face_sheet(state: &AppState) -> Variables {
    let mut vars = common(state);
    let Some(settings) = &state.face_sheet else {
        return vars;
    };

    let name = if settings.character_name.is_empty() {
        "Character"
    } else {
        settings.character_name.as_str()
    };
    vars.set("character_name", escape_yaml(name));
    vars.set(
        "character_description",
        newlines_to_comma(&settings.appearance_description),
    );
    vars.set("expression", "neutral expression");
    set_style_info(&mut vars, state);
    set_image(&mut vars, "reference_image_path", &settings.reference_image_path);
    vars
}

pub(super) fn body_sheet(state: &AppState) -> Variables {
    let mut vars = common(state);
    let Some(settings) = &state.body_sheet else {
        return vars;
    };

    set_image(&mut vars, "face_sheet_path", &settings.face_sheet_image_path);
    vars.set("body_type", settings.body_type.as_str());
    vars.set("bust_feature", settings.bust_feature.as_str());
    vars.set("render_type", settings.render_type.as_str());
    set_non_empty(
        &mut vars,
        "additional_description",
        newlines_to_comma(&settings.additional_description),
    );
    set_style_info(&mut vars, state);
    vars
}

pub(super) fn outfit_sheet(state: &AppState) -> Variables {
    let mut vars = common(state);
    let Some(settings) = &state.outfit else {
        return vars;
    };

    set_image(&mut vars, "body_sheet_path", &settings.body_sheet_image_path);

    let reference_mode = !settings.use_outfit_builder;
    vars.set("is_reference_mode", reference_mode);
    if reference_mode {
        vars.set(
            "outfit_image_path",
            escape_yaml(&file_name(&settings.reference_outfit_image_path)),
        );
        vars.set("fit_mode", settings.fit_mode.as_str());
        vars.set("include_headwear", settings.include_headwear);
        set_non_empty(
            &mut vars,
            "reference_description",
            newlines_to_comma(&settings.reference_description),
        );
    } else {
        vars.set("outfit_category", settings.outfit_category.as_str());
        vars.set("outfit_shape", settings.outfit_shape.as_str());
        vars.set("outfit_color", settings.outfit_color.as_str());
        vars.set("outfit_pattern", settings.outfit_pattern.as_str());
        vars.set("outfit_style", settings.outfit_style.as_str());
    }

    set_non_empty(
        &mut vars,
        "additional_description",
        newlines_to_comma(&settings.additional_description),
    );
    vars
}

pub(super) fn pose(state: &AppState) -> Variables {
    let mut vars = common(state);
    let Some(settings) = &state.pose else {
        return vars;
    };

    set_image(&mut vars, "outfit_sheet_path", &settings.outfit_sheet_image_path);

    vars.set("is_reference_mode", settings.use_pose_capture);
    if settings.use_pose_capture {
        vars.set(
            "pose_image_path",
            escape_yaml(&file_name(&settings.pose_reference_image_path)),
        );
    } else {
        vars.set("pose_preset", settings.preset.as_str());
    }

    vars.set("eye_line", settings.eye_line.as_str());
    vars.set("expression", settings.expression.as_str());
    set_non_empty(
        &mut vars,
        "expression_detail",
        escape_yaml(settings.expression_detail.trim()),
    );
    set_non_empty(
        &mut vars,
        "action_description",
        escape_yaml(settings.action_description.trim()),
    );

    vars.set("include_effects", settings.include_effects);
    vars.set("transparent_background", settings.transparent_background);
    vars.set("wind_effect", settings.wind_effect.as_str());
    vars
}

fn set_style_info(vars: &mut Variables, state: &AppState) {
    let info = state.output_style.style_info();
    vars.set("style_info_style", info.style);
    vars.set("style_info_proportions", info.proportions);
    vars.set("style_info_description", info.description);
}

/// Binds the escaped file name of `path` when there is one.
fn set_image(vars: &mut Variables, name: &str, path: &str) {
    let file = file_name(path);
    if !file.is_empty() {
        vars.set(name, escape_yaml(&file));
    }
}
