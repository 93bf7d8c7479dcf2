//! Built-in output kinds and their selection keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::state::{AppState, SceneType};

/// A kind of document the engine can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    FaceSheet,
    BodySheet,
    OutfitSheet,
    Pose,
    SceneBuilder,
    Background,
    DecorativeText,
    FourPanel,
    StyleTransform,
    Infographic,
}

impl OutputKind {
    /// All kinds, in menu order.
    pub const ALL: [OutputKind; 10] = [
        OutputKind::FaceSheet,
        OutputKind::BodySheet,
        OutputKind::OutfitSheet,
        OutputKind::Pose,
        OutputKind::SceneBuilder,
        OutputKind::Background,
        OutputKind::DecorativeText,
        OutputKind::FourPanel,
        OutputKind::StyleTransform,
        OutputKind::Infographic,
    ];

    /// The catalog key for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputKind::FaceSheet => "face_sheet",
            OutputKind::BodySheet => "body_sheet",
            OutputKind::OutfitSheet => "outfit_sheet",
            OutputKind::Pose => "pose",
            OutputKind::SceneBuilder => "scene_builder",
            OutputKind::Background => "background",
            OutputKind::DecorativeText => "decorative_text",
            OutputKind::FourPanel => "four_panel",
            OutputKind::StyleTransform => "style_transform",
            OutputKind::Infographic => "infographic",
        }
    }

    /// Every selection key this kind can map to.
    pub fn selection_keys(&self) -> &'static [&'static str] {
        match self {
            OutputKind::OutfitSheet => &["outfit_sheet_preset", "outfit_sheet_reference"],
            OutputKind::Pose => &["pose_preset", "pose_reference"],
            OutputKind::SceneBuilder => &[
                "scene_builder_story",
                "scene_builder_battle",
                "scene_builder_boss_raid",
            ],
            OutputKind::Background => &["background_with_reference", "background_without_reference"],
            OutputKind::StyleTransform => &["style_transform_normal", "style_transform_transparent"],
            OutputKind::FaceSheet => &["face_sheet"],
            OutputKind::BodySheet => &["body_sheet"],
            OutputKind::DecorativeText => &["decorative_text"],
            OutputKind::FourPanel => &["four_panel"],
            OutputKind::Infographic => &["infographic"],
        }
    }

    /// Picks the selection key for the current mode of this kind.
    pub fn selection_key(&self, state: &AppState) -> &'static str {
        match self {
            OutputKind::OutfitSheet => {
                let reference = state.outfit.as_ref().is_some_and(|o| !o.use_outfit_builder);
                if reference {
                    "outfit_sheet_reference"
                } else {
                    "outfit_sheet_preset"
                }
            }
            OutputKind::Pose => {
                let reference = state.pose.as_ref().is_some_and(|p| p.use_pose_capture);
                if reference {
                    "pose_reference"
                } else {
                    "pose_preset"
                }
            }
            OutputKind::SceneBuilder => {
                let scene_type = state
                    .scene_builder
                    .as_ref()
                    .map(|s| s.scene_type)
                    .unwrap_or_default();
                match scene_type {
                    SceneType::Story => "scene_builder_story",
                    SceneType::Battle => "scene_builder_battle",
                    SceneType::BossRaid => "scene_builder_boss_raid",
                }
            }
            OutputKind::Background => {
                let reference = state.background.as_ref().is_some_and(|b| b.uses_reference());
                if reference {
                    "background_with_reference"
                } else {
                    "background_without_reference"
                }
            }
            OutputKind::StyleTransform => {
                let transparent = state
                    .style_transform
                    .as_ref()
                    .is_some_and(|s| s.transparent_background);
                if transparent {
                    "style_transform_transparent"
                } else {
                    "style_transform_normal"
                }
            }
            other => other.as_str(),
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().replace('-', "_");
        OutputKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| Error::UnknownOutputType(s.to_string()))
    }
}
