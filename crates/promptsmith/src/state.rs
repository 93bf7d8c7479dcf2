//! Application state consumed by the resolvers.
//!
//! [`AppState`] is the plain-data snapshot of everything a user has entered:
//! the shared document settings plus one optional settings block per output
//! kind. Every type here deserializes from JSON or YAML with defaults for
//! omitted fields, so a state file only needs the fields it cares about:
//!
//! ```
//! use promptsmith::{AppState, ColorMode};
//!
//! let state: AppState = serde_json::from_str(r#"{
//!     "title": "Demo",
//!     "color_mode": "monochrome",
//!     "face_sheet": { "character_name": "Aki" }
//! }"#).unwrap();
//!
//! assert_eq!(state.color_mode, ColorMode::Monochrome);
//! assert_eq!(state.face_sheet.unwrap().character_name, "Aki");
//! ```

use serde::{Deserialize, Serialize};

/// Everything the resolvers read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub title: String,
    pub author: String,
    pub color_mode: ColorMode,
    pub duotone_color: DuotoneColor,
    pub output_style: OutputStyle,
    pub aspect_ratio: AspectRatio,
    /// Render the title (and author) into the image.
    pub include_title_in_image: bool,

    pub face_sheet: Option<FaceSheetSettings>,
    pub body_sheet: Option<BodySheetSettings>,
    pub outfit: Option<OutfitSettings>,
    pub pose: Option<PoseSettings>,
    pub scene_builder: Option<SceneBuilderSettings>,
    pub background: Option<BackgroundSettings>,
    pub decorative_text: Option<DecorativeTextSettings>,
    pub four_panel: Option<FourPanelSettings>,
    pub style_transform: Option<StyleTransformSettings>,
    pub infographic: Option<InfographicSettings>,
}

// ============================================================================
// Shared settings
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    #[default]
    Fullcolor,
    Monochrome,
    Sepia,
    Duotone,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Fullcolor => "fullcolor",
            ColorMode::Monochrome => "monochrome",
            ColorMode::Sepia => "sepia",
            ColorMode::Duotone => "duotone",
        }
    }

    pub fn is_duotone(&self) -> bool {
        matches!(self, ColorMode::Duotone)
    }
}

/// Ink pairing for duotone printing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuotoneColor {
    #[default]
    RedBlack,
    BlueBlack,
    GreenBlack,
    PurpleBlack,
    OrangeBlack,
}

impl DuotoneColor {
    /// Prompt fragment describing the print style.
    pub fn prompt(&self) -> &'static str {
        match self {
            DuotoneColor::RedBlack => "red and black duotone, two-color print, manga style",
            DuotoneColor::BlueBlack => "blue and black duotone, two-color print, manga style",
            DuotoneColor::GreenBlack => "green and black duotone, two-color print, manga style",
            DuotoneColor::PurpleBlack => "purple and black duotone, two-color print, manga style",
            DuotoneColor::OrangeBlack => "orange and black duotone, two-color print, manga style",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputStyle {
    #[default]
    Anime,
    PixelArt,
    Chibi,
    Realistic,
    Watercolor,
    OilPainting,
}

/// Character rendering hints derived from an [`OutputStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleInfo {
    pub style: &'static str,
    pub proportions: &'static str,
    pub description: &'static str,
}

impl OutputStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputStyle::Anime => "anime",
            OutputStyle::PixelArt => "pixel_art",
            OutputStyle::Chibi => "chibi",
            OutputStyle::Realistic => "realistic",
            OutputStyle::Watercolor => "watercolor",
            OutputStyle::OilPainting => "oil_painting",
        }
    }

    pub fn style_info(&self) -> StyleInfo {
        match self {
            OutputStyle::Anime => StyleInfo {
                style: "Japanese anime style",
                proportions: "standard anime proportions, about 7 heads tall",
                description: "clean cel shading, crisp linework, vivid colors",
            },
            OutputStyle::PixelArt => StyleInfo {
                style: "pixel art",
                proportions: "sprite proportions, about 3 heads tall",
                description: "limited palette, hard pixel edges, no anti-aliasing",
            },
            OutputStyle::Chibi => StyleInfo {
                style: "chibi, super deformed",
                proportions: "2 heads tall, big head, small body",
                description: "round soft shapes, simplified features, cute expression",
            },
            OutputStyle::Realistic => StyleInfo {
                style: "realistic illustration",
                proportions: "realistic human proportions, about 8 heads tall",
                description: "natural lighting, detailed textures, photographic depth",
            },
            OutputStyle::Watercolor => StyleInfo {
                style: "watercolor painting",
                proportions: "standard illustration proportions",
                description: "soft washes, bleeding edges, paper texture",
            },
            OutputStyle::OilPainting => StyleInfo {
                style: "oil painting",
                proportions: "classical painting proportions",
                description: "thick brush strokes, rich color layering, canvas texture",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Wide16x9,
    #[serde(rename = "9:16")]
    Tall9x16,
    #[serde(rename = "4:3")]
    Standard4x3,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "3:1")]
    UltraWide3x1,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Wide16x9 => "16:9",
            AspectRatio::Tall9x16 => "9:16",
            AspectRatio::Standard4x3 => "4:3",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::UltraWide3x1 => "3:1",
        }
    }
}

// ============================================================================
// Per-kind settings
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceSheetSettings {
    pub character_name: String,
    pub appearance_description: String,
    pub reference_image_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodySheetSettings {
    pub face_sheet_image_path: String,
    pub body_type: String,
    pub bust_feature: String,
    pub render_type: String,
    pub additional_description: String,
}

impl Default for BodySheetSettings {
    fn default() -> Self {
        Self {
            face_sheet_image_path: String::new(),
            body_type: "female_standard".into(),
            bust_feature: "auto".into(),
            render_type: "silhouette".into(),
            additional_description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutfitSettings {
    pub body_sheet_image_path: String,
    /// Preset mode when `true`, reference-image mode when `false`.
    pub use_outfit_builder: bool,
    pub reference_outfit_image_path: String,
    pub fit_mode: String,
    pub include_headwear: bool,
    pub reference_description: String,
    pub outfit_category: String,
    pub outfit_shape: String,
    pub outfit_color: String,
    pub outfit_pattern: String,
    pub outfit_style: String,
    pub additional_description: String,
}

impl Default for OutfitSettings {
    fn default() -> Self {
        Self {
            body_sheet_image_path: String::new(),
            use_outfit_builder: true,
            reference_outfit_image_path: String::new(),
            fit_mode: "base_body".into(),
            include_headwear: true,
            reference_description: String::new(),
            outfit_category: "casual".into(),
            outfit_shape: "t-shirt and jeans".into(),
            outfit_color: "auto".into(),
            outfit_pattern: "solid".into(),
            outfit_style: "auto".into(),
            additional_description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseSettings {
    pub outfit_sheet_image_path: String,
    /// Reference-image mode when `true`.
    pub use_pose_capture: bool,
    pub pose_reference_image_path: String,
    pub preset: String,
    pub eye_line: String,
    pub expression: String,
    pub expression_detail: String,
    pub action_description: String,
    pub include_effects: bool,
    pub transparent_background: bool,
    pub wind_effect: String,
}

impl Default for PoseSettings {
    fn default() -> Self {
        Self {
            outfit_sheet_image_path: String::new(),
            use_pose_capture: false,
            pose_reference_image_path: String::new(),
            preset: "standing".into(),
            eye_line: "front".into(),
            expression: "neutral".into(),
            expression_detail: String::new(),
            action_description: String::new(),
            include_effects: false,
            transparent_background: false,
            wind_effect: "none".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneType {
    #[default]
    Story,
    Battle,
    BossRaid,
}

impl SceneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneType::Story => "story",
            SceneType::Battle => "battle",
            SceneType::BossRaid => "boss_raid",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneBuilderSettings {
    pub scene_type: SceneType,
    pub background_image_path: String,
    pub scene_description: String,
    pub characters: Vec<SceneCharacter>,
    pub narration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneCharacter {
    pub name: String,
    pub image_path: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundSettings {
    pub use_reference_image: bool,
    pub reference_image_path: String,
    pub description: String,
}

impl BackgroundSettings {
    /// A reference is used only when enabled and actually set.
    pub fn uses_reference(&self) -> bool {
        self.use_reference_image && !self.reference_image_path.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorativeTextSettings {
    pub text: String,
    pub text_type: String,
    pub transparent_background: bool,
}

impl Default for DecorativeTextSettings {
    fn default() -> Self {
        Self {
            text: String::new(),
            text_type: "skill_name".into(),
            transparent_background: true,
        }
    }
}

/// Which character speaks a line in a panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    #[default]
    None,
    Character1,
    Character2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Speech {
    pub speaker: Speaker,
    pub text: String,
    pub position: String,
}

impl Default for Speech {
    fn default() -> Self {
        Self {
            speaker: Speaker::None,
            text: String::new(),
            position: "right".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    pub scene: String,
    pub speeches: Vec<Speech>,
    pub narration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FourPanelCharacter {
    pub name: String,
    pub image_path: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FourPanelSettings {
    pub character1: FourPanelCharacter,
    pub character2: FourPanelCharacter,
    pub panels: Vec<PanelSettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleTransformSettings {
    pub source_image_path: String,
    pub transform_type: String,
    pub transparent_background: bool,
}

impl Default for StyleTransformSettings {
    fn default() -> Self {
        Self {
            source_image_path: String::new(),
            transform_type: "chibi".into(),
            transparent_background: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfographicSettings {
    pub infographic_style: String,
    pub output_language: String,
    pub main_title: String,
    pub subtitle: String,
    pub main_character_image_path: String,
    pub sub_character_image_path: String,
    pub sections: Vec<InfoSection>,
}

impl Default for InfographicSettings {
    fn default() -> Self {
        Self {
            infographic_style: "graphic_recording".into(),
            output_language: "english".into(),
            main_title: String::new(),
            subtitle: String::new(),
            main_character_image_path: String::new(),
            sub_character_image_path: String::new(),
            sections: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoSection {
    pub title: String,
    pub content: String,
}
