//! Voice styles offered for the sung rendition.
//!
//! Two vocabularies are accepted: the prebuilt voice names understood by the
//! hosted model (`alnilam`, `charon`, ...) and the descriptive names used in
//! the song catalog (`MaleTenor`, `FemaleAlto`, ...). Both resolve to a
//! [`VoiceStyle`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceStyle {
    #[default]
    Alnilam,
    Charon,
    Aoede,
    Achird,
    Puck,
    Vindemiatrix,
}

impl VoiceStyle {
    pub const ALL: [VoiceStyle; 6] = [
        VoiceStyle::Alnilam,
        VoiceStyle::Charon,
        VoiceStyle::Aoede,
        VoiceStyle::Achird,
        VoiceStyle::Puck,
        VoiceStyle::Vindemiatrix,
    ];

    /// Prebuilt voice name sent to the speech model.
    pub fn voice_name(self) -> &'static str {
        match self {
            VoiceStyle::Alnilam => "alnilam",
            VoiceStyle::Charon => "charon",
            VoiceStyle::Aoede => "aoede",
            VoiceStyle::Achird => "achird",
            VoiceStyle::Puck => "puck",
            VoiceStyle::Vindemiatrix => "vindemiatrix",
        }
    }
}

impl fmt::Display for VoiceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.voice_name())
    }
}

/// Descriptive names mapped onto prebuilt voices.
const DESCRIPTIVE_VOICES: &[(&str, VoiceStyle)] = &[
    ("MaleTenor", VoiceStyle::Alnilam),
    ("MaleBaritone", VoiceStyle::Charon),
    ("FemaleSoprano", VoiceStyle::Aoede),
    ("FemaleAlto", VoiceStyle::Achird),
    ("Childlike", VoiceStyle::Aoede),
    ("Cartoon", VoiceStyle::Puck),
    ("Robot", VoiceStyle::Charon),
    ("AiAssistant", VoiceStyle::Vindemiatrix),
];

impl FromStr for VoiceStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        VoiceStyle::ALL
            .iter()
            .copied()
            .find(|v| v.voice_name().eq_ignore_ascii_case(name))
            .or_else(|| {
                DESCRIPTIVE_VOICES
                    .iter()
                    .find(|(alias, _)| *alias == name)
                    .map(|(_, v)| *v)
            })
            .ok_or_else(|| Error::UnknownVoice(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VoiceCategory {
    Male,
    Female,
    Child,
    Cartoon,
    Robot,
    #[serde(rename = "AI")]
    Ai,
}

/// One entry of the voice picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceOption {
    pub category: VoiceCategory,
    pub voice: VoiceStyle,
    pub label: &'static str,
}

const fn option(category: VoiceCategory, voice: VoiceStyle, label: &'static str) -> VoiceOption {
    VoiceOption {
        category,
        voice,
        label,
    }
}

/// Voice picker contents, grouped by category in display order.
pub const VOICE_CATALOG: &[VoiceOption] = &[
    option(VoiceCategory::Male, VoiceStyle::Alnilam, "Neutral"),
    option(VoiceCategory::Male, VoiceStyle::Charon, "Deep"),
    option(VoiceCategory::Female, VoiceStyle::Aoede, "Expressive"),
    option(VoiceCategory::Female, VoiceStyle::Achird, "Warm"),
    option(VoiceCategory::Child, VoiceStyle::Aoede, "Child-like"),
    option(VoiceCategory::Cartoon, VoiceStyle::Puck, "Cartoon"),
    option(VoiceCategory::Robot, VoiceStyle::Charon, "Robot"),
    option(VoiceCategory::Ai, VoiceStyle::Vindemiatrix, "AI Assistant"),
];

/// Catalog entries of one category.
pub fn voices_in(category: VoiceCategory) -> impl Iterator<Item = &'static VoiceOption> {
    VOICE_CATALOG.iter().filter(move |o| o.category == category)
}
