//! Style configuration: the rewriting styles, their tunable parameters, and the
//! customization string embedded in the rephrase prompt.
//!
//! The rendered field order per style is fixed; changing it changes every prompt.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declares a closed set of form options with a display label per variant.
macro_rules! labelled_options {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

labelled_options!(
    /// The tone/register applied to rewritten text.
    RephraseStyle {
        Formal => "Formal",
        Casual => "Casual",
        Simple => "Simple",
        Academic => "Academic",
        Creative => "Creative",
        Professional => "Professional",
    }
);

impl RephraseStyle {
    pub const ALL: &'static [RephraseStyle] = &[
        RephraseStyle::Formal,
        RephraseStyle::Casual,
        RephraseStyle::Simple,
        RephraseStyle::Academic,
        RephraseStyle::Creative,
        RephraseStyle::Professional,
    ];
}

labelled_options!(Professionalism {
    Business => "Business",
    Legal => "Legal",
    Diplomatic => "Diplomatic",
});

labelled_options!(ReadingLevel {
    Elementary => "Elementary",
    MiddleSchool => "Middle School",
    HighSchool => "High School",
});

labelled_options!(SentenceStructure {
    Simple => "Simple",
    Compound => "Compound",
    Complex => "Complex",
});

labelled_options!(CitationStyle {
    Apa => "APA",
    Mla => "MLA",
    Chicago => "Chicago",
    Harvard => "Harvard",
    Ieee => "IEEE",
});

labelled_options!(TechnicalLevel {
    Undergraduate => "Undergraduate",
    Graduate => "Graduate",
    Doctoral => "Doctoral",
    PostDoctoral => "Post-doctoral",
});

labelled_options!(Discipline {
    Humanities => "Humanities",
    SocialSciences => "Social Sciences",
    NaturalSciences => "Natural Sciences",
    Engineering => "Engineering",
});

labelled_options!(AcademicTone {
    Objective => "Objective",
    Analytical => "Analytical",
    Critical => "Critical",
});

labelled_options!(Voice {
    Active => "Active",
    Passive => "Passive",
    Balanced => "Balanced",
});

labelled_options!(LiteraryDevice {
    Metaphors => "Metaphors",
    Similes => "Similes",
    Personification => "Personification",
    Alliteration => "Alliteration",
});

labelled_options!(NarrativeVoice {
    FirstPerson => "First-person",
    SecondPerson => "Second-person",
    ThirdPerson => "Third-person",
});

/// A 1–5 slider value. Out-of-range values are rejected when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, String> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Level(value))
        } else {
            Err(format!(
                "level must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            ))
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level(3)
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormalParameters {
    pub formality_level: Level,
    pub professionalism: Professionalism,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasualParameters {
    pub informality_level: Level,
    pub include_slang: bool,
    pub use_contractions: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleParameters {
    pub reading_level: ReadingLevel,
    pub sentence_structure: Vec<SentenceStructure>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademicParameters {
    pub citation_style: CitationStyle,
    pub technical_level: TechnicalLevel,
    pub discipline: Discipline,
    pub tone: Vec<AcademicTone>,
    pub voice: Voice,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreativeParameters {
    pub literary_devices: Vec<LiteraryDevice>,
    pub narrative_voice: NarrativeVoice,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfessionalParameters {
    pub industry_jargon_level: Level,
    pub data_focus: bool,
    pub action_oriented: bool,
}

/// The active style and its parameters. Exactly one variant per request; the
/// variant *is* the selected style, so the two can never disagree.
///
/// Wire form is internally tagged: `{"style": "formal", "formality_level": 4}`.
/// Omitted fields take the form defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum StyleParameters {
    Formal(FormalParameters),
    Casual(CasualParameters),
    Simple(SimpleParameters),
    Academic(AcademicParameters),
    Creative(CreativeParameters),
    Professional(ProfessionalParameters),
}

impl StyleParameters {
    /// The parameters a freshly selected style starts with.
    pub fn defaults_for(style: RephraseStyle) -> Self {
        match style {
            RephraseStyle::Formal => StyleParameters::Formal(FormalParameters::default()),
            RephraseStyle::Casual => StyleParameters::Casual(CasualParameters::default()),
            RephraseStyle::Simple => StyleParameters::Simple(SimpleParameters::default()),
            RephraseStyle::Academic => StyleParameters::Academic(AcademicParameters::default()),
            RephraseStyle::Creative => StyleParameters::Creative(CreativeParameters::default()),
            RephraseStyle::Professional => {
                StyleParameters::Professional(ProfessionalParameters::default())
            }
        }
    }

    pub fn style(&self) -> RephraseStyle {
        match self {
            StyleParameters::Formal(_) => RephraseStyle::Formal,
            StyleParameters::Casual(_) => RephraseStyle::Casual,
            StyleParameters::Simple(_) => RephraseStyle::Simple,
            StyleParameters::Academic(_) => RephraseStyle::Academic,
            StyleParameters::Creative(_) => RephraseStyle::Creative,
            StyleParameters::Professional(_) => RephraseStyle::Professional,
        }
    }

    pub fn customizations(&self) -> String {
        match self {
            StyleParameters::Formal(p) => format!(
                "Formality Level: {}, Professionalism: {}",
                p.formality_level, p.professionalism
            ),
            StyleParameters::Casual(p) => format!(
                "Informality Level: {}, Include Slang: {}, Use Contractions: {}",
                p.informality_level,
                flag(p.include_slang),
                flag(p.use_contractions)
            ),
            StyleParameters::Simple(p) => format!(
                "Reading Level: {}, Sentence Structure: {}",
                p.reading_level,
                join_labels(&p.sentence_structure)
            ),
            StyleParameters::Academic(p) => format!(
                "Citation Style: {}, Technical Level: {}, Discipline: {}, Tone: {}, Voice: {}",
                p.citation_style,
                p.technical_level,
                p.discipline,
                join_labels(&p.tone),
                p.voice
            ),
            StyleParameters::Creative(p) => format!(
                "Literary Devices: {}, Narrative Voice: {}",
                join_labels(&p.literary_devices),
                p.narrative_voice
            ),
            StyleParameters::Professional(p) => format!(
                "Industry Jargon Level: {}, Data Focus: {}, Action-Oriented: {}",
                p.industry_jargon_level,
                flag(p.data_focus),
                flag(p.action_oriented)
            ),
        }
    }
}

pub const NO_CUSTOMIZATIONS: &str = "No specific customizations";

/// Renders the customization block for the prompt. `None` means no style is
/// active and yields the fixed fallback text.
pub fn customization_string(params: Option<&StyleParameters>) -> String {
    params
        .map(StyleParameters::customizations)
        .unwrap_or_else(|| NO_CUSTOMIZATIONS.to_string())
}

/// Checkbox values render capitalized.
fn flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn join_labels<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// Form defaults: first option of every select box.
impl Default for Professionalism {
    fn default() -> Self {
        Professionalism::Business
    }
}

impl Default for ReadingLevel {
    fn default() -> Self {
        ReadingLevel::Elementary
    }
}

impl Default for CitationStyle {
    fn default() -> Self {
        CitationStyle::Apa
    }
}

impl Default for TechnicalLevel {
    fn default() -> Self {
        TechnicalLevel::Undergraduate
    }
}

impl Default for Discipline {
    fn default() -> Self {
        Discipline::Humanities
    }
}

impl Default for Voice {
    fn default() -> Self {
        Voice::Active
    }
}

impl Default for NarrativeVoice {
    fn default() -> Self {
        NarrativeVoice::FirstPerson
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(n: u8) -> Level {
        Level::new(n).unwrap()
    }

    #[test]
    fn test_formal_example() {
        let params = StyleParameters::Formal(FormalParameters {
            formality_level: level(3),
            professionalism: Professionalism::Business,
        });
        assert_eq!(
            customization_string(Some(&params)),
            "Formality Level: 3/5, Professionalism: Business"
        );
    }

    #[test]
    fn test_no_style_fallback() {
        assert_eq!(customization_string(None), "No specific customizations");
    }

    #[test]
    fn test_casual_renders_capitalized_flags() {
        let params = StyleParameters::Casual(CasualParameters {
            informality_level: level(5),
            include_slang: true,
            use_contractions: false,
        });
        assert_eq!(
            params.customizations(),
            "Informality Level: 5/5, Include Slang: True, Use Contractions: False"
        );
    }

    #[test]
    fn test_simple_joins_structures_in_order() {
        let params = StyleParameters::Simple(SimpleParameters {
            reading_level: ReadingLevel::MiddleSchool,
            sentence_structure: vec![SentenceStructure::Complex, SentenceStructure::Simple],
        });
        assert_eq!(
            params.customizations(),
            "Reading Level: Middle School, Sentence Structure: Complex, Simple"
        );
    }

    #[test]
    fn test_academic_field_order() {
        let params = StyleParameters::Academic(AcademicParameters {
            citation_style: CitationStyle::Ieee,
            technical_level: TechnicalLevel::PostDoctoral,
            discipline: Discipline::NaturalSciences,
            tone: vec![AcademicTone::Objective, AcademicTone::Critical],
            voice: Voice::Balanced,
        });
        assert_eq!(
            params.customizations(),
            "Citation Style: IEEE, Technical Level: Post-doctoral, Discipline: Natural Sciences, \
             Tone: Objective, Critical, Voice: Balanced"
        );
    }

    #[test]
    fn test_empty_multiselect_renders_empty() {
        let params = StyleParameters::Creative(CreativeParameters {
            literary_devices: vec![],
            narrative_voice: NarrativeVoice::ThirdPerson,
        });
        assert_eq!(
            params.customizations(),
            "Literary Devices: , Narrative Voice: Third-person"
        );
    }

    #[test]
    fn test_professional_field_order() {
        let params = StyleParameters::Professional(ProfessionalParameters {
            industry_jargon_level: level(1),
            data_focus: true,
            action_oriented: true,
        });
        assert_eq!(
            params.customizations(),
            "Industry Jargon Level: 1/5, Data Focus: True, Action-Oriented: True"
        );
    }

    #[test]
    fn test_resolver_is_deterministic_for_every_style() {
        for &style in RephraseStyle::ALL {
            let params = StyleParameters::defaults_for(style);
            let copy = params.clone();
            assert_eq!(params.style(), style);
            assert_eq!(
                customization_string(Some(&params)),
                customization_string(Some(&copy))
            );
            assert_ne!(customization_string(Some(&params)), NO_CUSTOMIZATIONS);
        }
    }

    #[test]
    fn test_defaults_match_fresh_form() {
        assert_eq!(
            StyleParameters::defaults_for(RephraseStyle::Formal).customizations(),
            "Formality Level: 3/5, Professionalism: Business"
        );
        assert_eq!(
            StyleParameters::defaults_for(RephraseStyle::Academic).customizations(),
            "Citation Style: APA, Technical Level: Undergraduate, Discipline: Humanities, Tone: , Voice: Active"
        );
    }

    #[test]
    fn test_tagged_json_with_partial_fields() {
        let params: StyleParameters =
            serde_json::from_str(r#"{"style": "formal", "professionalism": "diplomatic"}"#).unwrap();
        assert_eq!(
            params.customizations(),
            "Formality Level: 3/5, Professionalism: Diplomatic"
        );
    }

    #[test]
    fn test_tagged_json_with_lists() {
        let params: StyleParameters = serde_json::from_str(
            r#"{"style": "creative", "literary_devices": ["similes", "alliteration"], "narrative_voice": "second_person"}"#,
        )
        .unwrap();
        assert_eq!(
            params.customizations(),
            "Literary Devices: Similes, Alliteration, Narrative Voice: Second-person"
        );
    }

    #[test]
    fn test_level_out_of_range_rejected() {
        assert!(Level::new(0).is_err());
        assert!(Level::new(6).is_err());
        let parsed = serde_json::from_str::<StyleParameters>(
            r#"{"style": "professional", "industry_jargon_level": 9}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_unknown_style_rejected() {
        assert!(serde_json::from_str::<StyleParameters>(r#"{"style": "poetic"}"#).is_err());
    }

    #[test]
    fn test_style_labels() {
        let labels: Vec<_> = RephraseStyle::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            labels,
            ["Formal", "Casual", "Simple", "Academic", "Creative", "Professional"]
        );
    }
}
