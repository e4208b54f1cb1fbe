//! Class level table: maps a proficiency tier to its CEFR band and the
//! language constraints handed to the model.

use serde::{Deserialize, Serialize};

/// Proficiency tier of the class, as chosen by the teacher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassLevel {
    Beginner,
    Elementary,
    #[default]
    PreIntermediate,
    Intermediate,
    UpperIntermediate,
    Advanced,
}

/// Language constraints for one class level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelConfig {
    pub level: ClassLevel,
    pub cefr: &'static str,
    pub max_words_per_sentence: u8,
    pub style_guidance: &'static str,
}

/// Ordered lowest to highest tier.
pub static LEVELS: [LevelConfig; 6] = [
    LevelConfig {
        level: ClassLevel::Beginner,
        cefr: "A1",
        max_words_per_sentence: 8,
        style_guidance: "Short, simple sentences. Present tense. Basic vocabulary only. \
            Maximum 8 words per sentence.",
    },
    LevelConfig {
        level: ClassLevel::Elementary,
        cefr: "A2",
        max_words_per_sentence: 10,
        style_guidance: "Short sentences. Present and past simple. Simple vocabulary. \
            Maximum 10 words per sentence.",
    },
    LevelConfig {
        level: ClassLevel::PreIntermediate,
        cefr: "A2+",
        max_words_per_sentence: 12,
        style_guidance: "Clear explanations. Concrete classroom references. \
            Maximum 12 words per sentence.",
    },
    LevelConfig {
        level: ClassLevel::Intermediate,
        cefr: "B1",
        max_words_per_sentence: 15,
        style_guidance: "Clear explanations. Can reference skills directly. \
            Maximum 15 words per sentence.",
    },
    LevelConfig {
        level: ClassLevel::UpperIntermediate,
        cefr: "B2",
        max_words_per_sentence: 18,
        style_guidance: "More precise vocabulary. Still classroom-focused. \
            Maximum 18 words per sentence.",
    },
    LevelConfig {
        level: ClassLevel::Advanced,
        cefr: "C1",
        max_words_per_sentence: 20,
        style_guidance: "Precise vocabulary. Classroom-focused. No academic or scholarly register. \
            Maximum 20 words per sentence.",
    },
];

impl ClassLevel {
    /// Wire key, as sent in `classLevel`.
    pub fn key(self) -> &'static str {
        match self {
            ClassLevel::Beginner => "beginner",
            ClassLevel::Elementary => "elementary",
            ClassLevel::PreIntermediate => "pre-intermediate",
            ClassLevel::Intermediate => "intermediate",
            ClassLevel::UpperIntermediate => "upper-intermediate",
            ClassLevel::Advanced => "advanced",
        }
    }

    /// Display label for level pickers.
    pub fn label(self) -> &'static str {
        match self {
            ClassLevel::Beginner => "Beginner",
            ClassLevel::Elementary => "Elementary",
            ClassLevel::PreIntermediate => "Pre-Intermediate",
            ClassLevel::Intermediate => "Intermediate",
            ClassLevel::UpperIntermediate => "Upper Intermediate",
            ClassLevel::Advanced => "Advanced",
        }
    }

    /// Parses a wire key. Only the exact lower-case keys are recognized.
    pub fn from_key(key: &str) -> Option<Self> {
        LEVELS.iter().map(|c| c.level).find(|level| level.key() == key)
    }

    pub fn config(self) -> &'static LevelConfig {
        match self {
            ClassLevel::Beginner => &LEVELS[0],
            ClassLevel::Elementary => &LEVELS[1],
            ClassLevel::PreIntermediate => &LEVELS[2],
            ClassLevel::Intermediate => &LEVELS[3],
            ClassLevel::UpperIntermediate => &LEVELS[4],
            ClassLevel::Advanced => &LEVELS[5],
        }
    }
}

/// Looks up a level by key, falling back to pre-intermediate for unknown keys.
pub fn resolve_level(key: &str) -> &'static LevelConfig {
    ClassLevel::from_key(key).unwrap_or_default().config()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_resolves_to_its_own_config() {
        for config in &LEVELS {
            assert_eq!(resolve_level(config.level.key()), config);
            assert_eq!(config.level.config(), config);
        }
    }

    #[test]
    fn test_cefr_bands() {
        let bands: Vec<&str> = LEVELS.iter().map(|c| c.cefr).collect();
        assert_eq!(bands, vec!["A1", "A2", "A2+", "B1", "B2", "C1"]);
    }

    #[test]
    fn test_sentence_length_grows_with_tier() {
        let words: Vec<u8> = LEVELS.iter().map(|c| c.max_words_per_sentence).collect();
        assert_eq!(words, vec![8, 10, 12, 15, 18, 20]);
        for config in &LEVELS {
            let expected = format!("Maximum {} words per sentence.", config.max_words_per_sentence);
            assert!(config.style_guidance.contains(&expected));
        }
    }

    #[test]
    fn test_unknown_key_falls_back_to_pre_intermediate() {
        let config = resolve_level("expert");
        assert_eq!(config.level, ClassLevel::PreIntermediate);
        assert_eq!(config.cefr, "A2+");
        assert_eq!(config.max_words_per_sentence, 12);
        assert_eq!(resolve_level("").level, ClassLevel::PreIntermediate);
    }

    #[test]
    fn test_key_lookup_is_exact() {
        assert_eq!(ClassLevel::from_key("advanced"), Some(ClassLevel::Advanced));
        assert_eq!(ClassLevel::from_key(" Advanced "), None);
        assert_eq!(ClassLevel::from_key("UPPER-INTERMEDIATE"), None);
        assert_eq!(ClassLevel::from_key("upper intermediate"), None);
    }

    #[test]
    fn test_miscased_key_falls_back_to_pre_intermediate() {
        let config = resolve_level("ADVANCED");
        assert_eq!(config.cefr, "A2+");
        assert_eq!(config.max_words_per_sentence, 12);
        assert_eq!(resolve_level(" advanced").level, ClassLevel::PreIntermediate);
    }

    #[test]
    fn test_serde_uses_wire_keys() {
        let json = serde_json::to_string(&ClassLevel::UpperIntermediate).unwrap();
        assert_eq!(json, "\"upper-intermediate\"");
    }
}
