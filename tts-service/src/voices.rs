use std::fmt;

use serde::Serialize;

/// The CustomVoice speakers the model ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Voice {
    Vivian,
    Ryan,
    Elena,
    Lucas,
    Isabella,
    Marcus,
    Aria,
    Daniel,
    Sophie,
    Nathan,
}

pub const DEFAULT_VOICE: Voice = Voice::Vivian;

impl Voice {
    pub const ALL: [Voice; 10] = [
        Voice::Vivian,
        Voice::Ryan,
        Voice::Elena,
        Voice::Lucas,
        Voice::Isabella,
        Voice::Marcus,
        Voice::Aria,
        Voice::Daniel,
        Voice::Sophie,
        Voice::Nathan,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Voice::Vivian => "Vivian",
            Voice::Ryan => "Ryan",
            Voice::Elena => "Elena",
            Voice::Lucas => "Lucas",
            Voice::Isabella => "Isabella",
            Voice::Marcus => "Marcus",
            Voice::Aria => "Aria",
            Voice::Daniel => "Daniel",
            Voice::Sophie => "Sophie",
            Voice::Nathan => "Nathan",
        }
    }

    pub fn id(&self) -> String {
        self.name().to_ascii_lowercase()
    }

    /// Exact, case-sensitive lookup by speaker name.
    pub fn from_name(name: &str) -> Option<Voice> {
        Voice::ALL.into_iter().find(|voice| voice.name() == name)
    }

    /// Maps a requested speaker onto a known voice. Unknown or missing
    /// names fall back to [`DEFAULT_VOICE`] instead of failing the request.
    pub fn resolve(requested: Option<&str>) -> Voice {
        requested.and_then(Voice::from_name).unwrap_or(DEFAULT_VOICE)
    }

    pub fn names() -> Vec<&'static str> {
        Voice::ALL.iter().map(Voice::name).collect()
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Voice {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_speakers_exactly() {
        for voice in Voice::ALL {
            assert_eq!(Voice::resolve(Some(voice.name())), voice);
        }
    }

    #[test]
    fn unknown_or_missing_voice_falls_back_to_vivian() {
        assert_eq!(Voice::resolve(Some("Morgan")), Voice::Vivian);
        assert_eq!(Voice::resolve(Some("")), Voice::Vivian);
        assert_eq!(Voice::resolve(None), Voice::Vivian);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(Voice::from_name("ryan"), None);
        assert_eq!(Voice::resolve(Some("ryan")), Voice::Vivian);
    }

    #[test]
    fn ids_are_lowercase_names() {
        assert_eq!(Voice::Isabella.id(), "isabella");
        assert_eq!(Voice::names().len(), 10);
        assert_eq!(Voice::names()[0], "Vivian");
    }
}
