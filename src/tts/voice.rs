use std::fmt::Display;

use strum_macros::{EnumString, IntoStaticStr};

use crate::{Error, Result};

/// The age of a voice, as reported by the engine.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum VoiceAge {
    Adult,
    Child,
    Senior,
    Teen,
}

/// The gender of a voice, as reported by the engine.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum VoiceGender {
    Female,
    Male,
    Neutral,
}

/// A voice installed on the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Engine-specific identifier. Pass it to [`Engine::set_voice`](super::Engine::set_voice)
    /// to select this voice.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Language codes this voice speaks, most preferred first.
    pub languages: Vec<String>,
    /// Gender, if the engine reports one.
    pub gender: Option<VoiceGender>,
    /// Age, if the engine reports one.
    pub age: Option<VoiceAge>,
}

impl Voice {
    /// Creates a voice with the given identifier and name, and no other attributes.
    pub fn new<I: Into<String>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            languages: Vec::new(),
            gender: None,
            age: None,
        }
    }

    /// Adds a language code to this voice.
    pub fn with_language<S: Into<String>>(mut self, language: S) -> Self {
        self.languages.push(language.into());
        self
    }

    /// Sets the gender of this voice.
    pub fn with_gender(mut self, gender: VoiceGender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Sets the age of this voice.
    pub fn with_age(mut self, age: VoiceAge) -> Self {
        self.age = Some(age);
        self
    }
}

impl Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {:?}", self.id, self.name, self.languages)
    }
}

enum Attr {
    Name(String),
    Age(VoiceAge),
    Gender(VoiceGender),
    Language(String),
}

impl Attr {
    fn holds_for(&self, voice: &Voice) -> bool {
        match self {
            Self::Name(name) => same_name(&voice.name, name),
            Self::Age(age) => voice.age == Some(*age),
            Self::Gender(gender) => voice.gender == Some(*gender),
            Self::Language(lang) => voice.languages.iter().any(|l| l.eq_ignore_ascii_case(lang)),
        }
    }
}

struct Condition {
    attr: Attr,
    negated: bool,
}

/// Filters installed voices by their attributes. All conditions must hold for a voice to match.
#[derive(Default)]
pub struct VoiceSelector {
    conditions: Vec<Condition>,
}

impl VoiceSelector {
    /// Creates a selector that matches every voice.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the voice to have the given name.
    pub fn name_eq<S: AsRef<str>>(self, name: S) -> Self {
        self.append_condition(Attr::Name(name.as_ref().to_string()), false)
    }

    /// Requires the voice not to have the given name.
    pub fn name_ne<S: AsRef<str>>(self, name: S) -> Self {
        self.append_condition(Attr::Name(name.as_ref().to_string()), true)
    }

    /// Requires the voice to be of the given age.
    pub fn age_eq(self, age: VoiceAge) -> Self {
        self.append_condition(Attr::Age(age), false)
    }

    /// Requires the voice not to be of the given age.
    pub fn age_ne(self, age: VoiceAge) -> Self {
        self.append_condition(Attr::Age(age), true)
    }

    /// Requires the voice to be of the given gender.
    pub fn gender_eq(self, gender: VoiceGender) -> Self {
        self.append_condition(Attr::Gender(gender), false)
    }

    /// Requires the voice not to be of the given gender.
    pub fn gender_ne(self, gender: VoiceGender) -> Self {
        self.append_condition(Attr::Gender(gender), true)
    }

    /// Requires the voice to speak the given language.
    pub fn language_eq<S: AsRef<str>>(self, language: S) -> Self {
        self.append_condition(Attr::Language(language.as_ref().to_string()), false)
    }

    /// Requires the voice not to speak the given language.
    pub fn language_ne<S: AsRef<str>>(self, language: S) -> Self {
        self.append_condition(Attr::Language(language.as_ref().to_string()), true)
    }

    /// Tests whether the given voice satisfies every condition of this selector.
    pub fn matches(&self, voice: &Voice) -> bool {
        self.conditions.iter().all(|cond| cond.attr.holds_for(voice) != cond.negated)
    }

    fn append_condition(mut self, attr: Attr, negated: bool) -> Self {
        self.conditions.push(Condition {
            attr,
            negated,
        });
        self
    }
}

/// Finds the installed voice that the given query refers to.
///
/// The query is compared, case-insensitively, with each voice's identifier, the last segment of
/// the identifier, the name, and the language codes. Failing all of those, the first voice whose
/// name contains the query is chosen.
pub fn resolve_voice<'v>(voices: &'v [Voice], query: &str) -> Result<&'v Voice> {
    let query = query.trim();
    let exact: [&dyn Fn(&Voice) -> bool; 4] = [
        &|v: &Voice| v.id.eq_ignore_ascii_case(query),
        &|v: &Voice| id_tail(&v.id).eq_ignore_ascii_case(query),
        &|v: &Voice| same_name(&v.name, query),
        &|v: &Voice| v.languages.iter().any(|l| l.eq_ignore_ascii_case(query)),
    ];
    exact
        .iter()
        .find_map(|pred| voices.iter().find(|&v| pred(v)))
        .or_else(|| {
            let needle = normalize_name(query);
            voices.iter().find(|v| !needle.is_empty() && normalize_name(&v.name).contains(&needle))
        })
        .ok_or_else(|| Error::UnknownVoice(query.to_string()))
}

fn id_tail(id: &str) -> &str {
    id.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(id)
}

fn normalize_name(name: &str) -> String {
    name.trim().replace('_', " ").to_lowercase()
}

fn same_name(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installed() -> Vec<Voice> {
        vec![
            Voice::new("gmw/en-US", "English_(America)")
                .with_language("en-us")
                .with_language("en")
                .with_gender(VoiceGender::Male),
            Voice::new("roa/pt-BR", "Portuguese_(Brazil)")
                .with_language("pt-br")
                .with_language("pt")
                .with_gender(VoiceGender::Male),
            Voice::new("roa/pt", "Portuguese_(Portugal)")
                .with_language("pt")
                .with_gender(VoiceGender::Female)
                .with_age(VoiceAge::Adult),
        ]
    }

    #[test]
    fn resolves_by_id_and_id_tail() {
        let voices = installed();
        assert_eq!(resolve_voice(&voices, "ROA/PT").unwrap().name, "Portuguese_(Portugal)");
        assert_eq!(resolve_voice(&voices, "pt-BR").unwrap().id, "roa/pt-BR");
    }

    #[test]
    fn resolves_by_name_language_and_substring() {
        let voices = installed();
        assert_eq!(resolve_voice(&voices, "english (america)").unwrap().id, "gmw/en-US");
        assert_eq!(resolve_voice(&voices, "en").unwrap().id, "gmw/en-US");
        assert_eq!(resolve_voice(&voices, "brazil").unwrap().id, "roa/pt-BR");
    }

    #[test]
    fn unknown_voice_is_an_error() {
        let voices = installed();
        match resolve_voice(&voices, "klingon") {
            Err(Error::UnknownVoice(q)) => assert_eq!(q, "klingon"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(resolve_voice(&voices, "  ").is_err());
    }

    #[test]
    fn selector_filters_by_attributes() {
        let voices = installed();
        let female: Vec<_> = voices
            .iter()
            .filter(|v| VoiceSelector::new().gender_eq(VoiceGender::Female).matches(v))
            .collect();
        assert_eq!(female.len(), 1);

        let selector = VoiceSelector::new().language_eq("PT").age_ne(VoiceAge::Adult);
        let ids: Vec<_> = voices.iter().filter(|v| selector.matches(v)).map(|v| &v.id).collect();
        assert_eq!(ids, ["roa/pt-BR"]);

        assert!(voices.iter().all(|v| VoiceSelector::new().matches(v)));
    }
}
