use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sentinel section filter meaning "no filtering".
pub const ALL_SECTIONS: &str = "All";

/// Section used when a student has no membership at all.
pub const UNKNOWN_SECTION: &str = "Unknown Section";

/// Normalized set of sections a student belongs to.
///
/// Older records carry a single `section` string, newer ones a `sections`
/// list. Both end up here, so the rest of the code never looks at which
/// shape the record had.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SectionMemberships(BTreeSet<String>);

impl SectionMemberships {
    pub fn new<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            sections
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    /// Merge the list form and the legacy single-section form.
    pub fn from_parts(sections: &[String], legacy_section: Option<&str>) -> Self {
        let mut set = Self::new(sections);
        if let Some(legacy) = legacy_section {
            set.insert(legacy);
        }
        set
    }

    pub fn insert(&mut self, section: &str) {
        let s = section.trim();
        if !s.is_empty() {
            self.0.insert(s.to_string());
        }
    }

    pub fn contains(&self, section: &str) -> bool {
        self.0.contains(section.trim())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// "A, B" for display.
    pub fn joined(&self, sep: &str) -> String {
        self.iter().collect::<Vec<_>>().join(sep)
    }
}

/// Either a single section name or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSections {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for SectionMemberships {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match Option::<RawSections>::deserialize(deserializer)? {
            None => SectionMemberships::default(),
            Some(RawSections::One(s)) => SectionMemberships::new([s]),
            Some(RawSections::Many(v)) => SectionMemberships::new(v),
        })
    }
}

/// Roster entry, as far as attendance export is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    #[serde(alias = "admissionNumber")]
    pub admission_number: String,
    #[serde(default)]
    pub sections: SectionMemberships,
    #[serde(default, alias = "photoUrl")]
    pub photo_url: String,
}

impl Student {
    pub fn new<I, S>(id: i64, name: &str, admission_number: &str, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id,
            name: name.trim().to_string(),
            admission_number: admission_number.trim().to_string(),
            sections: SectionMemberships::new(sections),
            photo_url: String::new(),
        }
    }

    /// True when the filter is absent/"All" or the student is a member.
    pub fn in_section(&self, filter: Option<&str>) -> bool {
        match filter {
            None => true,
            Some(f) if is_all_sections(f) => true,
            Some(f) => self.sections.contains(f),
        }
    }
}

pub fn is_all_sections(filter: &str) -> bool {
    let f = filter.trim();
    f.is_empty() || f.eq_ignore_ascii_case(ALL_SECTIONS)
}
