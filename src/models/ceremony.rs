use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InviteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tone {
    #[default]
    Warm,
    Romantic,
    Formal,
    Modern,
    Cheerful,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Warm => "WARM",
            Tone::Romantic => "ROMANTIC",
            Tone::Formal => "FORMAL",
            Tone::Modern => "MODERN",
            Tone::Cheerful => "CHEERFUL",
        }
    }

    /// Short style hint handed to the text model.
    pub fn guidance(&self) -> &'static str {
        match self {
            Tone::Warm => "warm and heartfelt, like a letter to close friends",
            Tone::Romantic => "romantic and lyrical",
            Tone::Formal => "formal and respectful, suitable for elders",
            Tone::Modern => "simple, modern and concise",
            Tone::Cheerful => "bright, cheerful and playful",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = InviteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WARM" => Ok(Tone::Warm),
            "ROMANTIC" => Ok(Tone::Romantic),
            "FORMAL" => Ok(Tone::Formal),
            "MODERN" => Ok(Tone::Modern),
            "CHEERFUL" => Ok(Tone::Cheerful),
            other => Err(InviteError::InvalidInputError(format!(
                "Unknown tone: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub father_name: Option<String>,
    #[serde(default)]
    pub mother_name: Option<String>,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            father_name: None,
            mother_name: None,
        }
    }

    pub fn with_parents(mut self, father: impl Into<String>, mother: impl Into<String>) -> Self {
        self.father_name = Some(father.into()).filter(|s: &String| !s.is_empty());
        self.mother_name = Some(mother.into()).filter(|s: &String| !s.is_empty());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Central Seoul, used when a venue has no geocode.
impl Default for Coordinates {
    fn default() -> Self {
        Self::new(37.5665, 126.9780)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl Venue {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            coordinates: None,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = Some(Coordinates::new(latitude, longitude));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeremonyFacts {
    pub groom: Person,
    pub bride: Person,
    pub venue: Venue,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub tone: Tone,
}

impl CeremonyFacts {
    pub fn new(
        groom: Person,
        bride: Person,
        venue: Venue,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            groom,
            bride,
            venue,
            date: date.into(),
            time: time.into(),
            tone: Tone::default(),
        }
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        let required = [
            ("groom name", &self.groom.name),
            ("bride name", &self.bride.name),
            ("venue name", &self.venue.name),
            ("date", &self.date),
            ("time", &self.time),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(InviteError::InvalidInputError(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_parses_any_case() {
        assert_eq!("romantic".parse::<Tone>().unwrap(), Tone::Romantic);
        assert_eq!(" Formal ".parse::<Tone>().unwrap(), Tone::Formal);
        assert!("gloomy".parse::<Tone>().is_err());
    }

    #[test]
    fn tone_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Tone::Warm).unwrap(), "\"WARM\"");
    }

    #[test]
    fn empty_parent_names_are_dropped() {
        let groom = Person::new("철수").with_parents("", "김엄마");
        assert_eq!(groom.father_name, None);
        assert_eq!(groom.mother_name.as_deref(), Some("김엄마"));
    }

    #[test]
    fn validate_rejects_blank_required_fields() {
        let facts = CeremonyFacts::new(
            Person::new("철수"),
            Person::new(" "),
            Venue::new("서울 웨딩홀", "서울시 강남구"),
            "2025-05-01",
            "13:00",
        );
        assert!(matches!(
            facts.validate(),
            Err(InviteError::InvalidInputError(msg)) if msg.contains("bride")
        ));
    }

    #[test]
    fn default_coordinates_are_central_seoul() {
        let seoul = Coordinates::default();
        assert!((seoul.latitude - 37.5665).abs() < 1e-9);
        assert!((seoul.longitude - 126.9780).abs() < 1e-9);
    }
}
