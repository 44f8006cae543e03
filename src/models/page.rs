use std::fmt;

use serde::{Deserialize, Serialize};

use super::texts::GeneratedTexts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageRole {
    Cover,
    Greeting,
    Invitation,
    Location,
    Closing,
}

impl PageRole {
    /// Every page of an invitation, in page order.
    pub const ALL: [PageRole; 5] = [
        PageRole::Cover,
        PageRole::Greeting,
        PageRole::Invitation,
        PageRole::Location,
        PageRole::Closing,
    ];

    pub fn page_number(&self) -> u8 {
        match self {
            PageRole::Cover => 1,
            PageRole::Greeting => 2,
            PageRole::Invitation => 3,
            PageRole::Location => 4,
            PageRole::Closing => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageRole::Cover => "cover",
            PageRole::Greeting => "greeting",
            PageRole::Invitation => "invitation",
            PageRole::Location => "location",
            PageRole::Closing => "closing",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PageRole::Cover => "Wedding photo cover",
            PageRole::Greeting => "Greeting",
            PageRole::Invitation => "Invitation message",
            PageRole::Location => "Venue directions and map",
            PageRole::Closing => "Closing thanks",
        }
    }

    /// Generated text printed on this page; the cover carries none.
    pub fn text<'a>(&self, texts: &'a GeneratedTexts) -> Option<&'a str> {
        match self {
            PageRole::Cover => None,
            other => texts.get(other.as_str()),
        }
    }
}

impl fmt::Display for PageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which path produced a page image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSource {
    Primary,
    Fallback,
    Placeholder,
    /// Regenerated from an edit request.
    Edited,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDescriptor {
    pub page_number: u8,
    pub role: PageRole,
    pub image_url: String,
    pub description: String,
    pub source: PageSource,
}

impl PageDescriptor {
    pub fn new(role: PageRole, image_url: impl Into<String>, source: PageSource) -> Self {
        Self {
            page_number: role.page_number(),
            role,
            image_url: image_url.into(),
            description: role.description().to_string(),
            source,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == PageSource::Placeholder
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationResult {
    pub pages: Vec<PageDescriptor>,
    pub texts: GeneratedTexts,
    pub backend_used: String,
}

impl InvitationResult {
    pub fn image_urls(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.image_url.as_str()).collect()
    }

    pub fn placeholder_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_placeholder()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditedPage {
    #[serde(flatten)]
    pub page: PageDescriptor,
    pub edited: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_numbered_in_order() {
        let numbers: Vec<u8> = PageRole::ALL.iter().map(|r| r.page_number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn cover_has_no_text() {
        let texts = GeneratedTexts {
            greeting: "g".into(),
            invitation: "i".into(),
            location: "l".into(),
            closing: "c".into(),
        };
        assert_eq!(PageRole::Cover.text(&texts), None);
        assert_eq!(PageRole::Location.text(&texts), Some("l"));
    }

    #[test]
    fn descriptor_serializes_role_lowercase() {
        let page =
            PageDescriptor::new(PageRole::Closing, "memory://design/x.png", PageSource::Fallback);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["role"], "closing");
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["page_number"], 5);

        let edited =
            PageDescriptor::new(PageRole::Cover, "memory://edited/y.png", PageSource::Edited);
        assert!(!edited.is_placeholder());
        assert_eq!(serde_json::to_value(&edited).unwrap()["source"], "edited");
    }
}
