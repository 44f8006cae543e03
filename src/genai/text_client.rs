use async_trait::async_trait;
use serde_json::Value;

use crate::{
    config::GenAiConfig,
    error::{InviteError, Result},
    genai::{http::GeminiHttp, traits::TextGenerator},
    models::{
        gemini::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part},
        CeremonyFacts, GeneratedTexts, Person, REQUIRED_TEXT_KEYS,
    },
};

#[derive(Clone)]
pub struct TextClient {
    http: GeminiHttp,
    model: String,
    json_mode: bool,
}

impl TextClient {
    pub fn new(http: GeminiHttp, config: &GenAiConfig) -> Self {
        Self {
            http,
            model: config.text_model.clone(),
            json_mode: config.json_mode,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, facts: &CeremonyFacts) -> GenerateContentRequest {
        let response_mime_type = self.json_mode.then(|| "application/json".to_string());

        GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(build_text_prompt(facts))])],
            generation_config: Some(GenerationConfig {
                response_mime_type,
                temperature: Some(0.8),
                ..Default::default()
            }),
        }
    }
}

#[async_trait]
impl TextGenerator for TextClient {
    async fn generate_texts(&self, facts: &CeremonyFacts) -> Result<GeneratedTexts> {
        let request = self.build_request(facts);

        log::info!("Generating invitation texts with model: {}", self.model);

        let response: GenerateContentResponse = self
            .http
            .post(&self.model, "generateContent", &request)
            .await
            .map_err(|e| {
                InviteError::UpstreamTextGenerationError(format!("{}: {}", self.model, e))
            })?;

        let raw = response.text().ok_or_else(|| {
            InviteError::UpstreamTextGenerationError(format!("{} returned no text", self.model))
        })?;
        log::debug!("Text model answer: {}", raw);

        parse_texts(&raw, self.json_mode)
    }
}

/// Parses the model answer. JSON mode answers are parsed directly; anything
/// else goes through [`parse_json_fallback`].
pub fn parse_texts(raw: &str, json_mode: bool) -> Result<GeneratedTexts> {
    if json_mode {
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) => return GeneratedTexts::from_json(&value),
            Err(e) => log::warn!("Structured answer was not valid JSON ({}), scanning text", e),
        }
    }

    let value = parse_json_fallback(raw).ok_or_else(|| {
        InviteError::UpstreamTextGenerationError("no JSON object found in model answer".into())
    })?;
    GeneratedTexts::from_json(&value)
}

/// Best-effort recovery of the first well-formed JSON object embedded in
/// free text (code fences, preambles, trailing chatter).
pub fn parse_json_fallback(raw: &str) -> Option<Value> {
    raw.char_indices()
        .filter(|(_, c)| *c == '{')
        .find_map(|(start, _)| {
            let mut stream = serde_json::Deserializer::from_str(&raw[start..]).into_iter::<Value>();
            match stream.next() {
                Some(Ok(value)) if value.is_object() => Some(value),
                _ => None,
            }
        })
}

fn describe_person(role: &str, person: &Person) -> String {
    let mut line = format!("- {}: {}", role, person.name);
    let parents: Vec<&str> = [person.father_name.as_deref(), person.mother_name.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !parents.is_empty() {
        line.push_str(&format!(" (parents: {})", parents.join(", ")));
    }
    line
}

pub fn build_text_prompt(facts: &CeremonyFacts) -> String {
    let coordinates = facts
        .venue
        .coordinates
        .map(|c| format!("\n- Coordinates: {:.6}, {:.6}", c.latitude, c.longitude))
        .unwrap_or_default();

    format!(
        "You are a professional Korean wedding invitation writer.\n\
         Write the invitation copy in Korean for the ceremony below.\n\n\
         {groom}\n\
         {bride}\n\
         - Venue: {venue}\n\
         - Address: {address}{coordinates}\n\
         - Date: {date}\n\
         - Time: {time}\n\
         - Tone: {tone} ({guidance})\n\n\
         Answer with a single JSON object and nothing else. It must contain exactly \
         these keys, each holding a non-empty string:\n\
         1. greeting: opening greeting (2-3 sentences)\n\
         2. invitation: invitation message naming the couple and their parents (2 sentences)\n\
         3. location: short directions to the venue (1-2 sentences)\n\
         4. closing: closing thanks (1-2 sentences)\n\n\
         Required keys: {keys}",
        groom = describe_person("Groom", &facts.groom),
        bride = describe_person("Bride", &facts.bride),
        venue = facts.venue.name,
        address = facts.venue.address,
        coordinates = coordinates,
        date = facts.date,
        time = facts.time,
        tone = facts.tone,
        guidance = facts.tone.guidance(),
        keys = REQUIRED_TEXT_KEYS.join(", "),
    )
}
