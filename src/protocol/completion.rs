use serde::{Deserialize, Serialize};
use std::fmt;

/// Models supported by the upstream completion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionModel {
    SonarPro,
    Sonar,
}

impl fmt::Display for CompletionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionModel::SonarPro => write!(f, "sonar-pro"),
            CompletionModel::Sonar => write!(f, "sonar"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Wire body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: CompletionModel,
    pub messages: Vec<ChatMessage>,
}

/// Upstream completion envelope. Unknown fields (usage, citations, ids) are
/// ignored; only the choice content is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: String,
}

impl CompletionResponse {
    /// The first choice's message content, requiring it to be non-empty.
    #[must_use]
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .filter(|content| !content.is_empty())
    }
}

const LOOKUP_SYSTEM_PROMPT: &str = "When given a property address, city, and state, return the complete property details including estimatedValue, squareFootage, yearBuilt, lotSize, bedrooms, bathrooms, propertyType, lastSaleDate, and lastSalePrice. Your response must be valid JSON and follow this exact format: \n\n{\"propertyData\": {\"estimatedValue\": 350000, \"squareFootage\": 2000, \"yearBuilt\": 1990, \"lotSize\": \"0.5 acres\", \"bedrooms\": 4, \"bathrooms\": 3, \"propertyType\": \"Residential\", \"lastSaleDate\": \"2023-01-01\", \"lastSalePrice\": 340000}}\n\nDo not include any additional explanation or markdown formatting. Output only the JSON.";

/// Build the chat completion request: a single user message carrying the raw
/// client-supplied text.
#[must_use]
pub fn chat_request(model: CompletionModel, message: &str) -> CompletionRequest {
    CompletionRequest {
        model,
        messages: vec![ChatMessage {
            role: Role::User,
            content: message.to_string(),
        }],
    }
}

/// Build the property-lookup completion request: a system message fixing the
/// output schema and demanding JSON-only output, plus a user message
/// interpolating the address.
#[must_use]
pub fn lookup_request(
    model: CompletionModel,
    address: &str,
    city: &str,
    state: &str,
) -> CompletionRequest {
    CompletionRequest {
        model,
        messages: vec![
            ChatMessage {
                role: Role::System,
                content: LOOKUP_SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: Role::User,
                content: format!(
                    "Provide property details for {address}, {city}, {state} using data in JSON format."
                ),
            },
        ],
    }
}
