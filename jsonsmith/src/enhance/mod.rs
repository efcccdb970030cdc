//! Prompt enhancement: category prompts and response parsing

mod parse;

pub use parse::{parse_enhancement, Enhancement, DEFAULT_COMPARISON};

use crate::provider::LlmRequest;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from building an enhancement request
#[derive(Error, Debug)]
pub enum EnhanceError {
    #[error("Prompt is required")]
    EmptyPrompt,
}

/// Appended to every category prompt so the reply can be split afterwards.
pub const RESPONSE_FORMAT_INSTRUCTIONS: &str = "\n\nIMPORTANT: Respond with two parts:\n\
1. A JSON object with the enhanced prompt structure\n\
2. A comparison section explaining the improvements.\n\n\
Format your response as:\n\
```json\n{enhanced JSON here}\n```\n\n\
COMPARISON:\n{explanation of improvements}";

/// Kind of prompt being enhanced; selects the system prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptCategory {
    #[default]
    Image,
    Video,
    Academic,
    Casual,
    Custom,
}

impl PromptCategory {
    pub const ALL: [PromptCategory; 5] = [
        PromptCategory::Image,
        PromptCategory::Video,
        PromptCategory::Academic,
        PromptCategory::Casual,
        PromptCategory::Custom,
    ];

    /// Look up a category by its wire name; anything unknown is treated as `Custom`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "image" => PromptCategory::Image,
            "video" => PromptCategory::Video,
            "academic" => PromptCategory::Academic,
            "casual" => PromptCategory::Casual,
            _ => PromptCategory::Custom,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptCategory::Image => "image",
            PromptCategory::Video => "video",
            PromptCategory::Academic => "academic",
            PromptCategory::Casual => "casual",
            PromptCategory::Custom => "custom",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            PromptCategory::Image => "Image Generation",
            PromptCategory::Video => "Video Generation",
            PromptCategory::Academic => "Academic Text",
            PromptCategory::Casual => "Casual Query",
            PromptCategory::Custom => "Custom",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            PromptCategory::Image => {
                "You are an expert at enhancing image generation prompts. Transform the user's raw prompt \
                 into a detailed, structured JSON format optimized for image generation. Include: style, \
                 subject, lighting, composition, colors, mood, quality settings, and technical parameters."
            }
            PromptCategory::Video => {
                "You are an expert at enhancing video generation prompts. Transform the user's raw prompt \
                 into a detailed, structured JSON format optimized for video generation. Include: scene \
                 description, camera movements, transitions, duration, style, mood, and technical parameters."
            }
            PromptCategory::Academic => {
                "You are an expert at enhancing academic text prompts. Transform the user's raw prompt \
                 into a structured JSON format that includes: topic, scope, methodology, key concepts, \
                 structure outline, tone, and citation style."
            }
            PromptCategory::Casual => {
                "You are an expert at enhancing casual queries. Transform the user's raw prompt into a \
                 friendly, structured JSON format that clarifies intent, context, and desired output format."
            }
            PromptCategory::Custom => {
                "You are an expert at analyzing and enhancing prompts. Transform the user's raw prompt \
                 into a well-structured JSON format that best suits the prompt's intent."
            }
        }
    }
}

impl fmt::Display for PromptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the gateway request that enhances `prompt`
pub fn build_request(
    category: PromptCategory,
    prompt: &str,
    temperature: f32,
) -> Result<LlmRequest, EnhanceError> {
    if prompt.trim().is_empty() {
        return Err(EnhanceError::EmptyPrompt);
    }

    let system = format!("{}{}", category.system_prompt(), RESPONSE_FORMAT_INSTRUCTIONS);
    Ok(LlmRequest::new(system, prompt).with_temperature(temperature))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_lookup() {
        for category in PromptCategory::ALL {
            assert_eq!(PromptCategory::from_name(category.as_str()), category);
        }
        assert_eq!(PromptCategory::from_name("VIDEO"), PromptCategory::Video);
        assert_eq!(PromptCategory::from_name("poetry"), PromptCategory::Custom);
        assert_eq!(PromptCategory::from_name(""), PromptCategory::Custom);
    }

    #[test]
    fn test_request_carries_format_instructions() {
        let request = build_request(PromptCategory::Academic, "write about bees", 0.7).unwrap();
        assert!(request.system.starts_with("You are an expert at enhancing academic"));
        assert!(request.system.ends_with("COMPARISON:\n{explanation of improvements}"));
        assert!(request.system.contains("```json\n{enhanced JSON here}\n```"));
        assert_eq!(request.prompt, "write about bees");
        assert_eq!(request.temperature, Some(0.7));
    }

    #[test]
    fn test_blank_prompt_rejected() {
        assert!(matches!(
            build_request(PromptCategory::Image, "  \n", 0.7),
            Err(EnhanceError::EmptyPrompt)
        ));
    }
}
