pub mod context;
pub mod conversation;

use serde::{Deserialize, Serialize};

use crate::{KprError, KprResult};

pub use context::{build_banker_context, compliance_notice};
pub use conversation::{ChatMessage, ChatModel, ChatRole, Conversation};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const KNOWN_MODELS: [&str; 3] = [DEFAULT_MODEL, "gemini-1.5-flash", "gemini-1.5-pro"];
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Model selection for the advisory chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorSettings {
    pub model: String,
    pub temperature: f32,
    /// Operator instructions appended after the banker context.
    #[serde(default)]
    pub extra_system_prompt: String,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            extra_system_prompt: String::new(),
        }
    }
}

impl AdvisorSettings {
    pub fn validate(&self) -> KprResult<()> {
        if self.model.trim().is_empty() {
            return Err(KprError::InvalidInput {
                field: "model".into(),
                reason: "Model name cannot be empty.".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(KprError::InvalidInput {
                field: "temperature".into(),
                reason: "Temperature must be between 0 and 1.".into(),
            });
        }
        Ok(())
    }

    pub fn is_known_model(&self) -> bool {
        KNOWN_MODELS.contains(&self.model.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_valid() {
        let settings = AdvisorSettings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.is_known_model());
    }

    #[test]
    fn test_temperature_out_of_range() {
        let settings = AdvisorSettings {
            temperature: 1.5,
            ..AdvisorSettings::default()
        };
        match settings.validate().unwrap_err() {
            KprError::InvalidInput { field, .. } => assert_eq!(field, "temperature"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
        let nan = AdvisorSettings {
            temperature: f32::NAN,
            ..AdvisorSettings::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_unknown_model_still_valid() {
        let settings = AdvisorSettings {
            model: "gemini-exp".into(),
            ..AdvisorSettings::default()
        };
        assert!(settings.validate().is_ok());
        assert!(!settings.is_known_model());
    }
}
