//! Terminal rendering for the chat session
//!
//! Pure formatting helpers: every function returns a `String` so the
//! interactive loop decides where it goes and tests can inspect it.

use crate::services::{HealthStatus, LatestPrediction};
use crate::session::{ChatSession, Message, Role};
use crate::soil::{FieldIssue, SoilField, SoilParameters};
use colored::Colorize;

impl Role {
    /// Get a colored tag representation of this role
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use agronus::session::Role;
    ///
    /// println!("{}", Role::Ai.colored_tag()); // "[AGRONUS]" in green
    /// ```
    pub fn colored_tag(&self) -> String {
        match self {
            Self::System => format!("[{}]", "SYSTEM".purple()),
            Self::User => format!("[{}]", "YOU".cyan()),
            Self::Ai => format!("[{}]", "AGRONUS".green()),
        }
    }
}

/// Render one transcript message
pub fn format_message(message: &Message) -> String {
    format!("{} {}", message.role.colored_tag(), message.content)
}

/// Readline prompt for the session
///
/// # Examples
///
/// ```
/// use agronus::chat_view::format_prompt;
///
/// assert_eq!(format_prompt(), "agronus >> ");
/// ```
pub fn format_prompt() -> String {
    "agronus >> ".to_string()
}

/// Indicator printed while a submission is in flight
pub fn thinking_indicator() -> String {
    format!("{} {}", Role::Ai.colored_tag(), "Thinking...".dimmed())
}

/// Table of the current soil parameters
pub fn format_soil_table(soil: &SoilParameters) -> String {
    let mut out = String::from("Soil Conditions\n");
    for field in SoilField::ALL {
        out.push_str(&format!(
            "  {:<18} {:<12} {}\n",
            field.label(),
            field.wire_name(),
            soil.get(field)
        ));
    }
    out
}

/// Numbered list of sample questions
pub fn format_samples(questions: &[String]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("  {}. {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validation issues, or a confirmation when there are none
pub fn format_issues(issues: &[FieldIssue]) -> String {
    if issues.is_empty() {
        return format!("{}", "All soil parameters are within range.".green());
    }
    issues
        .iter()
        .map(|issue| format!("  {} {}", issue.field.to_string().yellow(), issue.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Health check summary
pub fn format_health(health: &HealthStatus) -> String {
    fn flag(value: Option<bool>) -> String {
        match value {
            Some(true) => "yes".green().to_string(),
            Some(false) => "no".red().to_string(),
            None => "unknown".dimmed().to_string(),
        }
    }

    format!(
        "Status:          {}\nService:         {}\nModel loaded:    {}\nVector store:    {}\nLLM configured:  {}",
        health.status,
        health.service.as_deref().unwrap_or("-"),
        flag(health.model_loaded),
        flag(health.vector_store_loaded),
        flag(health.llm_configured)
    )
}

/// Latest prediction held by the service
pub fn format_latest_prediction(latest: Option<&LatestPrediction>) -> String {
    let Some(latest) = latest else {
        return "No prediction available yet. Ask a question to submit your soil details."
            .to_string();
    };
    let features = latest
        .features
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let crop = match &latest.prediction {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "-".to_string(),
    };
    format!("Predicted crop:  {}\nFeatures:        [{}]", crop, features)
}

/// Banner printed when the interactive session starts
pub fn welcome_banner(prediction_url: &str, chat_url: &str) -> String {
    format!(
        "\n╔══════════════════════════════════════════════════════════════╗\n\
         ║               Agronus AI - Crop Recommendations              ║\n\
         ╚══════════════════════════════════════════════════════════════╝\n\n\
         Prediction service: {}\nChat service:       {}\n\n\
         Type '/help' for available commands, 'exit' to quit\n",
        prediction_url, chat_url
    )
}

/// Whole transcript, one message per block
pub fn format_transcript(session: &ChatSession) -> String {
    session
        .conversation()
        .iter()
        .map(format_message)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soil::SoilParameters;

    #[test]
    fn test_format_message_contains_content() {
        let rendered = format_message(&Message::ai("Rice is recommended."));
        assert!(rendered.contains("AGRONUS"));
        assert!(rendered.ends_with("Rice is recommended."));
    }

    #[test]
    fn test_format_prompt() {
        assert_eq!(format_prompt(), "agronus >> ");
    }

    #[test]
    fn test_soil_table_lists_every_field() {
        let table = format_soil_table(&SoilParameters::default());
        for field in SoilField::ALL {
            assert!(table.contains(field.wire_name()));
        }
        assert!(table.contains("202.9"));
    }

    #[test]
    fn test_format_samples_is_one_based() {
        let samples = vec!["a".to_string(), "b".to_string()];
        assert_eq!(format_samples(&samples), "  1. a\n  2. b");
    }

    #[test]
    fn test_format_issues_lists_messages() {
        let soil = SoilParameters {
            humidity: 120.0,
            ..SoilParameters::default()
        };
        let rendered = format_issues(&soil.validate());
        assert!(rendered.contains("Enter humidity between 0 - 100%"));
    }

    #[test]
    fn test_latest_prediction_none() {
        assert!(format_latest_prediction(None).starts_with("No prediction available"));
    }

    #[test]
    fn test_latest_prediction_some() {
        let latest = LatestPrediction {
            features: vec![90.0, 42.0],
            prediction: Some(serde_json::json!("rice")),
            latest_query: None,
        };
        let rendered = format_latest_prediction(Some(&latest));
        assert!(rendered.contains("rice"));
        assert!(rendered.contains("[90, 42]"));
    }

    #[test]
    fn test_format_health_reports_service() {
        let health = HealthStatus {
            status: "healthy".to_string(),
            service: Some("Agronus API".to_string()),
            model_loaded: Some(true),
            vector_store_loaded: None,
            llm_configured: Some(false),
        };
        let rendered = format_health(&health);
        assert!(rendered.contains("healthy"));
        assert!(rendered.contains("Agronus API"));
    }
}
