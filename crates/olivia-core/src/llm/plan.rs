//! Reply content parsing for both response formats.
//!
//! The plain format passes the completion text through trimmed. The
//! structured format expects a [`CoachingPlan`] JSON document and renders it
//! to display text deterministically.

use olivia_types::llm::{CoachingPlan, CompletionError, ResponseFormat};

/// Render a coaching plan to display text.
///
/// Each step becomes `"Step {n}: {action}\nExample: {example}"`; steps are
/// separated by a blank line and followed by a blank line and the
/// encouragement.
pub fn render_plan(plan: &CoachingPlan) -> String {
    let mut blocks: Vec<String> = plan
        .steps
        .iter()
        .map(|s| format!("Step {}: {}\nExample: {}", s.step, s.action, s.example))
        .collect();
    blocks.push(plan.encouragement.clone());
    blocks.join("\n\n")
}

/// Turn raw `choices[0].message.content` into display text.
pub fn parse_reply(content: &str, format: ResponseFormat) -> Result<String, CompletionError> {
    match format {
        ResponseFormat::Plain => {
            let text = content.trim();
            if text.is_empty() {
                return Err(CompletionError::MissingContent);
            }
            Ok(text.to_string())
        }
        ResponseFormat::Structured => {
            let plan: CoachingPlan = serde_json::from_str(strip_code_fence(content))
                .map_err(|e| CompletionError::MalformedPlan(e.to_string()))?;
            Ok(render_plan(&plan))
        }
    }
}

/// Models often wrap JSON in a ```json fence even when told not to.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use olivia_types::llm::CoachingStep;

    fn trip_plan() -> CoachingPlan {
        CoachingPlan {
            steps: vec![CoachingStep {
                step: 1,
                action: "Ask about her trip".to_string(),
                example: "\"Where was your last trip?\"".to_string(),
            }],
            encouragement: "You got this.".to_string(),
        }
    }

    #[test]
    fn render_single_step_plan() {
        assert_eq!(
            render_plan(&trip_plan()),
            "Step 1: Ask about her trip\nExample: \"Where was your last trip?\"\n\nYou got this."
        );
    }

    #[test]
    fn render_multiple_steps_in_order() {
        let mut plan = trip_plan();
        plan.steps.push(CoachingStep {
            step: 2,
            action: "Share one of yours".to_string(),
            example: "Mine was Lisbon.".to_string(),
        });
        let text = render_plan(&plan);
        assert_eq!(
            text,
            "Step 1: Ask about her trip\nExample: \"Where was your last trip?\"\n\n\
             Step 2: Share one of yours\nExample: Mine was Lisbon.\n\nYou got this."
        );
    }

    #[test]
    fn render_without_steps_is_just_encouragement() {
        let plan = CoachingPlan {
            steps: vec![],
            encouragement: "Keep going.".to_string(),
        };
        assert_eq!(render_plan(&plan), "Keep going.");
    }

    #[test]
    fn plain_reply_is_trimmed() {
        let text = parse_reply("  \n Be yourself.\n ", ResponseFormat::Plain).unwrap();
        assert_eq!(text, "Be yourself.");
    }

    #[test]
    fn blank_plain_reply_is_missing_content() {
        let err = parse_reply("   ", ResponseFormat::Plain).unwrap_err();
        assert!(matches!(err, CompletionError::MissingContent));
    }

    #[test]
    fn structured_reply_is_rendered() {
        let content = serde_json::to_string(&trip_plan()).unwrap();
        let text = parse_reply(&content, ResponseFormat::Structured).unwrap();
        assert_eq!(text, render_plan(&trip_plan()));
    }

    #[test]
    fn structured_reply_inside_code_fence() {
        let content = format!(
            "```json\n{}\n```",
            serde_json::to_string(&trip_plan()).unwrap()
        );
        let text = parse_reply(&content, ResponseFormat::Structured).unwrap();
        assert!(text.starts_with("Step 1: Ask about her trip"));
    }

    #[test]
    fn structured_reply_with_wrong_shape_is_malformed() {
        let err = parse_reply(r#"{"tips":["smile"]}"#, ResponseFormat::Structured).unwrap_err();
        assert!(matches!(err, CompletionError::MalformedPlan(_)));

        let err = parse_reply("Just be yourself!", ResponseFormat::Structured).unwrap_err();
        assert!(matches!(err, CompletionError::MalformedPlan(_)));
    }
}
