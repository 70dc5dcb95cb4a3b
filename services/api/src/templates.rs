//! Prompt template loading and rendering
//!
//! Templates are supplied as static configuration: a TOML file mapping a
//! template name to a template body with `{{field}}` placeholders. The
//! loaded set is read-only and safe to share across requests. Rendering
//! substitutes an opportunity's fields into the chosen body; it is a pure
//! function of (template, record) with no control flow.

use std::collections::HashMap;
use std::path::Path;

use minijinja::{Environment, UndefinedBehavior};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::models::opportunity::Opportunity;

/// Loaded set of named prompt templates
#[derive(Debug)]
pub struct PromptTemplates {
    templates: HashMap<String, String>,
    env: Environment<'static>,
}

impl PromptTemplates {
    /// Load templates from a TOML file mapping name to body
    pub fn load(path: &Path) -> ApiResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ApiError::Configuration(format!(
                "failed to read template file {}: {}",
                path.display(),
                e
            ))
        })?;

        let templates = Self::from_toml(&raw)?;
        info!(
            "Loaded {} prompt templates from {}",
            templates.templates.len(),
            path.display()
        );
        Ok(templates)
    }

    /// Parse a template set from TOML source
    pub fn from_toml(raw: &str) -> ApiResult<Self> {
        let templates: HashMap<String, String> = toml::from_str(raw)
            .map_err(|e| ApiError::Configuration(format!("malformed template source: {}", e)))?;

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Lenient);

        // Reject bodies that do not compile up front rather than at render time
        for (name, body) in &templates {
            env.template_from_str(body).map_err(|e| {
                ApiError::Configuration(format!("invalid template '{}': {}", name, e))
            })?;
        }

        Ok(Self { templates, env })
    }

    /// Render a named template against an opportunity
    ///
    /// Placeholders matching one of the record's field names are replaced
    /// with that field's text representation; unset optional fields and
    /// unknown placeholders render as the empty string. The output is
    /// plain text, no HTML escaping.
    pub fn render(&self, name: &str, opportunity: &Opportunity) -> ApiResult<String> {
        let body = self
            .templates
            .get(name)
            .ok_or_else(|| ApiError::NotFound(format!("template '{}' not found", name)))?;

        let ctx = render_context(opportunity);
        self.env.render_str(body, ctx).map_err(|e| {
            ApiError::Configuration(format!("failed to render template '{}': {}", name, e))
        })
    }
}

/// Build the substitution context for an opportunity
///
/// Unset optional fields are omitted so they render as empty strings
/// instead of a literal `none`.
fn render_context(opportunity: &Opportunity) -> minijinja::Value {
    let mut ctx: HashMap<&str, String> = HashMap::new();

    ctx.insert("id", opportunity.id.to_string());
    ctx.insert("title", opportunity.title.clone());

    if let Some(market_description) = &opportunity.market_description {
        ctx.insert("market_description", market_description.clone());
    }
    if let Some(tam_estimate) = opportunity.tam_estimate {
        ctx.insert("tam_estimate", format_number(tam_estimate));
    }
    if let Some(growth_rate) = opportunity.growth_rate {
        ctx.insert("growth_rate", format_number(growth_rate));
    }
    if let Some(consumer_insight) = &opportunity.consumer_insight {
        ctx.insert("consumer_insight", consumer_insight.clone());
    }
    if let Some(hypothesis) = &opportunity.hypothesis {
        ctx.insert("hypothesis", hypothesis.clone());
    }
    if let Some(user_id) = opportunity.user_id {
        ctx.insert("user_id", user_id.to_string());
    }

    minijinja::Value::from_serialize(&ctx)
}

/// Natural decimal representation: whole-valued floats keep a trailing .0
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_opportunity() -> Opportunity {
        Opportunity {
            id: Uuid::new_v4(),
            title: "AI Widget".to_string(),
            market_description: Some("Widgets for AI".to_string()),
            tam_estimate: Some(5000.0),
            growth_rate: Some(12.5),
            consumer_insight: Some("Automation is valued".to_string()),
            hypothesis: Some("AI widgets save time".to_string()),
            user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_templates() -> PromptTemplates {
        let raw = r#"
opportunity_prompt = """
Opportunity Title: {{title}}
Market Description: {{market_description}}
TAM Estimate: {{tam_estimate}}
Growth Rate: {{growth_rate}}
Consumer Insight: {{consumer_insight}}
Hypothesis: {{hypothesis}}
"""
"#;
        PromptTemplates::from_toml(raw).expect("template set should parse")
    }

    #[test]
    fn test_render_substitutes_all_fields() {
        let templates = sample_templates();
        let prompt = templates
            .render("opportunity_prompt", &sample_opportunity())
            .expect("render should succeed");

        assert!(prompt.contains("Opportunity Title: AI Widget"));
        assert!(prompt.contains("Market Description: Widgets for AI"));
        assert!(prompt.contains("TAM Estimate: 5000.0"));
        assert!(prompt.contains("Growth Rate: 12.5"));
        assert!(prompt.contains("Consumer Insight: Automation is valued"));
        assert!(prompt.contains("Hypothesis: AI widgets save time"));
    }

    #[test]
    fn test_render_unset_field_as_empty_string() {
        let templates = sample_templates();
        let mut opportunity = sample_opportunity();
        opportunity.market_description = None;
        opportunity.tam_estimate = None;

        let prompt = templates
            .render("opportunity_prompt", &opportunity)
            .expect("render should succeed");

        assert!(prompt.contains("Market Description: \n"));
        assert!(prompt.contains("TAM Estimate: \n"));
    }

    #[test]
    fn test_render_unknown_placeholder_as_empty_string() {
        let templates =
            PromptTemplates::from_toml(r#"t = "Value: {{no_such_field}}!""#).expect("should parse");
        let prompt = templates
            .render("t", &sample_opportunity())
            .expect("render should succeed");
        assert_eq!(prompt, "Value: !");
    }

    #[test]
    fn test_unknown_template_is_not_found() {
        let templates = sample_templates();
        let err = templates
            .render("missing", &sample_opportunity())
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_malformed_source_is_configuration_error() {
        let err = PromptTemplates::from_toml("not valid toml [[").unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn test_invalid_template_body_is_configuration_error() {
        let err = PromptTemplates::from_toml(r#"t = "{{ unclosed""#).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn test_format_number_natural_decimal() {
        assert_eq!(format_number(5000.0), "5000.0");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(0.25), "0.25");
    }
}
