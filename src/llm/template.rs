//! Deterministic template provider
//!
//! Stand-in backend used when the `llm` feature is disabled. Renders a
//! fixed markdown report skeleton from the conversation contents so the
//! full pipeline (grouping, prompting, HTML assembly) stays exercisable
//! without model weights. Also used by the integration tests.

use anyhow::Result;
use async_trait::async_trait;

use super::{Conversation, ModelProvider};

/// Deterministic markdown-template backend (no model inference).
#[derive(Debug, Default)]
pub struct TemplateProvider;

impl TemplateProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ModelProvider for TemplateProvider {
    async fn generate(&self, conversation: &Conversation) -> Result<String> {
        let image_count = conversation.image_paths().count();
        let blocks: Vec<&str> = conversation.text_items().collect();

        let mut report = String::new();
        report.push_str("**Placeholder inspection report** (no model backend compiled in).\n\n");
        for block in &blocks {
            report.push_str(&format!("- {}\n", block));
        }
        report.push_str(&format!("\n{} image(s) were attached.\n\n", image_count));
        report.push_str(
            "## Findings\n\n\
             - **Observed anomalies or damage**: not assessed\n\
             - **Thermal anomalies or hotspots**: not assessed\n\
             - **Severity assessment and potential causes**: not assessed\n\
             - **Recommended maintenance or repair actions**: not assessed\n\
             - **Implications for turbine performance**: not assessed\n",
        );

        Ok(report)
    }

    fn provider_name(&self) -> &'static str {
        "Template (no inference)"
    }

    fn uses_gpu(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ContentItem;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_template_report_reflects_conversation() {
        let provider = TemplateProvider::new();
        let conversation = Conversation {
            system: "You are a senior expert".to_string(),
            user_content: vec![
                ContentItem::Text("Below are 2 RGB images for Turbine-2_A:".to_string()),
                ContentItem::Image(PathBuf::from("a.jpg")),
                ContentItem::Image(PathBuf::from("b.jpg")),
            ],
        };

        let report = provider.generate(&conversation).await.unwrap();

        assert!(report.contains("Below are 2 RGB images for Turbine-2_A:"));
        assert!(report.contains("2 image(s) were attached"));
        assert!(report.contains("**Observed anomalies or damage**"));
    }
}
