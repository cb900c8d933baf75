/// MCP server implementation for CareBot.
///
/// Exposes four tools:
/// - `handle_query`: Match symptoms, recommend a cure, pick tips, translate
/// - `match_symptoms`: Raw catalog match with confidence, untranslated
/// - `list_languages`: Supported output languages
/// - `list_tip_categories`: Wellness-tip categories and their sizes
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};

use crate::assistant::CareAssistant;
use crate::localize::{resolve_language, LANGUAGES, SOURCE_LANGUAGE};
use crate::model::TipCategory;
use crate::tips::tips_for;
use carebot_common::mcp_api::{
    HandleQueryParams, HandleQueryResponse, LanguageInfo, LanguageListResponse,
    MatchSymptomsParams, MatchSymptomsResponse, TipCategoryInfo, TipCategoryListResponse,
};

#[derive(Clone)]
pub struct CareBotServer {
    assistant: Arc<CareAssistant>,
    tool_router: ToolRouter<CareBotServer>,
}

impl CareBotServer {
    pub fn new(assistant: Arc<CareAssistant>) -> Self {
        Self {
            assistant,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl CareBotServer {
    #[tool(description = "Describe symptoms in free text and get the closest known condition with a recommended cure (or a referral when nothing matches confidently), plus up to three wellness tips. Optionally translate the output by language name or code.")]
    async fn handle_query(
        &self,
        Parameters(params): Parameters<HandleQueryParams>,
    ) -> Result<Json<HandleQueryResponse>, String> {
        let text = params.text.trim().to_string();
        if text.is_empty() {
            return Err("text must not be empty".to_string());
        }
        let code = language_code(params.language.as_deref());

        let answer = self
            .assistant
            .handle_query(&text, &code)
            .await
            .map_err(|e| format!("query failed: {e}"))?;

        Ok(Json(HandleQueryResponse {
            answer: answer.answer,
            tips: answer.tips,
            language: answer.language,
        }))
    }

    #[tool(description = "Match free-text symptoms against the disease catalog and return the best entry with its cosine similarity. Entries below 0.5 are reported as unmatched.")]
    async fn match_symptoms(
        &self,
        Parameters(params): Parameters<MatchSymptomsParams>,
    ) -> Result<Json<MatchSymptomsResponse>, String> {
        let text = params.text.trim().to_string();
        if text.is_empty() {
            return Err("text must not be empty".to_string());
        }

        let result = self
            .assistant
            .match_symptoms(&text)
            .await
            .map_err(|e| format!("match failed: {e}"))?;

        let matched = result.is_match();
        let (disease_name, cure) = match result.record {
            Some(record) => (Some(record.disease_name), Some(record.cure)),
            None => (None, None),
        };
        Ok(Json(MatchSymptomsResponse {
            matched,
            disease_name,
            cure,
            confidence: result.confidence,
        }))
    }

    #[tool(description = "List the languages answers can be translated into, with their codes.")]
    async fn list_languages(&self) -> Result<Json<LanguageListResponse>, String> {
        let languages = LANGUAGES
            .iter()
            .map(|l| LanguageInfo {
                name: l.name.to_string(),
                code: l.code.to_string(),
            })
            .collect();
        Ok(Json(LanguageListResponse { languages }))
    }

    #[tool(description = "List the wellness-tip categories and how many tips each one holds.")]
    async fn list_tip_categories(&self) -> Result<Json<TipCategoryListResponse>, String> {
        let categories = TipCategory::ALL
            .iter()
            .map(|&c| TipCategoryInfo {
                key: c.key().to_string(),
                tip_count: tips_for(c).len(),
            })
            .collect();
        Ok(Json(TipCategoryListResponse { categories }))
    }
}

#[tool_handler]
impl ServerHandler for CareBotServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "carebot".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "CareBot symptom lookup MCP server over a catalog of {} conditions. \
                 Use handle_query with the user's own description of their symptoms; it \
                 returns a recommended cure or a referral to a professional, plus wellness \
                 tips. Pass `language` to translate (see list_languages). Answers are \
                 informational and carry no medical-accuracy guarantee.",
                self.assistant.matcher().catalog().len()
            )),
        }
    }
}

/// Map a user-supplied language selector to a translation code.
///
/// Known names and codes resolve to their canonical code. Anything else is passed through
/// so the localization adapter reports it as unsupported in the output.
fn language_code(selector: Option<&str>) -> String {
    let Some(selector) = selector.map(str::trim).filter(|s| !s.is_empty()) else {
        return SOURCE_LANGUAGE.to_string();
    };
    resolve_language(selector)
        .map(|l| l.code.to_string())
        .unwrap_or_else(|| selector.to_string())
}
