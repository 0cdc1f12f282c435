//! Wire contracts for the AI service
//!
//! Request and response shapes for asking a question, generating ask
//! detail, recommending questions, text-based answers and charts. These
//! are passed through unchanged; only [`AskResult`] feeds the resolver.
//!
//! Field names follow the service: camelCase, except the snake-case
//! `invalid_sql` that older responses carry.

use crate::stage::Stage;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Error payload attached to a failed response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrenAIError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeployStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployResponse {
    pub status: DeployStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Indexing status of the service itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SystemStatus {
    Indexing,
    Finished,
    Failed,
}

/// Answer languages the service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "English")]
    En,
    #[serde(rename = "Spanish")]
    Es,
    #[serde(rename = "French")]
    Fr,
    #[serde(rename = "Traditional Chinese")]
    ZhTw,
    #[serde(rename = "Simplified Chinese")]
    ZhCn,
    #[serde(rename = "German")]
    De,
    #[serde(rename = "Portuguese")]
    Pt,
    #[serde(rename = "Russian")]
    Ru,
    #[serde(rename = "Japanese")]
    Ja,
    #[serde(rename = "Korean")]
    Ko,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
            Language::Fr => "French",
            Language::ZhTw => "Traditional Chinese",
            Language::ZhCn => "Simplified Chinese",
            Language::De => "German",
            Language::Pt => "Portuguese",
            Language::Ru => "Russian",
            Language::Ja => "Japanese",
            Language::Ko => "Korean",
        }
    }

    pub fn all() -> &'static [Language] {
        &[
            Language::En,
            Language::Es,
            Language::Fr,
            Language::ZhTw,
            Language::ZhCn,
            Language::De,
            Language::Pt,
            Language::Ru,
            Language::Ja,
            Language::Ko,
        ]
    }
}

impl FromStr for Language {
    type Err = Error;

    /// Accepts either the display name ("Simplified Chinese") or the
    /// short code ("zh_cn", "zh-CN").
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        let by_code = match normalized.as_str() {
            "en" => Some(Language::En),
            "es" => Some(Language::Es),
            "fr" => Some(Language::Fr),
            "zh_tw" => Some(Language::ZhTw),
            "zh_cn" => Some(Language::ZhCn),
            "de" => Some(Language::De),
            "pt" => Some(Language::Pt),
            "ru" => Some(Language::Ru),
            "ja" => Some(Language::Ja),
            "ko" => Some(Language::Ko),
            _ => None,
        };

        by_code
            .or_else(|| {
                Language::all()
                    .iter()
                    .copied()
                    .find(|lang| lang.as_str().eq_ignore_ascii_case(s.trim()))
            })
            .ok_or_else(|| Error::Config(format!("Unknown language: {}", s)))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ask

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskStep {
    pub summary: String,
    pub sql: String,
    pub cte_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskHistory {
    pub sql: String,
    pub steps: Vec<AskStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timezone {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskConfigurations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<Timezone>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskInput {
    pub query: String,
    pub deploy_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<AskHistory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurations: Option<AskConfigurations>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncQueryResponse {
    pub query_id: String,
}

/// Status of an ask result. Same values as the task lifecycle.
pub type AskResultStatus = Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AskResultType {
    General,
    TextToSql,
    MisleadingQuery,
}

/// Where a candidate came from: a view saved in the model definition
/// (`view_id` is set), or generated by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AskCandidateType {
    View,
    Llm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskCandidate {
    #[serde(rename = "type")]
    pub candidate_type: AskCandidateType,
    pub sql: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_id: Option<i64>,
}

/// Generic response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse<R, S> {
    #[serde(rename = "type", default)]
    pub result_type: Option<AskResultType>,
    pub status: S,
    pub response: Option<R>,
    pub error: Option<WrenAIError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_sql: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskDetailInput {
    pub query: String,
    pub sql: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurations: Option<AskConfigurations>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskDetail {
    pub description: String,
    pub steps: Vec<AskStep>,
}

pub type AskDetailResult = AskResponse<AskDetail, AskResultStatus>;

/// Result of polling an ask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResult {
    #[serde(rename = "type", default)]
    pub result_type: Option<AskResultType>,
    pub status: AskResultStatus,
    #[serde(default)]
    pub response: Option<Vec<AskCandidate>>,
    #[serde(default)]
    pub error: Option<WrenAIError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_reasoning: Option<String>,
    #[serde(default, alias = "invalid_sql", skip_serializing_if = "Option::is_none")]
    pub invalid_sql: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecommendationQuestionStatus {
    Generating,
    Finished,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationQuestionsInput {
    /// Model definition, forwarded as-is
    pub manifest: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_questions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Service default: 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_questions: Option<u32>,
    /// Service default: 3
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_categories: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regenerate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<AskConfigurations>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationQuestion {
    pub question: String,
    pub category: String,
    /// Validated sql, usable as ask detail input
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationQuestions {
    pub questions: Vec<RecommendationQuestion>,
}

pub type RecommendationQuestionsResult =
    AskResponse<RecommendationQuestions, RecommendationQuestionStatus>;

// text-based answer

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBasedAnswerInput {
    pub query: String,
    pub sql: String,
    pub sql_data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurations: Option<AskConfigurations>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TextBasedAnswerStatus {
    Preprocessing,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBasedAnswerResult {
    pub status: TextBasedAnswerStatus,
    #[serde(
        rename = "numRowsUsedInLLM",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub num_rows_used_in_llm: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WrenAIError>,
}

impl TextBasedAnswerResult {
    /// Answer composition is over, successfully or not
    pub fn is_done(&self) -> bool {
        !matches!(self.status, TextBasedAnswerStatus::Preprocessing)
    }
}

// charts

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChartStatus {
    Fetching,
    Generating,
    Finished,
    Failed,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Bar,
    GroupedBar,
    StackedBar,
    Line,
    MultiLine,
    Pie,
    Area,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartInput {
    pub query: String,
    pub sql: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurations: Option<AskConfigurations>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartAdjustmentOption {
    pub chart_type: ChartType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartAdjustmentInput {
    pub query: String,
    pub sql: String,
    pub adjustment_option: ChartAdjustmentOption,
    pub chart_schema: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurations: Option<AskConfigurations>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartResponse {
    pub reasoning: String,
    pub chart_type: ChartType,
    pub chart_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartResult {
    pub status: ChartStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ChartResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WrenAIError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_result_from_service_json() {
        let json = r#"{
            "type": "TEXT_TO_SQL",
            "status": "CORRECTING",
            "response": [{"type": "LLM", "sql": "SELECT 1"}],
            "error": null,
            "intentReasoning": "user wants a count",
            "invalidSql": "SELEC 1"
        }"#;
        let result: AskResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.result_type, Some(AskResultType::TextToSql));
        assert_eq!(result.status, Stage::Correcting);
        assert_eq!(result.response.as_ref().map(Vec::len), Some(1));
        assert_eq!(result.invalid_sql.as_deref(), Some("SELEC 1"));
    }

    #[test]
    fn test_ask_result_accepts_snake_case_invalid_sql() {
        let json = r#"{"type": null, "status": "FAILED", "response": null,
            "error": {"code": "NO_RELEVANT_SQL", "message": "nothing found"},
            "invalid_sql": "SELECT"}"#;
        let result: AskResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.invalid_sql.as_deref(), Some("SELECT"));
        assert_eq!(result.error.unwrap().code, "NO_RELEVANT_SQL");
    }

    #[test]
    fn test_view_candidate_carries_view_id() {
        let json = r#"{"type": "VIEW", "sql": "SELECT * FROM v", "viewId": 7}"#;
        let candidate: AskCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.candidate_type, AskCandidateType::View);
        assert_eq!(candidate.view_id, Some(7));
    }

    #[test]
    fn test_chart_types_use_snake_case() {
        let option = ChartAdjustmentOption {
            chart_type: ChartType::GroupedBar,
            x_axis: Some("month".into()),
            y_axis: None,
            x_offset: None,
            color: None,
            theta: None,
        };
        let value = serde_json::to_value(&option).unwrap();
        assert_eq!(value["chartType"], "grouped_bar");
        assert_eq!(value["xAxis"], "month");
        assert!(value.get("yAxis").is_none());
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("zh-TW".parse::<Language>().unwrap(), Language::ZhTw);
        assert_eq!("simplified chinese".parse::<Language>().unwrap(), Language::ZhCn);
        assert_eq!(
            serde_json::to_string(&Language::Pt).unwrap(),
            "\"Portuguese\""
        );
        assert!("Klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_text_answer_done() {
        let json = r#"{"status": "SUCCEEDED", "numRowsUsedInLLM": 12}"#;
        let result: TextBasedAnswerResult = serde_json::from_str(json).unwrap();
        assert!(result.is_done());
        assert_eq!(result.num_rows_used_in_llm, Some(12));
    }

    #[test]
    fn test_ask_detail_result_envelope() {
        let json = r#"{"type": null, "status": "FINISHED", "error": null,
            "response": {"description": "orders per month",
                "steps": [{"summary": "count", "sql": "SELECT 1", "cteName": ""}]}}"#;
        let result: AskDetailResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.status, Stage::Finished);
        assert_eq!(result.response.unwrap().steps[0].summary, "count");

        let json = r#"{"status": "GENERATING"}"#;
        let result: AskDetailResult = serde_json::from_str(json).unwrap();
        assert!(result.response.is_none());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_recommendation_result_envelope() {
        let json = r#"{"type": null, "status": "FINISHED", "error": null,
            "response": {"questions": [{"question": "q", "category": "c", "sql": "SELECT 1"}]}}"#;
        let result: RecommendationQuestionsResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.status, RecommendationQuestionStatus::Finished);
        assert_eq!(result.response.unwrap().questions[0].category, "c");
    }
}
