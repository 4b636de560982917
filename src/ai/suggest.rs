//! Gemini API integration for analysis suggestions.
//!
//! The model call is the only slow, failable operation in the tool. It is a
//! remote function with a JSON-validated request/response contract: we send
//! the windowed time series plus context in a templated prompt, and the model
//! answers with a JSON list of suggested analyses. Retries and rate limiting
//! belong to the hosted service, not here. Failures never touch the loaded
//! dataset.

use std::collections::BTreeMap;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{AdherenceRecord, AnalysisSuggestion, TimeWindow};
use crate::error::AppError;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MODEL: &str = "gemini-2.0-flash";

/// One data point as sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub timestamp: f64,
    pub adherence_rate: f64,
    /// Other clinical measures available for correlation analysis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_variables: Option<BTreeMap<String, String>>,
}

/// Input contract of the suggestion call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub time_series_data: Vec<SeriesPoint>,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,
}

impl SuggestionRequest {
    /// Build a request from the loaded records, keeping only points inside the
    /// window. Records with no extra columns send no `otherVariables` at all.
    pub fn from_records(
        records: &[AdherenceRecord],
        window: TimeWindow,
        additional_context: Option<String>,
    ) -> Self {
        let time_series_data = records
            .iter()
            .filter(|r| window.contains(r.timestamp))
            .map(|r| SeriesPoint {
                timestamp: r.timestamp,
                adherence_rate: r.adherence_rate,
                other_variables: if r.extras.is_empty() {
                    None
                } else {
                    Some(r.extras.clone())
                },
            })
            .collect();

        Self {
            time_series_data,
            start_time: window.start,
            end_time: window.end,
            additional_context,
        }
    }
}

/// Output contract of the suggestion call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub suggested_analyses: Vec<AnalysisSuggestion>,
}

pub struct SuggestClient {
    client: Client,
    api_key: String,
}

impl SuggestClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| AppError::Suggestion("Missing GEMINI_API_KEY in environment (.env).".to_string()))?;
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }

    /// Ask the model which analyses fit the given time window.
    pub fn suggest(&self, request: &SuggestionRequest) -> Result<SuggestionResponse, AppError> {
        let prompt = build_prompt(request);
        log::debug!(
            "requesting suggestions for {} points in [{}, {}]",
            request.time_series_data.len(),
            request.start_time,
            request.end_time
        );

        let body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let url = format!("{BASE_URL}/{MODEL}:generateContent");
        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| AppError::Suggestion(format!("Request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::Suggestion(format!(
                "Request failed with status {}.",
                resp.status()
            )));
        }

        let body: GenerateContentResponse = resp
            .json()
            .map_err(|e| AppError::Suggestion(format!("Failed to parse response: {e}")))?;

        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| AppError::Suggestion("Model returned no candidates.".to_string()))?;

        parse_suggestions(text)
    }
}

/// Parse and schema-validate the model's JSON answer.
pub fn parse_suggestions(text: &str) -> Result<SuggestionResponse, AppError> {
    let json = strip_code_fences(text);
    let parsed: SuggestionResponse = serde_json::from_str(json)
        .map_err(|e| AppError::Suggestion(format!("Response did not match the expected schema: {e}")))?;

    if parsed.suggested_analyses.is_empty() {
        return Err(AppError::Suggestion("Model returned no suggestions.".to_string()));
    }

    Ok(parsed)
}

/// Render the prompt template for a request.
pub fn build_prompt(request: &SuggestionRequest) -> String {
    let mut out = String::new();

    out.push_str("You are an expert data analyst specializing in medication adherence patterns.\n\n");
    out.push_str(
        "You are provided with time series data of medication adherence rates within a \
         specific time window. Your task is to suggest relevant analyses that can help \
         identify statistically significant trends and insights.\n\n",
    );
    out.push_str(
        "Consider factors like trends, seasonality, anomalies, and correlations with \
         other available variables.\n\n",
    );

    out.push_str(&format!("Time Window Start: {}\n", request.start_time));
    out.push_str(&format!("Time Window End: {}\n\n", request.end_time));

    out.push_str("Time Series Data:\n");
    for point in &request.time_series_data {
        out.push_str(&format!(
            "  Timestamp: {}, Adherence Rate: {}",
            point.timestamp, point.adherence_rate
        ));
        if let Some(vars) = &point.other_variables {
            // Known-serializable input (string map), so this cannot fail.
            if let Ok(json) = serde_json::to_string(vars) {
                out.push_str(&format!(", Other Variables: {json}"));
            }
        }
        out.push('\n');
    }

    if let Some(context) = &request.additional_context {
        out.push_str(&format!("\nAdditional Context: {context}\n"));
    }

    out.push_str(
        "\nBased on this data, suggest at least three relevant analyses that would be \
         helpful to a researcher. For each analysis, provide a detailed description and \
         the rationale behind your suggestion.\n\n",
    );
    out.push_str(
        "Respond with a JSON object containing a \"suggestedAnalyses\" array; each item \
         must have \"analysisType\", \"description\", and \"rationale\" string fields.\n",
    );

    out
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the fence's language tag line and the closing fence.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches(['\r', '\n'])
        .trim_end_matches('`')
        .trim()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}
