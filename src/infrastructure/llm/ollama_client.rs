use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{SummaryError, Summarizer};

/// Instruction template for turning a raw lecture transcription into
/// structured notes. The transcript is embedded verbatim; no length capping
/// or chunking is applied.
const NOTES_PROMPT_TEMPLATE: &str = "Du bist ein professioneller Studienassistent. Wandle diese Vorlesungstranskription in eine strukturierte Mitschrift um.

Anforderungen an die Mitschrift:
- Identifiziere die Hauptthemen und Abschnitte
- Erstelle eine Aufzählung der wichtigsten Punkte
- Behalte wichtige Definitionen, Begriffe und Beispiele bei
- Strukturiere die Information logisch
- Verwende Unterüberschriften für verschiedene Abschnitte
- Entferne Wiederholungen und Füllwörter

Vorlesungstranskription:
{transcript}

Mitschrift:";

pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn build_prompt(transcript: &str) -> String {
        NOTES_PROMPT_TEMPLATE.replace("{transcript}", transcript)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl Summarizer for OllamaClient {
    async fn summarize(&self, transcript: &str) -> Result<String, SummaryError> {
        let url = format!("{}/api/generate", self.base_url);
        let prompt = Self::build_prompt(transcript);

        tracing::info!(model = %self.model, prompt_chars = prompt.len(), "Requesting notes generation");

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt: &prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| SummaryError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummaryError::ServiceStatus {
                status: status.as_u16(),
                body,
            });
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SummaryError::InvalidResponse(e.to_string()))?;

        tracing::info!(chars = generated.response.len(), "Notes generated");
        Ok(generated.response)
    }
}
