//! Fallback-first wrapper around the Gemini client.
//!
//! Every method resolves to a usable value: when the key is missing or the
//! upstream call fails, the documented placeholder result is returned instead
//! of an error, so a misconfigured deployment degrades to static content
//! rather than failing requests.

use serde::Deserialize;
use tracing::{error, warn};

use crate::clients::gemini::GeminiClient;
use crate::domain::types::{AwarenessCategory, DocType, IncidentSeverity, Quiz};

const MISSING_KEY_MESSAGE: &str =
    "Erro de Configuração: Chave de API da IA não encontrada. Defina GEMINI_API_KEY no ambiente.";
const API_ERROR_MESSAGE: &str =
    "Ocorreu um erro técnico ao comunicar com a IA. Verifique se a chave de API é válida.";

#[derive(Debug, Clone)]
pub struct DocumentDraft {
    pub content: String,
    pub ai_assisted: bool,
}

#[derive(Debug, Clone)]
pub struct IncidentAnalysis {
    pub severity: IncidentSeverity,
    pub analysis: String,
}

#[derive(Debug, Clone)]
pub struct GeneratedPost {
    pub title: String,
    pub content: String,
    pub quiz: Option<Quiz>,
}

#[derive(Debug, Deserialize)]
struct AnalysisPayload {
    severity: Option<IncidentSeverity>,
    analysis: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostPayload {
    title: Option<String>,
    content: Option<String>,
    quiz: Option<Quiz>,
}

pub struct GenerationService {
    gemini: GeminiClient,
    enabled: bool,
}

impl GenerationService {
    #[must_use]
    pub const fn new(gemini: GeminiClient, enabled: bool) -> Self {
        Self { gemini, enabled }
    }

    fn available(&self) -> bool {
        self.enabled && self.gemini.is_configured()
    }

    /// Drafts a legal document for the tenant. The draft is markdown in
    /// Brazilian Portuguese, grounded on the tenant's mapped data categories.
    pub async fn draft_document(
        &self,
        title: &str,
        doc_type: DocType,
        company_name: &str,
        industry: &str,
        data_types: &[String],
    ) -> DocumentDraft {
        if !self.available() {
            warn!("Document generation requested without a configured AI key");
            return DocumentDraft {
                content: MISSING_KEY_MESSAGE.to_string(),
                ai_assisted: false,
            };
        }

        let data_types = if data_types.is_empty() {
            "Nome, Email".to_string()
        } else {
            data_types.join(", ")
        };

        let prompt = format!(
            "Act as a data-protection lawyer specialized in LGPD (Lei 13.709/2018, Brazil).\n\
             Draft a complete, professional \"{title}\" ({doc_type}) for the data controller below.\n\
             Company: \"{company_name}\"\n\
             Industry: \"{industry}\"\n\
             Personal data categories processed: {data_types}.\n\
             Requirements: strict LGPD compliance; clear but formal legal language; include \
             definitions, processing purposes, data-subject rights, security, retention and DPO \
             contact sections; output clean Markdown only, no greetings; write in Brazilian \
             Portuguese."
        );

        match self.gemini.generate_text(&prompt).await {
            Ok(text) if !text.trim().is_empty() => DocumentDraft {
                content: text,
                ai_assisted: true,
            },
            Ok(_) => DocumentDraft {
                content: "Falha ao gerar o documento.".to_string(),
                ai_assisted: false,
            },
            Err(e) => {
                error!("Gemini API error: {e}");
                DocumentDraft {
                    content: API_ERROR_MESSAGE.to_string(),
                    ai_assisted: false,
                }
            }
        }
    }

    /// Classifies an incident description into a severity plus a short
    /// written assessment. Falls back to `medium` when the model is
    /// unavailable or returns garbage.
    pub async fn analyze_incident(&self, description: &str) -> IncidentAnalysis {
        if !self.available() {
            return IncidentAnalysis {
                severity: IncidentSeverity::Medium,
                analysis: MISSING_KEY_MESSAGE.to_string(),
            };
        }

        let prompt = format!(
            "Analyze the following security-incident description in the context of the Brazilian \
             LGPD.\nDescription: \"{description}\"\n\
             Determine the likely severity (low, medium, high or critical) and give a short \
             justification with recommended immediate actions, written in Brazilian Portuguese.\n\
             Reply with a valid JSON object with keys \"severity\" (low|medium|high|critical) \
             and \"analysis\" (string)."
        );

        match self.gemini.generate_json(&prompt).await {
            Ok(text) => {
                let payload: Option<AnalysisPayload> =
                    serde_json::from_str(&extract_json(&text)).ok();

                match payload {
                    Some(p) => IncidentAnalysis {
                        severity: p.severity.unwrap_or(IncidentSeverity::Medium),
                        analysis: p.analysis.unwrap_or_else(|| {
                            "Não foi possível analisar o incidente automaticamente.".to_string()
                        }),
                    },
                    None => IncidentAnalysis {
                        severity: IncidentSeverity::Medium,
                        analysis: "Não foi possível analisar o incidente automaticamente."
                            .to_string(),
                    },
                }
            }
            Err(e) => {
                error!("Gemini API error: {e}");
                IncidentAnalysis {
                    severity: IncidentSeverity::Medium,
                    analysis: "Erro de conexão com a IA. Tente novamente mais tarde.".to_string(),
                }
            }
        }
    }

    /// Generates a short awareness-training post with an attached quiz.
    /// A malformed quiz is dropped rather than stored.
    pub async fn generate_awareness_post(
        &self,
        topic: &str,
        category: AwarenessCategory,
    ) -> GeneratedPost {
        if !self.available() {
            return GeneratedPost {
                title: "Erro na Geração".to_string(),
                content: MISSING_KEY_MESSAGE.to_string(),
                quiz: None,
            };
        }

        let prompt = format!(
            "Act as a privacy-culture and LGPD training specialist.\n\
             Write a short internal-newsletter training module.\n\
             Category: \"{category}\"\nTopic: \"{topic}\"\n\
             The goal is educating employees on day-to-day data protection; accessible but \
             professional tone; rich Markdown body; written in Brazilian Portuguese.\n\
             Include one multiple-choice question testing the content.\n\
             Reply with a valid JSON object: {{\"title\": string (short, with an emoji), \
             \"content\": markdown string, \"quiz\": {{\"question\": string, \"options\": \
             [4 strings], \"correct_answer_index\": 0-3, \"explanation\": string}}}}."
        );

        match self.gemini.generate_json(&prompt).await {
            Ok(text) => {
                let payload: Option<PostPayload> = serde_json::from_str(&extract_json(&text)).ok();

                match payload {
                    Some(p) => GeneratedPost {
                        title: p.title.unwrap_or_else(|| topic.to_string()),
                        content: p
                            .content
                            .unwrap_or_else(|| "Conteúdo indisponível.".to_string()),
                        quiz: p.quiz.filter(Quiz::is_valid),
                    },
                    None => GeneratedPost {
                        title: "Erro na Geração".to_string(),
                        content: "Não foi possível gerar o conteúdo devido a um erro na resposta \
                                  da IA."
                            .to_string(),
                        quiz: None,
                    },
                }
            }
            Err(e) => {
                error!("Gemini API error: {e}");
                GeneratedPost {
                    title: "Erro na Geração".to_string(),
                    content: API_ERROR_MESSAGE.to_string(),
                    quiz: None,
                }
            }
        }
    }
}

/// Pulls the first JSON object or array out of a model response that may be
/// wrapped in prose or code fences.
fn extract_json(response: &str) -> String {
    let trimmed = response.trim();

    let without_fence = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map_or(trimmed, |rest| rest.trim_end_matches("```").trim());

    if without_fence.starts_with('{') || without_fence.starts_with('[') {
        return without_fence.to_string();
    }

    let open = without_fence.find(['{', '[']);
    let close = without_fence.rfind(['}', ']']);

    match (open, close) {
        (Some(start), Some(end)) if end > start => without_fence[start..=end].to_string(),
        _ => without_fence.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_json() {
        let raw = r#"{"severity": "high", "analysis": "x"}"#;
        assert_eq!(extract_json(raw), raw);
    }

    #[test]
    fn extracts_fenced_json() {
        let raw = "```json\n{\"title\": \"x\"}\n```";
        assert_eq!(extract_json(raw), "{\"title\": \"x\"}");
    }

    #[test]
    fn extracts_json_embedded_in_prose() {
        let raw = "Sure, here you go: {\"a\": 1} hope that helps";
        assert_eq!(extract_json(raw), "{\"a\": 1}");
    }

    #[test]
    fn malformed_quiz_is_dropped_on_parse() {
        let payload: PostPayload = serde_json::from_str(
            r#"{"title": "t", "content": "c", "quiz": {
                "question": "q",
                "options": ["a", "b"],
                "correct_answer_index": 0,
                "explanation": "e"
            }}"#,
        )
        .unwrap();

        assert!(payload.quiz.is_some());
        assert!(payload.quiz.filter(Quiz::is_valid).is_none());
    }
}
