use colored::*;

use crate::ai_provider::{AIProviderClient, ChatMessage};
use crate::config::Config;

/// Best-effort text helper on top of the configured AI provider.
///
/// Never fails loudly: polishing falls back to the original text and
/// suggestions fall back to an empty list, whether the provider is
/// unconfigured or the call itself errors.
pub struct Assistant {
    client: Option<AIProviderClient>,
}

impl Assistant {
    pub fn from_config(
        config: &Config,
        provider: Option<String>,
        model: Option<String>,
    ) -> Self {
        let client = match config.get_ai_config(provider, model) {
            Ok(ai_config) => Some(AIProviderClient::new(ai_config)),
            Err(e) => {
                eprintln!("{}", format!("(assistant disabled: {})", e).dimmed());
                None
            }
        };

        Assistant { client }
    }

    /// Rewrite a note with cleaner wording; the original text comes
    /// back unchanged on any failure.
    pub async fn polish(&self, text: &str) -> String {
        let client = match &self.client {
            Some(client) => client,
            None => return text.to_string(),
        };

        let system = "You polish short personal notes about contacts. \
                      Rewrite the user's note with clear wording and correct grammar. \
                      Keep the meaning and the language of the original. \
                      Reply with the rewritten note only."
            .to_string();

        match client.chat(vec![ChatMessage::user(text)], Some(system)).await {
            Ok(response) => {
                let polished = response.content.trim();
                if polished.is_empty() {
                    text.to_string()
                } else {
                    polished.to_string()
                }
            }
            Err(e) => {
                eprintln!("{}", format!("(polish unavailable: {})", e).dimmed());
                text.to_string()
            }
        }
    }

    /// Up to 3 short conversation starters for a contact, based on
    /// their recent notes. Empty on any failure.
    pub async fn suggest(&self, name: &str, recent_notes: &[String]) -> Vec<String> {
        let client = match &self.client {
            Some(client) => client,
            None => return Vec::new(),
        };

        let mut prompt = format!(
            "Suggest up to 3 short conversation starters for catching up with {}.",
            name
        );
        if !recent_notes.is_empty() {
            prompt.push_str("\nRecent notes about them:");
            for note in recent_notes {
                prompt.push_str(&format!("\n- {}", note));
            }
        }
        prompt.push_str("\nReply with one suggestion per line, no numbering.");

        match client.chat(vec![ChatMessage::user(prompt)], None).await {
            Ok(response) => parse_suggestions(&response.content),
            Err(e) => {
                eprintln!("{}", format!("(suggestions unavailable: {})", e).dimmed());
                Vec::new()
            }
        }
    }
}

// Models tend to number or bullet their lists anyway; strip that and
// cap at 3.
fn parse_suggestions(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| {
                    c.is_ascii_digit() || matches!(c, '.' | ')' | '-' | '*' | '•')
                })
                .trim()
        })
        .filter(|line| !line.is_empty())
        .take(3)
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suggestions_strips_list_markers() {
        let raw = "1. Ask about the new job\n- How was the trip?\n* Any climbing lately?";
        let suggestions = parse_suggestions(raw);

        assert_eq!(
            suggestions,
            vec![
                "Ask about the new job",
                "How was the trip?",
                "Any climbing lately?"
            ]
        );
    }

    #[test]
    fn test_parse_suggestions_caps_at_three() {
        let raw = "one\ntwo\nthree\nfour\nfive";
        assert_eq!(parse_suggestions(raw).len(), 3);
    }

    #[test]
    fn test_parse_suggestions_skips_blank_lines() {
        let raw = "\n\nCall them about the paper\n\n";
        assert_eq!(parse_suggestions(raw), vec!["Call them about the paper"]);
    }
}
