//! Ask command for the MakeIt CLI.

use std::io::Write;

use color_eyre::Result;

use crate::client::MakeItClient;
use crate::models::AskResponse;
use crate::traits::HttpClient;

const EXCERPT_CHARS: usize = 80;

/// Handle the --ask command: print the answer and its ranked sources.
pub async fn handle_ask_command<C: HttpClient, W: Write>(
    client: &MakeItClient<C>,
    question: &str,
    out: &mut W,
) -> Result<()> {
    let response = client.ask(question).await?;
    render_answer(&response, out)?;
    Ok(())
}

pub fn render_answer<W: Write>(response: &AskResponse, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}", response.answer)?;

    let ranked = response.ranked_sources();
    if ranked.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Sources:")?;
    for source in ranked {
        writeln!(
            out,
            "  [{:.2}] {}",
            source.similarity,
            excerpt(&source.content)
        )?;
    }
    Ok(())
}

fn excerpt(content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;
    use serde_json::json;

    #[test]
    fn test_render_answer_ranks_sources() {
        let response = AskResponse {
            answer: "Use PVA glue.".to_string(),
            sources: vec![
                Source {
                    content: "Hide glue is reversible".to_string(),
                    similarity: 0.41,
                    metadata: json!({}),
                },
                Source {
                    content: "PVA glue\nbonds wood".to_string(),
                    similarity: 0.87,
                    metadata: json!({"page": 3}),
                },
            ],
        };
        let mut out = Vec::new();

        render_answer(&response, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Use PVA glue.\n\nSources:\n  [0.87] PVA glue bonds wood\n  [0.41] Hide glue is reversible\n"
        );
    }

    #[test]
    fn test_excerpt_truncates_long_content() {
        let long = "é".repeat(100);
        let short = excerpt(&long);
        assert_eq!(short.chars().count(), EXCERPT_CHARS + 3);
        assert!(short.ends_with("..."));
    }
}
