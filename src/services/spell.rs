use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::warn;

pub const MAX_SUGGESTIONS: usize = 5;
const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Deserialize)]
struct DatamuseWord {
    word: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCheck {
    pub word: String,
    /// `word` without surrounding punctuation.
    pub clean: String,
    pub correct: bool,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpellReport {
    Correct { word: String },
    Suggestions { word: String, suggestions: Vec<String> },
    NoSuggestions { word: String },
    Phrase { words: Vec<WordCheck> },
    Offline { word: String },
}

impl SpellReport {
    pub fn is_correct(&self) -> bool {
        match self {
            SpellReport::Correct { .. } => true,
            SpellReport::Phrase { words } => words.iter().all(|w| w.correct),
            _ => false,
        }
    }
}

impl fmt::Display for SpellReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpellReport::Correct { .. } => write!(f, "✓ Looks correct!"),
            SpellReport::NoSuggestions { .. } => write!(f, "no suggestions found"),
            SpellReport::Offline { .. } => write!(f, "offline or error"),
            SpellReport::Suggestions { suggestions, .. } => {
                for (i, s) in suggestions.iter().enumerate() {
                    if i == 0 {
                        writeln!(f, "▶ {} (best match)", s)?;
                    } else {
                        writeln!(f, "  {}", s)?;
                    }
                }
                Ok(())
            }
            SpellReport::Phrase { words } => {
                if words.iter().all(|w| w.correct) {
                    return write!(f, "✓ All words look correct!");
                }
                let phrase: Vec<String> = words
                    .iter()
                    .map(|w| if w.correct { w.word.clone() } else { format!("[{}]", w.word) })
                    .collect();
                writeln!(f, "{}", phrase.join(" "))?;
                for w in words.iter().filter(|w| !w.correct) {
                    if let Some(fix) = &w.suggestion {
                        let shown = if w.clean.is_empty() { &w.word } else { &w.clean };
                        writeln!(f, "{} → {}", shown, fix)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Strips leading and trailing characters other than ASCII letters and `'`.
pub fn clean_word(word: &str) -> String {
    word.trim_matches(|c: char| !(c.is_ascii_alphabetic() || c == '\''))
        .to_string()
}

/// A single word is correct when the top suggestion is the word itself.
pub fn assess_single(word: &str, results: &[String]) -> SpellReport {
    let word = word.to_string();
    match results.first() {
        None => SpellReport::NoSuggestions { word },
        Some(top) if top.eq_ignore_ascii_case(&word) => SpellReport::Correct { word },
        Some(_) => SpellReport::Suggestions {
            word,
            suggestions: results.to_vec(),
        },
    }
}

/// Within a phrase a word is correct when any result matches it exactly.
pub fn assess_word(word: &str, clean: &str, results: &[String]) -> WordCheck {
    let correct = results.iter().any(|r| r.eq_ignore_ascii_case(clean));
    WordCheck {
        word: word.to_string(),
        clean: clean.to_string(),
        correct,
        suggestion: if correct { None } else { results.first().cloned() },
    }
}

async fn lookup(client: &Client, base_url: &str, word: &str) -> Result<Vec<String>> {
    let url = format!(
        "{}/words?sp={}&max={}",
        base_url,
        urlencoding::encode(word),
        MAX_SUGGESTIONS
    );
    let words: Vec<DatamuseWord> = client
        .get(url)
        .timeout(TIMEOUT)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(words.into_iter().map(|w| w.word).collect())
}

pub async fn check(client: &Client, base_url: &str, text: &str) -> SpellReport {
    let words: Vec<&str> = text.split_whitespace().collect();

    if let [word] = words.as_slice() {
        return match lookup(client, base_url, word).await {
            Ok(results) => assess_single(word, &results),
            Err(e) => {
                warn!("Spell lookup failed: {}", e);
                SpellReport::Offline {
                    word: word.to_string(),
                }
            }
        };
    }

    let mut tasks = JoinSet::new();
    let mut checks: Vec<Option<WordCheck>> = vec![None; words.len()];
    for (i, word) in words.iter().enumerate() {
        let clean = clean_word(word);
        if clean.is_empty() {
            checks[i] = Some(WordCheck {
                word: word.to_string(),
                clean,
                correct: true,
                suggestion: None,
            });
            continue;
        }
        let (client, base_url, word) = (client.clone(), base_url.to_string(), word.to_string());
        tasks.spawn(async move {
            let check = match lookup(&client, &base_url, &clean).await {
                Ok(results) => assess_word(&word, &clean, &results),
                Err(_) => WordCheck {
                    word,
                    clean,
                    correct: false,
                    suggestion: None,
                },
            };
            (i, check)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((i, check)) => checks[i] = Some(check),
            Err(e) => warn!("Spell task failed: {}", e),
        }
    }

    let words = checks
        .into_iter()
        .zip(words)
        .map(|(check, word)| {
            check.unwrap_or_else(|| WordCheck {
                word: word.to_string(),
                clean: clean_word(word),
                correct: false,
                suggestion: None,
            })
        })
        .collect();
    SpellReport::Phrase { words }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_is_trimmed_but_apostrophes_kept() {
        assert_eq!(clean_word("\"don't,"), "don't");
        assert_eq!(clean_word("42"), "");
    }
}
