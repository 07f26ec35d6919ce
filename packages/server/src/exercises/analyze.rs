//! Line-oriented parser for the word-analysis response.
//!
//! The model is instructed to answer with one `Field: value` pair per
//! line. Field labels are matched case-insensitively; unknown lines are
//! ignored. A response with no English translation is treated as a parse
//! failure.

use serde::Serialize;

const WORD_TYPES: &[&str] = &["verb", "noun", "adjective", "adverb", "phrase", "other"];
const CATEGORIES: &[&str] = &["conversation", "grammar", "vocabulary"];

/// Structured analysis of one German word or phrase.
#[derive(Debug, Clone, Serialize)]
pub struct WordAnalysis {
    pub german: String,
    pub english: String,
    pub russian: String,
    #[serde(rename = "type")]
    pub word_type: String,
    pub category: String,
    pub explanation: String,
    pub examples: Vec<String>,
}

impl WordAnalysis {
    fn empty() -> Self {
        Self {
            german: String::new(),
            english: String::new(),
            russian: String::new(),
            word_type: "other".to_string(),
            category: "vocabulary".to_string(),
            explanation: String::new(),
            examples: Vec::new(),
        }
    }
}

/// Parse a model response into a [`WordAnalysis`].
///
/// Returns `None` when no English translation could be extracted, which
/// the caller surfaces as a failed analysis.
pub fn parse_word_analysis(response: &str) -> Option<WordAnalysis> {
    let mut analysis = WordAnalysis::empty();

    for line in response.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let lower = line.to_lowercase();

        let value = |line: &str| -> String {
            line.splitn(2, ':').nth(1).unwrap_or("").trim().to_string()
        };

        if lower.starts_with("german:") {
            analysis.german = value(line);
        } else if lower.starts_with("english:") {
            analysis.english = value(line);
        } else if lower.starts_with("russian:") {
            analysis.russian = value(line);
        } else if lower.starts_with("type:") {
            let t = value(line).to_lowercase();
            if WORD_TYPES.contains(&t.as_str()) {
                analysis.word_type = t;
            }
        } else if lower.starts_with("category:") {
            let c = value(line).to_lowercase();
            if CATEGORIES.contains(&c.as_str()) {
                analysis.category = c;
            }
        } else if lower.starts_with("explanation:") {
            analysis.explanation = value(line);
        } else if lower.starts_with("example") {
            let example = value(line);
            if !example.is_empty() {
                analysis.examples.push(example);
            }
        }
    }

    if analysis.english.is_empty() {
        return None;
    }
    Some(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = "\
German: gehen
English: to go
Russian: идти
Type: verb
Category: vocabulary
Explanation: Common verb of motion. Irregular past: ging, gegangen.
Example1: Ich gehe nach Hause. - I go home.
Example2: Wir gingen gestern spazieren. - We went for a walk yesterday.
";

    #[test]
    fn parses_all_fields() {
        let analysis = parse_word_analysis(RESPONSE).unwrap();
        assert_eq!(analysis.german, "gehen");
        assert_eq!(analysis.english, "to go");
        assert_eq!(analysis.russian, "идти");
        assert_eq!(analysis.word_type, "verb");
        assert_eq!(analysis.category, "vocabulary");
        assert_eq!(analysis.examples.len(), 2);
        assert!(analysis.examples[0].starts_with("Ich gehe"));
    }

    #[test]
    fn labels_match_case_insensitively() {
        let analysis = parse_word_analysis("GERMAN: Haus\nENGLISH: house").unwrap();
        assert_eq!(analysis.german, "Haus");
        assert_eq!(analysis.english, "house");
    }

    #[test]
    fn invalid_type_and_category_fall_back_to_defaults() {
        let analysis =
            parse_word_analysis("English: test\nType: gerund\nCategory: slang").unwrap();
        assert_eq!(analysis.word_type, "other");
        assert_eq!(analysis.category, "vocabulary");
    }

    #[test]
    fn missing_english_is_a_parse_failure() {
        assert!(parse_word_analysis("German: gehen\nType: verb").is_none());
        assert!(parse_word_analysis("").is_none());
    }

    #[test]
    fn unknown_lines_are_ignored() {
        let analysis =
            parse_word_analysis("Here is the analysis:\nEnglish: dog\n---\nNotes: n/a").unwrap();
        assert_eq!(analysis.english, "dog");
    }
}
