//! Content sanitizer: raw page markup to cleaned plain text.
//!
//! The rules run in a fixed order and each one assumes the output of the
//! previous one. Reordering them changes the cleaned text of every cached
//! document, so treat any change here as a cache-format break.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::SanitizerConfig;
use crate::error::{ContentShapeError, Result};

lazy_static! {
    static ref SCRIPT: Regex = Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap();
    static ref STYLE: Regex = Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap();
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->\n?").unwrap();
    static ref TAG: Regex = Regex::new(r"(?s)<.*?>").unwrap();
    static ref STRAY_URL: Regex = Regex::new(r"http\S* ").unwrap();
    static ref CHAR_ESCAPE: Regex = Regex::new(r"&#\d{3};|&\w+?;").unwrap();
    static ref CITATION: Regex = Regex::new(r"\[ (\d+|\w+) \]").unwrap();
    static ref STRAY_PERIOD: Regex = Regex::new(r" \.").unwrap();
    static ref SENTENCE_PERIOD: Regex = Regex::new(r"\. ").unwrap();
    static ref STRAY_COMMA: Regex = Regex::new(r" ,|, ").unwrap();
    static ref STRAY_SLASH: Regex = Regex::new(r" /|/ ").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s{2,}").unwrap();
}

/// Compiled cleaning rules.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    body_start: String,
    body_end: String,
    regions: Vec<Regex>,
    literals: Vec<String>,
    prefix_tokens: usize,
    punctuation: Option<Regex>,
    trailing: Vec<Regex>,
}

impl Sanitizer {
    /// Compile the rules in `config`.
    pub fn new(config: &SanitizerConfig) -> Result<Self> {
        let regions = config
            .boilerplate_regions
            .iter()
            .map(|(start, end)| {
                Regex::new(&format!(
                    "(?s){}.*?{}",
                    regex::escape(start),
                    regex::escape(end)
                ))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let punctuation = if config.punctuation.is_empty() {
            None
        } else {
            let class: String = config
                .punctuation
                .chars()
                .map(|c| regex::escape(&c.to_string()))
                .collect();
            Some(Regex::new(&format!("[{}]", class))?)
        };

        let trailing = config
            .trailing_boilerplate
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            body_start: config.body_start.clone(),
            body_end: config.body_end.clone(),
            regions,
            literals: config.boilerplate_literals.clone(),
            prefix_tokens: config.prefix_tokens,
            punctuation,
            trailing,
        })
    }

    /// Clean raw page markup into plain text.
    ///
    /// Fails when the body delimiters are missing, i.e. the page does not
    /// follow the expected document template.
    pub fn clean(&self, markup: &str) -> std::result::Result<String, ContentShapeError> {
        let mut body = self.body(markup)?.to_string();

        for region in &self.regions {
            body = region.replace_all(&body, "").into_owned();
        }
        for literal in &self.literals {
            body = body.replace(literal.as_str(), "");
        }

        let text = strip_markup(&body);

        // Page furniture (title, navigation) always leads the body.
        let text = text
            .split_whitespace()
            .skip(self.prefix_tokens)
            .collect::<Vec<_>>()
            .join(" ");

        let text = STRAY_URL.replace_all(&text, "");
        let text = CHAR_ESCAPE.replace_all(&text, "");
        let text: String = text.chars().filter(char::is_ascii).collect();
        let text = CITATION.replace_all(&text, "");
        let text = match &self.punctuation {
            Some(punctuation) => punctuation.replace_all(&text, " "),
            None => text,
        };
        let text = STRAY_PERIOD.replace_all(&text, " ");
        let text = SENTENCE_PERIOD.replace_all(&text, " ");
        let text = STRAY_COMMA.replace_all(&text, " ");
        let text = STRAY_SLASH.replace_all(&text, " ");
        let mut text = WHITESPACE_RUN.replace_all(&text, " ").into_owned();

        for pattern in &self.trailing {
            text = pattern.replace_all(&text, "").into_owned();
        }

        Ok(text.trim().to_string())
    }

    /// Everything between the first body start marker and the last body end marker.
    fn body<'a>(&self, markup: &'a str) -> std::result::Result<&'a str, ContentShapeError> {
        let start = markup
            .find(&self.body_start)
            .map(|i| i + self.body_start.len())
            .ok_or_else(|| ContentShapeError {
                marker: self.body_start.clone(),
            })?;
        let end = markup[start..]
            .rfind(&self.body_end)
            .map(|i| start + i)
            .ok_or_else(|| ContentShapeError {
                marker: self.body_end.clone(),
            })?;
        Ok(&markup[start..end])
    }
}

/// Drop scripts, styles and comments, replace every tag with a space.
fn strip_markup(html: &str) -> String {
    let text = SCRIPT.replace_all(html, "");
    let text = STYLE.replace_all(&text, "");
    let text = COMMENT.replace_all(&text, "");
    let text = TAG.replace_all(&text, " ");
    text.replace("&nbsp;", " ")
}
