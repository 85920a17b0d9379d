//! Search query builder
//!
//! Composes the free-text `q` parameter: plain terms are ANDed by
//! juxtaposition, `|` separates alternatives, quoted phrases match exactly,
//! `-` excludes and `label:` restricts to a label.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Term(String),
    Or,
}

/// Builder for search query strings
///
/// ```
/// use blogfeed::Query;
///
/// let q = Query::new()
///     .term("rust")
///     .or()
///     .exact("async runtime")
///     .exclude("java")
///     .build();
/// assert_eq!(q, r#"rust | "async runtime" -java"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    tokens: Vec<Token>,
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', ""))
}

fn quote_if_spaced(text: &str) -> String {
    if text.chars().any(char::is_whitespace) {
        quote(text)
    } else {
        text.to_string()
    }
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, token: Option<String>) -> Self {
        if let Some(token) = token {
            self.tokens.push(Token::Term(token));
        }
        self
    }

    /// Plain term (or several space separated words)
    pub fn term(self, term: &str) -> Self {
        let term = term.trim();
        self.push((!term.is_empty()).then(|| term.to_string()))
    }

    /// Several plain terms, all required
    pub fn terms<I, S>(self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        terms.into_iter().fold(self, |q, t| q.term(t.as_ref()))
    }

    /// Phrase matched exactly
    pub fn exact(self, phrase: &str) -> Self {
        let phrase = phrase.trim();
        self.push((!phrase.is_empty()).then(|| quote(phrase)))
    }

    /// Term or phrase that must not appear
    pub fn exclude(self, term: &str) -> Self {
        let term = term.trim();
        self.push((!term.is_empty()).then(|| format!("-{}", quote_if_spaced(term))))
    }

    /// Restrict to entries carrying a label
    pub fn label(self, label: &str) -> Self {
        let label = label.trim();
        self.push((!label.is_empty()).then(|| format!("label:{}", quote_if_spaced(label))))
    }

    /// Make the previous and next parts alternatives
    pub fn or(mut self) -> Self {
        self.tokens.push(Token::Or);
        self
    }

    /// AND is implicit; kept so chains read naturally
    pub fn and(self) -> Self {
        self
    }

    /// Alternatives between several plain terms
    pub fn any_of<I, S>(self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut first = true;
        let mut query = self;
        for term in terms {
            if term.as_ref().trim().is_empty() {
                continue;
            }
            if !first {
                query = query.or();
            }
            query = query.term(term.as_ref());
            first = false;
        }
        query
    }

    /// True when no term has been added
    pub fn is_empty(&self) -> bool {
        !self.tokens.iter().any(|t| matches!(t, Token::Term(_)))
    }

    /// Render the query; dangling or repeated `|` are dropped
    pub fn build(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        let mut pending_or = false;
        for token in &self.tokens {
            match token {
                Token::Or => pending_or = !parts.is_empty(),
                Token::Term(term) => {
                    if pending_or {
                        parts.push("|");
                        pending_or = false;
                    }
                    parts.push(term);
                }
            }
        }
        parts.join(" ")
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.build()
    }
}
