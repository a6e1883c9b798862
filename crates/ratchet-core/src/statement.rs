//! Revision statements and `${name}` placeholder resolution.

use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::arguments::Arguments;

/// Matches `${name}` where `name` starts with a letter or underscore.
fn placeholder_pattern() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_.\-]*)\}").expect("valid regex literal")
    })
}

/// A single SQL statement belonging to a revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// SQL executed exactly as written.
    Literal(String),
    /// SQL template whose `${name}` placeholders are filled from [`Arguments`].
    Parameterized(String),
}

/// The first placeholder in a template with no matching argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingArgument(pub String);

impl Statement {
    /// Create a literal statement.
    pub fn literal(sql: impl Into<String>) -> Self {
        Statement::Literal(sql.into())
    }

    /// Create a parameterized statement.
    pub fn parameterized(template: impl Into<String>) -> Self {
        Statement::Parameterized(template.into())
    }

    /// The raw text, with placeholders left in place.
    pub fn text(&self) -> &str {
        match self {
            Statement::Literal(sql) | Statement::Parameterized(sql) => sql,
        }
    }

    /// Distinct placeholder names in order of first occurrence.
    ///
    /// Always empty for literal statements: `${...}` in literal SQL is not a
    /// placeholder.
    pub fn placeholders(&self) -> Vec<&str> {
        let Statement::Parameterized(template) = self else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        placeholder_pattern()
            .captures_iter(template)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Produce the SQL to execute.
    ///
    /// Every placeholder must have an argument; nothing is substituted unless
    /// all of them do. Substituted values are not scanned again.
    pub fn resolve<'a>(&'a self, arguments: &Arguments) -> Result<Cow<'a, str>, MissingArgument> {
        let template = match self {
            Statement::Literal(sql) => return Ok(Cow::Borrowed(sql)),
            Statement::Parameterized(template) => template,
        };

        if let Some(missing) = self
            .placeholders()
            .into_iter()
            .find(|name| !arguments.contains(name))
        {
            return Err(MissingArgument(missing.to_string()));
        }

        Ok(placeholder_pattern().replace_all(template, |caps: &regex::Captures<'_>| {
            arguments.get(&caps[1]).unwrap_or_default().to_string()
        }))
    }
}

#[cfg(test)]
#[path = "statement_test.rs"]
mod tests;
