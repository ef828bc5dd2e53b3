//! Table-name inclusion filter.

use regex::Regex;

use crate::config::ConnectionConfig;

/// Decides which discovered tables take part in a crawl.
///
/// Patterns are regular expressions matched against the whole table name
/// and combined with OR. With no patterns every table is included.
#[derive(Debug, Clone, Default)]
pub struct TableFilter {
    patterns: Vec<Regex>,
}

impl TableFilter {
    /// Build a filter from pattern strings.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Regex::new(&format!("^(?:{})$", p.as_ref())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// A filter that includes every table.
    pub fn include_all() -> Self {
        Self::default()
    }

    /// Build the filter configured for a connection.
    pub fn from_config(config: &ConnectionConfig) -> Result<Self, regex::Error> {
        match &config.table_patterns {
            Some(patterns) => Self::new(patterns),
            None => Ok(Self::include_all()),
        }
    }

    /// Whether `table_name` is part of the crawl.
    pub fn include(&self, table_name: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.is_match(table_name))
    }

    /// Whether the filter has no patterns.
    pub fn is_open(&self) -> bool {
        self.patterns.is_empty()
    }
}
