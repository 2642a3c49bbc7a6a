use regex::Regex;

/// Recognises `/<prefix>/<id>-<name>` request paths.
///
/// Everything up to the last hyphen is the file identifier and the remainder
/// (conventionally a display filename) is ignored, so
/// `/gridfs/507f1f77bcf86cd799439011-report-2024.pdf` yields
/// `507f1f77bcf86cd799439011-report`. ObjectIds never contain hyphens; such a
/// path resolves to an invalid identifier rather than a wrong file.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    prefix: String,
    pattern: Regex,
}

impl PathMatcher {
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!("^/{}/(.+)-(.+)$", regex::escape(prefix)))?;
        Ok(Self {
            prefix: prefix.to_string(),
            pattern,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Identifier part of `path`, or `None` when the request is not ours.
    pub fn file_id<'a>(&self, path: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(path)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}
