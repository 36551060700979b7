//! Per-name batch results

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Result record for one plugin name
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Outcome {
    pub message: String,
}

/// Mapping from requested plugin name to its outcome.
///
/// Entries keep first-insertion order; inserting an existing name overwrites
/// its message in place. Serializes as a JSON object keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    entries: Vec<(String, Outcome)>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, message: impl Into<String>) {
        let name = name.into();
        let outcome = Outcome { message: message.into() };
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = outcome,
            None => self.entries.push((name, outcome)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, o)| o.message.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.entries.iter().map(|(n, o)| (n.as_str(), o))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty JSON with 2-space indent, the form replies are sent in
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for BatchReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, outcome) in &self.entries {
            map.serialize_entry(name, outcome)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut report = BatchReport::new();
        report.insert("a", "plugin mount success");
        report.insert("b", "plugin is undefined");
        report.insert("a", "plugin has been mounted");

        assert_eq!(report.len(), 2);
        assert_eq!(report.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(report.get("a"), Some("plugin has been mounted"));
    }

    #[test]
    fn test_pretty_json_shape() {
        let mut report = BatchReport::new();
        report.insert("a", "plugin mount success");
        report.insert("b", "plugin is undefined");

        let expected = "{\n  \"a\": {\n    \"message\": \"plugin mount success\"\n  },\n  \"b\": {\n    \"message\": \"plugin is undefined\"\n  }\n}";
        assert_eq!(report.to_pretty_json().unwrap(), expected);
    }

    #[test]
    fn test_empty_report_renders_empty_object() {
        assert_eq!(BatchReport::new().to_pretty_json().unwrap(), "{}");
    }
}
