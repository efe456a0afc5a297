//! Alert types mirroring Vale's JSON output.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Severity level reported by the engine.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suggestion - stylistic nudge.
    #[default]
    Suggestion,
    /// Warning - should be reviewed.
    Warning,
    /// Error - must be fixed.
    Error,
}

impl Severity {
    /// All severities, mildest first.
    pub const ALL: [Severity; 3] = [Severity::Suggestion, Severity::Warning, Severity::Error];

    /// Returns the token used on the wire and in `.vale.ini`.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Suggestion => "suggestion",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "suggestion" => Ok(Severity::Suggestion),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            other => Err(UnknownSeverity(other.to_string())),
        }
    }
}

/// Returned when a severity token is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity: {0}")]
pub struct UnknownSeverity(pub String);

/// Suggested action attached to an alert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlertAction {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub params: Vec<String>,
}

/// A single diagnostic produced by the engine.
///
/// Line and span are 1-based, as Vale reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Alert {
    #[serde(default)]
    pub action: AlertAction,
    /// Fully qualified rule name, e.g. `Vale.Spelling`.
    pub check: String,
    #[serde(default)]
    pub description: String,
    pub line: u32,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub link: Option<String>,
    pub message: String,
    pub severity: Severity,
    pub span: [u32; 2],
    /// The text the rule matched.
    #[serde(default, rename = "Match")]
    pub match_text: String,
}

impl Alert {
    /// Creates an alert with the required fields set.
    pub fn new(
        check: impl Into<String>,
        message: impl Into<String>,
        line: u32,
        span: [u32; 2],
    ) -> Self {
        Self {
            action: AlertAction::default(),
            check: check.into(),
            description: String::new(),
            line,
            link: None,
            message: message.into(),
            severity: Severity::default(),
            span,
            match_text: String::new(),
        }
    }

    /// Sets the severity level.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the matched text.
    pub fn with_match(mut self, text: impl Into<String>) -> Self {
        self.match_text = text.into();
        self
    }

    /// The style half of `check` (`Vale` for `Vale.Spelling`).
    pub fn style(&self) -> &str {
        self.check
            .split_once('.')
            .map_or(self.check.as_str(), |(style, _)| style)
    }
}

/// Engine response: alerts grouped by the format key of the request.
///
/// Key order and per-key alert order are kept exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertsByFormat(IndexMap<String, Vec<Alert>>);

impl AlertsByFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the JSON body produced by the engine.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, format: impl Into<String>, alerts: Vec<Alert>) {
        self.0.insert(format.into(), alerts);
    }

    /// Alerts reported for `format`.
    pub fn get(&self, format: &str) -> Option<&[Alert]> {
        self.0.get(format).map(Vec::as_slice)
    }

    /// The first alert list in the response.
    ///
    /// A check submits a single format, so this is the list for that format
    /// regardless of how the engine spelled the key.
    pub fn first(&self) -> &[Alert] {
        self.0.values().next().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Total number of alerts over all formats.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Alert])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl FromIterator<(String, Vec<Alert>)> for AlertsByFormat {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Alert>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const SAMPLE: &str = r#"{
        "stdin.md": [
            {
                "Action": {"Name": "replace", "Params": ["very"]},
                "Check": "Vale.Spelling",
                "Description": "",
                "Line": 3,
                "Link": "",
                "Message": "Did you really mean 'verry'?",
                "Severity": "error",
                "Span": [5, 9],
                "Match": "verry"
            },
            {
                "Action": {"Name": "", "Params": null},
                "Check": "Google.Passive",
                "Description": "Use active voice.",
                "Line": 1,
                "Link": "https://developers.google.com/style/voice",
                "Message": "In general, use active voice instead of passive voice ('was written').",
                "Severity": "suggestion",
                "Span": [10, 20],
                "Match": "was written"
            }
        ]
    }"#;

    #[test]
    fn test_parse_engine_output_preserves_order() {
        let response = AlertsByFormat::from_json(SAMPLE).unwrap();
        let alerts = response.get("stdin.md").unwrap();

        assert_eq!(alerts.len(), 2);
        // Engine order, not line order.
        assert_eq!(alerts[0].check, "Vale.Spelling");
        assert_eq!(alerts[1].check, "Google.Passive");
        assert_eq!(alerts[0].span, [5, 9]);
        assert_eq!(alerts[0].match_text, "verry");
        assert_eq!(alerts[0].action.params, vec!["very".to_string()]);
    }

    #[test]
    fn test_null_params_and_empty_link() {
        let response = AlertsByFormat::from_json(SAMPLE).unwrap();
        let alerts = response.first();

        assert_eq!(alerts[0].link, None);
        assert!(alerts[1].action.params.is_empty());
        assert_eq!(
            alerts[1].link.as_deref(),
            Some("https://developers.google.com/style/voice")
        );
    }

    #[test]
    fn test_first_of_empty_response() {
        let response = AlertsByFormat::new();
        assert!(response.first().is_empty());
        assert!(response.is_empty());
        assert_eq!(response.len(), 0);
    }

    #[test]
    fn test_unknown_severity_is_rejected() {
        let json = r#"{".md": [{"Check": "A.B", "Line": 1, "Message": "m", "Severity": "fatal", "Span": [1, 2]}]}"#;
        assert!(AlertsByFormat::from_json(json).is_err());
    }

    #[rstest]
    #[case("suggestion", Severity::Suggestion)]
    #[case("warning", Severity::Warning)]
    #[case("error", Severity::Error)]
    fn test_severity_tokens(#[case] token: &str, #[case] expected: Severity) {
        assert_eq!(token.parse::<Severity>().unwrap(), expected);
        assert_eq!(expected.as_str(), token);
    }

    #[test]
    fn test_alert_style() {
        let alert = Alert::new("Microsoft.Contractions", "m", 1, [1, 2]);
        assert_eq!(alert.style(), "Microsoft");

        let bare = Alert::new("NoDot", "m", 1, [1, 2]);
        assert_eq!(bare.style(), "NoDot");
    }
}
