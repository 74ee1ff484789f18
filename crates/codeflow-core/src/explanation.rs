use crate::EnumConversionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of line classifications returned by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExplanationKind {
    FunctionDeclaration,
    VariableDeclaration,
    Loop,
    Condition,
    Operation,
    BlockEnd,
    Return,
    Import,
    Export,
    Comment,
    Other,
}

impl ExplanationKind {
    pub const ALL: [ExplanationKind; 11] = [
        ExplanationKind::FunctionDeclaration,
        ExplanationKind::VariableDeclaration,
        ExplanationKind::Loop,
        ExplanationKind::Condition,
        ExplanationKind::Operation,
        ExplanationKind::BlockEnd,
        ExplanationKind::Return,
        ExplanationKind::Import,
        ExplanationKind::Export,
        ExplanationKind::Comment,
        ExplanationKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExplanationKind::FunctionDeclaration => "function-declaration",
            ExplanationKind::VariableDeclaration => "variable-declaration",
            ExplanationKind::Loop => "loop",
            ExplanationKind::Condition => "condition",
            ExplanationKind::Operation => "operation",
            ExplanationKind::BlockEnd => "block-end",
            ExplanationKind::Return => "return",
            ExplanationKind::Import => "import",
            ExplanationKind::Export => "export",
            ExplanationKind::Comment => "comment",
            ExplanationKind::Other => "other",
        }
    }
}

impl fmt::Display for ExplanationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExplanationKind {
    type Err = EnumConversionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ExplanationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| EnumConversionError::InvalidExplanationKind(value.to_string()))
    }
}

/// One explained source line. Rendered in insertion order; `line_number` is not
/// assumed to be contiguous or unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeExplanation {
    #[serde(rename = "lineNumber")]
    pub line_number: u32,
    pub code: String,
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: ExplanationKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names_round_trip() {
        for kind in ExplanationKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.as_str().parse::<ExplanationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert_eq!(
            "statement".parse::<ExplanationKind>(),
            Err(EnumConversionError::InvalidExplanationKind(
                "statement".to_string()
            ))
        );
        assert!(serde_json::from_str::<ExplanationKind>("\"statement\"").is_err());
    }

    #[test]
    fn test_explanation_uses_wire_field_names() {
        let json = r#"{"lineNumber":3,"code":"  i += 1;","explanation":"Increments i","type":"operation"}"#;
        let parsed: CodeExplanation = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.line_number, 3);
        assert_eq!(parsed.kind, ExplanationKind::Operation);
        assert_eq!(parsed.code, "  i += 1;");
    }
}
