use crate::style::{Color, get_kind_badge_colors};
use codeflow_core::{AnalysisResult, ExplanationKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ExplanationRow {
    pub line_number: u32,
    pub code: String,
    pub explanation: String,
    pub kind: ExplanationKind,
    pub badge_fill: Color,
    pub badge_text: Color,
}

impl ExplanationRow {
    pub fn badge(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// Read-only rows for the explanation panel, in the order the model returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplanationView {
    pub summary: String,
    pub rows: Vec<ExplanationRow>,
}

impl ExplanationView {
    /// `None` when there is no result: the panel renders nothing at all.
    pub fn from_result(result: Option<&AnalysisResult>) -> Option<Self> {
        let result = result?;
        let rows = result
            .explanations
            .iter()
            .map(|item| {
                let (badge_fill, badge_text) = get_kind_badge_colors(item.kind);
                ExplanationRow {
                    line_number: item.line_number,
                    code: item.code.clone(),
                    explanation: item.explanation.clone(),
                    kind: item.kind,
                    badge_fill,
                    badge_text,
                }
            })
            .collect();
        Some(Self {
            summary: result.summary.clone(),
            rows,
        })
    }

    pub fn has_summary(&self) -> bool {
        !self.summary.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeflow_core::{CodeExplanation, Flowchart};
    use std::sync::Arc;

    fn explanation(line_number: u32, kind: ExplanationKind) -> CodeExplanation {
        CodeExplanation {
            line_number,
            code: format!("line {line_number}"),
            explanation: "does a thing".to_string(),
            kind,
        }
    }

    #[test]
    fn test_absent_result_renders_nothing() {
        assert_eq!(ExplanationView::from_result(None), None);
    }

    #[test]
    fn test_rows_keep_insertion_order() {
        let result = AnalysisResult {
            summary: "Sums numbers.".to_string(),
            explanations: vec![
                explanation(3, ExplanationKind::Loop),
                explanation(1, ExplanationKind::FunctionDeclaration),
                explanation(3, ExplanationKind::BlockEnd),
            ],
            flowchart: Arc::new(Flowchart::default()),
        };
        let view = ExplanationView::from_result(Some(&result)).unwrap();
        let lines: Vec<u32> = view.rows.iter().map(|r| r.line_number).collect();
        assert_eq!(lines, vec![3, 1, 3]);
        assert_eq!(view.rows[0].badge(), "loop");
        assert_eq!(view.rows[2].badge(), "block-end");
        assert!(view.has_summary());
    }

    #[test]
    fn test_empty_summary() {
        let result = AnalysisResult {
            summary: "  ".to_string(),
            explanations: Vec::new(),
            flowchart: Arc::new(Flowchart::default()),
        };
        let view = ExplanationView::from_result(Some(&result)).unwrap();
        assert!(view.rows.is_empty());
        assert!(!view.has_summary());
    }
}
