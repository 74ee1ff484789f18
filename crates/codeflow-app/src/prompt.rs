use codeflow_core::ExplanationKind;

const RESPONSE_SHAPE: &str = r#"{
  "summary": "Brief overview of what the code does",
  "explanations": [
    {
      "lineNumber": 1,
      "code": "the exact code on this line",
      "explanation": "what this line does",
      "type": "one of the allowed types"
    }
  ],
  "flowchart": {
    "nodes": [
      {
        "id": "1",
        "type": "input",
        "position": { "x": 250, "y": 0 },
        "data": { "label": "Start" }
      }
    ],
    "edges": [
      { "id": "e1-2", "source": "1", "target": "2", "label": "Yes" }
    ]
  }
}"#;

const FLOWCHART_RULES: &str = "\
Flowchart rules:
- Use type \"input\" for the single start node, \"output\" for every end or return node, and \"default\" for everything else.
- Phrase decision nodes as a question ending in '?', for example \"n <= 1?\".
- Label the edges leaving a decision \"Yes\" and \"No\"; other edges need no label.
- Start at y = 0 and increase y by 100 to 150 per level.
- Space parallel branches 200 to 300 apart horizontally around x = 250.
- Every edge source and target must be the id of a node in the same flowchart.
- Node ids must be unique non-empty strings.";

/// Instruction sent to the model for one snippet.
pub fn build_analysis_prompt(code: &str) -> String {
    let kinds = ExplanationKind::ALL
        .iter()
        .map(|kind| format!("\"{}\"", kind.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Analyze the following code. Explain it line by line and describe its control flow \
as a flowchart.\n\n\
Respond with a single JSON object of exactly this shape and nothing else:\n{RESPONSE_SHAPE}\n\n\
Allowed explanation types: {kinds}.\n\
Line numbers start at 1 and refer to the code below.\n\n\
{FLOWCHART_RULES}\n\n\
Code:\n```\n{code}\n```\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_code_and_kinds() {
        let prompt = build_analysis_prompt("let x = 1;");
        assert!(prompt.contains("let x = 1;"));
        for kind in ExplanationKind::ALL {
            assert!(prompt.contains(kind.as_str()), "missing {kind}");
        }
        assert!(prompt.contains("\"lineNumber\""));
        assert!(prompt.contains("\"edges\""));
    }
}
