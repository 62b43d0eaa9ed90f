//! Parse LLM output into a fiscal record

use crate::error::ExtractorError;
use fiscal_domain::FiscalRecord;
use serde_json::Value;

/// Parse an LLM JSON response into a record
///
/// Syntax errors map to `JsonParse`; valid JSON of the wrong shape maps to
/// `InvalidFormat`. Both count as malformed output for the retry loop.
pub fn parse_llm_response(response: &str) -> Result<FiscalRecord, ExtractorError> {
    // Schema-constrained output should be bare JSON, but tolerate a code fence
    let json_str = extract_json(response);

    let json: Value = serde_json::from_str(json_str)?;

    if !json.is_object() {
        return Err(ExtractorError::InvalidFormat(
            "Expected JSON object".to_string(),
        ));
    }

    serde_json::from_value(json).map_err(|e| ExtractorError::InvalidFormat(e.to_string()))
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Skip the opening fence line (```json or ```) and the closing fence
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiscal_domain::RequestType;

    #[test]
    fn test_parse_valid_json() {
        let response = r#"{
            "nombre_cliente": "Acme",
            "monto": 150.5,
            "fecha": "2024-03-01",
            "tipo_solicitud": "Factura"
        }"#;

        let record = parse_llm_response(response).unwrap();
        assert_eq!(record.nombre_cliente, "Acme");
        assert_eq!(record.monto, Some(150.5));
        assert_eq!(record.tipo_solicitud, RequestType::Factura);
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = r#"```json
{"nombre_cliente": "Beta SL", "monto": null, "fecha": "2024-05-10", "tipo_solicitud": "Queja"}
```"#;

        let record = parse_llm_response(response).unwrap();
        assert_eq!(record.nombre_cliente, "Beta SL");
        assert_eq!(record.monto, None);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_llm_response("This is not JSON");
        assert!(matches!(result, Err(ExtractorError::JsonParse(_))));
    }

    #[test]
    fn test_parse_truncated_json() {
        let result = parse_llm_response(r#"{"nombre_cliente": "Acme", "monto"#);
        assert!(matches!(result, Err(ExtractorError::JsonParse(_))));
    }

    #[test]
    fn test_parse_json_not_object() {
        let result = parse_llm_response(r#"[{"nombre_cliente": "Acme"}]"#);
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_missing_required_field() {
        let result = parse_llm_response(r#"{"nombre_cliente": "Acme", "monto": 1.0}"#);
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_extract_json_from_plain_json() {
        let json = r#"{"key": "value"}"#;
        assert_eq!(extract_json(json), json);
    }

    #[test]
    fn test_extract_json_from_markdown_without_language() {
        let response = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json(response), r#"{"key": "value"}"#);
    }
}
