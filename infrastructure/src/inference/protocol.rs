//! TensorFlow Serving REST `:predict` protocol types.
//!
//! # Protocol Overview
//!
//! - **Request**: `{"signature_name": ..., "instances": [{attention_mask, token_type_ids, input_ids}]}`
//! - **Response**: `{"predictions": [{"start_logits": [...], "end_logits": [...]}]}`
//!
//! Exactly one instance is sent per call, so exactly one prediction is expected.

use serde::{Deserialize, Serialize};
use wikiqa_application::InferenceError;
use wikiqa_domain::ModelInput;

/// `:predict` request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictRequest<'a> {
    pub signature_name: &'a str,
    pub instances: [Instance<'a>; 1],
}

/// One encoded example
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instance<'a> {
    pub attention_mask: &'a [u32],
    pub token_type_ids: &'a [u32],
    pub input_ids: &'a [u32],
}

/// `:predict` response body
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<Prediction>,
}

/// Start and end logits for every input position
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub start_logits: Vec<f64>,
    pub end_logits: Vec<f64>,
}

/// Build the request body for `input`
pub fn build_request<'a>(signature_name: &'a str, input: &'a ModelInput) -> PredictRequest<'a> {
    PredictRequest {
        signature_name,
        instances: [Instance {
            attention_mask: input.attention_mask(),
            token_type_ids: input.token_type_ids(),
            input_ids: input.input_ids(),
        }],
    }
}

/// Decode a response body into `(start_logits, end_logits)`
///
/// Both vectors must have exactly `positions` entries.
pub fn decode_prediction(
    body: &str,
    positions: usize,
) -> Result<(Vec<f64>, Vec<f64>), InferenceError> {
    let response: PredictResponse = serde_json::from_str(body)
        .map_err(|e| InferenceError::Malformed(format!("invalid JSON: {}", e)))?;

    let [prediction]: [Prediction; 1] = response.predictions.try_into().map_err(|p: Vec<_>| {
        InferenceError::Malformed(format!("expected 1 prediction, got {}", p.len()))
    })?;

    if prediction.start_logits.len() != positions || prediction.end_logits.len() != positions {
        return Err(InferenceError::Malformed(format!(
            "expected {} logits, got {} start and {} end",
            positions,
            prediction.start_logits.len(),
            prediction.end_logits.len()
        )));
    }

    Ok((prediction.start_logits, prediction.end_logits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikiqa_domain::{SpecialTokens, Subword};

    fn input() -> ModelInput {
        ModelInput::from_pair(
            &SpecialTokens::bert(),
            &[Subword::new(2054, "what")],
            &[Subword::new(3000, "paris")],
        )
        .unwrap()
    }

    #[test]
    fn test_build_request_shape() {
        let input = input();
        let request = build_request("serving_default", &input);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "signature_name": "serving_default",
                "instances": [{
                    "attention_mask": [1, 1, 1, 1, 1],
                    "token_type_ids": [0, 0, 0, 1, 1],
                    "input_ids": [101, 2054, 102, 3000, 102]
                }]
            })
        );
    }

    #[test]
    fn test_decode_prediction() {
        let body = r#"{"predictions":[{"start_logits":[0.1,0.2,0.3],"end_logits":[1.0,2.0,3.0]}]}"#;
        let (start, end) = decode_prediction(body, 3).unwrap();
        assert_eq!(start, vec![0.1, 0.2, 0.3]);
        assert_eq!(end, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_decode_keeps_full_precision() {
        let body = r#"{"predictions":[{"start_logits":[6.123456789012345],"end_logits":[-7.000000000000001]}]}"#;
        let (start, end) = decode_prediction(body, 1).unwrap();
        assert_eq!(start, vec![6.123456789012345]);
        assert_eq!(end, vec![-7.000000000000001]);
    }

    #[test]
    fn test_decode_rejects_malformed_bodies() {
        let cases = [
            "not json",
            r#"{"outputs":[]}"#,
            r#"{"predictions":[]}"#,
            r#"{"predictions":[{"start_logits":[1.0]}]}"#,
            r#"{"predictions":[{"start_logits":[1.0],"end_logits":[1.0]},{"start_logits":[1.0],"end_logits":[1.0]}]}"#,
            r#"{"predictions":[{"start_logits":[1.0,2.0],"end_logits":[1.0]}]}"#,
        ];
        for body in cases {
            assert!(
                matches!(decode_prediction(body, 2), Err(InferenceError::Malformed(_))),
                "accepted: {body}"
            );
        }
    }
}
