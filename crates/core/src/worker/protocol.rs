//! Wire contract between the orchestration layer and the worker script.
//!
//! Commands are serialized as a single JSON blob passed in argv, so the
//! worker-side contract stays stable when fields are added. Responses are
//! one JSON object on stdout, validated per operation; anything out of
//! range or missing is a decode failure, never a defaulted value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::error::ResponseError;

/// Classification label for a sample or a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Good,
    Defective,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Good => "good",
            Label::Defective => "defective",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "good" => Some(Label::Good),
            "defective" => Some(Label::Defective),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rectangular sub-area of the image the worker should analyze.
///
/// Coordinates are non-negative by construction; width and height must be
/// positive, which the inspection service validates before staging. Clamping
/// to image bounds is the worker's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The operations the worker understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddSample,
    Train,
    Predict,
    GetCounts,
}

impl Operation {
    /// Name passed as the worker's second positional argument.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Operation::AddSample => "add_sample",
            Operation::Train => "train",
            Operation::Predict => "predict",
            Operation::GetCounts => "get_counts",
        }
    }
}

/// A typed command, encoded to the worker's argv contract.
#[derive(Debug)]
pub enum Command<'a> {
    AddSample {
        image_path: &'a Path,
        label: Label,
        roi: Roi,
    },
    Train,
    Predict {
        image_path: &'a Path,
        roi: Roi,
    },
    GetCounts,
}

impl Command<'_> {
    pub fn operation(&self) -> Operation {
        match self {
            Command::AddSample { .. } => Operation::AddSample,
            Command::Train => Operation::Train,
            Command::Predict { .. } => Operation::Predict,
            Command::GetCounts => Operation::GetCounts,
        }
    }

    /// Serializes the command payload, if the operation carries one.
    pub fn encode(&self) -> Option<String> {
        match self {
            Command::AddSample {
                image_path,
                label,
                roi,
            } => Some(
                serde_json::json!({
                    "image_path": image_path.to_string_lossy(),
                    "label": label,
                    "roi": roi,
                })
                .to_string(),
            ),
            // The train payload is a bare operation marker.
            Command::Train => Some(serde_json::json!({ "command": "train" }).to_string()),
            Command::Predict { image_path, roi } => Some(
                serde_json::json!({
                    "image_path": image_path.to_string_lossy(),
                    "roi": roi,
                })
                .to_string(),
            ),
            Command::GetCounts => None,
        }
    }
}

/// Outcome of a successful add-sample call. The worker reports its running
/// per-label sample count when it has one.
#[derive(Debug, Clone, Serialize)]
pub struct SampleReceipt {
    pub sample_count: Option<u64>,
}

/// Outcome of a successful training run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub accuracy: f64,
}

/// Outcome of a successful inference call.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub label: Label,
    pub confidence: f64,
}

/// Per-label dataset sizes as reported by the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleCounts {
    pub good: u64,
    pub defective: u64,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    sample_count: Option<u64>,
    #[serde(default)]
    accuracy: Option<f64>,
    #[serde(default)]
    prediction: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    counts: Option<SampleCounts>,
}

fn parse_success(raw: &[u8]) -> Result<RawResponse, ResponseError> {
    let response: RawResponse = serde_json::from_slice(raw)
        .map_err(|e| ResponseError::malformed(format!("not a valid response object: {e}"), raw))?;
    match response.status.as_str() {
        "success" => Ok(response),
        "error" => Err(ResponseError::Reported {
            message: response
                .message
                .unwrap_or_else(|| "worker reported an unspecified error".to_string()),
        }),
        other => Err(ResponseError::malformed(
            format!("unknown status {other:?}"),
            raw,
        )),
    }
}

fn in_unit_range(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

/// Decodes an add-sample response: status plus an optional sample count.
pub fn decode_add_sample(raw: &[u8]) -> Result<SampleReceipt, ResponseError> {
    let response = parse_success(raw)?;
    Ok(SampleReceipt {
        sample_count: response.sample_count,
    })
}

/// Decodes a training response: accuracy is mandatory and must be in [0,1].
pub fn decode_train(raw: &[u8]) -> Result<TrainingReport, ResponseError> {
    let response = parse_success(raw)?;
    let accuracy = response
        .accuracy
        .ok_or_else(|| ResponseError::malformed("missing accuracy field", raw))?;
    if !in_unit_range(accuracy) {
        return Err(ResponseError::malformed(
            format!("accuracy {accuracy} outside [0,1]"),
            raw,
        ));
    }
    Ok(TrainingReport { accuracy })
}

/// Decodes an inference response: prediction must be a known label and
/// confidence must be in [0,1].
pub fn decode_predict(raw: &[u8]) -> Result<Prediction, ResponseError> {
    let response = parse_success(raw)?;
    let prediction = response
        .prediction
        .ok_or_else(|| ResponseError::malformed("missing prediction field", raw))?;
    let label = Label::parse(&prediction).ok_or_else(|| {
        ResponseError::malformed(format!("unknown prediction label {prediction:?}"), raw)
    })?;
    let confidence = response
        .confidence
        .ok_or_else(|| ResponseError::malformed("missing confidence field", raw))?;
    if !in_unit_range(confidence) {
        return Err(ResponseError::malformed(
            format!("confidence {confidence} outside [0,1]"),
            raw,
        ));
    }
    Ok(Prediction { label, confidence })
}

/// Decodes a get-counts response.
pub fn decode_counts(raw: &[u8]) -> Result<SampleCounts, ResponseError> {
    let response = parse_success(raw)?;
    response
        .counts
        .ok_or_else(|| ResponseError::malformed("missing counts field", raw))
}
