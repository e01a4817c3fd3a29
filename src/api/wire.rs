/// Request and reply shapes exchanged with the scoring service.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::data::{Choice, Sample, SlotOrder};

/// Literal body returned by `/previous` when there is nothing before the current sample
pub const NO_PREVIOUS_SENTINEL: &str = "no-previous-sample";

/// One call to the scoring service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `GET /current?coder=`
    Current { coder: String },
    /// `GET /get-sample?num=&coder=`
    Sample { coder: String, number: u32 },
    /// `POST /store-response`
    StoreResponse {
        coder: String,
        folder: String,
        number: u32,
        choice: Choice,
    },
    /// `POST /previous`
    Previous { coder: String, number: u32 },
    /// `POST /next`
    Next { coder: String, number: u32 },
}

impl Request {
    /// Path of the endpoint, relative to the service root
    pub fn path(&self) -> &'static str {
        match self {
            Request::Current { .. } => "/current",
            Request::Sample { .. } => "/get-sample",
            Request::StoreResponse { .. } => "/store-response",
            Request::Previous { .. } => "/previous",
            Request::Next { .. } => "/next",
        }
    }
}

/// JSON body of `POST /store-response`
#[derive(Debug, Serialize)]
pub struct StoreResponseBody<'a> {
    pub coder: &'a str,
    pub sample_folder: &'a str,
    pub sample_number: u32,
    pub result: Choice,
}

/// JSON body of `POST /previous` and `POST /next`
#[derive(Debug, Serialize)]
pub struct StepBody<'a> {
    pub coder: &'a str,
    pub sample_number: u32,
}

/// What the service told us after a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Render this sample
    Sample(Sample),
    /// Every sample has been rated
    AllDone,
    /// `/previous` had nothing to go back to
    NoPrevious,
}

/// Raw reply payload. Every field is optional because an all-done
/// notice may omit the sample fields.
#[derive(Debug, Deserialize)]
struct Payload {
    sample_folder: Option<String>,
    sample_number: Option<SampleNumber>,
    top_order: Option<String>,
    #[serde(default)]
    all_done: Option<serde_json::Value>,
}

/// The service is loose about number encoding
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SampleNumber {
    Number(u32),
    Text(String),
}

impl SampleNumber {
    fn value(self) -> Result<u32, ApiError> {
        match self {
            SampleNumber::Number(n) => Ok(n),
            SampleNumber::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| ApiError::Decode(format!("sample_number {text:?} is not a number"))),
        }
    }
}

fn is_done(flag: &serde_json::Value) -> bool {
    match flag {
        serde_json::Value::String(s) => s.eq_ignore_ascii_case("yes"),
        serde_json::Value::Bool(b) => *b,
        _ => false,
    }
}

impl Reply {
    /// Interpret a status code and body.
    ///
    /// Anything but exactly 200 is an error, mirroring the service's
    /// contract that only 200 carries a renderable reply.
    pub fn parse(status: u16, body: &str) -> Result<Reply, ApiError> {
        if status != 200 {
            return Err(ApiError::Status(status));
        }

        let body = body.trim();
        if body == NO_PREVIOUS_SENTINEL {
            return Ok(Reply::NoPrevious);
        }

        let payload: Payload =
            serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;

        if payload.all_done.as_ref().is_some_and(is_done) {
            return Ok(Reply::AllDone);
        }

        let folder = payload
            .sample_folder
            .ok_or_else(|| ApiError::Decode("missing sample_folder".to_string()))?;
        let number = payload
            .sample_number
            .ok_or_else(|| ApiError::Decode("missing sample_number".to_string()))?
            .value()?;
        let order = payload
            .top_order
            .ok_or_else(|| ApiError::Decode("missing top_order".to_string()))?;

        Ok(Reply::Sample(Sample {
            folder,
            number,
            order: SlotOrder::from_flag(&order),
        }))
    }
}
