use serde_json::Value;

use crate::errors::InterceptError;

pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    Bytes { content_type: String, data: Vec<u8> },
}

impl ResponseBody {
    pub fn content_type(&self) -> Option<&str> {
        match self {
            ResponseBody::Empty => None,
            ResponseBody::Json(_) => Some(JSON_CONTENT_TYPE),
            ResponseBody::Bytes { content_type, .. } => Some(content_type),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// What a handler hands back before normalization.
#[derive(Clone, Debug, PartialEq)]
pub struct HandlerResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: ResponseBody,
}

pub type HandlerResult = Result<HandlerResponse, InterceptError>;

impl HandlerResponse {
    pub fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: ResponseBody::Json(body),
        }
    }

    pub fn bytes(status: u16, content_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: ResponseBody::Bytes {
                content_type: content_type.into(),
                data: data.into(),
            },
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: ResponseBody::Empty,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl From<Value> for HandlerResponse {
    fn from(body: Value) -> Self {
        Self::ok(body)
    }
}
