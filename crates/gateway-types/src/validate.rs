use thiserror::Error;

use crate::{caller::CallerContext, route::RouteDescriptor, scope::ScopeRequirement};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidateError {
    #[error("empty_field:{0}")]
    EmptyField(&'static str),
    #[error("invalid_scope:{0}")]
    InvalidScope(String),
    #[error("invalid_path_format:{0}")]
    InvalidPathFormat(String),
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidateError>;
}

impl Validate for CallerContext {
    fn validate(&self) -> Result<(), ValidateError> {
        if self.caller_id.0.is_empty() {
            return Err(ValidateError::EmptyField("caller_id"));
        }
        if self.tenant.0.is_empty() {
            return Err(ValidateError::EmptyField("tenant"));
        }
        Ok(())
    }
}

impl Validate for ScopeRequirement {
    fn validate(&self) -> Result<(), ValidateError> {
        for scope in self.iter() {
            if scope.is_empty() || scope.chars().any(char::is_whitespace) {
                return Err(ValidateError::InvalidScope(scope.to_string()));
            }
        }
        Ok(())
    }
}

impl Validate for RouteDescriptor {
    fn validate(&self) -> Result<(), ValidateError> {
        if self.action.is_empty() {
            return Err(ValidateError::EmptyField("action"));
        }
        if !self.path_format.starts_with('/') {
            return Err(ValidateError::InvalidPathFormat(self.path_format.clone()));
        }
        Ok(())
    }
}
