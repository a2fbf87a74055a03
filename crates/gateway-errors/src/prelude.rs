pub use crate::{
    builder::ErrorBuilder,
    class::{RetryClass, Severity},
    code::{codes, spec_of, CodeSpec, ErrorCode, REGISTRY},
    kind::ErrorKind,
    labels::labels,
    model::ErrorObj,
    render::{AuditErrorView, ErrorEnvelope, PublicErrorView},
};
