use rmcp::ErrorData as McpError;
use serde_json::json;

use crate::samples::SampleError;
use crate::search::KwicError;

pub(super) fn kwic_to_mcp_error(e: KwicError) -> McpError {
    match &e {
        KwicError::InvalidArgument(_) => McpError::invalid_params(e.to_string(), None),
    }
}

pub(super) fn sample_to_mcp_error(e: SampleError) -> McpError {
    match &e {
        SampleError::NotFound(_) | SampleError::InvalidFilename(_) => {
            McpError::invalid_params(e.to_string(), None)
        }
        _ => McpError::internal_error(e.to_string(), None),
    }
}

pub(super) fn serialize_error(e: serde_json::Error) -> McpError {
    McpError::internal_error(
        "failed to serialize results",
        Some(json!({ "error": e.to_string() })),
    )
}

/// Resolve the requested context size, falling back to the server default.
pub(super) fn context_size_param(requested: Option<i64>, default: usize) -> Result<usize, McpError> {
    match requested {
        None => Ok(default),
        Some(n) => usize::try_from(n).map_err(|_| {
            kwic_to_mcp_error(KwicError::InvalidArgument(format!(
                "context_size must not be negative, got {n}"
            )))
        }),
    }
}
