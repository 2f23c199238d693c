//! Mapping of client errors onto JSON-RPC error objects.

use dalc_da::DaError;
use jsonrpsee::types::{
    error::{INTERNAL_ERROR_CODE, INVALID_PARAMS_CODE, METHOD_NOT_FOUND_CODE},
    ErrorObject, ErrorObjectOwned,
};

/// Code of errors raised by a lifecycle call made in the wrong phase.
pub const LIFECYCLE_ERROR_CODE: i32 = -32010;

pub(crate) fn da_error(err: DaError) -> ErrorObjectOwned {
    let code = match &err {
        DaError::Config(_) => INVALID_PARAMS_CODE,
        DaError::Lifecycle { .. } => LIFECYCLE_ERROR_CODE,
        DaError::Serialization(_) | DaError::Store(_) => INTERNAL_ERROR_CODE,
    };
    ErrorObject::owned(code, err.to_string(), None::<()>)
}

pub(crate) fn retrieval_unsupported() -> ErrorObjectOwned {
    ErrorObject::owned(
        METHOD_NOT_FOUND_CODE,
        "block retrieval is not supported by this backend",
        None::<()>,
    )
}
