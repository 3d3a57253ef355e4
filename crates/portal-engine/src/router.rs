//! Transport router
//!
//! Turns an invocation payload into a call to the orchestrator and wraps the
//! result in a status/headers/body envelope.

use crate::commands::{apply_work_query, ListWork, WorkConnectionArg, WorkQuery};
use portal_core::errors::{invalid_input, Result};
use portal_core::{IndexStore, QueryConfig};
use portal_core_types::{RequestContext, TraceId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const FIELD_LIST_WORK: &str = "listWork";
pub const FIELD_WORK_CONNECTION: &str = "workConnection";

/// Body returned when the response cannot be serialized
pub const SERIALIZATION_FAILED_BODY: &str = "Json type conversion failed";

/// An incoming invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub arguments: serde_json::Value,
    /// Caller-supplied trace id, carried into logs and errors
    #[serde(default, rename = "traceId")]
    pub trace_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

fn success_headers() -> BTreeMap<String, String> {
    [
        ("Content-Type", "application/json"),
        (
            "Access-Control-Allow-Headers",
            "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
        ),
        (
            "Access-Control-Allow-Methods",
            "DELETE,GET,HEAD,OPTIONS,PATCH,POST,PUT",
        ),
        ("Access-Control-Allow-Origin", "*"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Serialize `value` into a 200 envelope, or the fixed 500 envelope if that
/// fails.
pub fn render_response<T: Serialize>(value: &T) -> Response {
    match serde_json::to_string(value) {
        Ok(body) => Response {
            status_code: 200,
            headers: success_headers(),
            body,
        },
        Err(e) => {
            tracing::error!(
                component = module_path!(),
                error = %e,
                "response serialization failed"
            );
            Response {
                status_code: 500,
                headers: BTreeMap::new(),
                body: SERIALIZATION_FAILED_BODY.to_string(),
            }
        }
    }
}

/// Missing or mistyped arguments decode to the empty argument struct.
fn decode_arguments<T: DeserializeOwned + Default>(field: &str, arguments: &serde_json::Value) -> T {
    if arguments.is_null() {
        return T::default();
    }
    match serde_json::from_value(arguments.clone()) {
        Ok(args) => args,
        Err(e) => {
            tracing::warn!(
                component = module_path!(),
                field = field,
                error = %e,
                "arguments not decodable, using defaults"
            );
            T::default()
        }
    }
}

/// Resolve the payload to a query
///
/// # Errors
///
/// `InvalidInput` when `field` names no known operation.
pub fn resolve(payload: &Payload) -> Result<WorkQuery> {
    match payload.field.as_deref().unwrap_or(FIELD_LIST_WORK) {
        FIELD_LIST_WORK => Ok(WorkQuery::ListWork(decode_arguments::<ListWork>(
            FIELD_LIST_WORK,
            &payload.arguments,
        ))),
        FIELD_WORK_CONNECTION => Ok(WorkQuery::WorkConnection(
            decode_arguments::<WorkConnectionArg>(FIELD_WORK_CONNECTION, &payload.arguments),
        )),
        other => Err(invalid_input("route", format!("unknown field '{}'", other))),
    }
}

/// Handle one invocation
///
/// # Errors
///
/// Routing and handler failures are returned as-is for the runtime to report;
/// they are never folded into a 200 envelope.
pub fn route(
    payload: &Payload,
    store: &dyn IndexStore,
    config: &QueryConfig,
    ctx: &RequestContext,
) -> Result<Response> {
    let ctx = match &payload.trace_id {
        Some(trace_id) => ctx.clone().with_trace_id(TraceId::from_string(trace_id.clone())),
        None => ctx.clone(),
    };
    let query = resolve(payload).map_err(|e| e.with_context(&ctx))?;
    let page = apply_work_query(query, store, config, &ctx)?;
    Ok(render_response(&page))
}
