//! Execution engine module
//!
//! Turns an operation definition plus caller input into HTTP calls.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Engine` - Runs operations against one endpoint
//! - `Invocation` - Parameters, body, tags and tag keys for one call
//! - `JsonRequest` / `JsonPage` - The request/page pair the paginator drives
//!
//! `list` returns a lazy [`PageStream`](crate::pagination::PageStream);
//! nothing is sent until it is polled. `invoke` performs exactly one call and
//! asks for confirmation first when the operation changes server state.

mod types;

pub use types::{Invocation, JsonPage, JsonRequest};

use crate::confirm::Confirm;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::operation::OperationDefinition;
use crate::pagination::{PageStream, Paginator, PagingOptions};
use crate::tags;
use crate::template;
use crate::types::{JsonValue, ParamLocation};
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Future returned by the list fetch function
pub type FetchFuture = BoxFuture<'static, Result<JsonPage>>;

/// Fetch function driving a list stream
pub type FetchFn = Box<dyn FnMut(JsonRequest) -> FetchFuture + Send>;

/// Stream of pages for one list invocation
pub type ListStream = PageStream<JsonRequest, FetchFn, FetchFuture>;

/// Runs catalog operations over an HTTP client
#[derive(Debug, Clone)]
pub struct Engine {
    client: HttpClient,
}

impl Engine {
    /// Create an engine over a configured client
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Get the HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Start a paged list.
    ///
    /// Validates input up front; the returned stream issues one request per
    /// poll and stops per the paging options or when `cancel` fires.
    pub fn list(
        &self,
        op: &OperationDefinition,
        invocation: &Invocation,
        options: PagingOptions,
        max_results: Option<u32>,
        cancel: CancellationToken,
    ) -> Result<ListStream> {
        let paging = op.paging.as_ref().ok_or_else(|| Error::NotPaged {
            operation: op.name.clone(),
        })?;

        // The paginator owns the token; a parameter would be overwritten
        let token_name = paging.token_name.as_str();
        let in_body = invocation.body.as_ref().is_some_and(|b| b.contains_key(token_name));
        if invocation.params.contains_key(token_name) || in_body {
            return Err(Error::invalid_value(
                token_name,
                "pass the continuation token as the starting token (--next-token)",
            ));
        }

        let request = build_request(op, invocation, max_results)?;

        debug!(
            operation = %op.name,
            manual = options.is_manual(),
            mode = %options.mode,
            "starting list"
        );

        let client = self.client.clone();
        let operation = op.name.clone();
        let token_path = paging.token_path.clone();
        let result_path = op.result_path.clone();
        let mut page = 0u64;

        let fetch: FetchFn = Box::new(move |request: JsonRequest| -> FetchFuture {
            page += 1;
            debug!(
                operation = %operation,
                page,
                token = request.token().unwrap_or(""),
                "fetching page"
            );

            let client = client.clone();
            let token_path = token_path.clone();
            let result_path = result_path.clone();
            Box::pin(async move {
                let body = client
                    .send_json(request.method, &request.segments, request.to_request_config())
                    .await?;
                Ok(JsonPage::new(body, &token_path, result_path.as_deref()))
            })
        });

        Ok(Paginator::new(request)
            .with_options(options)
            .cancel_on(cancel)
            .stream(fetch))
    }

    /// Perform one call.
    ///
    /// Mutating operations consult `confirm` before anything is sent; a
    /// decline returns [`Error::Declined`].
    pub async fn invoke(
        &self,
        op: &OperationDefinition,
        invocation: &Invocation,
        confirm: &dyn Confirm,
    ) -> Result<JsonValue> {
        let request = build_request(op, invocation, None)?;

        if op.mutating {
            let target = op
                .confirm_target
                .as_deref()
                .and_then(|name| invocation.param_text(name))
                .unwrap_or_else(|| op.name.clone());

            if !confirm.confirm(&op.name, &target) {
                info!(operation = %op.name, target = %target, "operation not confirmed");
                return Err(Error::Declined {
                    action: op.name.clone(),
                    target,
                });
            }
        }

        debug!(operation = %op.name, "invoking operation");
        self.client
            .send_json(request.method, &request.segments, request.to_request_config())
            .await
    }
}

/// Route an invocation into a request for `op`.
///
/// Path placeholders consume their parameters; the rest go to the query or
/// body per the operation. The base body, when given, is merged under the
/// parameters.
pub fn build_request(
    op: &OperationDefinition,
    invocation: &Invocation,
    max_results: Option<u32>,
) -> Result<JsonRequest> {
    let path_params = op.path_params();

    for name in op.required.iter().chain(&path_params) {
        let in_params = invocation
            .params
            .get(name)
            .is_some_and(|v| !v.is_null());
        let in_body = invocation
            .body
            .as_ref()
            .is_some_and(|b| b.get(name).is_some_and(|v| !v.is_null()));
        if !in_params && !(in_body && !path_params.contains(name)) {
            return Err(Error::missing_param(&op.name, name));
        }
    }

    let segments = template::render_segments(&op.path, &invocation.params)?;
    let mut request = JsonRequest::new(op.method, segments);

    if op.has_body() {
        request.body = Some(invocation.body.clone().unwrap_or_default());
    } else if invocation.body.is_some() {
        return Err(Error::invalid_value(
            "body",
            format!("{} uses {} and takes no request body", op.name, op.method),
        ));
    }

    for (name, value) in &invocation.params {
        if path_params.contains(name) {
            continue;
        }
        request.insert(op.location_of(name), name, value.clone());
    }

    if !invocation.tags.is_empty() {
        let field = op.tags_field.as_deref().filter(|_| op.has_body()).ok_or_else(|| {
            Error::invalid_value("tag", format!("{} does not accept tags", op.name))
        })?;
        request.insert(ParamLocation::Body, field, tags::to_json(&invocation.tags));
    }

    if !invocation.tag_keys.is_empty() {
        let field = op.tag_keys_field.as_deref().ok_or_else(|| {
            Error::invalid_value("tag-key", format!("{} does not accept tag keys", op.name))
        })?;
        let keys = invocation
            .tag_keys
            .iter()
            .cloned()
            .map(JsonValue::String)
            .collect();
        request.insert(op.location_of(field), field, JsonValue::Array(keys));
    }

    if let Some(paging) = &op.paging {
        let token_in = if op.has_body() {
            paging.token_in
        } else {
            ParamLocation::Query
        };
        request = request.with_token_binding(token_in, &paging.token_name);

        if let Some(max) = max_results {
            match &paging.page_size_name {
                Some(name) => {
                    let page_size_in = if op.has_body() {
                        paging.page_size_in
                    } else {
                        ParamLocation::Query
                    };
                    request.insert(page_size_in, name, JsonValue::from(max));
                }
                None => warn!(operation = %op.name, "operation has no page size parameter"),
            }
        }
    }

    Ok(request)
}
