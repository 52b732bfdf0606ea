use serde::Serialize;

use crate::{
    error::{DocsError, Result},
    model::Router,
};

/// Pretty-printed JSON representation of the route model including metadata.
pub fn render_json(routers: &[Router]) -> Result<String> {
    let payload = JsonPayload {
        version: env!("CARGO_PKG_VERSION"),
        routers,
    };

    serde_json::to_string_pretty(&payload).map_err(|error| DocsError::Other {
        message: error.to_string(),
    })
}

#[derive(Serialize)]
struct JsonPayload<'a> {
    version: &'static str,
    routers: &'a [Router],
}
