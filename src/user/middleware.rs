use axum::{extract::Request, middleware::Next, response::Response};
use log::debug;

use super::Sub;

// set by the fronting gateway after token validation
pub const SUB_HEADER: &str = "x-user-sub";

pub async fn identify(mut request: Request, next: Next) -> crate::Result<Response> {
    let sub = request
        .headers()
        .get(SUB_HEADER)
        .and_then(|header| header.to_str().ok())
        .filter(|sub| !sub.is_empty())
        .map(|sub| Sub(sub.to_string()))
        .ok_or(super::Error::MissingIdentity)?;

    debug!("request identified as {sub}");
    request.extensions_mut().insert(sub);

    let response = next.run(request).await;
    Ok(response)
}
