// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Response handling shared by the HTTP backends

use reqwest::header::CONTENT_TYPE;
use reqwest::Response;

use super::backend::FetchedPage;
use super::encoding::{charset_from_content_type, decode_html};
use super::types::FetchError;

/// Map a reqwest send/read error to a transport error
pub(crate) fn map_request_error(e: reqwest::Error, timeout_secs: u64) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout { timeout_secs }
    } else if let Some(status) = e.status() {
        FetchError::HttpStatus(status.as_u16())
    } else {
        FetchError::Network(e.to_string())
    }
}

/// Check the status and decode the body with the resolved encoding
pub(crate) async fn read_page(
    response: Response,
    timeout_secs: u64,
) -> Result<FetchedPage, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let declared = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(charset_from_content_type);

    let body = response
        .bytes()
        .await
        .map_err(|e| map_request_error(e, timeout_secs))?;

    let (html, encoding) = decode_html(declared.as_deref(), &body);
    Ok(FetchedPage {
        html,
        encoding: encoding.name(),
    })
}
