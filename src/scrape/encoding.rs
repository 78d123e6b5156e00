// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Character encoding resolution for fetched pages
//!
//! The HTTP-declared charset is trusted unless it is missing or is the
//! ISO-8859-1 default many servers send without meaning it. In those cases
//! the body is sniffed: `<meta>` declarations first, then UTF-8 validity,
//! then windows-1252.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::Regex;
use std::sync::LazyLock;

/// `<meta charset="...">`
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s/>;]+)"#).expect("valid regex")
});

/// `charset=` parameter of a Content-Type value
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).expect("valid regex")
});

const SNIFF_BYTES: usize = 1024;

/// Labels that usually mean "server default", not a real declaration
const UNTRUSTED_LABELS: &[&str] = &["iso-8859-1", "iso8859-1", "latin1", "latin-1", "l1"];

/// Extract the charset parameter from a Content-Type header value
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    CONTENT_TYPE_CHARSET_RE
        .captures(content_type)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Pick the encoding to decode `body` with
pub fn resolve_encoding(declared: Option<&str>, body: &[u8]) -> &'static Encoding {
    if let Some(label) = declared {
        let label = label.trim().to_lowercase();
        if !UNTRUSTED_LABELS.contains(&label.as_str()) {
            if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
                return encoding;
            }
        }
    }
    sniff_encoding(body)
}

/// Guess an encoding from the body alone
pub fn sniff_encoding(body: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(body) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&body[..body.len().min(SNIFF_BYTES)]);
    if let Some(encoding) = CHARSET_META_RE
        .captures(&head)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
    {
        return encoding;
    }

    if std::str::from_utf8(body).is_ok() {
        UTF_8
    } else {
        WINDOWS_1252
    }
}

/// Decode a body to UTF-8, returning the text and the encoding actually used
pub fn decode_html(declared: Option<&str>, body: &[u8]) -> (String, &'static Encoding) {
    let encoding = resolve_encoding(declared, body);
    let (text, used, _had_errors) = encoding.decode(body);
    (text.into_owned(), used)
}
