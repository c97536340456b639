//! Cloudflare v4 response envelopes
//!
//! Every v4 endpoint answers with the same envelope:
//!
//! ```json
//! { "success": true, "errors": [], "messages": [], "result": ..., "result_info": {...} }
//! ```
//!
//! These functions take the HTTP status and raw body, so they can be tested
//! without a server.

use ddns_core::traits::{ExistingRecord, Zone, ZonePage};
use ddns_core::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

const PROVIDER: &str = "cloudflare";

/// Record fields we read back from a record listing
#[derive(Debug, Deserialize)]
struct RecordEntry {
    id: String,
    content: String,
}

/// Check the status and `success` flag of a response body
///
/// # Returns
///
/// - `Ok(Value)`: the parsed envelope, `success == true` and a 2xx status
/// - `Err(Error::Provider)`: anything else. The parsed body is attached as
///   payload whenever the provider sent JSON.
pub fn check_envelope(status: u16, body: &str, action: &str) -> Result<Value> {
    let is_success_status = (200..300).contains(&status);

    let json: Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(e) if is_success_status => {
            return Err(Error::provider(
                PROVIDER,
                format!("{}: unparseable response: {}", action, e),
            ));
        }
        Err(_) => {
            return Err(Error::provider(PROVIDER, status_message(status, action, body)));
        }
    };

    if !is_success_status {
        return Err(Error::provider_payload(
            PROVIDER,
            status_message(status, action, &error_summary(&json)),
            json,
        ));
    }

    if json["success"].as_bool() != Some(true) {
        return Err(Error::provider_payload(
            PROVIDER,
            format!("{} failed: {}", action, error_summary(&json)),
            json,
        ));
    }

    Ok(json)
}

/// Extract one page of zones from a `GET /zones` envelope
pub fn parse_zone_page(json: &Value) -> Result<ZonePage> {
    let zones: Vec<Zone> = result_as(json, "zone list")?;

    let total_count = json["result_info"]["total_count"]
        .as_u64()
        .ok_or_else(|| shape_error(json, "zone list", "result_info.total_count is not a number"))?;

    Ok(ZonePage {
        zones,
        total_count: total_count as usize,
    })
}

/// Extract the first record from a `GET /zones/:id/dns_records` envelope
///
/// An empty result is `None`; only the first record is considered when the
/// provider returns several.
pub fn parse_first_record(json: &Value) -> Result<Option<ExistingRecord>> {
    let records: Vec<RecordEntry> = result_as(json, "record lookup")?;

    Ok(records.into_iter().next().map(|entry| ExistingRecord {
        id: entry.id,
        content: entry.content,
    }))
}

fn result_as<T: for<'de> Deserialize<'de>>(json: &Value, action: &str) -> Result<T> {
    let result = json
        .get("result")
        .ok_or_else(|| shape_error(json, action, "missing result"))?;

    T::deserialize(result).map_err(|e| shape_error(json, action, &e.to_string()))
}

fn shape_error(json: &Value, action: &str, what: &str) -> Error {
    Error::provider_payload(
        PROVIDER,
        format!("{}: invalid response format: {}", action, what),
        json.clone(),
    )
}

/// Human-readable message for a non-2xx status
fn status_message(status: u16, action: &str, detail: &str) -> String {
    match status {
        401 | 403 => format!(
            "Authentication failed: Invalid API token or insufficient permissions. Status: {}",
            status
        ),
        404 => format!("{}: not found. Status: {}", action, status),
        429 => format!("Rate limit exceeded. Please retry later. Status: {}", status),
        500..=599 => format!("Cloudflare server error (transient): {} - {}", status, detail),
        _ => format!("{} failed: {} - {}", action, status, detail),
    }
}

/// Join the `errors[].message` fields of an envelope
fn error_summary(json: &Value) -> String {
    let messages: Vec<String> = json["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .map(|e| match (e["code"].as_i64(), e["message"].as_str()) {
                    (Some(code), Some(message)) => format!("{} ({})", message, code),
                    (None, Some(message)) => message.to_string(),
                    _ => e.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    if messages.is_empty() {
        "no error detail".to_string()
    } else {
        messages.join("; ")
    }
}
