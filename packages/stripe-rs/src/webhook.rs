// Webhook signature verification per the Stripe-Signature scheme:
// header `t=<unix>,v1=<hex hmac>`, signed payload `"{t}.{body}"`,
// HMAC-SHA256 keyed with the endpoint's webhook secret.
// https://docs.stripe.com/webhooks#verify-manually

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::models::WebhookEvent;
use crate::StripeError;

type HmacSha256 = Hmac<Sha256>;

/// Default tolerance for the signed timestamp, matching Stripe's SDKs.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Verify a webhook payload against its `stripe-signature` header and parse
/// the event. Rejects stale timestamps to limit replay.
pub fn construct_event(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
) -> Result<WebhookEvent, StripeError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    construct_event_at(payload, signature_header, secret, DEFAULT_TOLERANCE_SECS, now)
}

/// As [`construct_event`], with the clock and tolerance supplied by the
/// caller.
pub fn construct_event_at(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
    tolerance_secs: i64,
    now_unix: i64,
) -> Result<WebhookEvent, StripeError> {
    let (timestamp, signatures) = parse_header(signature_header)?;

    if (now_unix - timestamp).abs() > tolerance_secs {
        return Err(StripeError::Signature(format!(
            "timestamp {} outside tolerance",
            timestamp
        )));
    }

    let signed_payload = [timestamp.to_string().as_bytes(), b".", payload].concat();

    // Accept if any v1 signature matches (Stripe sends several during
    // secret rotation). Comparison is constant-time via Mac::verify_slice.
    let matched = signatures.iter().any(|candidate| {
        let Ok(raw) = hex::decode(candidate) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
            return false;
        };
        mac.update(&signed_payload);
        mac.verify_slice(&raw).is_ok()
    });

    if !matched {
        return Err(StripeError::Signature(
            "no matching v1 signature".to_string(),
        ));
    }

    serde_json::from_slice::<WebhookEvent>(payload)
        .map_err(|e| StripeError::Parse(e.to_string()))
}

/// Produce a `stripe-signature` header value for a payload. Used by tests
/// and local tooling to simulate deliveries.
pub fn signature_header(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let signed_payload = [timestamp.to_string().as_bytes(), b".", payload].concat();
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(&signed_payload);
    let signature = hex::encode(mac.finalize().into_bytes());
    format!("t={},v1={}", timestamp, signature)
}

fn parse_header(header: &str) -> Result<(i64, Vec<String>), StripeError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<String> = Vec::new();

    for part in header.split(',') {
        let mut kv = part.splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("t"), Some(value)) => {
                timestamp = value.trim().parse::<i64>().ok();
            }
            (Some("v1"), Some(value)) => {
                signatures.push(value.trim().to_string());
            }
            _ => {} // v0 and unknown schemes are ignored
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| StripeError::Signature("missing timestamp".to_string()))?;

    if signatures.is_empty() {
        return Err(StripeError::Signature("missing v1 signature".to_string()));
    }

    Ok((timestamp, signatures))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn event_payload() -> Vec<u8> {
        serde_json::json!({
            "id": "evt_123",
            "type": "payment_intent.succeeded",
            "data": { "object": { "id": "pi_123", "status": "succeeded" } }
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn valid_signature_parses_event() {
        let payload = event_payload();
        let header = signature_header(&payload, SECRET, 1_700_000_000);

        let event =
            construct_event_at(&payload, &header, SECRET, 300, 1_700_000_000).unwrap();
        assert_eq!(event.event_type, "payment_intent.succeeded");
        assert_eq!(event.object_id(), Some("pi_123"));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let payload = event_payload();
        let header = signature_header(&payload, SECRET, 1_700_000_000);

        let mut tampered = payload.clone();
        tampered[0] = b' ';
        let err = construct_event_at(&tampered, &header, SECRET, 300, 1_700_000_000);
        assert!(matches!(err, Err(StripeError::Signature(_))));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let payload = event_payload();
        let header = signature_header(&payload, "whsec_other", 1_700_000_000);

        let err = construct_event_at(&payload, &header, SECRET, 300, 1_700_000_000);
        assert!(matches!(err, Err(StripeError::Signature(_))));
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let payload = event_payload();
        let header = signature_header(&payload, SECRET, 1_700_000_000);

        let err = construct_event_at(&payload, &header, SECRET, 300, 1_700_000_000 + 301);
        assert!(matches!(err, Err(StripeError::Signature(_))));
    }

    #[test]
    fn malformed_header_is_rejected() {
        let payload = event_payload();
        let err = construct_event_at(&payload, "v1=abc", SECRET, 300, 0);
        assert!(matches!(err, Err(StripeError::Signature(_))));

        let err = construct_event_at(&payload, "t=123", SECRET, 300, 123);
        assert!(matches!(err, Err(StripeError::Signature(_))));
    }

    #[test]
    fn rotated_secret_second_signature_accepted() {
        let payload = event_payload();
        let old = signature_header(&payload, "whsec_old", 1_700_000_000);
        let new = signature_header(&payload, SECRET, 1_700_000_000);
        // Header carries both signatures, as during secret rotation
        let v1_new = new.split("v1=").nth(1).unwrap();
        let combined = format!("{},v1={}", old, v1_new);

        let event =
            construct_event_at(&payload, &combined, SECRET, 300, 1_700_000_000).unwrap();
        assert_eq!(event.id, "evt_123");
    }
}
