use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use time::OffsetDateTime;

use crate::checks::CheckResult;

/// License validity from the configured bearer credential.
///
/// The credential is a JWT whose middle segment carries the claims; no
/// signature verification happens here, only expiry. Absence of a
/// credential means "not a licensed deployment" and passes.
pub(crate) fn check_license(jwt: Option<&str>) -> CheckResult {
    let Some(jwt) = jwt else {
        return CheckResult::passed();
    };
    let Some(claims) = decode_claims(jwt) else {
        return CheckResult::failed("license_parse_error");
    };

    if let Some(exp) = claims.get("exp").and_then(|v| v.as_i64()) {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        if exp < now {
            return CheckResult::failed("license_expired");
        }
    }
    CheckResult::passed()
}

fn decode_claims(jwt: &str) -> Option<serde_json::Value> {
    let payload = jwt.split('.').nth(1)?;
    // Some issuers pad the segment even though base64url should not be.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}
