//! Masking of secrets before they reach the log

/// Characters of a secret kept visible
const VISIBLE_PREFIX: usize = 4;

/// Show only a short prefix and the length of `secret`
pub fn redact(secret: &str) -> String {
    let total = secret.chars().count();
    if total <= VISIBLE_PREFIX * 2 {
        return format!("[REDACTED, {} chars]", total);
    }
    let prefix: String = secret.chars().take(VISIBLE_PREFIX).collect();
    format!("{}… [REDACTED, {} chars]", prefix, total)
}
