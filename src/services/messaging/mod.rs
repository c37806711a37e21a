pub mod mora;

use async_trait::async_trait;

#[async_trait]
pub trait MessagingProvider: Send + Sync {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()>;
}

/// Normalize a locally formatted mobile number ("05xxxxxxxx") to the
/// digits-only international form the gateway expects. Applied only at the
/// messaging boundary; the store keeps the number as entered.
pub fn normalize_mobile(mobile: &str) -> String {
    let digits: String = mobile.chars().filter(|c| !c.is_whitespace()).collect();
    let trimmed = digits.trim_start_matches('0');
    if trimmed.starts_with("966") {
        trimmed.to_string()
    } else {
        format!("966{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_local_number() {
        assert_eq!(normalize_mobile("0512345678"), "966512345678");
    }

    #[test]
    fn test_normalize_strips_whitespace() {
        assert_eq!(normalize_mobile("05 1234 5678"), "966512345678");
    }

    #[test]
    fn test_normalize_already_international() {
        assert_eq!(normalize_mobile("966512345678"), "966512345678");
        assert_eq!(normalize_mobile("00966512345678"), "966512345678");
    }
}
