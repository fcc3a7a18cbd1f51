use anyhow::{Context, Result};
use chrono::Utc;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Seeds are decimal or `0x` hex.
pub fn parse_seeds(tokens: &[String]) -> Result<Vec<u64>> {
    tokens
        .iter()
        .map(|token| {
            let parsed = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => token.parse::<u64>(),
            };
            parsed.with_context(|| format!("invalid seed {token:?}"))
        })
        .collect()
}

pub fn report_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
