use anyhow::{Context, Result};
use committee_ledger::{LedgerConfig, ValidationMode};
use tracing::warn;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub http_addr: String,
    pub ledger: LedgerConfig,
    pub seed_demo: bool,
}

impl ServiceConfig {
    pub fn from_env(default_http_addr: &str) -> Result<Self> {
        Self::from_lookup(default_http_addr, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        default_http_addr: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let http_addr = lookup("HTTP_ADDR").unwrap_or_else(|| default_http_addr.to_string());

        let mut ledger = LedgerConfig::default();
        if let Some(raw) = lookup("LEDGER_VALIDATION") {
            ledger.validation = raw
                .parse::<ValidationMode>()
                .context("LEDGER_VALIDATION must be strict or permissive")?;
        }
        if let Some(raw) = lookup("LEDGER_DUE_DAY") {
            ledger.due_day = raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("LEDGER_DUE_DAY is not a day number: {raw:?}"))?;
        }
        ledger.validate().context("LEDGER_DUE_DAY is out of range")?;

        let seed_demo = match lookup("LEDGER_SEED_DEMO") {
            Some(raw) => parse_flag(&raw).context("LEDGER_SEED_DEMO must be true or false")?,
            None => false,
        };

        if ledger.validation == ValidationMode::Permissive {
            warn!("ledger validation is permissive; duplicates and unknown ids are accepted");
        }

        Ok(Self {
            http_addr,
            ledger,
            seed_demo,
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognised flag value {other:?}"),
    }
}
