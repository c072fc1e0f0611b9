use serde::{Deserialize, Serialize};

/// Pattern tables consumed by the annotator and the scorer. Loaded from a
/// YAML file or built from the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Suspicious phrases, matched case-insensitively. Entries must be
    /// lowercase or the scorer's substring pass will never see them.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Suspicious mailbox prefixes, each ending in '@', matched as
    /// case-insensitive substrings of the sender address.
    #[serde(default = "default_sender_prefixes")]
    pub sender_prefixes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keywords: default_keywords(),
            sender_prefixes: default_sender_prefixes(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn default_keywords() -> Vec<String> {
    [
        "urgent",
        "verify account",
        "click here",
        "limited time",
        "act now",
        "suspended",
        "confirm identity",
        "winner",
        "prize",
        "congratulations",
        "tax refund",
        "inheritance",
        "lottery",
        "prince",
        "million dollars",
        "free gift",
        "exclusive deal",
        "security alert",
        "update your info",
        "account locked",
        "unauthorized login",
        "reset password",
        "claim now",
        "risk-free",
        "guaranteed",
        "easy money",
        "investment opportunity",
        "double your income",
        "no credit check",
        "pre-approved",
        "wire transfer",
        "bitcoin",
        "crypto",
        "act immediately",
        "limited availability",
        "secret deal",
        "dear customer",
        "bank notice",
        "social security",
        "insurance payout",
        "unclaimed funds",
        "congrats",
        "get paid",
        "urgent message",
        "confirm now",
        "malware",
        "virus detected",
        "your device is at risk",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_sender_prefixes() -> Vec<String> {
    [
        "noreply@",
        "support@",
        "admin@",
        "helpdesk@",
        "service@",
        "security@",
        "update@",
        "account@",
        "webmaster@",
        "paypal@",
        "appleid@",
        "netflix@",
        "amazon@",
        "billing@",
        "contact@",
        "team@",
        "customerservice@",
        "verify@",
        "alert@",
        "notice@",
        "recovery@",
        "reset@",
        "login@",
        "access@",
        "unusualactivity@",
        "bank@",
        "finance@",
        "official@",
        "gov@",
        "irs@",
        "lottery@",
        "reward@",
        "winnings@",
        "claim@",
        "crypto@",
        "wallet@",
        "btc@",
        "satoshi@",
        "transfer@",
        "fund@",
        "payment@",
        "congrats@",
        "winner@",
        "free@",
        "gift@",
        "securemail@",
        "secure-update@",
        "verify-now@",
        "quickaccess@",
        "instantclaim@",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
