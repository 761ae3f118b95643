/// Subsystem tags attached to every log line
///
/// The debug key of a tag is what `--debug-<key>` / `--verbose-<key>` match against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Rpc,
    Wallet,
    Contract,
    Registry,
    Trading,
    Notify,
    Test,
    Other(String),
}

impl LogTag {
    /// Key used by --debug-<key> flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Rpc => "rpc".to_string(),
            LogTag::Wallet => "wallet".to_string(),
            LogTag::Contract => "contract".to_string(),
            LogTag::Registry => "registry".to_string(),
            LogTag::Trading => "trading".to_string(),
            LogTag::Notify => "notify".to_string(),
            LogTag::Test => "test".to_string(),
            LogTag::Other(s) => s.to_lowercase(),
        }
    }

    /// Uncolored label for the log file
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::Other(s) => s.to_uppercase(),
            other => other.to_debug_key().to_uppercase(),
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_keys_are_lowercase() {
        assert_eq!(LogTag::Registry.to_debug_key(), "registry");
        assert_eq!(LogTag::Other("Cli".to_string()).to_debug_key(), "cli");
        assert_eq!(LogTag::Rpc.to_plain_string(), "RPC");
    }
}
