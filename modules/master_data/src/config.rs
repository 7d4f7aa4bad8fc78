use serde::{Deserialize, Serialize};

/// `modules.master_data` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MasterDataConfig {
    /// Page size when `_size` is omitted.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Larger `_size` values are clamped to this.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    /// Run the count and the fetch of a list request in one transaction.
    #[serde(default)]
    pub consistent_reads: bool,
}

impl Default for MasterDataConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            consistent_reads: false,
        }
    }
}

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    1000
}
