use serde::{Deserialize, Serialize};
use std::fmt;

/// The three platforms a dashboard is assembled from.
///
/// Ordering is the display order: Codeforces, LeetCode, CodeChef.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceTag {
    #[serde(rename = "CF")]
    Codeforces,
    #[serde(rename = "LC")]
    LeetCode,
    #[serde(rename = "CC")]
    CodeChef,
}

impl SourceTag {
    /// Every source, in display order
    pub const ALL: [SourceTag; 3] = [SourceTag::Codeforces, SourceTag::LeetCode, SourceTag::CodeChef];

    /// Parse a short tag or platform name
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "cf" | "codeforces" => Ok(SourceTag::Codeforces),
            "lc" | "leetcode" => Ok(SourceTag::LeetCode),
            "cc" | "codechef" => Ok(SourceTag::CodeChef),
            _ => Err(format!("Invalid source: {}", s)),
        }
    }

    /// Short tag used as the series key
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Codeforces => "CF",
            SourceTag::LeetCode => "LC",
            SourceTag::CodeChef => "CC",
        }
    }

    /// Human-readable platform name
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceTag::Codeforces => "Codeforces",
            SourceTag::LeetCode => "LeetCode",
            SourceTag::CodeChef => "CodeChef",
        }
    }

    /// Public profile page for a handle
    pub fn profile_url(&self, handle: &str) -> String {
        match self {
            SourceTag::Codeforces => format!("https://codeforces.com/profile/{}", handle),
            SourceTag::LeetCode => format!("https://leetcode.com/u/{}", handle),
            SourceTag::CodeChef => format!("https://www.codechef.com/users/{}", handle),
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
