// src/config/consts.rs

// Net config
pub const API_BASE_URL: &str = "https://www.reinfolib.mlit.go.jp/ex-api/external/XIT001";
pub const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
pub const API_KEY_ENV_FALLBACK: &str = "MLIT_API_KEY";
pub const PRICE_CLASSIFICATION: &str = "01"; // transaction prices
pub const USER_AGENT: &str = "house_trend/0.3";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Pacing
pub const REQUEST_PAUSE_MS: u64 = 100; // be polite

// Year grid
pub const DEFAULT_START_YEAR: i32 = 2007;
pub const DEFAULT_END_YEAR: i32 = 2024;
pub const QUARTERS: [u8; 4] = [1, 2, 3, 4];

// Age is still estimated against this year when the period label is unreadable
pub const AGE_FALLBACK_YEAR: i32 = 2024;

// Local cache
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";

// Output
pub const DEFAULT_RAW_DIR: &str = "api_data";
pub const DEFAULT_PROCESSED_DIR: &str = "data";
pub const DEFAULT_CHART_DIR: &str = "charts";
pub const DEFAULT_REPORT_DIR: &str = "api_data";
pub const RAW_SUFFIX: &str = "_api_raw.json";
pub const PROCESSED_SUFFIX: &str = "_api_processed.csv";

// Charts
pub const TEST_MODE_AREA_LIMIT: usize = 3;
pub const CHART_WIDTH: u32 = 1200;
pub const CHART_HEIGHT: u32 = 800;

// Viewer age buckets split at this many years
pub const AGE_SPLIT_YEARS: u32 = 15;

// Report
pub const ERROR_ECHO_LIMIT: usize = 10;

/// A prefecture the pipeline knows how to query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    /// Lowercase English key, used in file names
    pub key: &'static str,
    /// 2-digit code sent as `area`
    pub code: &'static str,
    pub local_name: &'static str,
}

/// Fetch order matters: reports and logs follow it.
pub const REGIONS: &[Region] = &[
    Region { key: "tokyo",    code: "13", local_name: "東京都" },
    Region { key: "chiba",    code: "12", local_name: "千葉県" },
    Region { key: "saitama",  code: "11", local_name: "埼玉県" },
    Region { key: "kanagawa", code: "14", local_name: "神奈川県" },
    Region { key: "osaka",    code: "27", local_name: "大阪府" },
    Region { key: "aichi",    code: "23", local_name: "愛知県" },
];

pub fn region_by_key(key: &str) -> Option<&'static Region> {
    let key = key.trim();
    REGIONS.iter().find(|r| r.key.eq_ignore_ascii_case(key))
}

pub fn region_by_code(code: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.code == code.trim())
}
