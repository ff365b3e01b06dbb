use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Main settings structure for Workshop Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// Which catalog to walk
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CatalogConfig {
    /// Workshop browse endpoint
    pub base_url: String,

    /// Steam application id whose workshop is browsed
    pub app_id: u64,

    /// Value of the `browsesort` query parameter
    pub sort: String,

    /// Value of the `section` query parameter
    pub section: String,

    /// Full URL of the first catalog page; replaces the one built from the fields above
    pub start_url: Option<String>,

    /// Stop after this many catalog pages (0 = no limit)
    pub max_pages: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://steamcommunity.com/workshop/browse/".to_string(),
            app_id: 1435790,
            sort: "trend".to_string(),
            section: "readytouseitems".to_string(),
            start_url: None,
            max_pages: 0,
        }
    }
}

impl CatalogConfig {
    /// Resolves the URL of the first catalog page
    ///
    /// An explicit `start-url` wins; otherwise the browse query is built from
    /// the app id, sort order and section, with the remaining filters left at
    /// the values the workshop itself uses for "no filter".
    pub fn first_page_url(&self) -> Result<Url, url::ParseError> {
        if let Some(start) = &self.start_url {
            return Url::parse(start);
        }

        let mut url = Url::parse(&self.base_url)?;
        url.query_pairs_mut()
            .append_pair("appid", &self.app_id.to_string())
            .append_pair("searchtext", "")
            .append_pair("childpublishedfileid", "0")
            .append_pair("browsesort", &self.sort)
            .append_pair("section", &self.section)
            .append_pair("created_date_range_filter_start", "0")
            .append_pair("created_date_range_filter_end", "0")
            .append_pair("updated_date_range_filter_start", "0")
            .append_pair("updated_date_range_filter_end", "0");
        Ok(url)
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HttpConfig {
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("workshop-harvest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Where the extracted rows go
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    pub mode: OutputMode,

    /// SQL dump file appended to in file mode
    pub sql_file: String,

    /// Target table, used both in the dump and in direct-write mode
    pub table: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::File,
            sql_file: "dump.sql".to_string(),
            table: "escape_simulator_room".to_string(),
        }
    }
}

/// Persistence strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Buffer rows and append one INSERT statement at crawl end
    #[default]
    File,
    /// Insert each row immediately into the SQLite database
    Database,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Database => write!(f, "database"),
        }
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "database" | "db" => Ok(Self::Database),
            other => Err(format!("unknown output mode '{}'", other)),
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
}
