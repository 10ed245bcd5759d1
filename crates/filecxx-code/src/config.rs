//! Run configuration and path resolution.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::delivery::DeliveryMode;
use crate::fetch::DEFAULT_TIMEOUT_SECS;

/// Host serving the activation code pages.
pub const CODE_PAGE_HOST: &str = "http://filecxx.com";

/// Default name of the cached code list.
pub const DEFAULT_KEYS_FILE: &str = "keys.json";

/// Default name of the file holding the selected code (manual mode).
pub const DEFAULT_KEY_FILE: &str = "key.txt";

/// Executable that must be running for automatic delivery.
pub const TARGET_PROCESS: &str = "fileu.exe";

/// Title of the File Centipede activation dialog.
pub const ACTIVATION_WINDOW_TITLE: &str = "File Centipede - Activation code";

/// Language edition of the code page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageLanguage {
    #[default]
    EnUs,
    ZhCn,
    ZhTw,
    RuRu,
    KoKr,
}

impl PageLanguage {
    pub const ALL: [PageLanguage; 5] = [
        PageLanguage::EnUs,
        PageLanguage::ZhCn,
        PageLanguage::ZhTw,
        PageLanguage::RuRu,
        PageLanguage::KoKr,
    ];

    /// Locale segment used in the page path.
    pub fn code(self) -> &'static str {
        match self {
            PageLanguage::EnUs => "en_US",
            PageLanguage::ZhCn => "zh_CN",
            PageLanguage::ZhTw => "zh_TW",
            PageLanguage::RuRu => "ru_RU",
            PageLanguage::KoKr => "ko_KR",
        }
    }

    /// Full URL of the activation code page for this language.
    pub fn page_url(self) -> String {
        format!("{CODE_PAGE_HOST}/{}/activation_code.html", self.code())
    }
}

impl fmt::Display for PageLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PageLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|l| l.code()).collect();
                format!("unknown language '{s}' (expected one of {})", known.join(", "))
            })
    }
}

/// What to do when `keys.json` already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Always re-fetch and overwrite.
    #[default]
    Always,
    /// Ask before overwriting; on "no", use the existing file.
    Prompt,
}

/// The process and window automatic delivery targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationTarget {
    pub process_name: String,
    pub window_title: String,
}

impl Default for AutomationTarget {
    fn default() -> Self {
        Self {
            process_name: TARGET_PROCESS.to_string(),
            window_title: ACTIVATION_WINDOW_TITLE.to_string(),
        }
    }
}

/// Everything one run needs, decided once at startup.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub page_url: String,
    pub timeout: Duration,
    pub refresh: RefreshPolicy,
    pub delivery: DeliveryMode,
    pub keys_path: PathBuf,
    pub key_path: PathBuf,
    pub target: AutomationTarget,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            page_url: PageLanguage::default().page_url(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            refresh: RefreshPolicy::default(),
            delivery: DeliveryMode::default(),
            keys_path: PathBuf::from(DEFAULT_KEYS_FILE),
            key_path: PathBuf::from(DEFAULT_KEY_FILE),
            target: AutomationTarget::default(),
        }
    }
}

/// Resolve the page URL: explicit URL, then `FILECXX_CODE_URL`, then the
/// page for `lang`.
pub fn resolve_page_url(explicit: Option<&str>, lang: PageLanguage) -> String {
    if let Some(url) = explicit {
        return url.to_string();
    }

    if let Ok(env_url) = std::env::var("FILECXX_CODE_URL") {
        return env_url;
    }

    lang.page_url()
}

/// Resolve the `keys.json` path: explicit, then `FILECXX_KEYS_FILE`, then
/// the working directory.
pub fn resolve_keys_path(explicit: Option<&str>) -> PathBuf {
    resolve_path(explicit, "FILECXX_KEYS_FILE", DEFAULT_KEYS_FILE)
}

/// Resolve the `key.txt` path: explicit, then `FILECXX_KEY_FILE`, then the
/// working directory.
pub fn resolve_key_path(explicit: Option<&str>) -> PathBuf {
    resolve_path(explicit, "FILECXX_KEY_FILE", DEFAULT_KEY_FILE)
}

fn resolve_path(explicit: Option<&str>, env_var: &str, default: &str) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    if let Ok(env_path) = std::env::var(env_var) {
        return PathBuf::from(env_path);
    }

    PathBuf::from(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_per_language() {
        assert_eq!(
            PageLanguage::EnUs.page_url(),
            "http://filecxx.com/en_US/activation_code.html"
        );
        assert_eq!(
            PageLanguage::KoKr.page_url(),
            "http://filecxx.com/ko_KR/activation_code.html"
        );
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!("zh_CN".parse::<PageLanguage>(), Ok(PageLanguage::ZhCn));
        assert_eq!("zh-tw".parse::<PageLanguage>(), Ok(PageLanguage::ZhTw));
        assert!("fr_FR".parse::<PageLanguage>().is_err());
        for lang in PageLanguage::ALL {
            assert_eq!(lang.to_string().parse::<PageLanguage>(), Ok(lang));
        }
    }

    #[test]
    fn test_explicit_values_win() {
        assert_eq!(
            resolve_page_url(Some("http://localhost:9/codes"), PageLanguage::RuRu),
            "http://localhost:9/codes"
        );
        assert_eq!(
            resolve_keys_path(Some("/tmp/k.json")),
            PathBuf::from("/tmp/k.json")
        );
        assert_eq!(resolve_key_path(Some("out/key.txt")), PathBuf::from("out/key.txt"));
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.refresh, RefreshPolicy::Always);
        assert_eq!(config.delivery, DeliveryMode::Manual);
        assert_eq!(config.target.process_name, "fileu.exe");
        assert_eq!(config.target.window_title, "File Centipede - Activation code");
    }
}
