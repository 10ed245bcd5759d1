//! Fetch the File Centipede activation code page, pick the code valid right
//! now, and hand it to the user.

pub mod cache;
pub mod config;
pub mod delivery;
pub mod fetch;
pub mod normalize;
pub mod parser;
pub mod run;
pub mod select;
pub mod types;

pub use cache::{CachedKey, KeysFile};
pub use config::{AutomationTarget, PageLanguage, RefreshPolicy, RunConfig};
pub use delivery::{
    deliver, DeliveryBlocker, DeliveryMode, DeliveryOutcome, Desktop, KeyStroke, NoticeLevel,
    TypingPlan, WindowHandle,
};
pub use fetch::{CodePageClient, USER_AGENT};
pub use normalize::{normalize_entries, normalize_entry, SOURCE_UTC_OFFSET_HOURS};
pub use parser::{pair_lines, parse_page, ParsedBlock};
pub use run::{run, RunOutcome};
pub use select::select_code;
pub use types::*;
