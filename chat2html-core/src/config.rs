use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::render::DEFAULT_TITLE;

pub const MESSAGES_FILE: &str = "messages.json";
pub const DEFAULT_OUTPUT_FILE: &str = "chat_history.html";
pub const OUTPUT_ENV: &str = "CHAT2HTML_OUTPUT";
pub const TITLE_ENV: &str = "CHAT2HTML_TITLE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    pub export_dir: PathBuf,
    pub output_path: PathBuf,
    pub title: String,
}

impl ConvertConfig {
    pub fn resolve(
        export_dir: impl Into<PathBuf>,
        output: Option<PathBuf>,
        title: Option<String>,
    ) -> Self {
        Self::resolve_with(export_dir, output, title, |key| env::var_os(key))
    }

    fn resolve_with(
        export_dir: impl Into<PathBuf>,
        output: Option<PathBuf>,
        title: Option<String>,
        lookup: impl Fn(&str) -> Option<OsString>,
    ) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        // Precedence:
        // 1) --output
        // 2) CHAT2HTML_OUTPUT
        // 3) ./chat_history.html
        let output_path = output
            .or_else(|| non_empty(OUTPUT_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));

        // Precedence:
        // 1) --title
        // 2) CHAT2HTML_TITLE (ignored when not valid unicode)
        // 3) "Chat History"
        let title = title
            .or_else(|| non_empty(TITLE_ENV).and_then(|value| value.into_string().ok()))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        Self {
            export_dir: export_dir.into(),
            output_path,
            title,
        }
    }

    pub fn messages_path(&self) -> PathBuf {
        self.export_dir.join(MESSAGES_FILE)
    }

    pub fn attachment_root(&self) -> &Path {
        &self.export_dir
    }
}
