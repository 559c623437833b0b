use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::{ConvertError, Result};
use crate::fragment::FragmentNode;

/// Longest attachment name shown or looked up, counted in characters.
pub const MAX_DISPLAY_NAME_CHARS: usize = 48;

/// Occurrence counter for export names, scoped to a single conversion.
///
/// The exporter writes repeated file names to disk as `name(1).ext`,
/// `name(2).ext`, ... in message order, so counting has to span every
/// message of the export rather than restart per message.
#[derive(Debug, Clone, Default)]
pub struct AttachmentNames {
    seen: HashMap<String, usize>,
}

impl AttachmentNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the name the next occurrence of `export_name` was written under.
    pub fn resolve(&mut self, export_name: &str) -> String {
        let occurrence = *self
            .seen
            .entry(export_name.to_string())
            .and_modify(|count| *count += 1)
            .or_insert(0);

        let (stem, ext) = split_extension(export_name);
        let suffix = if occurrence == 0 {
            String::new()
        } else {
            format!("({occurrence})")
        };

        fit_display_name(stem, &suffix, ext, MAX_DISPLAY_NAME_CHARS)
    }
}

/// Splits `name` into stem and extension, the extension keeping its dot.
/// Leading dots belong to the stem, so `.bashrc` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(idx) => name.split_at(leading + idx),
        None => (name, ""),
    }
}

/// Joins `stem`, `suffix` and `ext`, cutting only the stem so the whole name
/// fits in `max_chars`. The suffix and extension are always kept verbatim, so
/// an extension that alone exceeds the budget yields a longer name.
pub fn fit_display_name(stem: &str, suffix: &str, ext: &str, max_chars: usize) -> String {
    let budget = max_chars.saturating_sub(suffix.chars().count() + ext.chars().count());
    let mut name: String = stem.chars().take(budget).collect();
    name.push_str(suffix);
    name.push_str(ext);
    name
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Png,
    Jpeg,
    Log,
    Other,
}

impl AttachmentKind {
    pub fn from_name(name: &str) -> Self {
        let (_, ext) = split_extension(name);
        match ext.to_ascii_lowercase().as_str() {
            ".png" => Self::Png,
            ".jpg" | ".jpeg" => Self::Jpeg,
            ".log" => Self::Log,
            _ => Self::Other,
        }
    }

    pub fn media_type(self) -> Option<&'static str> {
        match self {
            Self::Png => Some("image/png"),
            Self::Jpeg => Some("image/jpeg"),
            Self::Log | Self::Other => None,
        }
    }
}

/// Source of attachment bytes, keyed by resolved attachment name.
pub trait AttachmentStore {
    fn path_for(&self, name: &str) -> Result<PathBuf>;

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path_for(name)?;
        fs::read(&path).map_err(|source| ConvertError::AttachmentRead { path, source })
    }

    fn read_text(&self, name: &str) -> Result<String> {
        let bytes = self.read(name)?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(_) => Err(ConvertError::NonUtf8Attachment {
                path: self.path_for(name)?,
            }),
        }
    }
}

/// Attachments stored next to `messages.json` in the export directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AttachmentStore for DirectoryStore {
    fn path_for(&self, name: &str) -> Result<PathBuf> {
        // Only the final component is honored so names cannot escape the export.
        let file_name = Path::new(name)
            .file_name()
            .ok_or_else(|| ConvertError::InvalidAttachmentName(name.to_string()))?;
        Ok(self.root.join(file_name))
    }
}

/// Loads the inline content for a resolved attachment, if its kind embeds.
pub fn embed(store: &dyn AttachmentStore, name: &str) -> Result<Option<FragmentNode>> {
    let kind = AttachmentKind::from_name(name);
    match kind {
        AttachmentKind::Png | AttachmentKind::Jpeg => {
            let bytes = store.read(name)?;
            Ok(kind.media_type().map(|media_type| FragmentNode::Image {
                media_type,
                data: STANDARD.encode(bytes),
            }))
        }
        AttachmentKind::Log => Ok(Some(FragmentNode::FileContent(store.read_text(name)?))),
        AttachmentKind::Other => Ok(None),
    }
}


#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::testing::MemoryStore;
    use super::{
        AttachmentKind, AttachmentNames, AttachmentStore, DirectoryStore,
        MAX_DISPLAY_NAME_CHARS, embed, fit_display_name, split_extension,
    };
    use crate::error::ConvertError;
    use crate::fragment::FragmentNode;

    #[test]
    fn repeated_names_are_disambiguated_across_calls() {
        let mut names = AttachmentNames::new();
        assert_eq!(names.resolve("img.png"), "img.png");
        assert_eq!(names.resolve("other.png"), "other.png");
        assert_eq!(names.resolve("img.png"), "img(1).png");
        assert_eq!(names.resolve("img.png"), "img(2).png");
    }

    #[test]
    fn fresh_counters_are_independent() {
        let mut first = AttachmentNames::new();
        first.resolve("img.png");
        let mut second = AttachmentNames::new();
        assert_eq!(second.resolve("img.png"), "img.png");
    }

    #[test]
    fn disambiguation_without_extension_appends_index() {
        let mut names = AttachmentNames::new();
        names.resolve("README");
        assert_eq!(names.resolve("README"), "README(1)");
    }

    #[test]
    fn split_extension_follows_last_dot() {
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("photo.PNG"), ("photo", ".PNG"));
        assert_eq!(split_extension(".bashrc"), (".bashrc", ""));
        assert_eq!(split_extension("noext"), ("noext", ""));
    }

    #[test]
    fn long_name_keeps_extension_within_budget() {
        let name = format!("{}.pdf", "x".repeat(56));
        assert_eq!(name.chars().count(), 60);

        let mut names = AttachmentNames::new();
        let truncated = names.resolve(&name);
        assert!(truncated.chars().count() <= MAX_DISPLAY_NAME_CHARS);
        assert!(truncated.ends_with(".pdf"));
        assert_eq!(truncated, format!("{}.pdf", "x".repeat(44)));
    }

    #[test]
    fn short_name_is_untouched() {
        assert_eq!(fit_display_name("notes", "", ".txt", 48), "notes.txt");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let truncated = fit_display_name(&"é".repeat(50), "", ".log", 48);
        assert_eq!(truncated.chars().count(), 48);
        assert!(truncated.ends_with(".log"));
    }

    #[test]
    fn long_repeated_names_keep_their_index() {
        let name = format!("{}.png", "p".repeat(50));
        let mut names = AttachmentNames::new();

        let first = names.resolve(&name);
        let second = names.resolve(&name);
        let eleventh = (0..9).map(|_| names.resolve(&name)).last().expect("resolved");

        assert_ne!(first, second);
        assert_eq!(first, format!("{}.png", "p".repeat(44)));
        assert_eq!(second, format!("{}(1).png", "p".repeat(41)));
        assert_eq!(eleventh, format!("{}(10).png", "p".repeat(40)));
        for resolved in [&first, &second, &eleventh] {
            assert_eq!(resolved.chars().count(), MAX_DISPLAY_NAME_CHARS);
        }
    }

    #[test]
    fn oversized_extension_is_kept_verbatim() {
        let ext = format!(".{}", "e".repeat(50));
        let fitted = fit_display_name("report", "(2)", &ext, MAX_DISPLAY_NAME_CHARS);
        assert_eq!(fitted, format!("(2){ext}"));
    }

    #[test]
    fn kinds_are_case_insensitive() {
        assert_eq!(AttachmentKind::from_name("a.PNG"), AttachmentKind::Png);
        assert_eq!(AttachmentKind::from_name("a.Jpg"), AttachmentKind::Jpeg);
        assert_eq!(AttachmentKind::from_name("a.jpeg"), AttachmentKind::Jpeg);
        assert_eq!(AttachmentKind::from_name("a.LOG"), AttachmentKind::Log);
        assert_eq!(AttachmentKind::from_name("a.pdf"), AttachmentKind::Other);
        assert_eq!(AttachmentKind::Jpeg.media_type(), Some("image/jpeg"));
    }

    #[test]
    fn directory_store_keeps_reads_inside_root() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("shot.png"), b"png").expect("write");

        let store = DirectoryStore::new(temp.path());
        assert_eq!(
            store.path_for("../../shot.png").expect("path"),
            temp.path().join("shot.png")
        );
        assert_eq!(store.read("shot.png").expect("read"), b"png");
        assert!(store.path_for("..").is_err());
    }

    #[test]
    fn directory_store_reports_missing_files() {
        let temp = tempdir().expect("tempdir");
        let store = DirectoryStore::new(temp.path());
        let err = store.read("gone.png").expect_err("must fail");
        assert!(matches!(err, ConvertError::AttachmentRead { .. }));
        assert!(format!("{err}").contains("cannot read attachment"));
    }

    #[test]
    fn embed_encodes_images_as_base64() {
        let store = MemoryStore::default().with("a.png", b"hello");
        let node = embed(&store, "a.png").expect("embed");
        assert_eq!(
            node,
            Some(FragmentNode::Image {
                media_type: "image/png",
                data: "aGVsbG8=".to_string(),
            })
        );
    }

    #[test]
    fn embed_reads_logs_as_text() {
        let store = MemoryStore::default().with("run.log", b"line 1\nline 2");
        let node = embed(&store, "run.log").expect("embed");
        assert_eq!(
            node,
            Some(FragmentNode::FileContent("line 1\nline 2".to_string()))
        );
    }

    #[test]
    fn embed_rejects_non_utf8_logs() {
        let store = MemoryStore::default().with("bin.log", &[0xff, 0xfe, 0x00]);
        let err = embed(&store, "bin.log").expect_err("must fail");
        assert!(format!("{err}").contains("not valid UTF-8"));
    }

    #[test]
    fn embed_skips_unknown_kinds_without_reading() {
        let store = MemoryStore::default();
        assert_eq!(embed(&store, "report.pdf").expect("embed"), None);
    }
}
