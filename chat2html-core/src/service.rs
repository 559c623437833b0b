use std::fs;
use std::path::Path;

use tracing::debug;

use crate::assemble::assemble_document;
use crate::attachment::{AttachmentNames, AttachmentStore, DirectoryStore};
use crate::config::ConvertConfig;
use crate::error::{ConvertError, Result};
use crate::model::{ChatExport, Conversion, ConvertSummary, RawMessage, Record};
use crate::normalize::normalize;

/// Reads `messages.json` from the configured export directory and renders it.
pub fn convert_export(config: &ConvertConfig) -> Result<Conversion> {
    let messages_path = config.messages_path();
    if !messages_path.is_file() {
        return Err(ConvertError::MessagesFileNotFound {
            dir: config.export_dir.clone(),
        });
    }

    let raw = fs::read_to_string(&messages_path).map_err(|source| ConvertError::Io {
        path: messages_path.clone(),
        source,
    })?;

    let store = DirectoryStore::new(config.attachment_root());
    convert_str(&raw, &messages_path, &store, &config.title)
}

pub fn convert_str(
    raw_json: &str,
    source_path: &Path,
    store: &dyn AttachmentStore,
    title: &str,
) -> Result<Conversion> {
    let export = parse_export(raw_json, source_path)?;
    convert_messages(&export.messages, store, title)
}

pub fn parse_export(raw_json: &str, source_path: &Path) -> Result<ChatExport> {
    serde_json::from_str(raw_json).map_err(|source| ConvertError::InvalidJson {
        path: source_path.to_path_buf(),
        source,
    })
}

pub fn convert_messages(
    messages: &[RawMessage],
    store: &dyn AttachmentStore,
    title: &str,
) -> Result<Conversion> {
    let records = normalize_all(messages, store)?;
    let assembly = assemble_document(&records, title);

    let mut summary = ConvertSummary {
        messages: records.len(),
        orphans: assembly.order.unthreaded.len(),
        ..ConvertSummary::default()
    };
    for record in &records {
        if record.is_root() {
            summary.roots += 1;
        } else {
            summary.replies += 1;
        }
        if record.deleted {
            summary.deleted += 1;
        }
        summary.attachments += record.attachments;
        summary.embedded += record.embedded;
        summary.warnings.extend(record.warnings.iter().cloned());
    }
    for &idx in &assembly.order.duplicate_roots {
        summary
            .warnings
            .push(format!("duplicate root id {}", records[idx].id()));
    }

    debug!(
        messages = summary.messages,
        roots = summary.roots,
        replies = summary.replies,
        orphans = summary.orphans,
        "assembled chat history"
    );

    Ok(Conversion {
        html: assembly.html,
        summary,
    })
}

/// Normalizes every message with one attachment counter for the whole run.
/// The first malformed id aborts the conversion.
pub fn normalize_all(messages: &[RawMessage], store: &dyn AttachmentStore) -> Result<Vec<Record>> {
    let mut names = AttachmentNames::new();
    messages
        .iter()
        .map(|message| normalize(message, store, &mut names))
        .collect()
}

pub fn write_output(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConvertError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, html).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })
}
