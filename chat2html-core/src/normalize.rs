use tracing::{debug, warn};

use crate::attachment::{self, AttachmentNames, AttachmentStore};
use crate::error::Result;
use crate::fragment::{Fragment, FragmentNode};
use crate::model::{RawMessage, Record};
use crate::thread_id::ThreadId;

/// Turns one exported message into a [`Record`].
///
/// `names` is shared by every message of a conversion so that repeated
/// attachment names resolve to the same files the exporter wrote. A missing
/// or unreadable attachment only drops its inline content; the marker line
/// stays and the failure is recorded in [`Record::warnings`].
pub fn normalize(
    message: &RawMessage,
    store: &dyn AttachmentStore,
    names: &mut AttachmentNames,
) -> Result<Record> {
    let thread = ThreadId::parse(&message.message_id)?;
    let reply = !thread.is_root();

    if message.is_deleted() {
        debug!(message_id = %message.message_id, "rendering deleted placeholder");
        return Ok(Record {
            thread,
            deleted: true,
            fragment: Fragment::deleted(reply),
            attachments: 0,
            embedded: 0,
            warnings: Vec::new(),
        });
    }

    let mut fragment = Fragment::new(reply);
    if reply {
        fragment.push(FragmentNode::ReplyMarker);
    }
    fragment.push(FragmentNode::Header {
        author: message.author().to_string(),
        timestamp: message.created_date.clone(),
    });
    fragment.push(FragmentNode::Text(message.text.clone()));

    for reaction in &message.reactions {
        fragment.push(FragmentNode::Reaction {
            glyph: reaction.glyph().to_string(),
            reactors: reaction.reactor_emails.clone(),
        });
    }

    let mut embedded = 0;
    let mut warnings = Vec::new();
    for file in &message.attached_files {
        let name = names.resolve(file.export_name());
        fragment.push(FragmentNode::AttachmentMarker(name.clone()));

        match attachment::embed(store, &name) {
            Ok(Some(node)) => {
                fragment.push(node);
                embedded += 1;
            }
            Ok(None) => {}
            Err(err) => {
                warn!(
                    message_id = %message.message_id,
                    attachment = %name,
                    error = %err,
                    "attachment not embedded"
                );
                warnings.push(format!("message {}: {err}", message.message_id));
            }
        }
    }

    Ok(Record {
        thread,
        deleted: false,
        fragment,
        attachments: message.attached_files.len(),
        embedded,
        warnings,
    })
}
