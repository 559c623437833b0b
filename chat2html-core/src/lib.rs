pub mod assemble;
pub mod attachment;
pub mod config;
pub mod error;
pub mod fragment;
pub mod model;
pub mod normalize;
pub mod render;
pub mod service;
pub mod thread_id;

pub use assemble::{Assembly, ThreadOrder, assemble, assemble_document, thread_order};
pub use attachment::{AttachmentKind, AttachmentNames, AttachmentStore, DirectoryStore};
pub use config::ConvertConfig;
pub use error::{ConvertError, Result};
pub use fragment::{Fragment, FragmentNode};
pub use model::{ChatExport, Conversion, ConvertSummary, MessageState, RawMessage, Record};
pub use normalize::normalize;
pub use service::{convert_export, convert_messages, convert_str, normalize_all, write_output};
pub use thread_id::ThreadId;
