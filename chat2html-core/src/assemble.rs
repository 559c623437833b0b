use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::model::Record;
use crate::render::{self, DEFAULT_TITLE};

/// Output order of a record list, as indices into that list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadOrder {
    /// Each root followed by its direct replies, roots in input order.
    pub threaded: Vec<usize>,
    /// Replies whose parent id matches no root, in input order.
    pub unthreaded: Vec<usize>,
    /// Roots that reuse an id already claimed by an earlier root.
    pub duplicate_roots: Vec<usize>,
}

pub fn thread_order(records: &[Record]) -> ThreadOrder {
    let mut children = HashMap::<&str, Vec<usize>>::new();
    for (idx, record) in records.iter().enumerate() {
        if let Some(parent) = record.parent() {
            children.entry(parent).or_default().push(idx);
        }
    }

    let mut claimed = HashSet::<&str>::new();
    let mut order = ThreadOrder {
        threaded: Vec::with_capacity(records.len()),
        ..ThreadOrder::default()
    };

    for (idx, record) in records.iter().enumerate() {
        if !record.is_root() {
            continue;
        }

        order.threaded.push(idx);
        // Replies belong to the first root carrying their parent id.
        if !claimed.insert(record.id()) {
            order.duplicate_roots.push(idx);
            continue;
        }
        if let Some(replies) = children.get(record.id()) {
            order.threaded.extend(replies);
        }
    }

    order.unthreaded = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.parent().is_some_and(|parent| !claimed.contains(parent)))
        .map(|(idx, _)| idx)
        .collect();

    order
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub html: String,
    pub order: ThreadOrder,
}

pub fn assemble(records: &[Record]) -> String {
    assemble_document(records, DEFAULT_TITLE).html
}

pub fn assemble_document(records: &[Record], title: &str) -> Assembly {
    let order = thread_order(records);

    for &idx in &order.duplicate_roots {
        warn!(id = records[idx].id(), "duplicate root id; rendering without replies");
    }
    if !order.unthreaded.is_empty() {
        warn!(
            count = order.unthreaded.len(),
            "replies without a matching root appended at the end"
        );
    }

    let mut body = String::new();
    for &idx in &order.threaded {
        body.push_str(&records[idx].html());
    }
    if !order.unthreaded.is_empty() {
        body.push_str(&render::render_unthreaded_heading());
        for &idx in &order.unthreaded {
            body.push_str(&records[idx].html());
        }
    }

    Assembly {
        html: render::render_document(title, &body),
        order,
    }
}
