/// Content of one rendered message, independent of the output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentNode {
    /// Stands in for everything a deleted message would have shown.
    DeletedPlaceholder,
    ReplyMarker,
    Header { author: String, timestamp: String },
    Text(String),
    Reaction { glyph: String, reactors: Vec<String> },
    AttachmentMarker(String),
    Image { media_type: &'static str, data: String },
    FileContent(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub reply: bool,
    pub nodes: Vec<FragmentNode>,
}

impl Fragment {
    pub fn new(reply: bool) -> Self {
        Self {
            reply,
            nodes: Vec::new(),
        }
    }

    pub fn deleted(reply: bool) -> Self {
        Self {
            reply,
            nodes: vec![FragmentNode::DeletedPlaceholder],
        }
    }

    pub fn push(&mut self, node: FragmentNode) {
        self.nodes.push(node);
    }

    pub fn is_deleted(&self) -> bool {
        self.nodes
            .iter()
            .any(|node| matches!(node, FragmentNode::DeletedPlaceholder))
    }

    pub fn attachment_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|node| match node {
            FragmentNode::AttachmentMarker(name) => Some(name.as_str()),
            _ => None,
        })
    }
}
