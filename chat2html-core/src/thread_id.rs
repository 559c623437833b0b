use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ConvertError, Result};

static MESSAGE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^/]+)/([^/]+)/([^/]+)$").expect("valid regex"));

/// Thread placement derived from an exported `space/parent/message` id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadId {
    pub space: String,
    pub id: String,
    pub parent: Option<String>,
}

impl ThreadId {
    pub fn parse(input: &str) -> Result<Self> {
        input.parse()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl FromStr for ThreadId {
    type Err = ConvertError;

    fn from_str(input: &str) -> Result<Self> {
        let captures = MESSAGE_ID_RE
            .captures(input)
            .ok_or_else(|| ConvertError::MalformedId(input.to_string()))?;

        let space = captures[1].to_string();
        let topic = &captures[2];
        let message = &captures[3];

        let parent = (topic != message).then(|| topic.to_string());

        Ok(Self {
            space,
            id: message.to_string(),
            parent,
        })
    }
}
