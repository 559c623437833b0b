use crate::fragment::{Fragment, FragmentNode};

pub const DEFAULT_TITLE: &str = "Chat History";
pub const DELETED_LABEL: &str = "deleted message";
pub const REPLY_MARKER: &str = "→ ";
pub const FILE_CONTENT_LABEL: &str = "File content";
pub const UNTHREADED_HEADING: &str = "Unthreaded replies";

const STYLESHEET: &str = "\
body { font-family: Arial, sans-serif; margin: 0 auto; padding: 20px; }
.message { margin: 10px 0; padding: 10px; border-radius: 5px; }
.message.reply { margin-left: 40px; border-left: 3px solid #ddd; }
.message.deleted .sender { color: #999; font-style: italic; }
.sender { font-weight: bold; margin-bottom: 5px; }
.reply-marker { color: #666; }
.reaction { color: #666; font-size: 0.8em; }
.timestamp { color: #666; font-size: 0.8em; }
.content { margin-top: 5px; }
.attachment { margin-top: 5px; color: #8B0000; }
.message img { max-width: 100%; margin-top: 5px; }
details pre { white-space: pre-wrap; }
";

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escapes `input` and turns its line breaks into `<br>`.
pub fn escape_multiline(input: &str) -> String {
    escape_html(input)
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

pub fn render_fragment(fragment: &Fragment) -> String {
    let mut classes = vec!["message"];
    if fragment.reply {
        classes.push("reply");
    }
    if fragment.is_deleted() {
        classes.push("deleted");
    }

    let mut output = format!("<div class=\"{}\">\n", classes.join(" "));
    for node in &fragment.nodes {
        render_node(&mut output, node);
    }
    output.push_str("</div>\n");
    output
}

fn render_node(output: &mut String, node: &FragmentNode) {
    match node {
        FragmentNode::DeletedPlaceholder => {
            output.push_str(&format!("<span class=\"sender\">{DELETED_LABEL}</span>\n"));
        }
        FragmentNode::ReplyMarker => {
            output.push_str(&format!("<span class=\"reply-marker\">{REPLY_MARKER}</span>"));
        }
        FragmentNode::Header { author, timestamp } => {
            output.push_str(&format!(
                "<span class=\"sender\">{}</span> - <span class=\"timestamp\">{}</span>\n",
                escape_html(author),
                escape_html(timestamp)
            ));
        }
        FragmentNode::Text(text) => {
            output.push_str(&format!(
                "<div class=\"content\">{}</div>\n",
                escape_multiline(text)
            ));
        }
        FragmentNode::Reaction { glyph, reactors } => {
            output.push_str(&format!(
                "<div class=\"reaction\">{} {}</div>\n",
                escape_html(glyph),
                escape_html(&reactors.join(", "))
            ));
        }
        FragmentNode::AttachmentMarker(name) => {
            output.push_str(&format!(
                "<div class=\"attachment\">📎 Attachment: {}</div>\n",
                escape_html(name)
            ));
        }
        FragmentNode::Image { media_type, data } => {
            output.push_str(&format!("<img src=\"data:{media_type};base64,{data}\">\n"));
        }
        FragmentNode::FileContent(content) => {
            output.push_str(&format!(
                "<details><summary>{FILE_CONTENT_LABEL}</summary><pre>{}</pre></details>\n",
                escape_multiline(content)
            ));
        }
    }
}

pub fn render_unthreaded_heading() -> String {
    format!("<h2 class=\"unthreaded\">{UNTHREADED_HEADING}</h2>\n")
}

/// Wraps already-rendered message blocks in the static page shell.
pub fn render_document(title: &str, body: &str) -> String {
    let title = escape_html(title);
    let mut output = String::with_capacity(body.len() + STYLESHEET.len() + 512);
    output.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
    output.push_str(&format!("<title>{title}</title>\n"));
    output.push_str("<style>\n");
    output.push_str(STYLESHEET);
    output.push_str("</style>\n</head>\n<body>\n");
    output.push_str(&format!("<h1>{title}</h1>\n"));
    output.push_str("<div class=\"chat-container\">\n");
    output.push_str(body);
    output.push_str("</div>\n</body>\n</html>\n");
    output
}
