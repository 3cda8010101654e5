use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, Options};

/// Renders Markdown to readable plain text: markup is dropped, block elements
/// are separated by a blank line, inline and fenced code keep their contents.
pub fn to_plain_text(source: &str) -> String {
    let arena = Arena::new();
    let root = parse_document(&arena, source, &Options::default());
    let mut out = String::new();
    collect_text(root, &mut out);
    out.trim_end().to_string()
}

fn collect_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    let ends_block = {
        let data = node.data.borrow();
        match &data.value {
            NodeValue::Text(text) => out.push_str(text),
            NodeValue::Code(code) => out.push_str(&code.literal),
            NodeValue::CodeBlock(block) => out.push_str(block.literal.trim_end()),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push('\n'),
            _ => {}
        }
        matches!(
            data.value,
            NodeValue::Paragraph | NodeValue::Heading(_) | NodeValue::CodeBlock(_)
        )
    };

    for child in node.children() {
        collect_text(child, out);
    }

    if ends_block && !out.is_empty() {
        out.push_str("\n\n");
    }
}
