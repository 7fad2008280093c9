//! Markup sanitization.
//!
//! Parses a chapter fragment with html5ever and re-emits it with every
//! attribute dropped and only allow-listed tags kept. Disallowed elements
//! lose their tags but not their content: the subtree is still walked, so
//! whatever text they wrap flattens upward into the surrounding output.

use std::collections::HashSet;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use crate::dom::sink::DomSink;
use crate::dom::{Dom, NodeData, NodeId};

/// Sanitize a chapter fragment.
///
/// Text node content is emitted verbatim in document order. An element whose
/// lowercase name is in `allowed` contributes its opening tag on the way down
/// and its closing tag on the way up, with no attributes; any other element
/// contributes nothing. With an empty allow-list the result is the plain
/// concatenated text of the input.
///
/// The parser recovers from arbitrarily malformed input, so this never
/// fails: garbage in degrades to the text content of whatever tree the
/// parser salvages, and raw content still reaches the reader.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use unbind::clean;
///
/// let allowed: HashSet<String> = ["p", "b"].iter().map(|t| t.to_string()).collect();
/// let out = clean("<div><p>Hello <b>World</b></p></div>", &allowed);
/// assert_eq!(out, "<p>Hello <b>World</b></p>");
/// ```
pub fn clean(input: &str, allowed: &HashSet<String>) -> String {
    let sink = DomSink::new();
    let dom = parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(input.as_bytes())
        .into_dom();
    emit(&dom, allowed)
}

/// One step of the traversal.
enum Step {
    Enter(NodeId),
    /// Emit the closing tag of an allow-listed element.
    Close(NodeId),
}

/// Walk the tree iteratively and build the output.
///
/// Explicit stack instead of recursion: chapter files are untrusted input and
/// can nest deeply enough to overflow the call stack.
fn emit(dom: &Dom, allowed: &HashSet<String>) -> String {
    let mut out = String::new();
    let mut stack: Vec<Step> = Vec::new();

    push_children(dom, dom.document(), &mut stack);

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(id) => {
                let Some(node) = dom.get(id) else { continue };
                match &node.data {
                    NodeData::Text(text) => out.push_str(text),
                    NodeData::Element { name } => {
                        if allowed.contains(name.local.as_ref()) {
                            out.push('<');
                            out.push_str(name.local.as_ref());
                            out.push('>');
                            stack.push(Step::Close(id));
                        }
                        push_children(dom, id, &mut stack);
                    }
                    NodeData::Document | NodeData::Comment | NodeData::Doctype => {}
                }
            }
            Step::Close(id) => {
                if let Some(NodeData::Element { name }) = dom.get(id).map(|n| &n.data) {
                    out.push_str("</");
                    out.push_str(name.local.as_ref());
                    out.push('>');
                }
            }
        }
    }

    out
}

/// Push children in reverse so they pop in document order, after their
/// parent's opening tag and before its `Close` step.
fn push_children(dom: &Dom, parent: NodeId, stack: &mut Vec<Step>) {
    let children: Vec<NodeId> = dom.children(parent).collect();
    for child in children.into_iter().rev() {
        stack.push(Step::Enter(child));
    }
}
