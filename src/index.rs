//! Table-of-contents page.

use std::fmt::Write;

use crate::page::{escape_html, wrap_page};
use crate::pipeline::ChapterResult;

/// Build the index page from the ordered chapter results.
///
/// One list item per chapter, linking to its page and labeled with the
/// chapter's sequence index and source member name. The list may be sparse:
/// chapters the pipeline dropped simply have no entry, and the survivors
/// keep their original indices. An empty run still produces a valid page.
pub fn build_index(chapters: &[ChapterResult]) -> String {
    let mut items = String::new();
    for ch in chapters {
        write!(
            items,
            "<li><a href='{}'>Chapter {} : {}</a></li>",
            ch.output_name,
            ch.index,
            escape_html(&ch.member_name)
        )
        .unwrap();
    }

    let content = format!("<h1>Table of Contents</h1>\n<ul>{items}</ul>");
    wrap_page("Table of Contents", &content, -1, -1)
}
