//! Standalone page assembly.
//!
//! Every output page is self-contained: styling and the theme-toggle script
//! are inlined, and navigation links are derived from the chapter's position
//! by formatting, never by looking up neighbouring files. That makes
//! [`chapter_file_name`] the single source of the numbering scheme: the
//! pipeline names output files with it and the wrapper derives prev/next
//! hrefs from it, so the two can never drift apart.

/// File name of the table-of-contents entry page.
pub const INDEX_FILE: &str = "index.html";

/// Output file name for a chapter sequence index.
///
/// ```
/// assert_eq!(unbind::page::chapter_file_name(7), "chapter_007.html");
/// ```
pub fn chapter_file_name(index: usize) -> String {
    format!("chapter_{index:03}.html")
}

/// Inline style and theme script shared by every page. The theme choice is
/// kept in `localStorage`, so it survives reloads without any server help.
const PAGE_HEAD: &str = r#"    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        :root { --bg-color: #f4f4f9; --container-bg: #ffffff; --text-color: #333333; --link-color: #007bff; --border-color: #dddddd; --shadow: 0 2px 5px rgba(0,0,0,0.05); }
        [data-theme="dark"] { --bg-color: #121212; --container-bg: #1e1e1e; --text-color: #e0e0e0; --link-color: #66b3ff; --border-color: #333333; --shadow: 0 2px 5px rgba(0,0,0,0.5); }
        body { font-family: Georgia, serif; line-height: 1.8; color: var(--text-color); background-color: var(--bg-color); margin: 0; padding: 20px; transition: background-color 0.3s, color 0.3s; }
        .container { max-width: 800px; margin: 0 auto; background-color: var(--container-bg); padding: 40px; border-radius: 8px; box-shadow: var(--shadow); }
        p { margin-bottom: 1.5em; text-align: justify; }
        .nav-links { margin-top: 40px; padding-top: 20px; border-top: 1px solid var(--border-color); display: flex; justify-content: space-between; flex-wrap: wrap; gap: 10px; }
        a { text-decoration: none; color: var(--link-color); font-weight: bold; }
        .theme-toggle { position: fixed; top: 20px; right: 20px; background: var(--container-bg); border: 1px solid var(--border-color); color: var(--text-color); padding: 8px 12px; border-radius: 20px; cursor: pointer; z-index: 1000; }
    </style>
    <script>
        function toggleTheme() {
            const current = document.documentElement.getAttribute("data-theme");
            const next = current === "dark" ? "light" : "dark";
            document.documentElement.setAttribute("data-theme", next);
            localStorage.setItem("theme", next);
        }
        (function() {
            const saved = localStorage.getItem("theme");
            if (saved) document.documentElement.setAttribute("data-theme", saved);
        })();
    </script>
"#;

/// Wrap a sanitized fragment into a complete standalone page.
///
/// `index` is the zero-based chapter position and `total` the chapter count.
/// The previous link appears only when `index > 0`, the next link only when
/// `0 <= index < total - 1`; a table-of-contents link is always present.
/// Pass `-1` for pages outside the chapter sequence (the index page itself)
/// to suppress both navigation links.
///
/// The title is escaped; the fragment is embedded verbatim.
pub fn wrap_page(title: &str, content: &str, index: i32, total: i32) -> String {
    let prev_link = if index > 0 {
        format!(
            "<a href='{}'>&laquo; Prev</a>",
            chapter_file_name((index - 1) as usize)
        )
    } else {
        "<span></span>".to_string()
    };

    let next_link = if index >= 0 && index < total - 1 {
        format!(
            "<a href='{}'>Next &raquo;</a>",
            chapter_file_name((index + 1) as usize)
        )
    } else {
        "<span></span>".to_string()
    };

    let mut page = String::with_capacity(content.len() + PAGE_HEAD.len() + 1024);
    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"utf-8\">\n    <title>");
    page.push_str(&escape_html(title));
    page.push_str("</title>\n");
    page.push_str(PAGE_HEAD);
    page.push_str("</head>\n<body>\n");
    page.push_str(
        "    <button class=\"theme-toggle\" onclick=\"toggleTheme()\">&#127763; Theme</button>\n",
    );
    page.push_str("    <div class=\"container\">\n");
    page.push_str(content);
    page.push_str("\n        <div class='nav-links'>\n            ");
    page.push_str(&prev_link);
    page.push_str("\n            <a href='");
    page.push_str(INDEX_FILE);
    page.push_str("'>Table of Contents</a>\n            ");
    page.push_str(&next_link);
    page.push_str("\n        </div>\n    </div>\n</body>\n</html>\n");
    page
}

/// Escape special HTML characters in text destined for markup (titles,
/// index labels).
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
