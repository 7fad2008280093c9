use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::TempDir;
use unbind::{Config, process_epub};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Build a minimal EPUB-shaped zip with the given (member name, body) pairs.
fn write_epub(path: &Path, chapters: &[(&str, &str)]) {
    let file = fs::File::create(path).expect("create epub file");
    let mut zip = ZipWriter::new(file);

    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    // mimetype first and uncompressed, like a real EPUB
    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();

    // non-chapter members the pipeline must ignore
    zip.start_file("META-INF/container.xml", deflated).unwrap();
    zip.write_all(b"<container/>").unwrap();
    zip.start_file("OEBPS/style.css", deflated).unwrap();
    zip.write_all(b"p { margin: 0 }").unwrap();

    for (name, body) in chapters {
        zip.start_file(*name, deflated).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }

    zip.finish().unwrap();
}

fn config_for(dir: &Path) -> Config {
    Config::new(dir).with_workers(2)
}

#[test]
fn test_members_are_ordered_lexicographically_not_by_archive_order() {
    let tmp = TempDir::new().unwrap();
    let epub = tmp.path().join("book.epub");
    let out = tmp.path().join("out");

    // deliberately out of order in the archive
    write_epub(
        &epub,
        &[
            ("b.html", "<p>second</p>"),
            ("a.html", "<p>first</p>"),
            ("c.html", "<p>third</p>"),
        ],
    );

    let summary = process_epub(&config_for(&out), &epub).unwrap();

    assert_eq!(summary.candidates, 3);
    assert_eq!(summary.dropped, 0);

    let names: Vec<_> = summary
        .chapters
        .iter()
        .map(|ch| (ch.index, ch.member_name.as_str(), ch.output_name.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            (0, "a.html", "chapter_000.html"),
            (1, "b.html", "chapter_001.html"),
            (2, "c.html", "chapter_002.html"),
        ]
    );

    let page0 = fs::read_to_string(out.join("chapter_000.html")).unwrap();
    let page1 = fs::read_to_string(out.join("chapter_001.html")).unwrap();
    let page2 = fs::read_to_string(out.join("chapter_002.html")).unwrap();
    assert!(page0.contains("first"));
    assert!(page1.contains("second"));
    assert!(page2.contains("third"));
}

#[test]
fn test_non_chapter_members_are_ignored() {
    let tmp = TempDir::new().unwrap();
    let epub = tmp.path().join("book.epub");
    let out = tmp.path().join("out");

    write_epub(
        &epub,
        &[("ch1.xhtml", "<p>one</p>"), ("ch2.html", "<p>two</p>")],
    );

    let summary = process_epub(&config_for(&out), &epub).unwrap();

    // mimetype, container.xml, and style.css are not candidates
    assert_eq!(summary.candidates, 2);
    assert_eq!(summary.chapters.len(), 2);
    assert!(out.join("chapter_000.html").exists());
    assert!(out.join("chapter_001.html").exists());
    assert!(!out.join("chapter_002.html").exists());
}

#[test]
fn test_chapter_content_is_sanitized() {
    let tmp = TempDir::new().unwrap();
    let epub = tmp.path().join("book.epub");
    let out = tmp.path().join("out");

    write_epub(
        &epub,
        &[(
            "ch1.html",
            r#"<div class="wrap"><p style="x">kept</p><script>dropped()</script></div>"#,
        )],
    );

    let config = Config::new(&out).with_allowed_tags(["p"]).with_workers(1);
    process_epub(&config, &epub).unwrap();

    let page = fs::read_to_string(out.join("chapter_000.html")).unwrap();
    assert!(page.contains("<p>kept</p>"));
    assert!(!page.contains("class=\"wrap\""));
    assert!(!page.contains("<script>dropped()"));
    // flattened script text is still visible, per the pass-through design
    assert!(page.contains("dropped()"));
}

#[test]
fn test_navigation_links_follow_sequence_position() {
    let tmp = TempDir::new().unwrap();
    let epub = tmp.path().join("book.epub");
    let out = tmp.path().join("out");

    write_epub(
        &epub,
        &[
            ("ch1.html", "<p>a</p>"),
            ("ch2.html", "<p>b</p>"),
            ("ch3.html", "<p>c</p>"),
        ],
    );

    process_epub(&config_for(&out), &epub).unwrap();

    let first = fs::read_to_string(out.join("chapter_000.html")).unwrap();
    assert!(!first.contains("Prev"));
    assert!(first.contains("<a href='chapter_001.html'>Next &raquo;</a>"));

    let middle = fs::read_to_string(out.join("chapter_001.html")).unwrap();
    assert!(middle.contains("<a href='chapter_000.html'>&laquo; Prev</a>"));
    assert!(middle.contains("<a href='chapter_002.html'>Next &raquo;</a>"));

    let last = fs::read_to_string(out.join("chapter_002.html")).unwrap();
    assert!(last.contains("<a href='chapter_001.html'>&laquo; Prev</a>"));
    assert!(!last.contains("Next &raquo;"));

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(!index.contains("Prev"));
    assert!(!index.contains("Next &raquo;"));
    assert!(index.contains("Chapter 0 : ch1.html"));
    assert!(index.contains("Chapter 2 : ch3.html"));
}

#[test]
fn test_output_is_identical_for_any_worker_count() {
    let tmp = TempDir::new().unwrap();
    let epub = tmp.path().join("book.epub");

    let chapters: Vec<(String, String)> = (0..12)
        .map(|i| (format!("ch{i:02}.html"), format!("<p>chapter body {i}</p>")))
        .collect();
    let chapter_refs: Vec<(&str, &str)> = chapters
        .iter()
        .map(|(n, b)| (n.as_str(), b.as_str()))
        .collect();
    write_epub(&epub, &chapter_refs);

    let mut baseline: Option<Vec<(String, String)>> = None;

    for workers in [1, 2, 4] {
        let out = tmp.path().join(format!("out_{workers}"));
        let config = Config::new(&out).with_workers(workers);
        let summary = process_epub(&config, &epub).unwrap();

        assert_eq!(summary.chapters.len(), 12);

        let mut pages: Vec<(String, String)> = summary
            .chapters
            .iter()
            .map(|ch| {
                let html = fs::read_to_string(out.join(&ch.output_name)).unwrap();
                (ch.output_name.clone(), html)
            })
            .collect();
        pages.push((
            "index.html".to_string(),
            fs::read_to_string(out.join("index.html")).unwrap(),
        ));

        match &baseline {
            None => baseline = Some(pages),
            Some(expected) => assert_eq!(&pages, expected, "worker count {workers} diverged"),
        }
    }
}

#[test]
fn test_empty_archive_still_writes_an_index() {
    let tmp = TempDir::new().unwrap();
    let epub = tmp.path().join("book.epub");
    let out = tmp.path().join("out");

    write_epub(&epub, &[]);

    let summary = process_epub(&config_for(&out), &epub).unwrap();

    assert_eq!(summary.candidates, 0);
    assert!(summary.chapters.is_empty());

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains("Table of Contents"));
}

#[test]
fn test_missing_archive_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");

    let err = process_epub(&config_for(&out), tmp.path().join("nope.epub"));
    assert!(err.is_err());
}

#[test]
fn test_garbage_archive_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let bogus = tmp.path().join("bogus.epub");
    fs::write(&bogus, b"not a zip at all").unwrap();

    let err = process_epub(&config_for(&tmp.path().join("out")), &bogus);
    assert!(err.is_err());
}

#[test]
fn test_malformed_chapter_is_not_dropped() {
    let tmp = TempDir::new().unwrap();
    let epub = tmp.path().join("book.epub");
    let out = tmp.path().join("out");

    write_epub(
        &epub,
        &[("ch1.html", "<p>fine</p>"), ("ch2.html", "<<<% not html &&&")],
    );

    let summary = process_epub(&config_for(&out), &epub).unwrap();

    // malformed markup degrades, it never fails
    assert_eq!(summary.dropped, 0);
    assert_eq!(summary.chapters.len(), 2);
    assert!(out.join("chapter_001.html").exists());
}
