//! Concurrent chapter pipeline.
//!
//! Filters and sorts archive members, fans the work across a fixed worker
//! pool, and reassembles the results in sequence order no matter which worker
//! finished first. Chapters are independent - each worker reads, sanitizes,
//! and writes its own output file - so the only shared state is the job
//! cursor and the result list.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::config::Config;
use crate::error::Result;
use crate::index::build_index;
use crate::page::{self, INDEX_FILE};
use crate::sanitize;

/// Archive member suffixes treated as chapters. Pure name matching; the EPUB
/// manifest and spine are never consulted.
const CHAPTER_SUFFIXES: &[&str] = &[".html", ".xhtml"];

/// A unit of work: one archive member with its permanent sequence index.
#[derive(Debug, Clone)]
struct ChapterJob {
    index: usize,
    member_name: String,
    output_name: String,
}

/// A successfully written chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterResult {
    /// Zero-based rank from the lexicographic sort of member names.
    pub index: usize,
    /// Archive member the page was produced from.
    pub member_name: String,
    /// File name of the written page, relative to the output directory.
    pub output_name: String,
}

/// Outcome of a conversion run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Chapter members found in the archive.
    pub candidates: usize,
    /// Chapters abandoned because of read or write failures.
    pub dropped: usize,
    /// Surviving chapters in sequence order.
    pub chapters: Vec<ChapterResult>,
}

/// Convert an EPUB archive into sanitized chapter pages plus an index page.
///
/// Fatal conditions - the archive cannot be opened, the output directory
/// cannot be created, the index page cannot be written - surface as errors.
/// A failure while processing a single chapter only drops that chapter; the
/// run continues and the dropped count is reported in the summary.
pub fn process_epub(config: &Config, epub_path: impl AsRef<Path>) -> Result<RunSummary> {
    let epub_path = epub_path.as_ref();

    // Created before any worker starts so the workers never race on it.
    fs::create_dir_all(&config.output_dir)?;

    let jobs = collect_jobs(epub_path)?;
    let candidates = jobs.len();
    info!(candidates, path = %epub_path.display(), "found chapter members");

    let mut chapters = run_pool(config, epub_path, &jobs)?;

    // Workers finish in arbitrary order; the sequence index is the only
    // ordering that counts.
    chapters.sort_by_key(|ch| ch.index);

    let index_html = build_index(&chapters);
    fs::write(config.output_dir.join(INDEX_FILE), index_html)?;

    let dropped = candidates - chapters.len();
    if dropped > 0 {
        warn!(dropped, candidates, "chapters dropped during processing");
    }

    Ok(RunSummary {
        candidates,
        dropped,
        chapters,
    })
}

/// Enumerate chapter members and assign permanent sequence indices.
///
/// Lexicographic member-name order is the sole ordering source. Archives are
/// expected to zero-pad chapter numbers in member names; nothing here
/// compensates when they do not.
fn collect_jobs(epub_path: &Path) -> Result<Vec<ChapterJob>> {
    let archive = open_archive(epub_path)?;

    let mut names: Vec<String> = archive
        .file_names()
        .filter(|name| is_chapter_member(name))
        .map(str::to_string)
        .collect();
    names.sort();

    Ok(names
        .into_iter()
        .enumerate()
        .map(|(index, member_name)| ChapterJob {
            index,
            output_name: page::chapter_file_name(index),
            member_name,
        })
        .collect())
}

/// Suffix match on the archive member name, nothing content-type aware.
fn is_chapter_member(name: &str) -> bool {
    CHAPTER_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

fn open_archive(path: &Path) -> Result<ZipArchive<fs::File>> {
    Ok(ZipArchive::new(fs::File::open(path)?)?)
}

/// Fan the jobs across a fixed pool and collect whatever succeeds, in
/// completion order.
///
/// The pre-built job slice plus an atomic cursor is the job queue: bounded by
/// construction, and the producer never blocks. Exactly `config.workers`
/// (minimum 1) workers are spawned; the scope is the join barrier. Each
/// worker opens its own archive handle because zip readers need exclusive
/// access to seek.
fn run_pool(config: &Config, epub_path: &Path, jobs: &[ChapterJob]) -> Result<Vec<ChapterResult>> {
    let workers = config.workers.max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;

    let cursor = AtomicUsize::new(0);
    let results = Mutex::new(Vec::with_capacity(jobs.len()));
    let total = jobs.len();

    pool.scope(|scope| {
        for worker_id in 0..workers {
            let cursor = &cursor;
            let results = &results;
            scope.spawn(move |_| {
                let mut archive = match open_archive(epub_path) {
                    Ok(archive) => archive,
                    Err(err) => {
                        // The pipeline already opened the archive once, so
                        // this is unexpected; the other workers keep going.
                        warn!(worker_id, %err, "worker could not open archive");
                        return;
                    }
                };

                loop {
                    let slot = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(job) = jobs.get(slot) else { break };

                    match process_chapter(config, &mut archive, job, total) {
                        Ok(result) => {
                            debug!(worker_id, index = job.index, member = %job.member_name, "chapter written");
                            results.lock().unwrap().push(result);
                        }
                        Err(err) => {
                            // Per-chapter failures never abort the run
                            warn!(worker_id, index = job.index, member = %job.member_name, %err, "chapter dropped");
                        }
                    }
                }
            });
        }
    });

    Ok(results.into_inner().unwrap())
}

/// Read, sanitize, wrap, and write one chapter.
fn process_chapter(
    config: &Config,
    archive: &mut ZipArchive<fs::File>,
    job: &ChapterJob,
    total: usize,
) -> Result<ChapterResult> {
    let mut raw = Vec::new();
    archive.by_name(&job.member_name)?.read_to_end(&mut raw)?;

    // Raw text, no encoding detection: invalid sequences become U+FFFD
    let text = String::from_utf8_lossy(&raw);
    let body = sanitize::clean(&text, &config.allowed_tags);

    let title = format!("Chapter {}", job.index);
    let html = page::wrap_page(&title, &body, job.index as i32, total as i32);

    fs::write(config.output_dir.join(&job.output_name), html)?;

    Ok(ChapterResult {
        index: job.index,
        member_name: job.member_name.clone(),
        output_name: job.output_name.clone(),
    })
}
