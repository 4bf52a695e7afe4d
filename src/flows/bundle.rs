//! Bundle export flow
//!
//! Concatenates every matched file under a base directory into one output file.
//! Each file becomes a block:
//!
//! ```text
//! /<relative_path> :
//!
//! <raw file content>
//!
//! ------------------------
//!
//! ```

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::{debug, info};

use crate::backends::scan::for_each_match;
use crate::core::config::BundleConfig;
use crate::core::error::{BundleError, Result as BundleResult};
use crate::core::file_reader::read_text;
use crate::core::model::{BundleJob, BundleReport, ExportOptions};
use crate::core::paths::normalize_path;
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::HashingWriter;

/// Line written after every file's content
pub const SEPARATOR: &str = "------------------------";

/// Write a single header/content/separator block
pub fn write_block<W: Write>(out: &mut W, relative: &str, content: &str) -> io::Result<()> {
    write!(out, "/{} :\n\n", relative)?;
    out.write_all(content.as_bytes())?;
    write!(out, "\n\n{}\n\n", SEPARATOR)
}

/// Export one job: truncate the output, then append a block per matched file.
///
/// The output is created before traversal starts, so a missing source directory
/// still leaves an empty bundle behind. On error the bundle may be partial.
pub fn export(job: &BundleJob, options: ExportOptions) -> BundleResult<BundleReport> {
    let write_err = |source: io::Error| BundleError::Write {
        path: job.output.clone(),
        source,
    };

    let file = File::create(&job.output).map_err(|source| BundleError::CreateOutput {
        path: job.output.clone(),
        source,
    })?;
    let mut out = HashingWriter::new(BufWriter::new(file));

    let files = for_each_match(
        &job.source,
        &job.filter,
        options.sort,
        Some(job.output.as_path()),
        |matched| {
            let content = read_text(&matched.path, options.encoding)?;
            write_block(&mut out, &matched.relative, &content).map_err(write_err)?;
            debug!(file = %matched.relative, bytes = content.len(), "appended");
            Ok(())
        },
    )?;

    out.flush().map_err(write_err)?;

    Ok(BundleReport {
        source: normalize_path(&job.source),
        output: normalize_path(&job.output),
        files,
        bytes: out.bytes_written(),
        digest: out.digest(),
    })
}

/// Run every configured job in order; the first failure aborts the run
pub fn run_jobs(config: &BundleConfig) -> BundleResult<Vec<BundleReport>> {
    let jobs = config.jobs();
    let mut reports = Vec::with_capacity(jobs.len());

    for job in &jobs {
        info!(
            source = %job.source.display(),
            output = %job.output.display(),
            suffixes = ?job.filter.suffixes(),
            "exporting bundle"
        );
        let report = export(job, config.options)?;
        info!(files = report.files, bytes = report.bytes, "bundle written");
        reports.push(report);
    }

    Ok(reports)
}

fn print_reports(reports: &[BundleReport], render: RenderConfig) -> Result<()> {
    let output = Renderer::with_config(render)
        .render_reports(reports)
        .context("failed to render report")?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// Run the `run` command
pub fn run_bundle(config: &BundleConfig, render: RenderConfig) -> Result<()> {
    let reports = run_jobs(config).context("bundle export failed")?;
    print_reports(&reports, render)
}

/// Run the `export` command for a single ad-hoc job
pub fn run_export(job: &BundleJob, options: ExportOptions, render: RenderConfig) -> Result<()> {
    let report = export(job, options)
        .with_context(|| format!("failed to export {}", job.source.display()))?;
    print_reports(&[report], render)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file_reader::EncodingStrategy;
    use crate::core::model::SuffixFilter;
    use crate::core::util::hash_bytes;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write(path: &Path, content: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn sorted() -> ExportOptions {
        ExportOptions {
            sort: true,
            ..ExportOptions::default()
        }
    }

    #[test]
    fn test_single_match_exact_output() {
        let temp = tempdir().unwrap();
        let base = temp.path().join("a");
        write(&base.join("b.tsx"), b"X");
        write(&base.join("c.txt"), b"Y");
        let output = temp.path().join("out.txt");

        let report = export(&BundleJob::new(&base, &output), sorted()).unwrap();

        let bundle = fs::read_to_string(&output).unwrap();
        assert_eq!(bundle, "/b.tsx :\n\nX\n\n------------------------\n\n");
        assert_eq!(report.files, 1);
        assert_eq!(report.bytes, bundle.len() as u64);
        assert_eq!(report.digest, hash_bytes(bundle.as_bytes()));
    }

    #[test]
    fn test_no_matches_gives_empty_output() {
        let temp = tempdir().unwrap();
        let base = temp.path().join("src");
        write(&base.join("notes.txt"), b"hello");
        write(&base.join("Widget.JSX"), b"upper");
        write(&base.join("api.ts"), b"ts");
        let output = temp.path().join("out.txt");

        let report = export(&BundleJob::new(&base, &output), sorted()).unwrap();

        assert!(output.exists());
        assert_eq!(fs::read(&output).unwrap(), b"");
        assert_eq!(report.files, 0);
        assert_eq!(report.bytes, 0);
    }

    #[test]
    fn test_missing_source_gives_empty_output() {
        let temp = tempdir().unwrap();
        let output = temp.path().join("out.txt");
        fs::write(&output, "stale content").unwrap();

        let job = BundleJob::new(temp.path().join("does-not-exist"), &output);
        let report = export(&job, ExportOptions::default()).unwrap();

        assert_eq!(report.files, 0);
        assert_eq!(fs::read_to_string(&output).unwrap(), "");
    }

    #[test]
    fn test_n_blocks_for_n_matches() {
        let temp = tempdir().unwrap();
        let base = temp.path().join("components");
        write(&base.join("Card.jsx"), b"card");
        write(&base.join("home/Hero.tsx"), b"hero");
        write(&base.join("common/util.js"), b"util");
        write(&base.join("common/README.md"), b"readme");
        let output = temp.path().join("Components.txt");

        let report = export(&BundleJob::new(&base, &output), sorted()).unwrap();
        let bundle = fs::read_to_string(&output).unwrap();

        assert_eq!(report.files, 3);
        assert_eq!(bundle.matches(SEPARATOR).count(), 3);
        assert_eq!(
            bundle,
            "/Card.jsx :\n\ncard\n\n------------------------\n\n\
             /common/util.js :\n\nutil\n\n------------------------\n\n\
             /home/Hero.tsx :\n\nhero\n\n------------------------\n\n"
        );
    }

    #[test]
    fn test_top_level_files_come_before_subdirectories() {
        let temp = tempdir().unwrap();
        let base = temp.path().join("src");
        write(&base.join("a/b.js"), b"B");
        write(&base.join("z.js"), b"Z");
        let output = temp.path().join("out.txt");

        export(&BundleJob::new(&base, &output), sorted()).unwrap();
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "/z.js :\n\nZ\n\n------------------------\n\n\
             /a/b.js :\n\nB\n\n------------------------\n\n"
        );
    }

    #[test]
    fn test_content_is_verbatim() {
        let temp = tempdir().unwrap();
        let base = temp.path().join("lib");
        let raw = "\n  leading blank\r\nwindows line\r\ntrailing spaces   \n\n\n";
        write(&base.join("api.js"), raw.as_bytes());
        let output = temp.path().join("Lib.txt");

        export(&BundleJob::new(&base, &output), sorted()).unwrap();
        let bundle = fs::read_to_string(&output).unwrap();

        let expected = format!("/api.js :\n\n{}\n\n------------------------\n\n", raw);
        assert_eq!(bundle, expected);
    }

    #[test]
    fn test_export_twice_is_identical() {
        let temp = tempdir().unwrap();
        let base = temp.path().join("app");
        write(&base.join("page.tsx"), b"export default function Page() {}\n");
        write(&base.join("layout.jsx"), b"export const Layout = () => null;\n");
        write(&base.join("nested/route.js"), b"module.exports = {};\n");
        let output = temp.path().join("App.txt");
        let job = BundleJob::new(&base, &output);

        let first = export(&job, ExportOptions::default()).unwrap();
        let first_bytes = fs::read(&output).unwrap();
        let second = export(&job, ExportOptions::default()).unwrap();
        let second_bytes = fs::read(&output).unwrap();

        assert_eq!(first_bytes, second_bytes);
        assert_eq!(first, second);
    }

    #[test]
    fn test_bare_suffix_file_name_matches() {
        let temp = tempdir().unwrap();
        let base = temp.path().join("src");
        write(&base.join(".tsx"), b"dot");
        let output = temp.path().join("out.txt");

        export(&BundleJob::new(&base, &output), sorted()).unwrap();
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "/.tsx :\n\ndot\n\n------------------------\n\n"
        );
    }

    #[test]
    fn test_invalid_utf8_strict_fails() {
        let temp = tempdir().unwrap();
        let base = temp.path().join("src");
        write(&base.join("bad.js"), &[0x66, 0x6f, 0xff]);
        let output = temp.path().join("out.txt");

        let err = export(&BundleJob::new(&base, &output), sorted()).unwrap_err();
        match err {
            BundleError::Decode { path, .. } => assert!(path.ends_with("bad.js")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_utf8_lossy_succeeds() {
        let temp = tempdir().unwrap();
        let base = temp.path().join("src");
        write(&base.join("bad.js"), &[0x66, 0x6f, 0xff]);
        let output = temp.path().join("out.txt");
        let options = ExportOptions {
            sort: true,
            encoding: EncodingStrategy::Lossy,
        };

        let report = export(&BundleJob::new(&base, &output), options).unwrap();
        assert_eq!(report.files, 1);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "/bad.js :\n\nfo\u{fffd}\n\n------------------------\n\n"
        );
    }

    #[test]
    fn test_output_inside_source_is_not_bundled() {
        let temp = tempdir().unwrap();
        let base = temp.path().join("src");
        write(&base.join("a.js"), b"a");
        let output = base.join("bundle.js");

        let job = BundleJob::new(&base, &output).with_filter(SuffixFilter::new([".js"]));
        let report = export(&job, sorted()).unwrap();

        assert_eq!(report.files, 1);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "/a.js :\n\na\n\n------------------------\n\n"
        );
    }

    #[test]
    fn test_uncreatable_output_fails() {
        let temp = tempdir().unwrap();
        let job = BundleJob::new(temp.path(), temp.path().join("missing-dir/out.txt"));

        let err = export(&job, ExportOptions::default()).unwrap_err();
        assert!(matches!(err, BundleError::CreateOutput { .. }));
    }

    #[test]
    fn test_run_jobs_in_order() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("project");
        write(&root.join("components/Button.jsx"), b"button");
        write(&root.join("lib/api.js"), b"api");
        write(&root.join("lib/types.ts"), b"types");
        fs::create_dir_all(root.join("app")).unwrap();
        let out_dir = temp.path().join("out");
        fs::create_dir(&out_dir).unwrap();

        let mut config = BundleConfig::default_jobs(&root);
        config.out_dir = out_dir.clone();
        let reports = run_jobs(&config).unwrap();

        let outputs: Vec<_> = reports.iter().map(|r| r.files).collect();
        assert_eq!(outputs, vec![1, 1, 0]);
        assert_eq!(
            fs::read_to_string(out_dir.join("Lib.txt")).unwrap(),
            "/api.js :\n\napi\n\n------------------------\n\n"
        );
        assert_eq!(fs::read_to_string(out_dir.join("App.txt")).unwrap(), "");
    }

    #[test]
    fn test_write_block() {
        let mut buf = Vec::new();
        write_block(&mut buf, "x/y.js", "body").unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "/x/y.js :\n\nbody\n\n------------------------\n\n"
        );
    }
}
