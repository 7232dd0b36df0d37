use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::align::engine::{AlignmentEngine, EngineOutput};
use crate::align::AlignError;
use crate::core::alignment::AlignedSet;
use crate::core::record::SequenceRecord;
use crate::parsing::fasta::{read_fasta_file, read_records, write_fasta_file};
use crate::utils::validation::validate_records;

/// Default bound on a single engine run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Default file receiving engine standard error after a failed alignment
pub const DEFAULT_DIAGNOSTICS_FILE: &str = "alignment_errors.log";

const INPUT_FILE: &str = "in.fasta";
const OUTPUT_FILE: &str = "out.fasta";

/// Knobs for a single alignment run
#[derive(Debug, Clone)]
pub struct AlignOptions {
    /// Maximum wall time for the engine; the child is killed when it expires
    pub timeout: Duration,

    /// Where engine standard error is written when an alignment fails
    pub diagnostics_path: PathBuf,

    /// Parent directory for scratch working directories (system temp dir if None)
    pub working_root: Option<PathBuf>,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            diagnostics_path: PathBuf::from(DEFAULT_DIAGNOSTICS_FILE),
            working_root: None,
        }
    }
}

/// Raw result of one engine run, collected before the working directory is removed
struct EngineRun {
    records: Vec<SequenceRecord>,
    stderr: String,
}

/// Align two or more records with an external engine.
///
/// The records are written to a fresh scratch directory, the engine is run
/// there with a bounded wait, and its output is parsed and checked. The
/// scratch directory is removed on every path out of this function.
///
/// The returned set lists the records in input order, matched by header,
/// whatever order the engine wrote them in.
///
/// # Errors
///
/// - `TooFewRecords` / `InvalidRecords` for bad input (including duplicate headers)
/// - `Configuration` if the directory or the engine executable is missing
/// - `Spawn`, `Timeout`, `EngineFailed`, `MalformedOutput` for engine failures
/// - `CountMismatch`, `MissingHeader`, `AlignedLengthMismatch`,
///   `UnalignedTooLong` when the engine output does not match the input
pub async fn align(
    records: &[SequenceRecord],
    executable_directory: &Path,
    engine: &dyn AlignmentEngine,
    options: &AlignOptions,
) -> Result<AlignedSet, AlignError> {
    if records.len() < 2 {
        return Err(AlignError::TooFewRecords(records.len()));
    }
    validate_records(records)?;

    let executable = locate_executable(executable_directory, engine)?;

    info!(
        "Aligning {} sequences with {}",
        records.len(),
        engine.name()
    );
    let run = run_engine(records, &executable, engine, options).await?;

    order_by_input(records, run, engine, options)
}

fn locate_executable(directory: &Path, engine: &dyn AlignmentEngine) -> Result<PathBuf, AlignError> {
    if !directory.is_dir() {
        return Err(AlignError::Configuration(format!(
            "Cannot find executable directory {}",
            directory.display()
        )));
    }

    let executable = engine.executable(directory);
    if !executable.is_file() {
        return Err(AlignError::Configuration(format!(
            "Cannot find {} executable at {}",
            engine.name(),
            executable.display()
        )));
    }

    Ok(executable)
}

fn create_working_directory(options: &AlignOptions) -> std::io::Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("renumber-align-");
    match &options.working_root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    }
}

/// Run the engine inside its own scratch directory and parse what it produced.
///
/// The directory is owned by this function, so it is gone by the time the
/// caller sees either the records or an error.
async fn run_engine(
    records: &[SequenceRecord],
    executable: &Path,
    engine: &dyn AlignmentEngine,
    options: &AlignOptions,
) -> Result<EngineRun, AlignError> {
    let working = create_working_directory(options)?;
    let input = working.path().join(INPUT_FILE);
    let output = working.path().join(OUTPUT_FILE);
    write_fasta_file(records, &input)?;

    let mut command = Command::new(executable);
    command
        .args(engine.arguments(&input, &output))
        .current_dir(working.path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(
        "Running {} in {}: {:?}",
        engine.name(),
        working.path().display(),
        command.as_std()
    );

    let child = command.spawn().map_err(|source| AlignError::Spawn {
        executable: executable.to_path_buf(),
        source,
    })?;

    let started = Instant::now();
    // Dropping the wait future on expiry drops the child, which kills it
    let finished = tokio::time::timeout(options.timeout, child.wait_with_output())
        .await
        .map_err(|_| AlignError::Timeout {
            engine: engine.name().to_string(),
            seconds: options.timeout.as_secs(),
        })??;
    info!(
        "{} finished in {:.2}s",
        engine.name(),
        started.elapsed().as_secs_f64()
    );

    let stderr = String::from_utf8_lossy(&finished.stderr).into_owned();
    if !finished.status.success() {
        return Err(AlignError::EngineFailed {
            engine: engine.name().to_string(),
            status: finished.status,
            diagnostics: persist_diagnostics(&options.diagnostics_path, engine, &stderr),
        });
    }

    let parsed = match engine.output() {
        EngineOutput::Stdout => read_records(finished.stdout.as_slice()),
        EngineOutput::File => read_fasta_file(&output),
    };
    let records = parsed.map_err(|source| AlignError::MalformedOutput {
        engine: engine.name().to_string(),
        source,
        diagnostics: persist_diagnostics(&options.diagnostics_path, engine, &stderr),
    })?;

    if let Err(e) = working.close() {
        warn!("Failed to remove alignment working directory: {e}");
    }

    Ok(EngineRun { records, stderr })
}

/// Check engine output against the input and restore input order
fn order_by_input(
    inputs: &[SequenceRecord],
    run: EngineRun,
    engine: &dyn AlignmentEngine,
    options: &AlignOptions,
) -> Result<AlignedSet, AlignError> {
    let diagnose = || persist_diagnostics(&options.diagnostics_path, engine, &run.stderr);

    if run.records.len() != inputs.len() {
        return Err(AlignError::CountMismatch {
            engine: engine.name().to_string(),
            expected: inputs.len(),
            found: run.records.len(),
            diagnostics: diagnose(),
        });
    }

    let width = run.records[0].len();
    let by_header: HashMap<&str, &SequenceRecord> = run
        .records
        .iter()
        .map(|r| (r.header.as_str(), r))
        .collect();

    let mut ordered = Vec::with_capacity(inputs.len());
    for input in inputs {
        let Some(aligned) = by_header.get(input.header.as_str()) else {
            return Err(AlignError::MissingHeader {
                header: input.header.clone(),
                diagnostics: diagnose(),
            });
        };

        if aligned.len() != width {
            return Err(AlignError::AlignedLengthMismatch {
                header: input.header.clone(),
                length: aligned.len(),
                width,
                diagnostics: diagnose(),
            });
        }

        if input.ungapped_len() > width {
            return Err(AlignError::UnalignedTooLong {
                header: input.header.clone(),
                length: input.ungapped_len(),
                width,
                diagnostics: diagnose(),
            });
        }

        ordered.push((*aligned).clone());
    }

    Ok(AlignedSet::new(ordered)?)
}

/// Write engine standard error to the diagnostics file.
///
/// Failure to write is logged and swallowed so it never hides the alignment error.
fn persist_diagnostics(
    path: &Path,
    engine: &dyn AlignmentEngine,
    stderr: &str,
) -> Option<PathBuf> {
    let report = format!(
        "# {} standard error captured {}\n{stderr}",
        engine.name(),
        chrono::Utc::now().to_rfc3339()
    );

    match std::fs::write(path, report) {
        Ok(()) => {
            warn!("Engine errors written to {}", path.display());
            Some(path.to_path_buf())
        }
        Err(e) => {
            warn!(
                "Could not write engine errors to {}: {e}",
                path.display()
            );
            None
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::align::engine::Muscle;
    use crate::utils::validation::ValidationError;
    use std::ffi::OsString;

    /// A `/bin/sh` script posing as an engine.
    ///
    /// The executable directory holds a symlink to `/bin/sh`, so nothing is
    /// written and then executed by the test process.
    #[derive(Debug)]
    struct ScriptEngine {
        script: String,
        output: EngineOutput,
    }

    impl ScriptEngine {
        fn stdout(script: &str) -> Self {
            Self {
                script: script.to_string(),
                output: EngineOutput::Stdout,
            }
        }

        fn file(script: &str) -> Self {
            Self {
                script: script.to_string(),
                output: EngineOutput::File,
            }
        }
    }

    impl AlignmentEngine for ScriptEngine {
        fn name(&self) -> &str {
            "script"
        }

        fn binary_name(&self) -> &str {
            "fake-aligner"
        }

        // sh -c <script> sh <input> <output>  =>  $1 = input, $2 = output
        fn arguments(&self, input: &Path, output: &Path) -> Vec<OsString> {
            vec![
                "-c".into(),
                self.script.clone().into(),
                "sh".into(),
                input.as_os_str().to_owned(),
                output.as_os_str().to_owned(),
            ]
        }

        fn output(&self) -> EngineOutput {
            self.output
        }
    }

    struct Fixture {
        bin: TempDir,
        scratch: TempDir,
        options: AlignOptions,
    }

    impl Fixture {
        fn new() -> Self {
            let bin = TempDir::new().unwrap();
            std::os::unix::fs::symlink("/bin/sh", bin.path().join("fake-aligner")).unwrap();
            let scratch = TempDir::new().unwrap();
            std::fs::create_dir(scratch.path().join("work")).unwrap();
            let options = AlignOptions {
                timeout: Duration::from_secs(30),
                diagnostics_path: scratch.path().join("errors.log"),
                working_root: Some(scratch.path().join("work")),
            };
            Self {
                bin,
                scratch,
                options,
            }
        }

        async fn align(
            &self,
            records: &[SequenceRecord],
            engine: &ScriptEngine,
        ) -> Result<AlignedSet, AlignError> {
            align(records, self.bin.path(), engine, &self.options).await
        }

        fn working_dirs_left(&self) -> usize {
            std::fs::read_dir(self.scratch.path().join("work"))
                .unwrap()
                .count()
        }

        fn diagnostics(&self) -> String {
            std::fs::read_to_string(&self.options.diagnostics_path).unwrap()
        }
    }

    fn inputs() -> Vec<SequenceRecord> {
        vec![
            SequenceRecord::new("query", "MKTAIL"),
            SequenceRecord::new("ref", "MKAIL"),
        ]
    }

    #[tokio::test]
    async fn test_align_stdout_engine_reorders_by_header() {
        let fixture = Fixture::new();
        let engine = ScriptEngine::stdout("printf '>ref\\nMK-AIL\\n>query\\nMKTAIL\\n'");

        let aligned = fixture.align(&inputs(), &engine).await.unwrap();
        assert_eq!(aligned.width(), 6);
        assert_eq!(aligned.records()[0], SequenceRecord::new("query", "MKTAIL"));
        assert_eq!(aligned.records()[1], SequenceRecord::new("ref", "MK-AIL"));
        assert_eq!(fixture.working_dirs_left(), 0);
    }

    #[tokio::test]
    async fn test_align_file_engine_reads_output_path() {
        let fixture = Fixture::new();
        let engine = ScriptEngine::file("printf '>query\\nMKTAIL\\n>ref\\nMK-AIL\\n' > \"$2\"");

        let aligned = fixture.align(&inputs(), &engine).await.unwrap();
        assert_eq!(aligned.records()[1].residues, "MK-AIL");
        assert_eq!(fixture.working_dirs_left(), 0);
    }

    #[tokio::test]
    async fn test_align_passes_input_file_to_engine() {
        let fixture = Fixture::new();
        let records = vec![
            SequenceRecord::new("a", "AC-T"),
            SequenceRecord::new("b", "ACGT"),
        ];
        let engine = ScriptEngine::stdout("cat \"$1\"");

        let aligned = fixture.align(&records, &engine).await.unwrap();
        assert_eq!(aligned.into_records(), records);
    }

    #[tokio::test]
    async fn test_missing_executable_is_configuration_error() {
        let fixture = Fixture::new();
        let empty_bin = TempDir::new().unwrap();
        let engine = ScriptEngine::stdout("cat \"$1\"");

        let err = align(&inputs(), empty_bin.path(), &engine, &fixture.options)
            .await
            .unwrap_err();
        assert!(matches!(err, AlignError::Configuration(_)));
        assert_eq!(fixture.working_dirs_left(), 0);
    }

    #[tokio::test]
    async fn test_missing_directory_is_configuration_error() {
        let fixture = Fixture::new();
        let err = align(
            &inputs(),
            Path::new("/definitely/not/here"),
            &Muscle::default(),
            &fixture.options,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AlignError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_rejects_bad_inputs_before_running() {
        let fixture = Fixture::new();
        let engine = ScriptEngine::stdout("cat \"$1\"");

        let err = fixture
            .align(&[SequenceRecord::new("only", "MK")], &engine)
            .await
            .unwrap_err();
        assert!(matches!(err, AlignError::TooFewRecords(1)));

        let duplicated = vec![
            SequenceRecord::new("same", "MK"),
            SequenceRecord::new("same", "ML"),
        ];
        let err = fixture.align(&duplicated, &engine).await.unwrap_err();
        assert!(matches!(err, AlignError::InvalidRecords(_)));
        assert_eq!(fixture.working_dirs_left(), 0);
    }

    #[tokio::test]
    async fn test_untrimmed_header_rejected_before_running() {
        let fixture = Fixture::new();
        let engine = ScriptEngine::stdout("cat \"$1\"");
        let records = vec![
            SequenceRecord::new("query", "MKTAIL"),
            SequenceRecord::new("ref ", "MKAIL"),
        ];

        let err = fixture.align(&records, &engine).await.unwrap_err();
        assert!(matches!(
            err,
            AlignError::InvalidRecords(ValidationError::UntrimmedHeader(ref h)) if h == "ref "
        ));
        assert_eq!(fixture.working_dirs_left(), 0);
    }

    #[tokio::test]
    async fn test_missing_header_names_header() {
        let fixture = Fixture::new();
        let engine = ScriptEngine::stdout(
            "printf '>query\\nMKTAIL\\n>renamed\\nMK-AIL\\n'; echo 'lost a header' >&2",
        );

        let err = fixture.align(&inputs(), &engine).await.unwrap_err();
        match err {
            AlignError::MissingHeader {
                header,
                diagnostics,
            } => {
                assert_eq!(header, "ref");
                assert_eq!(diagnostics.as_deref(), Some(fixture.options.diagnostics_path.as_path()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(fixture.diagnostics().contains("lost a header"));
        assert_eq!(fixture.working_dirs_left(), 0);
    }

    #[tokio::test]
    async fn test_count_mismatch() {
        let fixture = Fixture::new();
        let engine = ScriptEngine::stdout("printf '>query\\nMKTAIL\\n'");

        let err = fixture.align(&inputs(), &engine).await.unwrap_err();
        assert!(matches!(
            err,
            AlignError::CountMismatch {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_aligned_length_mismatch() {
        let fixture = Fixture::new();
        let engine = ScriptEngine::stdout(
            "printf '>query\\nMKTAIL\\n>ref\\nMKAI\\n'; echo 'out of memory' >&2",
        );

        let err = fixture.align(&inputs(), &engine).await.unwrap_err();
        assert!(matches!(
            err,
            AlignError::AlignedLengthMismatch { ref header, length: 4, width: 6, .. } if header == "ref"
        ));
        assert!(fixture.diagnostics().contains("out of memory"));
    }

    #[tokio::test]
    async fn test_unaligned_too_long() {
        let fixture = Fixture::new();
        let engine = ScriptEngine::stdout("printf '>query\\nMKTA\\n>ref\\nMKAI\\n'");

        let err = fixture.align(&inputs(), &engine).await.unwrap_err();
        assert!(matches!(
            err,
            AlignError::UnalignedTooLong { ref header, length: 6, width: 4, .. } if header == "query"
        ));
    }

    #[tokio::test]
    async fn test_malformed_output_still_cleans_up() {
        let fixture = Fixture::new();
        let engine = ScriptEngine::stdout("echo 'not fasta'; echo 'parser food' >&2");

        let err = fixture.align(&inputs(), &engine).await.unwrap_err();
        assert!(matches!(err, AlignError::MalformedOutput { .. }));
        assert!(fixture.diagnostics().contains("parser food"));
        assert_eq!(fixture.working_dirs_left(), 0);
    }

    #[tokio::test]
    async fn test_engine_failure_still_cleans_up() {
        let fixture = Fixture::new();
        let engine = ScriptEngine::stdout("echo 'segfault' >&2; exit 3");

        let err = fixture.align(&inputs(), &engine).await.unwrap_err();
        assert!(matches!(err, AlignError::EngineFailed { .. }));
        assert!(fixture.diagnostics().contains("segfault"));
        assert_eq!(fixture.working_dirs_left(), 0);
    }

    #[tokio::test]
    async fn test_timeout_kills_engine_and_cleans_up() {
        let mut fixture = Fixture::new();
        fixture.options.timeout = Duration::from_millis(200);
        let engine = ScriptEngine::stdout("exec sleep 30");

        let started = Instant::now();
        let err = fixture.align(&inputs(), &engine).await.unwrap_err();
        assert!(matches!(err, AlignError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(fixture.working_dirs_left(), 0);
    }
}
