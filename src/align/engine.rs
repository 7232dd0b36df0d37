//! External alignment engines.
//!
//! Each engine describes how it is located, what arguments it takes and where
//! it leaves its aligned records. The invoker stays agnostic of the details.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::align::AlignError;

/// Where an engine leaves its aligned records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOutput {
    /// Aligned records are the engine's standard output
    Stdout,
    /// Aligned records are written to the output path passed on the command line
    File,
}

/// A multiple sequence alignment program run as a child process
pub trait AlignmentEngine: Send + Sync + std::fmt::Debug {
    /// Human-readable engine name used in logs and errors
    fn name(&self) -> &str;

    /// File name of the executable inside the executable directory
    fn binary_name(&self) -> &str;

    /// Command-line arguments for aligning `input` into `output`
    fn arguments(&self, input: &Path, output: &Path) -> Vec<OsString>;

    fn output(&self) -> EngineOutput;

    /// Full path of the executable by convention: `<directory>/<binary_name>`
    fn executable(&self, directory: &Path) -> PathBuf {
        directory.join(self.binary_name())
    }
}

/// PROBCONS: `probcons <input>`, alignment on stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct Probcons;

impl AlignmentEngine for Probcons {
    fn name(&self) -> &str {
        "PROBCONS"
    }

    fn binary_name(&self) -> &str {
        "probcons"
    }

    fn arguments(&self, input: &Path, _output: &Path) -> Vec<OsString> {
        vec![input.as_os_str().to_owned()]
    }

    fn output(&self) -> EngineOutput {
        EngineOutput::Stdout
    }
}

/// MUSCLE: `muscle [-gapopen <n>] -in <input> -out <output>`
#[derive(Debug, Clone, Copy, Default)]
pub struct Muscle {
    /// Gap-open penalty override; more negative values give fewer gaps
    pub gap_open: Option<i32>,
}

impl AlignmentEngine for Muscle {
    fn name(&self) -> &str {
        "MUSCLE"
    }

    fn binary_name(&self) -> &str {
        "muscle"
    }

    fn arguments(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args = Vec::with_capacity(6);
        if let Some(penalty) = self.gap_open {
            args.push("-gapopen".into());
            args.push(penalty.to_string().into());
        }
        args.push("-in".into());
        args.push(input.as_os_str().to_owned());
        args.push("-out".into());
        args.push(output.as_os_str().to_owned());
        args
    }

    fn output(&self) -> EngineOutput {
        EngineOutput::File
    }
}

/// Engine selection as exposed on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Most accurate; slow and memory-hungry for hundreds of sequences
    #[default]
    Probcons,
    /// Faster; supports a gap-open penalty override
    Muscle,
}

impl EngineKind {
    /// Build the engine for this selection.
    ///
    /// # Errors
    ///
    /// Returns `AlignError::Configuration` if a gap-open penalty is given for
    /// an engine that does not accept one.
    pub fn build(self, gap_open: Option<i32>) -> Result<Arc<dyn AlignmentEngine>, AlignError> {
        match (self, gap_open) {
            (Self::Probcons, None) => Ok(Arc::new(Probcons)),
            (Self::Probcons, Some(_)) => Err(AlignError::Configuration(
                "a gap-open penalty can only be set for MUSCLE".to_string(),
            )),
            (Self::Muscle, gap_open) => Ok(Arc::new(Muscle { gap_open })),
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Probcons => write!(f, "probcons"),
            Self::Muscle => write!(f, "muscle"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os_strings(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_probcons_arguments() {
        let args = Probcons.arguments(Path::new("/w/in.fasta"), Path::new("/w/out.fasta"));
        assert_eq!(args, vec![OsString::from("/w/in.fasta")]);
        assert_eq!(Probcons.output(), EngineOutput::Stdout);
        assert_eq!(
            Probcons.executable(Path::new("/opt/bin")),
            PathBuf::from("/opt/bin/probcons")
        );
    }

    #[test]
    fn test_muscle_arguments() {
        let muscle = Muscle::default();
        let args = muscle.arguments(Path::new("in.fa"), Path::new("out.fa"));
        assert_eq!(args, os_strings(&["-in", "in.fa", "-out", "out.fa"]));
        assert_eq!(muscle.output(), EngineOutput::File);
    }

    #[test]
    fn test_muscle_gap_open_arguments() {
        let muscle = Muscle {
            gap_open: Some(-100),
        };
        let args = muscle.arguments(Path::new("in.fa"), Path::new("out.fa"));
        assert_eq!(
            args,
            os_strings(&["-gapopen", "-100", "-in", "in.fa", "-out", "out.fa"])
        );
    }

    #[test]
    fn test_engine_kind_build() {
        assert_eq!(EngineKind::Probcons.build(None).unwrap().name(), "PROBCONS");
        assert_eq!(
            EngineKind::Muscle.build(Some(-50)).unwrap().name(),
            "MUSCLE"
        );
        assert!(matches!(
            EngineKind::Probcons.build(Some(-50)),
            Err(AlignError::Configuration(_))
        ));
    }
}
