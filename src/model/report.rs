use serde::Serialize;
use std::path::PathBuf;

/// What happened to one input document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Injected {
        output: PathBuf,
        buildings: usize,
        added: usize,
        skipped: usize,
    },
    TemplateWritten {
        template: PathBuf,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Per-file outcomes of an injection batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    #[must_use]
    pub fn new(input_folder: PathBuf, output_folder: PathBuf) -> Self {
        Self {
            input_folder,
            output_folder,
            files: Vec::new(),
        }
    }

    pub fn record(&mut self, path: PathBuf, outcome: FileOutcome) {
        self.files.push(FileReport { path, outcome });
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Failed { .. }))
            .count()
    }
}
