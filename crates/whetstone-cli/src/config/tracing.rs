use std::path::PathBuf;

#[derive(Debug, serde::Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TracingConfig {
    /// Whether to initialize a subscriber at all.
    pub enable: bool,

    /// Configuration for the stderr output.
    pub stderr: StderrConfig,

    /// Configuration for the log files output.
    pub files: FilesConfig,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enable: true,
            stderr: StderrConfig::default(),
            files: FilesConfig::default(),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct StderrConfig {
    /// Whether to emit traces to stderr.
    pub enable: bool,

    /// Whether to include ANSI escape codes for colors.
    pub ansi: bool,
}

impl Default for StderrConfig {
    fn default() -> Self {
        Self { enable: true, ansi: true }
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilesConfig {
    /// Whether to emit traces to log files.
    pub enable: bool,

    /// Path to the directory where the log files should be stored.
    #[serde(default = "default_files_directory")]
    pub directory: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            enable: false,
            directory: default_files_directory(),
        }
    }
}

fn default_files_directory() -> PathBuf {
    PathBuf::from("./logs")
}
