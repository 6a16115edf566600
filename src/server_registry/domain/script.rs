//! Recognized launch script file names and their priority.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Launch script recognized inside a server directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchScriptKind {
    /// `start.bat`.
    Start,
    /// `run.bat`.
    Run,
}

impl LaunchScriptKind {
    /// Script kinds in the order they are checked. A later entry overrides an
    /// earlier one when both files are present.
    pub const PRIORITY: [Self; 2] = [Self::Start, Self::Run];

    /// Returns the file name of the script.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Start => "start.bat",
            Self::Run => "run.bat",
        }
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Run => "run",
        }
    }

    /// Picks the launch script from the files present in a server directory.
    ///
    /// Returns `None` when no recognized script is present. When several are
    /// present the last one in [`Self::PRIORITY`] wins, so `run.bat` takes
    /// precedence over `start.bat`.
    #[must_use]
    pub fn detect<'a>(file_names: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let present: Vec<&str> = file_names.into_iter().collect();
        Self::PRIORITY
            .into_iter()
            .filter(|kind| present.contains(&kind.file_name()))
            .last()
    }
}

impl fmt::Display for LaunchScriptKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["start.bat"], Some(LaunchScriptKind::Start))]
    #[case(&["run.bat"], Some(LaunchScriptKind::Run))]
    #[case(&["start.bat", "run.bat"], Some(LaunchScriptKind::Run))]
    #[case(&["run.bat", "start.bat"], Some(LaunchScriptKind::Run))]
    #[case(&["server.jar", "eula.txt"], None)]
    #[case(&["START.BAT", "run.sh"], None)]
    #[case(&[], None)]
    fn detect_follows_priority(
        #[case] files: &[&str],
        #[case] expected: Option<LaunchScriptKind>,
    ) {
        assert_eq!(LaunchScriptKind::detect(files.iter().copied()), expected);
    }
}
