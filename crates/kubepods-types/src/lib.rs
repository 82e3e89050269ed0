//! Shared types for kubepods
//!
//! This crate contains the pod record decoded from kubectl output, the table
//! row projected from it, and the small value types passed between crates.

mod pod;
mod row;

pub use pod::{DecodeError, PodRecord};
pub use row::{COLUMNS, SortKey, TableRow, format_age, render_plain, sort_rows};

use ratatui::style::Color;

// ============================================================================
// Kubernetes Resource Types
// ============================================================================

/// Kubernetes context information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextInfo {
    pub name: String,
    pub is_current: bool,
}

impl ContextInfo {
    pub fn new(name: String, is_current: bool) -> Self {
        Self { name, is_current }
    }
}

/// Pod lifecycle phase as reported in `status.phase`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl From<&str> for PodPhase {
    fn from(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Running" => Self::Running,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl PodPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }

    /// Get display color for this phase
    pub fn color(&self) -> Color {
        match self {
            Self::Pending => Color::Yellow,
            Self::Running => Color::Green,
            Self::Succeeded => Color::DarkGray,
            Self::Failed => Color::Red,
            Self::Unknown => Color::Magenta,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerInfo {
    pub name: String,
    pub ready: bool,
    pub restart_count: u32,
}

impl ContainerInfo {
    pub fn new(name: String) -> Self {
        Self {
            name,
            ready: false,
            restart_count: 0,
        }
    }
}

// ============================================================================
// Command Types
// ============================================================================

/// Flags for `kubectl delete pod`
///
/// Each flag is independent. The default deletes only the selected pod with
/// `--cascade=true`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Delete every pod in scope (`--all`) instead of a named one
    pub all: bool,
    /// Value of `--cascade=<bool>`
    pub cascade: bool,
    /// Skip the grace period (`--now`)
    pub now: bool,
    /// Force deletion (`--force`)
    pub force: bool,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            all: false,
            cascade: true,
            now: false,
            force: false,
        }
    }
}

impl DeleteOptions {
    /// Flag arguments in the order kubectl receives them
    pub fn flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if self.all {
            flags.push("--all".to_string());
        }
        flags.push(format!("--cascade={}", self.cascade));
        if self.now {
            flags.push("--now".to_string());
        }
        if self.force {
            flags.push("--force".to_string());
        }
        flags
    }
}

/// One entry of a directory listing inside a pod
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FsEntry {
    pub name: String,
    pub is_dir: bool,
}

impl FsEntry {
    /// Parse a line of `ls -1Ap` output, where directories carry a trailing `/`
    pub fn from_ls_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return None;
        }
        match line.strip_suffix('/') {
            Some(dir) => Some(Self {
                name: dir.to_string(),
                is_dir: true,
            }),
            None => Some(Self {
                name: line.to_string(),
                is_dir: false,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delete_flags_only_cascade() {
        assert_eq!(DeleteOptions::default().flags(), vec!["--cascade=true"]);
    }

    #[test]
    fn delete_flags_are_independent() {
        let opts = DeleteOptions {
            all: true,
            cascade: false,
            now: true,
            force: true,
        };
        assert_eq!(
            opts.flags(),
            vec!["--all", "--cascade=false", "--now", "--force"]
        );
    }

    #[test]
    fn unknown_phase_maps_to_unknown() {
        assert_eq!(PodPhase::from("Running"), PodPhase::Running);
        assert_eq!(PodPhase::from("Evicted"), PodPhase::Unknown);
    }

    #[test]
    fn ls_lines_split_dirs_and_files() {
        assert_eq!(
            FsEntry::from_ls_line("etc/"),
            Some(FsEntry {
                name: "etc".into(),
                is_dir: true
            })
        );
        assert_eq!(
            FsEntry::from_ls_line("hosts"),
            Some(FsEntry {
                name: "hosts".into(),
                is_dir: false
            })
        );
        assert_eq!(FsEntry::from_ls_line(""), None);
    }
}
