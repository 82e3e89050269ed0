use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use unicode_width::UnicodeWidthStr;

use crate::{PodPhase, PodRecord};

/// Table column headers, in display order
pub const COLUMNS: [&str; 6] = ["NAME", "NAMESPACE", "STATUS", "RESTARTS", "READY", "AGE"];

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const YEAR: i64 = 365 * DAY;

/// Column the pod table is ordered by
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Namespace,
    Status,
    Restarts,
    Age,
}

impl SortKey {
    /// Cycle to the next sort column
    pub fn next(&self) -> Self {
        match self {
            Self::Name => Self::Namespace,
            Self::Namespace => Self::Status,
            Self::Status => Self::Restarts,
            Self::Restarts => Self::Age,
            Self::Age => Self::Name,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::Namespace => "NAMESPACE",
            Self::Status => "STATUS",
            Self::Restarts => "RESTARTS",
            Self::Age => "AGE",
        }
    }

    /// Index of the column this key sorts by
    pub fn column(&self) -> usize {
        match self {
            Self::Name => 0,
            Self::Namespace => 1,
            Self::Status => 2,
            Self::Restarts => 3,
            Self::Age => 5,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "namespace" => Ok(Self::Namespace),
            "status" => Ok(Self::Status),
            "restarts" => Ok(Self::Restarts),
            "age" => Ok(Self::Age),
            other => Err(format!(
                "unknown sort key '{}' (expected name, namespace, status, restarts or age)",
                other
            )),
        }
    }
}

/// Display projection of one pod
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub name: String,
    pub namespace: String,
    pub status: PodPhase,
    pub restarts: u64,
    pub ready: usize,
    pub total: usize,
    pub age: String,
    /// Kept for ordering by age; never displayed
    pub started_at: Option<DateTime<Utc>>,
}

impl TableRow {
    /// Project a pod into a row, measuring age against `now`
    pub fn project(pod: &PodRecord, now: DateTime<Utc>) -> Self {
        let age = match pod.start_time {
            Some(start) => format_age((now - start).num_seconds()),
            None => "-".to_string(),
        };

        Self {
            name: pod.name.clone(),
            namespace: pod.namespace.clone(),
            status: pod.phase,
            restarts: pod.restart_count(),
            ready: pod.ready_count(),
            total: pod.containers.len(),
            age,
            started_at: pod.start_time,
        }
    }

    /// Format ready status as "ready/total"
    pub fn ready_status(&self) -> String {
        format!("{}/{}", self.ready, self.total)
    }

    /// Cell texts in `COLUMNS` order
    pub fn cells(&self) -> [String; 6] {
        [
            self.name.clone(),
            self.namespace.clone(),
            self.status.as_str().to_string(),
            self.restarts.to_string(),
            self.ready_status(),
            self.age.clone(),
        ]
    }
}

/// Format an elapsed duration using only its largest non-zero unit
pub fn format_age(seconds: i64) -> String {
    let seconds = seconds.max(0);

    if seconds >= YEAR {
        return format!("{}y", seconds / YEAR);
    }

    if seconds >= DAY {
        return format!("{}d", seconds / DAY);
    }

    if seconds >= HOUR {
        return format!("{}h", seconds / HOUR);
    }

    if seconds >= MINUTE {
        return format!("{}m", seconds / MINUTE);
    }

    format!("{seconds}s")
}

/// Order rows by `key`, ties broken by namespace then name
pub fn sort_rows(rows: &mut [TableRow], key: SortKey, descending: bool) {
    rows.sort_by(|a, b| {
        let primary = match key {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Namespace => a.namespace.cmp(&b.namespace),
            SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
            SortKey::Restarts => a.restarts.cmp(&b.restarts),
            // Youngest first; pods that never started sort last
            SortKey::Age => match (a.started_at, b.started_at) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };
        let primary = if descending {
            primary.reverse()
        } else {
            primary
        };
        primary
            .then_with(|| a.namespace.cmp(&b.namespace))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Render rows as a plain, space-aligned table with a header line
pub fn render_plain(rows: &[TableRow]) -> String {
    let cells: Vec<[String; 6]> = rows.iter().map(TableRow::cells).collect();

    let mut widths = COLUMNS.map(|c| c.width());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = String::new();
    let header = COLUMNS.map(String::from);
    for line in std::iter::once(&header).chain(cells.iter()) {
        let mut text = String::new();
        for (i, cell) in line.iter().enumerate() {
            if i + 1 == line.len() {
                text.push_str(cell);
            } else {
                text.push_str(cell);
                let pad = widths[i] - cell.width() + 3;
                text.extend(std::iter::repeat_n(' ', pad));
            }
        }
        out.push_str(text.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContainerInfo;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn container(restarts: u32, ready: bool) -> ContainerInfo {
        let mut c = ContainerInfo::new("c".to_string());
        c.restart_count = restarts;
        c.ready = ready;
        c
    }

    fn pod(name: &str, containers: Vec<ContainerInfo>, age: Option<Duration>) -> PodRecord {
        PodRecord {
            name: name.to_string(),
            namespace: "default".to_string(),
            phase: PodPhase::Running,
            start_time: age.map(|a| now() - a),
            containers,
        }
    }

    fn row(name: &str, restarts: u64, age: Option<Duration>) -> TableRow {
        let mut r = TableRow::project(&pod(name, vec![], age), now());
        r.restarts = restarts;
        r
    }

    #[test]
    fn two_ready_containers_with_restarts() {
        let p = pod(
            "web",
            vec![container(1, true), container(2, true)],
            Some(Duration::seconds(30)),
        );
        let r = TableRow::project(&p, now());
        assert_eq!(r.restarts, 3);
        assert_eq!(r.ready_status(), "2/2");
        assert_eq!(r.cells()[3], "3");
        assert_eq!(r.cells()[4], "2/2");
    }

    #[test]
    fn restarts_sum_exactly() {
        let counts = [0u32, 7, 13, 1, 0, 42];
        let p = pod(
            "p",
            counts.iter().map(|&n| container(n, false)).collect(),
            None,
        );
        let r = TableRow::project(&p, now());
        assert_eq!(r.restarts, counts.iter().map(|&n| u64::from(n)).sum::<u64>());
    }

    #[test]
    fn no_containers_reads_zero() {
        let r = TableRow::project(&pod("p", vec![], None), now());
        assert_eq!(r.restarts, 0);
        assert_eq!(r.ready_status(), "0/0");
        assert_eq!(r.age, "-");
    }

    #[test]
    fn ready_counts_only_ready_containers() {
        let p = pod(
            "p",
            vec![container(0, true), container(0, false), container(0, true)],
            None,
        );
        let r = TableRow::project(&p, now());
        assert_eq!(r.ready_status(), "2/3");
        assert!(r.ready <= r.total);
    }

    #[test]
    fn age_uses_largest_unit_only() {
        assert_eq!(format_age(0), "0s");
        assert_eq!(format_age(59), "59s");
        assert_eq!(format_age(61), "1m");
        assert_eq!(format_age(3599), "59m");
        assert_eq!(format_age(3600), "1h");
        assert_eq!(format_age(DAY + 5 * HOUR), "1d");
        assert_eq!(format_age(364 * DAY), "364d");
        assert_eq!(format_age(2 * YEAR + 100 * DAY), "2y");
    }

    #[test]
    fn negative_age_clamps_to_zero() {
        assert_eq!(format_age(-30), "0s");
    }

    #[test]
    fn four_hundred_days_is_one_year() {
        let r = TableRow::project(&pod("old", vec![], Some(Duration::days(400))), now());
        assert_eq!(r.age, "1y");
    }

    #[test]
    fn projection_is_stable_for_fixed_instant() {
        let p = pod("p", vec![container(1, true)], Some(Duration::seconds(4000)));
        assert_eq!(TableRow::project(&p, now()), TableRow::project(&p, now()));
    }

    #[test]
    fn sorts_by_name_ascending_and_descending() {
        let mut rows = vec![row("b", 0, None), row("a", 0, None), row("c", 0, None)];
        sort_rows(&mut rows, SortKey::Name, false);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);

        sort_rows(&mut rows, SortKey::Name, true);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["c", "b", "a"]);
    }

    #[test]
    fn sorts_by_age_youngest_first_unstarted_last() {
        let mut rows = vec![
            row("old", 0, Some(Duration::days(3))),
            row("pending", 0, None),
            row("new", 0, Some(Duration::minutes(2))),
        ];
        sort_rows(&mut rows, SortKey::Age, false);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["new", "old", "pending"]);
    }

    #[test]
    fn sorts_by_restarts() {
        let mut rows = vec![row("a", 5, None), row("b", 1, None), row("c", 3, None)];
        sort_rows(&mut rows, SortKey::Restarts, true);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "c", "b"]);
    }

    #[test]
    fn sort_key_parses_and_cycles() {
        assert_eq!("Age".parse::<SortKey>(), Ok(SortKey::Age));
        assert!("uptime".parse::<SortKey>().is_err());

        let mut key = SortKey::Name;
        for _ in 0..5 {
            key = key.next();
        }
        assert_eq!(key, SortKey::Name);
    }

    #[test]
    fn plain_table_aligns_columns() {
        let p = pod(
            "web-1",
            vec![container(1, true), container(2, true)],
            Some(Duration::hours(5)),
        );
        let out = render_plain(&[TableRow::project(&p, now())]);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "NAME    NAMESPACE   STATUS    RESTARTS   READY   AGE");
        assert_eq!(lines[1], "web-1   default     Running   3          2/2     5h");
        // Printed as is, so exactly one trailing newline
        assert!(out.ends_with("5h\n"));
    }
}
