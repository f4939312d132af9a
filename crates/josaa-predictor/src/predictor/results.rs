use super::domain::AllotmentRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

/// Rows without a readable closing rank go last in either direction.
fn compare_closing_rank(
    a: &AllotmentRecord,
    b: &AllotmentRecord,
    direction: SortDirection,
) -> Ordering {
    match (a.closing_rank.value, b.closing_rank.value) {
        (Some(x), Some(y)) => match direction {
            SortDirection::Ascending => x.cmp(&y),
            SortDirection::Descending => y.cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by closing rank.
pub fn sort_by_closing_rank(
    mut rows: Vec<AllotmentRecord>,
    direction: SortDirection,
) -> Vec<AllotmentRecord> {
    rows.sort_by(|a, b| compare_closing_rank(a, b, direction));
    rows
}

/// Flip `current` and sort by the flipped direction.
pub fn toggle_sort(
    rows: Vec<AllotmentRecord>,
    current: SortDirection,
) -> (Vec<AllotmentRecord>, SortDirection) {
    let direction = current.toggled();
    (sort_by_closing_rank(rows, direction), direction)
}

/// Narrow rows to a single academic program; `None` or a blank selector keeps them all.
pub fn by_program<'a>(rows: &'a [AllotmentRecord], program: Option<&str>) -> Vec<&'a AllotmentRecord> {
    match program.filter(|selector| !selector.is_empty()) {
        Some(selector) => rows.iter().filter(|row| row.program == selector).collect(),
        None => rows.iter().collect(),
    }
}

/// Distinct program names, lexicographically ordered.
pub fn program_options(rows: &[AllotmentRecord]) -> Vec<String> {
    rows.iter()
        .map(|row| row.program.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Filtered rows of the latest submission together with their presentation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    rows: Vec<AllotmentRecord>,
    direction: SortDirection,
    program_filter: Option<String>,
}

impl ResultSet {
    pub fn new(rows: Vec<AllotmentRecord>) -> Self {
        Self {
            rows,
            direction: SortDirection::Ascending,
            program_filter: None,
        }
    }

    pub fn rows(&self) -> &[AllotmentRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn program_filter(&self) -> Option<&str> {
        self.program_filter.as_deref()
    }

    pub fn toggle_sort(&mut self) -> SortDirection {
        let rows = std::mem::take(&mut self.rows);
        let (rows, direction) = toggle_sort(rows, self.direction);
        self.rows = rows;
        self.direction = direction;
        direction
    }

    /// Sort explicitly, leaving the toggle state on `direction`.
    pub fn sort(&mut self, direction: SortDirection) {
        let rows = std::mem::take(&mut self.rows);
        self.rows = sort_by_closing_rank(rows, direction);
        self.direction = direction;
    }

    pub fn set_program_filter(&mut self, program: Option<String>) {
        self.program_filter = program.filter(|selector| !selector.is_empty());
    }

    pub fn program_options(&self) -> Vec<String> {
        program_options(&self.rows)
    }

    pub fn displayed(&self) -> Vec<&AllotmentRecord> {
        by_program(&self.rows, self.program_filter.as_deref())
    }
}
