/*
[INPUT]:  Operator filter and paging actions, fetched page lengths
[OUTPUT]: Current FilterState/PageState and the list query they imply
[POS]:    View-state machine - single source of truth for "which page, under which filter"
[UPDATE]: When adding a filter dimension or changing paging rules
*/

use std::fmt;
use std::str::FromStr;

use taskdeck_adapter::{KNOWN_TASK_TYPES, ListTasksRequest, ParseStatusError, TaskStatus};

/// Page sizes offered by keyboard cycling
pub const PAGE_SIZES: [u32; 3] = [10, 20, 50];

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    /// Status sent to the service; `None` lifts the constraint
    pub fn status(self) -> Option<TaskStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(status),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "ALL",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    /// ALL, then each status in taxonomy order, wrapping around
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(TaskStatus::ALL[0]),
            StatusFilter::Only(status) => {
                let index = TaskStatus::ALL
                    .iter()
                    .position(|candidate| *candidate == status)
                    .unwrap_or(0);
                match TaskStatus::ALL.get(index + 1) {
                    Some(next) => StatusFilter::Only(*next),
                    None => StatusFilter::All,
                }
            }
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatusFilter {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum TypeFilter {
    #[default]
    All,
    Only(String),
}

impl TypeFilter {
    pub fn task_type(&self) -> Option<&str> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Only(task_type) => Some(task_type.as_str()),
        }
    }

    pub fn label(&self) -> &str {
        self.task_type().unwrap_or("ALL")
    }

    /// ALL, then each known type; a custom type cycles back to ALL
    pub fn next(&self) -> Self {
        let position = match self {
            TypeFilter::All => None,
            TypeFilter::Only(current) => {
                match KNOWN_TASK_TYPES.iter().position(|known| *known == current.as_str()) {
                    Some(index) => Some(index),
                    None => return TypeFilter::All,
                }
            }
        };
        let next_index = position.map_or(0, |index| index + 1);
        match KNOWN_TASK_TYPES.get(next_index) {
            Some(next) => TypeFilter::Only((*next).to_string()),
            None => TypeFilter::All,
        }
    }
}

impl From<&str> for TypeFilter {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            TypeFilter::All
        } else {
            TypeFilter::Only(trimmed.to_string())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterState {
    pub status: StatusFilter,
    pub task_type: TypeFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// 1-based
    pub page: u32,
    pub page_size: u32,
    /// Whether the last applied fetch returned a full page
    pub has_more: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            has_more: false,
        }
    }
}

/// What a view-state operation changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    FiltersChanged,
    PageChanged,
    Unchanged,
}

impl Transition {
    pub fn requires_fetch(self) -> bool {
        !matches!(self, Transition::Unchanged)
    }
}

/// Snapshot of the view state that produced a list request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    pub filter: FilterState,
    pub page: u32,
    pub page_size: u32,
}

impl ListQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn to_request(&self) -> ListTasksRequest {
        ListTasksRequest::new(
            self.page_size,
            self.offset(),
            self.filter.status.status(),
            self.filter.task_type.task_type(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    filter: FilterState,
    page: PageState,
}

impl ViewState {
    pub fn new(page_size: u32) -> Self {
        Self {
            filter: FilterState::default(),
            page: PageState {
                page_size: page_size.max(1),
                ..PageState::default()
            },
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn page(&self) -> PageState {
        self.page
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            filter: self.filter.clone(),
            page: self.page.page,
            page_size: self.page.page_size,
        }
    }

    /// Always resets to page 1, even when the filter is unchanged.
    pub fn set_status_filter(&mut self, status: StatusFilter) -> Transition {
        self.filter.status = status;
        self.page.page = 1;
        Transition::FiltersChanged
    }

    pub fn set_type_filter(&mut self, task_type: TypeFilter) -> Transition {
        self.filter.task_type = task_type;
        self.page.page = 1;
        Transition::FiltersChanged
    }

    /// A size of zero is clamped to one.
    pub fn set_page_size(&mut self, page_size: u32) -> Transition {
        self.page.page_size = page_size.max(1);
        self.page.page = 1;
        Transition::FiltersChanged
    }

    pub fn cycle_status_filter(&mut self) -> Transition {
        let next = self.filter.status.next();
        self.set_status_filter(next)
    }

    pub fn cycle_type_filter(&mut self) -> Transition {
        let next = self.filter.task_type.next();
        self.set_type_filter(next)
    }

    pub fn cycle_page_size(&mut self) -> Transition {
        let next = PAGE_SIZES
            .iter()
            .copied()
            .find(|size| *size > self.page.page_size)
            .unwrap_or(PAGE_SIZES[0]);
        self.set_page_size(next)
    }

    pub fn next_page(&mut self) -> Transition {
        if !self.page.has_more {
            return Transition::Unchanged;
        }
        self.page.page += 1;
        Transition::PageChanged
    }

    pub fn previous_page(&mut self) -> Transition {
        if self.page.page <= 1 {
            return Transition::Unchanged;
        }
        self.page.page -= 1;
        Transition::PageChanged
    }

    /// Record the length of an applied page; a full page means more may follow.
    pub fn record_fetch(&mut self, query: &ListQuery, returned: usize) {
        self.page.has_more = returned == query.page_size as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_on_page(page: u32) -> ViewState {
        let mut view = ViewState::new(10);
        for _ in 1..page {
            let query = view.query();
            view.record_fetch(&query, 10);
            view.next_page();
        }
        view
    }

    #[test]
    fn test_defaults() {
        let view = ViewState::new(DEFAULT_PAGE_SIZE);
        assert_eq!(view.filter().status, StatusFilter::All);
        assert_eq!(view.filter().task_type, TypeFilter::All);
        assert_eq!(view.page().page, 1);
        assert_eq!(view.page().page_size, 10);
        assert!(!view.page().has_more);
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let mut view = view_on_page(4);
        assert_eq!(view.page().page, 4);

        assert_eq!(
            view.set_status_filter(StatusFilter::Only(TaskStatus::Failed)),
            Transition::FiltersChanged
        );
        assert_eq!(view.page().page, 1);

        let mut view = view_on_page(3);
        view.set_type_filter(TypeFilter::from("send_email"));
        assert_eq!(view.page().page, 1);

        let mut view = view_on_page(2);
        view.set_page_size(50);
        assert_eq!(view.page().page, 1);
        assert_eq!(view.page().page_size, 50);
    }

    #[test]
    fn test_same_filter_still_signals_change() {
        let mut view = view_on_page(2);
        assert_eq!(view.set_status_filter(StatusFilter::All), Transition::FiltersChanged);
        assert_eq!(view.page().page, 1);
    }

    #[test]
    fn test_next_page_requires_has_more() {
        let mut view = ViewState::new(10);
        assert_eq!(view.next_page(), Transition::Unchanged);
        assert_eq!(view.page().page, 1);

        let query = view.query();
        view.record_fetch(&query, 10);
        assert_eq!(view.next_page(), Transition::PageChanged);
        assert_eq!(view.page().page, 2);
        assert_eq!(view.query().offset(), 10);

        let query = view.query();
        view.record_fetch(&query, 3);
        assert_eq!(view.next_page(), Transition::Unchanged);
        assert_eq!(view.page().page, 2);
    }

    #[test]
    fn test_previous_page_clamps_at_one() {
        let mut view = ViewState::new(10);
        assert_eq!(view.previous_page(), Transition::Unchanged);
        assert_eq!(view.page().page, 1);

        let mut view = view_on_page(3);
        assert_eq!(view.previous_page(), Transition::PageChanged);
        assert_eq!(view.page().page, 2);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let mut view = ViewState::new(0);
        assert_eq!(view.page().page_size, 1);
        view.set_page_size(0);
        assert_eq!(view.page().page_size, 1);
    }

    #[test]
    fn test_cycle_helpers() {
        let mut view = ViewState::new(10);
        view.cycle_page_size();
        assert_eq!(view.page().page_size, 20);
        view.cycle_page_size();
        view.cycle_page_size();
        assert_eq!(view.page().page_size, 10);

        let mut seen = Vec::new();
        for _ in 0..6 {
            view.cycle_status_filter();
            seen.push(view.filter().status.label());
        }
        assert_eq!(
            seen,
            vec!["QUEUED", "RUNNING", "FAILED", "SUCCEEDED", "UNKNOWN", "ALL"]
        );

        view.cycle_type_filter();
        assert_eq!(view.filter().task_type.label(), "run_query");
        view.cycle_type_filter();
        assert_eq!(view.filter().task_type.label(), "send_email");
        view.cycle_type_filter();
        assert_eq!(view.filter().task_type, TypeFilter::All);
    }

    #[test]
    fn test_query_translates_to_request() {
        let mut view = ViewState::new(20);
        view.set_status_filter(StatusFilter::Only(TaskStatus::Running));
        view.set_type_filter(TypeFilter::from("run_query"));
        let request = view.query().to_request();
        assert_eq!(request.limit, 20);
        assert_eq!(request.offset, 0);
        assert_eq!(request.status, 1);
        assert_eq!(request.task_type.as_deref(), Some("run_query"));

        view.set_status_filter(StatusFilter::All);
        assert_eq!(view.query().to_request().status, 5);
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "succeeded".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(TaskStatus::Succeeded))
        );
        assert!("done".parse::<StatusFilter>().is_err());
    }
}
