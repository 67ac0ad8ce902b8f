//! List State Machine
//!
//! Owns the applied filters, sort order, accumulated pages, soft-deleted
//! ids, search text, and detail selection. Fetches are started by the
//! transition methods and finished by [`ListState::resolve_fetch`]; every
//! fetch carries a generation tag so a response for a superseded
//! filter/page is dropped instead of overwriting fresher state.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use super::snapshot::{FilterChip, ListSnapshot};
use crate::domain::{Character, CharacterClass, DomainResult, FilterField, ServerFilter, SortOrder};
use crate::remote::CharacterPage;

/// Load phase of the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LoadPhase {
    /// No fetch outstanding
    Idle,
    /// Refetching page 1 after a filter change; accumulated rows were
    /// discarded, so nothing inconsistent with the new filter is shown
    Refetching,
    /// Fetching the next page; current rows stay visible
    LoadingMore,
    /// The last fetch failed; accumulated rows are retained
    Failed(String),
}

/// How a resolved page merges into the accumulated results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    Replace,
    Append,
}

/// Tag carried by every outstanding fetch.
///
/// Stale responses are detected by comparing `generation` against the
/// state at resolution time, not by cancelling the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSpec {
    pub generation: u64,
    pub page: u32,
    pub filter: ServerFilter,
    pub mode: MergeMode,
}

/// Client-side list state machine
#[derive(Debug)]
pub struct ListState {
    filter: ServerFilter,
    class: CharacterClass,
    search: String,
    sort: SortOrder,
    page: u32,
    results: Vec<Character>,
    has_next: bool,
    soft_deleted: HashSet<String>,
    selected: Option<String>,
    phase: LoadPhase,
    generation: u64,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            filter: ServerFilter::default(),
            class: CharacterClass::All,
            search: String::new(),
            sort: SortOrder::Asc,
            page: 1,
            results: Vec::new(),
            has_next: false,
            soft_deleted: HashSet::new(),
            selected: None,
            phase: LoadPhase::Idle,
            generation: 0,
        }
    }
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &ServerFilter {
        &self.filter
    }

    pub fn class(&self) -> CharacterClass {
        self.class
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    // ========================
    // Fetch-starting transitions
    // ========================

    /// Apply a server-side filter and class filter.
    ///
    /// Clears the search text, resets to page 1, and discards the
    /// accumulated pages: stale rows must never be shown merged with a
    /// new filter's results.
    pub fn apply_filter(&mut self, filter: ServerFilter, class: CharacterClass) -> FetchSpec {
        log::debug!("applying filter {:?}, class {:?}", filter, class);
        self.search.clear();
        self.filter = filter;
        self.class = class;
        self.reset_accumulation();
        self.begin_fetch(MergeMode::Replace)
    }

    /// Equivalent to applying the empty filter with class `all`
    pub fn clear_filters(&mut self) -> FetchSpec {
        self.apply_filter(ServerFilter::default(), CharacterClass::All)
    }

    /// Drop one server-side filter key and refetch page 1.
    ///
    /// Other keys, the class filter, and the search text are preserved.
    pub fn remove_filter_field(&mut self, field: FilterField) -> FetchSpec {
        self.filter.remove(field);
        self.reset_accumulation();
        self.begin_fetch(MergeMode::Replace)
    }

    /// Return the class filter to `all` and refetch page 1
    pub fn reset_class(&mut self) -> FetchSpec {
        self.class = CharacterClass::All;
        self.reset_accumulation();
        self.begin_fetch(MergeMode::Replace)
    }

    /// Start fetching the next page.
    ///
    /// Returns `None` when no further page exists, while a search is
    /// active (search operates on accumulated pages only and never
    /// fetches), or while another fetch is outstanding.
    pub fn load_more(&mut self) -> Option<FetchSpec> {
        if !self.has_next || !self.search.trim().is_empty() || self.is_loading() {
            return None;
        }
        self.page += 1;
        self.phase = LoadPhase::LoadingMore;
        Some(self.begin_fetch(MergeMode::Append))
    }

    fn reset_accumulation(&mut self) {
        self.page = 1;
        self.results.clear();
        self.has_next = false;
        self.phase = LoadPhase::Refetching;
    }

    fn begin_fetch(&mut self, mode: MergeMode) -> FetchSpec {
        self.generation += 1;
        FetchSpec {
            generation: self.generation,
            page: self.page,
            filter: self.filter.clone(),
            mode,
        }
    }

    fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::Refetching | LoadPhase::LoadingMore)
    }

    /// Resolve an outstanding fetch.
    ///
    /// A response tagged with a superseded generation is dropped.
    /// Failures keep whatever rows are accumulated; the error is not
    /// fatal and retrying is the caller's affordance.
    pub fn resolve_fetch(&mut self, spec: &FetchSpec, outcome: DomainResult<CharacterPage>) {
        if spec.generation != self.generation {
            log::debug!(
                "dropping stale response (generation {} != {})",
                spec.generation,
                self.generation
            );
            return;
        }

        match outcome {
            Ok(page) => {
                match spec.mode {
                    MergeMode::Replace => {
                        self.results = dedup_by_id(page.results);
                    }
                    MergeMode::Append => {
                        let mut merged = std::mem::take(&mut self.results);
                        merged.extend(page.results);
                        self.results = dedup_by_id(merged);
                    }
                }
                self.has_next = page.has_next;
                self.phase = LoadPhase::Idle;
            }
            Err(e) => {
                log::warn!("fetch for page {} failed: {}", spec.page, e);
                if spec.mode == MergeMode::Append {
                    // A retry must re-request the page that failed
                    self.page = spec.page - 1;
                }
                self.phase = LoadPhase::Failed(e.to_string());
            }
        }
    }

    // ========================
    // Local transitions
    // ========================

    /// Exclude `id` from every future derivation for this session.
    ///
    /// If `id` is the open detail item, the selection is cleared too.
    pub fn soft_delete(&mut self, id: &str) {
        self.soft_deleted.insert(id.to_string());
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
    }

    pub fn select(&mut self, id: Option<&str>) {
        self.selected = id.map(|s| s.to_string());
    }

    pub fn set_sort(&mut self, order: SortOrder) {
        self.sort = order;
    }

    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.toggled();
    }

    /// Client-side only: touches neither accumulated pages, the page
    /// counter, nor the network
    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    // ========================
    // Derivation
    // ========================

    /// Derive the render-ready view.
    ///
    /// A pure function of the state and the favorites set, recomputed
    /// identically every time: drop soft-deleted → class filter → name
    /// search → sort → partition.
    pub fn snapshot(&self, favorites: &BTreeSet<String>) -> ListSnapshot {
        let needle = self.search.trim().to_lowercase();

        let mut rows: Vec<&Character> = self
            .results
            .iter()
            .filter(|c| !self.soft_deleted.contains(&c.id))
            .filter(|c| match self.class {
                CharacterClass::All => true,
                CharacterClass::Starred => favorites.contains(&c.id),
                CharacterClass::Others => !favorites.contains(&c.id),
            })
            .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
            .collect();

        rows.sort_by(|a, b| match self.sort {
            SortOrder::Asc => a.name.cmp(&b.name),
            SortOrder::Desc => b.name.cmp(&a.name),
        });

        let (starred, others): (Vec<Character>, Vec<Character>) = rows
            .into_iter()
            .cloned()
            .partition(|c| favorites.contains(&c.id));

        ListSnapshot {
            phase: self.phase.clone(),
            show_starred: self.class != CharacterClass::Others,
            starred,
            others,
            can_load_more: self.has_next && self.search.trim().is_empty() && !self.is_loading(),
            chips: self.chips(),
        }
    }

    /// Active-filter chips in display order: class first, then fields
    fn chips(&self) -> Vec<FilterChip> {
        let mut chips = Vec::new();
        if self.class != CharacterClass::All {
            chips.push(FilterChip::Class(self.class));
        }
        if let Some(value) = &self.filter.status {
            chips.push(FilterChip::Field {
                field: FilterField::Status,
                value: value.clone(),
            });
        }
        if let Some(value) = &self.filter.species {
            chips.push(FilterChip::Field {
                field: FilterField::Species,
                value: value.clone(),
            });
        }
        if let Some(value) = &self.filter.gender {
            chips.push(FilterChip::Field {
                field: FilterField::Gender,
                value: value.clone(),
            });
        }
        chips
    }
}

/// Drop duplicate ids, keeping the first occurrence's position
fn dedup_by_id(results: Vec<Character>) -> Vec<Character> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter(|c| seen.insert(c.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, Gender, Place, Status};

    fn character(id: &str, name: &str, species: &str) -> Character {
        Character {
            id: id.to_string(),
            name: name.to_string(),
            status: Status::Alive,
            species: species.to_string(),
            type_: None,
            gender: Gender::Unknown,
            origin: Place::default(),
            location: Place::default(),
            image: String::new(),
        }
    }

    fn humans_page(has_next: bool) -> CharacterPage {
        CharacterPage {
            results: vec![
                character("1", "Rick", "Human"),
                character("2", "Morty", "Human"),
            ],
            has_next,
        }
    }

    fn favorites_of(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    /// Apply a filter and resolve it with the given page
    fn loaded_state(page: CharacterPage) -> ListState {
        let mut state = ListState::new();
        let spec = state.apply_filter(ServerFilter::default(), CharacterClass::All);
        state.resolve_fetch(&spec, Ok(page));
        state
    }

    #[test]
    fn test_sort_orders_by_name() {
        let mut state = loaded_state(humans_page(false));
        let none = BTreeSet::new();

        state.set_sort(SortOrder::Asc);
        let view = state.snapshot(&none);
        let names: Vec<&str> = view.others.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Morty", "Rick"]);

        state.set_sort(SortOrder::Desc);
        let view = state.snapshot(&none);
        let names: Vec<&str> = view.others.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Rick", "Morty"]);
    }

    #[test]
    fn test_starred_class_hides_non_favorites() {
        let mut state = loaded_state(humans_page(false));
        let favorites = favorites_of(&["1"]);

        let spec = state.apply_filter(ServerFilter::default(), CharacterClass::Starred);
        state.resolve_fetch(&spec, Ok(humans_page(false)));

        let view = state.snapshot(&favorites);
        assert_eq!(view.starred.len(), 1);
        assert_eq!(view.starred[0].id, "1");
        assert!(view.others.is_empty());
    }

    #[test]
    fn test_others_class_suppresses_starred_section() {
        let mut state = ListState::new();
        let spec = state.apply_filter(ServerFilter::default(), CharacterClass::Others);
        state.resolve_fetch(&spec, Ok(humans_page(false)));

        let view = state.snapshot(&favorites_of(&["1"]));
        assert!(!view.show_starred);
        assert!(view.starred.is_empty());
        assert_eq!(view.others.len(), 1);
        assert_eq!(view.others[0].id, "2");
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let state = loaded_state(humans_page(false));
        let favorites = favorites_of(&["2"]);

        let view = state.snapshot(&favorites);
        let mut all: Vec<&str> = view
            .starred
            .iter()
            .chain(view.others.iter())
            .map(|c| c.id.as_str())
            .collect();
        all.sort();
        assert_eq!(all, ["1", "2"]);
    }

    #[test]
    fn test_refetching_same_page_does_not_double_count() {
        let mut state = ListState::new();

        let spec = state.apply_filter(ServerFilter::default(), CharacterClass::All);
        state.resolve_fetch(&spec, Ok(humans_page(true)));
        // The same page arrives again via a load_more (simulating a
        // re-fetched page overlapping the accumulation)
        let spec = state.load_more().expect("load more");
        state.resolve_fetch(&spec, Ok(humans_page(false)));

        let view = state.snapshot(&BTreeSet::new());
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_load_more_appends_new_rows() {
        let mut state = ListState::new();
        let spec = state.apply_filter(ServerFilter::default(), CharacterClass::All);
        state.resolve_fetch(&spec, Ok(humans_page(true)));

        let spec = state.load_more().expect("load more");
        assert_eq!(spec.page, 2);
        state.resolve_fetch(
            &spec,
            Ok(CharacterPage {
                results: vec![character("3", "Summer", "Human")],
                has_next: false,
            }),
        );

        assert_eq!(state.page(), 2);
        assert!(!state.has_next());
        assert_eq!(state.snapshot(&BTreeSet::new()).len(), 3);
    }

    #[test]
    fn test_load_more_is_refused_while_searching() {
        let mut state = ListState::new();
        let spec = state.apply_filter(ServerFilter::default(), CharacterClass::All);
        state.resolve_fetch(&spec, Ok(humans_page(true)));

        state.set_search("rick");
        assert!(state.load_more().is_none());
        assert_eq!(state.page(), 1);
        assert!(!state.snapshot(&BTreeSet::new()).can_load_more);

        state.set_search("");
        assert!(state.load_more().is_some());
    }

    #[test]
    fn test_search_filters_by_name_case_insensitive() {
        let mut state = loaded_state(humans_page(false));

        state.set_search("RICK");
        let view = state.snapshot(&BTreeSet::new());
        assert_eq!(view.len(), 1);
        assert_eq!(view.others[0].name, "Rick");

        // Search never touches the accumulation
        state.set_search("");
        assert_eq!(state.snapshot(&BTreeSet::new()).len(), 2);
    }

    #[test]
    fn test_soft_delete_is_sticky() {
        let mut state = loaded_state(humans_page(false));
        state.soft_delete("1");

        assert!(state
            .snapshot(&BTreeSet::new())
            .others
            .iter()
            .all(|c| c.id != "1"));
        // Still excluded from the favorites partition
        assert!(state
            .snapshot(&favorites_of(&["1"]))
            .starred
            .is_empty());

        // And across later sort/search/filter changes in the session
        state.toggle_sort();
        state.set_search("r");
        assert!(state
            .snapshot(&BTreeSet::new())
            .others
            .iter()
            .all(|c| c.id != "1"));

        let spec = state.apply_filter(
            ServerFilter {
                species: Some("Human".to_string()),
                ..Default::default()
            },
            CharacterClass::All,
        );
        state.resolve_fetch(&spec, Ok(humans_page(false)));
        assert!(state
            .snapshot(&BTreeSet::new())
            .others
            .iter()
            .all(|c| c.id != "1"));
    }

    #[test]
    fn test_soft_delete_dismisses_open_detail() {
        let mut state = loaded_state(humans_page(false));
        state.select(Some("1"));
        state.soft_delete("1");
        assert!(state.selected().is_none());

        state.select(Some("2"));
        state.soft_delete("1");
        assert_eq!(state.selected(), Some("2"));
    }

    #[test]
    fn test_apply_filter_clears_search_and_resets_page() {
        let mut state = loaded_state(humans_page(true));
        state.set_search("mor");
        let spec = state.load_more();
        assert!(spec.is_none());

        let spec = state.apply_filter(
            ServerFilter {
                species: Some("Human".to_string()),
                ..Default::default()
            },
            CharacterClass::All,
        );
        assert_eq!(state.search(), "");
        assert_eq!(spec.page, 1);
        assert_eq!(state.phase(), &LoadPhase::Refetching);
        // Stale rows are already gone while the refetch is in flight
        assert!(state.snapshot(&BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_remove_filter_field_keeps_rest() {
        let mut state = ListState::new();
        let spec = state.apply_filter(
            ServerFilter {
                status: Some("Alive".to_string()),
                species: Some("Human".to_string()),
                ..Default::default()
            },
            CharacterClass::Starred,
        );
        state.resolve_fetch(&spec, Ok(humans_page(false)));
        state.set_search("rick");

        let spec = state.remove_filter_field(FilterField::Status);
        assert!(spec.filter.status.is_none());
        assert_eq!(spec.filter.species.as_deref(), Some("Human"));
        assert_eq!(state.class(), CharacterClass::Starred);
        assert_eq!(state.search(), "rick");
        assert_eq!(spec.page, 1);
    }

    #[test]
    fn test_reset_class_refetches_with_all() {
        let mut state = ListState::new();
        let spec = state.apply_filter(ServerFilter::default(), CharacterClass::Starred);
        state.resolve_fetch(&spec, Ok(humans_page(false)));

        let spec = state.reset_class();
        assert_eq!(state.class(), CharacterClass::All);
        assert_eq!(spec.page, 1);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut state = ListState::new();

        let old_spec = state.apply_filter(
            ServerFilter {
                species: Some("Alien".to_string()),
                ..Default::default()
            },
            CharacterClass::All,
        );
        let new_spec = state.apply_filter(
            ServerFilter {
                species: Some("Human".to_string()),
                ..Default::default()
            },
            CharacterClass::All,
        );

        // The superseded response arrives late and is ignored
        state.resolve_fetch(
            &old_spec,
            Ok(CharacterPage {
                results: vec![character("99", "Abadango Cluster Princess", "Alien")],
                has_next: false,
            }),
        );
        assert_eq!(state.phase(), &LoadPhase::Refetching);
        assert!(state.snapshot(&BTreeSet::new()).is_empty());

        state.resolve_fetch(&new_spec, Ok(humans_page(false)));
        assert_eq!(state.phase(), &LoadPhase::Idle);
        assert_eq!(state.snapshot(&BTreeSet::new()).len(), 2);
    }

    #[test]
    fn test_failed_load_more_keeps_accumulated_rows() {
        let mut state = ListState::new();
        let spec = state.apply_filter(ServerFilter::default(), CharacterClass::All);
        state.resolve_fetch(&spec, Ok(humans_page(true)));

        let spec = state.load_more().expect("load more");
        state.resolve_fetch(&spec, Err(DomainError::Remote("connection reset".to_string())));

        assert!(matches!(state.phase(), LoadPhase::Failed(_)));
        assert_eq!(state.snapshot(&BTreeSet::new()).len(), 2);
        // A retry re-requests the page that failed
        let retry = state.load_more().expect("retry");
        assert_eq!(retry.page, 2);
    }

    #[test]
    fn test_equal_names_sort_stably() {
        let mut state = ListState::new();
        let spec = state.apply_filter(ServerFilter::default(), CharacterClass::All);
        state.resolve_fetch(
            &spec,
            Ok(CharacterPage {
                results: vec![
                    character("10", "Rick", "Human"),
                    character("11", "Rick", "Clone"),
                ],
                has_next: false,
            }),
        );

        let view = state.snapshot(&BTreeSet::new());
        let ids: Vec<&str> = view.others.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["10", "11"]);
    }

    #[test]
    fn test_chips_reflect_applied_filters() {
        let mut state = ListState::new();
        state.apply_filter(
            ServerFilter {
                species: Some("Human".to_string()),
                ..Default::default()
            },
            CharacterClass::Starred,
        );

        let chips = state.snapshot(&BTreeSet::new()).chips;
        assert_eq!(
            chips,
            vec![
                FilterChip::Class(CharacterClass::Starred),
                FilterChip::Field {
                    field: FilterField::Species,
                    value: "Human".to_string()
                },
            ]
        );
    }
}
