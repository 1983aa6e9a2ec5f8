use crate::models::{GenreId, SortSpec};

/// Selected genres, in the order they were picked. Each id appears once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreSelection {
    ids: Vec<GenreId>,
}

impl GenreSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: GenreId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> &[GenreId] {
        &self.ids
    }

    /// Adds `id` if absent, removes it if present
    pub fn toggle(&mut self, id: GenreId) {
        if let Some(pos) = self.ids.iter().position(|g| *g == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// `with_genres` value, or `None` when nothing is selected
    pub fn to_param(&self) -> Option<String> {
        if self.ids.is_empty() {
            return None;
        }
        Some(
            self.ids
                .iter()
                .map(GenreId::to_string)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

impl FromIterator<GenreId> for GenreSelection {
    fn from_iter<T: IntoIterator<Item = GenreId>>(iter: T) -> Self {
        let mut selection = Self::new();
        for id in iter {
            if !selection.contains(id) {
                selection.ids.push(id);
            }
        }
        selection
    }
}

/// Active sort order and genre filter.
///
/// Every mutation returns whether the state actually changed. The
/// orchestrator resets the page cursor on any mutation regardless.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    sort: SortSpec,
    genres: GenreSelection,
}

impl FilterState {
    pub fn new(sort: SortSpec) -> Self {
        Self {
            sort,
            genres: GenreSelection::new(),
        }
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn genres(&self) -> &GenreSelection {
        &self.genres
    }

    pub fn set_sort(&mut self, spec: SortSpec) -> bool {
        let changed = self.sort != spec;
        self.sort = spec;
        changed
    }

    pub fn toggle_genre(&mut self, id: GenreId) -> bool {
        self.genres.toggle(id);
        true
    }

    pub fn clear_genres(&mut self) -> bool {
        let changed = !self.genres.is_empty();
        self.genres.clear();
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortDirection, SortField};

    #[test]
    fn test_toggle_is_symmetric() {
        let mut selection = GenreSelection::new();
        selection.toggle(28);
        selection.toggle(12);
        assert_eq!(selection.ids(), &[28, 12]);

        selection.toggle(28);
        assert_eq!(selection.ids(), &[12]);
        assert!(!selection.contains(28));
    }

    #[test]
    fn test_param_keeps_selection_order() {
        let selection: GenreSelection = [35, 18, 35, 10749].into_iter().collect();
        assert_eq!(selection.len(), 3);
        assert_eq!(selection.to_param(), Some("35,18,10749".to_string()));
        assert_eq!(GenreSelection::new().to_param(), None);
    }

    #[test]
    fn test_filter_state_mutations() {
        let mut filters = FilterState::default();
        assert_eq!(filters.sort(), SortSpec::default());

        assert!(filters.set_sort(SortSpec::new(SortField::Revenue, SortDirection::Asc)));
        assert!(!filters.set_sort(SortSpec::new(SortField::Revenue, SortDirection::Asc)));

        assert!(filters.toggle_genre(28));
        assert!(filters.genres().contains(28));
        assert!(filters.clear_genres());
        assert!(!filters.clear_genres());
        assert!(filters.genres().is_empty());
    }
}
