use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::catalog::{Area, Location};
use crate::content;
use crate::store::PageCandidate;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("select at least one area and one purpose before generating")]
    NothingSelected,
}

/// Tracks the operator's bulk-generation workflow: which cities, areas, and
/// purposes are selected, plus the area pool derived from the current city
/// selection.
///
/// Deselecting a city prunes any selected areas that belonged to it, so the
/// pending count never includes areas invisible in the UI.
///
/// Area fetches are asynchronous and can be superseded: every city toggle
/// bumps an epoch, and a fetched pool is applied only if it was started under
/// the current epoch. Stale responses are dropped without touching state.
#[derive(Debug, Default)]
pub struct SelectionState {
    selected_cities: BTreeSet<i64>,
    selected_areas: BTreeSet<i64>,
    selected_purposes: BTreeSet<String>,
    city_names: BTreeMap<i64, String>,
    pool: BTreeMap<i64, Area>,
    epoch: u64,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips a city's membership and returns the new epoch the caller must
    /// pass to `apply_pool` once its area fetch resolves.
    pub fn toggle_city(&mut self, city: &Location) -> u64 {
        if self.selected_cities.remove(&city.id) {
            self.city_names.remove(&city.id);
            let orphaned: Vec<i64> = self
                .pool
                .values()
                .filter(|area| area.location_id == city.id)
                .map(|area| area.id)
                .collect();
            for area_id in orphaned {
                self.pool.remove(&area_id);
                self.selected_areas.remove(&area_id);
            }
        } else {
            self.selected_cities.insert(city.id);
            self.city_names.insert(city.id, city.name.clone());
        }
        self.bump_epoch()
    }

    /// Replaces the derived area pool. Returns false (and changes nothing)
    /// when the fetch was started under a superseded epoch.
    pub fn apply_pool(&mut self, epoch: u64, areas: Vec<Area>) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.pool = areas.into_iter().map(|area| (area.id, area)).collect();
        self.selected_areas.retain(|id| self.pool.contains_key(id));
        true
    }

    /// Flips an area's membership. Ids outside the current pool are ignored.
    pub fn toggle_area(&mut self, id: i64) {
        if !self.pool.contains_key(&id) {
            return;
        }
        if !self.selected_areas.remove(&id) {
            self.selected_areas.insert(id);
        }
    }

    pub fn toggle_purpose(&mut self, purpose: &str) {
        if !self.selected_purposes.remove(purpose) {
            self.selected_purposes.insert(purpose.to_string());
        }
    }

    pub fn select_all_areas(&mut self) {
        self.selected_areas = self.pool.keys().copied().collect();
    }

    pub fn clear_areas(&mut self) {
        self.selected_areas.clear();
    }

    pub fn current_epoch(&self) -> u64 {
        self.epoch
    }

    fn bump_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    pub fn selected_cities(&self) -> &BTreeSet<i64> {
        &self.selected_cities
    }

    pub fn area_pool(&self) -> impl Iterator<Item = &Area> {
        self.pool.values()
    }

    /// Candidates that would be generated right now.
    pub fn pending_count(&self) -> usize {
        self.selected_areas.len() * self.selected_purposes.len()
    }

    /// The cartesian product of selected areas and purposes, composed into
    /// page candidates in (area id, purpose) order. Composition is pure, so
    /// planning twice over the same selection yields identical output.
    pub fn plan(&self) -> Result<Vec<PageCandidate>, SelectionError> {
        if self.selected_areas.is_empty() || self.selected_purposes.is_empty() {
            return Err(SelectionError::NothingSelected);
        }
        let mut candidates = Vec::with_capacity(self.pending_count());
        for area_id in &self.selected_areas {
            let Some(area) = self.pool.get(area_id) else {
                continue;
            };
            let city = self
                .city_names
                .get(&area.location_id)
                .cloned()
                .unwrap_or_default();
            for purpose in &self.selected_purposes {
                let content = content::compose(&area.name, &city, purpose);
                candidates.push(PageCandidate {
                    area_name: area.name.clone(),
                    city_name: city.clone(),
                    purpose: purpose.clone(),
                    slug: content.slug,
                    overview: content.overview,
                    benefits: content.benefits,
                    why_us: content.why_us,
                    is_active: true,
                });
            }
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pune() -> Location {
        Location {
            id: 1,
            name: "Pune".to_string(),
            slug: "pune".to_string(),
        }
    }

    fn mumbai() -> Location {
        Location {
            id: 2,
            name: "Mumbai".to_string(),
            slug: "mumbai".to_string(),
        }
    }

    fn area(id: i64, name: &str, location_id: i64) -> Area {
        Area {
            id,
            name: name.to_string(),
            location_id,
        }
    }

    fn pune_pool() -> Vec<Area> {
        vec![
            area(10, "Baner", 1),
            area(11, "Hinjewadi", 1),
            area(12, "Kharadi", 1),
        ]
    }

    #[test]
    fn pending_count_is_the_cartesian_product() {
        let mut state = SelectionState::new();
        let epoch = state.toggle_city(&pune());
        assert!(state.apply_pool(epoch, pune_pool()));
        state.toggle_area(10);
        state.toggle_area(11);
        state.toggle_area(12);
        state.toggle_purpose("GST Registration");
        state.toggle_purpose("Company Registration");
        assert_eq!(state.pending_count(), 6);
        assert_eq!(state.plan().unwrap().len(), 6);
    }

    #[test]
    fn plan_composes_slugs_and_content() {
        let mut state = SelectionState::new();
        let epoch = state.toggle_city(&pune());
        assert!(state.apply_pool(epoch, pune_pool()));
        state.toggle_area(10);
        state.toggle_purpose("GST Registration");
        let candidates = state.plan().unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].slug, "baner-gst-registration");
        assert_eq!(candidates[0].city_name, "Pune");
        assert_eq!(candidates[0].benefits.len(), 8);
    }

    #[test]
    fn empty_selection_is_a_local_error() {
        let mut state = SelectionState::new();
        assert_eq!(state.plan(), Err(SelectionError::NothingSelected));
        let epoch = state.toggle_city(&pune());
        assert!(state.apply_pool(epoch, pune_pool()));
        state.toggle_area(10);
        // areas without purposes still refuses
        assert_eq!(state.plan(), Err(SelectionError::NothingSelected));
    }

    #[test]
    fn deselecting_a_city_prunes_its_areas() {
        let mut state = SelectionState::new();
        state.toggle_city(&pune());
        let epoch = state.toggle_city(&mumbai());
        let mut pool = pune_pool();
        pool.push(area(20, "Andheri", 2));
        assert!(state.apply_pool(epoch, pool));
        state.toggle_area(10);
        state.toggle_area(20);
        state.toggle_purpose("GST Registration");
        assert_eq!(state.pending_count(), 2);

        state.toggle_city(&pune());
        assert_eq!(state.pending_count(), 1);
        let candidates = state.plan().unwrap();
        assert_eq!(candidates[0].area_name, "Andheri");
    }

    #[test]
    fn stale_pool_responses_are_dropped() {
        let mut state = SelectionState::new();
        let stale = state.toggle_city(&pune());
        let current = state.toggle_city(&mumbai());
        assert!(!state.apply_pool(stale, pune_pool()));
        assert_eq!(state.area_pool().count(), 0);
        assert!(state.apply_pool(current, vec![area(20, "Andheri", 2)]));
        assert_eq!(state.area_pool().count(), 1);
    }

    #[test]
    fn applying_a_pool_drops_vanished_selected_areas() {
        let mut state = SelectionState::new();
        let epoch = state.toggle_city(&pune());
        assert!(state.apply_pool(epoch, pune_pool()));
        state.toggle_area(10);
        assert!(state.apply_pool(epoch, vec![area(11, "Hinjewadi", 1)]));
        state.toggle_purpose("GST Registration");
        assert_eq!(state.pending_count(), 0);
    }

    #[test]
    fn select_all_and_clear_replace_the_set() {
        let mut state = SelectionState::new();
        let epoch = state.toggle_city(&pune());
        assert!(state.apply_pool(epoch, pune_pool()));
        state.select_all_areas();
        state.toggle_purpose("GST Registration");
        assert_eq!(state.pending_count(), 3);
        state.clear_areas();
        assert_eq!(state.pending_count(), 0);
    }

    #[test]
    fn unknown_area_ids_are_ignored() {
        let mut state = SelectionState::new();
        let epoch = state.toggle_city(&pune());
        assert!(state.apply_pool(epoch, pune_pool()));
        state.toggle_area(999);
        state.toggle_purpose("GST Registration");
        assert_eq!(state.pending_count(), 0);
    }
}
