use std::collections::BTreeMap;

use layers::{Colormap, RecolorOutput, recolor_cells, registry};
use prefs::PrefsStore;
use runtime::event_bus::{EVENT_DATA, EVENT_MODEL, EVENT_SELECTION};
use runtime::{EventBus, Frame};
use scene::{CellWorld, HexCell};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The requested key is not carried by any loaded cell.
    UnknownVariable(String),
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::UnknownVariable(key) => {
                write!(f, "unknown variable: {key}")
            }
        }
    }
}

impl std::error::Error for SelectionError {}

/// Dashboard state behind the UI: the loaded cells, the active variable and
/// colormap, and the model-run guard.
///
/// Preference persistence failures are tolerated everywhere; losing the saved
/// layer across reloads is not worth failing the interaction for.
#[derive(Debug, Default)]
pub struct Session {
    world: CellWorld,
    active_variable: Option<String>,
    colormap: Colormap,
    reversed: bool,
    run_in_flight: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn world(&self) -> &CellWorld {
        &self.world
    }

    pub fn active_variable(&self) -> Option<&str> {
        self.active_variable.as_deref()
    }

    pub fn available_variables(&self) -> Vec<String> {
        self.world.available_variables()
    }

    pub fn colormap(&self) -> Colormap {
        self.colormap
    }

    pub fn reversed(&self) -> bool {
        self.reversed
    }

    /// Replaces the dataset and restores the saved layer when it still
    /// exists, falling back to the first available variable.
    pub fn load_cells(
        &mut self,
        cells: Vec<HexCell>,
        prefs: &mut dyn PrefsStore,
        frame: Frame,
        bus: &mut EventBus,
    ) {
        self.world = CellWorld::from_cells(cells);
        self.restore_active_variable(prefs);
        bus.emit(frame, EVENT_DATA, format!("loaded {} cells", self.world.len()));
    }

    /// Switches the active layer. The key must exist in the loaded data.
    pub fn set_active_variable(
        &mut self,
        key: &str,
        prefs: &mut dyn PrefsStore,
        frame: Frame,
        bus: &mut EventBus,
    ) -> Result<(), SelectionError> {
        if !self.available_variables().iter().any(|k| k == key) {
            return Err(SelectionError::UnknownVariable(key.to_string()));
        }
        self.active_variable = Some(key.to_string());
        let _ = prefs.set_active_variable(key);
        bus.emit(frame, EVENT_SELECTION, key);
        Ok(())
    }

    pub fn set_colormap(&mut self, colormap: Colormap) {
        self.colormap = colormap;
    }

    /// Flips the colormap direction, returning the new state.
    pub fn toggle_reversed(&mut self) -> bool {
        self.reversed = !self.reversed;
        self.reversed
    }

    /// Paints and legend for the current selection; None when there is no
    /// active variable or no cell has data for it.
    pub fn recolor(&self) -> Option<RecolorOutput> {
        let active = self.active_variable.as_deref()?;
        recolor_cells(&self.world, active, self.colormap, self.reversed)
    }

    /// Tooltip line for a picked cell: label, value to four decimals, unit.
    ///
    /// None when the cell is unknown or has no value for the active variable,
    /// so the tooltip stays hidden over gaps.
    pub fn tooltip_text(&self, cell_index: i64) -> Option<String> {
        let active = self.active_variable.as_deref()?;
        let value = self.world.cell_by_index(cell_index)?.value(active)?;
        let unit = registry::unit_for(active);
        let label = registry::display_label(active);
        if unit.is_empty() {
            Some(format!("{label}: {value:.4}"))
        } else {
            Some(format!("{label}: {value:.4} {unit}"))
        }
    }

    /// Claims the single model-run slot. False means a run is already in
    /// flight and the new request must be dropped.
    pub fn begin_run(&mut self) -> bool {
        if self.run_in_flight {
            return false;
        }
        self.run_in_flight = true;
        true
    }

    /// Releases the run slot and records the outcome.
    pub fn finish_run(&mut self, outcome: &str, frame: Frame, bus: &mut EventBus) {
        self.run_in_flight = false;
        bus.emit(frame, EVENT_MODEL, outcome);
    }

    pub fn run_in_flight(&self) -> bool {
        self.run_in_flight
    }

    /// Applies fresh per-cell values from a model run, then re-resolves the
    /// active variable against the new keys.
    pub fn apply_run_updates(
        &mut self,
        updates: Vec<(i64, BTreeMap<String, f64>)>,
        prefs: &mut dyn PrefsStore,
        frame: Frame,
        bus: &mut EventBus,
    ) -> usize {
        let updated = self.world.replace_values(updates);
        self.restore_active_variable(prefs);
        bus.emit(frame, EVENT_DATA, format!("model updated {updated} cells"));
        updated
    }

    fn restore_active_variable(&mut self, prefs: &mut dyn PrefsStore) {
        let available = self.available_variables();
        let saved = prefs.active_variable().ok().flatten();
        self.active_variable = match saved {
            Some(key) if available.iter().any(|k| k == &key) => Some(key),
            _ => {
                let first = available.first().cloned();
                if let Some(key) = &first {
                    let _ = prefs.set_active_variable(key);
                }
                first
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectionError, Session};
    use layers::Colormap;
    use prefs::{InMemoryPrefs, PrefsStore};
    use pretty_assertions::assert_eq;
    use runtime::event_bus::{EVENT_DATA, EVENT_SELECTION};
    use runtime::{EventBus, Frame};
    use scene::HexCell;
    use std::collections::BTreeMap;

    fn cell(index: i64, entries: &[(&str, f64)]) -> HexCell {
        let mut values = BTreeMap::new();
        for (k, v) in entries {
            values.insert(k.to_string(), *v);
        }
        HexCell {
            index,
            ring: vec![[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]],
            values,
        }
    }

    fn loaded_session(prefs: &mut InMemoryPrefs) -> (Session, EventBus) {
        let mut session = Session::new();
        let mut bus = EventBus::new();
        session.load_cells(
            vec![
                cell(0, &[("eff", 0.2), ("temp", 14.0)]),
                cell(1, &[("eff", 0.5)]),
                cell(2, &[("eff", 0.8), ("temp", 18.0)]),
            ],
            prefs,
            Frame::first(),
            &mut bus,
        );
        (session, bus)
    }

    #[test]
    fn load_defaults_to_first_variable_and_persists_it() {
        let mut prefs = InMemoryPrefs::new();
        let (session, bus) = loaded_session(&mut prefs);
        assert_eq!(session.active_variable(), Some("eff"));
        assert_eq!(
            prefs.active_variable().expect("read"),
            Some("eff".to_string())
        );
        assert_eq!(bus.events()[0].kind, EVENT_DATA);
    }

    #[test]
    fn load_restores_saved_variable_when_present() {
        let mut prefs = InMemoryPrefs::new();
        prefs.set_active_variable("temp").expect("write");
        let (session, _) = loaded_session(&mut prefs);
        assert_eq!(session.active_variable(), Some("temp"));
    }

    #[test]
    fn load_ignores_saved_variable_missing_from_data() {
        let mut prefs = InMemoryPrefs::new();
        prefs.set_active_variable("salinity").expect("write");
        let (session, _) = loaded_session(&mut prefs);
        assert_eq!(session.active_variable(), Some("eff"));
    }

    #[test]
    fn selecting_unknown_variable_is_rejected() {
        let mut prefs = InMemoryPrefs::new();
        let (mut session, mut bus) = loaded_session(&mut prefs);
        let err = session
            .set_active_variable("dic", &mut prefs, Frame::first(), &mut bus)
            .unwrap_err();
        assert_eq!(err, SelectionError::UnknownVariable("dic".to_string()));
        assert_eq!(session.active_variable(), Some("eff"));
    }

    #[test]
    fn selecting_known_variable_persists_and_emits() {
        let mut prefs = InMemoryPrefs::new();
        let (mut session, mut bus) = loaded_session(&mut prefs);
        bus.drain();
        session
            .set_active_variable("temp", &mut prefs, Frame::first(), &mut bus)
            .expect("select");
        assert_eq!(session.active_variable(), Some("temp"));
        assert_eq!(
            prefs.active_variable().expect("read"),
            Some("temp".to_string())
        );
        let events = bus.drain();
        assert_eq!(events[0].kind, EVENT_SELECTION);
        assert_eq!(events[0].detail, "temp");
    }

    #[test]
    fn recolor_covers_loaded_cells() {
        let mut prefs = InMemoryPrefs::new();
        let (session, _) = loaded_session(&mut prefs);
        let out = session.recolor().expect("recolor");
        assert_eq!(out.paints.len(), 3);
        assert_eq!(out.scale.min, 0.2);
        assert_eq!(out.scale.max, 0.8);
    }

    #[test]
    fn tooltip_uses_four_decimals_and_unit() {
        let mut prefs = InMemoryPrefs::new();
        let (mut session, mut bus) = loaded_session(&mut prefs);
        let updates = vec![(1, BTreeMap::from([("eff".to_string(), 0.12345)]))];
        session.apply_run_updates(updates, &mut prefs, Frame::first(), &mut bus);
        assert_eq!(
            session.tooltip_text(1).expect("tooltip"),
            "Efficiency: 0.1235 (%)"
        );
        assert_eq!(session.tooltip_text(99), None);
    }

    #[test]
    fn run_guard_allows_one_run_at_a_time() {
        let mut session = Session::new();
        let mut bus = EventBus::new();
        assert!(session.begin_run());
        assert!(!session.begin_run());
        session.finish_run("ok", Frame::first(), &mut bus);
        assert!(session.begin_run());
    }

    #[test]
    fn model_updates_reconcile_by_index_and_refresh_variables() {
        let mut prefs = InMemoryPrefs::new();
        let (mut session, mut bus) = loaded_session(&mut prefs);

        // Model output drops temp and introduces net_cost.
        let updates = vec![
            (0, BTreeMap::from([("net_cost".to_string(), 120.0)])),
            (2, BTreeMap::from([("net_cost".to_string(), 80.0)])),
            (42, BTreeMap::from([("net_cost".to_string(), 1.0)])),
        ];
        let updated = session.apply_run_updates(updates, &mut prefs, Frame::first(), &mut bus);
        assert_eq!(updated, 2);

        // eff survives on cell 1 only, so it is still the saved selection.
        assert_eq!(session.active_variable(), Some("eff"));
        assert!(session.available_variables().contains(&"net_cost".to_string()));
    }

    #[test]
    fn colormap_state_round_trips() {
        let mut session = Session::new();
        session.set_colormap(Colormap::Cividis);
        assert_eq!(session.colormap(), Colormap::Cividis);
        assert!(session.toggle_reversed());
        assert!(!session.toggle_reversed());
    }
}
