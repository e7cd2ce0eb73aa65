//! ProjectState - Customer, PV, Heat-Pump and Project Metadata Being Edited
//!
//! Every mutator marks the project as having unsaved changes; only a load
//! (`set_project_data`), a reset or an explicit `mark_saved` clears it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::domain::project::{
    CustomerData, HpDetails, ProjectData, ProjectDetails, ProjectType, PvDetails,
};
use crate::eventing::{AppEvent, EventSink};
use crate::utils::snapshot_store::{SnapshotStore, snapshot_key};

/// Partial update of [`CustomerData`]; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerPatch {
    pub customer_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

impl CustomerPatch {
    fn apply(self, target: &mut CustomerData) {
        if self.customer_id.is_some() {
            target.customer_id = self.customer_id;
        }
        if let Some(v) = self.first_name {
            target.first_name = v;
        }
        if let Some(v) = self.last_name {
            target.last_name = v;
        }
        if let Some(v) = self.email {
            target.email = v;
        }
        if self.phone.is_some() {
            target.phone = self.phone;
        }
        if self.address.is_some() {
            target.address = self.address;
        }
        if self.city.is_some() {
            target.city = self.city;
        }
        if self.postal_code.is_some() {
            target.postal_code = self.postal_code;
        }
    }
}

/// Partial update of [`PvDetails`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PvPatch {
    pub anlage_kwp: Option<f64>,
    pub annual_consumption_kwh: Option<f64>,
    pub storage_kwh: Option<f64>,
    pub roof_orientation: Option<String>,
    pub roof_tilt: Option<f64>,
    pub location: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lon: Option<f64>,
    pub module_type: Option<String>,
    pub inverter_type: Option<String>,
}

impl PvPatch {
    fn apply(self, target: &mut PvDetails) {
        if let Some(v) = self.anlage_kwp {
            target.anlage_kwp = v;
        }
        if let Some(v) = self.annual_consumption_kwh {
            target.annual_consumption_kwh = v;
        }
        if self.storage_kwh.is_some() {
            target.storage_kwh = self.storage_kwh;
        }
        if self.roof_orientation.is_some() {
            target.roof_orientation = self.roof_orientation;
        }
        if self.roof_tilt.is_some() {
            target.roof_tilt = self.roof_tilt;
        }
        if self.location.is_some() {
            target.location = self.location;
        }
        if self.location_lat.is_some() {
            target.location_lat = self.location_lat;
        }
        if self.location_lon.is_some() {
            target.location_lon = self.location_lon;
        }
        if self.module_type.is_some() {
            target.module_type = self.module_type;
        }
        if self.inverter_type.is_some() {
            target.inverter_type = self.inverter_type;
        }
    }
}

/// Partial update of [`HpDetails`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HpPatch {
    pub heat_demand_kwh: Option<f64>,
    pub hp_power_kw: Option<f64>,
    pub cop_value: Option<f64>,
    pub hp_type: Option<String>,
    pub installation_type: Option<String>,
    pub existing_heating: Option<String>,
}

impl HpPatch {
    fn apply(self, target: &mut HpDetails) {
        if let Some(v) = self.heat_demand_kwh {
            target.heat_demand_kwh = v;
        }
        if let Some(v) = self.hp_power_kw {
            target.hp_power_kw = v;
        }
        if self.cop_value.is_some() {
            target.cop_value = self.cop_value;
        }
        if self.hp_type.is_some() {
            target.hp_type = self.hp_type;
        }
        if self.installation_type.is_some() {
            target.installation_type = self.installation_type;
        }
        if self.existing_heating.is_some() {
            target.existing_heating = self.existing_heating;
        }
    }
}

/// Partial update of [`ProjectDetails`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectPatch {
    pub project_id: Option<i64>,
    pub project_name: Option<String>,
    pub project_type: Option<ProjectType>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub notes: Option<String>,
}

impl ProjectPatch {
    fn apply(self, target: &mut ProjectDetails) {
        if self.project_id.is_some() {
            target.project_id = self.project_id;
        }
        if let Some(v) = self.project_name {
            target.project_name = v;
        }
        if let Some(v) = self.project_type {
            target.project_type = v;
        }
        if self.status.is_some() {
            target.status = self.status;
        }
        if self.created_at.is_some() {
            target.created_at = self.created_at;
        }
        if self.notes.is_some() {
            target.notes = self.notes;
        }
    }
}

/// Persisted page snapshot, field names as stored on disk
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    customer_data: &'a CustomerData,
    pv_details: &'a PvDetails,
    hp_details: &'a HpDetails,
    project_details: &'a ProjectDetails,
}

/// Project/customer store
#[derive(Debug, Clone, Default)]
pub struct ProjectState {
    customer: CustomerData,
    pv: PvDetails,
    hp: HpDetails,
    project: ProjectDetails,
    project_data: Option<ProjectData>,
    has_unsaved_changes: bool,
    revision: u64,
    events: EventSink,
}

impl ProjectState {
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    pub fn customer_data(&self) -> &CustomerData {
        &self.customer
    }

    pub fn pv_details(&self) -> &PvDetails {
        &self.pv
    }

    pub fn hp_details(&self) -> &HpDetails {
        &self.hp
    }

    pub fn project_details(&self) -> &ProjectDetails {
        &self.project
    }

    /// Last aggregate loaded from the backend
    pub fn project_data(&self) -> Option<&ProjectData> {
        self.project_data.as_ref()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    /// Counter bumped by every content change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Aggregate for the backend, without the block the project type excludes
    pub fn current_project_data(&self) -> ProjectData {
        let project_type = self.project.project_type;
        ProjectData {
            customer_data: self.customer.clone(),
            pv_details: project_type.includes_pv().then(|| self.pv.clone()),
            hp_details: project_type.includes_hp().then(|| self.hp.clone()),
            project_details: self.project.clone(),
        }
    }

    /// Customer contact and project name present, type-specific sizing positive
    pub fn is_project_valid(&self) -> bool {
        let sized = match self.project.project_type {
            ProjectType::Pv => self.pv.is_sized(),
            ProjectType::Hp => self.hp.is_sized(),
            ProjectType::Combined => self.pv.is_sized() && self.hp.is_sized(),
        };
        self.customer.is_complete() && !self.project.project_name.is_empty() && sized
    }

    pub fn update_customer_data(&mut self, patch: CustomerPatch) {
        patch.apply(&mut self.customer);
        self.touch();
    }

    pub fn update_pv_details(&mut self, patch: PvPatch) {
        patch.apply(&mut self.pv);
        self.touch();
    }

    pub fn update_hp_details(&mut self, patch: HpPatch) {
        patch.apply(&mut self.hp);
        self.touch();
    }

    pub fn update_project_details(&mut self, patch: ProjectPatch) {
        patch.apply(&mut self.project);
        self.touch();
    }

    /// Replace the edited project with a loaded one
    ///
    /// Detail blocks missing from the payload keep their current values.
    pub fn set_project_data(&mut self, data: ProjectData) {
        self.customer = data.customer_data.clone();
        if let Some(pv) = &data.pv_details {
            self.pv = pv.clone();
        }
        if let Some(hp) = &data.hp_details {
            self.hp = hp.clone();
        }
        self.project = data.project_details.clone();
        self.project_data = Some(data);
        self.bump();
        self.set_unsaved(false);
    }

    /// Back to a blank form
    pub fn reset_project(&mut self) {
        self.customer = CustomerData::default();
        self.pv = PvDetails::default();
        self.hp = HpDetails::default();
        self.project = ProjectDetails::default();
        self.project_data = None;
        self.bump();
        self.set_unsaved(false);
    }

    pub fn mark_saved(&mut self) {
        self.set_unsaved(false);
    }

    /// Mark saved only if nothing changed since `revision` was read
    ///
    /// Returns false, keeping the unsaved flag, when edits arrived while the
    /// save was in flight.
    pub fn mark_saved_at(&mut self, revision: u64) -> bool {
        if self.revision != revision {
            return false;
        }
        self.set_unsaved(false);
        true
    }

    /// Record the id the backend assigned; not an edit
    pub fn assign_project_id(&mut self, project_id: i64) {
        self.project.project_id = Some(project_id);
    }

    /// Write the four sub-records under the page's snapshot key
    ///
    /// Failures are logged and otherwise ignored.
    pub fn save_snapshot(&self, store: &dyn SnapshotStore, page_key: &str) {
        let key = snapshot_key(page_key);
        let snapshot = SnapshotRef {
            customer_data: &self.customer,
            pv_details: &self.pv,
            hp_details: &self.hp,
            project_details: &self.project,
        };

        let json = match serde_json::to_string(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                error!(key = %key, error = %e, "Failed to serialize snapshot");
                return;
            }
        };
        if let Err(e) = store.set(&key, &json) {
            error!(key = %key, error = %e, "Failed to save snapshot");
            return;
        }
        debug!(key = %key, "Snapshot saved");
    }

    /// Restore the page's snapshot, if any
    ///
    /// Each sub-record that is absent or unreadable keeps its current value.
    /// Storage and parse failures are logged and leave the state untouched.
    /// Returns whether a snapshot was found and applied.
    pub fn restore_snapshot(&mut self, store: &dyn SnapshotStore, page_key: &str) -> bool {
        let key = snapshot_key(page_key);
        let raw = match store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(e) => {
                error!(key = %key, error = %e, "Failed to read snapshot");
                return false;
            }
        };

        let snapshot: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                error!(key = %key, error = %e, "Failed to restore snapshot");
                return false;
            }
        };

        restore_field(&snapshot, "customerData", &mut self.customer);
        restore_field(&snapshot, "pvDetails", &mut self.pv);
        restore_field(&snapshot, "hpDetails", &mut self.hp);
        restore_field(&snapshot, "projectDetails", &mut self.project);
        debug!(key = %key, "Snapshot restored");
        self.events.emit(AppEvent::ProjectChanged {
            has_unsaved_changes: self.has_unsaved_changes,
        });
        true
    }

    fn touch(&mut self) {
        self.bump();
        self.set_unsaved(true);
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn set_unsaved(&mut self, unsaved: bool) {
        self.has_unsaved_changes = unsaved;
        self.events.emit(AppEvent::ProjectChanged {
            has_unsaved_changes: unsaved,
        });
    }
}

fn restore_field<T: serde::de::DeserializeOwned>(snapshot: &Value, name: &str, target: &mut T) {
    let Some(value) = snapshot.get(name).filter(|v| !v.is_null()) else {
        return;
    };
    match T::deserialize(value) {
        Ok(restored) => *target = restored,
        Err(e) => warn!(field = name, error = %e, "Ignoring unreadable snapshot field"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::utils::snapshot_store::MemorySnapshotStore;
    use serde_json::json;

    fn valid_pv_project() -> ProjectState {
        let mut state = ProjectState::default();
        state.update_customer_data(CustomerPatch {
            first_name: Some("Anna".into()),
            last_name: Some("Berg".into()),
            email: Some("anna@example.de".into()),
            ..CustomerPatch::default()
        });
        state.update_project_details(ProjectPatch {
            project_name: Some("Dach Süd".into()),
            ..ProjectPatch::default()
        });
        state
    }

    #[test]
    fn aggregate_omits_block_excluded_by_type() {
        let mut state = ProjectState::default();

        let data = state.current_project_data();
        assert!(data.pv_details.is_some());
        assert!(data.hp_details.is_none());

        state.update_project_details(ProjectPatch {
            project_type: Some(ProjectType::Hp),
            ..ProjectPatch::default()
        });
        let data = state.current_project_data();
        assert!(data.pv_details.is_none());
        assert!(data.hp_details.is_some());

        state.update_project_details(ProjectPatch {
            project_type: Some(ProjectType::Combined),
            ..ProjectPatch::default()
        });
        let data = state.current_project_data();
        assert!(data.pv_details.is_some() && data.hp_details.is_some());
    }

    #[test]
    fn validity_rules() {
        let mut state = valid_pv_project();
        assert!(state.is_project_valid());

        state.update_customer_data(CustomerPatch {
            email: Some(String::new()),
            ..CustomerPatch::default()
        });
        assert!(!state.is_project_valid());

        let mut state = valid_pv_project();
        state.update_pv_details(PvPatch {
            annual_consumption_kwh: Some(0.0),
            ..PvPatch::default()
        });
        assert!(!state.is_project_valid());

        // hp-only ignores the broken PV block
        state.update_project_details(ProjectPatch {
            project_type: Some(ProjectType::Hp),
            ..ProjectPatch::default()
        });
        assert!(state.is_project_valid());

        state.update_project_details(ProjectPatch {
            project_type: Some(ProjectType::Combined),
            ..ProjectPatch::default()
        });
        assert!(!state.is_project_valid());
    }

    #[test]
    fn unsaved_changes_lifecycle() {
        let (events, rx) = EventSink::channel();
        let mut state = ProjectState::default().with_events(events);
        assert!(!state.has_unsaved_changes());

        state.update_hp_details(HpPatch {
            cop_value: Some(3.5),
            ..HpPatch::default()
        });
        assert!(state.has_unsaved_changes());
        assert_eq!(state.hp_details().cop_value, Some(3.5));
        assert_eq!(state.hp_details().hp_power_kw, 8.0);

        state.mark_saved();
        assert!(!state.has_unsaved_changes());

        let changes: Vec<bool> = rx
            .try_iter()
            .filter_map(|e| match e {
                AppEvent::ProjectChanged {
                    has_unsaved_changes,
                } => Some(has_unsaved_changes),
                _ => None,
            })
            .collect();
        assert_eq!(changes, [true, false]);
    }

    #[test]
    fn edits_during_save_stay_unsaved() {
        let mut state = ProjectState::default();
        state.update_customer_data(CustomerPatch {
            first_name: Some("Anna".into()),
            ..CustomerPatch::default()
        });
        let sent = state.revision();

        state.update_customer_data(CustomerPatch {
            last_name: Some("Berg".into()),
            ..CustomerPatch::default()
        });
        state.assign_project_id(42);
        assert!(!state.mark_saved_at(sent));
        assert!(state.has_unsaved_changes());
        assert_eq!(state.project_details().project_id, Some(42));

        let current = state.revision();
        assert!(state.mark_saved_at(current));
        assert!(!state.has_unsaved_changes());
    }

    #[test]
    fn set_project_data_keeps_missing_blocks() {
        let mut state = ProjectState::default();
        state.update_pv_details(PvPatch {
            anlage_kwp: Some(12.5),
            ..PvPatch::default()
        });

        let loaded: ProjectData = serde_json::from_value(json!({
            "customer_data": {"first_name": "Jan", "last_name": "Ott", "email": "jan@example.de"},
            "hp_details": {"heat_demand_kwh": 20000.0, "hp_power_kw": 10.0},
            "project_details": {"project_id": 7, "project_name": "Altbau", "project_type": "combined"}
        }))
        .expect("parse");
        state.set_project_data(loaded);

        assert!(!state.has_unsaved_changes());
        assert_eq!(state.pv_details().anlage_kwp, 12.5);
        assert_eq!(state.hp_details().heat_demand_kwh, 20000.0);
        assert_eq!(state.project_details().project_id, Some(7));
        assert_eq!(state.customer_data().first_name, "Jan");
        assert!(state.project_data().is_some());

        state.reset_project();
        assert!(state.project_data().is_none());
        assert_eq!(state.pv_details(), &PvDetails::default());
        assert_eq!(state.customer_data(), &CustomerData::default());
    }

    #[test]
    fn snapshot_round_trip() {
        let store = MemorySnapshotStore::new();
        let mut state = valid_pv_project();
        state.update_hp_details(HpPatch {
            hp_type: Some("Sole-Wasser".into()),
            ..HpPatch::default()
        });
        let before = state.clone();

        state.save_snapshot(&store, "input");
        let raw = store
            .get("project_snapshot_input")
            .expect("get")
            .expect("written");
        let stored: Value = serde_json::from_str(&raw).expect("json");
        for field in ["customerData", "pvDetails", "hpDetails", "projectDetails"] {
            assert!(stored.get(field).is_some(), "missing {field}");
        }

        state.update_customer_data(CustomerPatch {
            first_name: Some("Bernd".into()),
            ..CustomerPatch::default()
        });
        state.update_pv_details(PvPatch {
            anlage_kwp: Some(3.0),
            ..PvPatch::default()
        });
        state.update_project_details(ProjectPatch {
            project_type: Some(ProjectType::Combined),
            ..ProjectPatch::default()
        });

        assert!(state.restore_snapshot(&store, "input"));
        assert_eq!(state.customer_data(), before.customer_data());
        assert_eq!(state.pv_details(), before.pv_details());
        assert_eq!(state.hp_details(), before.hp_details());
        assert_eq!(state.project_details(), before.project_details());
    }

    #[test]
    fn restore_falls_back_field_by_field() {
        let store = MemorySnapshotStore::new();
        store
            .set(
                "project_snapshot_pdf",
                r#"{"customerData": {"first_name": "Eva", "last_name": "Roth", "email": "e@r.de"},
                    "pvDetails": null,
                    "hpDetails": "kaputt"}"#,
            )
            .expect("set");

        let mut state = ProjectState::default();
        state.update_pv_details(PvPatch {
            anlage_kwp: Some(8.0),
            ..PvPatch::default()
        });

        assert!(state.restore_snapshot(&store, "pdf"));
        assert_eq!(state.customer_data().first_name, "Eva");
        assert_eq!(state.pv_details().anlage_kwp, 8.0);
        assert_eq!(state.hp_details(), &HpDetails::default());
        assert_eq!(state.project_details(), &ProjectDetails::default());
    }

    #[test]
    fn restore_ignores_missing_and_corrupt_snapshots() {
        let store = MemorySnapshotStore::new();
        let mut state = valid_pv_project();
        let before = state.clone();

        assert!(!state.restore_snapshot(&store, "nothing"));

        store.set("project_snapshot_bad", "{not json").expect("set");
        assert!(!state.restore_snapshot(&store, "bad"));
        assert_eq!(state.customer_data(), before.customer_data());
        assert_eq!(state.project_details(), before.project_details());
    }

    struct BrokenStore;

    impl SnapshotStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Storage {
                message: "disk gone".into(),
            })
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage {
                message: "disk gone".into(),
            })
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn storage_errors_do_not_propagate() {
        let mut state = valid_pv_project();
        state.save_snapshot(&BrokenStore, "input");
        assert!(!state.restore_snapshot(&BrokenStore, "input"));
        assert!(state.is_project_valid());
    }
}
