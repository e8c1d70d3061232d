//! Incremental build scheduler. Edits to a feature start (or reset) a
//! quiet-period timer; when the timer fires the feature is recompiled from
//! the current device snapshot and the result merged back. The snapshot is
//! replaced whole on every change, so staleness checks are id comparisons,
//! never deep scans.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::applicability::Feature;
use crate::compile::{compile_feature, FeatureOutput};
use crate::model::{Connection, Device};

/// Invoked with the new snapshot after every merge
pub type DeviceUpdateFn = dyn Fn(Arc<Device>) + Send + Sync;

struct SchedulerState {
    /// Snapshot of the device being edited; replaced whole, never mutated
    active: Option<Arc<Device>>,
    connections: Vec<Connection>,
    /// Latest request version per feature; a firing timer that lost the
    /// race against a newer edit sees a higher version and no-ops
    versions: HashMap<Feature, u64>,
    timers: HashMap<Feature, JoinHandle<()>>,
    /// UI signaling only, not a correctness lock
    in_flight: HashSet<Feature>,
}

/// BuildScheduler debounces per-feature recompilation requests
pub struct BuildScheduler {
    debounce: Duration,
    state: Mutex<SchedulerState>,
    on_device_update: Arc<DeviceUpdateFn>,
}

impl BuildScheduler {
    pub fn new(debounce: Duration, on_device_update: Arc<DeviceUpdateFn>) -> Arc<Self> {
        Arc::new(Self {
            debounce,
            state: Mutex::new(SchedulerState {
                active: None,
                connections: Vec::new(),
                versions: HashMap::new(),
                timers: HashMap::new(),
                in_flight: HashSet::new(),
            }),
            on_device_update,
        })
    }

    /// Replace the active device snapshot. Results still in flight for a
    /// different device id are discarded by the merge-time guard.
    pub fn set_active_device(&self, device: Device) {
        let mut state = self.lock_state();
        state.active = Some(Arc::new(device));
    }

    /// Replace the topology snapshot compilers read from
    pub fn set_connections(&self, connections: Vec<Connection>) {
        let mut state = self.lock_state();
        state.connections = connections;
    }

    pub fn active_device(&self) -> Option<Arc<Device>> {
        self.lock_state().active.clone()
    }

    /// In-flight set membership, for UI spinners
    pub fn is_generating(&self, feature: Feature) -> bool {
        self.lock_state().in_flight.contains(&feature)
    }

    /// Record an edit to a feature and (re)start its quiet-period timer.
    /// Compound features whose sub-toggles are now all off are cleared
    /// immediately so stale CLI is never left displayed.
    pub fn notify_edit(self: &Arc<Self>, feature: Feature) {
        let version;
        {
            let mut state = self.lock_state();
            let Some(device) = state.active.clone() else {
                return;
            };

            if compound_all_off(&device, feature) {
                if let Some(timer) = state.timers.remove(&feature) {
                    timer.abort();
                }
                state.in_flight.remove(&feature);
                let slot = state.versions.entry(feature).or_insert(0);
                *slot += 1;
                drop(state);
                self.merge_result(feature, &device.id, FeatureOutput::default());
                return;
            }

            let slot = state.versions.entry(feature).or_insert(0);
            *slot += 1;
            version = *slot;
            if let Some(timer) = state.timers.remove(&feature) {
                timer.abort();
            }
            let scheduler = Arc::clone(self);
            let timer = tokio::spawn(async move {
                tokio::time::sleep(scheduler.debounce).await;
                scheduler.fire(feature, version);
            });
            state.timers.insert(feature, timer);
        }
        tracing::debug!("Edit to {} queued as version {}", feature, version);
    }

    /// Timer expiry: compile from the current snapshot unless a newer edit
    /// superseded this request while the timer was pending.
    fn fire(self: &Arc<Self>, feature: Feature, version: u64) {
        let (device, connections) = {
            let mut state = self.lock_state();
            if state.versions.get(&feature).copied() != Some(version) {
                return;
            }
            state.timers.remove(&feature);
            let Some(device) = state.active.clone() else {
                return;
            };
            // Disabled or inapplicable features are skipped outright, leaving
            // any previously merged output in place
            if !feature.is_applicable(device.device_type) || !device.config.is_enabled(feature) {
                tracing::debug!(
                    "Skipping {}: disabled or not applicable on {}",
                    feature,
                    device.device_type
                );
                return;
            }
            state.in_flight.insert(feature);
            (device, state.connections.clone())
        };

        let output = compile_feature(&device, feature, &connections);
        self.merge_result(feature, &device.id, output);
    }

    /// Merge a compile result into the latest snapshot, read-modify-write.
    /// Only the feature's cli/explanation slots change. Discards the result
    /// when the active device id no longer matches the one the compile ran
    /// against. Returns whether the result was applied.
    fn merge_result(&self, feature: Feature, compiled_for: &str, output: FeatureOutput) -> bool {
        let updated = {
            let mut state = self.lock_state();
            state.in_flight.remove(&feature);
            let Some(current) = state.active.clone() else {
                return false;
            };
            if current.id != compiled_for {
                tracing::debug!(
                    "Discarding {} result for {}: active device is now {}",
                    feature,
                    compiled_for,
                    current.id
                );
                return false;
            }
            let mut device = (*current).clone();
            {
                let slots = device.config.slots_mut(feature);
                slots.cli = output.cli;
                slots.explanation = output.explanation;
            }
            device.updated_at = chrono::Utc::now();
            let updated = Arc::new(device);
            state.active = Some(Arc::clone(&updated));
            updated
        };
        (self.on_device_update)(updated);
        true
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SchedulerState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// True for a compound feature whose sub-toggles are now all off
fn compound_all_off(device: &Device, feature: Feature) -> bool {
    match feature {
        Feature::Security => !device.config.security.any_enabled(),
        Feature::ObjectGroups => !device.config.object_groups.any_enabled(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::model::{DeviceType, SecurityZone, Vendor, VlanEntry};

    fn vlan_device(id: &str) -> Device {
        let mut device = Device::new(id, id, Vendor::Huawei, DeviceType::L3Switch);
        device.config.vlan.enabled = true;
        device.config.vlan.vlans.push(VlanEntry {
            id: 10,
            name: "users".to_string(),
            description: String::new(),
            interface: None,
            access_ports: vec![],
            trunk_ports: vec![],
        });
        device
    }

    fn counting_scheduler(
        debounce_ms: u64,
    ) -> (Arc<BuildScheduler>, Arc<AtomicUsize>) {
        let updates = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&updates);
        let scheduler = BuildScheduler::new(
            Duration::from_millis(debounce_ms),
            Arc::new(move |_device| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (scheduler, updates)
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_edits_coalesce_to_one_compile() {
        let (scheduler, updates) = counting_scheduler(500);
        let mut device = vlan_device("sw1");
        scheduler.set_active_device(device.clone());

        scheduler.notify_edit(Feature::Vlan);
        tokio::time::sleep(Duration::from_millis(100)).await;
        scheduler.notify_edit(Feature::Vlan);
        tokio::time::sleep(Duration::from_millis(100)).await;
        device.config.vlan.vlans[0].name = "staff".to_string();
        scheduler.set_active_device(device);
        scheduler.notify_edit(Feature::Vlan);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(updates.load(Ordering::SeqCst), 1);
        let snapshot = scheduler.active_device().unwrap();
        // Last edit wins
        assert!(snapshot.config.vlan.out.cli.contains("description staff"));
        assert!(!scheduler.is_generating(Feature::Vlan));
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_before_quiet_period_do_not_compile() {
        let (scheduler, updates) = counting_scheduler(500);
        scheduler.set_active_device(vlan_device("sw1"));
        scheduler.notify_edit(Feature::Vlan);
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(updates.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(updates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_for_previous_device_is_discarded() {
        let (scheduler, updates) = counting_scheduler(500);
        scheduler.set_active_device(vlan_device("sw1"));

        // A compile finished for sw1 after the operator switched to sw2
        scheduler.set_active_device(vlan_device("sw2"));
        let applied = scheduler.merge_result(
            Feature::Vlan,
            "sw1",
            FeatureOutput { cli: "vlan 10".to_string(), explanation: String::new() },
        );
        assert!(!applied);
        assert_eq!(updates.load(Ordering::SeqCst), 0);
        let snapshot = scheduler.active_device().unwrap();
        assert_eq!(snapshot.id, "sw2");
        assert_eq!(snapshot.config.vlan.out.cli, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_features_debounce_independently() {
        let (scheduler, updates) = counting_scheduler(500);
        let mut device = vlan_device("sw1");
        device.config.ssh.enabled = true;
        device.config.ssh.users.push(crate::model::SshUser {
            username: "ops".to_string(),
            password: "pw".to_string(),
            admin: false,
        });
        scheduler.set_active_device(device);

        scheduler.notify_edit(Feature::Vlan);
        scheduler.notify_edit(Feature::Ssh);
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(updates.load(Ordering::SeqCst), 2);
        let snapshot = scheduler.active_device().unwrap();
        assert!(!snapshot.config.vlan.out.cli.is_empty());
        assert!(!snapshot.config.ssh.out.cli.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_compound_feature_all_off_clears_immediately() {
        let (scheduler, updates) = counting_scheduler(500);
        let mut device = vlan_device("fw1");
        device.device_type = DeviceType::Firewall;
        device.config.security.zones_enabled = true;
        device.config.security.zones.push(SecurityZone {
            name: "trust".to_string(),
            priority: 85,
            interfaces: vec![],
        });
        scheduler.set_active_device(device.clone());
        scheduler.notify_edit(Feature::Security);
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(updates.load(Ordering::SeqCst), 1);
        let snapshot = scheduler.active_device().unwrap();
        assert!(snapshot.config.security.out.cli.contains("firewall zone name trust"));

        // Operator turns the last sub-toggle off: no debounce, cleared now
        let mut device = (*snapshot).clone();
        device.config.security.zones_enabled = false;
        scheduler.set_active_device(device);
        scheduler.notify_edit(Feature::Security);
        assert_eq!(updates.load(Ordering::SeqCst), 2);
        let snapshot = scheduler.active_device().unwrap();
        assert_eq!(snapshot.config.security.out.cli, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_skips_disabled_and_inapplicable_features() {
        let (scheduler, updates) = counting_scheduler(500);
        let mut device = vlan_device("sw1");
        device.config.vlan.out.cli = "vlan 10".to_string();
        device.config.vlan.enabled = false;
        // Enabled, but not applicable on an L3 switch
        device.config.wireless.enabled = true;
        scheduler.set_active_device(device);

        scheduler.notify_edit(Feature::Vlan);
        // VLAN is enabled but the device type rules it out
        scheduler.notify_edit(Feature::Wireless);
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(updates.load(Ordering::SeqCst), 0);
        // Previously merged output stays untouched
        let snapshot = scheduler.active_device().unwrap();
        assert_eq!(snapshot.config.vlan.out.cli, "vlan 10");
        assert!(!scheduler.is_generating(Feature::Vlan));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_timer_never_fires_twice() {
        let (scheduler, updates) = counting_scheduler(500);
        scheduler.set_active_device(vlan_device("sw1"));
        scheduler.notify_edit(Feature::Vlan);
        tokio::time::sleep(Duration::from_millis(499)).await;
        scheduler.notify_edit(Feature::Vlan);
        tokio::time::sleep(Duration::from_millis(2)).await;
        // First timer window has elapsed but its version was superseded
        assert_eq!(updates.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(updates.load(Ordering::SeqCst), 1);
    }
}
