// Fleet bookkeeping: which workers exist, which rooms they run, and how
// full each room is believed to be.

use std::collections::HashMap;
use std::sync::Mutex;

/// Network address of one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerAddr {
    pub host: String,
    pub port: u16,
}

impl WorkerAddr {
    pub fn key(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// A reserved player slot: where to send the client.
#[derive(Debug, Clone)]
pub struct Placement {
    pub addr: WorkerAddr,
    pub room_id: String,
}

#[derive(Debug)]
struct HostEntry {
    addr: WorkerAddr,
    /// Believed occupancy per room. Optimistically incremented on
    /// placement, overwritten by the next status probe.
    rooms: HashMap<String, usize>,
}

impl HostEntry {
    fn total_occupancy(&self) -> usize {
        self.rooms.values().sum()
    }
}

/// Registry of live workers. Occupancy figures are estimates: placements
/// bump them immediately so bursts of joins spread out, and periodic
/// probes replace them with the workers' own counts.
pub struct WorkerRegistry {
    hosts: Mutex<HashMap<String, HostEntry>>,
    room_capacity: usize,
}

impl WorkerRegistry {
    pub fn new(room_capacity: usize) -> Self {
        WorkerRegistry {
            hosts: Mutex::new(HashMap::new()),
            room_capacity,
        }
    }

    /// Registers a worker, resetting any previous view of it. A worker
    /// that re-registers has restarted and holds no rooms.
    pub fn register_host(&self, addr: WorkerAddr) {
        let mut hosts = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
        hosts.insert(
            addr.key(),
            HostEntry {
                addr,
                rooms: HashMap::new(),
            },
        );
    }

    /// Reserves a slot in an existing room with believed space, bumping
    /// its occupancy.
    pub fn reserve_existing_slot(&self) -> Option<Placement> {
        let mut hosts = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
        for entry in hosts.values_mut() {
            for (room_id, occupancy) in entry.rooms.iter_mut() {
                if *occupancy < self.room_capacity {
                    *occupancy += 1;
                    return Some(Placement {
                        addr: entry.addr.clone(),
                        room_id: room_id.clone(),
                    });
                }
            }
        }
        None
    }

    /// Reserves a slot in one specific room. None if the room is unknown
    /// or believed full.
    pub fn reserve_named_slot(&self, room_id: &str) -> Option<Placement> {
        let mut hosts = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
        for entry in hosts.values_mut() {
            if let Some(occupancy) = entry.rooms.get_mut(room_id) {
                if *occupancy < self.room_capacity {
                    *occupancy += 1;
                    return Some(Placement {
                        addr: entry.addr.clone(),
                        room_id: room_id.to_string(),
                    });
                }
                return None;
            }
        }
        None
    }

    /// The least-loaded worker, for hosting a new room.
    pub fn choose_host(&self) -> Option<WorkerAddr> {
        let hosts = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
        hosts
            .values()
            .min_by_key(|entry| entry.total_occupancy())
            .map(|entry| entry.addr.clone())
    }

    /// Records a freshly created room with its first occupant.
    pub fn add_room(&self, host_key: &str, room_id: String) {
        let mut hosts = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = hosts.get_mut(host_key) {
            entry.rooms.insert(room_id, 1);
        }
    }

    /// Replaces the believed room occupancy of one worker with a probe
    /// result.
    pub fn apply_status(&self, host_key: &str, rooms: HashMap<String, usize>) {
        let mut hosts = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = hosts.get_mut(host_key) {
            entry.rooms = rooms;
        }
    }

    /// Addresses of every registered worker.
    pub fn host_addrs(&self) -> Vec<WorkerAddr> {
        let hosts = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
        hosts.values().map(|entry| entry.addr.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(host: &str, port: u16) -> WorkerAddr {
        WorkerAddr {
            host: host.to_string(),
            port,
        }
    }

    #[test]
    fn empty_registry_places_nothing() {
        let registry = WorkerRegistry::new(16);
        assert!(registry.reserve_existing_slot().is_none());
        assert!(registry.choose_host().is_none());
    }

    #[test]
    fn reservation_bumps_occupancy_until_full() {
        let registry = WorkerRegistry::new(2);
        let a = addr("w1", 3001);
        registry.register_host(a.clone());
        registry.add_room(&a.key(), "r1".to_string());

        // add_room seats the first occupant; one slot remains.
        let placement = registry.reserve_existing_slot().unwrap();
        assert_eq!(placement.room_id, "r1");
        assert!(registry.reserve_existing_slot().is_none());
    }

    #[test]
    fn named_reservation_rejects_unknown_and_full_rooms() {
        let registry = WorkerRegistry::new(2);
        let a = addr("w1", 3001);
        registry.register_host(a.clone());
        registry.add_room(&a.key(), "r1".to_string());

        assert!(registry.reserve_named_slot("nope").is_none());
        let placement = registry.reserve_named_slot("r1").unwrap();
        assert_eq!(placement.room_id, "r1");
        assert!(registry.reserve_named_slot("r1").is_none());
    }

    #[test]
    fn least_loaded_host_wins_new_rooms() {
        let registry = WorkerRegistry::new(16);
        let a = addr("w1", 3001);
        let b = addr("w2", 3001);
        registry.register_host(a.clone());
        registry.register_host(b.clone());
        registry.apply_status(&a.key(), HashMap::from([("r1".to_string(), 5)]));
        registry.apply_status(&b.key(), HashMap::from([("r2".to_string(), 3)]));
        assert_eq!(registry.choose_host(), Some(b));
    }

    #[test]
    fn reregistration_resets_the_host() {
        let registry = WorkerRegistry::new(16);
        let a = addr("w1", 3001);
        registry.register_host(a.clone());
        registry.add_room(&a.key(), "r1".to_string());
        registry.register_host(a.clone());
        assert!(registry.reserve_existing_slot().is_none());
    }

    #[test]
    fn probe_overwrites_optimistic_counts() {
        let registry = WorkerRegistry::new(16);
        let a = addr("w1", 3001);
        registry.register_host(a.clone());
        registry.add_room(&a.key(), "r1".to_string());
        registry.reserve_existing_slot().unwrap();

        // Worker reports both players already left.
        registry.apply_status(&a.key(), HashMap::from([("r1".to_string(), 0)]));
        let placement = registry.reserve_existing_slot().unwrap();
        assert_eq!(placement.room_id, "r1");
    }
}
