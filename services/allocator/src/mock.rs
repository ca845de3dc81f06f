//! Mock device cloud for testing and development.
//!
//! Implements both cloud service seams against in-memory state. Tests
//! script it (free-instance queue, boot poll counts, failure injection) and
//! assert ordering against the recorded call log.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use droidfarm_id::{InstanceUuid, RecipeUuid};
use tracing::debug;

use crate::cloud::{CloudError, InstanceLifecycle, InstanceLookup};
use crate::device::{DeviceInstance, Recipe};

/// A recorded call against the mock cloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudCall {
    FindFreeInstance { recipe: RecipeUuid },
    GetInstance { uuid: InstanceUuid },
    CreateInstance { recipe: RecipeUuid },
    AdbConnectInstance { uuid: InstanceUuid },
    DeleteInstance { uuid: InstanceUuid },
}

struct MockInstance {
    instance: DeviceInstance,
    polls_until_online: u32,
}

/// In-memory device cloud.
pub struct MockDeviceCloud {
    instances: Mutex<HashMap<InstanceUuid, MockInstance>>,
    free_queue: Mutex<VecDeque<DeviceInstance>>,
    calls: Mutex<Vec<CloudCall>>,

    /// `get_instance` calls a freshly created instance stays offline for.
    boot_polls: AtomicU32,
    /// New instances come up with a live device-control channel.
    connected_on_create: AtomicBool,

    device_counter: AtomicU32,
    port_counter: AtomicU32,

    fail_creates: AtomicBool,
    fail_connects: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MockDeviceCloud {
    /// Create a mock cloud where new instances boot instantly.
    pub fn new() -> Self {
        Self {
            instances: Mutex::new(HashMap::new()),
            free_queue: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            boot_polls: AtomicU32::new(0),
            connected_on_create: AtomicBool::new(false),
            device_counter: AtomicU32::new(0),
            port_counter: AtomicU32::new(0),
            fail_creates: AtomicBool::new(false),
            fail_connects: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }

    /// New instances stay offline for `polls` state fetches.
    pub fn with_boot_polls(self, polls: u32) -> Self {
        self.boot_polls.store(polls, Ordering::SeqCst);
        self
    }

    /// New instances come up already online and connected.
    pub fn with_connected_on_create(self) -> Self {
        self.connected_on_create.store(true, Ordering::SeqCst);
        self
    }

    /// Make `create_instance` fail.
    pub fn set_fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    /// Make `adb_connect_instance` fail.
    pub fn set_fail_connects(&self, fail: bool) {
        self.fail_connects.store(fail, Ordering::SeqCst);
    }

    /// Make `delete_instance` fail.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Queue an instance for the next `find_free_instance` call.
    pub fn enqueue_free_instance(&self, instance: DeviceInstance) {
        self.instances.lock().unwrap().insert(
            instance.uuid,
            MockInstance {
                instance: instance.clone(),
                polls_until_online: 0,
            },
        );
        self.free_queue.lock().unwrap().push_back(instance);
    }

    /// Current state of an instance, if it exists.
    pub fn instance(&self, uuid: &InstanceUuid) -> Option<DeviceInstance> {
        self.instances
            .lock()
            .unwrap()
            .get(uuid)
            .map(|m| m.instance.clone())
    }

    /// The recorded call log.
    pub fn calls(&self) -> Vec<CloudCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: CloudCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_adb_address(&self) -> String {
        let port = 5555 + self.port_counter.fetch_add(1, Ordering::SeqCst);
        format!("localhost:{port}")
    }
}

impl Default for MockDeviceCloud {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InstanceLookup for MockDeviceCloud {
    async fn find_free_instance(
        &self,
        recipe: &Recipe,
    ) -> Result<Option<DeviceInstance>, CloudError> {
        self.record(CloudCall::FindFreeInstance {
            recipe: recipe.uuid,
        });

        Ok(self.free_queue.lock().unwrap().pop_front())
    }

    async fn get_instance(&self, uuid: InstanceUuid) -> Result<DeviceInstance, CloudError> {
        self.record(CloudCall::GetInstance { uuid });

        let mut instances = self.instances.lock().unwrap();
        let entry = instances
            .get_mut(&uuid)
            .ok_or(CloudError::InstanceNotFound(uuid))?;

        if entry.polls_until_online > 0 {
            entry.polls_until_online -= 1;
        } else {
            entry.instance.is_online = true;
        }

        Ok(entry.instance.clone())
    }
}

#[async_trait]
impl InstanceLifecycle for MockDeviceCloud {
    async fn create_instance(&self, recipe_uuid: RecipeUuid) -> Result<DeviceInstance, CloudError> {
        self.record(CloudCall::CreateInstance {
            recipe: recipe_uuid,
        });

        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(CloudError::Api("create rejected".to_string()));
        }

        let n = self.device_counter.fetch_add(1, Ordering::SeqCst);
        let polls = self.boot_polls.load(Ordering::SeqCst);
        let connected = self.connected_on_create.load(Ordering::SeqCst);

        let instance = DeviceInstance {
            uuid: InstanceUuid::new(),
            name: format!("mock-device-{n}"),
            adb_name: if connected {
                self.next_adb_address()
            } else {
                "0.0.0.0".to_string()
            },
            is_online: polls == 0,
            is_adb_connected: connected,
        };

        debug!(uuid = %instance.uuid, name = %instance.name, "[MOCK] Instance created");

        self.instances.lock().unwrap().insert(
            instance.uuid,
            MockInstance {
                instance: instance.clone(),
                polls_until_online: polls,
            },
        );

        Ok(instance)
    }

    async fn adb_connect_instance(
        &self,
        uuid: InstanceUuid,
    ) -> Result<DeviceInstance, CloudError> {
        self.record(CloudCall::AdbConnectInstance { uuid });

        if self.fail_connects.load(Ordering::SeqCst) {
            return Err(CloudError::Api("adb connect rejected".to_string()));
        }

        let address = self.next_adb_address();
        let mut instances = self.instances.lock().unwrap();
        let entry = instances
            .get_mut(&uuid)
            .ok_or(CloudError::InstanceNotFound(uuid))?;

        entry.instance.is_adb_connected = true;
        entry.instance.adb_name = address;

        debug!(uuid = %uuid, adb_name = %entry.instance.adb_name, "[MOCK] Instance connected");

        Ok(entry.instance.clone())
    }

    async fn delete_instance(&self, uuid: InstanceUuid) -> Result<(), CloudError> {
        self.record(CloudCall::DeleteInstance { uuid });

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(CloudError::Api("delete rejected".to_string()));
        }

        // Deletion is idempotent; an unknown uuid is already gone.
        self.instances.lock().unwrap().remove(&uuid);
        debug!(uuid = %uuid, "[MOCK] Instance deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_recipe() -> Recipe {
        Recipe::new(RecipeUuid::new(), "Pixel", "mock recipe")
    }

    #[tokio::test]
    async fn test_free_queue_pops_once() {
        let cloud = MockDeviceCloud::new();
        let recipe = test_recipe();

        let free = DeviceInstance {
            uuid: InstanceUuid::new(),
            name: "idle-1".to_string(),
            adb_name: "localhost:5555".to_string(),
            is_online: true,
            is_adb_connected: true,
        };
        cloud.enqueue_free_instance(free.clone());

        assert_eq!(
            cloud.find_free_instance(&recipe).await.unwrap(),
            Some(free)
        );
        assert_eq!(cloud.find_free_instance(&recipe).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_created_instance_boots_after_polls() {
        let cloud = MockDeviceCloud::new().with_boot_polls(1);
        let created = cloud.create_instance(RecipeUuid::new()).await.unwrap();
        assert!(!created.is_online);

        let first = cloud.get_instance(created.uuid).await.unwrap();
        assert!(!first.is_online);

        let second = cloud.get_instance(created.uuid).await.unwrap();
        assert!(second.is_online);
    }

    #[tokio::test]
    async fn test_connect_assigns_an_address() {
        let cloud = MockDeviceCloud::new();
        let created = cloud.create_instance(RecipeUuid::new()).await.unwrap();
        assert_eq!(created.adb_name, "0.0.0.0");

        let connected = cloud.adb_connect_instance(created.uuid).await.unwrap();
        assert!(connected.is_adb_connected);
        assert_eq!(connected.adb_name, "localhost:5555");
    }

    #[tokio::test]
    async fn test_call_log_preserves_order() {
        let cloud = MockDeviceCloud::new();
        let recipe = test_recipe();

        cloud.find_free_instance(&recipe).await.unwrap();
        let created = cloud.create_instance(recipe.uuid).await.unwrap();
        cloud.delete_instance(created.uuid).await.unwrap();

        assert_eq!(
            cloud.calls(),
            vec![
                CloudCall::FindFreeInstance {
                    recipe: recipe.uuid
                },
                CloudCall::CreateInstance {
                    recipe: recipe.uuid
                },
                CloudCall::DeleteInstance { uuid: created.uuid },
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let cloud = MockDeviceCloud::new();
        cloud.set_fail_creates(true);

        let result = cloud.create_instance(RecipeUuid::new()).await;
        assert!(matches!(result, Err(CloudError::Api(_))));
    }
}
