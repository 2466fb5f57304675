use serde::{Deserialize, Serialize};

use crate::domain::types::{DeviceType, UserName};

/// Identity attached to every backend request.
///
/// Injected from configuration and passed explicitly to the backend client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientIdentity {
    pub device_type: DeviceType,
    pub username: UserName,
}

impl ClientIdentity {
    pub fn new(device_type: DeviceType, username: UserName) -> Self {
        Self {
            device_type,
            username,
        }
    }
}
