//! 服务标识 - 远程服务实例的稳定标识及其对象路径
//! Service identity - the stable identity of a remote service instance and
//! its object path

use std::fmt;

/// Identifies one remote-service binding: a profile (by remote UUID) on a
/// remote device (by object path).
///
/// 标识一个远程服务绑定：远程设备（以对象路径表示）上的一个配置文件（以远程 UUID 表示）。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceId {
    device_path: String,
    remote_uuid: String,
}

impl ServiceId {
    pub fn new(device_path: impl Into<String>, remote_uuid: impl Into<String>) -> Self {
        Self {
            device_path: device_path.into(),
            remote_uuid: remote_uuid.into(),
        }
    }

    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    pub fn remote_uuid(&self) -> &str {
        &self.remote_uuid
    }

    /// The object path this service is exposed under: the device path with
    /// the remote UUID appended, `-` replaced by `_` so the result is a
    /// valid object path element.
    ///
    /// 该服务对外暴露的对象路径：设备路径后接远程 UUID，并将 `-` 替换为 `_`，
    /// 使结果成为合法的对象路径元素。
    pub fn object_path(&self) -> String {
        format!("{}/{}", self.device_path, self.remote_uuid).replace('-', "_")
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device_path, self.remote_uuid)
    }
}
