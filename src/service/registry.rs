//! 对象注册表 - 记录哪些端点以哪个对象路径对外暴露
//! Object registry - records which endpoints are exposed under which object path

use super::identity::ServiceId;
use crate::error::{Error, Result};
use dashmap::{DashMap, mapref::entry::Entry};
use tracing::debug;

/// Where endpoint interfaces are published. A record only exists while
/// its path is registered.
///
/// 端点接口的发布位置。记录仅在其路径已注册期间存在。
pub trait ObjectRegistry: Send + Sync + 'static {
    /// Publishes `interface` for `id` at `path`.
    /// 在 `path` 上为 `id` 发布 `interface`。
    fn register(&self, path: &str, interface: &str, id: &ServiceId) -> Result<()>;

    /// Withdraws whatever was published at `path`.
    /// 撤销在 `path` 上发布的内容。
    fn unregister(&self, path: &str, interface: &str);
}

/// One published interface.
/// 一个已发布的接口。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub interface: String,
    pub id: ServiceId,
}

/// A concurrent in-memory [`ObjectRegistry`] that refuses duplicate paths.
///
/// 拒绝重复路径的并发内存 [`ObjectRegistry`] 实现。
#[derive(Debug, Default)]
pub struct InterfaceRegistry {
    objects: DashMap<String, Registration>,
}

impl InterfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询路径上发布的接口。
    pub fn lookup(&self, path: &str) -> Option<Registration> {
        self.objects.get(path).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All registered paths, sorted.
    /// 所有已注册的路径（已排序）。
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.objects.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }
}

impl ObjectRegistry for InterfaceRegistry {
    fn register(&self, path: &str, interface: &str, id: &ServiceId) -> Result<()> {
        match self.objects.entry(path.to_string()) {
            Entry::Occupied(_) => Err(Error::Registration(path.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(Registration {
                    interface: interface.to_string(),
                    id: id.clone(),
                });
                debug!(path, interface, "Registered service interface");
                Ok(())
            }
        }
    }

    fn unregister(&self, path: &str, interface: &str) {
        let removed = self
            .objects
            .remove_if(path, |_, registration| registration.interface == interface);
        if removed.is_some() {
            debug!(path, interface, "Unregistered service interface");
        }
    }
}

impl<T: ObjectRegistry + ?Sized> ObjectRegistry for std::sync::Arc<T> {
    fn register(&self, path: &str, interface: &str, id: &ServiceId) -> Result<()> {
        (**self).register(path, interface, id)
    }

    fn unregister(&self, path: &str, interface: &str) {
        (**self).unregister(path, interface)
    }
}
