use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::RwLock;

use stocksense_core::TenantId;

/// Tenant-isolated key/value store abstraction for computed records.
///
/// Every record the engine produces is addressed by a natural key, and
/// `upsert` by that key is what makes recomputation idempotent.
pub trait TenantStore<K, V>: Send + Sync {
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V>;
    fn upsert(&self, tenant_id: TenantId, key: K, value: V);
    fn remove(&self, tenant_id: TenantId, key: &K) -> bool;
    fn list(&self, tenant_id: TenantId) -> Vec<V>;
    fn keys(&self, tenant_id: TenantId) -> Vec<K>;
    /// Clear all records for a tenant (rebuild support).
    fn clear_tenant(&self, tenant_id: TenantId);
}

impl<K, V, S> TenantStore<K, V> for Arc<S>
where
    S: TenantStore<K, V> + ?Sized,
{
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V> {
        (**self).get(tenant_id, key)
    }

    fn upsert(&self, tenant_id: TenantId, key: K, value: V) {
        (**self).upsert(tenant_id, key, value)
    }

    fn remove(&self, tenant_id: TenantId, key: &K) -> bool {
        (**self).remove(tenant_id, key)
    }

    fn list(&self, tenant_id: TenantId) -> Vec<V> {
        (**self).list(tenant_id)
    }

    fn keys(&self, tenant_id: TenantId) -> Vec<K> {
        (**self).keys(tenant_id)
    }

    fn clear_tenant(&self, tenant_id: TenantId) {
        (**self).clear_tenant(tenant_id)
    }
}

/// In-memory tenant-isolated store for tests/dev.
#[derive(Debug)]
pub struct InMemoryTenantStore<K, V> {
    inner: RwLock<HashMap<(TenantId, K), V>>,
}

impl<K, V> InMemoryTenantStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryTenantStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TenantStore<K, V> for InMemoryTenantStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(&(tenant_id, key.clone())).cloned()
    }

    fn upsert(&self, tenant_id: TenantId, key: K, value: V) {
        if let Ok(mut map) = self.inner.write() {
            map.insert((tenant_id, key), value);
        }
    }

    fn remove(&self, tenant_id: TenantId, key: &K) -> bool {
        match self.inner.write() {
            Ok(mut map) => map.remove(&(tenant_id, key.clone())).is_some(),
            Err(_) => false,
        }
    }

    fn list(&self, tenant_id: TenantId) -> Vec<V> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        map.iter()
            .filter_map(|((t, _k), v)| if *t == tenant_id { Some(v.clone()) } else { None })
            .collect()
    }

    fn keys(&self, tenant_id: TenantId) -> Vec<K> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        map.keys()
            .filter_map(|(t, k)| if *t == tenant_id { Some(k.clone()) } else { None })
            .collect()
    }

    fn clear_tenant(&self, tenant_id: TenantId) {
        if let Ok(mut map) = self.inner.write() {
            map.retain(|(t, _k), _v| *t != tenant_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_by_key_replaces() {
        let store: InMemoryTenantStore<u32, String> = InMemoryTenantStore::new();
        let tenant = TenantId::new();
        store.upsert(tenant, 1, "a".into());
        store.upsert(tenant, 1, "b".into());
        assert_eq!(store.get(tenant, &1), Some("b".into()));
        assert_eq!(store.list(tenant).len(), 1);
    }

    #[test]
    fn tenants_are_isolated() {
        let store: InMemoryTenantStore<u32, String> = InMemoryTenantStore::new();
        let a = TenantId::new();
        let b = TenantId::new();
        store.upsert(a, 1, "a".into());
        store.upsert(b, 1, "b".into());
        assert_eq!(store.get(a, &1), Some("a".into()));
        assert_eq!(store.get(b, &1), Some("b".into()));

        store.clear_tenant(a);
        assert_eq!(store.get(a, &1), None);
        assert_eq!(store.get(b, &1), Some("b".into()));
    }

    #[test]
    fn remove_reports_presence() {
        let store: InMemoryTenantStore<u32, String> = InMemoryTenantStore::new();
        let tenant = TenantId::new();
        store.upsert(tenant, 1, "a".into());
        assert!(store.remove(tenant, &1));
        assert!(!store.remove(tenant, &1));
    }
}
