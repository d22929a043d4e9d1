//! 请求缓存: 以 (实体类别, 查询指纹) 为键保存查询结果快照

pub mod cached_source;
pub mod dependency;

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::ReportResult;

pub use cached_source::CachedSource;
pub use dependency::{invalidation_order, EntityKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: EntityKind,
    pub fingerprint: String,
}

type CachedValue = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct QueryCache {
    entries: DashMap<CacheKey, CachedValue>,
    /// 每个类别的失效代数, 每次失效 +1
    generations: DashMap<EntityKind, u64>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: Any + Send + Sync>(&self, kind: EntityKind, fingerprint: &str) -> Option<Arc<T>> {
        let key = CacheKey {
            kind,
            fingerprint: fingerprint.to_string(),
        };
        let value = self.entries.get(&key).map(|entry| entry.value().clone())?;
        value.downcast::<T>().ok()
    }

    pub fn insert<T: Any + Send + Sync>(&self, kind: EntityKind, fingerprint: String, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.entries
            .insert(CacheKey { kind, fingerprint }, value.clone() as CachedValue);
        value
    }

    /// 命中直接返回; 未命中则执行查询, 成功后写入缓存 (失败不缓存)
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        kind: EntityKind,
        fingerprint: String,
        fetch: F,
    ) -> ReportResult<Arc<T>>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ReportResult<T>>,
    {
        if let Some(hit) = self.get::<T>(kind, &fingerprint) {
            tracing::debug!("cache hit: {} {}", kind, fingerprint);
            return Ok(hit);
        }

        tracing::debug!("cache miss: {} {}", kind, fingerprint);
        let started_at = self.generation(kind);
        let value = fetch().await?;

        // 持有代数条目的锁写入, 与 invalidate 的递增互斥
        let generation = self.generations.entry(kind).or_insert(0);
        if *generation != started_at {
            tracing::debug!("cache skip: {} {} invalidated during fetch", kind, fingerprint);
            return Ok(Arc::new(value));
        }
        let value = self.insert(kind, fingerprint, value);
        drop(generation);
        Ok(value)
    }

    fn generation(&self, kind: EntityKind) -> u64 {
        self.generations.get(&kind).map(|g| *g).unwrap_or(0)
    }

    /// 失效 `changed` 及其下游类别的所有条目, 返回实际处理的类别顺序
    pub fn invalidate(&self, changed: EntityKind) -> Vec<EntityKind> {
        let order = invalidation_order(changed);
        for kind in &order {
            *self.generations.entry(*kind).or_insert(0) += 1;
            self.entries.retain(|key, _| key.kind != *kind);
        }
        tracing::info!(
            "Cache invalidated for {}: {:?}, {} entries left",
            changed,
            order,
            self.entries.len()
        );
        order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
