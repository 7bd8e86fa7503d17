//! 名字表：字符串标识到 `u32` 编号的映射。
//!
//! 编号有两种来源：库所与迁移的编号由网给定，按位置写入；轨迹名的编号按首次声明
//! 顺序从 0 稠密分配。
use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::context::ContextError;

/// 共享、不可变的名字记号，注册表与解析结果共用同一份存储。
pub type Identifier = Arc<str>;

#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    names: IndexMap<Identifier, u32>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按网给定的编号建表：第 i 个名字映射到 i。重名时保留最早的编号，其后的编号不受影响。
    pub fn positional<I>(names: I) -> (Self, usize)
    where
        I: IntoIterator,
        I::Item: Into<Identifier>,
    {
        let mut registry = Self::new();
        let mut count = 0;
        for (position, name) in names.into_iter().enumerate() {
            let name = name.into();
            debug_assert!(position < u32::MAX as usize);
            if !registry.assign(name.clone(), position as u32) {
                log::warn!("duplicate name {name:?} at index {position}, keeping the first one");
            }
            count = position + 1;
        }
        (registry, count)
    }

    /// 把 `name` 绑定到给定编号；名字已存在时不改动并返回 `false`。
    pub fn assign(&mut self, name: impl Into<Identifier>, index: u32) -> bool {
        match self.names.entry(name.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(index);
                true
            }
        }
    }

    /// 未出现过则分配下一个稠密编号，两种情况都返回其编号。
    pub fn register(&mut self, name: impl Into<Identifier>) -> u32 {
        let next = self.next_index();
        *self.names.entry(name.into()).or_insert(next)
    }

    /// 仅在不存在时插入；已注册则返回 `None`。
    pub fn insert_new(&mut self, name: &str) -> Option<u32> {
        let next = self.next_index();
        match self.names.entry(Identifier::from(name)) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => Some(*slot.insert(next)),
        }
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.names.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// 按注册顺序遍历。
    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, u32)> {
        self.names.iter().map(|(name, &index)| (name, index))
    }

    fn next_index(&self) -> u32 {
        debug_assert!(self.names.len() < u32::MAX as usize);
        self.names.len() as u32
    }
}

impl<S> FromIterator<S> for NameRegistry
where
    S: Into<Identifier>,
{
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut registry = Self::new();
        for name in iter {
            registry.register(name);
        }
        registry
    }
}

/// 查询中路径前缀声明的轨迹名。
///
/// 声明（`create = true`）要求名字是新的，引用（`create = false`）要求名字已存在。
/// 失败的调用不改动表，被拒绝的查询不会把名字留给下一个查询。
#[derive(Debug, Clone, Default)]
pub struct TraceNames {
    registry: NameRegistry,
}

impl TraceNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, name: &str, create: bool) -> Result<u32, ContextError> {
        if create {
            self.registry
                .insert_new(name)
                .ok_or_else(|| ContextError::DuplicateTraceName(name.to_owned()))
        } else {
            self.registry
                .get(name)
                .ok_or_else(|| ContextError::UndeclaredTraceName(name.to_owned()))
        }
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.registry.get(name)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, u32)> {
        self.registry.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_dense_in_first_seen_order() {
        let mut registry = NameRegistry::new();
        assert_eq!(registry.register("b"), 0);
        assert_eq!(registry.register("a"), 1);
        assert_eq!(registry.register("b"), 0);
        assert_eq!(registry.len(), 2);

        let order: Vec<_> = registry.iter().map(|(name, idx)| (name.to_string(), idx)).collect();
        assert_eq!(order, vec![("b".to_string(), 0), ("a".to_string(), 1)]);
    }

    #[test]
    fn positional_keeps_net_indices_across_duplicates() {
        let (registry, count) = NameRegistry::positional(["a", "b", "a", "c"]);
        assert_eq!(count, 4);
        assert_eq!(registry.get("a"), Some(0));
        assert_eq!(registry.get("b"), Some(1));
        assert_eq!(registry.get("c"), Some(3));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn assign_does_not_overwrite() {
        let mut registry = NameRegistry::new();
        assert!(registry.assign("x", 7));
        assert!(!registry.assign("x", 2));
        assert_eq!(registry.get("x"), Some(7));
    }

    #[test]
    fn insert_new_refuses_existing() {
        let mut registry: NameRegistry = ["x"].into_iter().collect();
        assert_eq!(registry.insert_new("x"), None);
        assert_eq!(registry.insert_new("y"), Some(1));
        assert!(registry.contains("y"));
    }

    #[test]
    fn created_trace_name_resolves_to_same_index() {
        let mut traces = TraceNames::new();
        let first = traces.resolve("A", true).unwrap();
        let second = traces.resolve("B", true).unwrap();
        assert_eq!((first, second), (0, 1));
        assert_eq!(traces.resolve("A", false).unwrap(), first);
        assert_eq!(traces.resolve("B", false).unwrap(), second);
    }

    #[test]
    fn duplicate_declaration_fails_without_growth() {
        let mut traces = TraceNames::new();
        traces.resolve("A", true).unwrap();
        let err = traces.resolve("A", true).unwrap_err();
        assert_eq!(err, ContextError::DuplicateTraceName("A".into()));
        assert_eq!(err.to_string(), "Trace identifier A already existed.");
        assert_eq!(traces.len(), 1);
    }

    #[test]
    fn undeclared_reference_fails_without_insertion() {
        let mut traces = TraceNames::new();
        let err = traces.resolve("ghost", false).unwrap_err();
        assert_eq!(err, ContextError::UndeclaredTraceName("ghost".into()));
        assert!(traces.is_empty());
        // a later declaration of the same name still succeeds
        assert_eq!(traces.resolve("ghost", true), Ok(0));
    }
}
