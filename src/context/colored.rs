//! 着色网上的名字解析。
//!
//! 展开（unfolding）之后，一个着色库所/迁移名对应若干具体实例。这里只保存展开
//! 结果给出的映射，并按存储顺序把实例逐个推给调用方的回调：命中但实例为空时
//! 回调零次且仍返回 `true`，与「根本不存在」区分开。
use indexmap::IndexMap;

use crate::context::analysis::{AnalysisContext, ResolutionResult};
use crate::context::names::Identifier;
use crate::context::{ContextError, NameResolver};

#[derive(Debug, Clone, Default)]
pub struct ColoredAnalysisContext {
    base: AnalysisContext,
    /// 着色库所名 -> (绑定编号, 具体库所名)，保持展开时的顺序。
    colored_places: IndexMap<Identifier, Vec<(u32, Identifier)>>,
    colored_transitions: IndexMap<Identifier, Vec<Identifier>>,
    colored_net: bool,
}

impl ColoredAnalysisContext {
    pub fn new(
        base: AnalysisContext,
        colored_places: IndexMap<Identifier, Vec<(u32, Identifier)>>,
        colored_transitions: IndexMap<Identifier, Vec<Identifier>>,
    ) -> Self {
        Self {
            base,
            colored_places,
            colored_transitions,
            colored_net: true,
        }
    }

    /// 未经展开的网：所有查询按普通上下文处理。
    pub fn uncolored(base: AnalysisContext) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// 记录着色库所展开后的一个实例。
    pub fn add_colored_place(
        &mut self,
        symbolic: impl Into<Identifier>,
        binding: u32,
        concrete: impl Into<Identifier>,
    ) {
        self.colored_net = true;
        self.colored_places
            .entry(symbolic.into())
            .or_default()
            .push((binding, concrete.into()));
    }

    /// 记录着色迁移展开后的一个实例。
    pub fn add_colored_transition(
        &mut self,
        symbolic: impl Into<Identifier>,
        concrete: impl Into<Identifier>,
    ) {
        self.colored_net = true;
        self.colored_transitions
            .entry(symbolic.into())
            .or_default()
            .push(concrete.into());
    }

    /// 声明一个展开后没有实例的着色库所。
    pub fn declare_colored_place(&mut self, symbolic: impl Into<Identifier>) {
        self.colored_net = true;
        self.colored_places.entry(symbolic.into()).or_default();
    }

    /// 声明一个展开后没有实例的着色迁移。
    pub fn declare_colored_transition(&mut self, symbolic: impl Into<Identifier>) {
        self.colored_net = true;
        self.colored_transitions.entry(symbolic.into()).or_default();
    }

    pub fn resolve_place<F>(&self, place: &str, mut f: F) -> bool
    where
        F: FnMut(&Identifier),
    {
        match self.colored_places.get(place) {
            Some(instances) => {
                for (_, name) in instances {
                    f(name);
                }
                true
            }
            None => false,
        }
    }

    pub fn resolve_transition<F>(&self, transition: &str, mut f: F) -> bool
    where
        F: FnMut(&Identifier),
    {
        match self.colored_transitions.get(transition) {
            Some(instances) => {
                instances.iter().for_each(&mut f);
                true
            }
            None => false,
        }
    }

    /// 实例及其绑定编号，供需要区分绑定的调用方使用。
    pub fn place_instances(&self, place: &str) -> Option<&[(u32, Identifier)]> {
        self.colored_places.get(place).map(Vec::as_slice)
    }

    pub fn analysis(&self) -> &AnalysisContext {
        &self.base
    }

    pub fn analysis_mut(&mut self) -> &mut AnalysisContext {
        &mut self.base
    }
}

impl NameResolver for ColoredAnalysisContext {
    fn resolve(&self, identifier: &str, is_place: bool) -> ResolutionResult {
        self.base.resolve(identifier, is_place)
    }

    fn resolve_trace_name(&mut self, identifier: &str, create: bool) -> Result<u32, ContextError> {
        self.base.resolve_trace_name(identifier, create)
    }

    fn report_error(&mut self, error: ContextError) {
        self.base.report_error(error)
    }

    fn errors(&self) -> &[ContextError] {
        self.base.errors()
    }

    fn is_colored(&self) -> bool {
        self.colored_net
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn philosophers() -> ColoredAnalysisContext {
        let base = AnalysisContext::new(["think_0", "think_1"], ["eat_0", "eat_1"]);
        let mut ctx = ColoredAnalysisContext::uncolored(base);
        ctx.add_colored_place("think", 0, "think_0");
        ctx.add_colored_place("think", 1, "think_1");
        ctx.add_colored_transition("eat", "eat_1");
        ctx.add_colored_transition("eat", "eat_0");
        ctx.declare_colored_place("fork");
        ctx
    }

    #[test]
    fn place_callback_runs_once_per_instance_in_order() {
        let ctx = philosophers();
        let mut seen = Vec::new();
        assert!(ctx.resolve_place("think", |name| seen.push(name.to_string())));
        assert_eq!(seen, vec!["think_0", "think_1"]);
    }

    #[test]
    fn transition_order_follows_insertion() {
        let ctx = philosophers();
        let mut seen = Vec::new();
        assert!(ctx.resolve_transition("eat", |name| seen.push(name.clone())));
        let seen: Vec<&str> = seen.iter().map(|name| &**name).collect();
        assert_eq!(seen, vec!["eat_1", "eat_0"]);
    }

    #[test]
    fn empty_family_is_found_without_callbacks() {
        let ctx = philosophers();
        let mut calls = 0;
        assert!(ctx.resolve_place("fork", |_| calls += 1));
        assert_eq!(calls, 0);
        assert_eq!(ctx.place_instances("fork"), Some(&[][..]));
    }

    #[test]
    fn absent_name_is_not_found() {
        let ctx = philosophers();
        let mut calls = 0;
        assert!(!ctx.resolve_place("eat", |_| calls += 1));
        assert!(!ctx.resolve_transition("think", |_| calls += 1));
        assert!(!ctx.resolve_transition("missing", |_| calls += 1));
        assert_eq!(calls, 0);
    }

    #[test]
    fn bindings_are_kept_with_instances() {
        let ctx = philosophers();
        let instances = ctx.place_instances("think").unwrap();
        assert_eq!(instances[1].0, 1);
        assert_eq!(&*instances[1].1, "think_1");
    }

    #[test]
    fn plain_resolution_and_traces_delegate_to_base() {
        let mut ctx = philosophers();
        assert!(ctx.is_colored());
        assert_eq!(NameResolver::resolve(&ctx, "eat_1", false).index(), Some(1));
        assert_eq!(ctx.resolve_trace_name("run", true), Ok(0));
        assert_eq!(ctx.analysis().trace_names().get("run"), Some(0));
    }

    #[test]
    fn prebuilt_maps_are_used_as_given() {
        let mut places = IndexMap::new();
        places.insert(
            Identifier::from("p"),
            vec![(3, Identifier::from("p_3")), (1, Identifier::from("p_1"))],
        );
        let ctx = ColoredAnalysisContext::new(AnalysisContext::default(), places, IndexMap::new());
        let mut seen = Vec::new();
        ctx.resolve_place("p", |name| seen.push(name.to_string()));
        assert_eq!(seen, vec!["p_3", "p_1"]);
        assert!(!ColoredAnalysisContext::uncolored(AnalysisContext::default()).is_colored());
    }
}
