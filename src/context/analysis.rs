//! 普通（非着色）网上的名字解析。
use crate::context::names::{Identifier, NameRegistry, TraceNames};
use crate::context::{ContextError, ElementKind, NameResolver};
use crate::net::ids::{PlaceId, TransitionId};
use crate::net::index_vec::Idx;
use crate::net::petri::PetriNet;

/// 解析结果：命中时 `offset` 为元素编号，未命中时为 -1。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionResult {
    pub success: bool,
    pub offset: i64,
}

impl ResolutionResult {
    pub const NOT_FOUND: Self = Self {
        success: false,
        offset: -1,
    };

    pub fn found(index: u32) -> Self {
        Self {
            success: true,
            offset: i64::from(index),
        }
    }

    pub fn index(self) -> Option<u32> {
        if self.success {
            u32::try_from(self.offset).ok()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    place_names: NameRegistry,
    transition_names: NameRegistry,
    place_count: usize,
    transition_count: usize,
    trace_names: TraceNames,
    errors: Vec<ContextError>,
}

impl AnalysisContext {
    /// 名字按网的编号顺序给出：第 i 个库所名解析为 `i`。重名只保留最早的编号。
    pub fn new<P, T>(place_names: P, transition_names: T) -> Self
    where
        P: IntoIterator,
        P::Item: Into<Identifier>,
        T: IntoIterator,
        T::Item: Into<Identifier>,
    {
        let (place_names, place_count) = NameRegistry::positional(place_names);
        let (transition_names, transition_count) = NameRegistry::positional(transition_names);
        Self {
            place_names,
            transition_names,
            place_count,
            transition_count,
            trace_names: TraceNames::new(),
            errors: Vec::new(),
        }
    }

    pub fn from_net<N: PetriNet>(net: &N) -> Self {
        let places = (0..net.number_of_places())
            .map(|idx| Identifier::from(net.place_name(PlaceId::from_usize(idx))));
        let transitions = (0..net.number_of_transitions())
            .map(|idx| Identifier::from(net.transition_name(TransitionId::from_usize(idx))));
        Self::new(places, transitions)
    }

    pub fn resolve(&self, identifier: &str, is_place: bool) -> ResolutionResult {
        let map = if is_place {
            &self.place_names
        } else {
            &self.transition_names
        };
        map.get(identifier)
            .map_or(ResolutionResult::NOT_FOUND, ResolutionResult::found)
    }

    /// 供绑定器使用：未命中即视为该查询的错误。
    pub fn require(&self, identifier: &str, is_place: bool) -> Result<u32, ContextError> {
        self.resolve(identifier, is_place)
            .index()
            .ok_or_else(|| ContextError::UnresolvedIdentifier {
                name: identifier.to_owned(),
                kind: ElementKind::from_is_place(is_place),
            })
    }

    pub fn resolve_trace_name(&mut self, identifier: &str, create: bool) -> Result<u32, ContextError> {
        self.trace_names.resolve(identifier, create)
    }

    pub fn trace_names(&self) -> &TraceNames {
        &self.trace_names
    }

    pub fn report_error(&mut self, error: ContextError) {
        log::debug!("query error: {error}");
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[ContextError] {
        &self.errors
    }

    pub fn number_of_places(&self) -> usize {
        self.place_count
    }

    pub fn number_of_transitions(&self) -> usize {
        self.transition_count
    }
}

impl NameResolver for AnalysisContext {
    fn resolve(&self, identifier: &str, is_place: bool) -> ResolutionResult {
        AnalysisContext::resolve(self, identifier, is_place)
    }

    fn resolve_trace_name(&mut self, identifier: &str, create: bool) -> Result<u32, ContextError> {
        AnalysisContext::resolve_trace_name(self, identifier, create)
    }

    fn report_error(&mut self, error: ContextError) {
        AnalysisContext::report_error(self, error)
    }

    fn errors(&self) -> &[ContextError] {
        AnalysisContext::errors(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{Net, Place, Transition};

    fn context() -> AnalysisContext {
        AnalysisContext::new(["p0", "p1", "shared"], ["t0", "shared"])
    }

    #[test]
    fn hit_returns_offset() {
        let ctx = context();
        assert_eq!(ctx.resolve("p1", true), ResolutionResult::found(1));
        assert_eq!(ctx.resolve("t0", false).index(), Some(0));
    }

    #[test]
    fn miss_returns_sentinel() {
        let ctx = context();
        let result = ctx.resolve("nope", true);
        assert!(!result.success);
        assert_eq!(result.offset, -1);
        assert_eq!(result.index(), None);
    }

    #[test]
    fn place_and_transition_spaces_are_independent() {
        let ctx = context();
        assert!(!ctx.resolve("p0", false).success);
        assert!(!ctx.resolve("t0", true).success);
        assert_eq!(ctx.resolve("shared", true).index(), Some(2));
        assert_eq!(ctx.resolve("shared", false).index(), Some(1));
    }

    #[test]
    fn require_reports_kind() {
        let ctx = context();
        let err = ctx.require("p0", false).unwrap_err();
        assert_eq!(
            err,
            ContextError::UnresolvedIdentifier {
                name: "p0".into(),
                kind: ElementKind::Transition
            }
        );
        assert_eq!(
            err.to_string(),
            "Unable to resolve identifier \"p0\" as a transition"
        );
    }

    #[test]
    fn failed_trace_query_does_not_disturb_next_one() {
        let mut ctx = context();
        ctx.resolve_trace_name("A", true).unwrap();
        let err = ctx.resolve_trace_name("B", false).unwrap_err();
        ctx.report_error(err.clone());

        assert_eq!(ctx.errors(), &[err]);
        assert_eq!(ctx.trace_names().len(), 1);
        assert_eq!(ctx.resolve_trace_name("B", true), Ok(1));
        assert_eq!(ctx.resolve_trace_name("A", false), Ok(0));
    }

    #[test]
    fn from_net_uses_net_indices() {
        let mut net = Net::empty();
        net.add_place(Place::new("idle", 1));
        net.add_place(Place::new("busy", 0));
        net.add_transition(Transition::new("start"));

        let ctx = AnalysisContext::from_net(&net);
        assert_eq!(ctx.resolve("busy", true).index(), Some(1));
        assert_eq!(ctx.resolve("start", false).index(), Some(0));
        assert_eq!(ctx.number_of_places(), 2);
        assert_eq!(ctx.number_of_transitions(), 1);
    }

    #[test]
    fn duplicate_name_does_not_shift_later_indices() {
        let mut net = Net::empty();
        for name in ["a", "b", "a", "c"] {
            net.add_place(Place::new(name, 0));
        }
        let d = net.add_place(Place::new("d", 0));

        let ctx = AnalysisContext::from_net(&net);
        assert_eq!(ctx.resolve("a", true).index(), Some(0));
        assert_eq!(ctx.resolve("c", true).index(), Some(3));
        assert_eq!(ctx.resolve("d", true).index(), Some(d.index() as u32));
        assert_eq!(ctx.number_of_places(), 5);
    }

    #[test]
    fn resolver_trait_defaults_to_uncolored() {
        let ctx = context();
        let resolver: &dyn NameResolver = &ctx;
        assert!(!resolver.is_colored());
        assert!(resolver.resolve("p0", true).success);
    }
}
