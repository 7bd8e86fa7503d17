//! PQL 分析上下文。
//!
//! * [`AnalysisContext`]：普通网上的名字解析，持有轨迹名表；
//! * [`ColoredAnalysisContext`]：着色网上一个符号名展开为多个具体实例；
//! * [`SimplificationContext`]：在时间预算内构造并缓存状态方程 LP。
use std::fmt;

use thiserror::Error;

pub mod analysis;
pub mod clock;
pub mod colored;
pub mod names;
pub mod simplification;

pub use analysis::{AnalysisContext, ResolutionResult};
pub use clock::{Clock, MonotonicClock};
pub use colored::ColoredAnalysisContext;
pub use names::{Identifier, NameRegistry, TraceNames};
pub use simplification::SimplificationContext;

/// 查询编译期间的用户错误，只中止当前查询。
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("Trace identifier {0} already existed.")]
    DuplicateTraceName(String),
    #[error("Trace identifier {0} does not exist, but is used as a prefix in the query.")]
    UndeclaredTraceName(String),
    #[error("Unable to resolve identifier \"{name}\" as a {kind}")]
    UnresolvedIdentifier { name: String, kind: ElementKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Place,
    Transition,
}

impl ElementKind {
    pub fn from_is_place(is_place: bool) -> Self {
        if is_place {
            ElementKind::Place
        } else {
            ElementKind::Transition
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Place => f.write_str("place"),
            ElementKind::Transition => f.write_str("transition"),
        }
    }
}

/// 查询绑定器看到的名字解析接口，普通与着色上下文均实现。
pub trait NameResolver {
    /// `identifier` 在库所（`is_place`）或迁移编号空间中的偏移。
    fn resolve(&self, identifier: &str, is_place: bool) -> ResolutionResult;

    fn resolve_trace_name(&mut self, identifier: &str, create: bool) -> Result<u32, ContextError>;

    fn report_error(&mut self, error: ContextError);

    fn errors(&self) -> &[ContextError];

    fn is_colored(&self) -> bool {
        false
    }
}
