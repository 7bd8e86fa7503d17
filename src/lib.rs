//! PQL 分析上下文：名字解析与状态方程 LP 基础构造。
#![warn(non_snake_case)]

pub mod config;
pub mod context;
pub mod lp;
pub mod net;

pub use config::ReductionConfig;
pub use context::{
    AnalysisContext, ColoredAnalysisContext, ContextError, NameResolver, ResolutionResult,
    SimplificationContext,
};
pub use lp::{Bound, LinearProgram, SparseLp};
