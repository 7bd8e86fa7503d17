//! 分析上下文所依赖的只读网能力。
//!
//! 上下文层只通过本 trait 观察网结构：库所/迁移数量、按库所编号升序排列的
//! 前集与后集、以及单条弧的权值查询。任何能给出这些信息的网表示都可以直接
//! 交给 [`crate::context::SimplificationContext`] 构造状态方程 LP。
use crate::net::ids::{PlaceId, TransitionId};
use crate::net::structure::{ArcEntry, Weight};

pub trait PetriNet {
    fn number_of_places(&self) -> usize;

    fn number_of_transitions(&self) -> usize;

    /// 流入 `transition` 的弧，按库所编号严格升序。
    fn preset(&self, transition: TransitionId) -> impl Iterator<Item = ArcEntry>;

    /// 从 `transition` 流出的弧，按库所编号严格升序。
    fn postset(&self, transition: TransitionId) -> impl Iterator<Item = ArcEntry>;

    /// 输出弧权 `Post[p, t]`，不存在时为 0。
    fn out_arc(&self, transition: TransitionId, place: PlaceId) -> Weight;

    /// 输入弧权 `Pre[p, t]`；抑制弧不消耗托肯，按 0 计。
    fn in_arc(&self, place: PlaceId, transition: TransitionId) -> Weight;

    fn place_name(&self, place: PlaceId) -> &str;

    fn transition_name(&self, transition: TransitionId) -> &str;
}
