//! 状态方程 LP 松弛的构造与缓存。
//!
//! 以迁移发射次数 `x ∈ ℝ^{|T|}_{≥0}` 为变量，对每个库所 `p` 要求
//! `M[p] + Σ_t C[p, t]·x_t ≥ 0`，其中 `C = Post - Pre`（抑制弧不计入）。
//! 满足该条件是从 `M` 出发可达的必要条件，因此 LP 不可行即可排除目标标识。
//!
//! 基础 LP 布局（0 号行列保留不用）：
//!
//! * 列 `t + 1`：迁移 `t` 的效应列；
//! * 行 `p + 1`：库所 `p` 的状态方程行，下界 `-M[p]`，上界 `+∞`；
//! * 行 `|P| + 1 + p`：按 `out_arc - in_arc` 逐项重算的效应行，下界 `0`。
//!
//! 基础 LP 首次使用时构造并缓存；之后每次调用都返回缓存的独立副本，调用方在副本上
//! 追加目标相关的行列不会影响缓存。构造在每一列、每一行之后检查时间预算，超时则
//! 丢弃半成品、不缓存任何内容，下一次调用重新开始。
use std::cell::RefCell;

use itertools::{EitherOrBoth, Itertools};

use crate::config::ReductionConfig;
use crate::context::clock::{Clock, MonotonicClock};
use crate::lp::{Bound, LinearProgram, LpError, SparseLp};
use crate::net::ids::{PlaceId, TransitionId};
use crate::net::index_vec::Idx;
use crate::net::petri::PetriNet;
use crate::net::structure::{ArcEntry, Weight};

pub struct SimplificationContext<'a, N, L = SparseLp, C = MonotonicClock> {
    net: &'a N,
    marking: &'a [Weight],
    lp_timeout: u32,
    potency_timeout: u32,
    negated: bool,
    clock: C,
    base_lp: RefCell<Option<L>>,
}

/// 构造中断的原因，只在本模块内用于日志。
enum BuildAbort {
    Timeout { stage: &'static str, done: usize },
    Allocation,
    MarkingLength { expected: usize, found: usize },
    Lp(LpError),
}

impl From<LpError> for BuildAbort {
    fn from(err: LpError) -> Self {
        BuildAbort::Lp(err)
    }
}

impl<'a, N, L> SimplificationContext<'a, N, L, MonotonicClock>
where
    N: PetriNet,
    L: LinearProgram,
{
    pub fn new(net: &'a N, marking: &'a [Weight], lp_timeout: u32, potency_timeout: u32) -> Self {
        Self::with_clock(
            net,
            marking,
            lp_timeout,
            potency_timeout,
            MonotonicClock::start(),
        )
    }

    pub fn with_config(net: &'a N, marking: &'a [Weight], config: &ReductionConfig) -> Self {
        Self::new(net, marking, config.lp_timeout, config.potency_timeout)
    }
}

impl<'a, N, L, C> SimplificationContext<'a, N, L, C>
where
    N: PetriNet,
    L: LinearProgram,
    C: Clock,
{
    pub fn with_clock(
        net: &'a N,
        marking: &'a [Weight],
        lp_timeout: u32,
        potency_timeout: u32,
        clock: C,
    ) -> Self {
        Self {
            net,
            marking,
            lp_timeout,
            potency_timeout,
            negated: false,
            clock,
            base_lp: RefCell::new(None),
        }
    }

    pub fn net(&self) -> &'a N {
        self.net
    }

    pub fn marking(&self) -> &'a [Weight] {
        self.marking
    }

    pub fn number_of_places(&self) -> usize {
        self.net.number_of_places()
    }

    pub fn number_of_transitions(&self) -> usize {
        self.net.number_of_transitions()
    }

    pub fn negated(&self) -> bool {
        self.negated
    }

    pub fn set_negated(&mut self, negated: bool) {
        self.negated = negated;
    }

    pub fn lp_timeout(&self) -> u32 {
        self.lp_timeout
    }

    pub fn potency_timeout(&self) -> u32 {
        self.potency_timeout
    }

    /// 自上下文创建以来的秒数（微秒精度）。
    pub fn reduction_time(&self) -> f64 {
        self.clock.elapsed().as_micros() as f64 * 0.000001
    }

    /// LP 预算是否已用完；构造过程中每个检查点都会轮询。
    pub fn timeout(&self) -> bool {
        self.clock.elapsed().as_secs() >= u64::from(self.lp_timeout)
    }

    pub fn potency_timeout_expired(&self) -> bool {
        self.clock.elapsed().as_secs() >= u64::from(self.potency_timeout)
    }

    /// 基础 LP 是否已构造并缓存。
    pub fn has_base_lp(&self) -> bool {
        self.base_lp.borrow().is_some()
    }

    /// 返回基础 LP 的独立副本，首次调用时构造。
    ///
    /// 构造前或构造中超时、后端无法分配问题或标识长度与网不符时返回 `None`，且不缓存任何内容。
    pub fn make_base_lp(&self) -> Option<L> {
        let mut cached = self.base_lp.borrow_mut();
        if cached.is_none() {
            *cached = self.build_base();
        } else {
            log::debug!("lp: reusing cached base");
        }
        cached.as_ref().map(L::copy)
    }

    fn build_base(&self) -> Option<L> {
        match self.try_build_base() {
            Ok(lp) => {
                log::info!(
                    "lp: base built with {} rows and {} columns in {:.6}s",
                    lp.num_rows(),
                    lp.num_cols(),
                    self.reduction_time()
                );
                Some(lp)
            }
            Err(BuildAbort::Timeout { stage, done }) => {
                log::warn!("lp: construction timeout during {stage} after {done} steps");
                None
            }
            Err(BuildAbort::Allocation) => {
                log::warn!("lp: unable to allocate base problem");
                None
            }
            Err(BuildAbort::MarkingLength { expected, found }) => {
                log::error!("lp: marking covers {found} places but the net has {expected}");
                None
            }
            Err(BuildAbort::Lp(err)) => {
                log::error!("lp: base construction rejected: {err}");
                None
            }
        }
    }

    fn try_build_base(&self) -> Result<L, BuildAbort> {
        if self.timeout() {
            return Err(BuildAbort::Timeout {
                stage: "setup",
                done: 0,
            });
        }

        let n_places = self.net.number_of_places();
        let n_transitions = self.net.number_of_transitions();
        if self.marking.len() != n_places {
            return Err(BuildAbort::MarkingLength {
                expected: n_places,
                found: self.marking.len(),
            });
        }

        let mut lp = L::create().ok_or(BuildAbort::Allocation)?;

        lp.add_cols(n_transitions + 1);
        lp.add_rows(n_places + 1);

        let mut rows = Vec::with_capacity(n_places);
        let mut values = Vec::with_capacity(n_places);
        for t in 0..n_transitions {
            let transition = TransitionId::from_usize(t);
            rows.clear();
            values.clear();
            for (place, coefficient) in self.effect_column(transition) {
                rows.push(place.lp_index());
                values.push(coefficient);
            }
            lp.set_mat_col(transition.lp_index(), &rows, &values)?;
            if self.timeout() {
                return Err(BuildAbort::Timeout {
                    stage: "columns",
                    done: t + 1,
                });
            }
        }

        for (p, &tokens) in self.marking.iter().enumerate() {
            let place = PlaceId::from_usize(p);
            lp.set_row_bounds(place.lp_index(), Bound::Lower(0.0 - tokens as f64))?;
            if self.timeout() {
                return Err(BuildAbort::Timeout {
                    stage: "state equation rows",
                    done: p + 1,
                });
            }
        }

        let first = lp.add_rows(n_places);
        let mut cols = Vec::with_capacity(n_transitions);
        for p in 0..n_places {
            let place = PlaceId::from_usize(p);
            cols.clear();
            values.clear();
            for t in 0..n_transitions {
                let transition = TransitionId::from_usize(t);
                let out = self.net.out_arc(transition, place);
                let into = self.net.in_arc(place, transition);
                if out != into {
                    cols.push(transition.lp_index());
                    values.push(out as f64 - into as f64);
                }
            }
            lp.set_mat_row(first + p, &cols, &values)?;
            lp.set_row_bounds(first + p, Bound::Lower(0.0))?;
            if self.timeout() {
                return Err(BuildAbort::Timeout {
                    stage: "effect rows",
                    done: p + 1,
                });
            }
        }

        Ok(lp)
    }

    /// 迁移的效应列：前集与后集按库所编号归并，同一库所合成一个系数。
    fn effect_column(&self, transition: TransitionId) -> impl Iterator<Item = (PlaceId, f64)> {
        self.net
            .preset(transition)
            .merge_join_by(self.net.postset(transition), |pre, post| {
                pre.place.cmp(&post.place)
            })
            .map(|arcs| match arcs {
                EitherOrBoth::Left(pre) => (pre.place, 0.0 - consumed(&pre)),
                EitherOrBoth::Right(post) => (post.place, post.tokens as f64),
                EitherOrBoth::Both(pre, post) => {
                    (pre.place, post.tokens as f64 - consumed(&pre))
                }
            })
    }
}

fn consumed(arc: &ArcEntry) -> f64 {
    if arc.inhibitor {
        0.0
    } else {
        arc.tokens as f64
    }
}
