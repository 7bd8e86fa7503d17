//! # Petri 网结构（Place/Transition Net）
//!
//! 设库所集合 `P` 与迁移集合 `T`。定义输入/输出映射 `Pre, Post ∈ ℕ^{|P|×|T|}`，
//! 迁移效应矩阵 `C = Post - Pre`。对任意标识 `M ∈ ℕ^{|P|}`：
//!
//! * 迁移 `t` **可激发** 当且仅当 `∀p: M[p] ≥ Pre[p, t]`，且对所有抑制弧 `(p, t)`
//!   有 `M[p] < θ[p, t]`（阈值 `θ` 存放在 `Pre` 中）；
//! * 发射后 `M' = M + C[:, t]`，抑制弧不参与托肯流动。
//!
//! 上下文层只依赖 [`PetriNet`] 能力；[`Net`] 是基于邻接矩阵的一个实现。
//!
//! ## 示例
//!
//! ```rust
//! use pql_context::net::*;
//!
//! let mut net = Net::empty();
//! let p0 = net.add_place(Place::new("p0", 1));
//! let p1 = net.add_place(Place::new("p1", 0));
//! let t0 = net.add_transition(Transition::new("t0"));
//!
//! net.add_input_arc(p0, t0, 1);
//! net.add_output_arc(p1, t0, 1);
//!
//! let marking = net.initial_marking();
//! assert_eq!(net.enabled_transitions(&marking), vec![t0]);
//! let next = net.fire_transition(&marking, t0).unwrap();
//! assert_eq!(next.tokens(p0), 0);
//! assert_eq!(next.tokens(p1), 1);
//! ```

pub mod core;
pub mod ids;
pub mod incidence;
pub mod index_vec;
pub mod petri;
pub mod structure;

pub use self::core::{FireError, Net};
pub use ids::{PlaceId, TransitionId};
pub use incidence::Incidence;
pub use index_vec::{Idx, IndexVec};
pub use petri::PetriNet;
pub use structure::{ArcEntry, Marking, Place, Transition, Weight};
