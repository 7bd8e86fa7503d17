//! 运行时: 可发生集与发生语义，以及 [`PetriNet`] 能力的矩阵实现.
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::net::ids::{PlaceId, TransitionId};
use crate::net::incidence::Incidence;
use crate::net::index_vec::{Idx, IndexVec};
use crate::net::petri::PetriNet;
use crate::net::structure::{ArcEntry, Marking, Place, Transition, Weight};

#[derive(Debug, Error)]
pub enum FireError {
    #[error("transition {0:?} is out of bounds")]
    OutOfBounds(TransitionId),
    #[error("transition {0:?} is not enabled under the supplied marking")]
    NotEnabled(TransitionId),
    #[error("token count overflow at place {place:?} while firing {transition:?}")]
    Overflow {
        transition: TransitionId,
        place: PlaceId,
    },
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Net {
    pub places: IndexVec<PlaceId, Place>,
    pub transitions: IndexVec<TransitionId, Transition>,
    pub pre: Incidence<Weight>,
    pub post: Incidence<Weight>,
    /// 为真时 `pre` 中的权值是抑制阈值而非消耗量。
    pub inhibitor: Incidence<bool>,
}

impl fmt::Debug for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Net")
            .field("places", &self.places)
            .field("transitions", &self.transitions)
            .field("pre", &self.pre)
            .field("post", &self.post)
            .finish()
    }
}

impl Net {
    pub fn empty() -> Self {
        Self {
            places: IndexVec::new(),
            transitions: IndexVec::new(),
            pre: Incidence::new(0, 0, 0),
            post: Incidence::new(0, 0, 0),
            inhibitor: Incidence::new(0, 0, false),
        }
    }

    pub fn add_place(&mut self, place: Place) -> PlaceId {
        let place_id = self.places.push(place);
        self.pre.push_place_with_default(0);
        self.post.push_place_with_default(0);
        self.inhibitor.push_place_with_default(false);
        place_id
    }

    pub fn add_transition(&mut self, transition: Transition) -> TransitionId {
        let transition_id = self.transitions.push(transition);
        self.pre.push_transition_with_default(0);
        self.post.push_transition_with_default(0);
        self.inhibitor.push_transition_with_default(false);
        transition_id
    }

    pub fn set_input_weight(&mut self, place: PlaceId, transition: TransitionId, weight: Weight) {
        self.pre.set(place, transition, weight);
        self.inhibitor.set(place, transition, false);
    }

    pub fn set_output_weight(&mut self, place: PlaceId, transition: TransitionId, weight: Weight) {
        self.post.set(place, transition, weight);
    }

    /// 输入弧: place -> transition
    pub fn add_input_arc(&mut self, place: PlaceId, transition: TransitionId, weight: Weight) {
        if weight == 0 {
            return;
        }
        let was_inhibitor = self.is_inhibitor_arc(place, transition);
        self.inhibitor.set(place, transition, false);
        let entry = self.pre.get_mut(place, transition);
        // 抑制阈值不是消耗量，换成普通输入弧时从零累加
        if was_inhibitor {
            *entry = 0;
        }
        *entry += weight;
    }

    /// 输出弧: transition -> place
    pub fn add_output_arc(&mut self, place: PlaceId, transition: TransitionId, weight: Weight) {
        if weight == 0 {
            return;
        }
        let entry = self.post.get_mut(place, transition);
        *entry += weight;
    }

    /// 抑制弧: `M[place] >= threshold` 时禁止 `transition`. 覆盖同一位置上的普通输入弧.
    pub fn add_inhibitor_arc(
        &mut self,
        place: PlaceId,
        transition: TransitionId,
        threshold: Weight,
    ) {
        if threshold == 0 {
            return;
        }
        self.pre.set(place, transition, threshold);
        self.inhibitor.set(place, transition, true);
    }

    pub fn places_len(&self) -> usize {
        self.places.len()
    }

    pub fn transitions_len(&self) -> usize {
        self.transitions.len()
    }

    pub fn initial_marking(&self) -> Marking {
        Marking(IndexVec::from(
            self.places.iter().map(|p| p.tokens).collect::<Vec<_>>(),
        ))
    }

    pub fn is_inhibitor_arc(&self, place: PlaceId, transition: TransitionId) -> bool {
        *self.inhibitor.get(place, transition)
    }

    pub fn enabled_transitions(&self, marking: &Marking) -> Vec<TransitionId> {
        self.transitions
            .indices()
            .filter(|&transition| self.is_transition_enabled(transition, marking))
            .collect()
    }

    pub fn fire_transition(
        &self,
        marking: &Marking,
        transition: TransitionId,
    ) -> Result<Marking, FireError> {
        if transition.index() >= self.transitions_len() {
            return Err(FireError::OutOfBounds(transition));
        }
        if !self.is_transition_enabled(transition, marking) {
            return Err(FireError::NotEnabled(transition));
        }

        let mut next = marking.clone();

        for arc in self.preset(transition).filter(|arc| !arc.inhibitor) {
            let tokens = next.tokens_mut(arc.place);
            *tokens = tokens
                .checked_sub(arc.tokens)
                .ok_or(FireError::NotEnabled(transition))?;
        }

        for arc in self.postset(transition) {
            let tokens = next.tokens_mut(arc.place);
            *tokens = tokens
                .checked_add(arc.tokens)
                .ok_or(FireError::Overflow {
                    transition,
                    place: arc.place,
                })?;
        }

        Ok(next)
    }

    fn is_transition_enabled(&self, transition: TransitionId, marking: &Marking) -> bool {
        if transition.index() >= self.transitions_len() {
            return false;
        }
        self.preset(transition).all(|arc| {
            let tokens = marking.tokens(arc.place);
            if arc.inhibitor {
                tokens < arc.tokens
            } else {
                tokens >= arc.tokens
            }
        })
    }
}

impl Default for Net {
    fn default() -> Self {
        Self::empty()
    }
}

impl PetriNet for Net {
    fn number_of_places(&self) -> usize {
        self.places_len()
    }

    fn number_of_transitions(&self) -> usize {
        self.transitions_len()
    }

    fn preset(&self, transition: TransitionId) -> impl Iterator<Item = ArcEntry> {
        self.pre
            .column(transition)
            .zip(self.inhibitor.column(transition))
            .filter(|((_, weight), _)| **weight > 0)
            .map(|((place, weight), (_, inhibitor))| ArcEntry {
                place,
                tokens: *weight,
                inhibitor: *inhibitor,
            })
    }

    fn postset(&self, transition: TransitionId) -> impl Iterator<Item = ArcEntry> {
        self.post
            .column(transition)
            .filter(|(_, weight)| **weight > 0)
            .map(|(place, weight)| ArcEntry::new(place, *weight))
    }

    fn out_arc(&self, transition: TransitionId, place: PlaceId) -> Weight {
        *self.post.get(place, transition)
    }

    fn in_arc(&self, place: PlaceId, transition: TransitionId) -> Weight {
        if self.is_inhibitor_arc(place, transition) {
            0
        } else {
            *self.pre.get(place, transition)
        }
    }

    fn place_name(&self, place: PlaceId) -> &str {
        &self.places[place].name
    }

    fn transition_name(&self, transition: TransitionId) -> &str {
        &self.transitions[transition].name
    }
}
