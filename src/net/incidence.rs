//! 输入、输出及抑制弧关系的邻接矩阵封装，按库所分行、按迁移分列。
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::net::ids::{PlaceId, TransitionId};
use crate::net::index_vec::{Idx, IndexVec};

type SmallRow<T> = SmallVec<[T; 4]>;

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Incidence<T> {
    rows: IndexVec<PlaceId, SmallRow<T>>,
    cols: usize,
}

impl<T> Incidence<T>
where
    T: Clone,
{
    pub fn new(places: usize, transitions: usize, default: T) -> Self {
        let mut rows = IndexVec::new();
        for _ in 0..places {
            rows.push(SmallRow::from_elem(default.clone(), transitions));
        }
        Self {
            rows,
            cols: transitions,
        }
    }

    pub fn push_place_with_default(&mut self, default: T) -> PlaceId {
        let row = SmallRow::from_elem(default, self.cols);
        self.rows.push(row)
    }

    pub fn push_transition_with_default(&mut self, default: T) -> TransitionId {
        let next = self.cols;
        for row in self.rows.iter_mut() {
            row.push(default.clone());
        }
        self.cols += 1;
        TransitionId::from_usize(next)
    }

    pub fn places(&self) -> usize {
        self.rows.len()
    }

    pub fn transitions(&self) -> usize {
        self.cols
    }

    pub fn set(&mut self, place: PlaceId, transition: TransitionId, value: T) {
        self.rows[place][transition.index()] = value;
    }

    pub fn get(&self, place: PlaceId, transition: TransitionId) -> &T {
        &self.rows[place][transition.index()]
    }

    pub fn get_mut(&mut self, place: PlaceId, transition: TransitionId) -> &mut T {
        &mut self.rows[place][transition.index()]
    }

    /// 迁移 `transition` 对应的整列，按库所编号升序。
    pub fn column(&self, transition: TransitionId) -> impl Iterator<Item = (PlaceId, &T)> {
        self.rows
            .iter_enumerated()
            .map(move |(place, row)| (place, &row[transition.index()]))
    }

    pub fn rows(&self) -> &IndexVec<PlaceId, SmallRow<T>> {
        &self.rows
    }
}

impl<T> fmt::Debug for Incidence<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Incidence")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growing_keeps_rows_rectangular() {
        let mut matrix = Incidence::new(1, 0, 0u64);
        let t0 = matrix.push_transition_with_default(0);
        let p1 = matrix.push_place_with_default(0);
        let t1 = matrix.push_transition_with_default(0);
        matrix.set(p1, t1, 3);

        assert_eq!(matrix.places(), 2);
        assert_eq!(matrix.transitions(), 2);
        assert!(matrix.rows().iter().all(|row| row.len() == 2));
        assert_eq!(*matrix.get(p1, t0), 0);
        assert_eq!(*matrix.get(p1, t1), 3);
    }

    #[test]
    fn column_walks_places_in_order() {
        let mut matrix = Incidence::new(3, 2, false);
        let t = TransitionId::new(1);
        matrix.set(PlaceId::new(2), t, true);
        matrix.set(PlaceId::new(0), t, true);

        let set: Vec<_> = matrix
            .column(t)
            .filter(|(_, flag)| **flag)
            .map(|(place, _)| place)
            .collect();
        assert_eq!(set, vec![PlaceId::new(0), PlaceId::new(2)]);
    }
}
