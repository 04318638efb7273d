//! Weighted A* core on a cost grid. Uses lazy deletion on the frontier: a
//! cell is settled the first time it is popped, and stale heap entries for
//! an already-settled cell are discarded on pop instead of being removed
//! eagerly.

use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;

use grid_util::point::Point;
use log::warn;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::grid::{Connectivity, CostGrid};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Frontier entry. Ordering pops the smallest f-score first; ties on f
/// prefer the smaller g-score, and remaining ties pop in insertion order
/// (`seq` is a monotone counter), making the search fully deterministic.
struct SmallestCostHolder {
    estimated_cost: f64,
    cost: f64,
    index: usize,
    seq: usize,
}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SmallestCostHolder {}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so comparisons are reversed to pop the
        // smallest key. f first, then g, then FIFO.
        match other.estimated_cost.total_cmp(&self.estimated_cost) {
            Ordering::Equal => match other.cost.total_cmp(&self.cost) {
                Ordering::Equal => other.seq.cmp(&self.seq),
                s => s,
            },
            s => s,
        }
    }
}

fn euclidean(a: &Point, b: &Point) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    dx.hypot(dy)
}

fn reverse_path<V, F>(parents: &FxIndexMap<Point, V>, mut parent: F, start: usize) -> Vec<Point>
where
    F: FnMut(&V) -> usize,
{
    let mut path: Vec<Point> = itertools::unfold(start, |i| {
        parents.get_index(*i).map(|(node, value)| {
            *i = parent(value);
            *node
        })
    })
    .collect();
    path.reverse();
    path
}

/// Runs weighted A* from `start` to `goal`. Returns the path in start-to-goal
/// order together with its total traversal cost, or [`None`] when the
/// frontier empties or `expansion_limit` settled expansions are exceeded.
///
/// Endpoints are assumed in-bounds and passable; callers check first.
pub(crate) fn weighted_astar(
    grid: &CostGrid,
    start: Point,
    goal: Point,
    connectivity: Connectivity,
    expansion_limit: Option<usize>,
) -> Option<(Vec<Point>, f64)> {
    let mut seq = 0;
    let mut expansions = 0;
    let mut to_see = BinaryHeap::new();
    to_see.push(SmallestCostHolder {
        estimated_cost: euclidean(&start, &goal),
        cost: 0.0,
        index: 0,
        seq,
    });
    let mut parents: FxIndexMap<Point, (usize, f64)> = FxIndexMap::default();
    parents.insert(start, (usize::MAX, 0.0));
    while let Some(SmallestCostHolder { cost, index, .. }) = to_see.pop() {
        let node = {
            let (node, &(_, c)) = parents.get_index(index).unwrap();
            if *node == goal {
                let path = reverse_path(&parents, |&(p, _)| p, index);
                return Some((path, cost));
            }
            // A cell may sit in the heap several times if a better way to it
            // was found after insertion. Only the entry carrying the best
            // known cost settles the cell; the rest are discarded here.
            if cost > c {
                continue;
            }
            *node
        };
        expansions += 1;
        if let Some(limit) = expansion_limit {
            if expansions > limit {
                warn!("expansion cap of {limit} reached before settling {goal}");
                return None;
            }
        }
        for (successor, move_cost) in grid.successors(&node, connectivity) {
            let new_cost = cost + move_cost;
            let h;
            let n;
            match parents.entry(successor) {
                Vacant(e) => {
                    h = euclidean(e.key(), &goal);
                    n = e.index();
                    e.insert((index, new_cost));
                }
                Occupied(mut e) => {
                    if e.get().1 > new_cost {
                        h = euclidean(e.key(), &goal);
                        n = e.index();
                        e.insert((index, new_cost));
                    } else {
                        continue;
                    }
                }
            }
            seq += 1;
            to_see.push(SmallestCostHolder {
                estimated_cost: new_cost + h,
                cost: new_cost,
                index: n,
                seq,
            });
        }
    }
    None
}
