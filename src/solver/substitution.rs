//! Substitution of provably equal parameters
//!
//! Equations of the exact form `p - q` (coincident end points, horizontal and
//! vertical segments) do not need a Jacobian row: the two parameters are merged
//! with a union-find pass and every group is represented by a single surviving
//! parameter. The others are tagged [`VAR_SUBSTITUTED`] and read through their
//! representative until post-processing writes the final value back.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::error::{Result, SolverError};
use crate::expression::{Equation, EQ_SUBSTITUTED};
use crate::parameters::{IdList, ParamRef, VAR_SUBSTITUTED};

/// One group of equal parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionGroup {
    /// Id of the parameter kept in the system
    pub representative: i64,

    /// Ids of every member, representative included, ascending
    pub members: Vec<i64>,
}

#[derive(Debug, Default)]
struct UnionFind {
    parent: HashMap<i64, i64>,
    size: HashMap<i64, usize>,
}

impl UnionFind {
    fn insert(&mut self, p: i64) {
        self.parent.entry(p).or_insert(p);
        self.size.entry(p).or_insert(1);
    }

    fn find(&mut self, mut p: i64) -> i64 {
        loop {
            let parent = self.parent.get(&p).copied().unwrap_or(p);
            if parent == p {
                return p;
            }
            // path halving
            let grand = self.parent.get(&parent).copied().unwrap_or(parent);
            self.parent.insert(p, grand);
            p = grand;
        }
    }

    fn union(&mut self, p: i64, q: i64) {
        let (pc, qc) = (self.find(p), self.find(q));
        if pc == qc {
            return;
        }
        let size_p = self.size.get(&pc).copied().unwrap_or(1);
        let size_q = self.size.get(&qc).copied().unwrap_or(1);
        let (root, child) = if size_p > size_q { (pc, qc) } else { (qc, pc) };
        self.parent.insert(child, root);
        self.size.insert(root, size_p + size_q);
    }
}

/// Merge parameters bound by `p - q` equations
///
/// Tags the qualifying equations [`EQ_SUBSTITUTED`] and every non
/// representative parameter [`VAR_SUBSTITUTED`], recording its representative
/// id. Within a group the union-find root is kept when it is dragged;
/// otherwise the lowest-id dragged member, and failing that the root.
///
/// # Errors
///
/// `SolverError::RedundantConstraint` when two equations bind the same pair.
pub fn substitute(
    params: &IdList<ParamRef>,
    equations: &mut IdList<Equation>,
    dragged: &BTreeSet<i64>,
) -> Result<Vec<SubstitutionGroup>> {
    let mut pairs = HashSet::new();
    let mut ordered_pairs = Vec::new();
    let mut uf = UnionFind::default();

    for equation in equations.iter_mut() {
        let Some((a, b)) = equation.expr.as_param_difference() else {
            continue;
        };
        let (ia, ib) = (a.id().min(b.id()), a.id().max(b.id()));
        if !pairs.insert((ia, ib)) {
            return Err(SolverError::RedundantConstraint {
                first: ia,
                second: ib,
            });
        }
        ordered_pairs.push((ia, ib));
        equation.tag = EQ_SUBSTITUTED;
    }

    for (ia, ib) in &ordered_pairs {
        uf.insert(*ia);
        uf.insert(*ib);
        uf.union(*ia, *ib);
    }

    let ids: BTreeSet<i64> = ordered_pairs.iter().flat_map(|(a, b)| [*a, *b]).collect();
    let mut by_root: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for id in ids {
        let root = uf.find(id);
        by_root.entry(root).or_default().push(id);
    }

    let mut groups = Vec::with_capacity(by_root.len());
    for (root, members) in by_root {
        let representative = if dragged.contains(&root) {
            root
        } else {
            members
                .iter()
                .copied()
                .find(|id| dragged.contains(id))
                .unwrap_or(root)
        };

        for id in &members {
            if *id == representative {
                continue;
            }
            if let Some(param) = params.find_by_id(*id) {
                param.set_tag(VAR_SUBSTITUTED);
                param.set_substituted(representative);
            }
        }

        debug!(
            representative = representative,
            members = members.len(),
            "substitution group"
        );
        groups.push(SubstitutionGroup {
            representative,
            members,
        });
    }

    Ok(groups)
}
