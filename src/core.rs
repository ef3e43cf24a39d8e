//! Match finder and optimal parser — the core of this crate (`spec.md`
//! §4.3). Converts the variable-length literal/match token selection
//! problem into a single forward dynamic-programming sweep over a DAG of
//! candidate edges, followed by a two-pass path reconstruction.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Sentinel `source` value marking a [`Match`] as a literal token.
pub const LITERAL_SOURCE: usize = usize::MAX;

/// One emitted token: either a literal (`source == LITERAL_SOURCE`) or a
/// back-reference match (`source = destination - distance`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub source: usize,
    pub destination: usize,
    pub length: usize,
}

impl Match {
    pub fn is_literal(&self) -> bool {
        self.source == LITERAL_SOURCE
    }

    /// The back-reference distance of a match token. Panics on a literal;
    /// callers should check [`Match::is_literal`] first.
    pub fn distance(&self) -> usize {
        debug_assert!(!self.is_literal());
        self.destination - self.source
    }
}

const INFINITE_COST: usize = usize::MAX;
const NO_PREDECESSOR: usize = usize::MAX;

/// Per-node scratch record (`spec.md` §3, `NodeMeta`).
///
/// `cost_or_next` plays exactly the dual role the spec describes: during
/// the forward sweep it is "best known cost to reach this node"; the spec's
/// reconstruction phase then overwrites it with a successor index. This
/// implementation instead reconstructs the path with a plain
/// backward-walk-then-reverse over a `Vec` (see [`find_optimal_matches`]),
/// which needs the field for nothing but its first role — the Design Notes
/// explicitly permit this simplification ("or simply use two fields").
#[derive(Clone, Copy)]
struct NodeMeta {
    cost_or_next: usize,
    previous_node_index: usize,
    match_offset: usize,
}

impl NodeMeta {
    const UNVISITED: Self = Self {
        cost_or_next: INFINITE_COST,
        previous_node_index: NO_PREDECESSOR,
        match_offset: 0,
    };
}

/// Mutable view over the scratch array handed to [`CostModel::extra_matches`]
/// so a format's exotic-encoding hook can deposit edges the same way the
/// literal/match sweep does.
pub struct Relaxer<'a> {
    nodes: &'a mut [NodeMeta],
}

impl Relaxer<'_> {
    pub fn total_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn cost_at(&self, node: usize) -> Option<usize> {
        let cost = self.nodes[node].cost_or_next;
        (cost != INFINITE_COST).then_some(cost)
    }

    /// Offer edge `from -> to` with the given `edge_cost` and back-reference
    /// `distance` (0 for literal edges). Updates `to`'s best known path if
    /// `edge_cost` strictly improves it. Ties keep the earlier-found
    /// predecessor (`spec.md` §4.3.2): relaxation is strict `<`, never
    /// `<=`, so a later edge of equal cost never displaces an earlier one.
    pub fn relax(&mut self, from: usize, to: usize, edge_cost: usize, distance: usize) -> bool {
        let Some(from_cost) = self.cost_at(from) else {
            return false;
        };
        let candidate_cost = from_cost.saturating_add(edge_cost);
        if candidate_cost < self.nodes[to].cost_or_next {
            self.nodes[to] = NodeMeta {
                cost_or_next: candidate_cost,
                previous_node_index: from,
                match_offset: distance,
            };
            true
        } else {
            false
        }
    }
}

/// The caller-supplied cost function (`spec.md` §4.3.4, §6).
///
/// `literal_cost` and `match_cost` are called synchronously and must depend
/// only on their arguments. A `match_cost` of `0` means "this
/// `(distance, length)` cannot be represented" and the edge is dropped; a
/// `literal_cost` of `0` is likewise treated as "literals are forbidden",
/// which is the only way [`Error::Unencodable`] can arise.
pub trait CostModel {
    fn literal_cost(&self) -> usize;
    fn match_cost(&self, distance: usize, length: usize) -> usize;

    /// Hook for formats with exotic encodings unreachable by simple
    /// back-reference scanning (`spec.md` §4.3.1, `extra_matches_callback`).
    /// Receives the same data and position the ordinary sweep just
    /// processed, plus write access to the scratch array via `relaxer`.
    /// The default does nothing, matching every format in this crate
    /// (`nlz.h` passes `nullptr` for this callback).
    fn extra_matches(&self, _data: &[u8], _position: usize, _relaxer: &mut Relaxer) {}
}

/// Runs the optimal parser over `data`, treating it as `total_values`
/// consecutive values of `bytes_per_value` bytes each.
///
/// Returns the minimum-total-cost sequence of literal/match tokens whose
/// lengths partition `[0, total_values)`, or [`Error::Unencodable`] if no
/// path exists (only possible under a degenerate cost model) or
/// [`Error::AllocationFailure`] if scratch/output storage could not be
/// allocated.
pub fn find_optimal_matches<C: CostModel>(
    data: &[u8],
    bytes_per_value: usize,
    maximum_match_length: usize,
    maximum_match_distance: usize,
    cost_model: &C,
) -> Result<Vec<Match>> {
    assert!(bytes_per_value > 0);
    let total_values = data.len() / bytes_per_value;

    let mut node_meta: Vec<NodeMeta> = Vec::new();
    node_meta
        .try_reserve_exact(total_values + 1)
        .map_err(|_| Error::AllocationFailure("allocating NodeMeta scratch array"))?;
    node_meta.resize(total_values + 1, NodeMeta::UNVISITED);
    node_meta[0] = NodeMeta {
        cost_or_next: 0,
        previous_node_index: NO_PREDECESSOR,
        match_offset: 0,
    };

    // Hash-chain match finder, byte-granular fast path (every format in
    // this crate uses bytes_per_value == 1). `head[hash]` is the most
    // recent position with that hash; `next[pos]` is the previous position
    // sharing it. Both are populated incrementally during the sweep so a
    // position is only ever matched against earlier positions.
    let use_hash_chains = bytes_per_value == 1;
    let mut head: HashMap<u16, usize> = HashMap::new();
    let mut next: Vec<usize> = if use_hash_chains {
        vec![NO_PREDECESSOR; total_values]
    } else {
        Vec::new()
    };

    let mut best_distance_for_length: Vec<usize> = vec![0; maximum_match_length + 1];

    for i in 0..total_values {
        if node_meta[i].cost_or_next == INFINITE_COST {
            // Unreachable: no point offering edges that can never be taken.
            continue;
        }

        {
            let mut relaxer = Relaxer {
                nodes: &mut node_meta,
            };

            // Literal edge.
            let literal_cost = cost_model.literal_cost();
            if literal_cost != 0 {
                relaxer.relax(i, i + 1, literal_cost, 0);
            }
        }

        // Match edges: nearest distance per achievable length, which is
        // optimal (not merely a safe superset) whenever a format's cost is
        // non-decreasing in distance for fixed length — true of every
        // format in this crate. Formats that need the full
        // O(n * distance * length) naive enumeration can supply a
        // `CostModel` whose `extra_matches` hook injects the remaining
        // edges this fast path skips.
        //
        // The hash-chain walk below is not depth-capped: it follows every
        // same-hash candidate within the window (`spec.md` §4.3.1's window
        // `[i - maximum_match_distance, i)`), stopping only once `distance`
        // exceeds `maximum_match_distance`. A depth cap would let a
        // same-hash-but-short-prefix run of candidates exhaust the cap
        // before a farther, genuinely longer-matching candidate is ever
        // examined, silently dropping edges the optimum needs and breaking
        // §3's "is the minimum over all valid paths" invariant. Worst-case
        // work is therefore `O(n * maximum_match_distance)`, which is no
        // worse than the naive enumeration the spec already budgets for.
        let remaining = total_values - i;
        if remaining >= 2 && maximum_match_length >= 2 {
            let max_len_here = maximum_match_length.min(remaining);
            best_distance_for_length[2..=max_len_here].fill(0);
            let mut observed_max_len = 0;

            if use_hash_chains && bytes_per_value == 1 {
                let byte_i = i; // bytes_per_value == 1: value index == byte index
                let hash_available = byte_i + 2 <= data.len();

                if hash_available {
                    let hash = u16::from_be_bytes([data[byte_i], data[byte_i + 1]]);

                    let mut candidate = head.get(&hash).copied().unwrap_or(NO_PREDECESSOR);
                    while candidate != NO_PREDECESSOR {
                        let distance = byte_i - candidate;
                        if distance > maximum_match_distance {
                            break;
                        }

                        let match_len =
                            common_prefix_len(&data[candidate..], &data[byte_i..], max_len_here);

                        if match_len >= 2 {
                            observed_max_len = observed_max_len.max(match_len);
                            for length in 2..=match_len {
                                if best_distance_for_length[length] == 0 {
                                    best_distance_for_length[length] = distance;
                                }
                            }
                        }

                        candidate = next[candidate];
                    }

                    // Insert the current position for future lookups only
                    // after using the chain to search, so a position is
                    // never matched against itself or the future.
                    next[byte_i] = head.get(&hash).copied().unwrap_or(NO_PREDECESSOR);
                    head.insert(hash, byte_i);
                }
            } else {
                // Naive O(distance * length) fallback for bytes_per_value != 1.
                let window_start = i.saturating_sub(maximum_match_distance);
                for j in (window_start..i).rev() {
                    let match_len = common_prefix_len_values(
                        data,
                        bytes_per_value,
                        j,
                        i,
                        max_len_here,
                    );
                    if match_len >= 2 {
                        let distance = i - j;
                        observed_max_len = observed_max_len.max(match_len);
                        for length in 2..=match_len {
                            if best_distance_for_length[length] == 0 {
                                best_distance_for_length[length] = distance;
                            }
                        }
                    }
                }
            }

            let mut relaxer = Relaxer {
                nodes: &mut node_meta,
            };
            for length in 2..=observed_max_len {
                let distance = best_distance_for_length[length];
                if distance == 0 {
                    continue;
                }
                let cost = cost_model.match_cost(distance, length);
                if cost != 0 {
                    relaxer.relax(i, i + length, cost, distance);
                }
            }
        }

        let mut relaxer = Relaxer {
            nodes: &mut node_meta,
        };
        cost_model.extra_matches(data, i, &mut relaxer);
    }

    if node_meta[total_values].cost_or_next == INFINITE_COST {
        return Err(Error::Unencodable);
    }

    // Reconstruction: walk previous_node_index back to the source, then
    // reverse, then emit one token per traversed edge.
    let mut path_nodes = Vec::new();
    path_nodes
        .try_reserve(total_values + 1)
        .map_err(|_| Error::AllocationFailure("allocating path reconstruction buffer"))?;
    let mut node = total_values;
    loop {
        path_nodes.push(node);
        if node == 0 {
            break;
        }
        node = node_meta[node].previous_node_index;
    }
    path_nodes.reverse();

    let mut matches = Vec::new();
    matches
        .try_reserve(path_nodes.len().saturating_sub(1))
        .map_err(|_| Error::AllocationFailure("allocating output token array"))?;

    for window in path_nodes.windows(2) {
        let (from, to) = (window[0], window[1]);
        let length = to - from;
        if length == 1 && node_meta[to].match_offset == 0 {
            matches.push(Match {
                source: LITERAL_SOURCE,
                destination: from,
                length: 1,
            });
        } else {
            let distance = node_meta[to].match_offset;
            matches.push(Match {
                source: from - distance,
                destination: from,
                length,
            });
        }
    }

    Ok(matches)
}

/// Length of the common prefix of two byte slices, capped at `max`.
fn common_prefix_len(a: &[u8], b: &[u8], max: usize) -> usize {
    let limit = a.len().min(b.len()).min(max);
    let mut len = 0;
    while len < limit && a[len] == b[len] {
        len += 1;
    }
    len
}

/// Like [`common_prefix_len`], but compares `bytes_per_value`-wide chunks
/// starting at value indices `a` and `b` rather than raw bytes, for the
/// `bytes_per_value != 1` naive fallback.
fn common_prefix_len_values(
    data: &[u8],
    bytes_per_value: usize,
    a: usize,
    b: usize,
    max: usize,
) -> usize {
    let mut len = 0;
    while len < max {
        let a_start = (a + len) * bytes_per_value;
        let b_start = (b + len) * bytes_per_value;
        if b_start + bytes_per_value > data.len() {
            break;
        }
        if data[a_start..a_start + bytes_per_value] != data[b_start..b_start + bytes_per_value] {
            break;
        }
        len += 1;
    }
    len
}
