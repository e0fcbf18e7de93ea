//! Invariant checks over randomly played legal games.

use quantum_tictactoe::{GameEngine, GameStatus, InvariantSet, Move, QuantumInvariants};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Plays random legal moves until the game ends.
fn play_out(seed: u64) -> GameEngine {
    let mut engine = GameEngine::with_seed(seed);
    let mut picker = ChaCha20Rng::seed_from_u64(seed.wrapping_add(1000));

    for _ in 0..200 {
        if engine.status() != GameStatus::InProgress {
            return engine;
        }
        let legal = engine.legal_moves();
        assert!(!legal.is_empty(), "game in progress with no legal move");

        let player = engine.to_move();
        let turn = engine.expected_turn();
        let choice = picker.gen_range(0..legal.classical.len() + legal.quantum.len());
        let mv = match legal.classical.get(choice) {
            Some(&square) => Move::classical(player, square, turn),
            None => {
                let [a, b] = legal.quantum[choice - legal.classical.len()];
                Move::quantum(player, a, b, turn)
            }
        };

        let len = engine.move_history().len();
        if let Err(e) = engine.commit(mv) {
            panic!("listed move {} rejected: {}", mv, e);
        }
        assert_eq!(engine.move_history().len(), len + 1);
        assert!(QuantumInvariants::check_all(engine.state()).is_ok());
    }
    panic!("game with seed {} did not finish", seed);
}

#[test]
fn test_random_games_keep_invariants() {
    for seed in 0..64 {
        let engine = play_out(seed);
        assert!(matches!(engine.status(), GameStatus::Finished(_)));
        assert!(engine.legal_moves().is_empty());
    }
}

#[test]
fn test_random_games_are_reproducible() {
    for seed in [3, 17, 99] {
        let first = play_out(seed);
        let second = play_out(seed);
        assert_eq!(first.move_history(), second.move_history());
        assert_eq!(first.current_board(), second.current_board());
        assert_eq!(first.status(), second.status());
    }
}

#[test]
fn test_resolved_squares_never_revert() {
    let engine = play_out(7);
    let history = engine.move_history().to_vec();

    let mut replayed = GameEngine::with_seed(7);
    let mut resolved = [false; 9];
    for mv in history {
        replayed.commit(mv).unwrap();
        let board = replayed.current_board();
        for (pos, was_resolved) in resolved.iter_mut().enumerate() {
            let now = board.get(pos).is_some_and(|sq| sq.is_resolved());
            assert!(now || !*was_resolved, "square {} reverted", pos);
            *was_resolved = now;
        }
    }
}
