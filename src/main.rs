//! Command-line driver for the board core, running against the in-memory
//! board instead of the sensor matrix.
//!
//! Usage:
//! `plum_board fen e2e4 e7e5`
//! `plum_board perft 4 [fen]`
//! `plum_board games [--config board.json]`
//! `plum_board show <id> [--config board.json]`
//! `plum_board simulate [--bot w|b] [--seed n] [--config board.json] e2e4 g1f3`
//! `plum_board resume [--config board.json]`

use std::time::Instant;

use log::{info, warn};

use plum_board::config::BoardConfig;
use plum_board::evaluator::evaluator_random::RandomEvaluator;
use plum_board::game_state::chess_types::Color;
use plum_board::game_state::game_state::GameState;
use plum_board::hardware::publisher::LatestBoardState;
use plum_board::hardware::simulated_board::SimulatedBoard;
use plum_board::history::move_history::MoveHistory;
use plum_board::move_generation::legal_move_apply::apply_move;
use plum_board::move_generation::legal_move_generator::validate_move;
use plum_board::move_generation::perft::perft_multi_threaded;
use plum_board::orchestrator::game_orchestrator::{GameOrchestrator, PlayMode};
use plum_board::orchestrator::game_phase::{GameEvent, GamePhase, PendingMove};
use plum_board::utils::long_algebraic::parse_long_algebraic;
use plum_board::utils::render_game_state::render_game_state;

/// Flag values pulled out of the argument list; everything else stays
/// positional.
struct Args {
    positional: Vec<String>,
    config: Option<String>,
    bot: Option<Color>,
    seed: Option<u64>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        positional: Vec::new(),
        config: None,
        bot: None,
        seed: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => args.config = Some(iter.next().ok_or("--config needs a path")?),
            "--bot" => {
                let side = iter.next().ok_or("--bot needs w or b")?;
                let color = side.chars().next().and_then(Color::from_char);
                args.bot = Some(color.ok_or_else(|| format!("unknown side {side}"))?);
            }
            "--seed" => {
                let seed = iter.next().ok_or("--seed needs a number")?;
                args.seed = Some(seed.parse().map_err(|_| format!("bad seed {seed}"))?);
            }
            _ => args.positional.push(arg),
        }
    }
    Ok(args)
}

fn load_config(args: &Args) -> Result<BoardConfig, String> {
    match &args.config {
        Some(path) => BoardConfig::load(path).map_err(|e| e.to_string()),
        None => Ok(BoardConfig::default()),
    }
}

fn open_history(config: &BoardConfig) -> Result<MoveHistory, String> {
    let mut history = MoveHistory::open(&config.storage);
    history.begin().map_err(|e| e.to_string())?;
    Ok(history)
}

fn play_out(moves: &[String]) -> Result<GameState, String> {
    let mut game = GameState::new_game();
    for token in moves {
        let mv = parse_long_algebraic(token).map_err(|e| e.to_string())?;
        validate_move(&game, mv.from, mv.to).map_err(|e| format!("{token}: {e}"))?;
        apply_move(&mut game, mv.from, mv.to, mv.promotion).map_err(|e| e.to_string())?;
    }
    Ok(game)
}

fn cmd_fen(args: &Args) -> Result<(), String> {
    let game = play_out(&args.positional[1..])?;
    println!("{}", render_game_state(&game));
    println!("{}", game.to_fen());
    Ok(())
}

fn cmd_perft(args: &Args) -> Result<(), String> {
    let depth = match args.positional.get(1) {
        Some(depth) => depth.parse::<u8>().map_err(|_| format!("bad depth {depth}"))?,
        None => 4,
    };
    let game = match args.positional.get(2..) {
        Some(fen) if !fen.is_empty() => GameState::from_fen(&fen.join(" ")).map_err(|e| e.to_string())?,
        _ => GameState::new_game(),
    };

    let started = Instant::now();
    let counts = perft_multi_threaded(&game, depth);
    let elapsed_ms = started.elapsed().as_millis();
    println!(
        "depth={depth} nodes={} captures={} ep={} castles={} promotions={} checks={} mates={} elapsed_ms={elapsed_ms}",
        counts.nodes,
        counts.captures,
        counts.en_passant,
        counts.castles,
        counts.promotions,
        counts.checks,
        counts.checkmates
    );
    Ok(())
}

fn cmd_games(args: &Args) -> Result<(), String> {
    let history = open_history(&load_config(args)?)?;
    println!("{}", history.game_list_json().map_err(|e| e.to_string())?);
    Ok(())
}

fn cmd_show(args: &Args) -> Result<(), String> {
    let id = args
        .positional
        .get(1)
        .and_then(|id| id.parse::<u32>().ok())
        .ok_or("show needs a numeric game id")?;
    let history = open_history(&load_config(args)?)?;
    let game = history.load_game(id).map_err(|e| e.to_string())?;

    let moves: Vec<String> = game.moves().into_iter().map(|mv| mv.to_uci()).collect();
    println!("game {id}: {:?} result={:?}", game.mode(), game.result());
    println!("moves: {}", moves.join(" "));
    let last = game.replay_full().map_err(|e| e.to_string())?;
    println!("{}", render_game_state(&last));
    println!("{}", last.to_fen());
    Ok(())
}

fn cmd_resume(args: &Args) -> Result<(), String> {
    let mut history = open_history(&load_config(args)?)?;
    let Some(info) = history.live_game_info() else {
        println!("no live game");
        return Ok(());
    };
    let resumed = history.replay_into_game().map_err(|e| e.to_string())?;
    println!("{info:?}, {} move(s) since last snapshot", resumed.replayed_moves);
    println!("{}", render_game_state(&resumed.state));
    Ok(())
}

/// Physically carries out whatever the LEDs are asking for.
fn perform_pending(hands: &SimulatedBoard, pending: &PendingMove) {
    if pending.captures_on_destination() {
        hands.lift(pending.to);
    }
    hands.slide(pending.from, pending.to);
    if let Some((rook_from, rook_to)) = pending.rook_move {
        hands.slide(rook_from, rook_to);
    }
    if let Some(victim) = pending.en_passant_victim {
        hands.lift(victim);
    }
}

fn report(events: Vec<GameEvent>) {
    for event in events {
        match event {
            GameEvent::Rejected(reason) | GameEvent::EvaluatorFailed(reason) | GameEvent::StorageWarning(reason) => {
                warn!("{reason}")
            }
            other => println!("{other:?}"),
        }
    }
}

fn cmd_simulate(args: &Args) -> Result<(), String> {
    let config = load_config(args)?;
    let mut history = open_history(&config)?;
    let hands = SimulatedBoard::new();
    let mut driver = hands.clone();
    let mut publisher = LatestBoardState::new();
    let viewer = publisher.clone();
    let mut evaluator = match args.seed {
        Some(seed) => RandomEvaluator::with_seed(seed),
        None => RandomEvaluator::new(),
    };

    let mode = match args.bot {
        Some(bot_color) => PlayMode::Bot {
            player_color: bot_color.opposite(),
            depth: config.evaluator.depth,
            evaluator: &mut evaluator,
        },
        None => PlayMode::Moves,
    };
    let mut game = GameOrchestrator::new(&mut driver, &mut publisher, &mut history, mode, config.snapshot_interval);
    game.start_new_game();
    hands.set_physical(game.state().board.occupancy());
    report(game.update());

    let mut moves = args.positional[1..].iter();
    for _ in 0..1024 {
        match game.phase().clone() {
            GamePhase::BotRequesting => report(game.update()),
            GamePhase::BotAnnounced { pending } | GamePhase::AwaitingPhysicalCompletion { pending, .. } => {
                perform_pending(&hands, &pending);
                report(game.update());
            }
            GamePhase::Idle => {
                let Some(token) = moves.next() else { break };
                let mv = parse_long_algebraic(token).map_err(|e| e.to_string())?;
                hands.lift(mv.from);
                report(game.update());
                if game.state().board.piece_at(mv.to).is_some() {
                    hands.lift(mv.to);
                    report(game.update());
                }
                hands.place(mv.to);
                report(game.update());
                if matches!(game.phase(), GamePhase::PieceSelected { .. }) {
                    // Illegal target: put the piece back.
                    hands.slide(mv.to, mv.from);
                    report(game.update());
                }
            }
            GamePhase::AwaitingManualRetry { .. } => {
                if !game.retry_bot_move() {
                    break;
                }
            }
            GamePhase::AwaitingSetup { .. } | GamePhase::PieceSelected { .. } | GamePhase::GameOver { .. } => break,
        }
    }

    println!("{}", render_game_state(game.state()));
    if let Some(view) = viewer.snapshot() {
        println!("{}", view.to_json().map_err(|e| e.to_string())?);
    }
    info!("simulation stopped in {:?}", game.phase());
    Ok(())
}

fn main() -> Result<(), String> {
    env_logger::init();
    let args = parse_args()?;

    match args.positional.first().map(String::as_str) {
        Some("fen") => cmd_fen(&args),
        Some("perft") => cmd_perft(&args),
        Some("games") => cmd_games(&args),
        Some("show") => cmd_show(&args),
        Some("resume") => cmd_resume(&args),
        Some("simulate") => cmd_simulate(&args),
        _ => Err("usage: plum_board <fen|perft|games|show|resume|simulate> [args]".to_owned()),
    }
}
