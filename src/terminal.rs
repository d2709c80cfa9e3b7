//! Line-oriented terminal host.
//!
//! Reads commands from stdin and delivers countdown ticks and computer
//! turns through a [`TimerQueue`], racing both with `tokio::select!`.
//! Boards are flushed to the profile after every step.

use anyhow::Result;
use football_quiz::{
    BingoBoard, BingoCell, BingoEvent, BingoSession, CommandOutcome, Fired, GameConfig, Mark,
    PowerUpKind, ProfileService, QuestionRound, Resolution, SpecialCell, TicTacToeBoard,
    TicTacToeEvent, TicTacToeSession, TimerKey, TimerQueue, BOARD_SIZE,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};

const BINGO_HELP: &str = "\
Commands:
  <1-25>        open a cell (while no question is open)
  <1-4>         answer with that option (while a question is open)
  <text>        answer with the option text
  50 | time | hint | skip   use a power-up
  b             show the board
  r             restart with new questions
  s             share your score
  q             quit";

const TICTACTOE_HELP: &str = "\
Commands:
  <1-9>         pick a square (while no question is open)
  <1-4>         answer with that option (while a question is open)
  <text>        answer with the option text
  b             show the board
  r             restart with new questions
  s             share your result
  q             quit";

/// Second marks at which the countdown is announced.
const COUNTDOWN_ALERTS: [u64; 2] = [10, 5];

// ─────────────────────────────────────────────────────────────
// Input
// ─────────────────────────────────────────────────────────────

/// One parsed line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A 1-based number: a cell to open, or an option to answer with.
    Number(usize),
    /// A power-up by name.
    PowerUp(PowerUpKind),
    /// Free text, taken as an answer.
    Text(String),
    /// Redraw the board.
    Board,
    /// Start over.
    Restart,
    /// Print the share line.
    Share,
    /// Print the command list.
    Help,
    /// Leave the game.
    Quit,
}

/// Parses one line. Blank lines yield `None`.
pub fn parse_input(line: &str) -> Option<Input> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let input = match trimmed.to_lowercase().as_str() {
        "q" | "quit" | "exit" => Input::Quit,
        "h" | "help" | "?" => Input::Help,
        "b" | "board" => Input::Board,
        "r" | "restart" => Input::Restart,
        "s" | "share" => Input::Share,
        "50" | "50/50" | "fifty" => Input::PowerUp(PowerUpKind::FiftyFifty),
        "time" | "extra" | "extra time" => Input::PowerUp(PowerUpKind::ExtraTime),
        "hint" => Input::PowerUp(PowerUpKind::Hint),
        "skip" => Input::PowerUp(PowerUpKind::Skip),
        lowered => match lowered.parse::<usize>() {
            Ok(number) => Input::Number(number),
            Err(_) => Input::Text(trimmed.to_string()),
        },
    };
    Some(input)
}

/// Maps a 1-based option number onto the options still on offer.
pub fn option_by_number(round: &QuestionRound, number: usize) -> Option<String> {
    let options = round.remaining_options();
    number
        .checked_sub(1)
        .and_then(|index| options.get(index))
        .map(|option| option.to_string())
}

/// Timer payloads the host schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostTimer {
    /// Countdown tick for an open question.
    Tick,
    /// The computer's delayed move.
    ComputerMove,
    /// Forces a computer turn that never moved.
    SafetyDeadline,
}

// ─────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────

/// Renders the Bingo grid with 1-based cell numbers.
pub fn render_bingo(board: &BingoBoard) -> String {
    let mut out = String::new();
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let index = row * BOARD_SIZE + col;
            out.push_str(&bingo_cell_label(index, &board.cells()[index]));
            out.push(' ');
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "Score: {}  Streak: {}  Lines: {}  Power-ups: {}",
        board.score(),
        board.streak(),
        board.completed_lines().len(),
        list_power_ups(&board.power_ups().available())
    ));
    out
}

fn bingo_cell_label(index: usize, cell: &BingoCell) -> String {
    if *cell.revealed() {
        return "[ ** ]".to_string();
    }
    if *cell.spent() {
        return "[ -- ]".to_string();
    }
    let marker = match cell.special() {
        Some(SpecialCell::Bonus) => 'B',
        Some(SpecialCell::Mystery) => 'M',
        Some(SpecialCell::Wildcard) => 'W',
        None => ' ',
    };
    format!("[{:>3}{}]", index + 1, marker)
}

fn list_power_ups(kinds: &[PowerUpKind]) -> String {
    if kinds.is_empty() {
        return "none".to_string();
    }
    kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders an open question with numbered options.
pub fn render_round(round: &QuestionRound) -> String {
    let question = round.question();
    let mut out = format!(
        "[{} | {}] {}\n",
        question.category(),
        question.difficulty(),
        question.text()
    );
    for (number, option) in round.remaining_options().iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", number + 1, option));
    }
    if let Some(hint) = round.hint() {
        out.push_str(&format!("Hint: {}\n", hint));
    }
    out.push_str(&format!(
        "Time left: {:.0}s",
        round.time_remaining_secs().ceil()
    ));
    out
}

/// Renders the Tic-Tac-Toe grid and status line.
pub fn render_tictactoe(board: &TicTacToeBoard) -> String {
    let status = match board.outcome() {
        Some(outcome) => outcome.to_string(),
        None if board.turn() == Mark::Player => "Your turn".to_string(),
        None => "Computer is thinking...".to_string(),
    };
    format!(
        "{}\nScore: {}  {}",
        board.board().display(),
        board.score(),
        status
    )
}

fn describe_rejection(outcome: CommandOutcome) {
    if let Some(reason) = outcome.rejection() {
        println!("Can't do that: {}", reason);
    }
}

fn announce_countdown(round: &QuestionRound, elapsed_secs: f64) {
    let after = round.time_remaining_secs().ceil() as u64;
    let before = (round.time_remaining_secs() + elapsed_secs).ceil() as u64;
    if before != after && COUNTDOWN_ALERTS.contains(&after) {
        println!("{} seconds left!", after);
    }
}

// ─────────────────────────────────────────────────────────────
// Bingo
// ─────────────────────────────────────────────────────────────

/// Plays Bingo until the player quits or stdin closes.
#[instrument(skip_all)]
pub async fn run_bingo(config: &GameConfig, profile: &mut ProfileService) -> Result<()> {
    let bank = config.question_bank()?;
    let mut session = BingoSession::new(bank, config.starting_power_ups(), config.rng())?;
    let mut timers: TimerQueue<HostTimer> = TimerQueue::new();
    let mut active: Option<TimerKey> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Football Bingo - {}", profile.profile().player_name());
    println!("{}\n", BINGO_HELP);
    println!("{}", render_bingo(session.board()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some(input) = parse_input(&line) else { continue };
                if input == Input::Quit {
                    break;
                }
                bingo_input(input, &mut session, profile)?;
            }
            Some(fired) = timers.next() => {
                bingo_timer(fired, &mut session, &mut timers, config);
            }
        }

        let events = session.flush(profile)?;
        report_bingo_events(&events, session.board());
        if !events.is_empty() && session.board().is_finished() {
            println!("{}", session.share_text(profile));
            println!("Type r to play again or q to quit.");
        }

        // Keep exactly one countdown running, for the open round.
        let current = session.board().round().map(QuestionRound::key);
        if current != active {
            if let Some(stale) = active {
                timers.cancel(stale);
            }
            if let Some(key) = current {
                timers.schedule(key, config.tick_interval(), HostTimer::Tick);
            }
            active = current;
        }
    }

    timers.cancel_all();
    info!(score = session.board().score(), "Bingo session ended");
    Ok(())
}

fn bingo_input(
    input: Input,
    session: &mut BingoSession,
    profile: &ProfileService,
) -> Result<()> {
    let round_open = session.board().round().is_some();
    match input {
        Input::Number(number) if round_open => {
            let choice = session
                .board()
                .round()
                .and_then(|round| option_by_number(round, number));
            match choice {
                Some(choice) => describe_rejection(session.board_mut().submit_answer(&choice)),
                None => println!("Pick an option between 1 and 4."),
            }
        }
        Input::Number(0) => println!("Cells are numbered from 1."),
        Input::Number(number) => {
            describe_rejection(session.board_mut().open(number - 1));
            if let Some(round) = session.board().round() {
                println!("{}", render_round(round));
            }
        }
        Input::Text(text) => describe_rejection(session.board_mut().submit_answer(&text)),
        Input::PowerUp(kind) => {
            let outcome = session.board_mut().use_power_up(kind);
            describe_rejection(outcome);
            if outcome.is_accepted() {
                if let Some(round) = session.board().round() {
                    println!("{}", render_round(round));
                }
            }
        }
        Input::Board => {
            println!("{}", render_bingo(session.board()));
            if let Some(round) = session.board().round() {
                println!("{}", render_round(round));
            }
        }
        Input::Restart => {
            session.restart()?;
            println!("New board!\n{}", render_bingo(session.board()));
        }
        Input::Share => println!("{}", session.share_text(profile)),
        Input::Help => println!("{}", BINGO_HELP),
        Input::Quit => {}
    }
    Ok(())
}

fn bingo_timer(
    fired: Fired<HostTimer>,
    session: &mut BingoSession,
    timers: &mut TimerQueue<HostTimer>,
    config: &GameConfig,
) {
    if fired.event != HostTimer::Tick {
        return;
    }
    let interval = config.tick_interval();
    if !session.board_mut().tick(fired.key, interval).is_accepted() {
        debug!(key = %fired.key, "Stale tick dropped");
        return;
    }
    if let Some(round) = session.board().round() {
        if round.key() == fired.key {
            announce_countdown(round, interval.as_secs_f64());
            timers.schedule(fired.key, interval, HostTimer::Tick);
        }
    }
}

fn report_bingo_events(events: &[BingoEvent], board: &BingoBoard) {
    let mut redraw = false;
    for event in events {
        match event {
            BingoEvent::AnswerResolved(report) => {
                redraw = true;
                let correct = board.cells()[*report.cell()].question().correct_answer();
                match report.resolution() {
                    Resolution::Correct => {
                        let breakdown = report.breakdown();
                        println!(
                            "Correct! +{} (base {}, time {}, streak {}, difficulty {})",
                            report.points(),
                            breakdown.base(),
                            breakdown.time_bonus().amount(),
                            breakdown.streak_bonus(),
                            breakdown.difficulty_bonus()
                        );
                        if *report.special_bonus() > 0 {
                            if let Some(special) = report.special() {
                                println!("{} cell! +{}", special, report.special_bonus());
                            }
                        }
                        if let Some(kind) = report.earned_power_up() {
                            println!("Lucky! You earned a {} power-up.", kind);
                        }
                    }
                    Resolution::Incorrect => println!("Wrong! The answer was {}.", correct),
                    Resolution::TimedOut => println!("Time's up! The answer was {}.", correct),
                    Resolution::Skipped => println!("Skipped. The answer was {}.", correct),
                }
            }
            BingoEvent::LinesCompleted { lines, bonus } => {
                for line in lines {
                    println!("BINGO! {} complete.", line);
                }
                println!("Line bonus +{}", bonus);
            }
            BingoEvent::BoardCompleted { score } => {
                println!("Full board! Final score: {}", score);
            }
            BingoEvent::ScoreChanged { .. } => {}
        }
    }
    if redraw {
        println!("{}", render_bingo(board));
    }
}

// ─────────────────────────────────────────────────────────────
// Tic-Tac-Toe
// ─────────────────────────────────────────────────────────────

/// Plays Tic-Tac-Toe until the player quits or stdin closes.
#[instrument(skip_all)]
pub async fn run_tictactoe(config: &GameConfig, profile: &mut ProfileService) -> Result<()> {
    let bank = config.question_bank()?;
    let streams = config.rng_streams();
    let mut delay_rng = streams.delay;
    let opponent = config.opponent().build(streams.opponent_seed);
    let mut session = TicTacToeSession::new(bank, opponent, streams.session)?;
    let mut timers: TimerQueue<HostTimer> = TimerQueue::new();
    let mut active: Option<TimerKey> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "Football Tic-Tac-Toe - {} vs {}",
        profile.profile().player_name(),
        session.opponent_name()
    );
    println!("{}\n", TICTACTOE_HELP);
    println!("{}", render_tictactoe(session.board()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some(input) = parse_input(&line) else { continue };
                if input == Input::Quit {
                    break;
                }
                if input == Input::Restart {
                    if let Some(stale) = active.take() {
                        timers.cancel(stale);
                    }
                }
                tictactoe_input(input, &mut session, profile)?;
            }
            Some(fired) = timers.next() => {
                tictactoe_timer(fired, &mut session, &mut timers, config);
            }
        }

        report_tictactoe_events(&session.flush(profile)?, &session, profile);

        // A question countdown and a computer turn never overlap.
        let current = session.board().round().map(QuestionRound::key);
        if current != active && !session.board().is_thinking() {
            if let Some(stale) = active {
                timers.cancel(stale);
            }
            if let Some(key) = current {
                timers.schedule(key, config.tick_interval(), HostTimer::Tick);
            }
            active = current;
        }

        if let Some(key) = session.board_mut().begin_computer_turn() {
            if let Some(stale) = active.replace(key) {
                timers.cancel(stale);
            }
            timers.schedule(key, config.thinking_delay(&mut delay_rng), HostTimer::ComputerMove);
            timers.schedule(key, config.safety_timeout(), HostTimer::SafetyDeadline);
            println!("Computer is thinking...");
        }
    }

    timers.cancel_all();
    info!(score = session.board().score(), "Tic-Tac-Toe session ended");
    Ok(())
}

fn tictactoe_input(
    input: Input,
    session: &mut TicTacToeSession,
    profile: &ProfileService,
) -> Result<()> {
    let round_open = session.board().round().is_some();
    match input {
        Input::Number(number) if round_open => {
            let choice = session
                .board()
                .round()
                .and_then(|round| option_by_number(round, number));
            match choice {
                Some(choice) => describe_rejection(session.board_mut().submit_answer(&choice)),
                None => println!("Pick an option between 1 and 4."),
            }
        }
        Input::Number(0) => println!("Squares are numbered from 1."),
        Input::Number(number) => {
            describe_rejection(session.board_mut().open(number - 1));
            if let Some(round) = session.board().round() {
                println!("{}", render_round(round));
            }
        }
        Input::Text(text) => describe_rejection(session.board_mut().submit_answer(&text)),
        Input::PowerUp(_) => println!("Power-ups are only available in Bingo."),
        Input::Board => {
            println!("{}", render_tictactoe(session.board()));
            if let Some(round) = session.board().round() {
                println!("{}", render_round(round));
            }
        }
        Input::Restart => {
            session.restart()?;
            println!("New game!\n{}", render_tictactoe(session.board()));
        }
        Input::Share => match session.share_text(profile) {
            Some(text) => println!("{}", text),
            None => println!("Finish the game first."),
        },
        Input::Help => println!("{}", TICTACTOE_HELP),
        Input::Quit => {}
    }
    Ok(())
}

fn tictactoe_timer(
    fired: Fired<HostTimer>,
    session: &mut TicTacToeSession,
    timers: &mut TimerQueue<HostTimer>,
    config: &GameConfig,
) {
    let Fired { key, event } = fired;
    match event {
        HostTimer::Tick => {
            let interval = config.tick_interval();
            if !session.board_mut().tick(key, interval).is_accepted() {
                debug!(%key, "Stale tick dropped");
                return;
            }
            if let Some(round) = session.board().round() {
                if round.key() == key {
                    announce_countdown(round, interval.as_secs_f64());
                    timers.schedule(key, interval, HostTimer::Tick);
                }
            }
        }
        HostTimer::ComputerMove => {
            if session.computer_move(key).is_accepted() {
                timers.cancel(key);
            }
        }
        HostTimer::SafetyDeadline => {
            let outcome = session.release_stalled_turn(key);
            debug!(%key, ?outcome, "Safety deadline reached");
        }
    }
}

fn report_tictactoe_events(
    events: &[TicTacToeEvent],
    session: &TicTacToeSession,
    profile: &ProfileService,
) {
    let board = session.board();
    for event in events {
        match event {
            TicTacToeEvent::AnswerResolved(report) => {
                let index = report.position().to_index();
                let correct = board.questions()[index].correct_answer();
                match report.resolution() {
                    Resolution::Correct => {
                        println!("Correct! {} is yours. +{}", report.position(), report.delta())
                    }
                    _ => println!(
                        "Wrong! The answer was {}. The computer takes {} ({}).",
                        correct,
                        report.position(),
                        report.delta()
                    ),
                }
            }
            TicTacToeEvent::ComputerMoved { position, .. } => {
                println!("Computer plays {}.", position);
            }
            TicTacToeEvent::GameEnded { outcome, score } => {
                println!("{}", render_tictactoe(board));
                println!("{} Final score: {}", outcome, score);
                if let Some(text) = session.share_text(profile) {
                    println!("{}", text);
                }
                println!("Type r to play again or q to quit.");
            }
        }
    }
    let game_ended = events
        .iter()
        .any(|event| matches!(event, TicTacToeEvent::GameEnded { .. }));
    if !events.is_empty() && !game_ended {
        println!("{}", render_tictactoe(board));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use football_quiz::{PowerUps, QuestionBank};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    fn bingo_board() -> BingoBoard {
        let bank = QuestionBank::bundled().expect("bundled pool");
        let mut rng = StdRng::seed_from_u64(5);
        let questions = bank.draw(football_quiz::GameMode::Bingo, &mut rng);
        let mut board = BingoBoard::build(questions, PowerUps::all(), rng).expect("board");
        board.start();
        board
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_input("  "), None);
        assert_eq!(parse_input("Q"), Some(Input::Quit));
        assert_eq!(parse_input("7"), Some(Input::Number(7)));
        assert_eq!(
            parse_input("50/50"),
            Some(Input::PowerUp(PowerUpKind::FiftyFifty))
        );
        assert_eq!(parse_input("skip"), Some(Input::PowerUp(PowerUpKind::Skip)));
        assert_eq!(
            parse_input(" Brazil "),
            Some(Input::Text("Brazil".to_string()))
        );
    }

    #[test]
    fn test_option_numbers_follow_remaining_options() {
        let mut board = bingo_board();
        board.open(0);
        let round = board.round().expect("round");
        let first = round.remaining_options()[0].to_string();
        assert_eq!(option_by_number(round, 1), Some(first));
        assert_eq!(option_by_number(round, 0), None);
        assert_eq!(option_by_number(round, 9), None);
    }

    #[test]
    fn test_render_bingo_marks_free_cell() {
        let board = bingo_board();
        let grid = render_bingo(&board);
        assert!(grid.contains("[ ** ]"));
        assert!(grid.contains("[  1"));
        assert!(grid.contains("Power-ups: 50/50, extra time, hint, skip"));
    }

    #[test]
    fn test_render_round_lists_options() {
        let mut board = bingo_board();
        board.open(3);
        let round = board.round().expect("round");
        let text = render_round(round);
        assert!(text.contains(round.question().text().as_str()));
        assert!(text.contains("  1. "));
        assert!(text.contains("Time left:"));
    }

    #[test]
    fn test_render_tictactoe_status() {
        let bank = QuestionBank::bundled().expect("bundled pool");
        let mut rng = StdRng::seed_from_u64(8);
        let questions: Vec<Arc<_>> = bank.draw(football_quiz::GameMode::TicTacToe, &mut rng);
        let board = TicTacToeBoard::new(questions).expect("board");
        let text = render_tictactoe(&board);
        assert!(text.contains("Your turn"));
        assert!(text.contains("Score: 0"));
    }
}
