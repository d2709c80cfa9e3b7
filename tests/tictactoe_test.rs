//! Quiz Tic-Tac-Toe flows through the public API.

use std::sync::Arc;

use football_quiz::{
    Board, COMPUTER_MOVE_PENALTY, Category, CommandOutcome, Difficulty, FirstAvailable,
    GameOutcome, GameStatus, HistoryMatchesBoard, Invariant, InvariantSet, Mark, MemoryStorage,
    OpponentStrategy, Outcome, OutcomeConsistent, PLAYER_WIN_BONUS, Position, ProfileService,
    Question, QuestionBank, Rejection, SQUARE_COUNT, Square, ThinkingOnComputerTurn,
    TicTacToeBoard, TicTacToeEvent, TicTacToeInvariants, TicTacToeSession,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn questions() -> Vec<Arc<Question>> {
    (0..SQUARE_COUNT)
        .map(|i| {
            Arc::new(Question::new(
                format!("t{}", i),
                format!("Square question {}?", i),
                vec!["yes".to_string(), "no".to_string()],
                "yes".to_string(),
                Difficulty::Medium,
                Category::Rules,
            ))
        })
        .collect()
}

fn claim(board: &mut TicTacToeBoard, index: usize) {
    assert!(board.open(index).is_accepted(), "open {}", index);
    assert!(board.submit_answer("yes").is_accepted());
}

#[test]
fn test_position_indices() {
    assert_eq!(Position::TopLeft.to_index(), 0);
    assert_eq!(Position::Center.to_index(), 4);
    assert_eq!(Position::from_index(8), Some(Position::BottomRight));
    assert_eq!(Position::from_index(9), None);
    assert_eq!(Position::from_label_or_number("center"), Some(Position::Center));
}

#[test]
fn test_valid_moves_filters_occupied() {
    let mut board = Board::new();
    board.set(Position::TopLeft, Square::Occupied(Mark::Player));
    board.set(Position::Center, Square::Occupied(Mark::Computer));

    let valid = Position::valid_moves(&board);
    assert_eq!(valid.len(), 7);
    assert!(!valid.contains(&Position::TopLeft));
    assert!(!valid.contains(&Position::Center));
    assert!(valid.contains(&Position::BottomRight));
}

#[test]
fn test_player_wins_left_column() {
    let mut board = TicTacToeBoard::new(questions()).expect("board");
    let mut cpu = FirstAvailable;

    claim(&mut board, 0);
    assert_eq!(
        board.open(3),
        CommandOutcome::Ignored(Rejection::NotPlayersTurn)
    );
    assert!(board.play_computer_turn(&mut cpu).is_accepted());
    claim(&mut board, 3);
    assert!(board.play_computer_turn(&mut cpu).is_accepted());
    claim(&mut board, 6);

    assert_eq!(board.outcome(), Some(Outcome::PlayerWin));
    assert_eq!(
        board.winning_line(),
        Some([Position::TopLeft, Position::MiddleLeft, Position::BottomLeft])
    );
    assert_eq!(
        board.score(),
        30 - 2 * COMPUTER_MOVE_PENALTY + PLAYER_WIN_BONUS
    );
    assert_eq!(board.status(), GameStatus::Finished(Outcome::PlayerWin));
    assert_eq!(
        board.open(8),
        CommandOutcome::Ignored(Rejection::GameOver)
    );
}

#[test]
fn test_wrong_answer_hands_square_to_computer_and_clamps() {
    let mut board = TicTacToeBoard::new(questions()).expect("board");
    assert!(board.open(4).is_accepted());
    assert!(board.submit_answer("no").is_accepted());

    assert_eq!(board.board().get(Position::Center), Square::Occupied(Mark::Computer));
    assert_eq!(board.score(), 0);
    assert_eq!(board.turn(), Mark::Player);
    let report = board.last_report().expect("report");
    assert_eq!(*report.delta(), 0);
    assert_eq!(
        board.open(4),
        CommandOutcome::Ignored(Rejection::CellOccupied(4))
    );
}

#[test]
fn test_computer_turn_blocks_player_until_it_moves() {
    let mut board = TicTacToeBoard::new(questions()).expect("board");
    let mut cpu = FirstAvailable;
    claim(&mut board, 0);

    let key = board.begin_computer_turn().expect("computer turn");
    assert!(board.is_thinking());
    assert_eq!(
        board.open(5),
        CommandOutcome::Ignored(Rejection::ComputerThinking)
    );
    assert!(board.computer_move(key, &mut cpu).is_accepted());
    assert_eq!(
        board.release_stalled_turn(key, &mut cpu),
        CommandOutcome::Ignored(Rejection::NotComputersTurn)
    );
    assert!(!board.is_thinking());
    assert!(board.take_events().iter().any(|event| matches!(
        event,
        TicTacToeEvent::ComputerMoved {
            position: Position::TopCenter,
            ..
        }
    )));
}

/// Always picks the center, occupied or not.
#[derive(Debug)]
struct CenterOnly;

impl OpponentStrategy for CenterOnly {
    fn choose_move(&mut self, _board: &Board) -> Option<Position> {
        Some(Position::Center)
    }

    fn name(&self) -> &str {
        "Center only"
    }
}

#[test]
fn test_deadline_recovers_from_occupied_choice() {
    let mut board = TicTacToeBoard::new(questions()).expect("board");
    claim(&mut board, 4);

    let key = board.begin_computer_turn().expect("computer turn");
    assert_eq!(
        board.computer_move(key, &mut CenterOnly),
        CommandOutcome::Ignored(Rejection::CellOccupied(4))
    );
    assert!(board.is_thinking());
    assert_eq!(board.turn(), Mark::Computer);

    assert!(board.release_stalled_turn(key, &mut CenterOnly).is_accepted());
    assert!(!board.is_thinking());
    assert_eq!(board.turn(), Mark::Player);
    assert_eq!(board.history().len(), 2);
    assert!(TicTacToeInvariants::check_all(&board).is_ok());
}

#[test]
fn test_invariants_hold_individually_through_a_game() {
    let mut board = TicTacToeBoard::new(questions()).expect("board");
    let mut cpu = FirstAvailable;
    let check = |board: &TicTacToeBoard| {
        assert!(HistoryMatchesBoard::holds(board), "{}", HistoryMatchesBoard::description());
        assert!(OutcomeConsistent::holds(board), "{}", OutcomeConsistent::description());
        assert!(
            ThinkingOnComputerTurn::holds(board),
            "{}",
            ThinkingOnComputerTurn::description()
        );
    };

    check(&board);
    claim(&mut board, 0);
    check(&board);
    let key = board.begin_computer_turn().expect("computer turn");
    check(&board);
    assert!(board.computer_move(key, &mut cpu).is_accepted());
    check(&board);
    claim(&mut board, 3);
    assert!(board.play_computer_turn(&mut cpu).is_accepted());
    claim(&mut board, 6);
    check(&board);
    assert!(board.is_over());
}

#[test]
fn test_session_records_a_win_in_the_profile() {
    let bank = Arc::new(QuestionBank::bundled().expect("bundled pool"));
    let mut profile = ProfileService::load(MemoryStorage::new());
    let mut session =
        TicTacToeSession::new(bank, Box::new(FirstAvailable), StdRng::seed_from_u64(4))
            .expect("session");

    for (turn, index) in [0, 3, 6].into_iter().enumerate() {
        let answer = session.board().questions()[index].correct_answer().clone();
        assert!(session.board_mut().open(index).is_accepted());
        assert!(session.board_mut().submit_answer(&answer).is_accepted());
        if turn < 2 {
            assert!(session.play_computer_turn().is_accepted());
        }
    }
    session.flush(&mut profile).expect("flush");

    let score = session.board().score();
    assert_eq!(session.board().outcome(), Some(Outcome::PlayerWin));
    let history = profile.profile().tic_tac_toe().history();
    assert_eq!(history.len(), 1);
    assert_eq!(*history[0].result(), GameOutcome::Win);
    assert_eq!(*history[0].score(), score);
    assert_eq!(*profile.profile().tic_tac_toe().high_score(), score);
    assert_eq!(*profile.stats().wins(), 1);
    assert!(
        session
            .share_text(&profile)
            .expect("finished")
            .contains(&format!("won with {} points!", score))
    );
}
