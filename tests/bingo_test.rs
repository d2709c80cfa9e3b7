//! Bingo board flows through the public API.

use std::sync::Arc;

use football_quiz::{
    BingoBoard, BingoEvent, BingoInvariants, BingoLine, BingoPhase, CELL_COUNT, COMPLETION_BONUS,
    Category, CommandOutcome, CompletedLinesRevealed, Difficulty, FREE_CELL_INDEX,
    FreeCellRevealed, Invariant, InvariantSet, LINE_BONUS, MYSTERY_BONUS, PowerUpKind, PowerUps,
    Question, Rejection, Resolution, RevealedCellsNotSpent, SpecialCell,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn questions() -> Vec<Arc<Question>> {
    (0..CELL_COUNT)
        .map(|i| {
            Arc::new(Question::new(
                format!("b{}", i),
                format!("Bingo question {}?", i),
                vec![
                    "Pele".to_string(),
                    "Maradona".to_string(),
                    "Cruyff".to_string(),
                    "Zidane".to_string(),
                ],
                "Pele".to_string(),
                Difficulty::Easy,
                Category::Players,
            ))
        })
        .collect()
}

fn board_with(specials: [Option<SpecialCell>; CELL_COUNT], power_ups: PowerUps) -> BingoBoard {
    let mut board =
        BingoBoard::with_layout(questions(), specials, power_ups, StdRng::seed_from_u64(21))
            .expect("board");
    assert_eq!(board.start(), CommandOutcome::Accepted);
    board
}

fn answer(board: &mut BingoBoard, index: usize, choice: &str) {
    assert!(board.open(index).is_accepted(), "open {}", index);
    assert!(board.submit_answer(choice).is_accepted());
}

#[test]
fn test_bonus_cell_doubles_points() {
    let mut specials = [None; CELL_COUNT];
    specials[0] = Some(SpecialCell::Bonus);
    let mut board = board_with(specials, PowerUps::none());

    answer(&mut board, 0, "Pele");
    let report = board.last_report().expect("report").clone();
    assert_eq!(*report.resolution(), Resolution::Correct);
    assert_eq!(*report.special_bonus(), report.breakdown().total());
    // Easy, answered instantly: 10 base + 15 speed bonus, doubled.
    assert_eq!(report.points(), 50);
    assert_eq!(board.score(), 50);
}

#[test]
fn test_mystery_cell_adds_bounded_bonus() {
    let mut specials = [None; CELL_COUNT];
    specials[6] = Some(SpecialCell::Mystery);
    let mut board = board_with(specials, PowerUps::none());

    answer(&mut board, 6, "Pele");
    let bonus = *board.last_report().expect("report").special_bonus();
    assert!(MYSTERY_BONUS.contains(&bonus));
    assert_eq!(board.score(), 25 + bonus);
}

#[test]
fn test_middle_row_uses_free_cell() {
    let mut board = board_with([None; CELL_COUNT], PowerUps::none());
    for index in [10, 11, 13] {
        answer(&mut board, index, "Pele");
    }
    assert!(board.completed_lines().is_empty());
    answer(&mut board, 14, "Pele");

    let events = board.take_events();
    let lines: Vec<BingoLine> = events
        .iter()
        .filter_map(|event| match event {
            BingoEvent::LinesCompleted { lines, bonus } => {
                assert_eq!(*bonus, LINE_BONUS);
                Some(lines.clone())
            }
            _ => None,
        })
        .flatten()
        .collect();
    assert_eq!(lines, vec![BingoLine::Row(2)]);
    assert!(BingoLine::Row(2).contains(FREE_CELL_INDEX));
}

#[test]
fn test_full_board_pays_every_line_and_completion() {
    let mut board = board_with([None; CELL_COUNT], PowerUps::none());
    for index in (0..CELL_COUNT).filter(|i| *i != FREE_CELL_INDEX) {
        answer(&mut board, index, "Pele");
    }
    assert_eq!(board.phase(), BingoPhase::Complete);
    assert_eq!(board.completed_lines().len(), BingoLine::ALL.len());
    assert!(board.is_finished());

    let report = board.last_report().expect("report");
    assert_eq!(*report.completion_bonus(), COMPLETION_BONUS);
    assert_eq!(
        board.open(0),
        CommandOutcome::Ignored(Rejection::GameOver)
    );
}

#[test]
fn test_invariants_hold_after_hits_and_misses() {
    let mut board = board_with([None; CELL_COUNT], PowerUps::none());
    for (index, choice) in [(0, "Pele"), (1, "Zidane"), (5, "Pele"), (6, "Pele")] {
        answer(&mut board, index, choice);
        assert!(FreeCellRevealed::holds(&board), "{}", FreeCellRevealed::description());
        assert!(
            CompletedLinesRevealed::holds(&board),
            "{}",
            CompletedLinesRevealed::description()
        );
        assert!(
            RevealedCellsNotSpent::holds(&board),
            "{}",
            RevealedCellsNotSpent::description()
        );
    }
    assert!(BingoInvariants::check_all(&board).is_ok());
}

#[test]
fn test_missed_cell_blocks_its_lines() {
    let mut board = board_with([None; CELL_COUNT], PowerUps::none());
    answer(&mut board, 0, "Zidane");
    assert_eq!(board.streak(), 0);
    assert_eq!(board.score(), 0);
    assert_eq!(
        board.open(0),
        CommandOutcome::Ignored(Rejection::CellSpent(0))
    );
    for index in 1..5 {
        answer(&mut board, index, "Pele");
    }
    assert!(!board.completed_lines().contains(&BingoLine::Row(0)));
}

#[test]
fn test_fifty_fifty_leaves_answer_on_offer() {
    let mut board = board_with([None; CELL_COUNT], PowerUps::all());
    assert!(board.open(3).is_accepted());
    assert!(board.use_power_up(PowerUpKind::FiftyFifty).is_accepted());

    let round = board.round().expect("round");
    let remaining = round.remaining_options();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.contains(&"Pele"));
    assert!(!board.power_ups().is_available(PowerUpKind::FiftyFifty));
    assert_eq!(
        board.use_power_up(PowerUpKind::FiftyFifty),
        CommandOutcome::Ignored(Rejection::PowerUpUnavailable)
    );
}
