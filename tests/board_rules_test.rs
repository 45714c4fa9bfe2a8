//! Tests for the move rules on the standard board.

use conquid::{Board, InvalidMove, Move, MoveEffect, Player, Position};

fn standard() -> Board {
    Board::new(14, 28, [Position::new(6, 4), Position::new(6, 22)]).expect("Standard board")
}

fn p(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

#[test]
fn test_claim_owned_cell_leaves_board_unchanged() {
    let mut board = standard();
    board.claim(Player::One, &[p(0, 0)]).unwrap();
    let before = board.clone();

    let result = board.claim(Player::Two, &[p(0, 1), p(0, 0)]);
    assert_eq!(result, Err(InvalidMove::CellOccupied(p(0, 0))));
    assert_eq!(board, before, "Rejected claim must not touch any cell");
}

#[test]
fn test_claim_base_cell_rejected() {
    let mut board = standard();
    assert_eq!(
        board.claim(Player::One, &[p(6, 4)]),
        Err(InvalidMove::CellOccupied(p(6, 4)))
    );
    assert_eq!(
        board.claim(Player::One, &[p(7, 23)]),
        Err(InvalidMove::CellOccupied(p(7, 23)))
    );
}

#[test]
fn test_claim_duplicate_and_out_of_bounds() {
    let mut board = standard();
    assert_eq!(
        board.claim(Player::One, &[p(1, 1), p(1, 1)]),
        Err(InvalidMove::DuplicateCell(p(1, 1)))
    );
    assert_eq!(
        board.claim(Player::One, &[p(14, 0)]),
        Err(InvalidMove::OutOfBounds(p(14, 0)))
    );
    assert_eq!(board.claim(Player::One, &[]), Err(InvalidMove::EmptyClaim));
}

#[test]
fn test_capture_sandwiched_cell() {
    let mut board = standard();
    board.claim(Player::Two, &[p(3, 3)]).unwrap();
    board.claim(Player::One, &[p(3, 2), p(3, 4)]).unwrap();

    assert_eq!(board.capture(Player::One), vec![p(3, 3)]);
    assert!(board.cell(p(3, 3)).unwrap().is_owned_by(Player::One));
}

#[test]
fn test_capture_cascades_through_converted_cells() {
    let mut board = standard();
    board.claim(Player::Two, &[p(3, 3), p(3, 4)]).unwrap();
    board.claim(Player::One, &[p(2, 3), p(2, 4), p(4, 3)]).unwrap();

    // (3, 4) has one original attacker; the second is (3, 3) once it flips.
    assert_eq!(board.capture(Player::One), vec![p(3, 3), p(3, 4)]);
}

#[test]
fn test_capture_single_contact_converts_nothing() {
    let mut board = standard();
    board.claim(Player::Two, &[p(3, 3)]).unwrap();
    board.claim(Player::One, &[p(3, 2)]).unwrap();
    let before = board.clone();

    assert!(board.capture(Player::One).is_empty());
    assert_eq!(board, before);
}

#[test]
fn test_capture_never_converts_base() {
    let mut board = standard();
    // Flank player two's base cell (6, 22) from two sides.
    board.claim(Player::One, &[p(5, 22), p(6, 21)]).unwrap();
    assert!(board.capture(Player::One).is_empty());
    assert!(board.cell(p(6, 22)).unwrap().is_owned_by(Player::Two));
}

fn fill_block(board: &mut Board, player: Player, corner: Position) {
    let cells: Vec<_> = (0..4)
        .flat_map(|r| (0..4).map(move |c| p(corner.row + r, corner.col + c)))
        .collect();
    board.claim(player, &cells).unwrap();
}

#[test]
fn test_erase_uniform_block() {
    let mut board = standard();
    fill_block(&mut board, Player::Two, p(0, 10));
    board
        .claim(Player::One, &[p(4, 10), p(4, 11), p(4, 12), p(4, 13)])
        .unwrap();

    let effect = Move::erase(Player::One, p(0, 10)).apply(&mut board).unwrap();
    assert_eq!(effect, MoveEffect::Erased { corner: p(0, 10) });
    for row in 0..4 {
        for col in 10..14 {
            assert!(board.cell(p(row, col)).unwrap().is_empty());
        }
    }
}

#[test]
fn test_erase_needs_four_ring_cells() {
    let mut board = standard();
    fill_block(&mut board, Player::Two, p(0, 10));
    board.claim(Player::One, &[p(4, 10), p(4, 11), p(4, 12)]).unwrap();
    let before = board.clone();

    assert_eq!(
        board.erase(Player::One, p(0, 10)),
        Err(InvalidMove::InsufficientSurround { found: 3, needed: 4 })
    );
    assert_eq!(board, before);
}

#[test]
fn test_erase_mixed_block_rejected() {
    let mut board = standard();
    let cells: Vec<_> = (0..4)
        .flat_map(|r| (10..14).map(move |c| p(r, c)))
        .filter(|&pos| pos != p(2, 12))
        .collect();
    board.claim(Player::Two, &cells).unwrap();
    board
        .claim(Player::One, &[p(2, 12), p(4, 10), p(4, 11), p(4, 12), p(4, 13)])
        .unwrap();

    assert_eq!(
        board.erase(Player::One, p(0, 10)),
        Err(InvalidMove::BlockNotUniform(p(2, 12)))
    );
    assert!(!board.erase_spots(Player::One).contains(&p(0, 10)));
}

#[test]
fn test_erase_spots_lists_legal_corner() {
    let mut board = standard();
    fill_block(&mut board, Player::Two, p(0, 10));
    board
        .claim(Player::One, &[p(4, 10), p(4, 11), p(4, 12), p(4, 13)])
        .unwrap();

    assert_eq!(board.erase_spots(Player::One), vec![p(0, 10)]);
}

#[test]
fn test_path_win_across_standard_board() {
    let mut board = standard();
    let row: Vec<_> = (6..22).map(|col| p(6, col)).collect();
    board.claim(Player::One, &row).unwrap();

    let path = board.path_win(Player::One).unwrap();
    let expected: Vec<_> = (4..22).map(|col| p(6, col)).collect();
    assert_eq!(path, expected);

    let target = board.cell(p(6, 22)).unwrap();
    assert!(target.is_base());
    assert!(target.is_owned_by(Player::One));
    assert!(path.iter().all(|&pos| board.cell(pos).unwrap().is_base()));
}

#[test]
fn test_path_win_without_path_fails() {
    let mut board = standard();
    board.claim(Player::One, &[p(6, 6), p(6, 7), p(6, 8)]).unwrap();
    let before = board.clone();

    assert_eq!(board.path_win(Player::Two), Err(InvalidMove::NoPath(Player::Two)));
    assert_eq!(board.path_win(Player::One), Err(InvalidMove::NoPath(Player::One)));
    assert_eq!(board, before);
}
