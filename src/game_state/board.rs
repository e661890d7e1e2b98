//! The 8×8 piece grid.
//!
//! Row 0 is rank 8 and column 0 is file a, matching the sensor matrix
//! layout. Each cell holds at most one piece by construction.

use crate::game_state::chess_rules::BACK_RANK;
use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub const fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    /// Standard starting layout.
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for (col, kind) in BACK_RANK.iter().enumerate() {
            let col = col as u8;
            board.set(Square::new(0, col), Some(Piece::new(Color::Black, *kind)));
            board.set(Square::new(1, col), Some(Piece::new(Color::Black, PieceKind::Pawn)));
            board.set(Square::new(6, col), Some(Piece::new(Color::White, PieceKind::Pawn)));
            board.set(Square::new(7, col), Some(Piece::new(Color::White, *kind)));
        }
        board
    }

    /// Returns `None` for empty or out-of-range squares.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        if !square.is_valid() {
            return None;
        }
        self.squares[square.row as usize][square.col as usize]
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Writes a cell. Out-of-range squares are ignored.
    #[inline]
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        if square.is_valid() {
            self.squares[square.row as usize][square.col as usize] = piece;
        }
    }

    /// Removes and returns the piece on `square`.
    #[inline]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.piece_at(square);
        self.set(square, None);
        piece
    }

    pub fn squares(&self) -> impl Iterator<Item = (Square, Option<Piece>)> + '_ {
        (0..8u8).flat_map(move |row| (0..8u8).map(move |col| (Square::new(row, col), self.squares[row as usize][col as usize])))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares().filter_map(move |(sq, piece)| match piece {
            Some(p) if p.color == color => Some((sq, p)),
            _ => None,
        })
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Occupancy as the presence sensors would report it.
    pub fn occupancy(&self) -> [[bool; 8]; 8] {
        let mut out = [[false; 8]; 8];
        for (sq, piece) in self.squares() {
            out[sq.row as usize][sq.col as usize] = piece.is_some();
        }
        out
    }

    /// Grid of FEN letters with `' '` for empty cells, the layout board viewers render.
    pub fn to_char_grid(&self) -> [[char; 8]; 8] {
        let mut out = [[' '; 8]; 8];
        for (sq, piece) in self.squares() {
            if let Some(p) = piece {
                out[sq.row as usize][sq.col as usize] = p.to_fen_char();
            }
        }
        out
    }
}
