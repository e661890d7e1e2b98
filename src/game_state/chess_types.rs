//! Core value types shared by the board model, rules engine, and history log.

pub use crate::game_state::board::Board;
pub use crate::game_state::game_state::GameState;

/// Side owning a piece (and side to move).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Single-letter tag used by FEN and the persisted header (`'w'` / `'b'`).
    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// Row pawns of this color move toward (row 0 is rank 8).
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn pawn_start_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Back rank holding the king and rooks at game start.
    #[inline]
    pub const fn home_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Lowercase FEN letter.
    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub fn to_fen_char(self) -> char {
        let base = self.kind.to_char();
        match self.color {
            Color::White => base.to_ascii_uppercase(),
            Color::Black => base,
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else if ch.is_ascii_lowercase() {
            Color::Black
        } else {
            return None;
        };
        PieceKind::from_char(ch).map(|kind| Piece::new(color, kind))
    }
}

/// Board coordinate. Row 0 is rank 8, column 0 is file a.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Checked constructor from signed coordinates, used while stepping rays.
    #[inline]
    pub fn try_new(row: i8, col: i8) -> Option<Self> {
        if is_valid_square(row, col) {
            Some(Self::new(row as u8, col as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.row < 8 && self.col < 8
    }

    /// `row * 8 + col`, the index used by the encoded move format.
    #[inline]
    pub const fn index(self) -> u8 {
        self.row * 8 + self.col
    }

    #[inline]
    pub fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Self::new(index / 8, index % 8))
        } else {
            None
        }
    }

    #[inline]
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        Self::try_new(self.row as i8 + d_row, self.col as i8 + d_col)
    }
}

#[inline]
pub const fn is_valid_square(row: i8, col: i8) -> bool {
    row >= 0 && row < 8 && col >= 0 && col < 8
}

/// Castling availability bitmask (`KQkq` = `0b1111`).
///
/// Rights can only be cleared on an existing value. A fresh set of rights
/// comes from [`CastlingRights::all`] at the start of a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

pub const CASTLE_WHITE_KINGSIDE: u8 = 1 << 0;
pub const CASTLE_WHITE_QUEENSIDE: u8 = 1 << 1;
pub const CASTLE_BLACK_KINGSIDE: u8 = 1 << 2;
pub const CASTLE_BLACK_QUEENSIDE: u8 = 1 << 3;

impl CastlingRights {
    #[inline]
    pub const fn all() -> Self {
        Self(CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE | CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE)
    }

    #[inline]
    pub const fn none() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    pub fn clear_color(&mut self, color: Color) {
        self.clear(kingside_flag(color) | queenside_flag(color));
    }

    pub fn to_fen_field(self) -> String {
        let mut out = String::new();
        if self.has(CASTLE_WHITE_KINGSIDE) {
            out.push('K');
        }
        if self.has(CASTLE_WHITE_QUEENSIDE) {
            out.push('Q');
        }
        if self.has(CASTLE_BLACK_KINGSIDE) {
            out.push('k');
        }
        if self.has(CASTLE_BLACK_QUEENSIDE) {
            out.push('q');
        }
        if out.is_empty() {
            out.push('-');
        }
        out
    }

    /// Parses a FEN castling field; unknown characters are ignored.
    pub fn from_fen_field(field: &str) -> Self {
        let mut bits = 0u8;
        for ch in field.chars() {
            match ch {
                'K' => bits |= CASTLE_WHITE_KINGSIDE,
                'Q' => bits |= CASTLE_WHITE_QUEENSIDE,
                'k' => bits |= CASTLE_BLACK_KINGSIDE,
                'q' => bits |= CASTLE_BLACK_QUEENSIDE,
                _ => {}
            }
        }
        Self(bits)
    }

    /// Keeps only the rights the board still allows: king and rook on their
    /// home squares. Never adds a right.
    pub fn restricted_to_board(self, board: &Board) -> Self {
        let mut out = self;
        for color in [Color::White, Color::Black] {
            let row = color.home_row();
            let king_home = board.piece_at(Square::new(row, 4)) == Some(Piece::new(color, PieceKind::King));
            let rook_on = |col: u8| board.piece_at(Square::new(row, col)) == Some(Piece::new(color, PieceKind::Rook));
            if !king_home || !rook_on(7) {
                out.clear(kingside_flag(color));
            }
            if !king_home || !rook_on(0) {
                out.clear(queenside_flag(color));
            }
        }
        out
    }
}

#[inline]
pub const fn kingside_flag(color: Color) -> u8 {
    match color {
        Color::White => CASTLE_WHITE_KINGSIDE,
        Color::Black => CASTLE_BLACK_KINGSIDE,
    }
}

#[inline]
pub const fn queenside_flag(color: Color) -> u8 {
    match color {
        Color::White => CASTLE_WHITE_QUEENSIDE,
        Color::Black => CASTLE_BLACK_QUEENSIDE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_index_round_trip() {
        let e2 = Square::new(6, 4);
        assert_eq!(e2.index(), 52);
        assert_eq!(Square::from_index(52), Some(e2));
        assert_eq!(Square::from_index(64), None);
    }

    #[test]
    fn offset_respects_board_edges() {
        let a8 = Square::new(0, 0);
        assert_eq!(a8.offset(-1, 0), None);
        assert_eq!(a8.offset(1, 1), Some(Square::new(1, 1)));
        assert!(!is_valid_square(8, 0));
    }

    #[test]
    fn castling_field_round_trip() {
        let rights = CastlingRights::from_fen_field("Kq");
        assert!(rights.has(CASTLE_WHITE_KINGSIDE));
        assert!(!rights.has(CASTLE_WHITE_QUEENSIDE));
        assert!(rights.has(CASTLE_BLACK_QUEENSIDE));
        assert_eq!(rights.to_fen_field(), "Kq");
        assert_eq!(CastlingRights::none().to_fen_field(), "-");
    }

    #[test]
    fn restricting_to_board_never_adds_rights() {
        let mut board = Board::initial();
        board.take(Square::new(7, 7));
        let mut rights = CastlingRights::all();
        rights.clear(CASTLE_BLACK_QUEENSIDE);

        let restricted = rights.restricted_to_board(&board);
        assert_eq!(restricted.to_fen_field(), "Qk");
    }
}
