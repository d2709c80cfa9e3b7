//! Pure rule checks over a [`Board`](super::Board).

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::check_winner;
