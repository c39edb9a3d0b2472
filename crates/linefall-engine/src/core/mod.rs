pub use self::{board::*, piece::*, placement::*};

pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod placement;
