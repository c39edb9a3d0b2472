pub use self::game::*;

pub(crate) mod game;
