pub mod utils;
pub mod d3;
