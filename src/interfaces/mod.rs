pub mod csv;
pub mod journal;
