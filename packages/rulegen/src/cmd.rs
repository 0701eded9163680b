pub mod generate;
pub mod update;
