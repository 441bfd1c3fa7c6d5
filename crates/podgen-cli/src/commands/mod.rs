pub mod generate;
pub mod subspecs;
