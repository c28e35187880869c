pub mod application;
pub mod cli;
pub mod domain;

pub use application::PiggyBankService;
pub use domain::*;
