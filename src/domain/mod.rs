mod money;
mod movement;
mod piggy_bank;

pub use money::*;
pub use movement::*;
pub use piggy_bank::*;
