pub mod balance;
pub mod common;
pub mod redeem;
pub mod send;
pub mod set_mint;
pub mod watch;
