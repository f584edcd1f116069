pub mod account;
pub mod errors;
pub mod invitation;
pub mod session;
