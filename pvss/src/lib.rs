pub mod dealer;
pub mod instance;
pub mod party;
