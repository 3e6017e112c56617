pub mod provision;
pub mod sign_in;
