pub mod generation;
pub mod paper;
pub mod question;
