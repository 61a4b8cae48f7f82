pub mod forms;
pub mod session;
pub mod views;
