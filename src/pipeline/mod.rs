pub mod generator;
pub mod progression;
pub mod session_state;
pub mod settings;
