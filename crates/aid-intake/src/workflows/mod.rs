pub mod casework;
pub mod intake;
pub mod routing;
