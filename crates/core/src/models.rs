pub mod event;
pub mod location;
pub mod participant;
pub mod results;
