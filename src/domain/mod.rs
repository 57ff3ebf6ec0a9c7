pub mod errors;
pub mod events;
pub mod fields;
pub mod model;
pub mod rank;
