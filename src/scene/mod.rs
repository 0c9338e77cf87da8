pub mod model;
pub mod resource;
