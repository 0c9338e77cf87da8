pub mod anim;
pub mod ease;
pub mod value;
