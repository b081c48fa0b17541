pub mod motion;
pub mod netforce;
pub mod stack;
