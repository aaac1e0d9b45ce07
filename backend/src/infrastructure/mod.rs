pub mod audio;
pub mod observer;
