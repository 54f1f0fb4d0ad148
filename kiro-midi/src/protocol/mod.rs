pub mod codec;
pub mod decoder;
pub mod messages;
pub mod parser;
