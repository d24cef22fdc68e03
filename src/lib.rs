pub mod commands;
pub mod console;
pub mod manifest;
pub mod package;
pub mod publish;
pub mod runtime;
