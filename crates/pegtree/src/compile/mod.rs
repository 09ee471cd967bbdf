//! Compiling a grammar into an executable recognizer.

mod generator;

#[cfg(test)]
mod generator_tests;

pub use generator::{generate, GenerateOptions, Matcher, Parser};
