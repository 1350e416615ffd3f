pub mod index;
pub mod matchers;
pub mod scanner;
