pub mod app;
pub mod error;
pub mod input;
pub mod labels;
pub mod ui;
pub mod view;

#[cfg(test)]
pub(crate) mod fakes;
