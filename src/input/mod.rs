#[cfg(test)]
pub mod decoder_test;
#[cfg(test)]
pub mod locator_test;

pub mod decoder;
pub mod locator;
