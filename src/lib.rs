//! ibooku library: book search state, recent keywords, review ordering.

pub mod core;
pub mod service;

#[cfg(test)]
pub mod test_support;
