pub mod api;
pub mod utils;

#[cfg(test)]
pub mod testing;
