pub mod discovery;
pub mod filter;
pub mod process;

#[cfg(test)]
pub mod testing;
