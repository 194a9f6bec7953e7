#[cfg(test)]
pub mod tests;
