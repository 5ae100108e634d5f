pub mod matching;
pub mod sim;
pub mod stats;
pub mod switch;

#[cfg(test)]
mod test;
