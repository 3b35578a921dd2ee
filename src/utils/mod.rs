pub mod database;
pub mod extract;
pub mod image;
pub mod response;
pub mod storage;
pub mod validation;

#[cfg(test)]
pub mod testing;
