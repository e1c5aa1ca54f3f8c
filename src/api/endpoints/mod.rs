pub mod compare;
pub mod health;
pub mod test_pdf;
