/// Packet builders and collectors shared by unit and integration tests.
pub mod test;
