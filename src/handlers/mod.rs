pub mod ping;
pub mod random_login;
pub mod random_person;
pub mod system;
pub mod users;
