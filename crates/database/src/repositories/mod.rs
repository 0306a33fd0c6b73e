pub mod user;
pub mod utils;

pub use user::UserRepository;
