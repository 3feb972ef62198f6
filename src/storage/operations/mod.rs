// Storage operation traits and implementations
pub mod cat;
pub mod delete;
pub mod list;
pub mod seed;
pub mod stat;
pub mod upload;
pub mod write;

pub use cat::FileReader;
pub use delete::Deleter;
pub use list::Lister;
pub use seed::Seeder;
pub use stat::Stater;
pub use upload::Uploader;
pub use write::Writer;
