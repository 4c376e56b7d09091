//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
mod user;

pub mod visibility;

pub use category::Category;
pub use comment::{Comment, CommentView};
pub use location::Location;
pub use post::{AuthorSummary, Post, PostView};
pub use user::{ROLE_STAFF, ROLE_USER, User};
