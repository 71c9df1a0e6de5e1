//! Database models

pub mod category;
pub mod product;
pub mod user;

pub use category::{Category, CategoryCreate, CategoryId, CategoryUpdate, slugify};
pub use product::{Product, ProductCreate, ProductId, ProductUpdate};
pub use user::{
    LoginRequest, RegisterRequest, User, UserId, UserPublic, UserUpdate, ROLE_ADMIN, ROLE_USER,
};
